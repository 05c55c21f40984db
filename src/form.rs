//! Helpers for validating the fields of JSON request bodies.
//!
//! Request bodies deserialize required fields as `Option`s so that a missing
//! field produces a message naming it, rather than a generic parse error.

use crate::Error;

/// Return the value of a required field.
///
/// # Errors
/// Returns an [Error::Validation] naming `field` if `value` is `None`.
pub fn required<T>(field: &str, value: Option<T>) -> Result<T, Error> {
    value.ok_or_else(|| Error::Validation(format!("{field} is required")))
}

/// Return the trimmed value of a required text field.
///
/// # Errors
/// Returns an [Error::Validation] naming `field` if `value` is `None` or blank.
pub fn required_text(field: &str, value: Option<String>) -> Result<String, Error> {
    optional_text(value).ok_or_else(|| Error::Validation(format!("{field} is required")))
}

/// Trim an optional text field, treating blank text as absent.
pub fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_owned())
        .filter(|text| !text.is_empty())
}

#[cfg(test)]
mod tests {
    use crate::{
        Error,
        form::{optional_text, required, required_text},
    };

    #[test]
    fn required_names_missing_field() {
        assert_eq!(
            required::<i64>("amount", None),
            Err(Error::Validation("amount is required".to_owned()))
        );
        assert_eq!(required("amount", Some(1)), Ok(1));
    }

    #[test]
    fn blank_text_is_missing() {
        assert_eq!(
            required_text("title", Some("  ".to_owned())),
            Err(Error::Validation("title is required".to_owned()))
        );
        assert_eq!(optional_text(Some("".to_owned())), None);
        assert_eq!(
            optional_text(Some(" Store ".to_owned())),
            Some("Store".to_owned())
        );
    }
}
