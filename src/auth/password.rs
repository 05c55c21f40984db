//! Password strength checks and bcrypt hashing.

use std::fmt::Display;

use bcrypt::{hash, verify};
use serde::{Deserialize, Serialize};
use zxcvbn::{Score, feedback::Feedback, zxcvbn};

use crate::Error;

/// A password that zxcvbn considers hard to guess, but that has not been hashed yet.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedPassword(String);

impl ValidatedPassword {
    /// Check the strength of `raw_password`.
    ///
    /// `user_inputs` are words the password should not be built from, such as
    /// the username.
    ///
    /// # Errors
    /// Returns an [Error::TooWeak] with zxcvbn's suggestions if the password
    /// scores below three.
    pub fn new(raw_password: &str, user_inputs: &[&str]) -> Result<Self, Error> {
        let analysis = zxcvbn(raw_password, user_inputs);

        match analysis.score() {
            Score::Three | Score::Four => Ok(Self(raw_password.to_owned())),
            _ => Err(Error::TooWeak(
                analysis
                    .feedback()
                    .unwrap_or(&Feedback::default())
                    .to_string(),
            )),
        }
    }
}

impl Display for ValidatedPassword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "********")
    }
}

/// A salted bcrypt hash of a password.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// The bcrypt cost used outside of tests.
    pub const DEFAULT_COST: u32 = bcrypt::DEFAULT_COST;

    /// Hash `password` with `cost` rounds of bcrypt.
    ///
    /// # Errors
    /// Returns an [Error::HashingError] if bcrypt fails, e.g. because `cost`
    /// is out of range.
    pub fn new(password: ValidatedPassword, cost: u32) -> Result<Self, Error> {
        hash(&password.0, cost)
            .map(Self)
            .map_err(|error| Error::HashingError(error.to_string()))
    }

    /// Wrap a hash that was read back from the database.
    pub fn new_unchecked(raw_password_hash: &str) -> Self {
        Self(raw_password_hash.to_owned())
    }

    /// Check whether `raw_password` is the password that produced this hash.
    ///
    /// # Errors
    /// Returns an [Error::HashingError] if the stored hash is malformed.
    pub fn verify(&self, raw_password: &str) -> Result<bool, Error> {
        verify(raw_password, &self.0).map_err(|error| Error::HashingError(error.to_string()))
    }
}

impl AsRef<str> for PasswordHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        Error,
        auth::{PasswordHash, ValidatedPassword},
    };

    #[test]
    fn rejects_weak_passwords() {
        for password in ["", "imtooshort", "password1234"] {
            let result = ValidatedPassword::new(password, &[]);

            assert!(
                matches!(result, Err(Error::TooWeak(_))),
                "want TooWeak for {password:?}, got {result:?}"
            );
        }
    }

    #[test]
    fn rejects_password_made_from_username() {
        let result = ValidatedPassword::new("ledgerbookadmin", &["ledgerbookadmin"]);

        assert!(matches!(result, Err(Error::TooWeak(_))));
    }

    #[test]
    fn accepts_long_password() {
        assert!(ValidatedPassword::new("asomewhatlongpassword1", &[]).is_ok());
    }

    #[test]
    fn display_hides_password() {
        let password = ValidatedPassword::new("asomewhatlongpassword1", &[]).unwrap();

        assert_eq!(password.to_string(), "********");
    }

    #[test]
    fn verifies_known_hash() {
        let hash = PasswordHash::new_unchecked(
            "$2b$12$Gwf0uvxH3L7JLfo0CC/NCOoijK2vQ/wbgP.LeNup8vj6gg31IiFkm",
        );

        assert_eq!(hash.verify("okon"), Ok(true));
        assert_eq!(hash.verify("thewrongpassword"), Ok(false));
    }

    #[test]
    fn hashing_same_password_twice_gives_different_salts() {
        let password = ValidatedPassword::new("turkeysgogobblegobble", &[]).unwrap();

        let hash = PasswordHash::new(password.clone(), 4).unwrap();
        let other_hash = PasswordHash::new(password, 4).unwrap();

        assert_ne!(hash, other_hash);
        assert_eq!(hash.verify("turkeysgogobblegobble"), Ok(true));
        assert_eq!(other_hash.verify("turkeysgogobblegobble"), Ok(true));
    }

    #[test]
    fn malformed_hash_is_an_error() {
        let hash = PasswordHash::new_unchecked("not a bcrypt hash");

        assert!(matches!(hash.verify("okon"), Err(Error::HashingError(_))));
    }
}
