//! Dated journal entries.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    response::IntoResponse,
};
use rusqlite::{Connection, Row, params};
use serde::{Deserialize, Serialize};
use serde_json::json;
use time::Date;

use crate::{
    AppState, Error,
    database_id::DatabaseId,
    db::lock_connection,
    extract::Json,
    form::{required, required_text},
};

/// A dated piece of writing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JournalEntry {
    pub id: DatabaseId,
    pub title: String,
    pub date: Date,
    pub content: String,
}

/// The request body for writing a journal entry.
#[derive(Debug, Default, Deserialize)]
pub struct JournalForm {
    pub title: Option<String>,
    pub date: Option<Date>,
    pub content: Option<String>,
}

/// Create the journal entry table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_journal_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS journal_entry (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                date TEXT NOT NULL,
                content TEXT NOT NULL
                )",
        (),
    )?;

    Ok(())
}

fn insert_journal_entry(
    title: &str,
    date: Date,
    content: &str,
    connection: &Connection,
) -> Result<JournalEntry, Error> {
    connection
        .prepare(
            "INSERT INTO journal_entry (title, date, content) VALUES (?1, ?2, ?3)
             RETURNING id, title, date, content",
        )?
        .query_row(params![title, date, content], map_journal_row)
        .map_err(Error::from)
}

fn get_journal_entries(connection: &Connection) -> Result<Vec<JournalEntry>, Error> {
    connection
        .prepare(
            "SELECT id, title, date, content FROM journal_entry ORDER BY date DESC, id DESC",
        )?
        .query_map([], map_journal_row)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(Error::from)
}

fn map_journal_row(row: &Row) -> Result<JournalEntry, rusqlite::Error> {
    Ok(JournalEntry {
        id: row.get(0)?,
        title: row.get(1)?,
        date: row.get(2)?,
        content: row.get(3)?,
    })
}

/// The state needed by the journal route handlers.
#[derive(Debug, Clone)]
pub struct JournalState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for JournalState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Write a journal entry, responds with the new entry's ID.
pub async fn create_journal_entry_endpoint(
    State(state): State<JournalState>,
    Json(form): Json<JournalForm>,
) -> Result<impl IntoResponse, Error> {
    let title = required_text("title", form.title)?;
    let date = required("date", form.date)?;
    let content = required_text("content", form.content)?;

    let entry = insert_journal_entry(
        &title,
        date,
        &content,
        &*lock_connection(&state.db_connection)?,
    )?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "id": entry.id,
            "message": "Journal entry added successfully",
        })),
    ))
}

/// List every journal entry, most recent first.
pub async fn list_journal_entries_endpoint(
    State(state): State<JournalState>,
) -> Result<Json<Vec<JournalEntry>>, Error> {
    get_journal_entries(&*lock_connection(&state.db_connection)?).map(Json)
}
