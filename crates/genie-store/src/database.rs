//! Database connection management.
//!
//! The [`Database`] struct owns a [`rusqlite::Connection`] and guarantees
//! that the schema exists before any other operation. Schema creation is
//! idempotent (`CREATE TABLE IF NOT EXISTS`); there is no migration
//! versioning.

use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use directories::ProjectDirs;
use rusqlite::Connection;

use crate::error::{Result, StoreError};

/// Wrapper around a [`rusqlite::Connection`].
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (or create) the default application database.
    ///
    /// The database file is placed in the platform-appropriate data
    /// directory, e.g. `~/.local/share/genie/genie.db` on Linux.
    pub fn open_default() -> Result<Self> {
        let project_dirs =
            ProjectDirs::from("com", "genie", "genie").ok_or(StoreError::NoDataDir)?;

        let data_dir = project_dirs.data_dir();
        std::fs::create_dir_all(data_dir)?;

        let db_path = data_dir.join("genie.db");

        tracing::info!(path = %db_path.display(), "opening database");

        Self::open_at(&db_path)
    }

    /// Open (or create) a database at an explicit path.
    ///
    /// This is useful for tests and for embedding the store inside custom
    /// directory layouts.
    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;

        // Recommended SQLite settings.
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;

        init_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Return a reference to the underlying `rusqlite::Connection`.
    ///
    /// Callers should prefer the typed CRUD helpers, but direct access is
    /// occasionally needed for ad-hoc queries.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Return the filesystem path of the open database (if any).
    pub fn path(&self) -> Option<PathBuf> {
        self.conn.path().map(PathBuf::from)
    }
}

/// Create the two live tables and drop the legacy `messages` table.
///
/// Turn content used to be mirrored locally; it now lives exclusively in
/// the remote thread, so any leftover `messages` table is removed.
fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS users (
             id          TEXT PRIMARY KEY,
             assistant_id TEXT,
             created_at  TEXT NOT NULL
         );
         CREATE TABLE IF NOT EXISTS chats (
             id          TEXT PRIMARY KEY,
             user_id     TEXT NOT NULL,
             title       TEXT NOT NULL,
             thread_id   TEXT,
             created_at  TEXT NOT NULL,
             updated_at  TEXT NOT NULL,
             FOREIGN KEY (user_id) REFERENCES users (id)
         );
         DROP TABLE IF EXISTS messages;",
    )?;
    Ok(())
}

/// Current time serialized for TEXT columns.
///
/// Fixed microsecond precision keeps the strings lexicographically
/// sortable, which `ORDER BY updated_at DESC` relies on.
pub(crate) fn now_string() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parse a TEXT column written by [`now_string`].
pub(crate) fn parse_timestamp(s: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
        })
}
