//! CRUD operations for [`User`] records.

use rusqlite::{params, OptionalExtension};

use crate::database::{now_string, parse_timestamp, Database};
use crate::error::Result;
use crate::models::User;

impl Database {
    /// Insert a new user. Inserting an existing id is a no-op, so callers
    /// may run this unconditionally on session start.
    pub fn create_user(&self, user_id: &str) -> Result<()> {
        self.conn().execute(
            "INSERT OR IGNORE INTO users (id, assistant_id, created_at)
             VALUES (?1, NULL, ?2)",
            params![user_id, now_string()],
        )?;
        Ok(())
    }

    /// Fetch a user row.
    pub fn get_user(&self, user_id: &str) -> Result<Option<User>> {
        let user = self
            .conn()
            .query_row(
                "SELECT id, assistant_id, created_at FROM users WHERE id = ?1",
                params![user_id],
                row_to_user,
            )
            .optional()?;
        Ok(user)
    }

    /// Return the cached remote persona id for a user, if any.
    pub fn assistant_id_for_user(&self, user_id: &str) -> Result<Option<String>> {
        let id: Option<Option<String>> = self
            .conn()
            .query_row(
                "SELECT assistant_id FROM users WHERE id = ?1",
                params![user_id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(id.flatten())
    }

    /// Overwrite the cached remote persona id for a user.
    pub fn set_assistant_id(&self, user_id: &str, assistant_id: &str) -> Result<()> {
        self.conn().execute(
            "UPDATE users SET assistant_id = ?1 WHERE id = ?2",
            params![assistant_id, user_id],
        )?;
        Ok(())
    }
}

/// Map a `rusqlite::Row` to a [`User`].
fn row_to_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
    let created_str: String = row.get(2)?;
    Ok(User {
        id: row.get(0)?,
        assistant_id: row.get(1)?,
        created_at: parse_timestamp(&created_str)?,
    })
}
