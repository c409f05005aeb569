//! CRUD operations for [`Chat`] records.

use rusqlite::{params, OptionalExtension};

use crate::database::{now_string, parse_timestamp, Database};
use crate::error::Result;
use crate::models::{Chat, ChatUpdate};

impl Database {
    // ------------------------------------------------------------------
    // Create
    // ------------------------------------------------------------------

    /// Insert a new chat. The remote thread id starts out NULL and is
    /// written later via [`Database::update_chat`].
    pub fn create_chat(&self, chat_id: &str, user_id: &str, title: &str) -> Result<()> {
        let now = now_string();
        self.conn().execute(
            "INSERT INTO chats (id, user_id, title, thread_id, created_at, updated_at)
             VALUES (?1, ?2, ?3, NULL, ?4, ?4)",
            params![chat_id, user_id, title, now],
        )?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Read
    // ------------------------------------------------------------------

    /// Fetch a single chat by id.
    pub fn get_chat(&self, chat_id: &str) -> Result<Option<Chat>> {
        let chat = self
            .conn()
            .query_row(
                "SELECT id, user_id, title, thread_id, created_at, updated_at
                 FROM chats
                 WHERE id = ?1",
                params![chat_id],
                row_to_chat,
            )
            .optional()?;
        Ok(chat)
    }

    /// List a user's chats, most recently updated first.
    pub fn list_chats_for_user(&self, user_id: &str) -> Result<Vec<Chat>> {
        let mut stmt = self.conn().prepare(
            "SELECT id, user_id, title, thread_id, created_at, updated_at
             FROM chats
             WHERE user_id = ?1
             ORDER BY updated_at DESC",
        )?;

        let rows = stmt.query_map(params![user_id], row_to_chat)?;

        let mut chats = Vec::new();
        for row in rows {
            chats.push(row?);
        }
        Ok(chats)
    }

    // ------------------------------------------------------------------
    // Update
    // ------------------------------------------------------------------

    /// Apply a partial update. Only supplied fields change; any non-empty
    /// update bumps `updated_at`. An empty update is a no-op.
    pub fn update_chat(&self, chat_id: &str, update: ChatUpdate) -> Result<()> {
        if update.is_empty() {
            return Ok(());
        }

        let mut sets = Vec::new();
        let mut values: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(thread_id) = update.thread_id {
            sets.push(format!("thread_id = ?{}", values.len() + 1));
            values.push(Box::new(thread_id));
        }
        if let Some(title) = update.title {
            sets.push(format!("title = ?{}", values.len() + 1));
            values.push(Box::new(title));
        }

        sets.push(format!("updated_at = ?{}", values.len() + 1));
        values.push(Box::new(now_string()));

        let sql = format!(
            "UPDATE chats SET {} WHERE id = ?{}",
            sets.join(", "),
            values.len() + 1
        );
        values.push(Box::new(chat_id.to_string()));

        let params = rusqlite::params_from_iter(values.iter().map(|v| v.as_ref()));
        self.conn().execute(&sql, params)?;
        Ok(())
    }

    /// Bump `updated_at` without changing any other field.
    pub fn touch_chat(&self, chat_id: &str) -> Result<()> {
        self.conn().execute(
            "UPDATE chats SET updated_at = ?1 WHERE id = ?2",
            params![now_string(), chat_id],
        )?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Delete
    // ------------------------------------------------------------------

    /// Delete a chat by id. Returns `true` if a row was deleted. The
    /// owning user row is never touched.
    pub fn delete_chat(&self, chat_id: &str) -> Result<bool> {
        let affected = self
            .conn()
            .execute("DELETE FROM chats WHERE id = ?1", params![chat_id])?;
        Ok(affected > 0)
    }
}

/// Map a `rusqlite::Row` to a [`Chat`].
fn row_to_chat(row: &rusqlite::Row<'_>) -> rusqlite::Result<Chat> {
    let created_str: String = row.get(4)?;
    let updated_str: String = row.get(5)?;
    Ok(Chat {
        id: row.get(0)?,
        user_id: row.get(1)?,
        title: row.get(2)?,
        thread_id: row.get(3)?,
        created_at: parse_timestamp(&created_str)?,
        updated_at: parse_timestamp(&updated_str)?,
    })
}
