//! Row types for the two live tables.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A local user. Holds at most one remote persona id at a time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub assistant_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A chat. The remote thread id is NULL until the first message is sent,
/// then written once and reused for the life of the chat.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chat {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub thread_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial update for a chat. Only supplied fields change; any update
/// bumps `updated_at`.
#[derive(Debug, Clone, Default)]
pub struct ChatUpdate {
    pub thread_id: Option<String>,
    pub title: Option<String>,
}

impl ChatUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn thread_id(mut self, thread_id: impl Into<String>) -> Self {
        self.thread_id = Some(thread_id.into());
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.thread_id.is_none() && self.title.is_none()
    }
}
