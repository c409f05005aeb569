//! Local persistence for genie chat sessions.
//!
//! Two live tables: `users` (one remote persona id per user) and `chats`
//! (title plus the remote thread id, lazily filled in on first message).
//! Turn content is never stored locally; the remote thread is the source
//! of truth for message history.

pub mod chats;
pub mod database;
pub mod error;
pub mod models;
pub mod users;

pub use database::Database;
pub use error::{Result, StoreError};
pub use models::{Chat, ChatUpdate, User};
