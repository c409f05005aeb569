//! The session-context value object.

use genie_assistant::Turn;

/// Immutable snapshot of one user session between interactions.
///
/// Handlers take a snapshot and return a new one; the driver renders the
/// latest snapshot after each interaction.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    /// Local user id (opaque).
    pub user_id: String,
    /// Currently selected chat, if any.
    pub current_chat: Option<String>,
    /// Transcript of the selected chat, reconstructed from the remote
    /// thread (never persisted locally).
    pub transcript: Vec<Turn>,
    /// Files uploaded this session, attached to subsequent prompts for
    /// the code-execution tool.
    pub uploaded_files: Vec<String>,
    /// Last user-facing notice (non-fatal remote failures).
    pub notice: Option<String>,
}

impl SessionContext {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            ..Self::default()
        }
    }

    /// Clear the notice; notices are shown once.
    pub fn without_notice(mut self) -> Self {
        self.notice = None;
        self
    }

    pub(crate) fn with_notice(mut self, notice: impl Into<String>) -> Self {
        self.notice = Some(notice.into());
        self
    }
}

/// Short opaque id for local rows.
pub(crate) fn short_id() -> String {
    uuid::Uuid::new_v4().to_string()[..8].to_string()
}
