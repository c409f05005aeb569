//! The remote API boundary.
//!
//! [`AssistantService`](crate::service::AssistantService) is written
//! against this trait so the poll/tool loop can be exercised against an
//! in-process stub (see [`crate::stub`]).

use std::path::Path;

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{
    Assistant, CreateAssistant, CreateMessage, FileObject, ImageRequest, ImageResponse,
    MessageQuery, Run, Thread, ThreadMessage, ToolOutput,
};

/// The remote capability the client consumes: create a stateful context,
/// post a turn and a persona, poll until settled, optionally resolve
/// declared tools.
#[async_trait]
pub trait AssistantApi: Send + Sync {
    /// Create a persona with a fixed behavior prompt and toolset.
    async fn create_assistant(&self, req: CreateAssistant) -> Result<Assistant>;

    /// Confirm a persona still exists remotely.
    async fn retrieve_assistant(&self, assistant_id: &str) -> Result<Assistant>;

    /// Create a new conversation context. No arguments.
    async fn create_thread(&self) -> Result<Thread>;

    /// Append a turn to a thread.
    async fn create_message(&self, thread_id: &str, req: CreateMessage) -> Result<ThreadMessage>;

    /// List a thread's messages.
    async fn list_messages(
        &self,
        thread_id: &str,
        query: MessageQuery,
    ) -> Result<Vec<ThreadMessage>>;

    /// Start a run of the persona over the thread.
    async fn create_run(&self, thread_id: &str, assistant_id: &str) -> Result<Run>;

    /// Check a run's status.
    async fn retrieve_run(&self, thread_id: &str, run_id: &str) -> Result<Run>;

    /// Submit resolved tool outputs in one batch, resuming the run.
    async fn submit_tool_outputs(
        &self,
        thread_id: &str,
        run_id: &str,
        outputs: Vec<ToolOutput>,
    ) -> Result<Run>;

    /// Render an image.
    async fn generate_image(&self, req: ImageRequest) -> Result<ImageResponse>;

    /// Upload a file for the code-execution tool's file set.
    async fn upload_file(&self, path: &Path) -> Result<FileObject>;
}
