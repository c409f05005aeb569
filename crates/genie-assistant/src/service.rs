//! Turn orchestration: persona lifecycle, the poll loop and local tool
//! resolution.

use std::sync::Arc;

use tokio::time::Instant;

use crate::api::AssistantApi;
use crate::config::AssistantConfig;
use crate::error::{AssistantError, Result};
use crate::prompts::{ASSISTANT_INSTRUCTIONS, ASSISTANT_NAME, NO_REPLY_TEXT, RUN_FAILED_TEXT, RUN_TIMEOUT_TEXT};
use crate::types::{
    generate_image_tool, CreateAssistant, CreateMessage, FileObject, ImageArgs, ImageRequest,
    ImageStyle, MessageQuery, Role, Run, RunStatus, Thread, ToolDefinition, ToolOutput, Turn,
    GENERATE_IMAGE_FUNCTION,
};
use genie_store::Database;

/// Result of a persona existence check.
///
/// Only [`ExistenceCheck::NotFound`] may replace a cached persona;
/// transient failures are retried and then propagated instead of silently
/// churning personas.
#[derive(Debug)]
pub enum ExistenceCheck {
    Found,
    NotFound,
    TransientError(AssistantError),
}

/// Terminal outcome of one turn.
///
/// `Failed` and `TimedOut` are user-visible text, not distinguishable
/// error types; callers render [`TurnOutcome::into_reply`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    Completed(String),
    Failed,
    TimedOut,
}

impl TurnOutcome {
    pub fn reply_text(&self) -> &str {
        match self {
            TurnOutcome::Completed(text) => text,
            TurnOutcome::Failed => RUN_FAILED_TEXT,
            TurnOutcome::TimedOut => RUN_TIMEOUT_TEXT,
        }
    }

    pub fn into_reply(self) -> String {
        match self {
            TurnOutcome::Completed(text) => text,
            TurnOutcome::Failed => RUN_FAILED_TEXT.to_string(),
            TurnOutcome::TimedOut => RUN_TIMEOUT_TEXT.to_string(),
        }
    }
}

/// High-level client over an [`AssistantApi`].
pub struct AssistantService {
    api: Arc<dyn AssistantApi>,
    config: AssistantConfig,
}

impl AssistantService {
    pub fn new(api: Arc<dyn AssistantApi>, config: AssistantConfig) -> Self {
        Self { api, config }
    }

    pub fn config(&self) -> &AssistantConfig {
        &self.config
    }

    // ------------------------------------------------------------------
    // Persona lifecycle
    // ------------------------------------------------------------------

    /// Return the user's persona id, creating and caching one if needed.
    ///
    /// A cached id is first confirmed remotely. `NotFound` falls through
    /// to creation (the new id overwrites the cached one; existing chats
    /// keep their threads, which are independent remote objects).
    /// Transient failures are retried a bounded number of times and then
    /// propagated without touching the cache.
    pub async fn get_or_create_assistant(&self, db: &Database, user_id: &str) -> Result<String> {
        if let Some(cached) = db.assistant_id_for_user(user_id)? {
            let mut attempts = 0;
            loop {
                match self.check_assistant(&cached).await {
                    ExistenceCheck::Found => return Ok(cached),
                    ExistenceCheck::NotFound => {
                        tracing::info!(assistant_id = %cached, "cached persona gone, recreating");
                        break;
                    }
                    ExistenceCheck::TransientError(err) => {
                        attempts += 1;
                        if attempts > self.config.persona_check_retries {
                            return Err(AssistantError::PersonaUnverifiable {
                                attempts,
                                source: Box::new(err),
                            });
                        }
                        tracing::warn!(
                            attempt = attempts,
                            error = %err,
                            "persona lookup failed transiently, retrying"
                        );
                        tokio::time::sleep(self.config.persona_retry_backoff).await;
                    }
                }
            }
        }

        let assistant = self
            .api
            .create_assistant(CreateAssistant {
                model: self.config.model.clone(),
                name: ASSISTANT_NAME.to_string(),
                instructions: ASSISTANT_INSTRUCTIONS.to_string(),
                tools: vec![ToolDefinition::CodeInterpreter, generate_image_tool()],
            })
            .await?;

        db.set_assistant_id(user_id, &assistant.id)?;
        tracing::info!(assistant_id = %assistant.id, user_id, "created persona");
        Ok(assistant.id)
    }

    async fn check_assistant(&self, assistant_id: &str) -> ExistenceCheck {
        match self.api.retrieve_assistant(assistant_id).await {
            Ok(_) => ExistenceCheck::Found,
            Err(err) if err.is_not_found() => ExistenceCheck::NotFound,
            Err(err) => ExistenceCheck::TransientError(err),
        }
    }

    // ------------------------------------------------------------------
    // Threads and turns
    // ------------------------------------------------------------------

    /// Create a new remote conversation context.
    pub async fn create_thread(&self) -> Result<Thread> {
        self.api.create_thread().await
    }

    /// Append a user turn, run the persona and block until the turn
    /// settles.
    ///
    /// One state machine per turn: SUBMITTED, then POLLING alternating
    /// with AWAITING_TOOL_OUTPUT when the run requires action, ending in
    /// Completed/Failed/TimedOut. Polling and tool resolution share one
    /// wall-clock budget; nothing polls after the deadline.
    pub async fn send_message(
        &self,
        thread_id: &str,
        assistant_id: &str,
        text: &str,
        file_ids: &[String],
    ) -> Result<TurnOutcome> {
        self.api
            .create_message(thread_id, CreateMessage::user(text, file_ids))
            .await?;

        let mut run = self.api.create_run(thread_id, assistant_id).await?;
        let deadline = Instant::now() + self.config.run_timeout;

        loop {
            match run.status {
                RunStatus::Completed => return self.latest_reply(thread_id).await,
                RunStatus::Failed | RunStatus::Cancelled | RunStatus::Expired => {
                    tracing::warn!(run_id = %run.id, status = ?run.status, "run ended unsuccessfully");
                    return Ok(TurnOutcome::Failed);
                }
                RunStatus::RequiresAction => {
                    if Instant::now() >= deadline {
                        return Ok(TurnOutcome::TimedOut);
                    }
                    let outputs = self.resolve_tool_calls(&run).await;
                    run = self
                        .api
                        .submit_tool_outputs(thread_id, &run.id, outputs)
                        .await?;
                }
                RunStatus::Queued | RunStatus::InProgress | RunStatus::Unknown => {
                    if Instant::now() >= deadline {
                        tracing::warn!(run_id = %run.id, "turn exceeded its wall-clock budget");
                        return Ok(TurnOutcome::TimedOut);
                    }
                    tokio::time::sleep(self.config.poll_interval).await;
                    run = self.api.retrieve_run(thread_id, &run.id).await?;
                }
            }
        }
    }

    /// Fetch and flatten the newest assistant turn after completion.
    async fn latest_reply(&self, thread_id: &str) -> Result<TurnOutcome> {
        let messages = self
            .api
            .list_messages(thread_id, MessageQuery::latest())
            .await?;

        let reply = messages
            .into_iter()
            .next()
            .map(|msg| msg.into_turn())
            .filter(|turn| turn.role == Role::Assistant)
            .map(|turn| turn.text());

        match reply {
            Some(text) if !text.is_empty() => Ok(TurnOutcome::Completed(text)),
            _ => Ok(TurnOutcome::Completed(NO_REPLY_TEXT.to_string())),
        }
    }

    /// Resolve every pending `generate_image` call into a tool output.
    ///
    /// Image failures become in-band failure markers so the run can still
    /// settle; undeclared tool names are skipped.
    async fn resolve_tool_calls(&self, run: &Run) -> Vec<ToolOutput> {
        let mut outputs = Vec::new();

        for call in run.pending_tool_calls() {
            if call.function.name != GENERATE_IMAGE_FUNCTION {
                tracing::warn!(name = %call.function.name, "skipping undeclared tool call");
                continue;
            }

            let payload = match serde_json::from_str::<ImageArgs>(&call.function.arguments) {
                Ok(args) => {
                    let style = args.style.unwrap_or_default();
                    match self.generate_image(&args.prompt, style).await {
                        Ok(Some(url)) => serde_json::json!({
                            "image_url": url,
                            "size": self.config.image_size,
                            "status": "success",
                        }),
                        Ok(None) => serde_json::json!({
                            "image_url": null,
                            "size": self.config.image_size,
                            "status": "failed",
                        }),
                        Err(err) => {
                            tracing::warn!(error = %err, "image generation failed");
                            serde_json::json!({
                                "image_url": null,
                                "size": self.config.image_size,
                                "status": "failed",
                            })
                        }
                    }
                }
                Err(err) => {
                    tracing::warn!(error = %err, "unparseable tool-call arguments");
                    serde_json::json!({ "error": "invalid arguments", "status": "failed" })
                }
            };

            outputs.push(ToolOutput {
                tool_call_id: call.id.clone(),
                output: payload.to_string(),
            });
        }

        outputs
    }

    /// Render an image at the fixed resolution. Returns the result URL,
    /// or `None` when the endpoint answered without one.
    pub async fn generate_image(&self, prompt: &str, style: ImageStyle) -> Result<Option<String>> {
        let response = self
            .api
            .generate_image(ImageRequest {
                model: self.config.image_model.clone(),
                prompt: prompt.to_string(),
                size: self.config.image_size.clone(),
                quality: "standard".to_string(),
                style,
                n: 1,
            })
            .await?;
        Ok(response.first_url().map(str::to_string))
    }

    /// Full remote history in chronological order, normalized.
    pub async fn get_thread_messages(&self, thread_id: &str) -> Result<Vec<Turn>> {
        let messages = self
            .api
            .list_messages(thread_id, MessageQuery::chronological())
            .await?;
        Ok(messages.into_iter().map(|m| m.into_turn()).collect())
    }

    /// Upload a local file for the code-execution tool's file set.
    pub async fn upload_file(&self, path: &std::path::Path) -> Result<FileObject> {
        self.api.upload_file(path).await
    }
}
