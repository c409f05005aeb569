//! Scripted in-process implementation of [`AssistantApi`].
//!
//! Used by the client and session test suites to drive the poll/tool loop
//! without a network. Run states are scripted as a queue: `create_run`,
//! `retrieve_run` and `submit_tool_outputs` each pop the next state; when
//! the queue empties the last state repeats.

use std::collections::{HashSet, VecDeque};
use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::api::AssistantApi;
use crate::error::{AssistantError, Result};
use crate::types::{
    Assistant, CreateAssistant, CreateMessage, FileObject, ImageData, ImageRequest, ImageResponse,
    MessageContent, MessageQuery, Run, RunStatus, SortOrder, TextValue, Thread, ThreadMessage,
    ToolOutput,
};

#[derive(Default)]
struct Inner {
    existing_assistants: HashSet<String>,
    retrieve_failure: Option<u16>,
    created_assistants: Vec<String>,
    run_script: VecDeque<Run>,
    last_run: Option<Run>,
    messages: Vec<ThreadMessage>,
    reply_text: Option<String>,
    image_url: Option<String>,
    counts: CallCounts,
    next_id: u32,
}

/// Per-method call counters, for asserting loop behavior.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallCounts {
    pub create_assistant: u32,
    pub retrieve_assistant: u32,
    pub create_thread: u32,
    pub create_message: u32,
    pub list_messages: u32,
    pub create_run: u32,
    pub retrieve_run: u32,
    pub submit_tool_outputs: u32,
    pub generate_image: u32,
    pub upload_file: u32,
}

pub struct StubAssistantApi {
    inner: Mutex<Inner>,
}

impl Default for StubAssistantApi {
    fn default() -> Self {
        Self::new()
    }
}

impl StubAssistantApi {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
        }
    }

    /// Register an assistant id that `retrieve_assistant` will find.
    pub fn with_assistant(self, assistant_id: impl Into<String>) -> Self {
        self.inner
            .lock()
            .unwrap()
            .existing_assistants
            .insert(assistant_id.into());
        self
    }

    /// Make every `retrieve_assistant` call fail with the given status.
    pub fn fail_retrieve_with(self, status: u16) -> Self {
        self.inner.lock().unwrap().retrieve_failure = Some(status);
        self
    }

    /// Script the next run state. States are consumed in order by
    /// `create_run`, `submit_tool_outputs` and `retrieve_run`.
    pub fn push_run(self, run: Run) -> Self {
        self.inner.lock().unwrap().run_script.push_back(run);
        self
    }

    /// Script the assistant reply appended after the scripted run settles.
    pub fn with_reply(self, text: impl Into<String>) -> Self {
        self.inner.lock().unwrap().reply_text = Some(text.into());
        self
    }

    /// Script the URL returned by the image endpoint.
    pub fn with_image_url(self, url: impl Into<String>) -> Self {
        self.inner.lock().unwrap().image_url = Some(url.into());
        self
    }

    pub fn counts(&self) -> CallCounts {
        self.inner.lock().unwrap().counts
    }

    /// Ids of assistants created through the stub, in order.
    pub fn created_assistants(&self) -> Vec<String> {
        self.inner.lock().unwrap().created_assistants.clone()
    }

    /// A plain run value with no pending action.
    pub fn run(status: RunStatus) -> Run {
        Run {
            id: "run_1".to_string(),
            status,
            required_action: None,
        }
    }

    fn next_run(inner: &mut Inner) -> Run {
        if let Some(run) = inner.run_script.pop_front() {
            inner.last_run = Some(run.clone());
            return run;
        }
        inner
            .last_run
            .clone()
            .unwrap_or_else(|| Self::run(RunStatus::Completed))
    }
}

#[async_trait]
impl AssistantApi for StubAssistantApi {
    async fn create_assistant(&self, _req: CreateAssistant) -> Result<Assistant> {
        let mut inner = self.inner.lock().unwrap();
        inner.counts.create_assistant += 1;
        inner.next_id += 1;
        let id = format!("asst_{}", inner.next_id);
        inner.created_assistants.push(id.clone());
        inner.existing_assistants.insert(id.clone());
        Ok(Assistant {
            id,
            name: None,
            model: None,
        })
    }

    async fn retrieve_assistant(&self, assistant_id: &str) -> Result<Assistant> {
        let mut inner = self.inner.lock().unwrap();
        inner.counts.retrieve_assistant += 1;

        if let Some(status) = inner.retrieve_failure {
            return Err(AssistantError::Api {
                status,
                message: "scripted failure".to_string(),
            });
        }
        if inner.existing_assistants.contains(assistant_id) {
            Ok(Assistant {
                id: assistant_id.to_string(),
                name: None,
                model: None,
            })
        } else {
            Err(AssistantError::Api {
                status: 404,
                message: "No assistant found".to_string(),
            })
        }
    }

    async fn create_thread(&self) -> Result<Thread> {
        let mut inner = self.inner.lock().unwrap();
        inner.counts.create_thread += 1;
        inner.next_id += 1;
        Ok(Thread {
            id: format!("thread_{}", inner.next_id),
        })
    }

    async fn create_message(&self, _thread_id: &str, req: CreateMessage) -> Result<ThreadMessage> {
        let mut inner = self.inner.lock().unwrap();
        inner.counts.create_message += 1;
        inner.next_id += 1;
        let created_at = inner.messages.len() as i64;
        let msg = ThreadMessage {
            id: format!("msg_{}", inner.next_id),
            role: req.role,
            content: vec![MessageContent::Text {
                text: TextValue { value: req.content },
            }],
            created_at,
        };
        inner.messages.push(msg.clone());
        Ok(msg)
    }

    async fn list_messages(
        &self,
        _thread_id: &str,
        query: MessageQuery,
    ) -> Result<Vec<ThreadMessage>> {
        let mut inner = self.inner.lock().unwrap();
        inner.counts.list_messages += 1;

        let mut all = inner.messages.clone();
        if let Some(reply) = inner.reply_text.clone() {
            all.push(ThreadMessage {
                id: "msg_reply".to_string(),
                role: crate::types::Role::Assistant,
                content: vec![MessageContent::Text {
                    text: TextValue { value: reply },
                }],
                created_at: all.len() as i64,
            });
        }

        if query.order == SortOrder::Desc {
            all.reverse();
        }
        if let Some(limit) = query.limit {
            all.truncate(limit as usize);
        }
        Ok(all)
    }

    async fn create_run(&self, _thread_id: &str, _assistant_id: &str) -> Result<Run> {
        let mut inner = self.inner.lock().unwrap();
        inner.counts.create_run += 1;
        Ok(Self::next_run(&mut inner))
    }

    async fn retrieve_run(&self, _thread_id: &str, _run_id: &str) -> Result<Run> {
        let mut inner = self.inner.lock().unwrap();
        inner.counts.retrieve_run += 1;
        Ok(Self::next_run(&mut inner))
    }

    async fn submit_tool_outputs(
        &self,
        _thread_id: &str,
        _run_id: &str,
        _outputs: Vec<ToolOutput>,
    ) -> Result<Run> {
        let mut inner = self.inner.lock().unwrap();
        inner.counts.submit_tool_outputs += 1;
        Ok(Self::next_run(&mut inner))
    }

    async fn generate_image(&self, _req: ImageRequest) -> Result<ImageResponse> {
        let mut inner = self.inner.lock().unwrap();
        inner.counts.generate_image += 1;
        Ok(ImageResponse {
            data: vec![ImageData {
                url: inner.image_url.clone(),
            }],
        })
    }

    async fn upload_file(&self, _path: &Path) -> Result<FileObject> {
        let mut inner = self.inner.lock().unwrap();
        inner.counts.upload_file += 1;
        inner.next_id += 1;
        Ok(FileObject {
            id: format!("file_{}", inner.next_id),
            filename: None,
            bytes: None,
        })
    }
}
