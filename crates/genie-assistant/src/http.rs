//! HTTP implementation of [`AssistantApi`] (direct, no SDK).

use std::path::Path;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::multipart;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::api::AssistantApi;
use crate::error::{AssistantError, Result};
use crate::types::{
    Assistant, CreateAssistant, CreateMessage, FileObject, ImageRequest, ImageResponse,
    MessageQuery, Run, Thread, ThreadMessage, ToolOutput,
};

const API_BASE: &str = "https://api.openai.com/v1";

/// Reqwest-backed client for the hosted assistant API.
pub struct HttpAssistantApi {
    http_client: reqwest::Client,
    base_url: String,
}

impl HttpAssistantApi {
    /// Create a new client with an API key.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();

        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", api_key))
                .map_err(|_| AssistantError::Api {
                    status: 0,
                    message: "Invalid API key format".to_string(),
                })?,
        );
        // Assistant/thread/run endpoints live behind the beta surface.
        headers.insert("OpenAI-Beta", HeaderValue::from_static("assistants=v2"));

        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http_client,
            base_url: API_BASE.to_string(),
        })
    }

    /// Point the client at a different base URL (proxies, test servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .http_client
            .post(self.url(path))
            .json(body)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn get_json<T: DeserializeOwned>(&self, url: String) -> Result<T> {
        let response = self.http_client.get(url).send().await?;
        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(AssistantError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response.json().await?)
    }
}

/// Listing envelope used by the messages endpoint.
#[derive(Debug, serde::Deserialize)]
struct ListEnvelope<T> {
    #[serde(default = "Vec::new")]
    data: Vec<T>,
}

#[async_trait]
impl AssistantApi for HttpAssistantApi {
    async fn create_assistant(&self, req: CreateAssistant) -> Result<Assistant> {
        self.post_json("/assistants", &req).await
    }

    async fn retrieve_assistant(&self, assistant_id: &str) -> Result<Assistant> {
        self.get_json(self.url(&format!("/assistants/{}", assistant_id)))
            .await
    }

    async fn create_thread(&self) -> Result<Thread> {
        self.post_json("/threads", &serde_json::json!({})).await
    }

    async fn create_message(&self, thread_id: &str, req: CreateMessage) -> Result<ThreadMessage> {
        self.post_json(&format!("/threads/{}/messages", thread_id), &req)
            .await
    }

    async fn list_messages(
        &self,
        thread_id: &str,
        query: MessageQuery,
    ) -> Result<Vec<ThreadMessage>> {
        let mut url = format!(
            "{}?order={}",
            self.url(&format!("/threads/{}/messages", thread_id)),
            query.order.as_str()
        );
        if let Some(limit) = query.limit {
            url.push_str(&format!("&limit={}", limit));
        }
        let envelope: ListEnvelope<ThreadMessage> = self.get_json(url).await?;
        Ok(envelope.data)
    }

    async fn create_run(&self, thread_id: &str, assistant_id: &str) -> Result<Run> {
        self.post_json(
            &format!("/threads/{}/runs", thread_id),
            &serde_json::json!({ "assistant_id": assistant_id }),
        )
        .await
    }

    async fn retrieve_run(&self, thread_id: &str, run_id: &str) -> Result<Run> {
        self.get_json(self.url(&format!("/threads/{}/runs/{}", thread_id, run_id)))
            .await
    }

    async fn submit_tool_outputs(
        &self,
        thread_id: &str,
        run_id: &str,
        outputs: Vec<ToolOutput>,
    ) -> Result<Run> {
        self.post_json(
            &format!("/threads/{}/runs/{}/submit_tool_outputs", thread_id, run_id),
            &serde_json::json!({ "tool_outputs": outputs }),
        )
        .await
    }

    async fn generate_image(&self, req: ImageRequest) -> Result<ImageResponse> {
        self.post_json("/images/generations", &req).await
    }

    async fn upload_file(&self, path: &Path) -> Result<FileObject> {
        let bytes = tokio::fs::read(path).await?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());

        let form = multipart::Form::new()
            .text("purpose", "assistants")
            .part("file", multipart::Part::bytes(bytes).file_name(filename));

        let response = self
            .http_client
            .post(self.url("/files"))
            .multipart(form)
            .send()
            .await?;
        Self::decode(response).await
    }
}
