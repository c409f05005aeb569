//! Client configuration.

use std::time::Duration;

/// Tuning knobs for the assistant client.
///
/// The image size is fixed: the remote model may ask for other sizes via
/// tool-call arguments, but the client always renders 1024x1024.
#[derive(Debug, Clone)]
pub struct AssistantConfig {
    /// Chat model backing the persona.
    pub model: String,
    /// Image model used to resolve `generate_image` calls.
    pub image_model: String,
    /// Fixed output resolution for generated images.
    pub image_size: String,
    /// Delay between run status checks.
    pub poll_interval: Duration,
    /// Wall-clock budget for one turn, shared by polling and tool
    /// resolution.
    pub run_timeout: Duration,
    /// How many times a transiently failing persona lookup is retried
    /// before the error propagates.
    pub persona_check_retries: u32,
    /// Delay between persona lookup retries.
    pub persona_retry_backoff: Duration,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            image_model: "dall-e-3".to_string(),
            image_size: "1024x1024".to_string(),
            poll_interval: Duration::from_secs(2),
            run_timeout: Duration::from_secs(60),
            persona_check_retries: 2,
            persona_retry_backoff: Duration::from_millis(500),
        }
    }
}

impl AssistantConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn image_model(mut self, model: impl Into<String>) -> Self {
        self.image_model = model.into();
        self
    }

    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn run_timeout(mut self, timeout: Duration) -> Self {
        self.run_timeout = timeout;
        self
    }

    pub fn persona_check_retries(mut self, retries: u32) -> Self {
        self.persona_check_retries = retries;
        self
    }

    pub fn persona_retry_backoff(mut self, backoff: Duration) -> Self {
        self.persona_retry_backoff = backoff;
        self
    }
}
