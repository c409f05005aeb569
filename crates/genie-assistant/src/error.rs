use thiserror::Error;

/// Errors produced by the remote-assistant client.
#[derive(Error, Debug)]
pub enum AssistantError {
    /// Transport-level failure (connect, TLS, body read).
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The remote API answered with a non-success status.
    #[error("Remote API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Response body did not match the expected shape.
    #[error("Invalid response payload: {0}")]
    Payload(#[from] serde_json::Error),

    /// Local store failure while caching persona state.
    #[error("Store error: {0}")]
    Store(#[from] genie_store::StoreError),

    /// File I/O failure (uploads).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Persona retrieval kept failing transiently; the cached persona was
    /// NOT replaced.
    #[error("Persona could not be verified after {attempts} attempts: {source}")]
    PersonaUnverifiable {
        attempts: u32,
        #[source]
        source: Box<AssistantError>,
    },
}

impl AssistantError {
    /// True when the remote reports the referenced object as gone.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Api { status: 404 | 410, .. })
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, AssistantError>;
