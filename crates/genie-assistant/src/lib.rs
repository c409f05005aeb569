//! Client for the hosted assistant API.
//!
//! Translates local chat turns into remote calls: one persona per user
//! (lazily created, cached in the store), one thread per chat, and a
//! blocking poll loop per turn. The model may request local execution of
//! the `generate_image` function mid-run; outputs are submitted back in a
//! batch and polling resumes under the same deadline.

pub mod api;
pub mod config;
pub mod error;
pub mod http;
pub mod prompts;
pub mod service;
pub mod stub;
pub mod types;

pub use api::AssistantApi;
pub use config::AssistantConfig;
pub use error::{AssistantError, Result};
pub use http::HttpAssistantApi;
pub use service::{AssistantService, ExistenceCheck, TurnOutcome};
pub use stub::StubAssistantApi;
pub use types::{Role, Run, RunStatus, Turn, TurnContent};
