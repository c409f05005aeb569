//! Remote object shapes: personas, threads, uploaded files.

use serde::{Deserialize, Serialize};

use super::tool::ToolDefinition;

/// A remote persona.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assistant {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
}

/// Persona creation payload: fixed behavior prompt plus the fixed toolset.
#[derive(Debug, Clone, Serialize)]
pub struct CreateAssistant {
    pub model: String,
    pub name: String,
    pub instructions: String,
    pub tools: Vec<ToolDefinition>,
}

/// A remote conversation context. Created with no arguments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Thread {
    pub id: String,
}

/// A file uploaded for the code-execution tool's file set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileObject {
    pub id: String,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub bytes: Option<u64>,
}
