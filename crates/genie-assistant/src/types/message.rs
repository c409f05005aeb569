//! Thread messages: wire shapes and the normalized [`Turn`] the rest of
//! the system consumes.
//!
//! The remote API returns heterogeneous content parts per message. One
//! normalization step at this boundary flattens them into a closed tagged
//! union; nothing downstream inspects wire shapes.

use serde::{Deserialize, Serialize};

/// Message role on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// A message as returned by the remote thread.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreadMessage {
    pub id: String,
    pub role: Role,
    #[serde(default)]
    pub content: Vec<MessageContent>,
    #[serde(default)]
    pub created_at: i64,
}

impl ThreadMessage {
    /// Normalize into a [`Turn`]. Unknown content kinds are dropped.
    pub fn into_turn(self) -> Turn {
        let content = self
            .content
            .into_iter()
            .filter_map(|part| match part {
                MessageContent::Text { text } => Some(TurnContent::Text(text.value)),
                MessageContent::ImageFile { image_file } => {
                    Some(TurnContent::ImageRef(image_file.file_id))
                }
                MessageContent::ImageUrl { image_url } => {
                    Some(TurnContent::ImageRef(image_url.url))
                }
                MessageContent::Unknown => None,
            })
            .collect();

        Turn {
            role: self.role,
            content,
            created_at: self.created_at,
        }
    }
}

/// One content part of a wire message.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessageContent {
    Text { text: TextValue },
    ImageFile { image_file: ImageFileRef },
    ImageUrl { image_url: ImageUrlRef },
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextValue {
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageFileRef {
    pub file_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageUrlRef {
    pub url: String,
}

// ---------------------------------------------------------------------------
// Normalized representation
// ---------------------------------------------------------------------------

/// One normalized content segment: plain text or a reference to an image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnContent {
    Text(String),
    ImageRef(String),
}

/// A normalized turn of the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: Vec<TurnContent>,
    pub created_at: i64,
}

impl Turn {
    /// Build a synthetic user turn (used when echoing local input).
    pub fn user_text(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: vec![TurnContent::Text(text.into())],
            created_at: 0,
        }
    }

    /// Build a synthetic assistant turn (used for in-band error replies).
    pub fn assistant_text(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: vec![TurnContent::Text(text.into())],
            created_at: 0,
        }
    }

    /// Concatenated text segments. Image references are not flattened into
    /// the text; fetch them via [`Turn::image_refs`].
    pub fn text(&self) -> String {
        let mut out = String::new();
        for part in &self.content {
            if let TurnContent::Text(t) = part {
                out.push_str(t);
            }
        }
        out
    }

    /// Image references carried by this turn.
    pub fn image_refs(&self) -> impl Iterator<Item = &str> {
        self.content.iter().filter_map(|part| match part {
            TurnContent::ImageRef(r) => Some(r.as_str()),
            TurnContent::Text(_) => None,
        })
    }
}

// ---------------------------------------------------------------------------
// Request shapes
// ---------------------------------------------------------------------------

/// Payload for appending a user turn to a thread.
#[derive(Debug, Clone, Serialize)]
pub struct CreateMessage {
    pub role: Role,
    pub content: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
}

impl CreateMessage {
    /// A user turn, optionally attaching uploaded files to the
    /// code-execution tool's file set.
    pub fn user(content: impl Into<String>, file_ids: &[String]) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            attachments: file_ids
                .iter()
                .map(|id| Attachment {
                    file_id: id.clone(),
                    tools: vec![AttachmentTool::code_interpreter()],
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Attachment {
    pub file_id: String,
    pub tools: Vec<AttachmentTool>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AttachmentTool {
    #[serde(rename = "type")]
    pub tool_type: String,
}

impl AttachmentTool {
    pub fn code_interpreter() -> Self {
        Self {
            tool_type: "code_interpreter".to_string(),
        }
    }
}

/// Listing parameters for thread messages.
#[derive(Debug, Clone, Copy)]
pub struct MessageQuery {
    pub order: SortOrder,
    pub limit: Option<u32>,
}

impl MessageQuery {
    /// Full history, chronological.
    pub fn chronological() -> Self {
        Self {
            order: SortOrder::Asc,
            limit: None,
        }
    }

    /// Just the newest message.
    pub fn latest() -> Self {
        Self {
            order: SortOrder::Desc,
            limit: Some(1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wire_message(json: &str) -> ThreadMessage {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_normalization_flattens_text_segments() {
        let msg = wire_message(
            r#"{
                "id": "msg_1",
                "role": "assistant",
                "created_at": 100,
                "content": [
                    {"type": "text", "text": {"value": "Hello "}},
                    {"type": "text", "text": {"value": "world"}}
                ]
            }"#,
        );
        let turn = msg.into_turn();
        assert_eq!(turn.text(), "Hello world");
    }

    #[test]
    fn test_normalization_side_channels_images() {
        let msg = wire_message(
            r#"{
                "id": "msg_1",
                "role": "assistant",
                "created_at": 100,
                "content": [
                    {"type": "text", "text": {"value": "Here you go"}},
                    {"type": "image_file", "image_file": {"file_id": "file_9"}}
                ]
            }"#,
        );
        let turn = msg.into_turn();
        assert_eq!(turn.text(), "Here you go");
        let refs: Vec<_> = turn.image_refs().collect();
        assert_eq!(refs, vec!["file_9"]);
    }

    #[test]
    fn test_normalization_drops_unknown_parts() {
        let msg = wire_message(
            r#"{
                "id": "msg_1",
                "role": "user",
                "created_at": 100,
                "content": [
                    {"type": "refusal", "refusal": "no"},
                    {"type": "text", "text": {"value": "hi"}}
                ]
            }"#,
        );
        let turn = msg.into_turn();
        assert_eq!(turn.content.len(), 1);
        assert_eq!(turn.text(), "hi");
    }

    #[test]
    fn test_create_message_attaches_files_for_code_interpreter() {
        let req = CreateMessage::user("run this", &["file_1".to_string()]);
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["attachments"][0]["file_id"], "file_1");
        assert_eq!(json["attachments"][0]["tools"][0]["type"], "code_interpreter");
    }

    #[test]
    fn test_create_message_without_files_omits_attachments() {
        let req = CreateMessage::user("hi", &[]);
        let json = serde_json::to_value(&req).unwrap();
        assert!(json.get("attachments").is_none());
    }
}
