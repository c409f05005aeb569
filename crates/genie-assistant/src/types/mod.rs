pub mod image;
pub mod message;
pub mod objects;
pub mod run;
pub mod tool;

pub use image::{ImageData, ImageRequest, ImageResponse};
pub use message::{
    Attachment, CreateMessage, ImageFileRef, MessageContent, MessageQuery, Role, SortOrder,
    TextValue, ThreadMessage, Turn, TurnContent,
};
pub use objects::{Assistant, CreateAssistant, FileObject, Thread};
pub use run::{FunctionCall, RequiredAction, Run, RunStatus, SubmitToolOutputs, ToolCall, ToolOutput};
pub use tool::{generate_image_tool, FunctionSpec, ImageArgs, ImageStyle, ToolDefinition, GENERATE_IMAGE_FUNCTION};
