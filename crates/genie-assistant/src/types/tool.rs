//! Tool definitions declared on the persona, and the arguments the model
//! supplies when calling the image function.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Name of the locally executed image function.
pub const GENERATE_IMAGE_FUNCTION: &str = "generate_image";

/// Tool declared on a persona.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ToolDefinition {
    /// Server-side code execution. Always declared.
    CodeInterpreter,
    /// A declared function the model may call, resolved locally.
    Function { function: FunctionSpec },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionSpec {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// JSON Schema for parameters.
    pub parameters: Value,
}

/// The `generate_image` function declaration.
///
/// The schema advertises a style choice but no size: output resolution is
/// fixed client-side regardless of what the model asks for.
pub fn generate_image_tool() -> ToolDefinition {
    ToolDefinition::Function {
        function: FunctionSpec {
            name: GENERATE_IMAGE_FUNCTION.to_string(),
            description: Some(
                "Generate an AI image in Standard size (1024x1024) only".to_string(),
            ),
            parameters: serde_json::json!({
                "type": "object",
                "properties": {
                    "prompt": {
                        "type": "string",
                        "description": "Detailed description of the image to generate"
                    },
                    "style": {
                        "type": "string",
                        "description": "Image style (vivid or natural)",
                        "enum": ["vivid", "natural"],
                        "default": "vivid"
                    }
                },
                "required": ["prompt"]
            }),
        },
    }
}

/// Arguments the model passes to `generate_image`.
///
/// Any size field the model invents is ignored by deserialization and the
/// fixed resolution is used instead.
#[derive(Debug, Clone, Deserialize)]
pub struct ImageArgs {
    pub prompt: String,
    #[serde(default)]
    pub style: Option<ImageStyle>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageStyle {
    Vivid,
    Natural,
}

impl Default for ImageStyle {
    fn default() -> Self {
        ImageStyle::Vivid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_interpreter_serialization() {
        let json = serde_json::to_value(ToolDefinition::CodeInterpreter).unwrap();
        assert_eq!(json, serde_json::json!({"type": "code_interpreter"}));
    }

    #[test]
    fn test_image_tool_declares_function_name() {
        let tool = generate_image_tool();
        match tool {
            ToolDefinition::Function { function } => {
                assert_eq!(function.name, GENERATE_IMAGE_FUNCTION);
            }
            _ => panic!("expected function tool"),
        }
    }

    #[test]
    fn test_image_args_ignore_model_supplied_size() {
        let args: ImageArgs = serde_json::from_str(
            r#"{"prompt": "a red fox", "style": "natural", "size": "4096x4096"}"#,
        )
        .unwrap();
        assert_eq!(args.prompt, "a red fox");
        assert_eq!(args.style, Some(ImageStyle::Natural));
    }
}
