//! Image-generation endpoint shapes.

use serde::{Deserialize, Serialize};

use super::tool::ImageStyle;

/// Payload for the image-generation endpoint. The size is always the
/// client's fixed resolution, never a model-supplied one.
#[derive(Debug, Clone, Serialize)]
pub struct ImageRequest {
    pub model: String,
    pub prompt: String,
    pub size: String,
    pub quality: String,
    pub style: ImageStyle,
    pub n: u8,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImageResponse {
    #[serde(default)]
    pub data: Vec<ImageData>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImageData {
    #[serde(default)]
    pub url: Option<String>,
}

impl ImageResponse {
    /// URL of the first generated image, if any.
    pub fn first_url(&self) -> Option<&str> {
        self.data.first().and_then(|d| d.url.as_deref())
    }
}
