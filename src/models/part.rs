use serde::{Deserialize, Serialize};

/// One unit of multimodal input or output: either plain text or inline
/// base64-encoded binary data. Matches the Gemini REST wire shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GenerativePart {
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
    Text {
        text: String,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

impl GenerativePart {
    pub fn text(text: impl Into<String>) -> Self {
        GenerativePart::Text { text: text.into() }
    }

    pub fn inline(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        GenerativePart::InlineData {
            inline_data: InlineData {
                mime_type: mime_type.into(),
                data: data.into(),
            },
        }
    }

    pub fn as_inline(&self) -> Option<&InlineData> {
        match self {
            GenerativePart::InlineData { inline_data } => Some(inline_data),
            GenerativePart::Text { .. } => None,
        }
    }
}

/// One generated image artifact, self-contained and ready for display or
/// persistence without further decoding.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedImage {
    pub mime_type: String,
    pub data: String,
}

impl GeneratedImage {
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }
}
