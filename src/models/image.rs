use serde::{Deserialize, Serialize};

use super::part::{GeneratedImage, GenerativePart};

/// The four independent enhancement toggles exposed by the editor UI.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct EnhancementFlags {
    pub keep_face: bool,
    pub smooth_skin: bool,
    pub remove_acne: bool,
    pub sharpen: bool,
}

/// One background-replacement request. The original image is required; the
/// prompt and the background reference are each optional, but at least one
/// of the two must be supplied.
#[derive(Debug, Clone)]
pub struct BackgroundEditRequest {
    pub original: GenerativePart,
    pub background: Option<GenerativePart>,
    pub prompt: String,
    pub flags: EnhancementFlags,
    pub model_id: Option<String>,
}

impl BackgroundEditRequest {
    pub fn new(original: GenerativePart) -> Self {
        Self {
            original,
            background: None,
            prompt: String::new(),
            flags: EnhancementFlags::default(),
            model_id: None,
        }
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    pub fn with_background(mut self, background: GenerativePart) -> Self {
        self.background = Some(background);
        self
    }

    pub fn with_flags(mut self, flags: EnhancementFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_model(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = Some(model_id.into());
        self
    }
}

/// Aggregated result of one generation batch. Images appear in the order
/// their requests were issued; calls that failed or came back without an
/// image are counted, not interleaved.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub images: Vec<GeneratedImage>,
    pub failed: usize,
    pub empty: usize,
    pub cancelled: bool,
}

impl BatchOutcome {
    /// A batch succeeds if at least one call produced an image. All-failed
    /// and all-empty both collapse into the single no-results condition.
    pub fn has_results(&self) -> bool {
        !self.images.is_empty()
    }
}
