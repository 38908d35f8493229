pub mod config;
pub mod error;
pub mod gemini;
pub mod logger;
pub mod media;
pub mod models;

pub use config::{GeminiConfig, RetryPolicy};
pub use error::{BgSwapError, Result};
pub use gemini::{
    cancel_pair, CancelHandle, CancelToken, GeminiClient, ImageClient, ImageGenerator, Retrying,
    MAX_BATCH_SIZE,
};
pub use media::{part_from_bytes, part_from_file, strip_data_uri_prefix, ImageFile};
pub use models::{
    BackgroundEditRequest, BatchOutcome, EnhancementFlags, GeneratedImage, GenerativePart,
    InlineData,
};
