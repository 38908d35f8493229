pub mod batch;
pub mod image_client;
pub mod prompt;
pub mod retry;

use crate::{
    config::GeminiConfig,
    error::{BgSwapError, Result},
    models::{BackgroundEditRequest, BatchOutcome},
};

pub use batch::{cancel_pair, CancelHandle, CancelToken, ImageGenerator, MAX_BATCH_SIZE};
pub use image_client::ImageClient;
pub use retry::Retrying;

/// Explicitly constructed client for the Gemini generateContent API. There
/// is no hidden global: callers build one from config and pass it around.
#[derive(Clone)]
pub struct GeminiClient {
    image_client: ImageClient,
}

impl GeminiClient {
    /// Build a client from configuration. A missing API key is fatal here,
    /// before any request can be constructed.
    pub fn new(config: GeminiConfig) -> Result<Self> {
        if config.api_key.as_deref().map_or(true, str::is_empty) {
            return Err(BgSwapError::ConfigError(
                "GEMINI_API_KEY is not set".into(),
            ));
        }

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| BgSwapError::ConfigError(e.to_string()))?;

        Ok(Self {
            image_client: ImageClient::new(http, config),
        })
    }

    pub fn image(&self) -> &ImageClient {
        &self.image_client
    }

    /// Fan out `count` independent sampling attempts for the same request
    /// and collect whatever images come back.
    pub async fn generate_batch(
        &self,
        request: &BackgroundEditRequest,
        count: usize,
        token: &CancelToken,
    ) -> BatchOutcome {
        batch::generate_batch(&self.image_client, request, count, token).await
    }
}
