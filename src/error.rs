use thiserror::Error;

#[derive(Debug, Error)]
pub enum BgSwapError {
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Read error: {0}")]
    ReadError(String),
    #[error("Request error: {0}")]
    RequestError(String),
    #[error("Generation error: {0}")]
    GenerationError(String),
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

pub type Result<T> = std::result::Result<T, BgSwapError>;
