use thiserror::Error;

#[derive(Error, Debug)]
pub enum CompactError {
    #[error("Unknown compression level: {0}")]
    UnknownLevel(String),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Invalid segment sequence: {0}")]
    InvalidSegments(String),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, CompactError>;
