use thiserror::Error;
use uuid::Uuid;

pub type Result<T> = std::result::Result<T, EmberError>;

#[derive(Error, Debug)]
pub enum EmberError {
    #[error("Player name cannot be empty")]
    EmptyName,

    #[error("Player not found: {0}")]
    PlayerNotFound(Uuid),

    #[error("Invalid stage: {0}")]
    InvalidStage(String),

    #[error("Invalid difficulty {0}: expected 1, 2 or 3")]
    InvalidDifficulty(u8),

    #[error("Content error: {0}")]
    Content(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Narration error: {0}")]
    Narration(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl EmberError {
    pub fn content(msg: impl Into<String>) -> Self {
        Self::Content(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    pub fn narration(msg: impl Into<String>) -> Self {
        Self::Narration(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
