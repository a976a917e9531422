use thiserror::Error;

#[derive(Error, Debug)]
pub enum TagscopeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON serialization/deserialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Project manifest error: {0}")]
    Manifest(String),
    #[error("File watcher error: {0}")]
    Watch(#[from] notify::Error),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<tokio::task::JoinError> for TagscopeError {
    fn from(err: tokio::task::JoinError) -> Self {
        TagscopeError::Internal(err.to_string())
    }
}

impl From<TagscopeError> for tagscope_api::ApiError {
    fn from(err: TagscopeError) -> Self {
        tagscope_api::ApiError::Internal(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TagscopeError>;
