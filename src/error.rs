use thiserror::Error;

/// Failures inside a storage backend.
///
/// These never reach the HTTP layer: `load` turns them into the empty
/// document and `save` into `false`.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Base64 decode error: {0}")]
    Decode(#[from] base64::DecodeError),

    #[error("Unexpected status {status} from {url}")]
    Status { status: u16, url: String },

    #[error("Missing content: {0}")]
    MissingContent(String),

    #[error("{path} is too large for the contents API")]
    TooLarge { path: String },

    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("Missing credentials")]
    MissingCredentials,
}

pub type Result<T> = std::result::Result<T, StorageError>;
