use thiserror::Error;

#[derive(Error, Debug)]
pub enum FichaError {
    #[error("Unknown field path: {0}")]
    UnknownPath(String),

    #[error("Field {path} is not a {expected} field")]
    KindMismatch { path: String, expected: &'static str },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),
}

pub type Result<T> = std::result::Result<T, FichaError>;
