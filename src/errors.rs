use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MapError {
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read file: {0}")]
    FileReadError(#[from] std::io::Error),

    #[error("Invalid JSON record: {0}")]
    InvalidRecord(#[from] serde_json::Error),

    #[error("Invalid bounding box '{raw}': {reason}")]
    InvalidBox { raw: String, reason: String },

    #[error("Annotation file has no usable tree: {0}")]
    MissingTree(PathBuf),

    #[error("No annotations found under: {0}")]
    NoAnnotations(PathBuf),

    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),

    #[error("Internal error: {0}")]
    InternalError(String),
}

pub type MapResult<T> = Result<T, MapError>;
