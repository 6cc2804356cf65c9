use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SnippetsError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid frontmatter in {}: {source}", .path.display())]
    Frontmatter {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Snippet not found: {0}")]
    SnippetNotFound(String),
}

pub type Result<T> = std::result::Result<T, SnippetsError>;
