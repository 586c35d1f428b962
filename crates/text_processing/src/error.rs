//! Text processing errors

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TextProcessingError {
    #[error("Failed to read keyword file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse keyword table: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid keyword table: {0}")]
    InvalidTable(String),
}

pub type Result<T> = std::result::Result<T, TextProcessingError>;
