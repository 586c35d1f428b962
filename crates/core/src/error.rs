//! Core error types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Unknown intent: {0}")]
    UnknownIntent(String),

    #[error("Unknown flow: {0}")]
    UnknownFlow(String),

    #[error("Unknown quotation step: {0}")]
    UnknownStep(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;
