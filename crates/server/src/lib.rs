//! Lead Agent Server
//!
//! HTTP JSON endpoints driving one paced chat session per visitor.

pub mod http;
pub mod metrics;
pub mod session;
pub mod state;

pub use http::create_router;
pub use metrics::{init_metrics, record_session_created, record_turn};
pub use session::{SessionManager, SessionSnapshot, SharedSession, TurnResponse};
pub use state::AppState;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use lead_agent_agent::AgentError;
use thiserror::Error;

/// Server errors
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    /// The session's previous turn is still being answered
    #[error("Session {0} is busy")]
    Busy(String),

    #[error("Session limit reached ({0})")]
    Capacity(usize),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::SessionNotFound(_) => StatusCode::NOT_FOUND,
            ServerError::Busy(_) => StatusCode::CONFLICT,
            ServerError::Capacity(_) => StatusCode::SERVICE_UNAVAILABLE,
            ServerError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ServerError> for StatusCode {
    fn from(err: ServerError) -> Self {
        err.status()
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

impl ServerError {
    /// Map a rejected turn for session `id`
    pub fn from_agent(id: &str, err: AgentError) -> Self {
        match err {
            AgentError::Busy => ServerError::Busy(id.to_string()),
            other => ServerError::Internal(other.to_string()),
        }
    }
}
