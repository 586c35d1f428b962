//! Lead qualification dialog
//!
//! Features:
//! - Step-by-step quotation flow with field capture
//! - Secondary flows: styles, availability, logistics, FAQ, general info
//! - Human handoff gated on a minimum set of lead fields
//! - Paced sessions with a simulated typing delay and broadcast events

pub mod capture;
pub mod engine;
pub mod flows;
pub mod selector;
pub mod session;
pub mod stage;

pub use engine::{DialogEngine, TurnInput, TurnOutcome};
pub use selector::{FixedSelector, MessageSelector, RandomSelector, SeededSelector};
pub use session::{ChatSession, SessionEvent};
pub use stage::QuotationSequencer;

use thiserror::Error;

/// Agent errors
#[derive(Error, Debug)]
pub enum AgentError {
    /// A turn arrived while the previous one was still being answered
    #[error("Session is busy answering the previous message")]
    Busy,

    #[error("Outbound channel error: {0}")]
    Outbound(#[from] lead_agent_tools::ToolError),

    #[error("Keyword table error: {0}")]
    Keywords(#[from] lead_agent_text_processing::TextProcessingError),
}

pub type Result<T> = std::result::Result<T, AgentError>;
