//! Core types and traits for the lead qualification dialog
//!
//! This crate provides the types shared by every other crate:
//! - Intents, flows and quotation steps as closed enums
//! - Lead data and its value domains
//! - Chat messages, quick-reply options and responder output
//! - The conversation state and its persistence seam

pub mod error;
pub mod flow;
pub mod intent;
pub mod lead;
pub mod message;
pub mod response;
pub mod state;
pub mod traits;

pub use error::{CoreError, Result};
pub use flow::{FlowState, QuotationStep};
pub use intent::{Intent, IntentClassification};
pub use lead::{
    BudgetRange, ContactPreference, DecorStyle, EventType, HandoffField, LeadData, MainNeed,
    UrgencyLevel, VenueType,
};
pub use message::{ButtonOption, ChatMessage, MessageKind, OptionAction};
pub use response::BotResponse;
pub use state::{ChatState, CONTEXT_HANDOFF_STARTED, CONTEXT_SHOW_SUMMARY};
pub use traits::ChatStateStore;
