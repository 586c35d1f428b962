//! Outbound channel integrations
//!
//! A channel turns the captured lead into something a human advisor can pick
//! up. The only channel today is a WhatsApp click-to-chat link.

pub mod whatsapp;

pub use whatsapp::{compose_message, encode_component, WhatsAppChannel};

use lead_agent_core::LeadData;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ToolError {
    #[error("Invalid outbound destination: '{0}'")]
    InvalidDestination(String),
}

/// Link handed to the visitor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundLink {
    pub channel: String,
    pub url: String,
    /// Plain-text message before encoding
    pub message: String,
}

/// Destination for a finished lead
pub trait OutboundChannel: Send + Sync {
    fn name(&self) -> &'static str;

    fn build_link(&self, lead: &LeadData) -> Result<OutboundLink, ToolError>;
}
