//! Responder output

use serde::{Deserialize, Serialize};

use crate::flow::{FlowState, QuotationStep};
use crate::lead::LeadData;
use crate::message::{ButtonOption, ChatMessage};

/// What a flow responder produces for one turn
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BotResponse {
    pub messages: Vec<ChatMessage>,
    /// Options attached to the last message, mirrored for convenience
    #[serde(default)]
    pub options: Vec<ButtonOption>,
    /// Step to await next; `None` clears the step
    #[serde(default)]
    pub next_step: Option<QuotationStep>,
    /// Flow to move to; `None` keeps the current flow
    #[serde(default)]
    pub flow: Option<FlowState>,
    #[serde(default)]
    pub should_handoff: bool,
    #[serde(default)]
    pub captured_data: Option<LeadData>,
}

impl BotResponse {
    /// Single bot message without options
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            messages: vec![ChatMessage::bot(content)],
            ..Default::default()
        }
    }

    /// Single bot message carrying options
    pub fn with_options(content: impl Into<String>, options: Vec<ButtonOption>) -> Self {
        Self {
            messages: vec![ChatMessage::bot_with_options(content, options.clone())],
            options,
            ..Default::default()
        }
    }

    pub fn step(mut self, step: Option<QuotationStep>) -> Self {
        self.next_step = step;
        self
    }

    pub fn flow(mut self, flow: FlowState) -> Self {
        self.flow = Some(flow);
        self
    }

    pub fn handoff(mut self) -> Self {
        self.should_handoff = true;
        self
    }

    /// Prepend a message (e.g. an introductory line)
    pub fn preceded_by(mut self, message: ChatMessage) -> Self {
        self.messages.insert(0, message);
        self
    }

    pub fn has_options(&self) -> bool {
        !self.options.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_options_mirrors_last_message() {
        let response = BotResponse::with_options("elegí", vec![ButtonOption::new("a", "A")])
            .flow(FlowState::MainMenu);
        assert!(response.has_options());
        assert!(response.messages[0].has_options());
        assert_eq!(response.flow, Some(FlowState::MainMenu));
        assert_eq!(response.next_step, None);
    }

    #[test]
    fn test_preceded_by_keeps_order() {
        let response = BotResponse::text("segundo").preceded_by(ChatMessage::bot("primero"));
        assert_eq!(response.messages[0].content, "primero");
        assert_eq!(response.messages[1].content, "segundo");
    }
}
