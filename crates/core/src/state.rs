//! Conversation state owned by one session

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::flow::{FlowState, QuotationStep};
use crate::intent::Intent;
use crate::lead::LeadData;
use crate::message::{ButtonOption, ChatMessage};

/// Context key set when the summary card was explicitly requested
pub const CONTEXT_SHOW_SUMMARY: &str = "show_summary";
/// Context key set once the handoff entry text has been shown
pub const CONTEXT_HANDOFF_STARTED: &str = "handoff_started";

/// Full state of one conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatState {
    #[serde(default)]
    pub current_flow: FlowState,
    /// Quotation step whose answer is awaited
    #[serde(default)]
    pub current_step: Option<QuotationStep>,
    #[serde(default)]
    pub lead_data: LeadData,
    #[serde(default)]
    pub conversation_history: Vec<ChatMessage>,
    #[serde(default)]
    pub last_intent: Option<Intent>,
    /// False only while a turn is being computed
    #[serde(default = "default_awaiting_input")]
    pub awaiting_input: bool,
    /// Flow-specific scratch data
    #[serde(default)]
    pub context: HashMap<String, serde_json::Value>,
}

fn default_awaiting_input() -> bool {
    true
}

impl Default for ChatState {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatState {
    pub fn new() -> Self {
        Self {
            current_flow: FlowState::Idle,
            current_step: None,
            lead_data: LeadData::default(),
            conversation_history: Vec::new(),
            last_intent: None,
            awaiting_input: true,
            context: HashMap::new(),
        }
    }

    /// Append a message, dropping the oldest ones beyond `max_history`
    pub fn push_message(&mut self, message: ChatMessage, max_history: usize) {
        self.conversation_history.push(message);
        if self.conversation_history.len() > max_history {
            let excess = self.conversation_history.len() - max_history;
            self.conversation_history.drain(..excess);
        }
    }

    pub fn push_messages(
        &mut self,
        messages: impl IntoIterator<Item = ChatMessage>,
        max_history: usize,
    ) {
        for message in messages {
            self.push_message(message, max_history);
        }
    }

    pub fn last_message(&self) -> Option<&ChatMessage> {
        self.conversation_history.last()
    }

    /// Options to render: only when the last message is a bot message with
    /// options and input is awaited
    pub fn quick_options(&self) -> Vec<ButtonOption> {
        if !self.awaiting_input {
            return Vec::new();
        }
        self.last_message()
            .filter(|m| m.is_bot())
            .and_then(|m| m.options.clone())
            .unwrap_or_default()
    }

    pub fn context_flag(&self, key: &str) -> bool {
        self.context
            .get(key)
            .and_then(serde_json::Value::as_bool)
            .unwrap_or(false)
    }

    pub fn set_context_flag(&mut self, key: &str, value: bool) {
        if value {
            self.context.insert(key.to_string(), serde_json::Value::Bool(true));
        } else {
            self.context.remove(key);
        }
    }

    /// Summary card is shown only inside the quotation flow after an explicit request
    pub fn show_summary_card(&self) -> bool {
        self.current_flow == FlowState::Quotation && self.context_flag(CONTEXT_SHOW_SUMMARY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::ButtonOption;

    #[test]
    fn test_new_state() {
        let state = ChatState::new();
        assert_eq!(state.current_flow, FlowState::Idle);
        assert!(state.awaiting_input);
        assert!(state.conversation_history.is_empty());
    }

    #[test]
    fn test_history_trimmed_from_front() {
        let mut state = ChatState::new();
        for i in 0..15 {
            state.push_message(ChatMessage::user(format!("m{}", i)), 10);
        }
        assert_eq!(state.conversation_history.len(), 10);
        assert_eq!(state.conversation_history[0].content, "m5");
        assert_eq!(state.last_message().unwrap().content, "m14");
    }

    #[test]
    fn test_quick_options_require_gate_and_bot_message() {
        let mut state = ChatState::new();
        state.push_message(
            ChatMessage::bot_with_options("elegí", vec![ButtonOption::new("a", "A")]),
            100,
        );
        assert_eq!(state.quick_options().len(), 1);

        state.awaiting_input = false;
        assert!(state.quick_options().is_empty());

        state.awaiting_input = true;
        state.push_message(ChatMessage::user("A"), 100);
        assert!(state.quick_options().is_empty());
    }

    #[test]
    fn test_summary_card_only_in_quotation() {
        let mut state = ChatState::new();
        state.set_context_flag(CONTEXT_SHOW_SUMMARY, true);
        assert!(!state.show_summary_card());
        state.current_flow = FlowState::Quotation;
        assert!(state.show_summary_card());
        state.set_context_flag(CONTEXT_SHOW_SUMMARY, false);
        assert!(!state.show_summary_card());
    }

    #[test]
    fn test_restored_state_defaults_gate_open() {
        let state: ChatState = serde_json::from_str(r#"{"current_flow":"faq_flow"}"#).unwrap();
        assert_eq!(state.current_flow, FlowState::Faq);
        assert!(state.awaiting_input);
    }
}
