//! Chat messages and quick-reply options

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::intent::Intent;

/// Who authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    User,
    Bot,
    System,
}

/// Special behaviour attached to a quick-reply option
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionAction {
    /// Hand the lead to the outbound messaging channel
    OpenWhatsapp,
    /// Render the lead summary card
    ShowSummary,
    /// Re-enter the quotation flow to fill one more field
    EditLead,
}

/// A presented choice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ButtonOption {
    pub id: String,
    pub label: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<Intent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<OptionAction>,
}

impl ButtonOption {
    /// Option whose value equals its label
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        let label = label.into();
        Self {
            id: id.into(),
            value: label.clone(),
            label,
            intent: None,
            action: None,
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    pub fn with_intent(mut self, intent: Intent) -> Self {
        self.intent = Some(intent);
        self
    }

    pub fn with_action(mut self, action: OptionAction) -> Self {
        self.action = Some(action);
        self
    }
}

/// One entry of the conversation history. Never mutated once appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: MessageKind,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<ButtonOption>>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl ChatMessage {
    fn create(kind: MessageKind, content: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            kind,
            content: content.into(),
            timestamp: Utc::now(),
            options: None,
            metadata: HashMap::new(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::create(MessageKind::User, content)
    }

    pub fn bot(content: impl Into<String>) -> Self {
        Self::create(MessageKind::Bot, content)
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::create(MessageKind::System, content)
    }

    /// Bot message carrying quick-reply options
    pub fn bot_with_options(content: impl Into<String>, options: Vec<ButtonOption>) -> Self {
        let mut message = Self::bot(content);
        if !options.is_empty() {
            message.options = Some(options);
        }
        message
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    pub fn is_bot(&self) -> bool {
        self.kind == MessageKind::Bot
    }

    pub fn has_options(&self) -> bool {
        self.options.as_ref().is_some_and(|o| !o.is_empty())
    }
}
