//! Business content the dialog reads
//!
//! Every optional string may be left unset while the owner gathers the
//! information. Empty strings count as unset so a blank YAML entry never
//! renders as an empty answer.

use serde::{Deserialize, Serialize};

use crate::constants::business;
use crate::ConfigError;

/// Business-specific content and outbound destination
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatbotConfig {
    /// Outbound destination (digits only, international format without '+')
    #[serde(default = "default_whatsapp_number")]
    pub whatsapp_number: String,

    /// Display name of the human-advisor persona
    #[serde(default = "default_advisor_name")]
    pub advisor_name: String,

    #[serde(default)]
    pub coverage_cities: Option<String>,
    #[serde(default)]
    pub response_times: Option<String>,
    #[serde(default)]
    pub catalog_link: Option<String>,
    #[serde(default)]
    pub instagram_link: Option<String>,

    #[serde(default)]
    pub faq_payments: Option<String>,
    #[serde(default)]
    pub faq_booking: Option<String>,
    #[serde(default)]
    pub faq_cancellations: Option<String>,
    #[serde(default)]
    pub faq_logistics: Option<String>,
    #[serde(default)]
    pub faq_coverage: Option<String>,
    #[serde(default)]
    pub faq_timing: Option<String>,
}

fn default_whatsapp_number() -> String {
    business::DEFAULT_WHATSAPP_NUMBER.to_string()
}

fn default_advisor_name() -> String {
    business::DEFAULT_ADVISOR_NAME.to_string()
}

impl Default for ChatbotConfig {
    fn default() -> Self {
        Self {
            whatsapp_number: default_whatsapp_number(),
            advisor_name: default_advisor_name(),
            coverage_cities: None,
            response_times: None,
            catalog_link: None,
            instagram_link: None,
            faq_payments: None,
            faq_booking: None,
            faq_cancellations: None,
            faq_logistics: None,
            faq_coverage: None,
            faq_timing: None,
        }
    }
}

fn configured(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl ChatbotConfig {
    pub fn coverage_cities(&self) -> Option<&str> {
        configured(&self.coverage_cities)
    }

    pub fn response_times(&self) -> Option<&str> {
        configured(&self.response_times)
    }

    pub fn catalog_link(&self) -> Option<&str> {
        configured(&self.catalog_link)
    }

    pub fn instagram_link(&self) -> Option<&str> {
        configured(&self.instagram_link)
    }

    pub fn faq_payments(&self) -> Option<&str> {
        configured(&self.faq_payments)
    }

    pub fn faq_booking(&self) -> Option<&str> {
        configured(&self.faq_booking)
    }

    pub fn faq_cancellations(&self) -> Option<&str> {
        configured(&self.faq_cancellations)
    }

    pub fn faq_logistics(&self) -> Option<&str> {
        configured(&self.faq_logistics)
    }

    pub fn faq_coverage(&self) -> Option<&str> {
        configured(&self.faq_coverage)
    }

    pub fn faq_timing(&self) -> Option<&str> {
        configured(&self.faq_timing)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let number = self.whatsapp_number.trim();
        if number.is_empty() {
            return Err(ConfigError::MissingField("chatbot.whatsapp_number".to_string()));
        }
        if !number.chars().all(|c| c.is_ascii_digit()) {
            return Err(ConfigError::InvalidValue {
                field: "chatbot.whatsapp_number".to_string(),
                message: format!("Must contain only digits, got '{}'", number),
            });
        }
        if self.advisor_name.trim().is_empty() {
            return Err(ConfigError::MissingField("chatbot.advisor_name".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ChatbotConfig::default();
        assert_eq!(config.whatsapp_number, "1111111111");
        assert_eq!(config.advisor_name, "Equipo Furnarius");
        assert!(config.faq_payments().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_strings_count_as_unset() {
        let config = ChatbotConfig {
            faq_booking: Some("   ".to_string()),
            faq_payments: Some("Transferencia o efectivo".to_string()),
            ..Default::default()
        };
        assert!(config.faq_booking().is_none());
        assert_eq!(config.faq_payments(), Some("Transferencia o efectivo"));
    }

    #[test]
    fn test_destination_must_be_digits() {
        let mut config = ChatbotConfig::default();
        config.whatsapp_number = "+54 9 341".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { .. })
        ));

        config.whatsapp_number = String::new();
        assert!(matches!(config.validate(), Err(ConfigError::MissingField(_))));
    }
}
