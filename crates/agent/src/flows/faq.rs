//! FAQ answers
//!
//! A message mentioning payments, booking or cancellations gets the matching
//! entry; anything else gets every configured entry at once. Unset entries
//! fall back to the escalation message.

use lead_agent_config::constants::faq;
use lead_agent_config::ChatbotConfig;
use lead_agent_core::{BotResponse, ButtonOption, FlowState, Intent};

use super::intent_option;

/// Topics with a dedicated answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaqTopic {
    Payments,
    Booking,
    Cancellations,
}

impl FaqTopic {
    /// Slug used in option ids
    pub fn as_str(&self) -> &'static str {
        match self {
            FaqTopic::Payments => "pagos",
            FaqTopic::Booking => "reservas",
            FaqTopic::Cancellations => "cancelaciones",
        }
    }

    /// Topic mentioned in the message, if any
    pub fn detect(text: &str) -> Option<Self> {
        let lower = text.to_lowercase();
        if lower.contains("pago") {
            Some(FaqTopic::Payments)
        } else if lower.contains("reserva") || lower.contains("seña") {
            Some(FaqTopic::Booking)
        } else if lower.contains("cancel") {
            Some(FaqTopic::Cancellations)
        } else {
            None
        }
    }

    fn heading(&self) -> &'static str {
        match self {
            FaqTopic::Payments => faq::TOPIC_PAYMENTS,
            FaqTopic::Booking => faq::TOPIC_BOOKING,
            FaqTopic::Cancellations => faq::TOPIC_CANCELLATIONS,
        }
    }

    fn answer<'a>(&self, config: &'a ChatbotConfig) -> Option<&'a str> {
        match self {
            FaqTopic::Payments => config.faq_payments(),
            FaqTopic::Booking => config.faq_booking(),
            FaqTopic::Cancellations => config.faq_cancellations(),
        }
    }
}

/// Topic answer when one is mentioned, otherwise the overview
pub fn respond(config: &ChatbotConfig, text: &str) -> BotResponse {
    let response = match FaqTopic::detect(text) {
        Some(topic) => topic_answer(config, topic),
        None => overview(config),
    };
    response.flow(FlowState::Faq)
}

/// Every configured entry
pub fn overview(config: &ChatbotConfig) -> BotResponse {
    let entries = [
        (faq::PAYMENTS, config.faq_payments()),
        (faq::BOOKING, config.faq_booking()),
        (faq::CANCELLATIONS, config.faq_cancellations()),
        (faq::LOGISTICS, config.faq_logistics()),
        (faq::COVERAGE, config.faq_coverage()),
        (faq::TIMING, config.faq_timing()),
    ];

    if entries.iter().all(|(_, value)| value.is_none()) {
        return not_loaded("faq");
    }

    let mut content = String::from(faq::HEADER);
    for (prefix, value) in entries {
        if let Some(value) = value {
            content.push_str(prefix);
            content.push_str(value);
        }
    }
    content.push_str(faq::CLOSING);

    let options = vec![
        intent_option("faq_asesor", faq::ADVISOR, "asesor", Intent::ContactoHumano),
        ButtonOption::new("faq_volver", faq::BACK_TO_MENU).with_value("menu"),
    ];
    BotResponse::with_options(content, options)
}

pub fn topic_answer(config: &ChatbotConfig, topic: FaqTopic) -> BotResponse {
    match topic.answer(config) {
        Some(answer) => BotResponse::text(format!("{}{}", topic.heading(), answer)),
        None => not_loaded(&format!("faq_{}", topic.as_str())),
    }
}

/// Escalation message with advisor / leave-details options
fn not_loaded(id_prefix: &str) -> BotResponse {
    let options = vec![
        intent_option(
            &format!("{}_asesor", id_prefix),
            faq::ADVISOR,
            "asesor",
            Intent::ContactoHumano,
        ),
        ButtonOption::new(format!("{}_whatsapp", id_prefix), faq::LEAVE_DETAILS)
            .with_value("whatsapp"),
    ];
    BotResponse::with_options(faq::NOT_LOADED, options)
}
