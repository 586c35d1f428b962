//! WhatsApp click-to-chat integration
//!
//! Builds a pre-filled message from the captured lead and wraps it in a
//! `wa.me` link. Nothing is sent from the server; the visitor opens the link.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use lead_agent_config::constants::outbound;
use lead_agent_config::ChatbotConfig;
use lead_agent_core::LeadData;

use crate::{OutboundChannel, OutboundLink, ToolError};

/// Characters `encodeURIComponent` leaves untouched besides alphanumerics
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encode a query component
pub fn encode_component(text: &str) -> String {
    utf8_percent_encode(text, URI_COMPONENT).to_string()
}

/// Pre-filled message: greeting, one line per populated field, closing
pub fn compose_message(lead: &LeadData) -> String {
    let mut lines = vec![outbound::GREETING.to_string()];

    let guests = lead.guest_count.filter(|n| *n > 0).map(|n| n.to_string());
    let fields: [(&str, Option<&String>); 10] = [
        ("Nombre", lead.name.as_ref()),
        ("Tipo", lead.event_type.as_ref()),
        ("Fecha", lead.event_date.as_ref()),
        ("Ciudad/Zona", lead.city_zone.as_ref()),
        ("Invitados", guests.as_ref()),
        ("Lugar", lead.venue.as_ref()),
        ("Necesidad", lead.main_need.as_ref()),
        ("Estilo", lead.style.as_ref()),
        ("Presupuesto", lead.budget_range.as_ref()),
        ("Referencias", lead.references.as_ref()),
    ];

    for (label, value) in fields {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            lines.push(format!("{}: {}", label, value));
        }
    }

    lines.push(outbound::CLOSING.to_string());
    lines.join("\n")
}

/// WhatsApp destination
#[derive(Debug, Clone)]
pub struct WhatsAppChannel {
    number: String,
}

impl WhatsAppChannel {
    /// Destination must be digits only
    pub fn new(number: impl Into<String>) -> Result<Self, ToolError> {
        let number = number.into().trim().to_string();
        if number.is_empty() || !number.chars().all(|c| c.is_ascii_digit()) {
            return Err(ToolError::InvalidDestination(number));
        }
        Ok(Self { number })
    }

    pub fn from_config(config: &ChatbotConfig) -> Result<Self, ToolError> {
        Self::new(config.whatsapp_number.as_str())
    }

    pub fn number(&self) -> &str {
        &self.number
    }
}

impl OutboundChannel for WhatsAppChannel {
    fn name(&self) -> &'static str {
        "whatsapp"
    }

    fn build_link(&self, lead: &LeadData) -> Result<OutboundLink, ToolError> {
        let message = compose_message(lead);
        let url = format!(
            "{}/{}?text={}",
            outbound::BASE_URL,
            self.number,
            encode_component(&message)
        );
        tracing::debug!(channel = self.name(), lines = message.lines().count(), "Outbound link built");
        Ok(OutboundLink {
            channel: self.name().to_string(),
            url,
            message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_with_two_fields() {
        let lead = LeadData {
            event_type: Some("Casamiento".into()),
            event_date: Some("marzo 2026".into()),
            ..Default::default()
        };
        let message = compose_message(&lead);
        assert_eq!(
            message,
            "Hola Furnarius, quiero cotizar un evento.\nTipo: Casamiento\nFecha: marzo 2026\nGracias."
        );
        assert_eq!(message.lines().count(), 4);
    }

    #[test]
    fn test_message_field_order() {
        let lead = LeadData {
            references: Some("Ninguna".into()),
            name: Some("Ana".into()),
            guest_count: Some(120),
            budget_range: Some("Medio".into()),
            ..Default::default()
        };
        let lines: Vec<String> = compose_message(&lead).lines().map(String::from).collect();
        assert_eq!(
            lines,
            vec![
                "Hola Furnarius, quiero cotizar un evento.",
                "Nombre: Ana",
                "Invitados: 120",
                "Presupuesto: Medio",
                "Referencias: Ninguna",
                "Gracias.",
            ]
        );
    }

    #[test]
    fn test_distinct_leads_give_distinct_messages() {
        let a = LeadData {
            city_zone: Some("Rosario".into()),
            ..Default::default()
        };
        let b = LeadData {
            city_zone: Some("Funes".into()),
            ..Default::default()
        };
        assert_ne!(compose_message(&a), compose_message(&b));
    }

    #[test]
    fn test_encode_matches_uri_component() {
        assert_eq!(encode_component("Hola Furnarius."), "Hola%20Furnarius.");
        assert_eq!(encode_component("a\nb"), "a%0Ab");
        assert_eq!(encode_component("Salón"), "Sal%C3%B3n");
        assert_eq!(encode_component("(ok)!*'~_-"), "(ok)!*'~_-");
        assert_eq!(encode_component("a/b?c=d&e"), "a%2Fb%3Fc%3Dd%26e");
    }

    #[test]
    fn test_build_link() {
        let channel = WhatsAppChannel::new("5493411234567").unwrap();
        let link = channel.build_link(&LeadData::default()).unwrap();
        assert_eq!(
            link.url,
            "https://wa.me/5493411234567?text=Hola%20Furnarius%2C%20quiero%20cotizar%20un%20evento.%0AGracias."
        );
        assert_eq!(link.channel, "whatsapp");
    }

    #[test]
    fn test_invalid_destination() {
        assert!(matches!(
            WhatsAppChannel::new("+54 341"),
            Err(ToolError::InvalidDestination(_))
        ));
        assert!(WhatsAppChannel::new("").is_err());
        assert!(WhatsAppChannel::from_config(&ChatbotConfig::default()).is_ok());
    }
}
