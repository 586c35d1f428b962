//! Human handoff
//!
//! Once the visitor asks for a person the conversation stays here until they
//! pick another option. With event type, date and city known the outbound
//! channel is offered straight away; otherwise the missing fields are asked
//! for by name.

use lead_agent_config::constants::handoff;
use lead_agent_core::{
    BotResponse, ButtonOption, ChatMessage, FlowState, Intent, LeadData, OptionAction,
};

use super::intent_option;

/// Handoff predicate: explicit request or already handing off
pub fn should_handoff(intent: Intent, flow: FlowState) -> bool {
    intent == Intent::ContactoHumano || flow == FlowState::Handoff
}

/// Handoff turn; `first_entry` adds the introductory text
pub fn respond(lead: &LeadData, first_entry: bool) -> BotResponse {
    if lead.has_minimum_for_handoff() {
        return ready();
    }

    let response = BotResponse::text(missing_fields_prompt(lead));
    let response = if first_entry {
        response.preceded_by(ChatMessage::bot(format!(
            "{}\n\n{}",
            handoff::INITIATING,
            handoff::MISSING_DATA
        )))
    } else {
        response
    };

    response.flow(FlowState::Handoff).handoff()
}

/// Offer the outbound channel
pub fn ready() -> BotResponse {
    let options = vec![
        ButtonOption::new("handoff_whatsapp", handoff::CONTACT_WHATSAPP)
            .with_value("send_whatsapp")
            .with_action(OptionAction::OpenWhatsapp),
        intent_option(
            "handoff_cotizar",
            handoff::QUOTE_FIRST,
            "cotizar",
            Intent::Cotizacion,
        ),
    ];
    BotResponse::with_options(handoff::READY, options)
        .flow(FlowState::Handoff)
        .handoff()
}

/// "Para conectarte con un asesor, necesito que me digas: a, b."
pub fn missing_fields_prompt(lead: &LeadData) -> String {
    let missing: Vec<&str> = lead
        .missing_for_handoff()
        .iter()
        .map(|field| field.prompt_label())
        .collect();
    format!("{}{}.", handoff::MISSING_PREFIX, missing.join(", "))
}
