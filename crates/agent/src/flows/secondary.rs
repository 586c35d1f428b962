//! Styles, availability and logistics flows

use lead_agent_config::constants::{faq, flows, menu};
use lead_agent_config::ChatbotConfig;
use lead_agent_core::{
    BotResponse, ButtonOption, DecorStyle, FlowState, Intent, LeadData, OptionAction,
    QuotationStep,
};

use super::intent_option;

/// Style question; the step stays on `estilo` so a pick is captured
pub fn styles() -> BotResponse {
    let option = |style: DecorStyle| ButtonOption::new(style.option_id(), style.label());
    let options = vec![
        option(DecorStyle::Minimalista),
        ButtonOption::new(DecorStyle::Boho.option_id(), "Cálido-Boho")
            .with_value(DecorStyle::Boho.label()),
        option(DecorStyle::Glam),
        option(DecorStyle::Romantico),
    ];

    BotResponse::with_options(flows::STYLES_QUESTION, options)
        .flow(FlowState::Styles)
        .step(Some(QuotationStep::Estilo))
}

/// Follow-up once a style was picked in the styles flow
pub fn style_confirmed() -> BotResponse {
    let options = vec![
        intent_option("style_cotizar", menu::QUOTE, "cotizar", Intent::Cotizacion),
        intent_option("style_asesor", menu::ADVISOR, "asesor", Intent::ContactoHumano),
    ];
    BotResponse::with_options(flows::STYLES_CONFIRMED, options).flow(FlowState::Styles)
}

/// Never promises a date; asks for what is missing or offers a follow-up
pub fn availability(lead: &LeadData) -> BotResponse {
    if !lead.has_minimum_for_handoff() {
        return BotResponse::text(flows::AVAILABILITY_MISSING).flow(FlowState::Availability);
    }

    let options = vec![
        ButtonOption::new("disp_whatsapp", flows::AVAILABILITY_WHATSAPP)
            .with_value("send_whatsapp")
            .with_action(OptionAction::OpenWhatsapp),
        intent_option(
            "disp_continuar",
            flows::AVAILABILITY_QUOTE_FIRST,
            "cotizar",
            Intent::Cotizacion,
        ),
    ];
    BotResponse::with_options(flows::AVAILABILITY_READY, options).flow(FlowState::Availability)
}

/// Coverage, logistics and timing, whichever is configured
pub fn logistics(config: &ChatbotConfig) -> BotResponse {
    let sections = [
        (faq::COVERAGE, config.coverage_cities()),
        (faq::LOGISTICS, config.faq_logistics()),
        (faq::TIMING, config.response_times()),
    ];

    if sections.iter().all(|(_, value)| value.is_none()) {
        let options = vec![
            intent_option(
                "log_asesor",
                flows::LOGISTICS_ADVISOR,
                "asesor",
                Intent::ContactoHumano,
            ),
            ButtonOption::new("log_whatsapp", flows::LOGISTICS_LEAVE_DETAILS).with_value("whatsapp"),
        ];
        return BotResponse::with_options(faq::NOT_LOADED, options).flow(FlowState::Logistics);
    }

    let mut content = String::from(flows::LOGISTICS_HEADER);
    for (prefix, value) in sections {
        if let Some(value) = value {
            content.push_str(prefix);
            content.push_str(value);
        }
    }
    content.push_str(flows::LOGISTICS_CLOSING);

    BotResponse::text(content).flow(FlowState::Logistics)
}
