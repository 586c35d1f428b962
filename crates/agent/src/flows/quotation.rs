//! Quotation step responders
//!
//! One prompt per step. Closed-answer steps attach their value domain as
//! quick replies; `resumen` renders the lead summary.

use lead_agent_config::constants::quotation;
use lead_agent_core::{
    BotResponse, ButtonOption, FlowState, Intent, LeadData, OptionAction, QuotationStep,
};

use super::{budget_options, event_type_options, need_options, style_options, venue_options};

/// Prompt for `step`, positioned so the reply is captured into its field
pub fn step_response(step: QuotationStep, lead: &LeadData) -> BotResponse {
    let response = match step {
        QuotationStep::TipoEvento => {
            BotResponse::with_options(quotation::START, event_type_options())
        },
        QuotationStep::Fecha => BotResponse::text(quotation::FECHA),
        QuotationStep::Ciudad => BotResponse::text(quotation::CIUDAD),
        QuotationStep::Invitados => BotResponse::text(quotation::INVITADOS),
        QuotationStep::Lugar => BotResponse::with_options(quotation::LUGAR, venue_options()),
        QuotationStep::Necesidad => {
            BotResponse::with_options(quotation::NECESIDAD, need_options())
        },
        QuotationStep::Estilo => BotResponse::with_options(quotation::ESTILO, style_options()),
        QuotationStep::Referencias => {
            let skip = ButtonOption::new("ref_skip", quotation::SKIP_REFERENCES)
                .with_value(quotation::NO_REFERENCES);
            BotResponse::with_options(quotation::REFERENCIAS, vec![skip])
        },
        QuotationStep::Presupuesto => {
            BotResponse::with_options(quotation::PRESUPUESTO, budget_options())
        },
        QuotationStep::Resumen => return summary(lead),
        QuotationStep::Confirmacion => return confirmation(),
    };

    response
        .flow(FlowState::Quotation)
        .step(Some(step))
}

/// Summary of the lead with send / edit / advisor options
pub fn summary(lead: &LeadData) -> BotResponse {
    let content = format!(
        "{}\n\n{}\n\n{}",
        quotation::RESUMEN,
        lead.summary(),
        quotation::RESUMEN_CLOSING
    );
    let options = vec![
        ButtonOption::new("summary_send", quotation::SUMMARY_SEND)
            .with_value("send_whatsapp")
            .with_action(OptionAction::OpenWhatsapp),
        ButtonOption::new("summary_edit", quotation::SUMMARY_EDIT)
            .with_value("edit_data")
            .with_action(OptionAction::EditLead),
        ButtonOption::new("summary_asesor", quotation::SUMMARY_ADVISOR)
            .with_value("asesor")
            .with_intent(Intent::ContactoHumano),
    ];

    BotResponse::with_options(content, options)
        .flow(FlowState::Quotation)
        .step(Some(QuotationStep::Resumen))
}

/// Terminal step: the quotation is registered
pub fn confirmation() -> BotResponse {
    let options = vec![
        ButtonOption::new("confirm_whatsapp", quotation::SUMMARY_SEND)
            .with_value("send_whatsapp")
            .with_action(OptionAction::OpenWhatsapp),
        ButtonOption::new("confirm_summary", quotation::SHOW_SUMMARY)
            .with_value("show_summary")
            .with_action(OptionAction::ShowSummary),
        ButtonOption::new("confirm_menu", quotation::BACK_TO_MENU).with_value("menu"),
    ];

    BotResponse::with_options(quotation::CONFIRMACION, options)
        .flow(FlowState::Completed)
        .step(None)
}
