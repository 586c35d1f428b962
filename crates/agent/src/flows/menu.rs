//! Welcome, main menu, general info and fallback

use lead_agent_config::constants::{flows, menu, welcome, FALLBACK_MESSAGES};
use lead_agent_core::{BotResponse, ChatMessage, FlowState, Intent, QuotationStep};

use super::{event_type_options, intent_option, main_menu_options};
use crate::selector::MessageSelector;

/// Main-menu indices offered after a fallback: quote, styles, advisor
const FALLBACK_MENU_INDICES: [usize; 3] = [0, 1, 4];

/// Greeting pair; goes straight into the quotation flow
pub fn welcome() -> BotResponse {
    BotResponse::with_options(welcome::FOLLOW_UP, event_type_options())
        .preceded_by(ChatMessage::bot(welcome::MESSAGE))
        .flow(FlowState::Quotation)
        .step(Some(QuotationStep::TipoEvento))
}

pub fn back_to_menu() -> BotResponse {
    BotResponse::with_options(menu::BACK_TO_MENU, main_menu_options()).flow(FlowState::MainMenu)
}

/// Whether the raw text asks for the main menu
pub fn requests_menu(text: &str) -> bool {
    let lower = text.to_lowercase();
    menu::OVERRIDE_LITERALS
        .iter()
        .any(|literal| lower.contains(literal))
}

pub fn general_info() -> BotResponse {
    let options = vec![
        intent_option("gen_cotizar", flows::GENERAL_QUOTE, "cotizar", Intent::Cotizacion),
        intent_option(
            "gen_estilos",
            flows::GENERAL_STYLES,
            "estilos",
            Intent::CatalogoEstilos,
        ),
    ];
    BotResponse::with_options(flows::GENERAL_INFO, options)
}

/// Apology plus three main-menu shortcuts
pub fn fallback(selector: &dyn MessageSelector) -> BotResponse {
    let index = selector.select(FALLBACK_MESSAGES.len());
    let menu = main_menu_options();
    let options = FALLBACK_MENU_INDICES
        .iter()
        .filter_map(|i| menu.get(*i).cloned())
        .collect();
    BotResponse::with_options(FALLBACK_MESSAGES[index], options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selector::FixedSelector;

    #[test]
    fn test_welcome_pair() {
        let response = welcome();
        assert_eq!(response.messages.len(), 2);
        assert_eq!(response.messages[0].content, welcome::MESSAGE);
        assert!(!response.messages[0].has_options());
        assert_eq!(response.messages[1].options.as_ref().map(Vec::len), Some(5));
        assert_eq!(response.flow, Some(FlowState::Quotation));
        assert_eq!(response.next_step, Some(QuotationStep::TipoEvento));
    }

    #[test]
    fn test_back_to_menu_lists_all_options() {
        let response = back_to_menu();
        assert_eq!(response.options.len(), 5);
        assert_eq!(response.flow, Some(FlowState::MainMenu));
        assert_eq!(response.next_step, None);
    }

    #[test]
    fn test_menu_literals() {
        assert!(requests_menu("Volver"));
        assert!(requests_menu("quiero ver el MENU"));
        assert!(!requests_menu("Casamiento"));
    }

    #[test]
    fn test_fallback_options_and_message() {
        let response = fallback(&FixedSelector(2));
        assert_eq!(response.messages[0].content, FALLBACK_MESSAGES[2]);
        let ids: Vec<&str> = response.options.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, ["opt_cotizar", "opt_estilos", "opt_humano"]);
        assert_eq!(response.flow, None);
    }

    #[test]
    fn test_general_info_options() {
        let response = general_info();
        assert_eq!(response.options[1].intent, Some(Intent::CatalogoEstilos));
        assert_eq!(response.options[0].value, "cotizar");
    }
}
