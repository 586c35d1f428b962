//! Flow responders
//!
//! Each responder is a pure function of the lead data and configuration that
//! returns a `BotResponse`. None of them fails: missing business content
//! degrades into an escalation message.

pub mod faq;
pub mod handoff;
pub mod menu;
pub mod quotation;
pub mod secondary;

use lead_agent_config::constants::menu as copy;
use lead_agent_core::{
    BudgetRange, ButtonOption, DecorStyle, EventType, Intent, MainNeed, VenueType,
};

/// Option that routes straight to an intent
pub(crate) fn intent_option(id: &str, label: &str, value: &str, intent: Intent) -> ButtonOption {
    ButtonOption::new(id, label)
        .with_value(value)
        .with_intent(intent)
}

/// The five main-menu options in display order
pub fn main_menu_options() -> Vec<ButtonOption> {
    vec![
        intent_option("opt_cotizar", copy::QUOTE, "cotizar", Intent::Cotizacion),
        intent_option("opt_estilos", copy::STYLES, "estilos", Intent::CatalogoEstilos),
        intent_option(
            "opt_disponibilidad",
            copy::AVAILABILITY,
            "disponibilidad",
            Intent::Disponibilidad,
        ),
        intent_option("opt_logistica", copy::LOGISTICS, "logistica", Intent::Logistica),
        intent_option("opt_humano", copy::ADVISOR, "asesor", Intent::ContactoHumano),
    ]
}

macro_rules! domain_options {
    ($($fn_name:ident => $domain:ty),+ $(,)?) => {
        $(
            pub fn $fn_name() -> Vec<ButtonOption> {
                <$domain>::ALL
                    .iter()
                    .map(|v| ButtonOption::new(v.option_id(), v.label()))
                    .collect()
            }
        )+
    };
}

domain_options!(
    event_type_options => EventType,
    venue_options => VenueType,
    need_options => MainNeed,
    style_options => DecorStyle,
    budget_options => BudgetRange,
);
