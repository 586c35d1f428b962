//! Data capture rules
//!
//! Maps a visitor reply onto the lead field asked at the current step. The
//! mapping is driven by the step alone, never by the classified intent, so
//! "somos 50" is a guest count at `invitados` and a city at `ciudad`.

use lead_agent_config::constants::quotation;
use lead_agent_core::{LeadData, QuotationStep};
use lead_agent_text_processing::ExtractedEntities;
use once_cell::sync::Lazy;
use regex::Regex;

/// "me llamo Ana" / "soy Ana Pérez"
static NAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:me llamo|soy)\s+([a-záéíóúñ\s]+)").unwrap());

/// Partial lead data for one reply
///
/// Never fails. Steps without a field only look for a self-introduction.
/// Urgency is taken whenever the extractor found one.
pub fn capture(
    text: &str,
    step: Option<QuotationStep>,
    entities: &ExtractedEntities,
) -> LeadData {
    let raw = text.trim();
    let mut partial = LeadData::default();

    match step {
        Some(QuotationStep::TipoEvento) => partial.event_type = non_empty(raw),
        Some(QuotationStep::Fecha) => {
            partial.event_date = entities.approximate_date().or_else(|| non_empty(raw));
        },
        Some(QuotationStep::Ciudad) => partial.city_zone = non_empty(raw),
        Some(QuotationStep::Invitados) => {
            partial.guest_count = entities.number.filter(|n| *n > 0);
        },
        Some(QuotationStep::Lugar) => partial.venue = non_empty(raw),
        Some(QuotationStep::Necesidad) => partial.main_need = non_empty(raw),
        Some(QuotationStep::Estilo) => partial.style = non_empty(raw),
        Some(QuotationStep::Referencias) => {
            partial.references =
                Some(non_empty(raw).unwrap_or_else(|| quotation::NO_REFERENCES.to_string()));
        },
        Some(QuotationStep::Presupuesto) => partial.budget_range = non_empty(raw),
        Some(QuotationStep::Resumen) | Some(QuotationStep::Confirmacion) | None => {
            partial.name = extract_name(raw);
        },
    }

    partial.urgency = entities.urgency;

    if !partial.is_empty() {
        tracing::debug!(step = ?step.map(|s| s.as_str()), "Lead data captured");
    }
    partial
}

/// Name following "me llamo" or "soy"
pub fn extract_name(text: &str) -> Option<String> {
    NAME_PATTERN
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|name| !name.is_empty())
}

fn non_empty(text: &str) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lead_agent_core::UrgencyLevel;
    use lead_agent_text_processing::EntityExtractor;

    fn run(text: &str, step: Option<QuotationStep>) -> LeadData {
        let entities = EntityExtractor::new().extract(text);
        capture(text, step, &entities)
    }

    #[test]
    fn test_capture_is_step_scoped() {
        let lead = run("somos 50", Some(QuotationStep::Invitados));
        assert_eq!(lead.guest_count, Some(50));
        assert!(lead.city_zone.is_none());

        let lead = run("somos 50", Some(QuotationStep::Ciudad));
        assert_eq!(lead.city_zone.as_deref(), Some("somos 50"));
        assert!(lead.guest_count.is_none());
    }

    #[test]
    fn test_guest_count_needs_a_number() {
        let lead = run("muchos", Some(QuotationStep::Invitados));
        assert!(lead.guest_count.is_none());
        assert!(lead.is_empty());

        let lead = run("0", Some(QuotationStep::Invitados));
        assert!(lead.guest_count.is_none());
    }

    #[test]
    fn test_date_prefers_entities() {
        let lead = run("marzo 2026", Some(QuotationStep::Fecha));
        assert_eq!(lead.event_date.as_deref(), Some("marzo 2026"));

        let lead = run("en octubre", Some(QuotationStep::Fecha));
        assert_eq!(lead.event_date.as_deref(), Some("octubre"));

        let lead = run("15/11", Some(QuotationStep::Fecha));
        assert_eq!(lead.event_date.as_deref(), Some("15/11"));
    }

    #[test]
    fn test_raw_text_steps() {
        assert_eq!(
            run("Casamiento", Some(QuotationStep::TipoEvento)).event_type.as_deref(),
            Some("Casamiento")
        );
        assert_eq!(run("Salón", Some(QuotationStep::Lugar)).venue.as_deref(), Some("Salón"));
        assert_eq!(
            run("Mobiliario", Some(QuotationStep::Necesidad)).main_need.as_deref(),
            Some("Mobiliario")
        );
        assert_eq!(run("Boho", Some(QuotationStep::Estilo)).style.as_deref(), Some("Boho"));
        assert_eq!(
            run("Medio", Some(QuotationStep::Presupuesto)).budget_range.as_deref(),
            Some("Medio")
        );
    }

    #[test]
    fn test_empty_references_means_none() {
        let lead = run("   ", Some(QuotationStep::Referencias));
        assert_eq!(lead.references.as_deref(), Some("Ninguna"));

        let lead = run("https://pinterest.com/x", Some(QuotationStep::Referencias));
        assert_eq!(lead.references.as_deref(), Some("https://pinterest.com/x"));
    }

    #[test]
    fn test_name_without_step() {
        let lead = run("Hola, me llamo Ana Pérez", None);
        assert_eq!(lead.name.as_deref(), Some("Ana Pérez"));

        let lead = run("SOY Martín", Some(QuotationStep::Resumen));
        assert_eq!(lead.name.as_deref(), Some("Martín"));

        let lead = run("quiero info", None);
        assert!(lead.is_empty());
    }

    #[test]
    fn test_name_ignored_inside_question_steps() {
        let lead = run("soy Ana", Some(QuotationStep::Ciudad));
        assert!(lead.name.is_none());
        assert_eq!(lead.city_zone.as_deref(), Some("soy Ana"));
    }

    #[test]
    fn test_urgency_always_captured() {
        let lead = run("cuanto antes, en Rosario", Some(QuotationStep::Ciudad));
        assert_eq!(lead.urgency, Some(UrgencyLevel::Alta));
        assert_eq!(lead.city_zone.as_deref(), Some("cuanto antes, en Rosario"));

        let lead = run("solo averiguando", None);
        assert_eq!(lead.urgency, Some(UrgencyLevel::Baja));
        assert!(lead.name.is_none());
    }
}
