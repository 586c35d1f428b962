//! Entity extraction
//!
//! Pulls the few structured values the quotation flow needs out of free text:
//! - `number`: first run of ASCII digits (guest count)
//! - `month`: first Spanish month name
//! - `year`: first "20xx"
//! - `urgency`: first urgency level whose phrases match, checked alta → media → baja
//!
//! All rules are independent; none of them fails.

use lead_agent_core::UrgencyLevel;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::intent::UrgencyKeywords;
use crate::KeywordConfig;

static NUMBER_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]+").unwrap());

static YEAR_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"20[0-9]{2}").unwrap());

/// Spanish month names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Month {
    Enero,
    Febrero,
    Marzo,
    Abril,
    Mayo,
    Junio,
    Julio,
    Agosto,
    Septiembre,
    Octubre,
    Noviembre,
    Diciembre,
}

impl Month {
    pub const ALL: [Month; 12] = [
        Month::Enero,
        Month::Febrero,
        Month::Marzo,
        Month::Abril,
        Month::Mayo,
        Month::Junio,
        Month::Julio,
        Month::Agosto,
        Month::Septiembre,
        Month::Octubre,
        Month::Noviembre,
        Month::Diciembre,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Month::Enero => "enero",
            Month::Febrero => "febrero",
            Month::Marzo => "marzo",
            Month::Abril => "abril",
            Month::Mayo => "mayo",
            Month::Junio => "junio",
            Month::Julio => "julio",
            Month::Agosto => "agosto",
            Month::Septiembre => "septiembre",
            Month::Octubre => "octubre",
            Month::Noviembre => "noviembre",
            Month::Diciembre => "diciembre",
        }
    }

    /// 1-based month number
    pub fn number(&self) -> u8 {
        Month::ALL.iter().position(|m| m == self).map_or(0, |i| i as u8 + 1)
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Entities found in one message
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedEntities {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<u32>,
    #[serde(rename = "mes", skip_serializing_if = "Option::is_none")]
    pub month: Option<Month>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub urgency: Option<UrgencyLevel>,
}

impl ExtractedEntities {
    pub fn is_empty(&self) -> bool {
        self.number.is_none() && self.month.is_none() && self.year.is_none() && self.urgency.is_none()
    }

    /// "{mes} {year}" when both are present, the month alone otherwise
    pub fn approximate_date(&self) -> Option<String> {
        match (self.month, self.year) {
            (Some(month), Some(year)) => Some(format!("{} {}", month, year)),
            (Some(month), None) => Some(month.to_string()),
            _ => None,
        }
    }
}

/// Rule-based entity extractor
#[derive(Debug, Clone)]
pub struct EntityExtractor {
    urgency: UrgencyKeywords,
}

impl EntityExtractor {
    pub fn new() -> Self {
        Self::with_keywords(&KeywordConfig::default())
    }

    /// Use the urgency phrases of a keyword table
    pub fn with_keywords(keywords: &KeywordConfig) -> Self {
        Self {
            urgency: keywords.urgency.clone(),
        }
    }

    /// Extract all entities
    pub fn extract(&self, text: &str) -> ExtractedEntities {
        let lower = text.to_lowercase();
        let entities = ExtractedEntities {
            number: self.extract_number(text),
            month: self.extract_month(&lower),
            year: self.extract_year(text),
            urgency: self.extract_urgency(&lower),
        };
        if !entities.is_empty() {
            tracing::debug!(?entities, "Entities extracted");
        }
        entities
    }

    /// First run of digits; runs too long for `u32` are ignored
    pub fn extract_number(&self, text: &str) -> Option<u32> {
        NUMBER_PATTERN
            .find(text)
            .and_then(|m| m.as_str().parse().ok())
    }

    pub fn extract_month(&self, lower: &str) -> Option<Month> {
        Month::ALL.iter().copied().find(|m| lower.contains(m.as_str()))
    }

    pub fn extract_year(&self, text: &str) -> Option<u16> {
        YEAR_PATTERN
            .find(text)
            .and_then(|m| m.as_str().parse().ok())
    }

    pub fn extract_urgency(&self, lower: &str) -> Option<UrgencyLevel> {
        UrgencyLevel::PRIORITY.iter().copied().find(|level| {
            self.urgency
                .for_level(*level)
                .iter()
                .any(|phrase| lower.contains(phrase.as_str()))
        })
    }
}

impl Default for EntityExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_and_year() {
        let extractor = EntityExtractor::new();
        let entities = extractor.extract("Marzo 2026");
        assert_eq!(entities.month, Some(Month::Marzo));
        assert_eq!(entities.year, Some(2026));
        assert_eq!(entities.approximate_date().as_deref(), Some("marzo 2026"));
        // the first digit run is the year itself
        assert_eq!(entities.number, Some(2026));
    }

    #[test]
    fn test_month_only() {
        let entities = EntityExtractor::new().extract("a fines de noviembre");
        assert_eq!(entities.approximate_date().as_deref(), Some("noviembre"));
        assert!(entities.year.is_none());
    }

    #[test]
    fn test_first_number_wins() {
        let entities = EntityExtractor::new().extract("somos 50, quizás 60");
        assert_eq!(entities.number, Some(50));
        assert!(entities.month.is_none());
    }

    #[test]
    fn test_non_ascii_digits_are_not_numbers() {
        let entities = EntityExtractor::new().extract("somos ٥٠");
        assert!(entities.number.is_none());
    }

    #[test]
    fn test_year_requires_20_prefix() {
        let extractor = EntityExtractor::new();
        assert_eq!(extractor.extract_year("en 1999"), None);
        assert_eq!(extractor.extract_year("para 2031 seguro"), Some(2031));
    }

    #[test]
    fn test_urgency_priority() {
        let extractor = EntityExtractor::new();
        // "pronto" (alta) beats "averiguando" (baja)
        let entities = extractor.extract("estoy averiguando pero lo necesito pronto");
        assert_eq!(entities.urgency, Some(UrgencyLevel::Alta));

        let entities = extractor.extract("Próximamente vemos");
        assert_eq!(entities.urgency, Some(UrgencyLevel::Media));

        let entities = extractor.extract("explorando opciones");
        assert_eq!(entities.urgency, Some(UrgencyLevel::Baja));
    }

    #[test]
    fn test_nothing_found() {
        let entities = EntityExtractor::new().extract("Casamiento");
        assert!(entities.is_empty());
        assert!(entities.approximate_date().is_none());
    }

    #[test]
    fn test_month_numbers() {
        assert_eq!(Month::Enero.number(), 1);
        assert_eq!(Month::Diciembre.number(), 12);
    }
}
