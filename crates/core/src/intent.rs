//! Visitor intents
//!
//! The closed set of things a visitor can be trying to do. Declaration order
//! matters: the classifier breaks score ties in favour of the intent declared
//! first, so `Intent::ALL` must stay in this order.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::CoreError;

/// Intent resolved for a visitor message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    /// General questions about the business
    ConsultaGeneral,
    /// Wants a quote
    Cotizacion,
    /// Asks whether a date is free
    Disponibilidad,
    /// Asks which kinds of events are covered
    TiposEventos,
    /// Wants to browse styles / inspiration
    CatalogoEstilos,
    /// Delivery, set-up and tear-down questions
    Logistica,
    /// Coverage area questions
    ZonasCobertura,
    /// Wants a human advisor
    ContactoHumano,
    /// Frequently asked questions (payments, booking, cancellations)
    Faq,
    /// Wants to move an existing booking
    Reprogramacion,
    /// Following up on an earlier enquiry
    Seguimiento,
    /// Catch-all when nothing matched
    Fallback,
}

impl Intent {
    /// Every intent in declaration order
    pub const ALL: [Intent; 12] = [
        Intent::ConsultaGeneral,
        Intent::Cotizacion,
        Intent::Disponibilidad,
        Intent::TiposEventos,
        Intent::CatalogoEstilos,
        Intent::Logistica,
        Intent::ZonasCobertura,
        Intent::ContactoHumano,
        Intent::Faq,
        Intent::Reprogramacion,
        Intent::Seguimiento,
        Intent::Fallback,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::ConsultaGeneral => "consulta_general",
            Intent::Cotizacion => "cotizacion",
            Intent::Disponibilidad => "disponibilidad",
            Intent::TiposEventos => "tipos_eventos",
            Intent::CatalogoEstilos => "catalogo_estilos",
            Intent::Logistica => "logistica",
            Intent::ZonasCobertura => "zonas_cobertura",
            Intent::ContactoHumano => "contacto_humano",
            Intent::Faq => "faq",
            Intent::Reprogramacion => "reprogramacion",
            Intent::Seguimiento => "seguimiento",
            Intent::Fallback => "fallback",
        }
    }

    /// Position in the declaration order
    pub fn ordinal(&self) -> usize {
        Intent::ALL.iter().position(|i| i == self).unwrap_or(Intent::ALL.len())
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Intent {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Intent::ALL
            .iter()
            .copied()
            .find(|intent| intent.as_str() == s)
            .ok_or_else(|| CoreError::UnknownIntent(s.to_string()))
    }
}

/// Result of classifying one message
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntentClassification {
    pub intent: Intent,
    /// In [0, 1]
    pub confidence: f32,
}

impl IntentClassification {
    pub fn new(intent: Intent, confidence: f32) -> Self {
        Self {
            intent,
            confidence: confidence.clamp(0.0, 1.0),
        }
    }

    pub fn fallback() -> Self {
        Self::new(Intent::Fallback, 0.0)
    }

    pub fn is_fallback(&self) -> bool {
        self.intent == Intent::Fallback
    }
}
