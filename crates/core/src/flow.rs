//! Flow and quotation step tags

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::CoreError;

/// Sub-dialog the conversation is currently in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum FlowState {
    /// No conversation yet
    #[default]
    #[serde(rename = "idle")]
    Idle,
    #[serde(rename = "menu_principal")]
    MainMenu,
    #[serde(rename = "cotizacion_flow")]
    Quotation,
    #[serde(rename = "estilos_flow")]
    Styles,
    #[serde(rename = "disponibilidad_flow")]
    Availability,
    #[serde(rename = "logistica_flow")]
    Logistics,
    #[serde(rename = "faq_flow")]
    Faq,
    /// Being handed to a human advisor
    #[serde(rename = "handoff_flow")]
    Handoff,
    #[serde(rename = "completed")]
    Completed,
}

impl FlowState {
    pub const ALL: [FlowState; 9] = [
        FlowState::Idle,
        FlowState::MainMenu,
        FlowState::Quotation,
        FlowState::Styles,
        FlowState::Availability,
        FlowState::Logistics,
        FlowState::Faq,
        FlowState::Handoff,
        FlowState::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FlowState::Idle => "idle",
            FlowState::MainMenu => "menu_principal",
            FlowState::Quotation => "cotizacion_flow",
            FlowState::Styles => "estilos_flow",
            FlowState::Availability => "disponibilidad_flow",
            FlowState::Logistics => "logistica_flow",
            FlowState::Faq => "faq_flow",
            FlowState::Handoff => "handoff_flow",
            FlowState::Completed => "completed",
        }
    }
}

impl fmt::Display for FlowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FlowState {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FlowState::ALL
            .iter()
            .copied()
            .find(|flow| flow.as_str() == s)
            .ok_or_else(|| CoreError::UnknownFlow(s.to_string()))
    }
}

/// Position within the quotation question sequence
///
/// The step stored in `ChatState` is the one whose answer is awaited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuotationStep {
    TipoEvento,
    Fecha,
    Ciudad,
    Invitados,
    Lugar,
    Necesidad,
    Estilo,
    Referencias,
    Presupuesto,
    Resumen,
    /// Terminal
    Confirmacion,
}

impl QuotationStep {
    /// Fixed order of the sequence
    pub const ORDER: [QuotationStep; 11] = [
        QuotationStep::TipoEvento,
        QuotationStep::Fecha,
        QuotationStep::Ciudad,
        QuotationStep::Invitados,
        QuotationStep::Lugar,
        QuotationStep::Necesidad,
        QuotationStep::Estilo,
        QuotationStep::Referencias,
        QuotationStep::Presupuesto,
        QuotationStep::Resumen,
        QuotationStep::Confirmacion,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QuotationStep::TipoEvento => "tipo_evento",
            QuotationStep::Fecha => "fecha",
            QuotationStep::Ciudad => "ciudad",
            QuotationStep::Invitados => "invitados",
            QuotationStep::Lugar => "lugar",
            QuotationStep::Necesidad => "necesidad",
            QuotationStep::Estilo => "estilo",
            QuotationStep::Referencias => "referencias",
            QuotationStep::Presupuesto => "presupuesto",
            QuotationStep::Resumen => "resumen",
            QuotationStep::Confirmacion => "confirmacion",
        }
    }

    pub fn index(&self) -> usize {
        QuotationStep::ORDER
            .iter()
            .position(|s| s == self)
            .unwrap_or(QuotationStep::ORDER.len())
    }

    /// Steps that ask for one lead field
    pub fn is_question(&self) -> bool {
        !matches!(self, QuotationStep::Resumen | QuotationStep::Confirmacion)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, QuotationStep::Confirmacion)
    }
}

impl fmt::Display for QuotationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuotationStep {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        QuotationStep::ORDER
            .iter()
            .copied()
            .find(|step| step.as_str() == s)
            .ok_or_else(|| CoreError::UnknownStep(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flow_serde_matches_persisted_tags() {
        let json = serde_json::to_string(&FlowState::Quotation).unwrap();
        assert_eq!(json, "\"cotizacion_flow\"");
        let back: FlowState = serde_json::from_str("\"handoff_flow\"").unwrap();
        assert_eq!(back, FlowState::Handoff);
    }

    #[test]
    fn test_flow_from_str() {
        assert_eq!("menu_principal".parse::<FlowState>().unwrap(), FlowState::MainMenu);
        assert!("nowhere".parse::<FlowState>().is_err());
    }

    #[test]
    fn test_step_order_and_index() {
        assert_eq!(QuotationStep::TipoEvento.index(), 0);
        assert_eq!(QuotationStep::Confirmacion.index(), 10);
        assert!(QuotationStep::Presupuesto.is_question());
        assert!(!QuotationStep::Resumen.is_question());
        assert!(QuotationStep::Confirmacion.is_terminal());
    }

    #[test]
    fn test_step_from_str() {
        for step in QuotationStep::ORDER {
            assert_eq!(step.as_str().parse::<QuotationStep>().unwrap(), step);
        }
    }
}
