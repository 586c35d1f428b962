//! Quotation step sequencing
//!
//! The quotation flow walks a fixed list of steps:
//! tipo_evento → fecha → ciudad → invitados → lugar → necesidad → estilo →
//! referencias → presupuesto → resumen → confirmacion.
//!
//! There are no backward transitions here. Editing a field re-enters the flow
//! at a chosen step, which the dialog engine records as a `Reentry`.

use lead_agent_core::QuotationStep;
use serde::{Deserialize, Serialize};

/// Why the current step changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionReason {
    /// Flow started (or restarted) at the first step
    Start,
    /// Visitor answered the previous step
    Answered,
    /// Visitor asked to add or edit a field
    Reentry,
}

/// Step transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepTransition {
    pub from: Option<QuotationStep>,
    pub to: QuotationStep,
    pub reason: TransitionReason,
}

/// Fixed-order quotation state machine
#[derive(Debug, Clone, Copy, Default)]
pub struct QuotationSequencer;

impl QuotationSequencer {
    pub fn new() -> Self {
        Self
    }

    pub fn first(&self) -> QuotationStep {
        QuotationStep::ORDER[0]
    }

    /// Step following `current`
    ///
    /// `None` starts the flow. `confirmacion` has no successor.
    pub fn next(&self, current: Option<QuotationStep>) -> Option<QuotationStep> {
        match current {
            None => Some(self.first()),
            Some(step) => QuotationStep::ORDER.get(step.index() + 1).copied(),
        }
    }

    /// Describe a move from `from` to `to`
    ///
    /// Walking to the successor is an answer; landing on the first step
    /// otherwise is a (re)start; anything else is a re-entry.
    pub fn transition(&self, from: Option<QuotationStep>, to: QuotationStep) -> StepTransition {
        let reason = match from {
            Some(prev) if self.next(Some(prev)) == Some(to) => TransitionReason::Answered,
            _ if to == self.first() => TransitionReason::Start,
            _ => TransitionReason::Reentry,
        };
        StepTransition { from, to, reason }
    }

    /// 1-based position and total number of steps
    pub fn progress(&self, step: QuotationStep) -> (usize, usize) {
        (step.index() + 1, QuotationStep::ORDER.len())
    }
}
