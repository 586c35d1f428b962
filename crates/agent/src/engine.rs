//! Dialog orchestration
//!
//! A turn runs in two halves so a session can pause between them:
//! 1. `begin_turn` records the visitor message and closes the input gate
//! 2. `complete_turn` classifies, captures, routes to one responder and
//!    applies the response to the state
//!
//! Routing order: option action, handoff predicate, pending-step
//! continuation, intent dispatch, then the menu override.

use std::sync::Arc;

use lead_agent_config::constants::outbound;
use lead_agent_config::{AgentConfig, ChatbotConfig};
use lead_agent_core::{
    BotResponse, ButtonOption, ChatMessage, ChatState, DecorStyle, FlowState, Intent,
    IntentClassification, LeadData, OptionAction, QuotationStep, CONTEXT_HANDOFF_STARTED,
    CONTEXT_SHOW_SUMMARY,
};
use lead_agent_text_processing::{EntityExtractor, IntentClassifier, KeywordConfig};
use lead_agent_tools::{OutboundChannel, OutboundLink, WhatsAppChannel};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::capture;
use crate::flows::{faq, handoff, menu, quotation, secondary};
use crate::selector::{MessageSelector, RandomSelector};
use crate::stage::{QuotationSequencer, StepTransition};
use crate::{AgentError, Result};

/// One visitor input: typed text or a selected option
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnInput {
    /// Text fed to the classifier, extractor and capture rules
    pub text: String,
    /// Shown in the history instead of `text` (the option label)
    #[serde(default)]
    pub display: Option<String>,
    /// Pre-resolved intent; skips classification
    #[serde(default)]
    pub intent: Option<Intent>,
    #[serde(default)]
    pub action: Option<OptionAction>,
}

impl TurnInput {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            display: None,
            intent: None,
            action: None,
        }
    }

    /// Selecting an option submits its value with its intent and action
    pub fn selection(option: &ButtonOption) -> Self {
        Self {
            text: option.value.clone(),
            display: Some(option.label.clone()),
            intent: option.intent,
            action: option.action,
        }
    }

    fn history_text(&self) -> &str {
        self.display.as_deref().unwrap_or(&self.text)
    }
}

/// What one turn did
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TurnOutcome {
    pub intent: Intent,
    pub confidence: f32,
    pub flow: FlowState,
    pub step: Option<QuotationStep>,
    /// Bot messages appended this turn
    pub messages: Vec<ChatMessage>,
    /// Lead fields captured from the visitor text
    pub captured: LeadData,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transition: Option<StepTransition>,
    pub handoff: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outbound_link: Option<OutboundLink>,
}

/// Stateless dialog engine shared by every session
pub struct DialogEngine {
    classifier: IntentClassifier,
    extractor: EntityExtractor,
    sequencer: QuotationSequencer,
    chatbot: ChatbotConfig,
    outbound: Arc<dyn OutboundChannel>,
    selector: Arc<dyn MessageSelector>,
    max_history: usize,
}

impl DialogEngine {
    /// Engine with the configured keyword table and WhatsApp destination
    pub fn new(chatbot: ChatbotConfig, agent: &AgentConfig) -> Result<Self> {
        let keywords = match agent.keywords_path.as_deref() {
            Some(path) => KeywordConfig::load(path)?,
            None => KeywordConfig::default(),
        };
        let channel = WhatsAppChannel::from_config(&chatbot)?;

        Ok(Self {
            extractor: EntityExtractor::with_keywords(&keywords),
            classifier: IntentClassifier::with_keywords(keywords),
            sequencer: QuotationSequencer::new(),
            chatbot,
            outbound: Arc::new(channel),
            selector: Arc::new(RandomSelector),
            max_history: agent.max_history_messages,
        })
    }

    pub fn with_selector(mut self, selector: Arc<dyn MessageSelector>) -> Self {
        self.selector = selector;
        self
    }

    pub fn with_outbound(mut self, channel: Arc<dyn OutboundChannel>) -> Self {
        self.outbound = channel;
        self
    }

    pub fn with_classifier(mut self, classifier: IntentClassifier) -> Self {
        self.extractor = EntityExtractor::with_keywords(classifier.keywords());
        self.classifier = classifier;
        self
    }

    pub fn chatbot(&self) -> &ChatbotConfig {
        &self.chatbot
    }

    pub fn classifier(&self) -> &IntentClassifier {
        &self.classifier
    }

    pub fn max_history(&self) -> usize {
        self.max_history
    }

    /// Welcome pair; the conversation starts inside the quotation flow
    pub fn start(&self, state: &mut ChatState) -> Vec<ChatMessage> {
        self.apply(state, menu::welcome(), None)
    }

    /// Record the visitor message and close the input gate
    pub fn begin_turn(&self, state: &mut ChatState, input: &TurnInput) -> Result<()> {
        if !state.awaiting_input {
            return Err(AgentError::Busy);
        }
        state.push_message(ChatMessage::user(input.history_text()), self.max_history);
        state.awaiting_input = false;
        Ok(())
    }

    /// Compute and apply the response; never fails
    pub fn complete_turn(&self, state: &mut ChatState, input: &TurnInput) -> TurnOutcome {
        let classification = match input.intent {
            Some(intent) => IntentClassification::new(intent, 1.0),
            None => self.classifier.classify(&input.text),
        };
        let intent = classification.intent;
        tracing::debug!(
            intent = %intent,
            confidence = classification.confidence,
            selected = input.intent.is_some(),
            "Turn intent resolved"
        );

        let entities = self.extractor.extract(&input.text);

        // Only a style answers the styles question; anything else goes to intent dispatch
        if state.current_flow == FlowState::Styles
            && state.current_step == Some(QuotationStep::Estilo)
            && offered_style(&input.text).is_none()
        {
            state.current_step = None;
        }

        let pending_step = state.current_step;
        let captured = if pending_step.is_some() || state.current_flow == FlowState::Handoff {
            let partial = capture::capture(&input.text, pending_step, &entities);
            state.lead_data.merge(partial.clone());
            partial
        } else {
            LeadData::default()
        };

        state.last_intent = Some(intent);
        state.set_context_flag(CONTEXT_SHOW_SUMMARY, false);

        let mut outbound_link = None;
        let response = match input.action {
            Some(OptionAction::OpenWhatsapp) => {
                outbound_link = self.open_outbound(&state.lead_data);
                BotResponse::text(outbound::CONFIRMATION).flow(FlowState::Completed)
            },
            Some(OptionAction::EditLead) => {
                let step = state
                    .lead_data
                    .first_unfilled_step()
                    .unwrap_or_else(|| self.sequencer.first());
                quotation::step_response(step, &state.lead_data)
            },
            Some(OptionAction::ShowSummary) => {
                state.set_context_flag(CONTEXT_SHOW_SUMMARY, true);
                quotation::summary(&state.lead_data)
            },
            None => self.route(state, input, intent),
        };

        let handoff = response.should_handoff;
        let transition = match (response.flow, response.next_step) {
            (Some(FlowState::Quotation), Some(to)) if Some(to) != pending_step => {
                Some(self.sequencer.transition(pending_step, to))
            },
            _ => None,
        };
        if let Some(transition) = transition {
            let (position, total) = self.sequencer.progress(transition.to);
            tracing::debug!(
                to = %transition.to,
                reason = ?transition.reason,
                position,
                total,
                "Quotation step changed"
            );
        }

        let messages = self.apply(state, response, Some(intent));

        TurnOutcome {
            intent,
            confidence: classification.confidence,
            flow: state.current_flow,
            step: state.current_step,
            messages,
            captured,
            transition,
            handoff,
            outbound_link,
        }
    }

    /// Both halves back to back, without pacing
    pub fn handle_turn(&self, state: &mut ChatState, input: &TurnInput) -> Result<TurnOutcome> {
        self.begin_turn(state, input)?;
        Ok(self.complete_turn(state, input))
    }

    fn route(&self, state: &mut ChatState, input: &TurnInput, intent: Intent) -> BotResponse {
        // Picking another option is the only way out of the handoff flow
        if let Some(selected) = input.intent {
            if selected != Intent::ContactoHumano && state.current_flow == FlowState::Handoff {
                tracing::info!(intent = %selected, "Leaving handoff flow");
                state.current_flow = FlowState::MainMenu;
            }
        }

        if handoff::should_handoff(intent, state.current_flow) {
            let first_entry = !state.context_flag(CONTEXT_HANDOFF_STARTED);
            state.set_context_flag(CONTEXT_HANDOFF_STARTED, true);
            tracing::info!(
                first_entry,
                ready = state.lead_data.has_minimum_for_handoff(),
                "Handoff requested"
            );
            return handoff::respond(&state.lead_data, first_entry);
        }

        let response = self.dispatch(state, input, intent);

        if menu::requests_menu(&input.text) {
            return menu::back_to_menu();
        }
        response
    }

    fn dispatch(&self, state: &ChatState, input: &TurnInput, intent: Intent) -> BotResponse {
        let selected_other = |own: Intent| input.intent.is_some_and(|selected| selected != own);

        match (state.current_flow, state.current_step) {
            (FlowState::Quotation, Some(step)) if !selected_other(Intent::Cotizacion) => {
                return self.continue_quotation(&state.lead_data, step);
            },
            (FlowState::Styles, Some(QuotationStep::Estilo))
                if !selected_other(Intent::CatalogoEstilos) && state.lead_data.style.is_some() =>
            {
                return secondary::style_confirmed();
            },
            _ => {},
        }

        match intent {
            Intent::Cotizacion => quotation::step_response(self.sequencer.first(), &state.lead_data),
            Intent::CatalogoEstilos => secondary::styles(),
            Intent::Disponibilidad => secondary::availability(&state.lead_data),
            Intent::Logistica | Intent::ZonasCobertura => secondary::logistics(&self.chatbot),
            Intent::Faq => faq::respond(&self.chatbot, &input.text),
            Intent::ConsultaGeneral => menu::general_info(),
            // Normally caught by the handoff predicate first
            Intent::ContactoHumano => handoff::respond(&state.lead_data, true),
            Intent::TiposEventos
            | Intent::Reprogramacion
            | Intent::Seguimiento
            | Intent::Fallback => menu::fallback(self.selector.as_ref()),
        }
    }

    fn continue_quotation(&self, lead: &LeadData, step: QuotationStep) -> BotResponse {
        match self.sequencer.next(Some(step)) {
            Some(next) => quotation::step_response(next, lead),
            None => quotation::confirmation(),
        }
    }

    fn open_outbound(&self, lead: &LeadData) -> Option<OutboundLink> {
        match self.outbound.build_link(lead) {
            Ok(link) => {
                tracing::info!(channel = %link.channel, "Outbound link ready");
                Some(link)
            },
            Err(e) => {
                tracing::warn!(error = %e, channel = self.outbound.name(), "Outbound link failed");
                None
            },
        }
    }

    /// Move flow and step, tag the last bot message and reopen the gate
    fn apply(
        &self,
        state: &mut ChatState,
        response: BotResponse,
        intent: Option<Intent>,
    ) -> Vec<ChatMessage> {
        let from = state.current_flow;
        if let Some(flow) = response.flow {
            state.current_flow = flow;
        }
        state.current_step = response.next_step;

        if from != state.current_flow {
            tracing::info!(from = %from, to = %state.current_flow, "Flow changed");
        }
        if state.current_flow != FlowState::Handoff {
            state.set_context_flag(CONTEXT_HANDOFF_STARTED, false);
        }

        let mut messages = response.messages;
        if let Some(last) = messages.iter_mut().rev().find(|m| m.is_bot()) {
            if let Some(intent) = intent {
                last.metadata.insert("intent".to_string(), json!(intent.as_str()));
            }
            last.metadata
                .insert("flow".to_string(), json!(state.current_flow.as_str()));
        }

        state.push_messages(messages.iter().cloned(), self.max_history);
        state.awaiting_input = true;
        messages
    }
}

impl std::fmt::Debug for DialogEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DialogEngine")
            .field("outbound", &self.outbound.name())
            .field("max_history", &self.max_history)
            .finish_non_exhaustive()
    }
}

fn offered_style(text: &str) -> Option<DecorStyle> {
    let text = text.trim().to_lowercase();
    DecorStyle::ALL
        .iter()
        .copied()
        .find(|style| style.label().to_lowercase() == text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selector::FixedSelector;
    use lead_agent_config::constants::{flows, handoff as handoff_copy, FALLBACK_MESSAGES};

    fn engine() -> DialogEngine {
        DialogEngine::new(ChatbotConfig::default(), &AgentConfig::default())
            .unwrap()
            .with_selector(Arc::new(FixedSelector(0)))
    }

    fn started(engine: &DialogEngine) -> ChatState {
        let mut state = ChatState::new();
        engine.start(&mut state);
        state
    }

    fn say(engine: &DialogEngine, state: &mut ChatState, text: &str) -> TurnOutcome {
        engine.handle_turn(state, &TurnInput::text(text)).unwrap()
    }

    fn pick(engine: &DialogEngine, state: &mut ChatState, option: &ButtonOption) -> TurnOutcome {
        engine.handle_turn(state, &TurnInput::selection(option)).unwrap()
    }

    #[test]
    fn test_start() {
        let engine = engine();
        let state = started(&engine);
        assert_eq!(state.conversation_history.len(), 2);
        assert_eq!(state.current_flow, FlowState::Quotation);
        assert_eq!(state.current_step, Some(QuotationStep::TipoEvento));
        assert_eq!(state.quick_options().len(), 5);
        assert!(state.awaiting_input);
    }

    #[test]
    fn test_gate_rejects_overlapping_turns() {
        let engine = engine();
        let mut state = started(&engine);
        let input = TurnInput::text("Casamiento");
        engine.begin_turn(&mut state, &input).unwrap();
        assert!(state.quick_options().is_empty());
        assert!(matches!(
            engine.begin_turn(&mut state, &input),
            Err(AgentError::Busy)
        ));
        engine.complete_turn(&mut state, &input);
        assert!(state.awaiting_input);
    }

    #[test]
    fn test_reply_continues_quotation_regardless_of_intent() {
        let engine = engine();
        let mut state = started(&engine);
        // "fecha" classifies as disponibilidad but is still the answer to the pending step
        let outcome = say(&engine, &mut state, "Corporativo");
        assert_eq!(outcome.step, Some(QuotationStep::Fecha));
        let outcome = say(&engine, &mut state, "la fecha la confirmo después");
        assert_eq!(outcome.intent, Intent::Disponibilidad);
        assert_eq!(outcome.step, Some(QuotationStep::Ciudad));
        assert_eq!(
            state.lead_data.event_date.as_deref(),
            Some("la fecha la confirmo después")
        );
    }

    #[test]
    fn test_selection_with_other_intent_leaves_quotation() {
        let engine = engine();
        let mut state = started(&engine);
        let styles = crate::flows::main_menu_options()[1].clone();
        let outcome = pick(&engine, &mut state, &styles);
        assert_eq!(outcome.flow, FlowState::Styles);
        assert_eq!(outcome.step, Some(QuotationStep::Estilo));
        // the option value was captured at tipo_evento before routing
        assert_eq!(state.lead_data.event_type.as_deref(), Some("estilos"));
    }

    #[test]
    fn test_styles_flow_captures_only_a_style() {
        let engine = engine();
        let mut state = started(&engine);
        let styles = crate::flows::main_menu_options()[1].clone();
        pick(&engine, &mut state, &styles);

        let outcome = say(&engine, &mut state, "tienen disponibilidad para esa fecha?");
        assert_eq!(outcome.intent, Intent::Disponibilidad);
        assert_eq!(outcome.flow, FlowState::Availability);
        assert!(outcome.captured.style.is_none());
        assert!(state.lead_data.style.is_none());
        assert_ne!(outcome.messages[0].content, flows::STYLES_CONFIRMED);
    }

    #[test]
    fn test_styles_flow_confirms_picked_style() {
        let engine = engine();
        let mut state = started(&engine);
        let styles = crate::flows::main_menu_options()[1].clone();
        pick(&engine, &mut state, &styles);

        let outcome = say(&engine, &mut state, "boho");
        assert_eq!(state.lead_data.style.as_deref(), Some("boho"));
        assert_eq!(outcome.flow, FlowState::Styles);
        assert_eq!(outcome.messages[0].content, flows::STYLES_CONFIRMED);
    }

    #[test]
    fn test_menu_override() {
        let engine = engine();
        let mut state = started(&engine);
        let outcome = say(&engine, &mut state, "volver al menu");
        assert_eq!(outcome.flow, FlowState::MainMenu);
        assert_eq!(outcome.step, None);
        assert_eq!(state.quick_options().len(), 5);
    }

    #[test]
    fn test_fallback_clears_step() {
        let engine = engine();
        let mut state = started(&engine);
        let menu = menu::back_to_menu();
        engine.apply(&mut state, menu, None);
        let outcome = say(&engine, &mut state, "asdf");
        assert_eq!(outcome.intent, Intent::Fallback);
        assert_eq!(outcome.messages[0].content, FALLBACK_MESSAGES[0]);
        assert_eq!(outcome.step, None);
        assert_eq!(state.quick_options().len(), 3);
    }

    #[test]
    fn test_handoff_is_sticky_for_free_text() {
        let engine = engine();
        let mut state = started(&engine);
        engine.apply(&mut state, menu::back_to_menu(), None);

        let outcome = say(&engine, &mut state, "quiero hablar con un asesor");
        assert!(outcome.handoff);
        assert_eq!(outcome.messages.len(), 2);
        assert_eq!(outcome.flow, FlowState::Handoff);

        let outcome = say(&engine, &mut state, "me llamo Ana, quiero cotizar");
        assert_eq!(outcome.flow, FlowState::Handoff);
        assert_eq!(outcome.messages.len(), 1);
        assert_eq!(state.lead_data.name.as_deref(), Some("Ana"));
        assert!(!outcome.messages[0].content.contains("tu nombre"));
    }

    #[test]
    fn test_selection_leaves_handoff() {
        let engine = engine();
        let mut state = started(&engine);
        engine.apply(&mut state, menu::back_to_menu(), None);
        say(&engine, &mut state, "hablar con un asesor");
        assert_eq!(state.current_flow, FlowState::Handoff);

        let quote = crate::flows::main_menu_options()[0].clone();
        let outcome = pick(&engine, &mut state, &quote);
        assert_eq!(outcome.flow, FlowState::Quotation);
        assert_eq!(outcome.step, Some(QuotationStep::TipoEvento));
        assert!(!state.context_flag(CONTEXT_HANDOFF_STARTED));
    }

    #[test]
    fn test_handoff_ready_and_outbound() {
        let engine = engine();
        let mut state = started(&engine);
        state.lead_data = LeadData {
            event_type: Some("Casamiento".into()),
            event_date: Some("marzo 2026".into()),
            city_zone: Some("Rosario".into()),
            ..Default::default()
        };
        engine.apply(&mut state, menu::back_to_menu(), None);

        let outcome = say(&engine, &mut state, "hablar con un asesor");
        assert_eq!(outcome.messages[0].content, handoff_copy::READY);
        let send = state.quick_options()[0].clone();

        let outcome = pick(&engine, &mut state, &send);
        let link = outcome.outbound_link.expect("link");
        assert!(link.url.starts_with("https://wa.me/1111111111?text="));
        assert!(link.message.contains("Ciudad/Zona: Rosario"));
        assert_eq!(outcome.flow, FlowState::Completed);
        assert_eq!(outcome.messages[0].content, outbound::CONFIRMATION);
        assert!(outcome.messages[0].is_bot());
    }

    #[test]
    fn test_edit_reenters_first_unfilled_step() {
        let engine = engine();
        let mut state = started(&engine);
        state.lead_data = LeadData {
            event_type: Some("Casamiento".into()),
            event_date: Some("marzo 2026".into()),
            ..Default::default()
        };
        state.current_step = Some(QuotationStep::Resumen);
        let edit = ButtonOption::new("summary_edit", "Agregar un dato")
            .with_value("edit_data")
            .with_action(OptionAction::EditLead);
        let outcome = pick(&engine, &mut state, &edit);
        assert_eq!(outcome.step, Some(QuotationStep::Ciudad));
        assert_eq!(outcome.flow, FlowState::Quotation);
        let transition = outcome.transition.unwrap();
        assert_eq!(transition.reason, crate::stage::TransitionReason::Reentry);
    }

    #[test]
    fn test_show_summary_flag() {
        let engine = engine();
        let mut state = started(&engine);
        engine.apply(&mut state, menu::back_to_menu(), None);
        let show = ButtonOption::new("confirm_summary", "Ver resumen")
            .with_value("show_summary")
            .with_action(OptionAction::ShowSummary);
        pick(&engine, &mut state, &show);
        assert!(state.show_summary_card());
        assert_eq!(state.current_step, Some(QuotationStep::Resumen));

        say(&engine, &mut state, "listo");
        assert!(!state.show_summary_card());
    }

    #[test]
    fn test_availability_without_data() {
        let engine = engine();
        let mut state = started(&engine);
        engine.apply(&mut state, menu::back_to_menu(), None);
        let outcome = say(&engine, &mut state, "tienen disponibilidad?");
        assert_eq!(outcome.flow, FlowState::Availability);
        assert_eq!(outcome.messages[0].content, flows::AVAILABILITY_MISSING);
    }

    #[test]
    fn test_last_bot_message_metadata() {
        let engine = engine();
        let mut state = started(&engine);
        let outcome = say(&engine, &mut state, "Casamiento");
        let last = state.last_message().unwrap();
        assert_eq!(last.id, outcome.messages.last().unwrap().id);
        assert_eq!(last.metadata.get("flow"), Some(&json!("cotizacion_flow")));
        assert_eq!(last.metadata.get("intent"), Some(&json!("fallback")));
    }

    #[test]
    fn test_history_shows_option_label() {
        let engine = engine();
        let mut state = started(&engine);
        let boho = secondary::styles().options[1].clone();
        engine.begin_turn(&mut state, &TurnInput::selection(&boho)).unwrap();
        assert_eq!(state.last_message().unwrap().content, "Cálido-Boho");
    }
}
