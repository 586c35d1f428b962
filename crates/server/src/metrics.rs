//! Prometheus metrics

use lead_agent_agent::TurnOutcome;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

static HANDLE: OnceCell<Option<PrometheusHandle>> = OnceCell::new();

/// Install the global recorder once; later calls return the same handle
pub fn init_metrics() -> Option<PrometheusHandle> {
    HANDLE
        .get_or_init(|| match PrometheusBuilder::new().install_recorder() {
            Ok(handle) => Some(handle),
            Err(e) => {
                tracing::warn!(error = %e, "Prometheus recorder not installed");
                None
            },
        })
        .clone()
}

pub fn record_turn(outcome: &TurnOutcome) {
    metrics::counter!("lead_agent_turns_total", "intent" => outcome.intent.as_str()).increment(1);
    if outcome.handoff {
        metrics::counter!("lead_agent_handoffs_total").increment(1);
    }
    if outcome.outbound_link.is_some() {
        metrics::counter!("lead_agent_outbound_links_total").increment(1);
    }
}

pub fn record_session_created() {
    metrics::counter!("lead_agent_sessions_created_total").increment(1);
}
