//! HTTP Endpoints
//!
//! REST API for the chat widget.

use std::time::Duration;

use axum::{
    extract::{Json, Path, State},
    http::{header, HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use lead_agent_agent::{ChatSession, TurnOutcome};
use lead_agent_persistence::{all_leads, StoredLead};
use serde::Deserialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::metrics::record_turn;
use crate::session::{SessionSnapshot, TurnResponse};
use crate::state::AppState;
use crate::ServerError;

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    let cors_layer = build_cors_layer(&state.config.server.cors_origins);
    let timeout = Duration::from_secs(state.config.server.timeout_seconds);

    Router::new()
        // Sessions
        .route("/api/sessions", post(create_session).get(list_sessions))
        .route("/api/sessions/:id", get(get_session).delete(delete_session))
        .route("/api/sessions/:id/messages", post(submit_message))
        .route("/api/sessions/:id/options", post(select_option))
        .route("/api/sessions/:id/reset", post(reset_session))
        // Leads
        .route("/api/leads", get(list_leads))
        // Health check
        .route("/health", get(health_check))
        // Prometheus metrics
        .route("/metrics", get(metrics_handler))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(timeout))
        .layer(cors_layer)
        .with_state(state)
}

/// Empty origin list allows any origin
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers(Any);

    if origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| {
            origin.parse::<HeaderValue>().ok().or_else(|| {
                tracing::warn!(origin = %origin, "Invalid CORS origin");
                None
            })
        })
        .collect();

    tracing::info!(origins = parsed.len(), "CORS configured");
    layer.allow_origin(parsed)
}

async fn create_session(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<SessionSnapshot>), ServerError> {
    let session = state.sessions.create().await?;
    let session = session.lock().await;
    Ok((StatusCode::CREATED, Json(SessionSnapshot::of(&session))))
}

async fn list_sessions(State(state): State<AppState>) -> Json<serde_json::Value> {
    let sessions = state.sessions.list();
    Json(serde_json::json!({
        "sessions": sessions,
        "count": sessions.len(),
    }))
}

async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionSnapshot>, ServerError> {
    Ok(Json(state.sessions.snapshot(&id).await?))
}

async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServerError> {
    if state.sessions.remove(&id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ServerError::SessionNotFound(id))
    }
}

#[derive(Debug, Deserialize)]
struct MessageRequest {
    text: String,
}

async fn submit_message(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<MessageRequest>,
) -> Result<Json<TurnResponse>, ServerError> {
    let text = request.text.trim();
    if text.is_empty() {
        return Err(ServerError::InvalidRequest("text must not be empty".to_string()));
    }

    let shared = state.sessions.get_or_restore(&id).await?;
    let mut session = shared.try_lock().map_err(|_| ServerError::Busy(id.clone()))?;

    let outcome = session
        .submit(text)
        .await
        .map_err(|e| ServerError::from_agent(&id, e))?;
    Ok(Json(turn_response(&state, &session, outcome)))
}

#[derive(Debug, Deserialize)]
struct OptionRequest {
    /// Id of one of the currently offered quick options
    option: String,
}

async fn select_option(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<OptionRequest>,
) -> Result<Json<TurnResponse>, ServerError> {
    let shared = state.sessions.get_or_restore(&id).await?;
    let mut session = shared.try_lock().map_err(|_| ServerError::Busy(id.clone()))?;

    let option = session
        .quick_options()
        .into_iter()
        .find(|o| o.id == request.option)
        .ok_or_else(|| {
            ServerError::InvalidRequest(format!("option '{}' is not offered", request.option))
        })?;

    let outcome = session
        .select_option(&option)
        .await
        .map_err(|e| ServerError::from_agent(&id, e))?;
    Ok(Json(turn_response(&state, &session, outcome)))
}

fn turn_response(state: &AppState, session: &ChatSession, outcome: TurnOutcome) -> TurnResponse {
    record_turn(&outcome);
    TurnResponse {
        session: state.sessions.publish(session),
        turn: outcome,
    }
}

async fn reset_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionSnapshot>, ServerError> {
    let shared = state.sessions.get_or_restore(&id).await?;
    let mut session = shared.try_lock().map_err(|_| ServerError::Busy(id.clone()))?;
    session.reset().await;
    Ok(Json(state.sessions.publish(&session)))
}

async fn list_leads(State(state): State<AppState>) -> Result<Json<Vec<StoredLead>>, ServerError> {
    let leads = all_leads(state.store.as_ref(), &state.config.persistence.key_prefix)
        .await
        .map_err(|e| ServerError::Internal(e.to_string()))?;
    Ok(Json(leads))
}

async fn health_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "sessions": state.sessions.count(),
    }))
}

async fn metrics_handler(State(state): State<AppState>) -> impl IntoResponse {
    match &state.metrics {
        Some(handle) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        ),
        None => (
            StatusCode::SERVICE_UNAVAILABLE,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            String::from("metrics recorder not installed\n"),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lead_agent_agent::DialogEngine;
    use lead_agent_config::Settings;
    use std::sync::Arc;

    #[test]
    fn test_router_creation() {
        let settings = Settings::default();
        let engine = Arc::new(
            DialogEngine::new(settings.chatbot.clone(), &settings.agent).unwrap(),
        );
        let _ = create_router(AppState::in_memory(settings, engine));
    }

    #[test]
    fn test_cors_ignores_invalid_origins() {
        let _ = build_cors_layer(&["https://furnarius.com.ar".to_string(), "bad\norigin".to_string()]);
    }
}
