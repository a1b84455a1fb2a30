//! Append-only flow-event log.

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use crate::shared::models::FlowEvent;
use crate::shared::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LogEventRequest {
    pub session_id: Uuid,
    pub step_id: Option<String>,
    pub action: String,
    pub props: Option<Value>,
}

/// POST /api/events
///
/// The session id is not checked against the sessions collection; telemetry
/// is accepted as-is and always succeeds on well-formed input.
pub async fn log_event(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LogEventRequest>,
) -> Json<FlowEvent> {
    let event = state
        .store
        .insert_event(
            req.session_id,
            req.step_id,
            req.action,
            req.props.unwrap_or_else(|| Value::Object(Default::default())),
        )
        .await;
    Json(event)
}
