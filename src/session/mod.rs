//! Walkthrough sessions: creation, context updates and completion.
//!
//! Session endpoints require no authentication; customers reach them before
//! any login exists.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use crate::shared::error::{ApiError, ApiResult};
use crate::shared::models::{Role, Session};
use crate::shared::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    pub role: Option<Role>,
    pub guide_version_id: Uuid,
    pub locale: Option<String>,
}

/// POST /api/sessions
pub async fn create_session(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateSessionRequest>,
) -> ApiResult<Json<Session>> {
    let session = state
        .store
        .insert_session(
            req.role.unwrap_or(Role::Customer),
            req.guide_version_id,
            req.locale.unwrap_or_else(|| "en".to_string()),
        )
        .await?;
    info!(session_id = %session.id, guide_version_id = %session.guide_version_id, "started session");
    Ok(Json(session))
}

/// GET /api/sessions/:id
pub async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
) -> ApiResult<Json<Session>> {
    state
        .store
        .get_session(session_id)
        .await
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Session not found"))
}

/// PATCH /api/sessions/:id/customer-context — full replace, not a merge.
pub async fn update_customer_context(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
    Json(context): Json<Value>,
) -> ApiResult<Json<Value>> {
    state.store.set_customer_context(session_id, context).await?;
    Ok(Json(json!({ "message": "Customer context updated" })))
}

/// PATCH /api/sessions/:id/crm-context — full replace, not a merge.
pub async fn update_crm_context(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
    Json(context): Json<Value>,
) -> ApiResult<Json<Value>> {
    state.store.set_crm_context(session_id, context).await?;
    Ok(Json(json!({ "message": "CRM context updated" })))
}

/// POST /api/sessions/:id/complete — idempotent.
pub async fn complete_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
) -> ApiResult<Json<Value>> {
    let session = state.store.complete_session(session_id).await?;
    info!(session_id = %session.id, "completed session");
    Ok(Json(json!({ "message": "Session completed" })))
}
