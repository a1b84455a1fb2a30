//! Escalation intake and best-effort email notification.
//!
//! The escalation row is persisted first; the email attempt runs afterwards
//! and records its outcome on the row. Notification failures never fail the
//! creating request.

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;

use crate::shared::error::{ApiError, ApiResult};
use crate::shared::models::{DeliveryStatus, Escalation};
use crate::shared::state::AppState;

pub mod mailer;

use mailer::DeliveryOutcome;

#[derive(Debug, Deserialize)]
pub struct CreateEscalationRequest {
    pub session_id: Uuid,
    pub guide_id: Uuid,
    pub step_id: String,
    pub category: Option<String>,
    pub message: String,
    pub history_snapshot: Option<Vec<Value>>,
    pub contact: Option<Value>,
}

/// POST /api/escalations
pub async fn create_escalation(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateEscalationRequest>,
) -> ApiResult<Json<Escalation>> {
    let escalation = state
        .store
        .insert_escalation(Escalation::new(
            req.session_id,
            req.guide_id,
            req.step_id,
            req.category.unwrap_or_else(|| "general".to_string()),
            req.message,
            req.history_snapshot.unwrap_or_default(),
            req.contact.unwrap_or_else(|| Value::Object(Default::default())),
        ))
        .await;
    info!(escalation_id = %escalation.id, session_id = %escalation.session_id, "created escalation");

    let outcome = {
        let mailer = state.mailer.clone();
        let snapshot = escalation.clone();
        tokio::task::spawn_blocking(move || mailer.send(&snapshot))
            .await
            .map_err(|e| ApiError::internal(format!("Email task failed: {e}")))?
    };

    let escalation = match outcome {
        DeliveryOutcome::Sent => {
            state
                .store
                .set_delivery(escalation.id, DeliveryStatus::Sent, None)
                .await?
        }
        DeliveryOutcome::Failed(error) => {
            warn!(escalation_id = %escalation.id, error = %error, "escalation email failed");
            state
                .store
                .set_delivery(escalation.id, DeliveryStatus::Failed, Some(error))
                .await?
        }
        // Unconfigured SMTP: delivery stays unset rather than failed.
        DeliveryOutcome::Skipped => escalation,
    };

    Ok(Json(escalation))
}
