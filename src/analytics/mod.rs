//! Admin analytics over sessions and escalations.

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;

use crate::auth::{policy, AuthenticatedUser};
use crate::shared::error::ApiResult;
use crate::shared::models::Session;
use crate::shared::state::AppState;

const RECENT_SESSIONS_LIMIT: usize = 100;

#[derive(Debug, Serialize)]
pub struct OverviewResponse {
    pub total_sessions: usize,
    pub completed_sessions: usize,
    pub completion_rate: f64,
    pub total_escalations: usize,
    pub escalation_rate: f64,
}

fn rate(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}

/// GET /api/admin/analytics/overview (admin)
pub async fn overview(
    State(state): State<Arc<AppState>>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> ApiResult<Json<OverviewResponse>> {
    policy::authorize(&user, "analytics.overview")?;
    let (total_sessions, completed_sessions) = state.store.session_counts().await;
    let total_escalations = state.store.escalation_count().await;
    Ok(Json(OverviewResponse {
        total_sessions,
        completed_sessions,
        completion_rate: rate(completed_sessions, total_sessions),
        total_escalations,
        escalation_rate: rate(total_escalations, total_sessions),
    }))
}

/// GET /api/admin/analytics/sessions (admin) — newest first, at most 100.
pub async fn sessions_recent(
    State(state): State<Arc<AppState>>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> ApiResult<Json<Vec<Session>>> {
    policy::authorize(&user, "analytics.sessions")?;
    Ok(Json(state.store.recent_sessions(RECENT_SESSIONS_LIMIT).await))
}

#[cfg(test)]
mod tests {
    use super::rate;

    #[test]
    fn rate_handles_zero_total() {
        assert_eq!(rate(5, 0), 0.0);
        assert_eq!(rate(1, 4), 25.0);
        assert_eq!(rate(4, 4), 100.0);
    }
}
