//! Unified API router.
//!
//! All endpoints mount under `/api`. Role gating lives in the handlers via
//! the policy table, not in per-route middleware.

use std::sync::Arc;

use axum::{
    routing::{get, patch, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::shared::state::AppState;
use crate::{analytics, auth, escalation, events, guides, session};

pub fn configure_api_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(health))
        // ===== Authentication =====
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/me", get(auth::me))
        // ===== Guide catalog =====
        .route("/api/guides", post(guides::create_guide).get(guides::list_guides))
        .route("/api/guides/:id", get(guides::get_guide))
        .route("/api/guides/:id/versions", post(guides::create_version))
        .route("/api/guides/:id/versions/:vid", get(guides::get_version))
        // ===== Sessions =====
        .route("/api/sessions", post(session::create_session))
        .route("/api/sessions/:id", get(session::get_session))
        .route(
            "/api/sessions/:id/customer-context",
            patch(session::update_customer_context),
        )
        .route(
            "/api/sessions/:id/crm-context",
            patch(session::update_crm_context),
        )
        .route("/api/sessions/:id/complete", post(session::complete_session))
        // ===== Events & escalations =====
        .route("/api/events", post(events::log_event))
        .route("/api/escalations", post(escalation::create_escalation))
        // ===== Admin analytics =====
        .route("/api/admin/analytics/overview", get(analytics::overview))
        .route("/api/admin/analytics/sessions", get(analytics::sessions_recent))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}
