//! Guide catalog: guides and their versioned content graphs.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use crate::auth::{policy, AuthenticatedUser};
use crate::shared::error::{ApiError, ApiResult};
use crate::shared::models::{Guide, GuideVersion};
use crate::shared::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateGuideRequest {
    pub slug: String,
    pub title: String,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct CreateVersionRequest {
    pub graph: Option<Value>,
    pub crm_note_template: Option<String>,
}

/// POST /api/guides (admin)
pub async fn create_guide(
    State(state): State<Arc<AppState>>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(req): Json<CreateGuideRequest>,
) -> ApiResult<Json<Guide>> {
    policy::authorize(&user, "guides.create")?;
    let guide = state
        .store
        .insert_guide(
            req.slug,
            req.title,
            req.category.unwrap_or_else(|| "general".to_string()),
            req.tags.unwrap_or_default(),
            user.id,
        )
        .await?;
    info!(guide_id = %guide.id, slug = %guide.slug, "created guide");
    Ok(Json(guide))
}

/// GET /api/guides
pub async fn list_guides(
    State(state): State<Arc<AppState>>,
    AuthenticatedUser(_user): AuthenticatedUser,
) -> Json<Vec<Guide>> {
    Json(state.store.list_guides().await)
}

/// GET /api/guides/:id
pub async fn get_guide(
    State(state): State<Arc<AppState>>,
    AuthenticatedUser(_user): AuthenticatedUser,
    Path(guide_id): Path<Uuid>,
) -> ApiResult<Json<Guide>> {
    state
        .store
        .get_guide(guide_id)
        .await
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Guide not found"))
}

/// POST /api/guides/:id/versions (admin)
pub async fn create_version(
    State(state): State<Arc<AppState>>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(guide_id): Path<Uuid>,
    Json(req): Json<CreateVersionRequest>,
) -> ApiResult<Json<GuideVersion>> {
    policy::authorize(&user, "guides.create_version")?;
    let graph = req.graph.unwrap_or_else(|| Value::Object(Default::default()));
    let version = state
        .store
        .insert_version(guide_id, graph, req.crm_note_template)
        .await?;
    info!(guide_id = %guide_id, version = version.version, "created guide version");
    Ok(Json(version))
}

/// GET /api/guides/:id/versions/:vid
pub async fn get_version(
    State(state): State<Arc<AppState>>,
    AuthenticatedUser(_user): AuthenticatedUser,
    Path((guide_id, version_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<GuideVersion>> {
    state
        .store
        .get_version(guide_id, version_id)
        .await
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Guide version not found"))
}
