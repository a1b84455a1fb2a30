//! Registration, login and bearer-token authentication.

use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRequestParts, State},
    http::{header::AUTHORIZATION, request::Parts},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use crate::security::jwt::extract_bearer_token;
use crate::security::password::{hash_password, verify_password};
use crate::shared::error::{ApiError, ApiResult};
use crate::shared::models::{Role, User};
use crate::shared::state::AppState;

pub mod policy;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub role: Option<Role>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct UserSummary {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            role: user.role,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    pub user: UserSummary,
}

/// Authenticated caller, extracted from the `Authorization: Bearer` header.
/// Any decode, signature or expiry failure, and any subject that no longer
/// resolves to a user, rejects with Unauthorized.
pub struct AuthenticatedUser(pub User);

#[async_trait]
impl FromRequestParts<Arc<AppState>> for AuthenticatedUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::unauthorized("Missing authorization header"))?;
        let token = extract_bearer_token(header)
            .ok_or_else(|| ApiError::unauthorized("Malformed authorization header"))?;
        let claims = state
            .tokens
            .verify(token)
            .map_err(|_| ApiError::unauthorized("Could not validate credentials"))?;
        let user = state
            .store
            .find_user_by_email(&claims.sub)
            .await
            .ok_or_else(|| ApiError::unauthorized("User not found"))?;
        Ok(AuthenticatedUser(user))
    }
}

/// POST /api/auth/register
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<Json<Value>> {
    let password_hash =
        hash_password(&req.password).map_err(|e| ApiError::internal(e.to_string()))?;
    let role = req.role.unwrap_or(Role::Agent);
    let user = state
        .store
        .insert_user(req.email, password_hash, role)
        .await?;
    info!(email = %user.email, role = user.role.as_str(), "registered user");
    Ok(Json(json!({ "message": "User created successfully" })))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let user = state
        .store
        .find_user_by_email(&req.email)
        .await
        .ok_or_else(|| ApiError::unauthorized("Invalid credentials"))?;
    let matches = verify_password(&req.password, &user.password_hash)
        .map_err(|e| ApiError::internal(e.to_string()))?;
    if !matches {
        return Err(ApiError::unauthorized("Invalid credentials"));
    }
    let access_token = state
        .tokens
        .issue(&user.email)
        .map_err(|e| ApiError::internal(e.to_string()))?;
    info!(email = %user.email, "login");
    Ok(Json(LoginResponse {
        access_token,
        token_type: "bearer".to_string(),
        user: UserSummary::from(&user),
    }))
}

/// GET /api/auth/me
pub async fn me(AuthenticatedUser(user): AuthenticatedUser) -> Json<UserSummary> {
    Json(UserSummary::from(&user))
}
