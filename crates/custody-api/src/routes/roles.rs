//! # Role Administration API
//!
//! Grant, revoke, and query role membership.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use custody_core::{Identity, Role, ValidationError};

use crate::auth::CallerIdentity;
use crate::error::AppError;
use crate::extractors::{extract_validated_json, Validate};
use crate::state::AppState;

/// Request to grant or revoke a role.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RoleChangeRequest {
    /// `MANUFACTURER`, `DISTRIBUTOR`, `RETAILER`, or `ADMIN`.
    pub role: String,
    pub account: String,
}

impl RoleChangeRequest {
    fn parse(&self) -> Result<(Role, Identity), ValidationError> {
        Ok((self.role.parse()?, Identity::new(self.account.as_str())?))
    }
}

impl Validate for RoleChangeRequest {
    fn validate(&self) -> Result<(), String> {
        self.parse().map(|_| ()).map_err(|e| e.to_string())
    }
}

/// Outcome of a grant or revoke.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RoleChangeResponse {
    pub role: String,
    pub account: String,
    /// `false` when the call was a no-op (already granted / not held).
    pub changed: bool,
}

/// Membership query result.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RoleCheckResponse {
    pub role: String,
    pub account: String,
    pub has_role: bool,
}

/// Build the roles router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/roles/grant", post(grant_role))
        .route("/v1/roles/revoke", post(revoke_role))
        .route("/v1/roles/{role}/{account}", get(has_role))
}

/// POST /v1/roles/grant: Add an account to a role.
#[utoipa::path(
    post,
    path = "/v1/roles/grant",
    request_body = RoleChangeRequest,
    responses(
        (status = 200, description = "Role granted (or already held)", body = RoleChangeResponse),
        (status = 401, description = "No caller identity", body = crate::error::ErrorBody),
        (status = 403, description = "Caller is not an admin", body = crate::error::ErrorBody),
        (status = 422, description = "Unknown role or invalid account", body = crate::error::ErrorBody),
    ),
    tag = "roles"
)]
pub async fn grant_role(
    State(state): State<AppState>,
    CallerIdentity(caller): CallerIdentity,
    body: Result<Json<RoleChangeRequest>, JsonRejection>,
) -> Result<Json<RoleChangeResponse>, AppError> {
    let req = extract_validated_json(body)?;
    let (role, account) = req.parse()?;
    let changed = state.gate.grant_role(&caller, role, account.clone())?;
    Ok(Json(RoleChangeResponse {
        role: role.to_string(),
        account: account.to_string(),
        changed,
    }))
}

/// POST /v1/roles/revoke: Remove an account from a role.
///
/// Products the account already holds stay with it.
#[utoipa::path(
    post,
    path = "/v1/roles/revoke",
    request_body = RoleChangeRequest,
    responses(
        (status = 200, description = "Role revoked (or not held)", body = RoleChangeResponse),
        (status = 401, description = "No caller identity", body = crate::error::ErrorBody),
        (status = 403, description = "Caller is not an admin", body = crate::error::ErrorBody),
        (status = 422, description = "Unknown role or invalid account", body = crate::error::ErrorBody),
    ),
    tag = "roles"
)]
pub async fn revoke_role(
    State(state): State<AppState>,
    CallerIdentity(caller): CallerIdentity,
    body: Result<Json<RoleChangeRequest>, JsonRejection>,
) -> Result<Json<RoleChangeResponse>, AppError> {
    let req = extract_validated_json(body)?;
    let (role, account) = req.parse()?;
    let changed = state.gate.revoke_role(&caller, role, &account)?;
    Ok(Json(RoleChangeResponse {
        role: role.to_string(),
        account: account.to_string(),
        changed,
    }))
}

/// GET /v1/roles/{role}/{account}: Membership query.
#[utoipa::path(
    get,
    path = "/v1/roles/{role}/{account}",
    params(
        ("role" = String, Path, description = "Role name"),
        ("account" = String, Path, description = "Account identity"),
    ),
    responses(
        (status = 200, description = "Membership", body = RoleCheckResponse),
        (status = 422, description = "Unknown role or invalid account", body = crate::error::ErrorBody),
    ),
    tag = "roles"
)]
pub async fn has_role(
    State(state): State<AppState>,
    Path((role, account)): Path<(String, String)>,
) -> Result<Json<RoleCheckResponse>, AppError> {
    let role: Role = role.parse()?;
    let account = Identity::new(account)?;
    Ok(Json(RoleCheckResponse {
        has_role: state.gate.has_role(role, &account),
        role: role.to_string(),
        account: account.to_string(),
    }))
}
