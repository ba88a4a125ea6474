//! # Caller Authentication
//!
//! Resolves the identity a request acts as. The ledger itself decides what
//! that identity may do; this layer only establishes who is asking.
//!
//! ## Token Format
//!
//! ```text
//! Authorization: Bearer {identity}:{secret}
//! ```
//!
//! The secret is the deployment's shared `AUTH_TOKEN`, compared in constant
//! time. The identity is everything before the last `:`, so identities may
//! themselves contain colons.
//!
//! ## Development Mode
//!
//! With no `AUTH_TOKEN` configured the `x-custody-caller` header names the
//! caller directly.
//!
//! Requests without credentials pass through anonymously: read routes serve
//! them, and handlers that need a caller reject them with 401 through the
//! [`CallerIdentity`] extractor.

use axum::extract::{FromRequestParts, Request};
use axum::http::request::Parts;
use axum::http::{header, HeaderMap, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use subtle::ConstantTimeEq;

use custody_core::Identity;

use crate::error::{AppError, ErrorBody, ErrorDetail};

/// Header naming the caller when authentication is disabled.
pub const CALLER_HEADER: &str = "x-custody-caller";

/// The identity an authenticated request acts as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity(pub Identity);

impl<S: Send + Sync> FromRequestParts<S> for CallerIdentity {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CallerIdentity>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("this operation requires a caller identity".into()))
    }
}

/// Auth configuration injected into request extensions.
///
/// Custom `Debug` redacts the token value to prevent credential leakage in logs.
#[derive(Clone)]
pub struct AuthConfig {
    pub token: Option<String>,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Constant-time comparison of secrets.
///
/// When lengths differ, performs a dummy comparison so timing does not
/// depend on where the mismatch is.
fn constant_time_token_eq(provided: &str, expected: &str) -> bool {
    let provided = provided.as_bytes();
    let expected = expected.as_bytes();
    if provided.len() != expected.len() {
        let _ = expected.ct_eq(expected);
        return false;
    }
    provided.ct_eq(expected).into()
}

/// Parse a bearer token of the form `{identity}:{secret}`.
pub fn parse_bearer_token(provided: &str, expected_secret: &str) -> Result<CallerIdentity, String> {
    let Some((identity, secret)) = provided.rsplit_once(':') else {
        return Err("invalid token format: expected {identity}:{secret}".into());
    };
    if !constant_time_token_eq(secret, expected_secret) {
        return Err("invalid bearer token".into());
    }
    Identity::new(identity)
        .map(CallerIdentity)
        .map_err(|e| e.to_string())
}

/// Resolve the caller named by `x-custody-caller`, if present.
fn dev_caller(headers: &HeaderMap) -> Result<Option<CallerIdentity>, String> {
    let Some(value) = headers.get(CALLER_HEADER) else {
        return Ok(None);
    };
    let raw = value
        .to_str()
        .map_err(|_| format!("{CALLER_HEADER} must be visible ASCII"))?;
    Identity::new(raw.trim())
        .map(|id| Some(CallerIdentity(id)))
        .map_err(|e| e.to_string())
}

/// Resolve the caller and inject a [`CallerIdentity`] into request
/// extensions.
///
/// Credentials that are present but wrong are rejected here with 401.
pub async fn auth_middleware(mut request: Request, next: Next) -> Response {
    let config = request.extensions().get::<AuthConfig>().cloned();

    let resolved = match config.and_then(|c| c.token) {
        Some(expected) => {
            match request
                .headers()
                .get(header::AUTHORIZATION)
                .map(|v| v.to_str())
            {
                None => Ok(None),
                Some(Ok(value)) => match value.strip_prefix("Bearer ") {
                    Some(provided) => parse_bearer_token(provided, &expected).map(Some),
                    None => Err("authorization header must use Bearer scheme".to_string()),
                },
                Some(Err(_)) => Err("authorization header is not valid ASCII".to_string()),
            }
        }
        None => dev_caller(request.headers()),
    };

    match resolved {
        Ok(Some(caller)) => {
            request.extensions_mut().insert(caller);
            next.run(request).await
        }
        Ok(None) => next.run(request).await,
        Err(msg) => {
            tracing::warn!(reason = %msg, "authentication failed");
            unauthorized_response(&msg)
        }
    }
}

fn unauthorized_response(message: &str) -> Response {
    let body = ErrorBody {
        error: ErrorDetail {
            code: "UNAUTHORIZED".to_string(),
            message: message.to_string(),
            details: None,
        },
    };
    (StatusCode::UNAUTHORIZED, Json(body)).into_response()
}
