//! # custody-api: HTTP Service for the Custody Ledger
//!
//! Exposes the [`AccessGate`](custody_ledger::AccessGate) over HTTP with
//! Axum/Tower/Tokio.
//!
//! ## API Surface
//!
//! | Route                               | Module               |
//! |-------------------------------------|----------------------|
//! | `POST /v1/roles/grant`              | [`routes::roles`]    |
//! | `POST /v1/roles/revoke`             | [`routes::roles`]    |
//! | `GET  /v1/roles/{role}/{account}`   | [`routes::roles`]    |
//! | `POST /v1/products`                 | [`routes::products`] |
//! | `GET  /v1/products`                 | [`routes::products`] |
//! | `GET  /v1/products/{id}`            | [`routes::products`] |
//! | `GET  /v1/products/{id}/history`    | [`routes::products`] |
//! | `POST /v1/products/{id}/transfer`   | [`routes::products`] |
//! | `POST /v1/products/{id}/receipt`    | [`routes::products`] |
//! | `GET  /v1/events`                   | [`routes::events`]   |
//! | `GET  /openapi.json`                | [`openapi`]          |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → MetricsMiddleware → AuthMiddleware → Handler
//! ```
//!
//! Health probes and `/metrics` sit outside the auth middleware.

pub mod auth;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::middleware::from_fn;
use axum::routing::get;
use axum::Router;

use crate::auth::AuthConfig;

pub use error::AppError;
pub use state::{AppConfig, AppState};

/// Assemble the full application router with all routes and middleware.
pub fn app(state: AppState) -> Router {
    let auth_config = AuthConfig {
        token: state.config.auth_token.clone(),
    };

    let api = Router::new()
        .merge(routes::roles::router())
        .merge(routes::products::router())
        .merge(routes::events::router())
        .merge(openapi::router())
        .layer(from_fn(auth::auth_middleware))
        .layer(axum::Extension(auth_config));

    let ops = Router::new()
        .route("/health/liveness", get(liveness))
        .route("/health/readiness", get(readiness))
        .route("/metrics", get(middleware::metrics::render));

    Router::new()
        .merge(ops)
        .merge(api)
        .layer(from_fn(middleware::metrics::metrics_middleware))
        .layer(middleware::tracing_layer::layer())
        .with_state(state)
}

/// Liveness probe: always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe: returns 200 once the ledger lock can be taken.
async fn readiness(axum::extract::State(state): axum::extract::State<AppState>) -> String {
    format!("ready head={}", state.gate.journal_head())
}
