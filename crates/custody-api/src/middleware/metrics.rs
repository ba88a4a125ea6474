//! # Request Metrics
//!
//! Records per-request counters and latency through the `metrics` facade.
//! When the binary installs a Prometheus recorder these are rendered at
//! `/metrics`; without a recorder the calls are no-ops.
//!
//! ## Metrics Exported
//!
//! - `custody_http_requests_total{method, status}`: every completed request.
//! - `custody_http_request_duration_seconds{method}`: handler latency.
//! - `custody_rejections_total{code}`: ledger rejections by error code.

use std::time::Instant;

use axum::extract::{Request, State};
use axum::http::{header, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::error::AppError;
use crate::state::AppState;

pub const REQUESTS_TOTAL: &str = "custody_http_requests_total";
pub const REQUEST_DURATION_SECONDS: &str = "custody_http_request_duration_seconds";
pub const REJECTIONS_TOTAL: &str = "custody_rejections_total";

/// Count the request and time the handler.
pub async fn metrics_middleware(request: Request, next: Next) -> Response {
    let method = request.method().as_str().to_owned();
    let started = Instant::now();

    let response = next.run(request).await;

    metrics::counter!(
        REQUESTS_TOTAL,
        "method" => method.clone(),
        "status" => response.status().as_u16().to_string()
    )
    .increment(1);
    metrics::histogram!(REQUEST_DURATION_SECONDS, "method" => method)
        .record(started.elapsed().as_secs_f64());

    response
}

/// Count a ledger rejection by its error code.
pub fn record_rejection(err: &AppError) {
    if let AppError::Rejected(rejection) = err {
        metrics::counter!(REJECTIONS_TOTAL, "code" => rejection.code()).increment(1);
    }
}

/// GET /metrics: Prometheus text exposition.
pub async fn render(State(state): State<AppState>) -> Response {
    match &state.prometheus {
        Some(handle) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        )
            .into_response(),
        None => (StatusCode::NOT_FOUND, "metrics disabled").into_response(),
    }
}
