//! # Event Journal API
//!
//! Read access to the ledger's append-only journal. Poll with `since` set
//! to the last `head` seen to receive only newer entries.

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use custody_ledger::LedgerEvent;

use crate::state::AppState;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct EventsQuery {
    /// Return entries with a sequence number greater than this. Default 0.
    pub since: Option<u64>,
}

/// Journal entries after the requested sequence number.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EventsResponse {
    /// Sequence number to pass as `since` on the next poll.
    pub head: u64,
    #[schema(value_type = Vec<Object>)]
    pub events: Vec<LedgerEvent>,
}

/// Build the events router.
pub fn router() -> Router<AppState> {
    Router::new().route("/v1/events", get(list_events))
}

/// GET /v1/events: Journal entries, optionally after `since`.
#[utoipa::path(
    get,
    path = "/v1/events",
    params(EventsQuery),
    responses(
        (status = 200, description = "Journal entries", body = EventsResponse),
    ),
    tag = "events"
)]
pub async fn list_events(
    State(state): State<AppState>,
    Query(query): Query<EventsQuery>,
) -> Json<EventsResponse> {
    let (head, events) = state.gate.journal_since(query.since.unwrap_or(0));
    Json(EventsResponse { head, events })
}
