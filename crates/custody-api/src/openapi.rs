//! # OpenAPI Specification Assembly
//!
//! Assembles all utoipa-documented routes into a single OpenAPI spec,
//! served at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Custody Ledger API",
        version = "0.1.0",
        description = "Role-gated origination and possession-gated custody transfer for tracked goods.",
        license(name = "AGPL-3.0-or-later")
    ),
    paths(
        // Roles
        crate::routes::roles::grant_role,
        crate::routes::roles::revoke_role,
        crate::routes::roles::has_role,
        // Products
        crate::routes::products::create_product,
        crate::routes::products::list_products,
        crate::routes::products::get_product,
        crate::routes::products::product_history,
        crate::routes::products::transfer_shipment,
        crate::routes::products::record_receipt,
        // Journal
        crate::routes::events::list_events,
    ),
    components(schemas(
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
        crate::routes::roles::RoleChangeRequest,
        crate::routes::roles::RoleChangeResponse,
        crate::routes::roles::RoleCheckResponse,
        crate::routes::products::CreateProductRequest,
        crate::routes::products::TransferRequest,
        crate::routes::products::ProductResponse,
        crate::routes::products::ProductHistoryResponse,
        crate::routes::events::EventsResponse,
    )),
    tags(
        (name = "roles", description = "Role administration"),
        (name = "products", description = "Product origination and custody"),
        (name = "events", description = "Ledger journal"),
    )
)]
pub struct ApiDoc;

/// Build the OpenAPI router.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

/// GET /openapi.json: Return the generated OpenAPI specification.
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
