//! # Product Custody API
//!
//! Origination, custody transfer, receipt, and the unauthenticated product
//! reads. Status is reported as its ordinal: `0` created, `1` in transit,
//! `2` received.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use custody_core::{Identity, ProductId};
use custody_ledger::LedgerEvent;
use custody_state::ProductState;

use crate::auth::CallerIdentity;
use crate::error::AppError;
use crate::extractors::{extract_validated_json, Validate};
use crate::state::AppState;

/// Request to originate a product.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateProductRequest {
    /// Free-form description, stored as given.
    pub details: String,
}

impl Validate for CreateProductRequest {
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

/// Request to hand a product to another custodian.
#[derive(Debug, Deserialize, ToSchema)]
pub struct TransferRequest {
    pub to: String,
}

impl Validate for TransferRequest {
    fn validate(&self) -> Result<(), String> {
        Identity::new(self.to.as_str())
            .map(|_| ())
            .map_err(|e| e.to_string())
    }
}

/// A product's current state.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProductResponse {
    pub id: u64,
    pub owner: String,
    /// `0` CREATED, `1` IN_TRANSIT, `2` RECEIVED.
    pub status: u8,
    pub details: String,
    pub creator: String,
}

impl From<ProductState> for ProductResponse {
    fn from(state: ProductState) -> Self {
        Self {
            id: state.id.get(),
            owner: state.owner.into(),
            status: state.status.ordinal(),
            details: state.details,
            creator: state.creator.into(),
        }
    }
}

/// A product's custody history.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProductHistoryResponse {
    pub product_id: u64,
    /// Journal entries for the product, oldest first.
    #[schema(value_type = Vec<Object>)]
    pub events: Vec<LedgerEvent>,
}

/// Build the products router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/products", post(create_product).get(list_products))
        .route("/v1/products/{id}", get(get_product))
        .route("/v1/products/{id}/history", get(product_history))
        .route("/v1/products/{id}/transfer", post(transfer_shipment))
        .route("/v1/products/{id}/receipt", post(record_receipt))
}

fn parse_id(raw: &str) -> Result<ProductId, AppError> {
    Ok(raw.parse::<ProductId>()?)
}

/// POST /v1/products: Originate a product owned by the caller.
#[utoipa::path(
    post,
    path = "/v1/products",
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Product created", body = ProductResponse),
        (status = 401, description = "No caller identity", body = crate::error::ErrorBody),
        (status = 403, description = "Caller lacks MANUFACTURER", body = crate::error::ErrorBody),
    ),
    tag = "products"
)]
pub async fn create_product(
    State(state): State<AppState>,
    CallerIdentity(caller): CallerIdentity,
    body: Result<Json<CreateProductRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ProductResponse>), AppError> {
    let req = extract_validated_json(body)?;
    let product = state.gate.create_product(&caller, req.details)?;
    Ok((StatusCode::CREATED, Json(product.into())))
}

/// GET /v1/products: All products, ascending by id.
#[utoipa::path(
    get,
    path = "/v1/products",
    responses(
        (status = 200, description = "All products", body = Vec<ProductResponse>),
    ),
    tag = "products"
)]
pub async fn list_products(State(state): State<AppState>) -> Json<Vec<ProductResponse>> {
    Json(
        state
            .gate
            .list_products()
            .into_iter()
            .map(ProductResponse::from)
            .collect(),
    )
}

/// GET /v1/products/{id}: Current state of one product.
#[utoipa::path(
    get,
    path = "/v1/products/{id}",
    params(("id" = u64, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product found", body = ProductResponse),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
    ),
    tag = "products"
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProductResponse>, AppError> {
    let id = parse_id(&id)?;
    Ok(Json(state.gate.get_product_state(id)?.into()))
}

/// GET /v1/products/{id}/history: Custody events for one product.
#[utoipa::path(
    get,
    path = "/v1/products/{id}/history",
    params(("id" = u64, Path, description = "Product id")),
    responses(
        (status = 200, description = "Custody history", body = ProductHistoryResponse),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
    ),
    tag = "products"
)]
pub async fn product_history(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProductHistoryResponse>, AppError> {
    let id = parse_id(&id)?;
    let events = state.gate.product_history(id)?;
    Ok(Json(ProductHistoryResponse {
        product_id: id.get(),
        events,
    }))
}

/// POST /v1/products/{id}/transfer: Hand the product to another custodian.
#[utoipa::path(
    post,
    path = "/v1/products/{id}/transfer",
    params(("id" = u64, Path, description = "Product id")),
    request_body = TransferRequest,
    responses(
        (status = 200, description = "Custody transferred", body = ProductResponse),
        (status = 401, description = "No caller identity", body = crate::error::ErrorBody),
        (status = 403, description = "Caller is not the owner", body = crate::error::ErrorBody),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
    ),
    tag = "products"
)]
pub async fn transfer_shipment(
    State(state): State<AppState>,
    CallerIdentity(caller): CallerIdentity,
    Path(id): Path<String>,
    body: Result<Json<TransferRequest>, JsonRejection>,
) -> Result<Json<ProductResponse>, AppError> {
    let id = parse_id(&id)?;
    let req = extract_validated_json(body)?;
    let to = Identity::new(req.to)?;
    Ok(Json(state.gate.transfer_shipment(&caller, id, to)?.into()))
}

/// POST /v1/products/{id}/receipt: Acknowledge an in-transit product.
#[utoipa::path(
    post,
    path = "/v1/products/{id}/receipt",
    params(("id" = u64, Path, description = "Product id")),
    responses(
        (status = 200, description = "Receipt recorded", body = ProductResponse),
        (status = 401, description = "No caller identity", body = crate::error::ErrorBody),
        (status = 403, description = "Caller is not the owner", body = crate::error::ErrorBody),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
        (status = 409, description = "Product is not in transit", body = crate::error::ErrorBody),
    ),
    tag = "products"
)]
pub async fn record_receipt(
    State(state): State<AppState>,
    CallerIdentity(caller): CallerIdentity,
    Path(id): Path<String>,
) -> Result<Json<ProductResponse>, AppError> {
    let id = parse_id(&id)?;
    Ok(Json(state.gate.record_receipt(&caller, id)?.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use custody_core::ProductStatus;

    #[test]
    fn transfer_request_requires_identity() {
        assert!(TransferRequest { to: "0xabc".into() }.validate().is_ok());
        assert!(TransferRequest { to: "".into() }.validate().is_err());
        assert!(TransferRequest { to: "a b".into() }.validate().is_err());
    }

    #[test]
    fn create_request_accepts_any_details() {
        assert!(CreateProductRequest {
            details: String::new()
        }
        .validate()
        .is_ok());
    }

    #[test]
    fn response_reports_status_ordinal() {
        let state = ProductState {
            id: ProductId::FIRST,
            owner: Identity::new("d").unwrap(),
            status: ProductStatus::InTransit,
            details: "X".into(),
            creator: Identity::new("m").unwrap(),
        };
        let json = serde_json::to_value(ProductResponse::from(state)).unwrap();
        assert_eq!(json["status"], 1);
        assert_eq!(json["owner"], "d");
        assert_eq!(json["creator"], "m");
    }

    #[test]
    fn parse_id_rejects_zero() {
        assert!(matches!(parse_id("0"), Err(AppError::Validation(_))));
        assert_eq!(parse_id("3").unwrap().get(), 3);
    }
}
