//! # Integration Tests for custody-api
//!
//! Drives the full router in-process: role administration, the custody
//! lifecycle, error mapping, authentication modes, the journal, and the
//! OpenAPI document.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use custody_api::state::{AppConfig, AppState};
use custody_core::{Identity, Role};
use custody_ledger::{AccessGate, Ledger};

const ADMIN: &str = "admin";
const M: &str = "0x70997970C51812dc3A010C7d01b50e0d17dc79C8";
const D: &str = "0x3C44CdDdB6a900fa2b585dd299e03d12FA4293BC";
const R: &str = "0x90F79bf6EB2c4f870365E785982E1f101E93b906";
const STRANGER: &str = "0x15d34AAf54267DB7D7c367839AAf71A00a2C6A65";

fn config(auth_token: Option<&str>) -> AppConfig {
    AppConfig {
        port: 8080,
        auth_token: auth_token.map(str::to_string),
        genesis_path: None,
        admin: None,
        metrics_enabled: false,
    }
}

/// Auth disabled; `M` already holds MANUFACTURER.
fn test_app() -> Router {
    test_app_with(None)
}

fn test_app_with(auth_token: Option<&str>) -> Router {
    let gate = AccessGate::new(Ledger::new(Identity::new(ADMIN).unwrap()));
    gate.grant_role(
        &Identity::new(ADMIN).unwrap(),
        Role::Manufacturer,
        Identity::new(M).unwrap(),
    )
    .unwrap();
    custody_api::app(AppState::new(gate, config(auth_token)))
}

async fn call(
    app: &Router,
    method: &str,
    uri: &str,
    caller: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(caller) = caller {
        builder = builder.header("x-custody-caller", caller);
    }
    let body = match body {
        Some(value) => {
            builder = builder.header("content-type", "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };
    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn owner_status(app: &Router, id: u64) -> (String, u64) {
    let (status, body) = call(app, "GET", &format!("/v1/products/{id}"), None, None).await;
    assert_eq!(status, StatusCode::OK);
    (
        body["owner"].as_str().unwrap().to_string(),
        body["status"].as_u64().unwrap(),
    )
}

// -- Health Probes ------------------------------------------------------------

#[tokio::test]
async fn test_liveness_probe() {
    let app = test_app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/health/liveness")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], b"ok");
}

#[tokio::test]
async fn test_metrics_disabled_is_404() {
    let (status, _) = call(&test_app(), "GET", "/metrics", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// -- Custody Lifecycle --------------------------------------------------------

#[tokio::test]
async fn test_end_to_end_custody_chain() {
    let app = test_app();

    let (status, created) = call(
        &app,
        "POST",
        "/v1/products",
        Some(M),
        Some(json!({"details": "High-End Sensor Unit"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["id"], 1);
    assert_eq!(created["owner"], M);
    assert_eq!(created["creator"], M);
    assert_eq!(created["status"], 0);
    assert_eq!(created["details"], "High-End Sensor Unit");

    let hops = [(M, D), (D, R)];
    for (from, to) in hops {
        let (status, body) = call(
            &app,
            "POST",
            "/v1/products/1/transfer",
            Some(from),
            Some(json!({ "to": to })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["owner"], to);
        assert_eq!(body["status"], 1);
    }

    let (status, body) = call(&app, "POST", "/v1/products/1/receipt", Some(R), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], 2);
    assert_eq!(owner_status(&app, 1).await, (R.to_string(), 2));

    call(
        &app,
        "POST",
        "/v1/products/1/transfer",
        Some(R),
        Some(json!({ "to": M })),
    )
    .await;
    assert_eq!(owner_status(&app, 1).await, (M.to_string(), 1));

    let (status, body) = call(
        &app,
        "POST",
        "/v1/products/1/transfer",
        Some(STRANGER),
        Some(json!({ "to": STRANGER })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "OWNERSHIP_ERROR");
    assert_eq!(owner_status(&app, 1).await, (M.to_string(), 1));

    let (status, history) = call(&app, "GET", "/v1/products/1/history", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let kinds: Vec<&str> = history["events"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["type"].as_str().unwrap())
        .collect();
    assert_eq!(
        kinds,
        [
            "product_created",
            "shipment_transferred",
            "shipment_transferred",
            "receipt_recorded",
            "shipment_transferred",
        ]
    );
}

#[tokio::test]
async fn test_create_without_manufacturer_role_is_forbidden() {
    let app = test_app();
    let (status, body) = call(
        &app,
        "POST",
        "/v1/products",
        Some(D),
        Some(json!({"details": "X"})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "AUTHORIZATION_ERROR");
    assert_eq!(body["error"]["details"]["role"], "MANUFACTURER");
    assert_eq!(body["error"]["details"]["caller"], D);

    let (_, list) = call(&app, "GET", "/v1/products", None, None).await;
    assert_eq!(list.as_array().unwrap().len(), 0);

    // The rejected call consumed no id.
    let (_, created) = call(
        &app,
        "POST",
        "/v1/products",
        Some(M),
        Some(json!({"details": "X"})),
    )
    .await;
    assert_eq!(created["id"], 1);
}

#[tokio::test]
async fn test_receipt_before_transfer_is_conflict() {
    let app = test_app();
    call(&app, "POST", "/v1/products", Some(M), Some(json!({"details": "X"}))).await;
    let (status, body) = call(&app, "POST", "/v1/products/1/receipt", Some(M), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "INVALID_STATE");
    assert_eq!(body["error"]["details"]["status"], 0);
}

#[tokio::test]
async fn test_receipt_by_non_owner_is_forbidden() {
    let app = test_app();
    call(&app, "POST", "/v1/products", Some(M), Some(json!({"details": "X"}))).await;
    let (status, body) = call(&app, "POST", "/v1/products/1/receipt", Some(D), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "OWNERSHIP_ERROR");
}

#[tokio::test]
async fn test_unknown_product_is_404() {
    let app = test_app();
    let (status, body) = call(&app, "GET", "/v1/products/9", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");

    let (status, _) = call(
        &app,
        "POST",
        "/v1/products/9/transfer",
        Some(M),
        Some(json!({ "to": D })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invalid_product_id_is_422() {
    let (status, body) = call(&test_app(), "GET", "/v1/products/zero", None, None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_transfer_to_invalid_identity_is_422() {
    let app = test_app();
    call(&app, "POST", "/v1/products", Some(M), Some(json!({"details": "X"}))).await;
    let (status, _) = call(
        &app,
        "POST",
        "/v1/products/1/transfer",
        Some(M),
        Some(json!({ "to": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(owner_status(&app, 1).await, (M.to_string(), 0));
}

#[tokio::test]
async fn test_malformed_json_is_400() {
    let app = test_app();
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/v1/products")
                .header("x-custody-caller", M)
                .header("content-type", "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// -- Roles --------------------------------------------------------------------

#[tokio::test]
async fn test_admin_grants_and_revokes() {
    let app = test_app();
    let grant = json!({"role": "DISTRIBUTOR", "account": D});

    let (status, body) = call(&app, "POST", "/v1/roles/grant", Some(ADMIN), Some(grant.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["changed"], true);

    let (_, body) = call(&app, "POST", "/v1/roles/grant", Some(ADMIN), Some(grant.clone())).await;
    assert_eq!(body["changed"], false);

    let (status, body) = call(&app, "GET", &format!("/v1/roles/DISTRIBUTOR/{D}"), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["has_role"], true);

    let (status, _) = call(&app, "POST", "/v1/roles/revoke", Some(ADMIN), Some(grant)).await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = call(&app, "GET", &format!("/v1/roles/distributor/{D}"), None, None).await;
    assert_eq!(body["has_role"], false);
}

#[tokio::test]
async fn test_non_admin_grant_is_forbidden() {
    let app = test_app();
    let (status, body) = call(
        &app,
        "POST",
        "/v1/roles/grant",
        Some(M),
        Some(json!({"role": "ADMIN", "account": M})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "AUTHORIZATION_ERROR");
    assert_eq!(body["error"]["details"]["role"], "ADMIN");
}

#[tokio::test]
async fn test_unknown_role_is_422() {
    let app = test_app();
    let (status, _) = call(
        &app,
        "POST",
        "/v1/roles/grant",
        Some(ADMIN),
        Some(json!({"role": "AUDITOR", "account": D})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = call(&app, "GET", &format!("/v1/roles/AUDITOR/{D}"), None, None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

// -- Authentication -----------------------------------------------------------

#[tokio::test]
async fn test_mutation_without_caller_is_401() {
    let (status, body) = call(
        &test_app(),
        "POST",
        "/v1/products",
        None,
        Some(json!({"details": "X"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_bearer_token_identifies_caller() {
    let app = test_app_with(Some("s3cret"));
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/v1/products")
                .header("authorization", format!("Bearer {M}:s3cret"))
                .header("content-type", "application/json")
                .body(Body::from(json!({"details": "X"}).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/v1/products")
                .header("authorization", format!("Bearer {M}:wrong"))
                .header("content-type", "application/json")
                .body(Body::from(json!({"details": "X"}).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_reads_need_no_credentials_with_auth_enabled() {
    let app = test_app_with(Some("s3cret"));
    let (status, _) = call(&app, "GET", "/v1/products", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = call(&app, "GET", "/v1/events", None, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_caller_header_ignored_with_auth_enabled() {
    let app = test_app_with(Some("s3cret"));
    let (status, _) = call(
        &app,
        "POST",
        "/v1/products",
        Some(M),
        Some(json!({"details": "X"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

// -- Journal ------------------------------------------------------------------

#[tokio::test]
async fn test_events_since() {
    let app = test_app();
    let (_, before) = call(&app, "GET", "/v1/events", None, None).await;
    let head = before["head"].as_u64().unwrap();
    assert_eq!(before["events"].as_array().unwrap().len() as u64, head);

    call(&app, "POST", "/v1/products", Some(M), Some(json!({"details": "X"}))).await;
    call(&app, "POST", "/v1/products", Some(D), Some(json!({"details": "Y"}))).await;

    let (status, after) = call(&app, "GET", &format!("/v1/events?since={head}"), None, None).await;
    assert_eq!(status, StatusCode::OK);
    let events = after["events"].as_array().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["type"], "product_created");
    assert_eq!(events[0]["seq"], head + 1);
    assert_eq!(after["head"], head + 1);
}

#[tokio::test]
async fn test_events_cursor_past_head_reports_real_head() {
    let app = test_app();
    call(&app, "POST", "/v1/products", Some(M), Some(json!({"details": "X"}))).await;
    let (_, all) = call(&app, "GET", "/v1/events", None, None).await;
    let head = all["head"].as_u64().unwrap();

    let stale = head + 100;
    let (status, body) = call(&app, "GET", &format!("/v1/events?since={stale}"), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["events"].as_array().unwrap().is_empty());
    assert_eq!(body["head"], head);
}

// -- OpenAPI ------------------------------------------------------------------

#[tokio::test]
async fn test_openapi_json() {
    let (status, spec) = call(&test_app(), "GET", "/openapi.json", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(spec["paths"]["/v1/products/{id}/receipt"].is_object());
    assert_eq!(spec["info"]["title"], "Custody Ledger API");
}
