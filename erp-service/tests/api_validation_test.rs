//! Request handling that is decided before any store access, exercised
//! in-process against a client that never connects.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use erp_service::config::{ErpConfig, FinanceConfig, MongoConfig};
use erp_service::services::MongoDb;
use erp_service::startup::{router, AppState};
use secrecy::Secret;
use serde_json::{json, Value};
use service_core::config::Config as CoreConfig;
use tower::ServiceExt;

async fn app() -> Router {
    let config = ErpConfig {
        common: CoreConfig::default(),
        mongodb: MongoConfig {
            uri: Secret::new("mongodb://127.0.0.1:1/?serverSelectionTimeoutMS=200".to_string()),
            database: "erp_validation_test".to_string(),
        },
        finance: FinanceConfig::default(),
        otlp_endpoint: None,
    };
    let db = MongoDb::connect("mongodb://127.0.0.1:1/?serverSelectionTimeoutMS=200", "erp_validation_test")
        .await
        .expect("Failed to create MongoDB client");
    router(AppState::new(config, db))
}

async fn send(request: Request<Body>) -> (StatusCode, Value) {
    let response = app().await.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .header("X-User-ID", "user-1")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn health_does_not_need_the_store() {
    let (status, body) = send(get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["service"], "erp-service");
}

#[tokio::test]
async fn mutation_without_user_id_is_unauthorized() {
    let request = Request::builder()
        .method("POST")
        .uri("/receipts")
        .header("content-type", "application/json")
        .body(Body::from("{}"))
        .unwrap();

    let (status, body) = send(request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["status"], "error");
    assert_eq!(body["data"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn discount_above_sub_total_is_rejected() {
    let (status, body) = send(post(
        "/receipts",
        json!({
            "customer_name": "Acme",
            "items": [{ "description": "Widget", "quantity": 1, "unit_price": 100 }],
            "discount": 150
        }),
    ))
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["data"]["code"], "INVALID_DISCOUNT");
}

#[tokio::test]
async fn receipt_needs_at_least_one_item() {
    let (status, body) = send(post(
        "/receipts",
        json!({ "customer_name": "Acme", "items": [] }),
    ))
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["data"]["code"], "VALIDATION_ERROR");
    assert!(body["data"]["details"]["items"].is_array());
}

#[tokio::test]
async fn negative_quantity_is_rejected() {
    let (status, body) = send(post(
        "/receipts",
        json!({
            "customer_name": "Acme",
            "items": [{ "description": "Widget", "quantity": -1, "unit_price": 100 }]
        }),
    ))
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["data"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let request = Request::builder()
        .method("POST")
        .uri("/payables")
        .header("content-type", "application/json")
        .header("X-User-ID", "user-1")
        .body(Body::from("{\"invoice_no\": "))
        .unwrap();

    let (status, body) = send(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["data"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn non_positive_obligation_amount_is_rejected() {
    let (status, body) = send(post(
        "/payables",
        json!({ "invoice_no": "PO-1", "supplier_name": "Supplier", "amount": 0 }),
    ))
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["data"]["details"]["amount"].is_array());
}

#[tokio::test]
async fn oversized_receipt_line_is_a_validation_error() {
    let (status, body) = send(post(
        "/receipts",
        json!({
            "customer_name": "Acme",
            "items": [{
                "description": "Widget",
                "quantity": 1000000000000000_u64,
                "unit_price": 1000000000000000_u64
            }]
        }),
    ))
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["data"]["code"], "VALIDATION_ERROR");
    assert!(body["data"]["details"]["items"].is_array());
}

#[tokio::test]
async fn oversized_amounts_are_rejected() {
    for uri in ["/payables", "/receivables", "/incomes", "/expenses"] {
        let (status, body) = send(post(
            uri,
            json!({
                "invoice_no": "INV-1",
                "supplier_name": "Supplier",
                "customer_name": "Customer",
                "title": "Huge",
                "amount": 7.0e19
            }),
        ))
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{}", uri);
        assert!(body["data"]["details"]["amount"].is_array(), "{}", uri);
    }
}

#[tokio::test]
async fn unknown_sort_field_is_rejected() {
    let (status, body) = send(get("/receipts?sort_by=password")).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["data"]["details"]["sort_by"].is_array());
}

#[tokio::test]
async fn unknown_status_filter_is_rejected() {
    let (status, body) = send(get("/receivables?status=cancelled")).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["data"]["details"]["status"].is_array());
}

#[tokio::test]
async fn inverted_date_range_is_rejected() {
    let (status, body) =
        send(get("/incomes?start_date=2025-05-01&end_date=2025-04-01")).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["data"]["details"]["end_date"].is_array());
}

#[tokio::test]
async fn malformed_date_is_rejected() {
    let (status, body) = send(get("/receipts/next-number?date=2025-13-01")).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["data"]["details"]["date"].is_array());
}

#[tokio::test]
async fn unknown_report_granularity_is_rejected() {
    let (status, _) = send(get("/expenses/report?report=week")).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn non_numeric_page_is_a_bad_request() {
    let (status, body) = send(get("/payment-transactions?page=abc")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["data"]["code"], "BAD_REQUEST");
}
