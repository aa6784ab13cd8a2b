mod common;

use std::time::Duration;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use common::TestApp;
use pim_api::auth::CsrfProtection;
use serde_json::json;

fn create_product_request(token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/products")
        .header(header::CONTENT_TYPE, "application/json")
        .header("x-request-id", "req-csrf-check");
    if let Some(token) = token {
        builder = builder.header("csrf-token", token);
    }
    builder
        .body(Body::from(
            json!({ "sku": "SEC-1", "name": "Guarded", "productType": "SIMPLE" }).to_string(),
        ))
        .unwrap()
}

#[tokio::test]
async fn mutations_without_a_token_are_forbidden() {
    let app = TestApp::new().await;

    let response = app.send(create_product_request(None)).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.body["success"], false);
    assert_eq!(response.body["statusCode"], 403);
    assert_eq!(response.body["error"], "Forbidden");
    assert_eq!(response.body["requestId"], "req-csrf-check");
    assert_eq!(response.headers["x-request-id"], "req-csrf-check");

    let products = app.get("/api/v1/products").await;
    assert_eq!(products.body["meta"]["total"], 0);
}

#[tokio::test]
async fn tokens_signed_with_another_secret_are_rejected() {
    let app = TestApp::new().await;
    let foreign = CsrfProtection::new(
        b"a-completely-different-secret-value-0123",
        Duration::from_secs(3600),
    )
    .issue();

    let forged = app.send(create_product_request(Some(&foreign))).await;
    assert_eq!(forged.status, StatusCode::FORBIDDEN);

    let garbage = app.send(create_product_request(Some("garbage"))).await;
    assert_eq!(garbage.status, StatusCode::FORBIDDEN);

    let valid = app
        .send(create_product_request(Some(app.csrf_token())))
        .await;
    assert_eq!(valid.status, StatusCode::CREATED, "{}", valid.raw);
}

#[tokio::test]
async fn reads_do_not_need_a_token() {
    let app = TestApp::new().await;
    let response = app
        .send(
            Request::builder()
                .uri("/api/v1/products")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn csrf_token_endpoint_reports_lifetime() {
    let app = TestApp::new().await;
    let response = app.get("/api/v1/csrf-token").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["expiresInSecs"], 3600);
    let token = response.data()["csrfToken"].as_str().unwrap();
    assert!(app.state.csrf.verify(token).is_ok());
}

#[tokio::test]
async fn success_envelope_shape() {
    let app = TestApp::new().await;
    let id = app.create_product("ENV-1", "Envelope").await;

    let response = app.get(&format!("/api/v1/products/{}", id)).await;
    let body = response.body.as_object().unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["statusCode"], 200);
    assert_eq!(body["message"], "Success");
    assert!(body["data"].is_object());
    assert!(!body.contains_key("meta"));

    let list = app.get("/api/v1/products").await;
    let meta = list.body["meta"].as_object().unwrap();
    assert_eq!(meta["total"], 1);
    assert_eq!(meta["page"], 1);
    assert_eq!(meta["limit"], 20);
    assert_eq!(meta["totalPages"], 1);
}

#[tokio::test]
async fn errors_use_the_failure_envelope() {
    let app = TestApp::new().await;

    let missing = app.get("/api/v1/products/4242").await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert_eq!(missing.body["success"], false);
    assert_eq!(missing.body["statusCode"], 404);
    assert_eq!(missing.body["error"], "Not Found");
    assert_eq!(
        missing.body["message"],
        "Not found: Product with ID 4242 not found"
    );
    assert!(missing.body.get("data").is_none());

    let empty_list = app.get("/api/v1/products").await;
    assert_eq!(empty_list.body["meta"]["totalPages"], 0);
}

#[tokio::test]
async fn health_reports_database_status() {
    let app = TestApp::new().await;
    let response = app.get("/health").await;
    assert_eq!(response.status, StatusCode::OK, "{}", response.raw);
    assert_eq!(response.body["status"], "up");
    assert_eq!(response.body["database"], "up");
    assert_eq!(response.body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = TestApp::new().await;
    let response = app.get("/api-docs/openapi.json").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["info"]["title"], "PIM API");
    assert!(response.body["paths"]["/api/v1/products/import"].is_object());
}
