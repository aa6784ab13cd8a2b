#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use pim_api::{build_app, config::AppConfig, db, AppState};
use serde_json::{json, Value};
use tower::ServiceExt;

pub const TEST_CSRF_SECRET: &str = "test_csrf_secret_for_integration_tests_only";

/// A fully wired application over a fresh in-memory SQLite database.
pub struct TestApp {
    router: Router,
    pub state: AppState,
    csrf_token: String,
}

/// Status plus the decoded body of one response.
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Value,
    pub raw: String,
}

impl TestResponse {
    /// The `data` field of a success envelope.
    pub fn data(&self) -> &Value {
        &self.body["data"]
    }

    pub fn id(&self) -> i64 {
        self.body["data"]["id"]
            .as_i64()
            .unwrap_or_else(|| panic!("response has no data.id: {}", self.raw))
    }
}

impl TestApp {
    pub async fn new() -> Self {
        let mut cfg = AppConfig::new(
            "sqlite::memory:".to_string(),
            TEST_CSRF_SECRET.to_string(),
            "127.0.0.1".to_string(),
            18_080,
            "development".to_string(),
        );
        cfg.auto_migrate = true;
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("connect to in-memory sqlite");
        db::run_migrations(&pool).await.expect("run migrations");

        let state = AppState::new(Arc::new(pool), cfg);
        let router = build_app(state.clone());

        let mut app = Self {
            router,
            state,
            csrf_token: String::new(),
        };
        let issued = app.get("/api/v1/csrf-token").await;
        assert_eq!(issued.status, StatusCode::OK, "{}", issued.raw);
        app.csrf_token = issued.data()["csrfToken"]
            .as_str()
            .expect("csrf token in response")
            .to_string();
        app
    }

    pub fn csrf_token(&self) -> &str {
        &self.csrf_token
    }

    /// Sends a request exactly as given; no CSRF header is added.
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("read response body")
            .to_bytes();
        let raw = String::from_utf8_lossy(&bytes).into_owned();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        TestResponse {
            status,
            headers,
            body,
            raw,
        }
    }

    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> TestResponse {
        let mut builder = Request::builder().method(method.clone()).uri(uri);
        if method != Method::GET {
            builder = builder.header("csrf-token", &self.csrf_token);
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("valid request");
        self.send(request).await
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.request(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> TestResponse {
        self.request(Method::POST, uri, Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> TestResponse {
        self.request(Method::PUT, uri, Some(body)).await
    }

    pub async fn patch(&self, uri: &str, body: Value) -> TestResponse {
        self.request(Method::PATCH, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> TestResponse {
        self.request(Method::DELETE, uri, None).await
    }

    /// Creates a product and returns its id.
    pub async fn create_product(&self, sku: &str, name: &str) -> i64 {
        let response = self
            .post(
                "/api/v1/products",
                json!({ "sku": sku, "name": name, "productType": "SIMPLE" }),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.raw);
        response.id()
    }

    pub async fn create_attribute(&self, code: &str, data_type: &str) -> i64 {
        let response = self
            .post(
                "/api/v1/attributes",
                json!({ "code": code, "label": code, "dataType": data_type }),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.raw);
        response.id()
    }

    /// Creates a locale, a store and one store view; returns the view id.
    pub async fn create_store_view(&self, store_code: &str, locale_code: &str) -> i64 {
        let locale = self
            .post(
                "/api/v1/locales",
                json!({ "code": locale_code, "name": locale_code }),
            )
            .await;
        assert_eq!(locale.status, StatusCode::CREATED, "{}", locale.raw);
        let store = self
            .post(
                "/api/v1/stores",
                json!({ "code": store_code, "name": store_code }),
            )
            .await;
        assert_eq!(store.status, StatusCode::CREATED, "{}", store.raw);
        let view = self
            .post(
                "/api/v1/store-views",
                json!({
                    "code": format!("{}_{}", store_code, locale_code.to_lowercase()),
                    "name": locale_code,
                    "storeId": store.id(),
                    "localeId": locale.id(),
                }),
            )
            .await;
        assert_eq!(view.status, StatusCode::CREATED, "{}", view.raw);
        view.id()
    }
}
