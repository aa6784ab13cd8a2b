//! PIM API Library
//!
//! Product information management backend: products on an EAV attribute model,
//! attribute sets and groups, categories with per-store-view translations,
//! assets, store scopes, workspace collaboration and product import/export.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

// Core modules
pub mod auth;
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod handlers;
pub mod middleware_helpers;
pub mod migrator;
pub mod models;
pub mod openapi;
pub mod services;
pub mod tracing;

use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use sea_orm::DatabaseConnection;
use serde::Serialize;
use std::{sync::Arc, time::Duration};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
};
use utoipa::ToSchema;

use crate::auth::CsrfProtection;
use crate::services::total_pages;

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub services: handlers::AppServices,
    pub csrf: Arc<CsrfProtection>,
}

impl AppState {
    pub fn new(db: Arc<DatabaseConnection>, config: config::AppConfig) -> Self {
        let services = handlers::AppServices::new(db.clone(), &config);
        let csrf = Arc::new(CsrfProtection::new(
            config.csrf_secret.as_bytes(),
            Duration::from_secs(config.csrf_token_ttl_secs),
        ));
        Self {
            db,
            config,
            services,
            csrf,
        }
    }
}

/// Pagination metadata attached to list responses
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub total: u64,
    pub page: u64,
    pub limit: u64,
    pub total_pages: u64,
}

impl PageMeta {
    pub fn new(total: u64, page: u64, limit: u64) -> Self {
        Self {
            total,
            page,
            limit,
            total_pages: total_pages(total, limit),
        }
    }
}

/// Success envelope: `{ success, statusCode, message, data, meta? }`
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub success: bool,
    pub status_code: u16,
    pub message: String,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<PageMeta>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self::with_status(StatusCode::OK, "Success", data)
    }

    pub fn created(data: T) -> Self {
        Self::with_status(StatusCode::CREATED, "Created", data)
    }

    pub fn with_status(status: StatusCode, message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            status_code: status.as_u16(),
            message: message.into(),
            data,
            meta: None,
        }
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }
}

impl<T> ApiResponse<Vec<T>> {
    pub fn paginated(items: Vec<T>, total: u64, page: u64, limit: u64) -> Self {
        let mut response = Self::ok(items);
        response.meta = Some(PageMeta::new(total, page, limit));
        response
    }
}

impl ApiResponse<()> {
    /// Envelope for operations with nothing to return, such as deletes.
    pub fn empty(message: impl Into<String>) -> Self {
        Self::with_status(StatusCode::OK, message, ())
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::OK);
        (status, Json(self)).into_response()
    }
}

/// Standard API result type for enveloped JSON responses
pub type ApiResult<T> = Result<ApiResponse<T>, errors::ServiceError>;

/// All `/api/v1` resources.
pub fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .nest("/products", handlers::products::products_routes())
        .nest("/attributes", handlers::attributes::attributes_routes())
        .nest(
            "/attribute-sets",
            handlers::attribute_sets::attribute_sets_routes(),
        )
        .nest(
            "/attribute-groups",
            handlers::attribute_groups::attribute_groups_routes(),
        )
        .nest(
            "/product-attributes",
            handlers::product_attributes::product_attributes_routes(),
        )
        .nest("/categories", handlers::categories::categories_routes())
        .nest(
            "/category-translations",
            handlers::category_translations::category_translations_routes(),
        )
        .nest(
            "/product-categories",
            handlers::product_categories::product_categories_routes(),
        )
        .nest("/assets", handlers::assets::assets_routes())
        .nest(
            "/product-assets",
            handlers::product_assets::product_assets_routes(),
        )
        .nest("/stores", handlers::stores::stores_routes())
        .nest("/store-views", handlers::store_views::store_views_routes())
        .nest("/locales", handlers::locales::locales_routes())
        .nest("/workspaces", handlers::workspaces::workspaces_routes())
        .nest("/invitations", handlers::invitations::invitations_routes())
        .nest("/teams", handlers::teams::teams_routes())
        .nest("/analytics", handlers::analytics::analytics_routes())
        .route("/csrf-token", get(handlers::csrf::get_csrf_token))
}

/// Builds the CORS layer: explicit origins when configured, permissive when
/// allowed, otherwise same-origin only.
pub fn cors_layer(config: &config::AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_allowed_origins
        .as_deref()
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    if !origins.is_empty() {
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    } else if config.should_allow_permissive_cors() {
        ::tracing::info!("Using permissive CORS because explicit origins were not configured");
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
    }
}

/// Full application router: health, the CSRF-protected v1 API and Swagger UI.
pub fn build_app(state: AppState) -> Router {
    let api = api_v1_routes().layer(axum::middleware::from_fn_with_state(
        state.csrf.clone(),
        middleware_helpers::csrf::csrf_middleware,
    ));

    Router::new()
        .route("/health", get(handlers::health::health_check))
        .nest("/api/v1", api)
        .merge(openapi::swagger_ui())
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(state.config.max_import_bytes))
        .layer(crate::tracing::configure_http_tracing())
        .layer(CompressionLayer::new())
        .layer(cors_layer(&state.config))
        .layer(axum::middleware::from_fn(
            middleware_helpers::request_id::request_id_middleware,
        ))
        .with_state(state)
}

#[cfg(test)]
mod response_tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn success_envelope_omits_meta() {
        let body = serde_json::to_value(ApiResponse::ok(json!({ "id": 1 }))).unwrap();
        assert_eq!(
            body,
            json!({
                "success": true,
                "statusCode": 200,
                "message": "Success",
                "data": { "id": 1 }
            })
        );
    }

    #[test]
    fn paginated_envelope_carries_meta() {
        let body = serde_json::to_value(ApiResponse::paginated(vec![1, 2], 41, 2, 20)).unwrap();
        assert_eq!(
            body["meta"],
            json!({ "total": 41, "page": 2, "limit": 20, "totalPages": 3 })
        );
    }

    #[test]
    fn created_envelope_uses_201() {
        let response = ApiResponse::created("x").message("Product created");
        assert_eq!(response.status_code, 201);
        assert_eq!(response.message, "Product created");
        assert_eq!(response.into_response().status(), StatusCode::CREATED);
    }

    #[test]
    fn empty_envelope_has_null_data() {
        let body = serde_json::to_value(ApiResponse::empty("Deleted")).unwrap();
        assert!(body["data"].is_null());
        assert_eq!(body["message"], "Deleted");
    }
}
