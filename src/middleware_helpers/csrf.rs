use crate::auth::{CsrfProtection, CSRF_HEADER};
use crate::errors::ServiceError;
use axum::{
    extract::{Request, State},
    http::Method,
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::warn;

fn is_safe_method(method: &Method) -> bool {
    matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS)
}

/// Rejects POST/PUT/PATCH/DELETE requests without a valid `csrf-token` header.
pub async fn csrf_middleware(
    State(csrf): State<Arc<CsrfProtection>>,
    request: Request,
    next: Next,
) -> Response {
    if is_safe_method(request.method()) {
        return next.run(request).await;
    }

    let token = request
        .headers()
        .get(CSRF_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    if let Err(err) = csrf.verify(token) {
        warn!(
            method = %request.method(),
            uri = %request.uri(),
            reason = %err,
            "CSRF validation failed"
        );
        return ServiceError::Forbidden(format!("Invalid CSRF token: {}", err)).into_response();
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request as HttpRequest, StatusCode},
        routing::{get, post},
        Router,
    };
    use std::time::Duration;
    use tower::ServiceExt;

    fn app(csrf: Arc<CsrfProtection>) -> Router {
        Router::new()
            .route("/", get(|| async { "read" }))
            .route("/", post(|| async { "written" }))
            .layer(axum::middleware::from_fn_with_state(csrf, csrf_middleware))
    }

    fn csrf() -> Arc<CsrfProtection> {
        Arc::new(CsrfProtection::new(
            "middleware-test-secret-value-0123456789",
            Duration::from_secs(300),
        ))
    }

    #[tokio::test]
    async fn safe_methods_pass_without_token() {
        let response = app(csrf())
            .oneshot(HttpRequest::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn mutating_request_without_token_is_forbidden() {
        let response = app(csrf())
            .oneshot(HttpRequest::post("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn mutating_request_with_valid_token_passes() {
        let csrf = csrf();
        let token = csrf.issue();
        let response = app(csrf)
            .oneshot(
                HttpRequest::post("/")
                    .header(CSRF_HEADER, token)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
