use axum::extract::State;
use serde::Serialize;
use utoipa::ToSchema;

use crate::{ApiResponse, ApiResult, AppState};

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CsrfTokenResponse {
    /// Send back in the `csrf-token` header on POST, PUT, PATCH and DELETE
    pub csrf_token: String,
    pub expires_in_secs: u64,
}

/// Issue a signed, time-limited CSRF token
#[utoipa::path(
    get,
    path = "/api/v1/csrf-token",
    responses(
        (status = 200, description = "Token issued", body = ApiResponse<CsrfTokenResponse>)
    ),
    tag = "Security"
)]
pub async fn get_csrf_token(State(state): State<AppState>) -> ApiResult<CsrfTokenResponse> {
    Ok(ApiResponse::ok(CsrfTokenResponse {
        csrf_token: state.csrf.issue(),
        expires_in_secs: state.csrf.ttl().as_secs(),
    }))
}
