use axum::{extract::State, routing::get, Router};

use crate::{services::analytics::DashboardMetrics, ApiResponse, ApiResult, AppState};

/// Build the analytics Router scoped under `/api/v1/analytics`.
pub fn analytics_routes() -> Router<AppState> {
    Router::new().route("/dashboard", get(get_dashboard_metrics))
}

/// Catalog totals, products per workflow stage and type, and recent activity
#[utoipa::path(
    get,
    path = "/api/v1/analytics/dashboard",
    responses(
        (status = 200, description = "Dashboard metrics retrieved successfully", body = ApiResponse<DashboardMetrics>)
    ),
    tag = "Analytics"
)]
pub async fn get_dashboard_metrics(State(state): State<AppState>) -> ApiResult<DashboardMetrics> {
    let metrics = state.services.analytics.get_dashboard_metrics().await?;
    Ok(ApiResponse::ok(metrics))
}
