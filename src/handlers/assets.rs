use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    entities::asset,
    handlers::common::PageWindow,
    services::assets::{CreateAssetInput, UpdateAssetInput},
    ApiResponse, ApiResult, AppState,
};

/// Build the assets Router scoped under `/api/v1/assets`.
pub fn assets_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_assets).post(create_asset))
        .route(
            "/:id",
            get(get_asset).put(update_asset).delete(delete_asset),
        )
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct AssetListQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    /// MIME type prefix, e.g. `image/`
    pub mime_type: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/v1/assets",
    params(AssetListQuery),
    responses(
        (status = 200, description = "Assets retrieved", body = ApiResponse<Vec<asset::Model>>)
    ),
    tag = "Assets"
)]
pub async fn list_assets(
    State(state): State<AppState>,
    Query(query): Query<AssetListQuery>,
) -> ApiResult<Vec<asset::Model>> {
    let window = PageWindow::resolve(&state.config, query.page, query.limit);
    let result = state
        .services
        .assets
        .list_assets(query.mime_type, window.page, window.limit)
        .await?;
    Ok(window.respond(result))
}

#[utoipa::path(
    post,
    path = "/api/v1/assets",
    request_body = CreateAssetInput,
    responses(
        (status = 201, description = "Asset created", body = ApiResponse<asset::Model>),
        (status = 400, description = "Invalid payload", body = crate::errors::ErrorResponse)
    ),
    tag = "Assets"
)]
pub async fn create_asset(
    State(state): State<AppState>,
    Json(payload): Json<CreateAssetInput>,
) -> ApiResult<asset::Model> {
    let asset = state.services.assets.create_asset(payload).await?;
    Ok(ApiResponse::created(asset).message("Asset created"))
}

#[utoipa::path(
    get,
    path = "/api/v1/assets/{id}",
    params(("id" = i32, Path, description = "Asset id")),
    responses(
        (status = 200, description = "Asset found", body = ApiResponse<asset::Model>),
        (status = 404, description = "Asset not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Assets"
)]
pub async fn get_asset(State(state): State<AppState>, Path(id): Path<i32>) -> ApiResult<asset::Model> {
    Ok(ApiResponse::ok(state.services.assets.get_asset(id).await?))
}

#[utoipa::path(
    put,
    path = "/api/v1/assets/{id}",
    params(("id" = i32, Path, description = "Asset id")),
    request_body = UpdateAssetInput,
    responses(
        (status = 200, description = "Asset updated", body = ApiResponse<asset::Model>),
        (status = 404, description = "Asset not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Assets"
)]
pub async fn update_asset(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateAssetInput>,
) -> ApiResult<asset::Model> {
    let asset = state.services.assets.update_asset(id, payload).await?;
    Ok(ApiResponse::ok(asset).message("Asset updated"))
}

/// Delete an asset; it is detached from every product first.
#[utoipa::path(
    delete,
    path = "/api/v1/assets/{id}",
    params(("id" = i32, Path, description = "Asset id")),
    responses(
        (status = 200, description = "Asset deleted"),
        (status = 404, description = "Asset not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Assets"
)]
pub async fn delete_asset(State(state): State<AppState>, Path(id): Path<i32>) -> ApiResult<()> {
    state.services.assets.delete_asset(id).await?;
    Ok(ApiResponse::empty("Asset deleted"))
}
