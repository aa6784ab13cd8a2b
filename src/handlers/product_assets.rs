use axum::{
    extract::{Path, Query, State},
    routing::{delete, get},
    Json, Router,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    entities::product_asset, services::assets::AttachAssetInput, ApiResponse, ApiResult,
    AppState,
};

/// Build the product-asset link Router scoped under `/api/v1/product-assets`.
pub fn product_assets_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_product_assets).post(attach_asset))
        .route("/product/:product_id/asset/:asset_id", delete(detach_asset))
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ProductAssetListQuery {
    pub product_id: Option<i32>,
    pub asset_id: Option<i32>,
}

#[utoipa::path(
    get,
    path = "/api/v1/product-assets",
    params(ProductAssetListQuery),
    responses(
        (status = 200, description = "Asset links retrieved", body = ApiResponse<Vec<product_asset::Model>>)
    ),
    tag = "Assets"
)]
pub async fn list_product_assets(
    State(state): State<AppState>,
    Query(query): Query<ProductAssetListQuery>,
) -> ApiResult<Vec<product_asset::Model>> {
    Ok(ApiResponse::ok(
        state
            .services
            .assets
            .list_product_assets(query.product_id, query.asset_id)
            .await?,
    ))
}

/// Attach an asset to a product with a role and position
#[utoipa::path(
    post,
    path = "/api/v1/product-assets",
    request_body = AttachAssetInput,
    responses(
        (status = 201, description = "Asset attached", body = ApiResponse<product_asset::Model>),
        (status = 404, description = "Product or asset not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Assets"
)]
pub async fn attach_asset(
    State(state): State<AppState>,
    Json(payload): Json<AttachAssetInput>,
) -> ApiResult<product_asset::Model> {
    let link = state.services.assets.attach(payload).await?;
    Ok(ApiResponse::created(link).message("Asset attached"))
}

#[utoipa::path(
    delete,
    path = "/api/v1/product-assets/product/{product_id}/asset/{asset_id}",
    params(
        ("product_id" = i32, Path, description = "Product id"),
        ("asset_id" = i32, Path, description = "Asset id")
    ),
    responses(
        (status = 200, description = "Asset detached"),
        (status = 404, description = "Link not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Assets"
)]
pub async fn detach_asset(
    State(state): State<AppState>,
    Path((product_id, asset_id)): Path<(i32, i32)>,
) -> ApiResult<()> {
    state.services.assets.detach(product_id, asset_id).await?;
    Ok(ApiResponse::empty("Asset detached"))
}
