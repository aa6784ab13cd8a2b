use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    entities::store_view,
    handlers::common::PageWindow,
    services::stores::{CreateStoreViewInput, UpdateStoreViewInput},
    ApiResponse, ApiResult, AppState,
};

/// Build the store view Router scoped under `/api/v1/store-views`.
pub fn store_views_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_store_views).post(create_store_view))
        .route(
            "/:id",
            get(get_store_view)
                .put(update_store_view)
                .delete(delete_store_view),
        )
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct StoreViewListQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub store_id: Option<i32>,
}

#[utoipa::path(
    get,
    path = "/api/v1/store-views",
    params(StoreViewListQuery),
    responses(
        (status = 200, description = "Store views retrieved", body = ApiResponse<Vec<store_view::Model>>)
    ),
    tag = "Stores"
)]
pub async fn list_store_views(
    State(state): State<AppState>,
    Query(query): Query<StoreViewListQuery>,
) -> ApiResult<Vec<store_view::Model>> {
    let window = PageWindow::resolve(&state.config, query.page, query.limit);
    let result = state
        .services
        .stores
        .list_store_views(query.store_id, window.page, window.limit)
        .await?;
    Ok(window.respond(result))
}

#[utoipa::path(
    post,
    path = "/api/v1/store-views",
    request_body = CreateStoreViewInput,
    responses(
        (status = 201, description = "Store view created", body = ApiResponse<store_view::Model>),
        (status = 404, description = "Store or locale not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Code already exists", body = crate::errors::ErrorResponse)
    ),
    tag = "Stores"
)]
pub async fn create_store_view(
    State(state): State<AppState>,
    Json(payload): Json<CreateStoreViewInput>,
) -> ApiResult<store_view::Model> {
    let view = state.services.stores.create_store_view(payload).await?;
    Ok(ApiResponse::created(view).message("Store view created"))
}

#[utoipa::path(
    get,
    path = "/api/v1/store-views/{id}",
    params(("id" = i32, Path, description = "Store view id")),
    responses(
        (status = 200, description = "Store view found", body = ApiResponse<store_view::Model>),
        (status = 404, description = "Store view not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Stores"
)]
pub async fn get_store_view(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<store_view::Model> {
    Ok(ApiResponse::ok(
        state.services.stores.get_store_view(id).await?,
    ))
}

#[utoipa::path(
    put,
    path = "/api/v1/store-views/{id}",
    params(("id" = i32, Path, description = "Store view id")),
    request_body = UpdateStoreViewInput,
    responses(
        (status = 200, description = "Store view updated", body = ApiResponse<store_view::Model>),
        (status = 404, description = "Store view not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Stores"
)]
pub async fn update_store_view(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateStoreViewInput>,
) -> ApiResult<store_view::Model> {
    let view = state
        .services
        .stores
        .update_store_view(id, payload)
        .await?;
    Ok(ApiResponse::ok(view).message("Store view updated"))
}

#[utoipa::path(
    delete,
    path = "/api/v1/store-views/{id}",
    params(("id" = i32, Path, description = "Store view id")),
    responses(
        (status = 200, description = "Store view deleted"),
        (status = 404, description = "Store view not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Stores"
)]
pub async fn delete_store_view(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<()> {
    state.services.stores.delete_store_view(id).await?;
    Ok(ApiResponse::empty("Store view deleted"))
}
