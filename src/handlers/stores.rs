use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};

use crate::{
    entities::store,
    handlers::common::ListQuery,
    services::stores::{CreateStoreInput, UpdateStoreInput},
    ApiResponse, ApiResult, AppState,
};

/// Build the stores Router scoped under `/api/v1/stores`.
pub fn stores_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_stores).post(create_store))
        .route("/code/:code", get(get_store_by_code))
        .route(
            "/:id",
            get(get_store).put(update_store).delete(delete_store),
        )
}

#[utoipa::path(
    get,
    path = "/api/v1/stores",
    params(ListQuery),
    responses(
        (status = 200, description = "Stores retrieved", body = ApiResponse<Vec<store::Model>>)
    ),
    tag = "Stores"
)]
pub async fn list_stores(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Vec<store::Model>> {
    let window = query.window(&state.config);
    let result = state
        .services
        .stores
        .list_stores(window.page, window.limit)
        .await?;
    Ok(window.respond(result))
}

#[utoipa::path(
    post,
    path = "/api/v1/stores",
    request_body = CreateStoreInput,
    responses(
        (status = 201, description = "Store created", body = ApiResponse<store::Model>),
        (status = 409, description = "Code already exists", body = crate::errors::ErrorResponse)
    ),
    tag = "Stores"
)]
pub async fn create_store(
    State(state): State<AppState>,
    Json(payload): Json<CreateStoreInput>,
) -> ApiResult<store::Model> {
    let store = state.services.stores.create_store(payload).await?;
    Ok(ApiResponse::created(store).message("Store created"))
}

#[utoipa::path(
    get,
    path = "/api/v1/stores/{id}",
    params(("id" = i32, Path, description = "Store id")),
    responses(
        (status = 200, description = "Store found", body = ApiResponse<store::Model>),
        (status = 404, description = "Store not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Stores"
)]
pub async fn get_store(State(state): State<AppState>, Path(id): Path<i32>) -> ApiResult<store::Model> {
    Ok(ApiResponse::ok(state.services.stores.get_store(id).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/stores/code/{code}",
    params(("code" = String, Path, description = "Store code")),
    responses(
        (status = 200, description = "Store found", body = ApiResponse<store::Model>),
        (status = 404, description = "Store not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Stores"
)]
pub async fn get_store_by_code(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> ApiResult<store::Model> {
    Ok(ApiResponse::ok(
        state.services.stores.get_store_by_code(&code).await?,
    ))
}

#[utoipa::path(
    put,
    path = "/api/v1/stores/{id}",
    params(("id" = i32, Path, description = "Store id")),
    request_body = UpdateStoreInput,
    responses(
        (status = 200, description = "Store updated", body = ApiResponse<store::Model>),
        (status = 404, description = "Store not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Stores"
)]
pub async fn update_store(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateStoreInput>,
) -> ApiResult<store::Model> {
    let store = state.services.stores.update_store(id, payload).await?;
    Ok(ApiResponse::ok(store).message("Store updated"))
}

/// Delete a store together with its views and their scoped data
#[utoipa::path(
    delete,
    path = "/api/v1/stores/{id}",
    params(("id" = i32, Path, description = "Store id")),
    responses(
        (status = 200, description = "Store deleted"),
        (status = 404, description = "Store not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Stores"
)]
pub async fn delete_store(State(state): State<AppState>, Path(id): Path<i32>) -> ApiResult<()> {
    state.services.stores.delete_store(id).await?;
    Ok(ApiResponse::empty("Store deleted"))
}
