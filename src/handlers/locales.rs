use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};

use crate::{
    entities::locale,
    services::stores::{CreateLocaleInput, UpdateLocaleInput},
    ApiResponse, ApiResult, AppState,
};

/// Build the locales Router scoped under `/api/v1/locales`.
pub fn locales_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_locales).post(create_locale))
        .route(
            "/:id",
            get(get_locale).put(update_locale).delete(delete_locale),
        )
}

#[utoipa::path(
    get,
    path = "/api/v1/locales",
    responses(
        (status = 200, description = "Locales retrieved", body = ApiResponse<Vec<locale::Model>>)
    ),
    tag = "Stores"
)]
pub async fn list_locales(State(state): State<AppState>) -> ApiResult<Vec<locale::Model>> {
    Ok(ApiResponse::ok(state.services.stores.list_locales().await?))
}

/// Register a locale such as `en_US`
#[utoipa::path(
    post,
    path = "/api/v1/locales",
    request_body = CreateLocaleInput,
    responses(
        (status = 201, description = "Locale created", body = ApiResponse<locale::Model>),
        (status = 400, description = "Malformed locale code", body = crate::errors::ErrorResponse),
        (status = 409, description = "Locale already exists", body = crate::errors::ErrorResponse)
    ),
    tag = "Stores"
)]
pub async fn create_locale(
    State(state): State<AppState>,
    Json(payload): Json<CreateLocaleInput>,
) -> ApiResult<locale::Model> {
    let locale = state.services.stores.create_locale(payload).await?;
    Ok(ApiResponse::created(locale).message("Locale created"))
}

#[utoipa::path(
    get,
    path = "/api/v1/locales/{id}",
    params(("id" = i32, Path, description = "Locale id")),
    responses(
        (status = 200, description = "Locale found", body = ApiResponse<locale::Model>),
        (status = 404, description = "Locale not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Stores"
)]
pub async fn get_locale(State(state): State<AppState>, Path(id): Path<i32>) -> ApiResult<locale::Model> {
    Ok(ApiResponse::ok(state.services.stores.get_locale(id).await?))
}

#[utoipa::path(
    put,
    path = "/api/v1/locales/{id}",
    params(("id" = i32, Path, description = "Locale id")),
    request_body = UpdateLocaleInput,
    responses(
        (status = 200, description = "Locale updated", body = ApiResponse<locale::Model>),
        (status = 404, description = "Locale not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Stores"
)]
pub async fn update_locale(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateLocaleInput>,
) -> ApiResult<locale::Model> {
    let locale = state.services.stores.update_locale(id, payload).await?;
    Ok(ApiResponse::ok(locale).message("Locale updated"))
}

#[utoipa::path(
    delete,
    path = "/api/v1/locales/{id}",
    params(("id" = i32, Path, description = "Locale id")),
    responses(
        (status = 200, description = "Locale deleted"),
        (status = 404, description = "Locale not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Locale used by a store view", body = crate::errors::ErrorResponse)
    ),
    tag = "Stores"
)]
pub async fn delete_locale(State(state): State<AppState>, Path(id): Path<i32>) -> ApiResult<()> {
    state.services.stores.delete_locale(id).await?;
    Ok(ApiResponse::empty("Locale deleted"))
}
