use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    entities::category_translation,
    handlers::common::PageWindow,
    services::category_translations::{
        CreateCategoryTranslationInput, UpdateCategoryTranslationInput,
    },
    ApiResponse, ApiResult, AppState,
};

/// Build the translation Router scoped under `/api/v1/category-translations`.
pub fn category_translations_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_translations).post(create_translation))
        .route(
            "/:id",
            get(get_translation)
                .put(update_translation)
                .delete(delete_translation),
        )
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct TranslationListQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub category_id: Option<i32>,
    pub store_view_id: Option<i32>,
}

#[utoipa::path(
    get,
    path = "/api/v1/category-translations",
    params(TranslationListQuery),
    responses(
        (status = 200, description = "Translations retrieved", body = ApiResponse<Vec<category_translation::Model>>)
    ),
    tag = "Categories"
)]
pub async fn list_translations(
    State(state): State<AppState>,
    Query(query): Query<TranslationListQuery>,
) -> ApiResult<Vec<category_translation::Model>> {
    let window = PageWindow::resolve(&state.config, query.page, query.limit);
    let result = state
        .services
        .category_translations
        .list_translations(
            query.category_id,
            query.store_view_id,
            window.page,
            window.limit,
        )
        .await?;
    Ok(window.respond(result))
}

/// Translate a category for one store view. The slug defaults to the slugified name.
#[utoipa::path(
    post,
    path = "/api/v1/category-translations",
    request_body = CreateCategoryTranslationInput,
    responses(
        (status = 201, description = "Translation created", body = ApiResponse<category_translation::Model>),
        (status = 404, description = "Category or store view not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Store view already translated", body = crate::errors::ErrorResponse)
    ),
    tag = "Categories"
)]
pub async fn create_translation(
    State(state): State<AppState>,
    Json(payload): Json<CreateCategoryTranslationInput>,
) -> ApiResult<category_translation::Model> {
    let translation = state
        .services
        .category_translations
        .create_translation(payload)
        .await?;
    Ok(ApiResponse::created(translation).message("Category translation created"))
}

#[utoipa::path(
    get,
    path = "/api/v1/category-translations/{id}",
    params(("id" = i32, Path, description = "Translation id")),
    responses(
        (status = 200, description = "Translation found", body = ApiResponse<category_translation::Model>),
        (status = 404, description = "Translation not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Categories"
)]
pub async fn get_translation(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<category_translation::Model> {
    Ok(ApiResponse::ok(
        state
            .services
            .category_translations
            .get_translation(id)
            .await?,
    ))
}

#[utoipa::path(
    put,
    path = "/api/v1/category-translations/{id}",
    params(("id" = i32, Path, description = "Translation id")),
    request_body = UpdateCategoryTranslationInput,
    responses(
        (status = 200, description = "Translation updated", body = ApiResponse<category_translation::Model>),
        (status = 404, description = "Translation not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Categories"
)]
pub async fn update_translation(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateCategoryTranslationInput>,
) -> ApiResult<category_translation::Model> {
    let translation = state
        .services
        .category_translations
        .update_translation(id, payload)
        .await?;
    Ok(ApiResponse::ok(translation).message("Category translation updated"))
}

#[utoipa::path(
    delete,
    path = "/api/v1/category-translations/{id}",
    params(("id" = i32, Path, description = "Translation id")),
    responses(
        (status = 200, description = "Translation deleted"),
        (status = 404, description = "Translation not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Categories"
)]
pub async fn delete_translation(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<()> {
    state
        .services
        .category_translations
        .delete_translation(id)
        .await?;
    Ok(ApiResponse::empty("Category translation deleted"))
}
