use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    entities::category,
    handlers::common::PageWindow,
    models::CategoryNode,
    services::categories::{CreateCategoryInput, UpdateCategoryInput},
    ApiResponse, ApiResult, AppState,
};

/// Build the categories Router scoped under `/api/v1/categories`.
pub fn categories_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_categories).post(create_category))
        .route("/root", get(get_root_categories))
        .route("/tree", get(get_category_tree))
        .route("/parent/:id", get(get_child_categories))
        .route(
            "/:id",
            get(get_category)
                .put(update_category)
                .delete(delete_category),
        )
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct CategoryListQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub is_active: Option<bool>,
}

#[utoipa::path(
    get,
    path = "/api/v1/categories",
    params(CategoryListQuery),
    responses(
        (status = 200, description = "Categories retrieved", body = ApiResponse<Vec<category::Model>>)
    ),
    tag = "Categories"
)]
pub async fn list_categories(
    State(state): State<AppState>,
    Query(query): Query<CategoryListQuery>,
) -> ApiResult<Vec<category::Model>> {
    let window = PageWindow::resolve(&state.config, query.page, query.limit);
    let result = state
        .services
        .categories
        .list_categories(query.is_active, window.page, window.limit)
        .await?;
    Ok(window.respond(result))
}

#[utoipa::path(
    post,
    path = "/api/v1/categories",
    request_body = CreateCategoryInput,
    responses(
        (status = 201, description = "Category created", body = ApiResponse<category::Model>),
        (status = 404, description = "Parent not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Code already exists", body = crate::errors::ErrorResponse)
    ),
    tag = "Categories"
)]
pub async fn create_category(
    State(state): State<AppState>,
    Json(payload): Json<CreateCategoryInput>,
) -> ApiResult<category::Model> {
    let category = state.services.categories.create_category(payload).await?;
    Ok(ApiResponse::created(category).message("Category created"))
}

#[utoipa::path(
    get,
    path = "/api/v1/categories/root",
    responses(
        (status = 200, description = "Top-level categories", body = ApiResponse<Vec<category::Model>>)
    ),
    tag = "Categories"
)]
pub async fn get_root_categories(State(state): State<AppState>) -> ApiResult<Vec<category::Model>> {
    Ok(ApiResponse::ok(
        state.services.categories.root_categories().await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/categories/parent/{id}",
    params(("id" = i32, Path, description = "Parent category id")),
    responses(
        (status = 200, description = "Direct children", body = ApiResponse<Vec<category::Model>>),
        (status = 404, description = "Parent not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Categories"
)]
pub async fn get_child_categories(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Vec<category::Model>> {
    Ok(ApiResponse::ok(
        state.services.categories.child_categories(id).await?,
    ))
}

/// Whole category forest, siblings in position order
#[utoipa::path(
    get,
    path = "/api/v1/categories/tree",
    responses(
        (status = 200, description = "Category tree", body = ApiResponse<Vec<CategoryNode>>)
    ),
    tag = "Categories"
)]
pub async fn get_category_tree(State(state): State<AppState>) -> ApiResult<Vec<CategoryNode>> {
    Ok(ApiResponse::ok(
        state.services.categories.category_tree().await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/categories/{id}",
    params(("id" = i32, Path, description = "Category id")),
    responses(
        (status = 200, description = "Category found", body = ApiResponse<category::Model>),
        (status = 404, description = "Category not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Categories"
)]
pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<category::Model> {
    Ok(ApiResponse::ok(
        state.services.categories.get_category(id).await?,
    ))
}

/// Update a category. Moving it under itself or a descendant is rejected.
#[utoipa::path(
    put,
    path = "/api/v1/categories/{id}",
    params(("id" = i32, Path, description = "Category id")),
    request_body = UpdateCategoryInput,
    responses(
        (status = 200, description = "Category updated", body = ApiResponse<category::Model>),
        (status = 400, description = "Re-parenting would create a cycle", body = crate::errors::ErrorResponse),
        (status = 404, description = "Category not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Categories"
)]
pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateCategoryInput>,
) -> ApiResult<category::Model> {
    let category = state
        .services
        .categories
        .update_category(id, payload)
        .await?;
    Ok(ApiResponse::ok(category).message("Category updated"))
}

#[utoipa::path(
    delete,
    path = "/api/v1/categories/{id}",
    params(("id" = i32, Path, description = "Category id")),
    responses(
        (status = 200, description = "Category deleted"),
        (status = 404, description = "Category not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Category has children", body = crate::errors::ErrorResponse)
    ),
    tag = "Categories"
)]
pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<()> {
    state.services.categories.delete_category(id).await?;
    Ok(ApiResponse::empty("Category deleted"))
}
