use axum::{
    extract::{Path, Query, State},
    routing::{delete, get},
    Json, Router,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    entities::product_category,
    services::product_categories::LinkProductCategoryInput,
    ApiResponse, ApiResult, AppState,
};

/// Build the product-category link Router scoped under `/api/v1/product-categories`.
pub fn product_categories_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_links).post(link_product))
        .route(
            "/product/:product_id/category/:category_id",
            delete(unlink_product),
        )
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct LinkListQuery {
    pub product_id: Option<i32>,
    pub category_id: Option<i32>,
}

#[utoipa::path(
    get,
    path = "/api/v1/product-categories",
    params(LinkListQuery),
    responses(
        (status = 200, description = "Links retrieved", body = ApiResponse<Vec<product_category::Model>>)
    ),
    tag = "Categories"
)]
pub async fn list_links(
    State(state): State<AppState>,
    Query(query): Query<LinkListQuery>,
) -> ApiResult<Vec<product_category::Model>> {
    Ok(ApiResponse::ok(
        state
            .services
            .product_categories
            .list_links(query.product_id, query.category_id)
            .await?,
    ))
}

/// Put a product in a category, or update its position there
#[utoipa::path(
    post,
    path = "/api/v1/product-categories",
    request_body = LinkProductCategoryInput,
    responses(
        (status = 201, description = "Product linked", body = ApiResponse<product_category::Model>),
        (status = 404, description = "Product or category not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Categories"
)]
pub async fn link_product(
    State(state): State<AppState>,
    Json(payload): Json<LinkProductCategoryInput>,
) -> ApiResult<product_category::Model> {
    let link = state.services.product_categories.link(payload).await?;
    Ok(ApiResponse::created(link).message("Product added to category"))
}

#[utoipa::path(
    delete,
    path = "/api/v1/product-categories/product/{product_id}/category/{category_id}",
    params(
        ("product_id" = i32, Path, description = "Product id"),
        ("category_id" = i32, Path, description = "Category id")
    ),
    responses(
        (status = 200, description = "Product removed from category"),
        (status = 404, description = "Link not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Categories"
)]
pub async fn unlink_product(
    State(state): State<AppState>,
    Path((product_id, category_id)): Path<(i32, i32)>,
) -> ApiResult<()> {
    state
        .services
        .product_categories
        .unlink(product_id, category_id)
        .await?;
    Ok(ApiResponse::empty("Product removed from category"))
}
