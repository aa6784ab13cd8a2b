use axum::{
    extract::{Path, Query, State},
    routing::{delete, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::{
    handlers::common::PageWindow,
    services::product_attributes::{
        ProductAttributeFilter, ProductAttributeView, SetProductAttributeInput,
    },
    ApiResponse, ApiResult, AppState,
};

/// Build the attribute value Router scoped under `/api/v1/product-attributes`.
pub fn product_attributes_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(list_product_attributes).post(set_product_attribute),
        )
        .route(
            "/:id",
            get(get_product_attribute).delete(delete_product_attribute),
        )
        .route(
            "/product/:product_id/attribute/:attribute_id",
            delete(delete_attribute_for_product),
        )
        .route(
            "/product/:product_id/attribute/:attribute_id/store-view/:store_view_id",
            delete(delete_attribute_for_store_view),
        )
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ProductAttributeListQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub product_id: Option<i32>,
    pub attribute_id: Option<i32>,
    pub store_view_id: Option<i32>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeletedValues {
    pub removed: u64,
}

#[utoipa::path(
    get,
    path = "/api/v1/product-attributes",
    params(ProductAttributeListQuery),
    responses(
        (status = 200, description = "Attribute values retrieved", body = ApiResponse<Vec<ProductAttributeView>>)
    ),
    tag = "Product Attributes"
)]
pub async fn list_product_attributes(
    State(state): State<AppState>,
    Query(query): Query<ProductAttributeListQuery>,
) -> ApiResult<Vec<ProductAttributeView>> {
    let window = PageWindow::resolve(&state.config, query.page, query.limit);
    let filter = ProductAttributeFilter {
        product_id: query.product_id,
        attribute_id: query.attribute_id,
        store_view_id: query.store_view_id,
    };
    let result = state
        .services
        .product_attributes
        .list_values(filter, window.page, window.limit)
        .await?;
    Ok(window.respond(result))
}

/// Set a typed attribute value on a product, globally or for one store view.
/// The value is stored in the column matching the attribute's data type.
#[utoipa::path(
    post,
    path = "/api/v1/product-attributes",
    request_body = SetProductAttributeInput,
    responses(
        (status = 200, description = "Value stored", body = ApiResponse<ProductAttributeView>),
        (status = 400, description = "Value does not match the attribute data type", body = crate::errors::ErrorResponse),
        (status = 404, description = "Product, attribute or store view not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Product Attributes"
)]
pub async fn set_product_attribute(
    State(state): State<AppState>,
    Json(payload): Json<SetProductAttributeInput>,
) -> ApiResult<ProductAttributeView> {
    let value = state.services.product_attributes.set_value(payload).await?;
    Ok(ApiResponse::ok(value).message("Attribute value saved"))
}

#[utoipa::path(
    get,
    path = "/api/v1/product-attributes/{id}",
    params(("id" = i32, Path, description = "Attribute value id")),
    responses(
        (status = 200, description = "Attribute value found", body = ApiResponse<ProductAttributeView>),
        (status = 404, description = "Attribute value not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Product Attributes"
)]
pub async fn get_product_attribute(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<ProductAttributeView> {
    Ok(ApiResponse::ok(
        state.services.product_attributes.get_value(id).await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/api/v1/product-attributes/{id}",
    params(("id" = i32, Path, description = "Attribute value id")),
    responses(
        (status = 200, description = "Attribute value deleted"),
        (status = 404, description = "Attribute value not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Product Attributes"
)]
pub async fn delete_product_attribute(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<()> {
    state.services.product_attributes.delete_value(id).await?;
    Ok(ApiResponse::empty("Attribute value deleted"))
}

/// Remove an attribute from a product in every store view
#[utoipa::path(
    delete,
    path = "/api/v1/product-attributes/product/{product_id}/attribute/{attribute_id}",
    params(
        ("product_id" = i32, Path, description = "Product id"),
        ("attribute_id" = i32, Path, description = "Attribute id")
    ),
    responses(
        (status = 200, description = "Values deleted", body = ApiResponse<DeletedValues>),
        (status = 404, description = "No value stored", body = crate::errors::ErrorResponse)
    ),
    tag = "Product Attributes"
)]
pub async fn delete_attribute_for_product(
    State(state): State<AppState>,
    Path((product_id, attribute_id)): Path<(i32, i32)>,
) -> ApiResult<DeletedValues> {
    let removed = state
        .services
        .product_attributes
        .delete_for_attribute(product_id, attribute_id)
        .await?;
    Ok(ApiResponse::ok(DeletedValues { removed }).message("Attribute values deleted"))
}

#[utoipa::path(
    delete,
    path = "/api/v1/product-attributes/product/{product_id}/attribute/{attribute_id}/store-view/{store_view_id}",
    params(
        ("product_id" = i32, Path, description = "Product id"),
        ("attribute_id" = i32, Path, description = "Attribute id"),
        ("store_view_id" = i32, Path, description = "Store view id")
    ),
    responses(
        (status = 200, description = "Store view value deleted"),
        (status = 404, description = "No value stored for the store view", body = crate::errors::ErrorResponse)
    ),
    tag = "Product Attributes"
)]
pub async fn delete_attribute_for_store_view(
    State(state): State<AppState>,
    Path((product_id, attribute_id, store_view_id)): Path<(i32, i32, i32)>,
) -> ApiResult<()> {
    state
        .services
        .product_attributes
        .delete_for_store_view(product_id, attribute_id, store_view_id)
        .await?;
    Ok(ApiResponse::empty("Attribute value deleted"))
}
