use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::{IntoParams, ToSchema};

use crate::{
    entities::product::{self, ProductStatus, ProductType},
    errors::ServiceError,
    handlers::common::{parse_id_list, PageWindow},
    services::{
        product_transfer::{ImportRequest, ImportSummary, RecordValidation},
        products::{CreateProductInput, ProductFilter, UpdateProductInput},
        transfer::TransferFormat,
    },
    ApiResponse, ApiResult, AppState,
};

/// Build the products Router scoped under `/api/v1/products`.
pub fn products_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route("/export", get(export_products))
        .route("/import", post(import_products))
        .route("/import/validate", post(validate_import))
        .route("/sku/:sku", get(get_product_by_sku))
        .route(
            "/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/:id/status", patch(update_product_status))
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ProductListQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    /// Matches SKU or name
    pub search: Option<String>,
    pub status: Option<ProductStatus>,
    pub product_type: Option<ProductType>,
    pub attribute_set_id: Option<i32>,
    pub category_id: Option<i32>,
    /// Together with `attributeValue`, restricts to products holding that value
    pub attribute_code: Option<String>,
    pub attribute_value: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UpdateStatusRequest {
    pub status: ProductStatus,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ExportQuery {
    /// `json`, `xml` or `csv`; defaults to `json`
    pub format: Option<String>,
    /// Comma-separated product ids; all products when omitted
    pub ids: Option<String>,
}

/// List products
#[utoipa::path(
    get,
    path = "/api/v1/products",
    params(ProductListQuery),
    responses(
        (status = 200, description = "Products retrieved", body = ApiResponse<Vec<product::Model>>),
        (status = 400, description = "Invalid query", body = crate::errors::ErrorResponse)
    ),
    tag = "Products"
)]
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ProductListQuery>,
) -> ApiResult<Vec<product::Model>> {
    let window = PageWindow::resolve(&state.config, query.page, query.limit);
    let filter = ProductFilter {
        search: query.search,
        status: query.status,
        product_type: query.product_type,
        attribute_set_id: query.attribute_set_id,
        category_id: query.category_id,
        attribute_code: query.attribute_code,
        attribute_value: query.attribute_value,
    };
    let result = state
        .services
        .products
        .list_products(filter, window.page, window.limit)
        .await?;
    Ok(window.respond(result))
}

/// Create a product
#[utoipa::path(
    post,
    path = "/api/v1/products",
    request_body = CreateProductInput,
    responses(
        (status = 201, description = "Product created", body = ApiResponse<product::Model>),
        (status = 400, description = "Invalid payload", body = crate::errors::ErrorResponse),
        (status = 409, description = "SKU already exists", body = crate::errors::ErrorResponse)
    ),
    tag = "Products"
)]
pub async fn create_product(
    State(state): State<AppState>,
    Json(payload): Json<CreateProductInput>,
) -> ApiResult<product::Model> {
    let product = state.services.products.create_product(payload).await?;
    Ok(ApiResponse::created(product).message("Product created"))
}

/// Get a product by id
#[utoipa::path(
    get,
    path = "/api/v1/products/{id}",
    params(("id" = i32, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product found", body = ApiResponse<product::Model>),
        (status = 404, description = "Product not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Products"
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<product::Model> {
    Ok(ApiResponse::ok(state.services.products.get_product(id).await?))
}

/// Get a product by SKU
#[utoipa::path(
    get,
    path = "/api/v1/products/sku/{sku}",
    params(("sku" = String, Path, description = "Product SKU")),
    responses(
        (status = 200, description = "Product found", body = ApiResponse<product::Model>),
        (status = 404, description = "Product not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Products"
)]
pub async fn get_product_by_sku(
    State(state): State<AppState>,
    Path(sku): Path<String>,
) -> ApiResult<product::Model> {
    Ok(ApiResponse::ok(
        state.services.products.get_product_by_sku(&sku).await?,
    ))
}

/// Update a product
#[utoipa::path(
    put,
    path = "/api/v1/products/{id}",
    params(("id" = i32, Path, description = "Product id")),
    request_body = UpdateProductInput,
    responses(
        (status = 200, description = "Product updated", body = ApiResponse<product::Model>),
        (status = 404, description = "Product not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "SKU already exists", body = crate::errors::ErrorResponse)
    ),
    tag = "Products"
)]
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateProductInput>,
) -> ApiResult<product::Model> {
    let product = state.services.products.update_product(id, payload).await?;
    Ok(ApiResponse::ok(product).message("Product updated"))
}

/// Move a product to another workflow stage
#[utoipa::path(
    patch,
    path = "/api/v1/products/{id}/status",
    params(("id" = i32, Path, description = "Product id")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = ApiResponse<product::Model>),
        (status = 404, description = "Product not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Products"
)]
pub async fn update_product_status(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateStatusRequest>,
) -> ApiResult<product::Model> {
    let product = state
        .services
        .products
        .update_status(id, payload.status)
        .await?;
    Ok(ApiResponse::ok(product).message("Product status updated"))
}

/// Delete a product with its attribute values and links
#[utoipa::path(
    delete,
    path = "/api/v1/products/{id}",
    params(("id" = i32, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product deleted"),
        (status = 404, description = "Product not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Products"
)]
pub async fn delete_product(State(state): State<AppState>, Path(id): Path<i32>) -> ApiResult<()> {
    state.services.products.delete_product(id).await?;
    Ok(ApiResponse::empty("Product deleted"))
}

/// Export products as a downloadable JSON, XML or CSV file
#[utoipa::path(
    get,
    path = "/api/v1/products/export",
    params(ExportQuery),
    responses(
        (status = 200, description = "Export file", content_type = "application/octet-stream"),
        (status = 400, description = "Unsupported format", body = crate::errors::ErrorResponse)
    ),
    tag = "Import/Export"
)]
pub async fn export_products(
    State(state): State<AppState>,
    Query(query): Query<ExportQuery>,
) -> Result<Response, ServiceError> {
    let format = match query.format.as_deref() {
        Some(raw) => raw.parse::<TransferFormat>()?,
        None => TransferFormat::default(),
    };
    let ids = query
        .ids
        .as_deref()
        .map(parse_id_list)
        .transpose()
        .map_err(ServiceError::BadRequest)?;

    let file = state.services.transfer.export(format, ids).await?;
    info!(format = %file.format, filename = %file.filename, "Products exported");

    Ok((
        [
            (header::CONTENT_TYPE, file.content_type().to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file.filename),
            ),
        ],
        file.content,
    )
        .into_response())
}

/// Import products, upserting by SKU
#[utoipa::path(
    post,
    path = "/api/v1/products/import",
    request_body = ImportRequest,
    responses(
        (status = 200, description = "Import finished", body = ApiResponse<ImportSummary>),
        (status = 400, description = "Unparseable file", body = crate::errors::ErrorResponse)
    ),
    tag = "Import/Export"
)]
pub async fn import_products(
    State(state): State<AppState>,
    Json(payload): Json<ImportRequest>,
) -> ApiResult<ImportSummary> {
    let summary = state.services.transfer.import(payload).await?;
    let message = format!(
        "Imported {} of {} products",
        summary.created + summary.updated,
        summary.total
    );
    Ok(ApiResponse::ok(summary).message(message))
}

/// Validate an import file without writing anything
#[utoipa::path(
    post,
    path = "/api/v1/products/import/validate",
    request_body = ImportRequest,
    responses(
        (status = 200, description = "Per-record validation results", body = ApiResponse<Vec<RecordValidation>>),
        (status = 400, description = "Unparseable file", body = crate::errors::ErrorResponse)
    ),
    tag = "Import/Export"
)]
pub async fn validate_import(
    State(state): State<AppState>,
    Json(payload): Json<ImportRequest>,
) -> ApiResult<Vec<RecordValidation>> {
    let results = state.services.transfer.validate_import(&payload)?;
    Ok(ApiResponse::ok(results))
}
