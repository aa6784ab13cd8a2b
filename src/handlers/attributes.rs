use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    entities::attribute::{self, DataType},
    handlers::common::PageWindow,
    services::attributes::{AttributeFilter, CreateAttributeInput, UpdateAttributeInput},
    ApiResponse, ApiResult, AppState,
};

/// Build the attributes Router scoped under `/api/v1/attributes`.
pub fn attributes_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_attributes).post(create_attribute))
        .route("/code/:code", get(get_attribute_by_code))
        .route(
            "/:id",
            get(get_attribute)
                .put(update_attribute)
                .delete(delete_attribute),
        )
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct AttributeListQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    /// Matches code or label
    pub search: Option<String>,
    pub data_type: Option<DataType>,
    pub is_filterable: Option<bool>,
}

#[utoipa::path(
    get,
    path = "/api/v1/attributes",
    params(AttributeListQuery),
    responses(
        (status = 200, description = "Attributes retrieved", body = ApiResponse<Vec<attribute::Model>>)
    ),
    tag = "Attributes"
)]
pub async fn list_attributes(
    State(state): State<AppState>,
    Query(query): Query<AttributeListQuery>,
) -> ApiResult<Vec<attribute::Model>> {
    let window = PageWindow::resolve(&state.config, query.page, query.limit);
    let filter = AttributeFilter {
        search: query.search,
        data_type: query.data_type,
        is_filterable: query.is_filterable,
    };
    let result = state
        .services
        .attributes
        .list_attributes(filter, window.page, window.limit)
        .await?;
    Ok(window.respond(result))
}

#[utoipa::path(
    post,
    path = "/api/v1/attributes",
    request_body = CreateAttributeInput,
    responses(
        (status = 201, description = "Attribute created", body = ApiResponse<attribute::Model>),
        (status = 400, description = "Invalid payload", body = crate::errors::ErrorResponse),
        (status = 409, description = "Code already exists", body = crate::errors::ErrorResponse)
    ),
    tag = "Attributes"
)]
pub async fn create_attribute(
    State(state): State<AppState>,
    Json(payload): Json<CreateAttributeInput>,
) -> ApiResult<attribute::Model> {
    let attribute = state.services.attributes.create_attribute(payload).await?;
    Ok(ApiResponse::created(attribute).message("Attribute created"))
}

#[utoipa::path(
    get,
    path = "/api/v1/attributes/{id}",
    params(("id" = i32, Path, description = "Attribute id")),
    responses(
        (status = 200, description = "Attribute found", body = ApiResponse<attribute::Model>),
        (status = 404, description = "Attribute not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Attributes"
)]
pub async fn get_attribute(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<attribute::Model> {
    Ok(ApiResponse::ok(
        state.services.attributes.get_attribute(id).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/attributes/code/{code}",
    params(("code" = String, Path, description = "Attribute code")),
    responses(
        (status = 200, description = "Attribute found", body = ApiResponse<attribute::Model>),
        (status = 404, description = "Attribute not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Attributes"
)]
pub async fn get_attribute_by_code(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> ApiResult<attribute::Model> {
    Ok(ApiResponse::ok(
        state.services.attributes.get_attribute_by_code(&code).await?,
    ))
}

/// Update an attribute. The code cannot change.
#[utoipa::path(
    put,
    path = "/api/v1/attributes/{id}",
    params(("id" = i32, Path, description = "Attribute id")),
    request_body = UpdateAttributeInput,
    responses(
        (status = 200, description = "Attribute updated", body = ApiResponse<attribute::Model>),
        (status = 400, description = "Code change attempted", body = crate::errors::ErrorResponse),
        (status = 404, description = "Attribute not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Data type change with stored values", body = crate::errors::ErrorResponse)
    ),
    tag = "Attributes"
)]
pub async fn update_attribute(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateAttributeInput>,
) -> ApiResult<attribute::Model> {
    let attribute = state
        .services
        .attributes
        .update_attribute(id, payload)
        .await?;
    Ok(ApiResponse::ok(attribute).message("Attribute updated"))
}

#[utoipa::path(
    delete,
    path = "/api/v1/attributes/{id}",
    params(("id" = i32, Path, description = "Attribute id")),
    responses(
        (status = 200, description = "Attribute deleted"),
        (status = 404, description = "Attribute not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Attributes"
)]
pub async fn delete_attribute(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<()> {
    state.services.attributes.delete_attribute(id).await?;
    Ok(ApiResponse::empty("Attribute deleted"))
}
