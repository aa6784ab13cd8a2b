use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    entities::attribute_group,
    handlers::common::PageWindow,
    services::attribute_groups::{CreateAttributeGroupInput, UpdateAttributeGroupInput},
    ApiResponse, ApiResult, AppState,
};

/// Build the attribute group Router scoped under `/api/v1/attribute-groups`.
pub fn attribute_groups_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_attribute_groups).post(create_attribute_group))
        .route(
            "/:id",
            get(get_attribute_group)
                .put(update_attribute_group)
                .delete(delete_attribute_group),
        )
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct AttributeGroupListQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub attribute_set_id: Option<i32>,
}

#[utoipa::path(
    get,
    path = "/api/v1/attribute-groups",
    params(AttributeGroupListQuery),
    responses(
        (status = 200, description = "Attribute groups retrieved", body = ApiResponse<Vec<attribute_group::Model>>)
    ),
    tag = "Attribute Groups"
)]
pub async fn list_attribute_groups(
    State(state): State<AppState>,
    Query(query): Query<AttributeGroupListQuery>,
) -> ApiResult<Vec<attribute_group::Model>> {
    let window = PageWindow::resolve(&state.config, query.page, query.limit);
    let result = state
        .services
        .attribute_groups
        .list_groups(query.attribute_set_id, window.page, window.limit)
        .await?;
    Ok(window.respond(result))
}

#[utoipa::path(
    post,
    path = "/api/v1/attribute-groups",
    request_body = CreateAttributeGroupInput,
    responses(
        (status = 201, description = "Attribute group created", body = ApiResponse<attribute_group::Model>),
        (status = 404, description = "Attribute set not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Code already used in the set", body = crate::errors::ErrorResponse)
    ),
    tag = "Attribute Groups"
)]
pub async fn create_attribute_group(
    State(state): State<AppState>,
    Json(payload): Json<CreateAttributeGroupInput>,
) -> ApiResult<attribute_group::Model> {
    let group = state.services.attribute_groups.create_group(payload).await?;
    Ok(ApiResponse::created(group).message("Attribute group created"))
}

#[utoipa::path(
    get,
    path = "/api/v1/attribute-groups/{id}",
    params(("id" = i32, Path, description = "Attribute group id")),
    responses(
        (status = 200, description = "Attribute group found", body = ApiResponse<attribute_group::Model>),
        (status = 404, description = "Attribute group not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Attribute Groups"
)]
pub async fn get_attribute_group(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<attribute_group::Model> {
    Ok(ApiResponse::ok(
        state.services.attribute_groups.get_group(id).await?,
    ))
}

#[utoipa::path(
    put,
    path = "/api/v1/attribute-groups/{id}",
    params(("id" = i32, Path, description = "Attribute group id")),
    request_body = UpdateAttributeGroupInput,
    responses(
        (status = 200, description = "Attribute group updated", body = ApiResponse<attribute_group::Model>),
        (status = 404, description = "Attribute group not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Attribute Groups"
)]
pub async fn update_attribute_group(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateAttributeGroupInput>,
) -> ApiResult<attribute_group::Model> {
    let group = state
        .services
        .attribute_groups
        .update_group(id, payload)
        .await?;
    Ok(ApiResponse::ok(group).message("Attribute group updated"))
}

/// Delete a group; its attributes stay in the set, ungrouped.
#[utoipa::path(
    delete,
    path = "/api/v1/attribute-groups/{id}",
    params(("id" = i32, Path, description = "Attribute group id")),
    responses(
        (status = 200, description = "Attribute group deleted"),
        (status = 404, description = "Attribute group not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Attribute Groups"
)]
pub async fn delete_attribute_group(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<()> {
    state.services.attribute_groups.delete_group(id).await?;
    Ok(ApiResponse::empty("Attribute group deleted"))
}
