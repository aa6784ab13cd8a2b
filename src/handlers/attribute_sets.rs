use axum::{
    extract::{Path, Query, State},
    routing::{delete, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::{
    entities::{attribute_set, attribute_set_attribute, product::ProductType},
    handlers::common::PageWindow,
    services::attribute_sets::{
        AssignAttributeInput, AttributeSetLayout, CreateAttributeSetInput, SetAttribute,
        UpdateAttributeSetInput,
    },
    ApiResponse, ApiResult, AppState,
};

/// Build the attribute set Router scoped under `/api/v1/attribute-sets`.
pub fn attribute_sets_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_attribute_sets).post(create_attribute_set))
        .route(
            "/:id",
            get(get_attribute_set)
                .put(update_attribute_set)
                .delete(delete_attribute_set),
        )
        .route(
            "/:id/attributes",
            get(get_set_layout).post(assign_attribute),
        )
        .route("/:id/attributes/:attribute_id", delete(remove_attribute))
        .route(
            "/:id/groups/:group_id/attributes",
            get(get_group_attributes).post(assign_group_attribute),
        )
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct AttributeSetListQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub product_type: Option<ProductType>,
}

/// Body for placing an attribute into a specific group
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GroupAttributeRequest {
    pub attribute_id: i32,
    #[serde(default)]
    pub sort_order: i32,
}

#[utoipa::path(
    get,
    path = "/api/v1/attribute-sets",
    params(AttributeSetListQuery),
    responses(
        (status = 200, description = "Attribute sets retrieved", body = ApiResponse<Vec<attribute_set::Model>>)
    ),
    tag = "Attribute Sets"
)]
pub async fn list_attribute_sets(
    State(state): State<AppState>,
    Query(query): Query<AttributeSetListQuery>,
) -> ApiResult<Vec<attribute_set::Model>> {
    let window = PageWindow::resolve(&state.config, query.page, query.limit);
    let result = state
        .services
        .attribute_sets
        .list_sets(query.product_type, window.page, window.limit)
        .await?;
    Ok(window.respond(result))
}

/// Create an attribute set. Marking it default clears the previous default.
#[utoipa::path(
    post,
    path = "/api/v1/attribute-sets",
    request_body = CreateAttributeSetInput,
    responses(
        (status = 201, description = "Attribute set created", body = ApiResponse<attribute_set::Model>),
        (status = 409, description = "Code already exists", body = crate::errors::ErrorResponse)
    ),
    tag = "Attribute Sets"
)]
pub async fn create_attribute_set(
    State(state): State<AppState>,
    Json(payload): Json<CreateAttributeSetInput>,
) -> ApiResult<attribute_set::Model> {
    let set = state.services.attribute_sets.create_set(payload).await?;
    Ok(ApiResponse::created(set).message("Attribute set created"))
}

#[utoipa::path(
    get,
    path = "/api/v1/attribute-sets/{id}",
    params(("id" = i32, Path, description = "Attribute set id")),
    responses(
        (status = 200, description = "Attribute set found", body = ApiResponse<attribute_set::Model>),
        (status = 404, description = "Attribute set not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Attribute Sets"
)]
pub async fn get_attribute_set(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<attribute_set::Model> {
    Ok(ApiResponse::ok(
        state.services.attribute_sets.get_set(id).await?,
    ))
}

#[utoipa::path(
    put,
    path = "/api/v1/attribute-sets/{id}",
    params(("id" = i32, Path, description = "Attribute set id")),
    request_body = UpdateAttributeSetInput,
    responses(
        (status = 200, description = "Attribute set updated", body = ApiResponse<attribute_set::Model>),
        (status = 404, description = "Attribute set not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Attribute Sets"
)]
pub async fn update_attribute_set(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateAttributeSetInput>,
) -> ApiResult<attribute_set::Model> {
    let set = state.services.attribute_sets.update_set(id, payload).await?;
    Ok(ApiResponse::ok(set).message("Attribute set updated"))
}

#[utoipa::path(
    delete,
    path = "/api/v1/attribute-sets/{id}",
    params(("id" = i32, Path, description = "Attribute set id")),
    responses(
        (status = 200, description = "Attribute set deleted"),
        (status = 404, description = "Attribute set not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Attribute Sets"
)]
pub async fn delete_attribute_set(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<()> {
    state.services.attribute_sets.delete_set(id).await?;
    Ok(ApiResponse::empty("Attribute set deleted"))
}

/// Attributes of a set, grouped and in display order
#[utoipa::path(
    get,
    path = "/api/v1/attribute-sets/{id}/attributes",
    params(("id" = i32, Path, description = "Attribute set id")),
    responses(
        (status = 200, description = "Set layout", body = ApiResponse<AttributeSetLayout>),
        (status = 404, description = "Attribute set not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Attribute Sets"
)]
pub async fn get_set_layout(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<AttributeSetLayout> {
    Ok(ApiResponse::ok(
        state.services.attribute_sets.layout(id).await?,
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/attribute-sets/{id}/attributes",
    params(("id" = i32, Path, description = "Attribute set id")),
    request_body = AssignAttributeInput,
    responses(
        (status = 201, description = "Attribute assigned", body = ApiResponse<attribute_set_attribute::Model>),
        (status = 400, description = "Group belongs to another set", body = crate::errors::ErrorResponse),
        (status = 404, description = "Set or attribute not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Attribute Sets"
)]
pub async fn assign_attribute(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<AssignAttributeInput>,
) -> ApiResult<attribute_set_attribute::Model> {
    let membership = state
        .services
        .attribute_sets
        .assign_attribute(id, payload)
        .await?;
    Ok(ApiResponse::created(membership).message("Attribute assigned"))
}

#[utoipa::path(
    delete,
    path = "/api/v1/attribute-sets/{id}/attributes/{attribute_id}",
    params(
        ("id" = i32, Path, description = "Attribute set id"),
        ("attribute_id" = i32, Path, description = "Attribute id")
    ),
    responses(
        (status = 200, description = "Attribute removed from set"),
        (status = 404, description = "Attribute is not in the set", body = crate::errors::ErrorResponse)
    ),
    tag = "Attribute Sets"
)]
pub async fn remove_attribute(
    State(state): State<AppState>,
    Path((id, attribute_id)): Path<(i32, i32)>,
) -> ApiResult<()> {
    state
        .services
        .attribute_sets
        .remove_attribute(id, attribute_id)
        .await?;
    Ok(ApiResponse::empty("Attribute removed from set"))
}

#[utoipa::path(
    get,
    path = "/api/v1/attribute-sets/{id}/groups/{group_id}/attributes",
    params(
        ("id" = i32, Path, description = "Attribute set id"),
        ("group_id" = i32, Path, description = "Attribute group id")
    ),
    responses(
        (status = 200, description = "Group attributes in display order", body = ApiResponse<Vec<SetAttribute>>),
        (status = 404, description = "Set or group not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Attribute Sets"
)]
pub async fn get_group_attributes(
    State(state): State<AppState>,
    Path((id, group_id)): Path<(i32, i32)>,
) -> ApiResult<Vec<SetAttribute>> {
    Ok(ApiResponse::ok(
        state
            .services
            .attribute_sets
            .group_attributes(id, group_id)
            .await?,
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/attribute-sets/{id}/groups/{group_id}/attributes",
    params(
        ("id" = i32, Path, description = "Attribute set id"),
        ("group_id" = i32, Path, description = "Attribute group id")
    ),
    request_body = GroupAttributeRequest,
    responses(
        (status = 201, description = "Attribute assigned to group", body = ApiResponse<attribute_set_attribute::Model>),
        (status = 400, description = "Group belongs to another set", body = crate::errors::ErrorResponse)
    ),
    tag = "Attribute Sets"
)]
pub async fn assign_group_attribute(
    State(state): State<AppState>,
    Path((id, group_id)): Path<(i32, i32)>,
    Json(payload): Json<GroupAttributeRequest>,
) -> ApiResult<attribute_set_attribute::Model> {
    let membership = state
        .services
        .attribute_sets
        .assign_attribute_to_group(id, group_id, payload.attribute_id, payload.sort_order)
        .await?;
    Ok(ApiResponse::created(membership).message("Attribute assigned to group"))
}
