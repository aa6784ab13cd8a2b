use axum::{
    extract::{Path, Query, State},
    routing::{delete, get},
    Json, Router,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    entities::{workspace, workspace_invitation, workspace_member},
    handlers::common::PageWindow,
    services::workspaces::{
        AddWorkspaceMemberInput, CreateInvitationInput, CreateWorkspaceInput, CreatedInvitation,
        UpdateWorkspaceInput,
    },
    ApiResponse, ApiResult, AppState,
};

/// Build the workspaces Router scoped under `/api/v1/workspaces`.
pub fn workspaces_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_workspaces).post(create_workspace))
        .route(
            "/:id",
            get(get_workspace)
                .put(update_workspace)
                .delete(delete_workspace),
        )
        .route("/:id/members", get(list_members).post(add_member))
        .route("/:id/members/:user_id", delete(remove_member))
        .route(
            "/:id/invitations",
            get(list_invitations).post(create_invitation),
        )
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct WorkspaceListQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    /// Only workspaces this user belongs to
    pub user_id: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/v1/workspaces",
    params(WorkspaceListQuery),
    responses(
        (status = 200, description = "Workspaces retrieved", body = ApiResponse<Vec<workspace::Model>>)
    ),
    tag = "Workspaces"
)]
pub async fn list_workspaces(
    State(state): State<AppState>,
    Query(query): Query<WorkspaceListQuery>,
) -> ApiResult<Vec<workspace::Model>> {
    let window = PageWindow::resolve(&state.config, query.page, query.limit);
    let result = state
        .services
        .workspaces
        .list_workspaces(query.user_id, window.page, window.limit)
        .await?;
    Ok(window.respond(result))
}

/// Create a workspace; the owner becomes its first member
#[utoipa::path(
    post,
    path = "/api/v1/workspaces",
    request_body = CreateWorkspaceInput,
    responses(
        (status = 201, description = "Workspace created", body = ApiResponse<workspace::Model>),
        (status = 409, description = "Slug already taken", body = crate::errors::ErrorResponse)
    ),
    tag = "Workspaces"
)]
pub async fn create_workspace(
    State(state): State<AppState>,
    Json(payload): Json<CreateWorkspaceInput>,
) -> ApiResult<workspace::Model> {
    let workspace = state.services.workspaces.create_workspace(payload).await?;
    Ok(ApiResponse::created(workspace).message("Workspace created"))
}

#[utoipa::path(
    get,
    path = "/api/v1/workspaces/{id}",
    params(("id" = i32, Path, description = "Workspace id")),
    responses(
        (status = 200, description = "Workspace found", body = ApiResponse<workspace::Model>),
        (status = 404, description = "Workspace not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Workspaces"
)]
pub async fn get_workspace(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<workspace::Model> {
    Ok(ApiResponse::ok(
        state.services.workspaces.get_workspace(id).await?,
    ))
}

#[utoipa::path(
    put,
    path = "/api/v1/workspaces/{id}",
    params(("id" = i32, Path, description = "Workspace id")),
    request_body = UpdateWorkspaceInput,
    responses(
        (status = 200, description = "Workspace updated", body = ApiResponse<workspace::Model>),
        (status = 404, description = "Workspace not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Slug already taken", body = crate::errors::ErrorResponse)
    ),
    tag = "Workspaces"
)]
pub async fn update_workspace(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateWorkspaceInput>,
) -> ApiResult<workspace::Model> {
    let workspace = state
        .services
        .workspaces
        .update_workspace(id, payload)
        .await?;
    Ok(ApiResponse::ok(workspace).message("Workspace updated"))
}

#[utoipa::path(
    delete,
    path = "/api/v1/workspaces/{id}",
    params(("id" = i32, Path, description = "Workspace id")),
    responses(
        (status = 200, description = "Workspace deleted"),
        (status = 404, description = "Workspace not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Workspaces"
)]
pub async fn delete_workspace(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<()> {
    state.services.workspaces.delete_workspace(id).await?;
    Ok(ApiResponse::empty("Workspace deleted"))
}

#[utoipa::path(
    get,
    path = "/api/v1/workspaces/{id}/members",
    params(("id" = i32, Path, description = "Workspace id")),
    responses(
        (status = 200, description = "Members retrieved", body = ApiResponse<Vec<workspace_member::Model>>),
        (status = 404, description = "Workspace not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Workspaces"
)]
pub async fn list_members(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Vec<workspace_member::Model>> {
    Ok(ApiResponse::ok(
        state.services.workspaces.list_members(id).await?,
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/workspaces/{id}/members",
    params(("id" = i32, Path, description = "Workspace id")),
    request_body = AddWorkspaceMemberInput,
    responses(
        (status = 201, description = "Member added", body = ApiResponse<workspace_member::Model>),
        (status = 409, description = "Already a member", body = crate::errors::ErrorResponse)
    ),
    tag = "Workspaces"
)]
pub async fn add_member(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<AddWorkspaceMemberInput>,
) -> ApiResult<workspace_member::Model> {
    let member = state.services.workspaces.add_member(id, payload).await?;
    Ok(ApiResponse::created(member).message("Member added"))
}

/// Remove a member. The last owner cannot be removed.
#[utoipa::path(
    delete,
    path = "/api/v1/workspaces/{id}/members/{user_id}",
    params(
        ("id" = i32, Path, description = "Workspace id"),
        ("user_id" = String, Path, description = "Member user id")
    ),
    responses(
        (status = 200, description = "Member removed"),
        (status = 404, description = "Not a member", body = crate::errors::ErrorResponse),
        (status = 409, description = "Last owner", body = crate::errors::ErrorResponse)
    ),
    tag = "Workspaces"
)]
pub async fn remove_member(
    State(state): State<AppState>,
    Path((id, user_id)): Path<(i32, String)>,
) -> ApiResult<()> {
    state
        .services
        .workspaces
        .remove_member(id, &user_id)
        .await?;
    Ok(ApiResponse::empty("Member removed"))
}

#[utoipa::path(
    get,
    path = "/api/v1/workspaces/{id}/invitations",
    params(("id" = i32, Path, description = "Workspace id")),
    responses(
        (status = 200, description = "Invitations retrieved", body = ApiResponse<Vec<workspace_invitation::Model>>),
        (status = 404, description = "Workspace not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Workspaces"
)]
pub async fn list_invitations(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Vec<workspace_invitation::Model>> {
    Ok(ApiResponse::ok(
        state.services.workspaces.list_invitations(id).await?,
    ))
}

/// Invite someone by email. The token is returned once and only its hash is stored.
#[utoipa::path(
    post,
    path = "/api/v1/workspaces/{id}/invitations",
    params(("id" = i32, Path, description = "Workspace id")),
    request_body = CreateInvitationInput,
    responses(
        (status = 201, description = "Invitation created", body = ApiResponse<CreatedInvitation>),
        (status = 400, description = "Invalid email or role", body = crate::errors::ErrorResponse),
        (status = 404, description = "Workspace not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Workspaces"
)]
pub async fn create_invitation(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<CreateInvitationInput>,
) -> ApiResult<CreatedInvitation> {
    let created = state
        .services
        .workspaces
        .create_invitation(id, payload)
        .await?;
    Ok(ApiResponse::created(created).message("Invitation created"))
}
