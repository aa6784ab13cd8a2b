use axum::{
    extract::{Path, Query, State},
    routing::{delete, get},
    Json, Router,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    entities::{team, team_member},
    handlers::common::PageWindow,
    services::teams::{AddTeamMemberInput, CreateTeamInput, UpdateTeamInput},
    ApiResponse, ApiResult, AppState,
};

/// Build the teams Router scoped under `/api/v1/teams`.
pub fn teams_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_teams).post(create_team))
        .route(
            "/:id",
            get(get_team).put(update_team).delete(delete_team),
        )
        .route("/:id/members", get(list_members).post(add_member))
        .route("/:id/members/:user_id", delete(remove_member))
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct TeamListQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub workspace_id: Option<i32>,
}

#[utoipa::path(
    get,
    path = "/api/v1/teams",
    params(TeamListQuery),
    responses(
        (status = 200, description = "Teams retrieved", body = ApiResponse<Vec<team::Model>>)
    ),
    tag = "Teams"
)]
pub async fn list_teams(
    State(state): State<AppState>,
    Query(query): Query<TeamListQuery>,
) -> ApiResult<Vec<team::Model>> {
    let window = PageWindow::resolve(&state.config, query.page, query.limit);
    let result = state
        .services
        .teams
        .list_teams(query.workspace_id, window.page, window.limit)
        .await?;
    Ok(window.respond(result))
}

#[utoipa::path(
    post,
    path = "/api/v1/teams",
    request_body = CreateTeamInput,
    responses(
        (status = 201, description = "Team created", body = ApiResponse<team::Model>),
        (status = 404, description = "Workspace not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Team name taken in the workspace", body = crate::errors::ErrorResponse)
    ),
    tag = "Teams"
)]
pub async fn create_team(
    State(state): State<AppState>,
    Json(payload): Json<CreateTeamInput>,
) -> ApiResult<team::Model> {
    let team = state.services.teams.create_team(payload).await?;
    Ok(ApiResponse::created(team).message("Team created"))
}

#[utoipa::path(
    get,
    path = "/api/v1/teams/{id}",
    params(("id" = i32, Path, description = "Team id")),
    responses(
        (status = 200, description = "Team found", body = ApiResponse<team::Model>),
        (status = 404, description = "Team not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Teams"
)]
pub async fn get_team(State(state): State<AppState>, Path(id): Path<i32>) -> ApiResult<team::Model> {
    Ok(ApiResponse::ok(state.services.teams.get_team(id).await?))
}

#[utoipa::path(
    put,
    path = "/api/v1/teams/{id}",
    params(("id" = i32, Path, description = "Team id")),
    request_body = UpdateTeamInput,
    responses(
        (status = 200, description = "Team updated", body = ApiResponse<team::Model>),
        (status = 404, description = "Team not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Teams"
)]
pub async fn update_team(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateTeamInput>,
) -> ApiResult<team::Model> {
    let team = state.services.teams.update_team(id, payload).await?;
    Ok(ApiResponse::ok(team).message("Team updated"))
}

#[utoipa::path(
    delete,
    path = "/api/v1/teams/{id}",
    params(("id" = i32, Path, description = "Team id")),
    responses(
        (status = 200, description = "Team deleted"),
        (status = 404, description = "Team not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Teams"
)]
pub async fn delete_team(State(state): State<AppState>, Path(id): Path<i32>) -> ApiResult<()> {
    state.services.teams.delete_team(id).await?;
    Ok(ApiResponse::empty("Team deleted"))
}

#[utoipa::path(
    get,
    path = "/api/v1/teams/{id}/members",
    params(("id" = i32, Path, description = "Team id")),
    responses(
        (status = 200, description = "Team members retrieved", body = ApiResponse<Vec<team_member::Model>>),
        (status = 404, description = "Team not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Teams"
)]
pub async fn list_members(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Vec<team_member::Model>> {
    Ok(ApiResponse::ok(state.services.teams.list_members(id).await?))
}

/// Add a workspace member to the team
#[utoipa::path(
    post,
    path = "/api/v1/teams/{id}/members",
    params(("id" = i32, Path, description = "Team id")),
    request_body = AddTeamMemberInput,
    responses(
        (status = 201, description = "Team member added", body = ApiResponse<team_member::Model>),
        (status = 400, description = "User is not in the workspace", body = crate::errors::ErrorResponse),
        (status = 409, description = "Already in the team", body = crate::errors::ErrorResponse)
    ),
    tag = "Teams"
)]
pub async fn add_member(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<AddTeamMemberInput>,
) -> ApiResult<team_member::Model> {
    let member = state.services.teams.add_member(id, payload).await?;
    Ok(ApiResponse::created(member).message("Team member added"))
}

#[utoipa::path(
    delete,
    path = "/api/v1/teams/{id}/members/{user_id}",
    params(
        ("id" = i32, Path, description = "Team id"),
        ("user_id" = String, Path, description = "Member user id")
    ),
    responses(
        (status = 200, description = "Team member removed"),
        (status = 404, description = "Not in the team", body = crate::errors::ErrorResponse)
    ),
    tag = "Teams"
)]
pub async fn remove_member(
    State(state): State<AppState>,
    Path((id, user_id)): Path<(i32, String)>,
) -> ApiResult<()> {
    state.services.teams.remove_member(id, &user_id).await?;
    Ok(ApiResponse::empty("Team member removed"))
}
