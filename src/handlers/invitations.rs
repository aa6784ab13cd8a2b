use axum::{extract::State, routing::post, Json, Router};

use crate::{
    entities::workspace_member, services::workspaces::AcceptInvitationInput, ApiResponse,
    ApiResult, AppState,
};

/// Build the invitation Router scoped under `/api/v1/invitations`.
pub fn invitations_routes() -> Router<AppState> {
    Router::new().route("/accept", post(accept_invitation))
}

/// Redeem an invitation token, joining the workspace
#[utoipa::path(
    post,
    path = "/api/v1/invitations/accept",
    request_body = AcceptInvitationInput,
    responses(
        (status = 200, description = "Invitation accepted", body = ApiResponse<workspace_member::Model>),
        (status = 400, description = "Invitation expired", body = crate::errors::ErrorResponse),
        (status = 404, description = "Unknown token", body = crate::errors::ErrorResponse),
        (status = 409, description = "Invitation already used", body = crate::errors::ErrorResponse)
    ),
    tag = "Workspaces"
)]
pub async fn accept_invitation(
    State(state): State<AppState>,
    Json(payload): Json<AcceptInvitationInput>,
) -> ApiResult<workspace_member::Model> {
    let member = state.services.workspaces.accept_invitation(payload).await?;
    Ok(ApiResponse::ok(member).message("Invitation accepted"))
}
