mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::TestApp;
use pim_api::entities::workspace_invitation;
use sea_orm::{sea_query::Expr, ColumnTrait, EntityTrait, QueryFilter};
use serde_json::json;

async fn create_workspace(app: &TestApp, name: &str, owner: &str) -> i64 {
    let response = app
        .post("/api/v1/workspaces", json!({ "name": name, "ownerId": owner }))
        .await;
    assert_eq!(response.status, StatusCode::CREATED, "{}", response.raw);
    response.id()
}

async fn invite(app: &TestApp, workspace: i64, email: &str, role: &str) -> (i64, String) {
    let response = app
        .post(
            &format!("/api/v1/workspaces/{}/invitations", workspace),
            json!({ "email": email, "role": role }),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED, "{}", response.raw);
    let id = response.data()["invitation"]["id"].as_i64().unwrap();
    let token = response.data()["token"].as_str().unwrap().to_string();
    (id, token)
}

#[tokio::test]
async fn creator_becomes_owner() {
    let app = TestApp::new().await;
    let created = app
        .post(
            "/api/v1/workspaces",
            json!({ "name": "Spring Catalog", "ownerId": "user-1" }),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED, "{}", created.raw);
    assert_eq!(created.data()["slug"], "spring-catalog");

    let members = app
        .get(&format!("/api/v1/workspaces/{}/members", created.id()))
        .await;
    assert_eq!(members.status, StatusCode::OK);
    assert_eq!(members.data()[0]["userId"], "user-1");
    assert_eq!(members.data()[0]["role"], "OWNER");

    let taken = app
        .post(
            "/api/v1/workspaces",
            json!({ "name": "Spring catalog!", "ownerId": "user-2" }),
        )
        .await;
    assert_eq!(taken.status, StatusCode::CONFLICT);

    let mine = app.get("/api/v1/workspaces?userId=user-1").await;
    assert_eq!(mine.body["meta"]["total"], 1);
    let theirs = app.get("/api/v1/workspaces?userId=user-2").await;
    assert_eq!(theirs.body["meta"]["total"], 0);
}

#[tokio::test]
async fn last_owner_cannot_leave() {
    let app = TestApp::new().await;
    let workspace = create_workspace(&app, "Solo", "owner").await;

    let refused = app
        .delete(&format!("/api/v1/workspaces/{}/members/owner", workspace))
        .await;
    assert_eq!(refused.status, StatusCode::CONFLICT, "{}", refused.raw);

    let added = app
        .post(
            &format!("/api/v1/workspaces/{}/members", workspace),
            json!({ "userId": "second", "role": "OWNER" }),
        )
        .await;
    assert_eq!(added.status, StatusCode::CREATED, "{}", added.raw);

    let again = app
        .post(
            &format!("/api/v1/workspaces/{}/members", workspace),
            json!({ "userId": "second" }),
        )
        .await;
    assert_eq!(again.status, StatusCode::CONFLICT);

    let left = app
        .delete(&format!("/api/v1/workspaces/{}/members/owner", workspace))
        .await;
    assert_eq!(left.status, StatusCode::OK, "{}", left.raw);
}

#[tokio::test]
async fn invitation_is_accepted_once() {
    let app = TestApp::new().await;
    let workspace = create_workspace(&app, "Team Space", "owner").await;
    let (_, token) = invite(&app, workspace, "Editor@Example.com", "ADMIN").await;

    let listed = app
        .get(&format!("/api/v1/workspaces/{}/invitations", workspace))
        .await;
    assert_eq!(listed.data()[0]["email"], "editor@example.com");
    assert!(listed.data()[0].get("tokenHash").is_none());

    let accepted = app
        .post(
            "/api/v1/invitations/accept",
            json!({ "token": token, "userId": "editor" }),
        )
        .await;
    assert_eq!(accepted.status, StatusCode::OK, "{}", accepted.raw);
    assert_eq!(accepted.data()["role"], "ADMIN");
    assert_eq!(accepted.data()["workspaceId"], workspace);

    let reused = app
        .post(
            "/api/v1/invitations/accept",
            json!({ "token": token, "userId": "someone-else" }),
        )
        .await;
    assert_eq!(reused.status, StatusCode::CONFLICT, "{}", reused.raw);

    let bogus = app
        .post(
            "/api/v1/invitations/accept",
            json!({ "token": "not-a-token", "userId": "editor" }),
        )
        .await;
    assert_eq!(bogus.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn expired_invitation_is_rejected() {
    let app = TestApp::new().await;
    let workspace = create_workspace(&app, "Expiring", "owner").await;
    let (id, token) = invite(&app, workspace, "late@example.com", "MEMBER").await;

    workspace_invitation::Entity::update_many()
        .col_expr(
            workspace_invitation::Column::ExpiresAt,
            Expr::value(Utc::now() - Duration::hours(1)),
        )
        .filter(workspace_invitation::Column::Id.eq(id as i32))
        .exec(&*app.state.db)
        .await
        .unwrap();

    let response = app
        .post(
            "/api/v1/invitations/accept",
            json!({ "token": token, "userId": "late" }),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST, "{}", response.raw);

    let members = app
        .get(&format!("/api/v1/workspaces/{}/members", workspace))
        .await;
    assert_eq!(members.data().as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn existing_member_keeps_role_on_accept() {
    let app = TestApp::new().await;
    let workspace = create_workspace(&app, "Keepers", "owner").await;
    let (_, token) = invite(&app, workspace, "owner@example.com", "MEMBER").await;

    let accepted = app
        .post(
            "/api/v1/invitations/accept",
            json!({ "token": token, "userId": "owner" }),
        )
        .await;
    assert_eq!(accepted.status, StatusCode::OK, "{}", accepted.raw);
    assert_eq!(accepted.data()["role"], "OWNER");
}

#[tokio::test]
async fn invitations_validate_email_and_role() {
    let app = TestApp::new().await;
    let workspace = create_workspace(&app, "Strict", "owner").await;

    let bad_email = app
        .post(
            &format!("/api/v1/workspaces/{}/invitations", workspace),
            json!({ "email": "nope" }),
        )
        .await;
    assert_eq!(bad_email.status, StatusCode::BAD_REQUEST);

    let owner_role = app
        .post(
            &format!("/api/v1/workspaces/{}/invitations", workspace),
            json!({ "email": "boss@example.com", "role": "OWNER" }),
        )
        .await;
    assert_eq!(owner_role.status, StatusCode::BAD_REQUEST);

    let no_workspace = app
        .post(
            "/api/v1/workspaces/9999/invitations",
            json!({ "email": "who@example.com" }),
        )
        .await;
    assert_eq!(no_workspace.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn teams_only_take_workspace_members() {
    let app = TestApp::new().await;
    let workspace = create_workspace(&app, "Studio", "owner").await;
    app.post(
        &format!("/api/v1/workspaces/{}/members", workspace),
        json!({ "userId": "writer" }),
    )
    .await;

    let team = app
        .post(
            "/api/v1/teams",
            json!({ "workspaceId": workspace, "name": "Copywriters" }),
        )
        .await;
    assert_eq!(team.status, StatusCode::CREATED, "{}", team.raw);
    let team_id = team.id();

    let outsider = app
        .post(
            &format!("/api/v1/teams/{}/members", team_id),
            json!({ "userId": "stranger" }),
        )
        .await;
    assert_eq!(outsider.status, StatusCode::BAD_REQUEST);

    let lead = app
        .post(
            &format!("/api/v1/teams/{}/members", team_id),
            json!({ "userId": "writer", "role": "LEAD" }),
        )
        .await;
    assert_eq!(lead.status, StatusCode::CREATED, "{}", lead.raw);
    assert_eq!(lead.data()["role"], "LEAD");

    let left = app
        .delete(&format!("/api/v1/workspaces/{}/members/writer", workspace))
        .await;
    assert_eq!(left.status, StatusCode::OK);
    let members = app
        .get(&format!("/api/v1/teams/{}/members", team_id))
        .await;
    assert!(members.data().as_array().unwrap().is_empty());

    let by_workspace = app
        .get(&format!("/api/v1/teams?workspaceId={}", workspace))
        .await;
    assert_eq!(by_workspace.body["meta"]["total"], 1);
}
