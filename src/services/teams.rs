use crate::{
    db::DbPool,
    entities::{
        team::{self, Entity as Team},
        team_member::{self, TeamRole},
        workspace, workspace_member,
    },
    errors::ServiceError,
    services::db_failure,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTeamInput {
    pub workspace_id: i32,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTeamInput {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddTeamMemberInput {
    #[validate(length(min = 1, max = 255))]
    pub user_id: String,
    #[serde(default)]
    pub role: TeamRole,
}

/// Teams group workspace members
#[derive(Clone)]
pub struct TeamService {
    db_pool: Arc<DbPool>,
}

impl TeamService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    #[instrument(skip(self))]
    pub async fn create_team(&self, input: CreateTeamInput) -> Result<team::Model, ServiceError> {
        input.validate()?;
        workspace::Entity::find_by_id(input.workspace_id)
            .one(&*self.db_pool)
            .await
            .map_err(db_failure("fetch workspace"))?
            .ok_or_else(|| ServiceError::not_found("Workspace", input.workspace_id))?;

        let duplicate = Team::find()
            .filter(team::Column::WorkspaceId.eq(input.workspace_id))
            .filter(team::Column::Name.eq(input.name.as_str()))
            .one(&*self.db_pool)
            .await
            .map_err(db_failure("fetch team by name"))?;
        if duplicate.is_some() {
            return Err(ServiceError::Conflict(format!(
                "Team '{}' already exists in workspace {}",
                input.name, input.workspace_id
            )));
        }

        let now = Utc::now();
        let team = team::ActiveModel {
            workspace_id: Set(input.workspace_id),
            name: Set(input.name),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&*self.db_pool)
        .await
        .map_err(db_failure("create team"))?;

        info!(team_id = team.id, workspace_id = team.workspace_id, "Team created");
        Ok(team)
    }

    #[instrument(skip(self))]
    pub async fn get_team(&self, id: i32) -> Result<team::Model, ServiceError> {
        Team::find_by_id(id)
            .one(&*self.db_pool)
            .await
            .map_err(db_failure("fetch team"))?
            .ok_or_else(|| ServiceError::not_found("Team", id))
    }

    #[instrument(skip(self))]
    pub async fn list_teams(
        &self,
        workspace_id: Option<i32>,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<team::Model>, u64), ServiceError> {
        let mut query = Team::find();
        if let Some(workspace_id) = workspace_id {
            query = query.filter(team::Column::WorkspaceId.eq(workspace_id));
        }
        let paginator = query
            .order_by_asc(team::Column::Name)
            .order_by_asc(team::Column::Id)
            .paginate(&*self.db_pool, limit);
        let total = paginator
            .num_items()
            .await
            .map_err(db_failure("count teams"))?;
        let teams = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(db_failure("fetch teams"))?;
        Ok((teams, total))
    }

    #[instrument(skip(self))]
    pub async fn update_team(
        &self,
        id: i32,
        input: UpdateTeamInput,
    ) -> Result<team::Model, ServiceError> {
        input.validate()?;
        let team = self.get_team(id).await?;
        let mut active: team::ActiveModel = team.into();
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        active.updated_at = Set(Utc::now());
        let team = active
            .update(&*self.db_pool)
            .await
            .map_err(db_failure("update team"))?;
        info!(team_id = id, "Team updated");
        Ok(team)
    }

    #[instrument(skip(self))]
    pub async fn delete_team(&self, id: i32) -> Result<(), ServiceError> {
        self.get_team(id).await?;
        let txn = self
            .db_pool
            .begin()
            .await
            .map_err(db_failure("begin transaction"))?;
        team_member::Entity::delete_many()
            .filter(team_member::Column::TeamId.eq(id))
            .exec(&txn)
            .await
            .map_err(db_failure("delete team members"))?;
        Team::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(db_failure("delete team"))?;
        txn.commit().await.map_err(db_failure("commit team deletion"))?;
        info!(team_id = id, "Team deleted");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn list_members(&self, team_id: i32) -> Result<Vec<team_member::Model>, ServiceError> {
        self.get_team(team_id).await?;
        team_member::Entity::find()
            .filter(team_member::Column::TeamId.eq(team_id))
            .order_by_asc(team_member::Column::JoinedAt)
            .order_by_asc(team_member::Column::UserId)
            .all(&*self.db_pool)
            .await
            .map_err(db_failure("fetch team members"))
    }

    /// Adds a workspace member to the team.
    #[instrument(skip(self))]
    pub async fn add_member(
        &self,
        team_id: i32,
        input: AddTeamMemberInput,
    ) -> Result<team_member::Model, ServiceError> {
        input.validate()?;
        let team = self.get_team(team_id).await?;
        let db = &*self.db_pool;

        let in_workspace = workspace_member::Entity::find_by_id((
            team.workspace_id,
            input.user_id.clone(),
        ))
        .one(db)
        .await
        .map_err(db_failure("fetch workspace member"))?
        .is_some();
        if !in_workspace {
            return Err(ServiceError::ValidationError(format!(
                "User '{}' is not a member of workspace {}",
                input.user_id, team.workspace_id
            )));
        }

        let existing = team_member::Entity::find_by_id((team_id, input.user_id.clone()))
            .one(db)
            .await
            .map_err(db_failure("fetch team member"))?;
        if existing.is_some() {
            return Err(ServiceError::Conflict(format!(
                "User '{}' is already in team {}",
                input.user_id, team_id
            )));
        }

        let member = team_member::ActiveModel {
            team_id: Set(team_id),
            user_id: Set(input.user_id),
            role: Set(input.role),
            joined_at: Set(Utc::now()),
        }
        .insert(db)
        .await
        .map_err(db_failure("add team member"))?;

        info!(team_id, user_id = %member.user_id, role = %member.role, "Team member added");
        Ok(member)
    }

    #[instrument(skip(self))]
    pub async fn remove_member(&self, team_id: i32, user_id: &str) -> Result<(), ServiceError> {
        let result = team_member::Entity::delete_by_id((team_id, user_id.to_string()))
            .exec(&*self.db_pool)
            .await
            .map_err(db_failure("remove team member"))?;
        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound(format!(
                "User '{}' is not in team {}",
                user_id, team_id
            )));
        }
        info!(team_id, user_id, "Team member removed");
        Ok(())
    }
}
