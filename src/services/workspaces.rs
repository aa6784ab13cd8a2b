use crate::{
    auth::tokens::{expiry_from, generate_token, hash_token},
    db::DbPool,
    entities::{
        team, team_member,
        workspace::{self, Entity as Workspace},
        workspace_invitation,
        workspace_member::{self, WorkspaceRole},
    },
    errors::ServiceError,
    services::{db_failure, slugify},
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, QueryTrait, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateWorkspaceInput {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    /// Derived from `name` when omitted
    #[validate(length(min = 1, max = 128))]
    pub slug: Option<String>,
    /// Identity-provider user id of the creator; becomes the first owner
    #[validate(length(min = 1, max = 255))]
    pub owner_id: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWorkspaceInput {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 128))]
    pub slug: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddWorkspaceMemberInput {
    #[validate(length(min = 1, max = 255))]
    pub user_id: String,
    #[serde(default)]
    pub role: WorkspaceRole,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvitationInput {
    #[validate(email)]
    pub email: String,
    #[serde(default)]
    pub role: WorkspaceRole,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AcceptInvitationInput {
    #[validate(length(min = 1))]
    pub token: String,
    #[validate(length(min = 1, max = 255))]
    pub user_id: String,
}

/// A new invitation with its plain token. The token is not stored and cannot
/// be retrieved again.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatedInvitation {
    pub invitation: workspace_invitation::Model,
    pub token: String,
}

/// Service for workspaces, their members and invitations
#[derive(Clone)]
pub struct WorkspaceService {
    db_pool: Arc<DbPool>,
    invitation_ttl_hours: i64,
}

impl WorkspaceService {
    pub fn new(db_pool: Arc<DbPool>, invitation_ttl_hours: i64) -> Self {
        Self {
            db_pool,
            invitation_ttl_hours,
        }
    }

    #[instrument(skip(self))]
    pub async fn create_workspace(
        &self,
        input: CreateWorkspaceInput,
    ) -> Result<workspace::Model, ServiceError> {
        input.validate()?;
        let slug = slugify(input.slug.as_deref().unwrap_or(&input.name));
        if slug.is_empty() {
            return Err(ServiceError::ValidationError(
                "Workspace slug must contain at least one letter or digit".to_string(),
            ));
        }
        self.ensure_unique_slug(&slug, None).await?;

        let txn = self
            .db_pool
            .begin()
            .await
            .map_err(db_failure("begin transaction"))?;
        let now = Utc::now();
        let workspace = workspace::ActiveModel {
            name: Set(input.name),
            slug: Set(slug),
            owner_id: Set(input.owner_id.clone()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(db_failure("create workspace"))?;

        workspace_member::ActiveModel {
            workspace_id: Set(workspace.id),
            user_id: Set(input.owner_id),
            role: Set(WorkspaceRole::Owner),
            joined_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(db_failure("add workspace owner"))?;
        txn.commit().await.map_err(db_failure("commit workspace"))?;

        info!(workspace_id = workspace.id, slug = %workspace.slug, "Workspace created");
        Ok(workspace)
    }

    #[instrument(skip(self))]
    pub async fn get_workspace(&self, id: i32) -> Result<workspace::Model, ServiceError> {
        Workspace::find_by_id(id)
            .one(&*self.db_pool)
            .await
            .map_err(db_failure("fetch workspace"))?
            .ok_or_else(|| ServiceError::not_found("Workspace", id))
    }

    /// Lists workspaces, optionally only those `user_id` belongs to.
    #[instrument(skip(self))]
    pub async fn list_workspaces(
        &self,
        user_id: Option<String>,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<workspace::Model>, u64), ServiceError> {
        let mut query = Workspace::find();
        if let Some(user_id) = user_id {
            query = query.filter(
                workspace::Column::Id.in_subquery(
                    workspace_member::Entity::find()
                        .select_only()
                        .column(workspace_member::Column::WorkspaceId)
                        .filter(workspace_member::Column::UserId.eq(user_id))
                        .into_query(),
                ),
            );
        }
        let paginator = query
            .order_by_asc(workspace::Column::Name)
            .order_by_asc(workspace::Column::Id)
            .paginate(&*self.db_pool, limit);
        let total = paginator
            .num_items()
            .await
            .map_err(db_failure("count workspaces"))?;
        let workspaces = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(db_failure("fetch workspaces"))?;
        Ok((workspaces, total))
    }

    #[instrument(skip(self))]
    pub async fn update_workspace(
        &self,
        id: i32,
        input: UpdateWorkspaceInput,
    ) -> Result<workspace::Model, ServiceError> {
        input.validate()?;
        let workspace = self.get_workspace(id).await?;

        let slug = match input.slug.as_deref().map(slugify) {
            Some(slug) if slug.is_empty() => {
                return Err(ServiceError::ValidationError(
                    "Workspace slug must contain at least one letter or digit".to_string(),
                ))
            }
            Some(slug) => {
                self.ensure_unique_slug(&slug, Some(id)).await?;
                Some(slug)
            }
            None => None,
        };

        let mut active: workspace::ActiveModel = workspace.into();
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(slug) = slug {
            active.slug = Set(slug);
        }
        active.updated_at = Set(Utc::now());

        let workspace = active
            .update(&*self.db_pool)
            .await
            .map_err(db_failure("update workspace"))?;
        info!(workspace_id = id, "Workspace updated");
        Ok(workspace)
    }

    /// Deletes the workspace with its teams, members and invitations.
    #[instrument(skip(self))]
    pub async fn delete_workspace(&self, id: i32) -> Result<(), ServiceError> {
        self.get_workspace(id).await?;

        let txn = self
            .db_pool
            .begin()
            .await
            .map_err(db_failure("begin transaction"))?;
        team_member::Entity::delete_many()
            .filter(
                team_member::Column::TeamId.in_subquery(
                    team::Entity::find()
                        .select_only()
                        .column(team::Column::Id)
                        .filter(team::Column::WorkspaceId.eq(id))
                        .into_query(),
                ),
            )
            .exec(&txn)
            .await
            .map_err(db_failure("delete team members"))?;
        team::Entity::delete_many()
            .filter(team::Column::WorkspaceId.eq(id))
            .exec(&txn)
            .await
            .map_err(db_failure("delete teams"))?;
        workspace_invitation::Entity::delete_many()
            .filter(workspace_invitation::Column::WorkspaceId.eq(id))
            .exec(&txn)
            .await
            .map_err(db_failure("delete invitations"))?;
        workspace_member::Entity::delete_many()
            .filter(workspace_member::Column::WorkspaceId.eq(id))
            .exec(&txn)
            .await
            .map_err(db_failure("delete workspace members"))?;
        Workspace::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(db_failure("delete workspace"))?;
        txn.commit().await.map_err(db_failure("commit workspace deletion"))?;

        info!(workspace_id = id, "Workspace deleted");
        Ok(())
    }

    // Members

    #[instrument(skip(self))]
    pub async fn list_members(
        &self,
        workspace_id: i32,
    ) -> Result<Vec<workspace_member::Model>, ServiceError> {
        self.get_workspace(workspace_id).await?;
        workspace_member::Entity::find()
            .filter(workspace_member::Column::WorkspaceId.eq(workspace_id))
            .order_by_asc(workspace_member::Column::JoinedAt)
            .order_by_asc(workspace_member::Column::UserId)
            .all(&*self.db_pool)
            .await
            .map_err(db_failure("fetch workspace members"))
    }

    pub async fn find_member(
        &self,
        workspace_id: i32,
        user_id: &str,
    ) -> Result<Option<workspace_member::Model>, ServiceError> {
        workspace_member::Entity::find_by_id((workspace_id, user_id.to_string()))
            .one(&*self.db_pool)
            .await
            .map_err(db_failure("fetch workspace member"))
    }

    #[instrument(skip(self))]
    pub async fn add_member(
        &self,
        workspace_id: i32,
        input: AddWorkspaceMemberInput,
    ) -> Result<workspace_member::Model, ServiceError> {
        input.validate()?;
        self.get_workspace(workspace_id).await?;
        if self.find_member(workspace_id, &input.user_id).await?.is_some() {
            return Err(ServiceError::Conflict(format!(
                "User '{}' is already a member of workspace {}",
                input.user_id, workspace_id
            )));
        }

        let member = workspace_member::ActiveModel {
            workspace_id: Set(workspace_id),
            user_id: Set(input.user_id),
            role: Set(input.role),
            joined_at: Set(Utc::now()),
        }
        .insert(&*self.db_pool)
        .await
        .map_err(db_failure("add workspace member"))?;

        info!(workspace_id, user_id = %member.user_id, role = %member.role, "Workspace member added");
        Ok(member)
    }

    /// Removes a member and their team memberships. The last owner cannot leave.
    #[instrument(skip(self))]
    pub async fn remove_member(&self, workspace_id: i32, user_id: &str) -> Result<(), ServiceError> {
        let member = self
            .find_member(workspace_id, user_id)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!(
                    "User '{}' is not a member of workspace {}",
                    user_id, workspace_id
                ))
            })?;

        if member.role == WorkspaceRole::Owner {
            let owners = workspace_member::Entity::find()
                .filter(workspace_member::Column::WorkspaceId.eq(workspace_id))
                .filter(workspace_member::Column::Role.eq(WorkspaceRole::Owner))
                .count(&*self.db_pool)
                .await
                .map_err(db_failure("count workspace owners"))?;
            if owners <= 1 {
                warn!(workspace_id, user_id, "Refused to remove last workspace owner");
                return Err(ServiceError::Conflict(
                    "Cannot remove the last owner of a workspace".to_string(),
                ));
            }
        }

        let txn = self
            .db_pool
            .begin()
            .await
            .map_err(db_failure("begin transaction"))?;
        team_member::Entity::delete_many()
            .filter(team_member::Column::UserId.eq(user_id))
            .filter(
                team_member::Column::TeamId.in_subquery(
                    team::Entity::find()
                        .select_only()
                        .column(team::Column::Id)
                        .filter(team::Column::WorkspaceId.eq(workspace_id))
                        .into_query(),
                ),
            )
            .exec(&txn)
            .await
            .map_err(db_failure("delete team memberships"))?;
        workspace_member::Entity::delete_by_id((workspace_id, user_id.to_string()))
            .exec(&txn)
            .await
            .map_err(db_failure("remove workspace member"))?;
        txn.commit().await.map_err(db_failure("commit member removal"))?;

        info!(workspace_id, user_id, "Workspace member removed");
        Ok(())
    }

    // Invitations

    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn create_invitation(
        &self,
        workspace_id: i32,
        input: CreateInvitationInput,
    ) -> Result<CreatedInvitation, ServiceError> {
        input.validate()?;
        self.get_workspace(workspace_id).await?;
        if input.role == WorkspaceRole::Owner {
            return Err(ServiceError::ValidationError(
                "Invitations cannot grant the OWNER role".to_string(),
            ));
        }

        let token = generate_token();
        let now = Utc::now();
        let invitation = workspace_invitation::ActiveModel {
            workspace_id: Set(workspace_id),
            email: Set(input.email.trim().to_lowercase()),
            role: Set(input.role),
            token_hash: Set(hash_token(&token)),
            expires_at: Set(expiry_from(now, self.invitation_ttl_hours)),
            accepted_at: Set(None),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(&*self.db_pool)
        .await
        .map_err(db_failure("create invitation"))?;

        info!(
            workspace_id,
            invitation_id = invitation.id,
            expires_at = %invitation.expires_at,
            "Workspace invitation created"
        );
        Ok(CreatedInvitation { invitation, token })
    }

    #[instrument(skip(self))]
    pub async fn list_invitations(
        &self,
        workspace_id: i32,
    ) -> Result<Vec<workspace_invitation::Model>, ServiceError> {
        self.get_workspace(workspace_id).await?;
        workspace_invitation::Entity::find()
            .filter(workspace_invitation::Column::WorkspaceId.eq(workspace_id))
            .order_by_desc(workspace_invitation::Column::CreatedAt)
            .all(&*self.db_pool)
            .await
            .map_err(db_failure("fetch invitations"))
    }

    /// Redeems an invitation token, making `user_id` a member with the invited
    /// role. A user who is already a member keeps their current role.
    #[instrument(skip(self, input), fields(user_id = %input.user_id))]
    pub async fn accept_invitation(
        &self,
        input: AcceptInvitationInput,
    ) -> Result<workspace_member::Model, ServiceError> {
        input.validate()?;
        let invitation = workspace_invitation::Entity::find()
            .filter(workspace_invitation::Column::TokenHash.eq(hash_token(&input.token)))
            .one(&*self.db_pool)
            .await
            .map_err(db_failure("fetch invitation"))?
            .ok_or_else(|| ServiceError::NotFound("Invitation not found".to_string()))?;

        if invitation.accepted_at.is_some() {
            return Err(ServiceError::Conflict(
                "Invitation has already been accepted".to_string(),
            ));
        }
        let now = Utc::now();
        if invitation.is_expired(now) {
            warn!(invitation_id = invitation.id, "Expired invitation presented");
            return Err(ServiceError::ValidationError(
                "Invitation has expired".to_string(),
            ));
        }

        let workspace_id = invitation.workspace_id;
        let role = invitation.role;
        let existing = self.find_member(workspace_id, &input.user_id).await?;

        let txn = self
            .db_pool
            .begin()
            .await
            .map_err(db_failure("begin transaction"))?;
        let member = match existing {
            Some(member) => member,
            None => workspace_member::ActiveModel {
                workspace_id: Set(workspace_id),
                user_id: Set(input.user_id),
                role: Set(role),
                joined_at: Set(now),
            }
            .insert(&txn)
            .await
            .map_err(db_failure("add workspace member"))?,
        };
        let mut active: workspace_invitation::ActiveModel = invitation.into();
        active.accepted_at = Set(Some(now));
        active
            .update(&txn)
            .await
            .map_err(db_failure("mark invitation accepted"))?;
        txn.commit().await.map_err(db_failure("commit invitation"))?;

        info!(workspace_id, user_id = %member.user_id, "Invitation accepted");
        Ok(member)
    }

    async fn ensure_unique_slug(&self, slug: &str, exclude: Option<i32>) -> Result<(), ServiceError> {
        let existing = Workspace::find()
            .filter(workspace::Column::Slug.eq(slug))
            .one(&*self.db_pool)
            .await
            .map_err(db_failure("fetch workspace by slug"))?;
        match existing {
            Some(workspace) if Some(workspace.id) != exclude => Err(ServiceError::Conflict(
                format!("Workspace with slug '{}' already exists", slug),
            )),
            _ => Ok(()),
        }
    }
}
