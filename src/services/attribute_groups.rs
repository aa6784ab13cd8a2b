use crate::{
    db::DbPool,
    entities::{
        attribute_group::{self, Entity as AttributeGroup},
        attribute_set,
    },
    errors::ServiceError,
    services::db_failure,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAttributeGroupInput {
    pub attribute_set_id: i32,
    #[validate(length(min = 1, max = 64))]
    pub code: String,
    #[validate(length(min = 1, max = 255))]
    pub label: String,
    #[serde(default)]
    pub sort_order: i32,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAttributeGroupInput {
    #[validate(length(min = 1, max = 64))]
    pub code: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub label: Option<String>,
    pub sort_order: Option<i32>,
}

/// Display sections within attribute sets
#[derive(Clone)]
pub struct AttributeGroupService {
    db_pool: Arc<DbPool>,
}

impl AttributeGroupService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    #[instrument(skip(self))]
    pub async fn create_group(
        &self,
        input: CreateAttributeGroupInput,
    ) -> Result<attribute_group::Model, ServiceError> {
        input.validate()?;

        let set_exists = attribute_set::Entity::find_by_id(input.attribute_set_id)
            .one(&*self.db_pool)
            .await
            .map_err(db_failure("fetch attribute set"))?
            .is_some();
        if !set_exists {
            return Err(ServiceError::ValidationError(format!(
                "Attribute set {} does not exist",
                input.attribute_set_id
            )));
        }
        self.ensure_unique_code(input.attribute_set_id, &input.code, None)
            .await?;

        let now = Utc::now();
        let group = attribute_group::ActiveModel {
            attribute_set_id: Set(input.attribute_set_id),
            code: Set(input.code),
            label: Set(input.label),
            sort_order: Set(input.sort_order),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&*self.db_pool)
        .await
        .map_err(db_failure("create attribute group"))?;

        info!(group_id = group.id, attribute_set_id = group.attribute_set_id, "Attribute group created");
        Ok(group)
    }

    #[instrument(skip(self))]
    pub async fn get_group(&self, id: i32) -> Result<attribute_group::Model, ServiceError> {
        AttributeGroup::find_by_id(id)
            .one(&*self.db_pool)
            .await
            .map_err(db_failure("fetch attribute group"))?
            .ok_or_else(|| ServiceError::not_found("Attribute group", id))
    }

    #[instrument(skip(self))]
    pub async fn list_groups(
        &self,
        attribute_set_id: Option<i32>,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<attribute_group::Model>, u64), ServiceError> {
        let mut query = AttributeGroup::find();
        if let Some(set_id) = attribute_set_id {
            query = query.filter(attribute_group::Column::AttributeSetId.eq(set_id));
        }
        let paginator = query
            .order_by_asc(attribute_group::Column::AttributeSetId)
            .order_by_asc(attribute_group::Column::SortOrder)
            .order_by_asc(attribute_group::Column::Id)
            .paginate(&*self.db_pool, limit);

        let total = paginator
            .num_items()
            .await
            .map_err(db_failure("count attribute groups"))?;
        let groups = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(db_failure("fetch attribute groups"))?;
        Ok((groups, total))
    }

    /// All groups of one set, unpaginated.
    pub async fn groups_for_set(
        &self,
        attribute_set_id: i32,
    ) -> Result<Vec<attribute_group::Model>, ServiceError> {
        AttributeGroup::find()
            .filter(attribute_group::Column::AttributeSetId.eq(attribute_set_id))
            .all(&*self.db_pool)
            .await
            .map_err(db_failure("fetch attribute groups"))
    }

    #[instrument(skip(self))]
    pub async fn update_group(
        &self,
        id: i32,
        input: UpdateAttributeGroupInput,
    ) -> Result<attribute_group::Model, ServiceError> {
        input.validate()?;
        let group = self.get_group(id).await?;
        if let Some(ref code) = input.code {
            self.ensure_unique_code(group.attribute_set_id, code, Some(id))
                .await?;
        }

        let mut active: attribute_group::ActiveModel = group.into();
        if let Some(code) = input.code {
            active.code = Set(code);
        }
        if let Some(label) = input.label {
            active.label = Set(label);
        }
        if let Some(sort_order) = input.sort_order {
            active.sort_order = Set(sort_order);
        }
        active.updated_at = Set(Utc::now());

        let group = active
            .update(&*self.db_pool)
            .await
            .map_err(db_failure("update attribute group"))?;
        info!(group_id = id, "Attribute group updated");
        Ok(group)
    }

    /// Deletes the group; its memberships fall back to ungrouped.
    #[instrument(skip(self))]
    pub async fn delete_group(&self, id: i32) -> Result<(), ServiceError> {
        self.get_group(id).await?;
        crate::entities::attribute_set_attribute::Entity::update_many()
            .col_expr(
                crate::entities::attribute_set_attribute::Column::AttributeGroupId,
                sea_orm::sea_query::Expr::value(Option::<i32>::None),
            )
            .filter(crate::entities::attribute_set_attribute::Column::AttributeGroupId.eq(id))
            .exec(&*self.db_pool)
            .await
            .map_err(db_failure("ungroup attribute memberships"))?;
        AttributeGroup::delete_by_id(id)
            .exec(&*self.db_pool)
            .await
            .map_err(db_failure("delete attribute group"))?;
        info!(group_id = id, "Attribute group deleted");
        Ok(())
    }

    async fn ensure_unique_code(
        &self,
        attribute_set_id: i32,
        code: &str,
        exclude: Option<i32>,
    ) -> Result<(), ServiceError> {
        let existing = AttributeGroup::find()
            .filter(attribute_group::Column::AttributeSetId.eq(attribute_set_id))
            .filter(attribute_group::Column::Code.eq(code))
            .one(&*self.db_pool)
            .await
            .map_err(db_failure("fetch attribute group by code"))?;
        match existing {
            Some(group) if Some(group.id) != exclude => Err(ServiceError::Conflict(format!(
                "Attribute group '{}' already exists in set {}",
                code, attribute_set_id
            ))),
            _ => Ok(()),
        }
    }
}
