use crate::{
    db::DbPool,
    entities::{
        attribute::{self, DataType, InputType},
        attribute_group,
        attribute_set::{self, Entity as AttributeSet},
        attribute_set_attribute::{self, Entity as Membership},
        product::{self, ProductType},
    },
    errors::ServiceError,
    models::{display_order, sorted_groups},
    services::db_failure,
};
use chrono::Utc;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAttributeSetInput {
    #[validate(length(min = 1, max = 64))]
    pub code: String,
    #[validate(length(min = 1, max = 255))]
    pub label: String,
    pub product_type: Option<ProductType>,
    #[serde(default)]
    pub is_default: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAttributeSetInput {
    #[validate(length(min = 1, max = 64))]
    pub code: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub label: Option<String>,
    pub product_type: Option<ProductType>,
    pub is_default: Option<bool>,
}

/// Adds an attribute to a set, or moves it if it is already a member.
#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignAttributeInput {
    pub attribute_id: i32,
    pub attribute_group_id: Option<i32>,
    #[serde(default)]
    pub sort_order: i32,
}

/// An attribute as placed in a set.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetAttribute {
    pub membership_id: i32,
    pub attribute_id: i32,
    pub code: String,
    pub label: String,
    pub data_type: DataType,
    pub input_type: InputType,
    pub is_required: bool,
    pub attribute_group_id: Option<i32>,
    pub sort_order: i32,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GroupLayout {
    pub group: attribute_group::Model,
    pub attributes: Vec<SetAttribute>,
}

/// The display layout of a set: groups in order with their attributes, then
/// the attributes that belong to no group.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttributeSetLayout {
    pub attribute_set_id: i32,
    pub groups: Vec<GroupLayout>,
    pub ungrouped: Vec<SetAttribute>,
}

/// Service for attribute sets and their memberships
#[derive(Clone)]
pub struct AttributeSetService {
    db_pool: Arc<DbPool>,
}

impl AttributeSetService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    #[instrument(skip(self))]
    pub async fn create_set(
        &self,
        input: CreateAttributeSetInput,
    ) -> Result<attribute_set::Model, ServiceError> {
        input.validate()?;
        self.ensure_unique_code(&input.code, None).await?;

        let txn = self
            .db_pool
            .begin()
            .await
            .map_err(db_failure("begin transaction"))?;
        if input.is_default {
            clear_default_flag(&txn).await?;
        }

        let now = Utc::now();
        let set = attribute_set::ActiveModel {
            code: Set(input.code),
            label: Set(input.label),
            product_type: Set(input.product_type),
            is_default: Set(input.is_default),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(db_failure("create attribute set"))?;

        txn.commit().await.map_err(db_failure("commit attribute set"))?;
        info!(attribute_set_id = set.id, code = %set.code, is_default = set.is_default, "Attribute set created");
        Ok(set)
    }

    #[instrument(skip(self))]
    pub async fn get_set(&self, id: i32) -> Result<attribute_set::Model, ServiceError> {
        AttributeSet::find_by_id(id)
            .one(&*self.db_pool)
            .await
            .map_err(db_failure("fetch attribute set"))?
            .ok_or_else(|| ServiceError::not_found("Attribute set", id))
    }

    #[instrument(skip(self))]
    pub async fn list_sets(
        &self,
        product_type: Option<ProductType>,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<attribute_set::Model>, u64), ServiceError> {
        let mut query = AttributeSet::find();
        if let Some(product_type) = product_type {
            query = query.filter(attribute_set::Column::ProductType.eq(product_type));
        }
        let paginator = query
            .order_by_asc(attribute_set::Column::Code)
            .paginate(&*self.db_pool, limit);
        let total = paginator
            .num_items()
            .await
            .map_err(db_failure("count attribute sets"))?;
        let sets = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(db_failure("fetch attribute sets"))?;
        Ok((sets, total))
    }

    #[instrument(skip(self))]
    pub async fn update_set(
        &self,
        id: i32,
        input: UpdateAttributeSetInput,
    ) -> Result<attribute_set::Model, ServiceError> {
        input.validate()?;
        let set = self.get_set(id).await?;
        if let Some(ref code) = input.code {
            self.ensure_unique_code(code, Some(id)).await?;
        }

        let txn = self
            .db_pool
            .begin()
            .await
            .map_err(db_failure("begin transaction"))?;
        if input.is_default == Some(true) && !set.is_default {
            clear_default_flag(&txn).await?;
        }

        let mut active: attribute_set::ActiveModel = set.into();
        if let Some(code) = input.code {
            active.code = Set(code);
        }
        if let Some(label) = input.label {
            active.label = Set(label);
        }
        if let Some(product_type) = input.product_type {
            active.product_type = Set(Some(product_type));
        }
        if let Some(is_default) = input.is_default {
            active.is_default = Set(is_default);
        }
        active.updated_at = Set(Utc::now());

        let set = active
            .update(&txn)
            .await
            .map_err(db_failure("update attribute set"))?;
        txn.commit().await.map_err(db_failure("commit attribute set"))?;

        info!(attribute_set_id = id, "Attribute set updated");
        Ok(set)
    }

    /// Deletes a set with its groups and memberships. Products using it keep
    /// their values but lose the set reference.
    #[instrument(skip(self))]
    pub async fn delete_set(&self, id: i32) -> Result<(), ServiceError> {
        self.get_set(id).await?;

        let txn = self
            .db_pool
            .begin()
            .await
            .map_err(db_failure("begin transaction"))?;
        product::Entity::update_many()
            .col_expr(product::Column::AttributeSetId, Expr::value(Option::<i32>::None))
            .filter(product::Column::AttributeSetId.eq(id))
            .exec(&txn)
            .await
            .map_err(db_failure("detach products from attribute set"))?;
        Membership::delete_many()
            .filter(attribute_set_attribute::Column::AttributeSetId.eq(id))
            .exec(&txn)
            .await
            .map_err(db_failure("delete attribute set memberships"))?;
        attribute_group::Entity::delete_many()
            .filter(attribute_group::Column::AttributeSetId.eq(id))
            .exec(&txn)
            .await
            .map_err(db_failure("delete attribute groups"))?;
        AttributeSet::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(db_failure("delete attribute set"))?;
        txn.commit().await.map_err(db_failure("commit attribute set deletion"))?;

        info!(attribute_set_id = id, "Attribute set deleted");
        Ok(())
    }

    /// Places an attribute in the set. An existing membership is moved to the
    /// requested group and sort order.
    #[instrument(skip(self))]
    pub async fn assign_attribute(
        &self,
        set_id: i32,
        input: AssignAttributeInput,
    ) -> Result<attribute_set_attribute::Model, ServiceError> {
        let db = &*self.db_pool;
        self.get_set(set_id).await?;

        attribute::Entity::find_by_id(input.attribute_id)
            .one(db)
            .await
            .map_err(db_failure("fetch attribute"))?
            .ok_or_else(|| {
                ServiceError::ValidationError(format!(
                    "Attribute {} does not exist",
                    input.attribute_id
                ))
            })?;

        if let Some(group_id) = input.attribute_group_id {
            let group = attribute_group::Entity::find_by_id(group_id)
                .one(db)
                .await
                .map_err(db_failure("fetch attribute group"))?;
            match group {
                Some(group) if group.attribute_set_id == set_id => {}
                Some(_) => {
                    return Err(ServiceError::ValidationError(format!(
                        "Attribute group {} does not belong to attribute set {}",
                        group_id, set_id
                    )))
                }
                None => return Err(ServiceError::not_found("Attribute group", group_id)),
            }
        }

        let existing = Membership::find()
            .filter(attribute_set_attribute::Column::AttributeSetId.eq(set_id))
            .filter(attribute_set_attribute::Column::AttributeId.eq(input.attribute_id))
            .one(db)
            .await
            .map_err(db_failure("fetch attribute set membership"))?;

        let membership = match existing {
            Some(membership) => {
                let mut active: attribute_set_attribute::ActiveModel = membership.into();
                active.attribute_group_id = Set(input.attribute_group_id);
                active.sort_order = Set(input.sort_order);
                active
                    .update(db)
                    .await
                    .map_err(db_failure("update attribute set membership"))?
            }
            None => attribute_set_attribute::ActiveModel {
                attribute_set_id: Set(set_id),
                attribute_group_id: Set(input.attribute_group_id),
                attribute_id: Set(input.attribute_id),
                sort_order: Set(input.sort_order),
                ..Default::default()
            }
            .insert(db)
            .await
            .map_err(db_failure("create attribute set membership"))?,
        };

        info!(
            attribute_set_id = set_id,
            attribute_id = input.attribute_id,
            group_id = ?input.attribute_group_id,
            "Attribute assigned to set"
        );
        Ok(membership)
    }

    /// Assigns an attribute directly into one group of the set.
    pub async fn assign_attribute_to_group(
        &self,
        set_id: i32,
        group_id: i32,
        attribute_id: i32,
        sort_order: i32,
    ) -> Result<attribute_set_attribute::Model, ServiceError> {
        self.assign_attribute(
            set_id,
            AssignAttributeInput {
                attribute_id,
                attribute_group_id: Some(group_id),
                sort_order,
            },
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn remove_attribute(&self, set_id: i32, attribute_id: i32) -> Result<(), ServiceError> {
        let result = Membership::delete_many()
            .filter(attribute_set_attribute::Column::AttributeSetId.eq(set_id))
            .filter(attribute_set_attribute::Column::AttributeId.eq(attribute_id))
            .exec(&*self.db_pool)
            .await
            .map_err(db_failure("delete attribute set membership"))?;
        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound(format!(
                "Attribute {} is not assigned to attribute set {}",
                attribute_id, set_id
            )));
        }
        info!(attribute_set_id = set_id, attribute_id, "Attribute removed from set");
        Ok(())
    }

    /// Grouped, ordered layout of the set's attributes.
    #[instrument(skip(self))]
    pub async fn layout(&self, set_id: i32) -> Result<AttributeSetLayout, ServiceError> {
        let db = &*self.db_pool;
        self.get_set(set_id).await?;

        let groups = attribute_group::Entity::find()
            .filter(attribute_group::Column::AttributeSetId.eq(set_id))
            .all(db)
            .await
            .map_err(db_failure("fetch attribute groups"))?;
        let memberships = Membership::find()
            .filter(attribute_set_attribute::Column::AttributeSetId.eq(set_id))
            .all(db)
            .await
            .map_err(db_failure("fetch attribute set memberships"))?;
        let attributes = self.attributes_by_id(&memberships).await?;

        let ordered = display_order(&groups, memberships);
        let mut by_group: HashMap<i32, Vec<SetAttribute>> = HashMap::new();
        let mut ungrouped = Vec::new();
        let group_ids: Vec<i32> = groups.iter().map(|g| g.id).collect();

        for membership in ordered {
            let Some(attribute) = attributes.get(&membership.attribute_id) else {
                continue;
            };
            let entry = set_attribute(&membership, attribute);
            match membership.attribute_group_id {
                Some(group_id) if group_ids.contains(&group_id) => {
                    by_group.entry(group_id).or_default().push(entry)
                }
                _ => ungrouped.push(entry),
            }
        }

        let groups = sorted_groups(groups)
            .into_iter()
            .map(|group| GroupLayout {
                attributes: by_group.remove(&group.id).unwrap_or_default(),
                group,
            })
            .collect();

        Ok(AttributeSetLayout {
            attribute_set_id: set_id,
            groups,
            ungrouped,
        })
    }

    /// Ordered attributes of one group in the set.
    #[instrument(skip(self))]
    pub async fn group_attributes(
        &self,
        set_id: i32,
        group_id: i32,
    ) -> Result<Vec<SetAttribute>, ServiceError> {
        let layout = self.layout(set_id).await?;
        layout
            .groups
            .into_iter()
            .find(|g| g.group.id == group_id)
            .map(|g| g.attributes)
            .ok_or_else(|| {
                ServiceError::NotFound(format!(
                    "Attribute group {} not found in attribute set {}",
                    group_id, set_id
                ))
            })
    }

    async fn attributes_by_id(
        &self,
        memberships: &[attribute_set_attribute::Model],
    ) -> Result<HashMap<i32, attribute::Model>, ServiceError> {
        let ids: Vec<i32> = memberships.iter().map(|m| m.attribute_id).collect();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let attributes = attribute::Entity::find()
            .filter(attribute::Column::Id.is_in(ids))
            .all(&*self.db_pool)
            .await
            .map_err(db_failure("fetch attributes"))?;
        Ok(attributes.into_iter().map(|a| (a.id, a)).collect())
    }

    async fn ensure_unique_code(&self, code: &str, exclude: Option<i32>) -> Result<(), ServiceError> {
        let existing = AttributeSet::find()
            .filter(attribute_set::Column::Code.eq(code))
            .one(&*self.db_pool)
            .await
            .map_err(db_failure("fetch attribute set by code"))?;
        match existing {
            Some(set) if Some(set.id) != exclude => Err(ServiceError::Conflict(format!(
                "Attribute set with code '{}' already exists",
                code
            ))),
            _ => Ok(()),
        }
    }
}

async fn clear_default_flag<C: ConnectionTrait>(db: &C) -> Result<(), ServiceError> {
    AttributeSet::update_many()
        .col_expr(attribute_set::Column::IsDefault, Expr::value(false))
        .filter(attribute_set::Column::IsDefault.eq(true))
        .exec(db)
        .await
        .map_err(db_failure("clear default attribute set"))?;
    Ok(())
}

fn set_attribute(
    membership: &attribute_set_attribute::Model,
    attribute: &attribute::Model,
) -> SetAttribute {
    SetAttribute {
        membership_id: membership.id,
        attribute_id: attribute.id,
        code: attribute.code.clone(),
        label: attribute.label.clone(),
        data_type: attribute.data_type,
        input_type: attribute.input_type,
        is_required: attribute.is_required,
        attribute_group_id: membership.attribute_group_id,
        sort_order: membership.sort_order,
    }
}
