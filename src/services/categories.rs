use crate::{
    db::DbPool,
    entities::{
        category::{self, Entity as Category},
        category_translation, product_category,
    },
    errors::ServiceError,
    models::{build_category_tree, creates_cycle, CategoryNode},
    services::db_failure,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryInput {
    #[validate(length(min = 1, max = 64))]
    pub code: String,
    pub parent_id: Option<i32>,
    #[serde(default)]
    pub position: i32,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

/// `parentId: null` moves the category to the root; an absent field keeps the
/// current parent.
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCategoryInput {
    #[validate(length(min = 1, max = 64))]
    pub code: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<i32>)]
    pub parent_id: Option<Option<i32>>,
    pub position: Option<i32>,
    pub is_active: Option<bool>,
}

fn double_option<'de, D>(deserializer: D) -> Result<Option<Option<i32>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<i32>::deserialize(deserializer).map(Some)
}

/// Service for the category hierarchy
#[derive(Clone)]
pub struct CategoryService {
    db_pool: Arc<DbPool>,
}

impl CategoryService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    #[instrument(skip(self))]
    pub async fn create_category(
        &self,
        input: CreateCategoryInput,
    ) -> Result<category::Model, ServiceError> {
        input.validate()?;
        self.ensure_unique_code(&input.code, None).await?;
        if let Some(parent_id) = input.parent_id {
            self.ensure_parent(parent_id).await?;
        }

        let now = Utc::now();
        let category = category::ActiveModel {
            code: Set(input.code),
            parent_id: Set(input.parent_id),
            position: Set(input.position),
            is_active: Set(input.is_active),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&*self.db_pool)
        .await
        .map_err(db_failure("create category"))?;

        info!(category_id = category.id, parent_id = ?category.parent_id, "Category created");
        Ok(category)
    }

    #[instrument(skip(self))]
    pub async fn get_category(&self, id: i32) -> Result<category::Model, ServiceError> {
        Category::find_by_id(id)
            .one(&*self.db_pool)
            .await
            .map_err(db_failure("fetch category"))?
            .ok_or_else(|| ServiceError::not_found("Category", id))
    }

    #[instrument(skip(self))]
    pub async fn list_categories(
        &self,
        is_active: Option<bool>,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<category::Model>, u64), ServiceError> {
        let mut query = Category::find();
        if let Some(is_active) = is_active {
            query = query.filter(category::Column::IsActive.eq(is_active));
        }
        let paginator = query
            .order_by_asc(category::Column::Position)
            .order_by_asc(category::Column::Id)
            .paginate(&*self.db_pool, limit);
        let total = paginator
            .num_items()
            .await
            .map_err(db_failure("count categories"))?;
        let categories = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(db_failure("fetch categories"))?;
        Ok((categories, total))
    }

    /// Top-level categories in position order.
    #[instrument(skip(self))]
    pub async fn root_categories(&self) -> Result<Vec<category::Model>, ServiceError> {
        Category::find()
            .filter(category::Column::ParentId.is_null())
            .order_by_asc(category::Column::Position)
            .order_by_asc(category::Column::Id)
            .all(&*self.db_pool)
            .await
            .map_err(db_failure("fetch root categories"))
    }

    /// Direct children of a category in position order.
    #[instrument(skip(self))]
    pub async fn child_categories(&self, parent_id: i32) -> Result<Vec<category::Model>, ServiceError> {
        self.get_category(parent_id).await?;
        Category::find()
            .filter(category::Column::ParentId.eq(parent_id))
            .order_by_asc(category::Column::Position)
            .order_by_asc(category::Column::Id)
            .all(&*self.db_pool)
            .await
            .map_err(db_failure("fetch child categories"))
    }

    /// The whole hierarchy as nested nodes.
    #[instrument(skip(self))]
    pub async fn category_tree(&self) -> Result<Vec<CategoryNode>, ServiceError> {
        let categories = Category::find()
            .all(&*self.db_pool)
            .await
            .map_err(db_failure("fetch categories"))?;
        Ok(build_category_tree(categories))
    }

    #[instrument(skip(self))]
    pub async fn update_category(
        &self,
        id: i32,
        input: UpdateCategoryInput,
    ) -> Result<category::Model, ServiceError> {
        input.validate()?;
        let category = self.get_category(id).await?;

        if let Some(ref code) = input.code {
            self.ensure_unique_code(code, Some(id)).await?;
        }
        if let Some(Some(parent_id)) = input.parent_id {
            self.ensure_parent(parent_id).await?;
            if creates_cycle(&self.parent_links().await?, id, Some(parent_id)) {
                warn!(category_id = id, parent_id, "Rejected cyclic category move");
                return Err(ServiceError::ValidationError(format!(
                    "Category {} cannot be moved under its own descendant {}",
                    id, parent_id
                )));
            }
        }

        let mut active: category::ActiveModel = category.into();
        if let Some(code) = input.code {
            active.code = Set(code);
        }
        if let Some(parent_id) = input.parent_id {
            active.parent_id = Set(parent_id);
        }
        if let Some(position) = input.position {
            active.position = Set(position);
        }
        if let Some(is_active) = input.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(Utc::now());

        let category = active
            .update(&*self.db_pool)
            .await
            .map_err(db_failure("update category"))?;
        info!(category_id = id, "Category updated");
        Ok(category)
    }

    /// Deletes a leaf category with its translations and product links.
    #[instrument(skip(self))]
    pub async fn delete_category(&self, id: i32) -> Result<(), ServiceError> {
        self.get_category(id).await?;

        let children = Category::find()
            .filter(category::Column::ParentId.eq(id))
            .count(&*self.db_pool)
            .await
            .map_err(db_failure("count child categories"))?;
        if children > 0 {
            return Err(ServiceError::Conflict(format!(
                "Category {} has {} child categories; move or delete them first",
                id, children
            )));
        }

        let txn = self
            .db_pool
            .begin()
            .await
            .map_err(db_failure("begin transaction"))?;
        category_translation::Entity::delete_many()
            .filter(category_translation::Column::CategoryId.eq(id))
            .exec(&txn)
            .await
            .map_err(db_failure("delete category translations"))?;
        product_category::Entity::delete_many()
            .filter(product_category::Column::CategoryId.eq(id))
            .exec(&txn)
            .await
            .map_err(db_failure("delete product category links"))?;
        Category::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(db_failure("delete category"))?;
        txn.commit().await.map_err(db_failure("commit category deletion"))?;

        info!(category_id = id, "Category deleted");
        Ok(())
    }

    async fn parent_links(&self) -> Result<HashMap<i32, Option<i32>>, ServiceError> {
        let links: Vec<(i32, Option<i32>)> = Category::find()
            .select_only()
            .column(category::Column::Id)
            .column(category::Column::ParentId)
            .into_tuple()
            .all(&*self.db_pool)
            .await
            .map_err(db_failure("fetch category hierarchy"))?;
        Ok(links.into_iter().collect())
    }

    async fn ensure_parent(&self, parent_id: i32) -> Result<(), ServiceError> {
        let exists = Category::find_by_id(parent_id)
            .one(&*self.db_pool)
            .await
            .map_err(db_failure("fetch parent category"))?
            .is_some();
        if exists {
            Ok(())
        } else {
            Err(ServiceError::ValidationError(format!(
                "Parent category {} does not exist",
                parent_id
            )))
        }
    }

    async fn ensure_unique_code(&self, code: &str, exclude: Option<i32>) -> Result<(), ServiceError> {
        let existing = Category::find()
            .filter(category::Column::Code.eq(code))
            .one(&*self.db_pool)
            .await
            .map_err(db_failure("fetch category by code"))?;
        match existing {
            Some(category) if Some(category.id) != exclude => Err(ServiceError::Conflict(
                format!("Category with code '{}' already exists", code),
            )),
            _ => Ok(()),
        }
    }
}
