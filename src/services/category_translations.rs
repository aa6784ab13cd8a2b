use crate::{
    db::DbPool,
    entities::{
        category,
        category_translation::{self, Entity as CategoryTranslation},
        store_view,
    },
    errors::ServiceError,
    services::{db_failure, slugify},
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
pub struct CreateCategoryTranslationInput {
    pub category_id: i32,
    pub store_view_id: i32,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    /// Derived from `name` when omitted
    #[validate(length(min = 1, max = 255))]
    pub slug: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCategoryTranslationInput {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub slug: Option<String>,
    pub description: Option<String>,
}

#[derive(Clone)]
pub struct CategoryTranslationService {
    db_pool: Arc<DbPool>,
}

impl CategoryTranslationService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    #[instrument(skip(self))]
    pub async fn create_translation(
        &self,
        input: CreateCategoryTranslationInput,
    ) -> Result<category_translation::Model, ServiceError> {
        input.validate()?;
        let db = &*self.db_pool;

        category::Entity::find_by_id(input.category_id)
            .one(db)
            .await
            .map_err(db_failure("fetch category"))?
            .ok_or_else(|| ServiceError::not_found("Category", input.category_id))?;
        store_view::Entity::find_by_id(input.store_view_id)
            .one(db)
            .await
            .map_err(db_failure("fetch store view"))?
            .ok_or_else(|| ServiceError::not_found("Store view", input.store_view_id))?;

        let existing = CategoryTranslation::find()
            .filter(category_translation::Column::CategoryId.eq(input.category_id))
            .filter(category_translation::Column::StoreViewId.eq(input.store_view_id))
            .one(db)
            .await
            .map_err(db_failure("fetch category translation"))?;
        if existing.is_some() {
            return Err(ServiceError::Conflict(format!(
                "Category {} already has a translation for store view {}",
                input.category_id, input.store_view_id
            )));
        }

        let slug = resolve_slug(input.slug.as_deref(), &input.name)?;
        let now = Utc::now();
        let translation = category_translation::ActiveModel {
            category_id: Set(input.category_id),
            store_view_id: Set(input.store_view_id),
            name: Set(input.name),
            slug: Set(slug),
            description: Set(input.description),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await
        .map_err(db_failure("create category translation"))?;

        info!(
            translation_id = translation.id,
            category_id = translation.category_id,
            store_view_id = translation.store_view_id,
            "Category translation created"
        );
        Ok(translation)
    }

    #[instrument(skip(self))]
    pub async fn get_translation(
        &self,
        id: i32,
    ) -> Result<category_translation::Model, ServiceError> {
        CategoryTranslation::find_by_id(id)
            .one(&*self.db_pool)
            .await
            .map_err(db_failure("fetch category translation"))?
            .ok_or_else(|| ServiceError::not_found("Category translation", id))
    }

    #[instrument(skip(self))]
    pub async fn list_translations(
        &self,
        category_id: Option<i32>,
        store_view_id: Option<i32>,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<category_translation::Model>, u64), ServiceError> {
        let mut query = CategoryTranslation::find();
        if let Some(category_id) = category_id {
            query = query.filter(category_translation::Column::CategoryId.eq(category_id));
        }
        if let Some(store_view_id) = store_view_id {
            query = query.filter(category_translation::Column::StoreViewId.eq(store_view_id));
        }
        let paginator = query
            .order_by_asc(category_translation::Column::CategoryId)
            .order_by_asc(category_translation::Column::StoreViewId)
            .paginate(&*self.db_pool, limit);
        let total = paginator
            .num_items()
            .await
            .map_err(db_failure("count category translations"))?;
        let translations = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(db_failure("fetch category translations"))?;
        Ok((translations, total))
    }

    #[instrument(skip(self))]
    pub async fn update_translation(
        &self,
        id: i32,
        input: UpdateCategoryTranslationInput,
    ) -> Result<category_translation::Model, ServiceError> {
        input.validate()?;
        let translation = self.get_translation(id).await?;

        let mut active: category_translation::ActiveModel = translation.into();
        if let Some(slug) = input.slug.as_deref() {
            active.slug = Set(resolve_slug(Some(slug), "")?);
        }
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(description) = input.description {
            active.description = Set(Some(description));
        }
        active.updated_at = Set(Utc::now());

        let translation = active
            .update(&*self.db_pool)
            .await
            .map_err(db_failure("update category translation"))?;
        info!(translation_id = id, "Category translation updated");
        Ok(translation)
    }

    #[instrument(skip(self))]
    pub async fn delete_translation(&self, id: i32) -> Result<(), ServiceError> {
        let result = CategoryTranslation::delete_by_id(id)
            .exec(&*self.db_pool)
            .await
            .map_err(db_failure("delete category translation"))?;
        if result.rows_affected == 0 {
            return Err(ServiceError::not_found("Category translation", id));
        }
        info!(translation_id = id, "Category translation deleted");
        Ok(())
    }
}

/// Normalizes an explicit slug, or derives one from the name.
fn resolve_slug(slug: Option<&str>, name: &str) -> Result<String, ServiceError> {
    let slug = slugify(slug.unwrap_or(name));
    if slug.is_empty() {
        return Err(ServiceError::ValidationError(
            "Slug must contain at least one letter or digit".to_string(),
        ));
    }
    Ok(slug)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_falls_back_to_name() {
        assert_eq!(resolve_slug(None, "Men's Shoes").unwrap(), "men-s-shoes");
        assert_eq!(resolve_slug(Some("Sale 2024"), "ignored").unwrap(), "sale-2024");
        assert!(resolve_slug(None, "!!!").is_err());
    }
}
