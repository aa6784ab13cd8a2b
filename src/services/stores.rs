use crate::{
    db::DbPool,
    entities::{
        category_translation, locale, product_attribute_value,
        store::{self, Entity as Store},
        store_view,
    },
    errors::ServiceError,
    services::db_failure,
};
use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

static LOCALE_CODE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z]{2}_[A-Z]{2}$").unwrap());

fn validate_locale_code(code: &str) -> Result<(), ValidationError> {
    if LOCALE_CODE_RE.is_match(code) {
        Ok(())
    } else {
        let mut err = ValidationError::new("locale_code");
        err.message = Some("Locale code must look like en_US".into());
        Err(err)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateStoreInput {
    #[validate(length(min = 1, max = 64))]
    pub code: String,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStoreInput {
    #[validate(length(min = 1, max = 64))]
    pub code: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateStoreViewInput {
    #[validate(length(min = 1, max = 64))]
    pub code: String,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub store_id: i32,
    pub locale_id: i32,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStoreViewInput {
    #[validate(length(min = 1, max = 64))]
    pub code: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    pub locale_id: Option<i32>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateLocaleInput {
    #[validate(custom = "validate_locale_code")]
    pub code: String,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLocaleInput {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
}

fn default_active() -> bool {
    true
}

/// Service for stores, their views and the locales views render in
#[derive(Clone)]
pub struct StoreService {
    db_pool: Arc<DbPool>,
}

impl StoreService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    // Stores

    #[instrument(skip(self))]
    pub async fn create_store(&self, input: CreateStoreInput) -> Result<store::Model, ServiceError> {
        input.validate()?;
        self.ensure_unique_store_code(&input.code, None).await?;

        let now = Utc::now();
        let store = store::ActiveModel {
            code: Set(input.code),
            name: Set(input.name),
            is_active: Set(input.is_active),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&*self.db_pool)
        .await
        .map_err(db_failure("create store"))?;

        info!(store_id = store.id, code = %store.code, "Store created");
        Ok(store)
    }

    #[instrument(skip(self))]
    pub async fn get_store(&self, id: i32) -> Result<store::Model, ServiceError> {
        Store::find_by_id(id)
            .one(&*self.db_pool)
            .await
            .map_err(db_failure("fetch store"))?
            .ok_or_else(|| ServiceError::not_found("Store", id))
    }

    #[instrument(skip(self))]
    pub async fn get_store_by_code(&self, code: &str) -> Result<store::Model, ServiceError> {
        Store::find()
            .filter(store::Column::Code.eq(code))
            .one(&*self.db_pool)
            .await
            .map_err(db_failure("fetch store by code"))?
            .ok_or_else(|| ServiceError::NotFound(format!("Store with code '{}' not found", code)))
    }

    #[instrument(skip(self))]
    pub async fn list_stores(
        &self,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<store::Model>, u64), ServiceError> {
        let paginator = Store::find()
            .order_by_asc(store::Column::Code)
            .paginate(&*self.db_pool, limit);
        let total = paginator
            .num_items()
            .await
            .map_err(db_failure("count stores"))?;
        let stores = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(db_failure("fetch stores"))?;
        Ok((stores, total))
    }

    #[instrument(skip(self))]
    pub async fn update_store(
        &self,
        id: i32,
        input: UpdateStoreInput,
    ) -> Result<store::Model, ServiceError> {
        input.validate()?;
        let store = self.get_store(id).await?;
        if let Some(ref code) = input.code {
            self.ensure_unique_store_code(code, Some(id)).await?;
        }

        let mut active: store::ActiveModel = store.into();
        if let Some(code) = input.code {
            active.code = Set(code);
        }
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(is_active) = input.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(Utc::now());

        let store = active
            .update(&*self.db_pool)
            .await
            .map_err(db_failure("update store"))?;
        info!(store_id = id, "Store updated");
        Ok(store)
    }

    /// Deletes a store and its views, with every value and translation scoped
    /// to those views.
    #[instrument(skip(self))]
    pub async fn delete_store(&self, id: i32) -> Result<(), ServiceError> {
        self.get_store(id).await?;
        let view_ids: Vec<i32> = store_view::Entity::find()
            .filter(store_view::Column::StoreId.eq(id))
            .all(&*self.db_pool)
            .await
            .map_err(db_failure("fetch store views"))?
            .into_iter()
            .map(|v| v.id)
            .collect();

        let txn = self
            .db_pool
            .begin()
            .await
            .map_err(db_failure("begin transaction"))?;
        if !view_ids.is_empty() {
            product_attribute_value::Entity::delete_many()
                .filter(product_attribute_value::Column::StoreViewId.is_in(view_ids.clone()))
                .exec(&txn)
                .await
                .map_err(db_failure("delete store view values"))?;
            category_translation::Entity::delete_many()
                .filter(category_translation::Column::StoreViewId.is_in(view_ids.clone()))
                .exec(&txn)
                .await
                .map_err(db_failure("delete store view translations"))?;
            store_view::Entity::delete_many()
                .filter(store_view::Column::StoreId.eq(id))
                .exec(&txn)
                .await
                .map_err(db_failure("delete store views"))?;
        }
        Store::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(db_failure("delete store"))?;
        txn.commit().await.map_err(db_failure("commit store deletion"))?;

        info!(store_id = id, views_removed = view_ids.len(), "Store deleted");
        Ok(())
    }

    // Store views

    #[instrument(skip(self))]
    pub async fn create_store_view(
        &self,
        input: CreateStoreViewInput,
    ) -> Result<store_view::Model, ServiceError> {
        input.validate()?;
        self.get_store(input.store_id).await?;
        self.get_locale(input.locale_id).await?;
        self.ensure_unique_view_code(&input.code, None).await?;

        let now = Utc::now();
        let view = store_view::ActiveModel {
            code: Set(input.code),
            name: Set(input.name),
            store_id: Set(input.store_id),
            locale_id: Set(input.locale_id),
            is_active: Set(input.is_active),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&*self.db_pool)
        .await
        .map_err(db_failure("create store view"))?;

        info!(store_view_id = view.id, store_id = view.store_id, "Store view created");
        Ok(view)
    }

    #[instrument(skip(self))]
    pub async fn get_store_view(&self, id: i32) -> Result<store_view::Model, ServiceError> {
        store_view::Entity::find_by_id(id)
            .one(&*self.db_pool)
            .await
            .map_err(db_failure("fetch store view"))?
            .ok_or_else(|| ServiceError::not_found("Store view", id))
    }

    #[instrument(skip(self))]
    pub async fn list_store_views(
        &self,
        store_id: Option<i32>,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<store_view::Model>, u64), ServiceError> {
        let mut query = store_view::Entity::find();
        if let Some(store_id) = store_id {
            query = query.filter(store_view::Column::StoreId.eq(store_id));
        }
        let paginator = query
            .order_by_asc(store_view::Column::StoreId)
            .order_by_asc(store_view::Column::Code)
            .paginate(&*self.db_pool, limit);
        let total = paginator
            .num_items()
            .await
            .map_err(db_failure("count store views"))?;
        let views = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(db_failure("fetch store views"))?;
        Ok((views, total))
    }

    #[instrument(skip(self))]
    pub async fn update_store_view(
        &self,
        id: i32,
        input: UpdateStoreViewInput,
    ) -> Result<store_view::Model, ServiceError> {
        input.validate()?;
        let view = self.get_store_view(id).await?;
        if let Some(ref code) = input.code {
            self.ensure_unique_view_code(code, Some(id)).await?;
        }
        if let Some(locale_id) = input.locale_id {
            self.get_locale(locale_id).await?;
        }

        let mut active: store_view::ActiveModel = view.into();
        if let Some(code) = input.code {
            active.code = Set(code);
        }
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(locale_id) = input.locale_id {
            active.locale_id = Set(locale_id);
        }
        if let Some(is_active) = input.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(Utc::now());

        let view = active
            .update(&*self.db_pool)
            .await
            .map_err(db_failure("update store view"))?;
        info!(store_view_id = id, "Store view updated");
        Ok(view)
    }

    #[instrument(skip(self))]
    pub async fn delete_store_view(&self, id: i32) -> Result<(), ServiceError> {
        self.get_store_view(id).await?;
        let txn = self
            .db_pool
            .begin()
            .await
            .map_err(db_failure("begin transaction"))?;
        product_attribute_value::Entity::delete_many()
            .filter(product_attribute_value::Column::StoreViewId.eq(id))
            .exec(&txn)
            .await
            .map_err(db_failure("delete store view values"))?;
        category_translation::Entity::delete_many()
            .filter(category_translation::Column::StoreViewId.eq(id))
            .exec(&txn)
            .await
            .map_err(db_failure("delete store view translations"))?;
        store_view::Entity::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(db_failure("delete store view"))?;
        txn.commit().await.map_err(db_failure("commit store view deletion"))?;
        info!(store_view_id = id, "Store view deleted");
        Ok(())
    }

    // Locales

    #[instrument(skip(self))]
    pub async fn create_locale(&self, input: CreateLocaleInput) -> Result<locale::Model, ServiceError> {
        input.validate()?;
        let existing = locale::Entity::find()
            .filter(locale::Column::Code.eq(input.code.as_str()))
            .one(&*self.db_pool)
            .await
            .map_err(db_failure("fetch locale by code"))?;
        if existing.is_some() {
            return Err(ServiceError::Conflict(format!(
                "Locale '{}' already exists",
                input.code
            )));
        }

        let now = Utc::now();
        let locale = locale::ActiveModel {
            code: Set(input.code),
            name: Set(input.name),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&*self.db_pool)
        .await
        .map_err(db_failure("create locale"))?;

        info!(locale_id = locale.id, code = %locale.code, "Locale created");
        Ok(locale)
    }

    #[instrument(skip(self))]
    pub async fn get_locale(&self, id: i32) -> Result<locale::Model, ServiceError> {
        locale::Entity::find_by_id(id)
            .one(&*self.db_pool)
            .await
            .map_err(db_failure("fetch locale"))?
            .ok_or_else(|| ServiceError::not_found("Locale", id))
    }

    #[instrument(skip(self))]
    pub async fn list_locales(&self) -> Result<Vec<locale::Model>, ServiceError> {
        locale::Entity::find()
            .order_by_asc(locale::Column::Code)
            .all(&*self.db_pool)
            .await
            .map_err(db_failure("fetch locales"))
    }

    /// Only the display name is editable; the code is referenced by clients.
    #[instrument(skip(self))]
    pub async fn update_locale(
        &self,
        id: i32,
        input: UpdateLocaleInput,
    ) -> Result<locale::Model, ServiceError> {
        input.validate()?;
        let locale = self.get_locale(id).await?;
        let mut active: locale::ActiveModel = locale.into();
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        active.updated_at = Set(Utc::now());
        let locale = active
            .update(&*self.db_pool)
            .await
            .map_err(db_failure("update locale"))?;
        info!(locale_id = id, "Locale updated");
        Ok(locale)
    }

    #[instrument(skip(self))]
    pub async fn delete_locale(&self, id: i32) -> Result<(), ServiceError> {
        self.get_locale(id).await?;
        let views = store_view::Entity::find()
            .filter(store_view::Column::LocaleId.eq(id))
            .count(&*self.db_pool)
            .await
            .map_err(db_failure("count store views"))?;
        if views > 0 {
            return Err(ServiceError::Conflict(format!(
                "Locale {} is used by {} store views",
                id, views
            )));
        }
        locale::Entity::delete_by_id(id)
            .exec(&*self.db_pool)
            .await
            .map_err(db_failure("delete locale"))?;
        info!(locale_id = id, "Locale deleted");
        Ok(())
    }

    async fn ensure_unique_store_code(
        &self,
        code: &str,
        exclude: Option<i32>,
    ) -> Result<(), ServiceError> {
        let existing = Store::find()
            .filter(store::Column::Code.eq(code))
            .one(&*self.db_pool)
            .await
            .map_err(db_failure("fetch store by code"))?;
        match existing {
            Some(store) if Some(store.id) != exclude => Err(ServiceError::Conflict(format!(
                "Store with code '{}' already exists",
                code
            ))),
            _ => Ok(()),
        }
    }

    async fn ensure_unique_view_code(
        &self,
        code: &str,
        exclude: Option<i32>,
    ) -> Result<(), ServiceError> {
        let existing = store_view::Entity::find()
            .filter(store_view::Column::Code.eq(code))
            .one(&*self.db_pool)
            .await
            .map_err(db_failure("fetch store view by code"))?;
        match existing {
            Some(view) if Some(view.id) != exclude => Err(ServiceError::Conflict(format!(
                "Store view with code '{}' already exists",
                code
            ))),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("en_US", true)]
    #[case("fr_FR", true)]
    #[case("en-US", false)]
    #[case("EN_us", false)]
    #[case("eng_US", false)]
    fn locale_codes(#[case] code: &str, #[case] valid: bool) {
        assert_eq!(validate_locale_code(code).is_ok(), valid);
    }
}
