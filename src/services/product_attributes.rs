use crate::{
    db::DbPool,
    entities::{
        attribute::{self, DataType},
        product,
        product_attribute_value::{self, Entity as ProductAttributeValue},
        store_view,
    },
    errors::ServiceError,
    models::{AttributeValue, ValueColumns},
    services::{db_failure, transfer::AttributeEntry},
};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;
use validator::Validate;

/// Sets one typed value. The value is coerced to the attribute's data type.
#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetProductAttributeInput {
    pub product_id: i32,
    pub attribute_id: i32,
    /// Omit for the global value
    pub store_view_id: Option<i32>,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub value: Value,
}

/// A stored value with its attribute metadata.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductAttributeView {
    pub id: i32,
    pub product_id: i32,
    pub attribute_id: i32,
    pub attribute_code: String,
    pub data_type: DataType,
    pub store_view_id: Option<i32>,
    #[schema(value_type = Object)]
    pub value: Value,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct ProductAttributeFilter {
    pub product_id: Option<i32>,
    pub attribute_id: Option<i32>,
    pub store_view_id: Option<i32>,
}

/// Service for EAV values attached to products
#[derive(Clone)]
pub struct ProductAttributeService {
    db_pool: Arc<DbPool>,
}

impl ProductAttributeService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    #[instrument(skip(self))]
    pub async fn list_values(
        &self,
        filter: ProductAttributeFilter,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<ProductAttributeView>, u64), ServiceError> {
        let db = &*self.db_pool;
        let mut query = ProductAttributeValue::find();
        if let Some(product_id) = filter.product_id {
            query = query.filter(product_attribute_value::Column::ProductId.eq(product_id));
        }
        if let Some(attribute_id) = filter.attribute_id {
            query = query.filter(product_attribute_value::Column::AttributeId.eq(attribute_id));
        }
        if let Some(store_view_id) = filter.store_view_id {
            query = query.filter(product_attribute_value::Column::StoreViewId.eq(store_view_id));
        }

        let paginator = query
            .find_also_related(attribute::Entity)
            .order_by_asc(product_attribute_value::Column::ProductId)
            .order_by_asc(product_attribute_value::Column::AttributeId)
            .order_by_asc(product_attribute_value::Column::Id)
            .paginate(db, limit);
        let total = paginator
            .num_items()
            .await
            .map_err(db_failure("count product attribute values"))?;
        let rows = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(db_failure("fetch product attribute values"))?;

        let mut views = Vec::with_capacity(rows.len());
        for (row, attribute) in rows {
            let attribute = attribute.ok_or_else(|| {
                ServiceError::InternalError(format!(
                    "Attribute {} referenced by value {} is missing",
                    row.attribute_id, row.id
                ))
            })?;
            views.push(to_view(row, &attribute)?);
        }
        Ok((views, total))
    }

    #[instrument(skip(self))]
    pub async fn get_value(&self, id: i32) -> Result<ProductAttributeView, ServiceError> {
        let (row, attribute) = ProductAttributeValue::find_by_id(id)
            .find_also_related(attribute::Entity)
            .one(&*self.db_pool)
            .await
            .map_err(db_failure("fetch product attribute value"))?
            .ok_or_else(|| ServiceError::not_found("Product attribute value", id))?;
        let attribute =
            attribute.ok_or_else(|| ServiceError::not_found("Attribute", row.attribute_id))?;
        to_view(row, &attribute)
    }

    /// Creates or replaces the value for (product, attribute, store view).
    #[instrument(skip(self))]
    pub async fn set_value(
        &self,
        input: SetProductAttributeInput,
    ) -> Result<ProductAttributeView, ServiceError> {
        let db = &*self.db_pool;

        product::Entity::find_by_id(input.product_id)
            .one(db)
            .await
            .map_err(db_failure("fetch product"))?
            .ok_or_else(|| ServiceError::not_found("Product", input.product_id))?;
        let attribute = attribute::Entity::find_by_id(input.attribute_id)
            .one(db)
            .await
            .map_err(db_failure("fetch attribute"))?
            .ok_or_else(|| ServiceError::not_found("Attribute", input.attribute_id))?;
        if let Some(store_view_id) = input.store_view_id {
            store_view::Entity::find_by_id(store_view_id)
                .one(db)
                .await
                .map_err(db_failure("fetch store view"))?
                .ok_or_else(|| ServiceError::not_found("Store view", store_view_id))?;
        }

        let value = AttributeValue::from_json(attribute.data_type, &input.value)
            .map_err(|e| ServiceError::ValidationError(format!("{}: {}", attribute.code, e)))?;
        let row = write_value(db, input.product_id, &attribute, input.store_view_id, value).await?;
        to_view(row, &attribute)
    }

    #[instrument(skip(self))]
    pub async fn delete_value(&self, id: i32) -> Result<(), ServiceError> {
        let result = ProductAttributeValue::delete_by_id(id)
            .exec(&*self.db_pool)
            .await
            .map_err(db_failure("delete product attribute value"))?;
        if result.rows_affected == 0 {
            return Err(ServiceError::not_found("Product attribute value", id));
        }
        info!(value_id = id, "Product attribute value deleted");
        Ok(())
    }

    /// Removes the attribute from the product in every store view. Returns the
    /// number of rows removed.
    #[instrument(skip(self))]
    pub async fn delete_for_attribute(
        &self,
        product_id: i32,
        attribute_id: i32,
    ) -> Result<u64, ServiceError> {
        let result = ProductAttributeValue::delete_many()
            .filter(product_attribute_value::Column::ProductId.eq(product_id))
            .filter(product_attribute_value::Column::AttributeId.eq(attribute_id))
            .exec(&*self.db_pool)
            .await
            .map_err(db_failure("delete product attribute values"))?;
        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound(format!(
                "Product {} has no value for attribute {}",
                product_id, attribute_id
            )));
        }
        info!(product_id, attribute_id, removed = result.rows_affected, "Product attribute values deleted");
        Ok(result.rows_affected)
    }

    #[instrument(skip(self))]
    pub async fn delete_for_store_view(
        &self,
        product_id: i32,
        attribute_id: i32,
        store_view_id: i32,
    ) -> Result<(), ServiceError> {
        let result = ProductAttributeValue::delete_many()
            .filter(product_attribute_value::Column::ProductId.eq(product_id))
            .filter(product_attribute_value::Column::AttributeId.eq(attribute_id))
            .filter(product_attribute_value::Column::StoreViewId.eq(store_view_id))
            .exec(&*self.db_pool)
            .await
            .map_err(db_failure("delete product attribute value"))?;
        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound(format!(
                "Product {} has no value for attribute {} in store view {}",
                product_id, attribute_id, store_view_id
            )));
        }
        info!(product_id, attribute_id, store_view_id, "Product attribute value deleted");
        Ok(())
    }

    /// Typed values for a batch of products, keyed by product id.
    pub async fn entries_for_products(
        &self,
        product_ids: &[i32],
    ) -> Result<HashMap<i32, Vec<AttributeEntry>>, ServiceError> {
        let rows = ProductAttributeValue::find()
            .filter(product_attribute_value::Column::ProductId.is_in(product_ids.to_vec()))
            .find_also_related(attribute::Entity)
            .order_by_asc(product_attribute_value::Column::AttributeId)
            .order_by_asc(product_attribute_value::Column::Id)
            .all(&*self.db_pool)
            .await
            .map_err(db_failure("fetch product attribute values"))?;

        let mut entries: HashMap<i32, Vec<AttributeEntry>> = HashMap::new();
        for (row, attribute) in rows {
            let Some(attribute) = attribute else { continue };
            match AttributeValue::from_columns(attribute.data_type, &ValueColumns::from(&row)) {
                Ok(value) => entries.entry(row.product_id).or_default().push(AttributeEntry {
                    store_view_id: row.store_view_id,
                    attribute,
                    value,
                }),
                Err(e) => warn!(value_id = row.id, error = %e, "Skipping unreadable attribute value"),
            }
        }
        Ok(entries)
    }
}

/// Upserts a typed value row. Every value column is rewritten so only the one
/// matching the attribute's data type stays populated.
pub(crate) async fn write_value<C: ConnectionTrait>(
    db: &C,
    product_id: i32,
    attribute: &attribute::Model,
    store_view_id: Option<i32>,
    value: AttributeValue,
) -> Result<product_attribute_value::Model, ServiceError> {
    if attribute.is_global && store_view_id.is_some() {
        return Err(ServiceError::ValidationError(format!(
            "Attribute '{}' is global and cannot have store view values",
            attribute.code
        )));
    }
    if value.data_type() != attribute.data_type {
        return Err(ServiceError::ValidationError(format!(
            "{} value given for {} attribute '{}'",
            value.data_type(),
            attribute.data_type,
            attribute.code
        )));
    }

    let mut query = ProductAttributeValue::find()
        .filter(product_attribute_value::Column::ProductId.eq(product_id))
        .filter(product_attribute_value::Column::AttributeId.eq(attribute.id));
    query = match store_view_id {
        Some(id) => query.filter(product_attribute_value::Column::StoreViewId.eq(id)),
        None => query.filter(product_attribute_value::Column::StoreViewId.is_null()),
    };
    let existing = query
        .one(db)
        .await
        .map_err(db_failure("fetch product attribute value"))?;

    let columns = value.into_columns();
    let now = Utc::now();
    let is_new = existing.is_none();
    let mut active: product_attribute_value::ActiveModel = match existing {
        Some(row) => row.into(),
        None => product_attribute_value::ActiveModel {
            product_id: Set(product_id),
            attribute_id: Set(attribute.id),
            store_view_id: Set(store_view_id),
            created_at: Set(now),
            ..Default::default()
        },
    };
    active.value_string = Set(columns.value_string);
    active.value_text = Set(columns.value_text);
    active.value_int = Set(columns.value_int);
    active.value_decimal = Set(columns.value_decimal);
    active.value_boolean = Set(columns.value_boolean);
    active.updated_at = Set(now);

    let row = if is_new {
        active.insert(db).await
    } else {
        active.update(db).await
    }
    .map_err(db_failure("save product attribute value"))?;

    info!(product_id, attribute = %attribute.code, store_view_id = ?store_view_id, "Product attribute value saved");
    Ok(row)
}

fn to_view(
    row: product_attribute_value::Model,
    attribute: &attribute::Model,
) -> Result<ProductAttributeView, ServiceError> {
    let value = AttributeValue::from_columns(attribute.data_type, &ValueColumns::from(&row))
        .map_err(|e| {
            ServiceError::InternalError(format!("Stored value {} is unreadable: {}", row.id, e))
        })?;
    Ok(ProductAttributeView {
        id: row.id,
        product_id: row.product_id,
        attribute_id: row.attribute_id,
        attribute_code: attribute.code.clone(),
        data_type: attribute.data_type,
        store_view_id: row.store_view_id,
        value: value.to_json(),
        updated_at: row.updated_at,
    })
}
