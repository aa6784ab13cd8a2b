use crate::{
    db::DbPool,
    entities::{
        attribute, attribute_set,
        product::{self, Entity as Product, ProductStatus, ProductType},
        product_asset, product_attribute_value, product_category,
    },
    errors::ServiceError,
    models::{AttributeValue, ValueColumns},
    services::db_failure,
};
use chrono::Utc;
use sea_orm::{
    sea_query::Condition, ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, QueryTrait, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;
use validator::Validate;

/// Input for creating a product
#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductInput {
    #[validate(length(min = 1, max = 128, message = "SKU must be between 1 and 128 characters"))]
    pub sku: String,
    #[validate(length(min = 1, max = 255, message = "Product name must be between 1 and 255 characters"))]
    pub name: String,
    pub product_type: ProductType,
    #[serde(default)]
    pub status: Option<ProductStatus>,
    pub attribute_set_id: Option<i32>,
}

/// Input for updating a product; absent fields are left untouched
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductInput {
    #[validate(length(min = 1, max = 128))]
    pub sku: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    pub product_type: Option<ProductType>,
    pub status: Option<ProductStatus>,
    pub attribute_set_id: Option<i32>,
}

/// Product list filters
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    pub search: Option<String>,
    pub status: Option<ProductStatus>,
    pub product_type: Option<ProductType>,
    pub attribute_set_id: Option<i32>,
    pub category_id: Option<i32>,
    /// Restricts to products holding `attribute_value` for this attribute
    pub attribute_code: Option<String>,
    pub attribute_value: Option<String>,
}

/// Service for managing products
#[derive(Clone)]
pub struct ProductService {
    db_pool: Arc<DbPool>,
}

impl ProductService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    /// Create a new product
    #[instrument(skip(self))]
    pub async fn create_product(
        &self,
        input: CreateProductInput,
    ) -> Result<product::Model, ServiceError> {
        input.validate()?;
        self.ensure_unique_sku(&input.sku, None).await?;
        if let Some(set_id) = input.attribute_set_id {
            self.ensure_attribute_set(set_id).await?;
        }

        let now = Utc::now();
        let product = product::ActiveModel {
            sku: Set(input.sku.trim().to_string()),
            name: Set(input.name),
            product_type: Set(input.product_type),
            status: Set(input.status.unwrap_or_default()),
            attribute_set_id: Set(input.attribute_set_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let product = product
            .insert(&*self.db_pool)
            .await
            .map_err(db_failure("create product"))?;

        info!(product_id = product.id, sku = %product.sku, "Product created");
        Ok(product)
    }

    /// Get a product by ID
    #[instrument(skip(self))]
    pub async fn get_product(&self, id: i32) -> Result<product::Model, ServiceError> {
        Product::find_by_id(id)
            .one(&*self.db_pool)
            .await
            .map_err(db_failure("fetch product"))?
            .ok_or_else(|| ServiceError::not_found("Product", id))
    }

    /// Get a product by SKU
    #[instrument(skip(self))]
    pub async fn get_product_by_sku(&self, sku: &str) -> Result<product::Model, ServiceError> {
        self.find_by_sku(sku)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Product with SKU '{}' not found", sku)))
    }

    pub(crate) async fn find_by_sku(&self, sku: &str) -> Result<Option<product::Model>, ServiceError> {
        Product::find()
            .filter(product::Column::Sku.eq(sku.trim()))
            .one(&*self.db_pool)
            .await
            .map_err(db_failure("fetch product by SKU"))
    }

    /// List products with pagination
    #[instrument(skip(self))]
    pub async fn list_products(
        &self,
        filter: ProductFilter,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<product::Model>, u64), ServiceError> {
        let db = &*self.db_pool;
        let mut query = Product::find();

        if let Some(search) = filter.search.filter(|s| !s.trim().is_empty()) {
            let term = search.trim().to_string();
            query = query.filter(
                Condition::any()
                    .add(product::Column::Name.contains(&term))
                    .add(product::Column::Sku.contains(&term)),
            );
        }
        if let Some(status) = filter.status {
            query = query.filter(product::Column::Status.eq(status));
        }
        if let Some(product_type) = filter.product_type {
            query = query.filter(product::Column::ProductType.eq(product_type));
        }
        if let Some(set_id) = filter.attribute_set_id {
            query = query.filter(product::Column::AttributeSetId.eq(set_id));
        }
        if let Some(category_id) = filter.category_id {
            query = query.filter(
                product::Column::Id.in_subquery(
                    product_category::Entity::find()
                        .select_only()
                        .column(product_category::Column::ProductId)
                        .filter(product_category::Column::CategoryId.eq(category_id))
                        .into_query(),
                ),
            );
        }
        if let Some(code) = filter.attribute_code {
            let raw = filter.attribute_value.ok_or_else(|| {
                ServiceError::ValidationError(
                    "attributeValue is required when filtering by attributeCode".to_string(),
                )
            })?;
            let condition = self.attribute_value_condition(&code, &raw).await?;
            query = query.filter(
                product::Column::Id.in_subquery(
                    product_attribute_value::Entity::find()
                        .select_only()
                        .column(product_attribute_value::Column::ProductId)
                        .filter(condition)
                        .into_query(),
                ),
            );
        }

        let paginator = query
            .order_by_desc(product::Column::CreatedAt)
            .order_by_desc(product::Column::Id)
            .paginate(db, limit);

        let total = paginator
            .num_items()
            .await
            .map_err(db_failure("count products"))?;
        let products = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(db_failure("fetch products"))?;

        Ok((products, total))
    }

    /// Builds the value-row condition for "attribute `code` equals `raw`". The raw
    /// text is coerced to the attribute's data type so the match hits the one
    /// column that type is stored in.
    async fn attribute_value_condition(
        &self,
        code: &str,
        raw: &str,
    ) -> Result<Condition, ServiceError> {
        let attribute = attribute::Entity::find()
            .filter(attribute::Column::Code.eq(code))
            .one(&*self.db_pool)
            .await
            .map_err(db_failure("fetch attribute"))?
            .ok_or_else(|| {
                ServiceError::ValidationError(format!("Unknown attribute code '{}'", code))
            })?;

        let input = match attribute.data_type {
            attribute::DataType::Json => {
                serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
            }
            _ => Value::String(raw.to_string()),
        };
        let columns = AttributeValue::from_json(attribute.data_type, &input)
            .map_err(|e| ServiceError::ValidationError(format!("{}: {}", code, e)))?
            .into_columns();

        Ok(value_columns_condition(&columns)
            .add(product_attribute_value::Column::AttributeId.eq(attribute.id)))
    }

    /// Update a product
    #[instrument(skip(self))]
    pub async fn update_product(
        &self,
        id: i32,
        input: UpdateProductInput,
    ) -> Result<product::Model, ServiceError> {
        input.validate()?;
        let product = self.get_product(id).await?;

        if let Some(ref sku) = input.sku {
            self.ensure_unique_sku(sku, Some(id)).await?;
        }
        if let Some(set_id) = input.attribute_set_id {
            self.ensure_attribute_set(set_id).await?;
        }

        let mut active: product::ActiveModel = product.into();
        if let Some(sku) = input.sku {
            active.sku = Set(sku.trim().to_string());
        }
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(product_type) = input.product_type {
            active.product_type = Set(product_type);
        }
        if let Some(status) = input.status {
            active.status = Set(status);
        }
        if let Some(set_id) = input.attribute_set_id {
            active.attribute_set_id = Set(Some(set_id));
        }
        active.updated_at = Set(Utc::now());

        let product = active
            .update(&*self.db_pool)
            .await
            .map_err(db_failure("update product"))?;
        info!(product_id = id, "Product updated");
        Ok(product)
    }

    /// Moves a product to another workflow stage
    #[instrument(skip(self))]
    pub async fn update_status(
        &self,
        id: i32,
        status: ProductStatus,
    ) -> Result<product::Model, ServiceError> {
        let product = self.get_product(id).await?;
        let previous = product.status;

        let mut active: product::ActiveModel = product.into();
        active.status = Set(status);
        active.updated_at = Set(Utc::now());
        let product = active
            .update(&*self.db_pool)
            .await
            .map_err(db_failure("update product status"))?;

        info!(product_id = id, from = %previous, to = %status, "Product status changed");
        Ok(product)
    }

    /// Delete a product with its values and links
    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: i32) -> Result<(), ServiceError> {
        self.get_product(id).await?;

        let txn = self
            .db_pool
            .begin()
            .await
            .map_err(db_failure("begin transaction"))?;

        product_attribute_value::Entity::delete_many()
            .filter(product_attribute_value::Column::ProductId.eq(id))
            .exec(&txn)
            .await
            .map_err(db_failure("delete product attribute values"))?;
        product_category::Entity::delete_many()
            .filter(product_category::Column::ProductId.eq(id))
            .exec(&txn)
            .await
            .map_err(db_failure("delete product categories"))?;
        product_asset::Entity::delete_many()
            .filter(product_asset::Column::ProductId.eq(id))
            .exec(&txn)
            .await
            .map_err(db_failure("delete product assets"))?;
        Product::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(db_failure("delete product"))?;

        txn.commit().await.map_err(db_failure("commit product deletion"))?;
        info!(product_id = id, "Product deleted");
        Ok(())
    }

    async fn ensure_unique_sku(&self, sku: &str, exclude: Option<i32>) -> Result<(), ServiceError> {
        if let Some(existing) = self.find_by_sku(sku).await? {
            if Some(existing.id) != exclude {
                warn!(sku = %sku, "Duplicate SKU rejected");
                return Err(ServiceError::Conflict(format!(
                    "Product with SKU '{}' already exists",
                    sku.trim()
                )));
            }
        }
        Ok(())
    }

    async fn ensure_attribute_set(&self, set_id: i32) -> Result<(), ServiceError> {
        let exists = attribute_set::Entity::find_by_id(set_id)
            .one(&*self.db_pool)
            .await
            .map_err(db_failure("fetch attribute set"))?
            .is_some();
        if exists {
            Ok(())
        } else {
            Err(ServiceError::ValidationError(format!(
                "Attribute set {} does not exist",
                set_id
            )))
        }
    }
}

/// Equality condition on the populated value column.
fn value_columns_condition(columns: &ValueColumns) -> Condition {
    use product_attribute_value::Column;

    let mut condition = Condition::all();
    if let Some(v) = &columns.value_string {
        condition = condition.add(Column::ValueString.eq(v.clone()));
    }
    if let Some(v) = &columns.value_text {
        condition = condition.add(Column::ValueText.eq(v.clone()));
    }
    if let Some(v) = columns.value_int {
        condition = condition.add(Column::ValueInt.eq(v));
    }
    if let Some(v) = columns.value_decimal {
        condition = condition.add(Column::ValueDecimal.eq(v));
    }
    if let Some(v) = columns.value_boolean {
        condition = condition.add(Column::ValueBoolean.eq(v));
    }
    condition
}
