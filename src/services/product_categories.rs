use crate::{
    db::DbPool,
    entities::{
        category, product,
        product_category::{self, Entity as ProductCategory},
    },
    errors::ServiceError,
    services::db_failure,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LinkProductCategoryInput {
    pub product_id: i32,
    pub category_id: i32,
    #[serde(default)]
    pub position: i32,
}

/// Links between products and categories
#[derive(Clone)]
pub struct ProductCategoryService {
    db_pool: Arc<DbPool>,
}

impl ProductCategoryService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    #[instrument(skip(self))]
    pub async fn list_links(
        &self,
        product_id: Option<i32>,
        category_id: Option<i32>,
    ) -> Result<Vec<product_category::Model>, ServiceError> {
        let mut query = ProductCategory::find();
        if let Some(product_id) = product_id {
            query = query.filter(product_category::Column::ProductId.eq(product_id));
        }
        if let Some(category_id) = category_id {
            query = query.filter(product_category::Column::CategoryId.eq(category_id));
        }
        query
            .order_by_asc(product_category::Column::CategoryId)
            .order_by_asc(product_category::Column::Position)
            .order_by_asc(product_category::Column::ProductId)
            .all(&*self.db_pool)
            .await
            .map_err(db_failure("fetch product categories"))
    }

    /// Links a product to a category; relinking updates the position.
    #[instrument(skip(self))]
    pub async fn link(
        &self,
        input: LinkProductCategoryInput,
    ) -> Result<product_category::Model, ServiceError> {
        let db = &*self.db_pool;
        product::Entity::find_by_id(input.product_id)
            .one(db)
            .await
            .map_err(db_failure("fetch product"))?
            .ok_or_else(|| ServiceError::not_found("Product", input.product_id))?;
        category::Entity::find_by_id(input.category_id)
            .one(db)
            .await
            .map_err(db_failure("fetch category"))?
            .ok_or_else(|| ServiceError::not_found("Category", input.category_id))?;

        link_product(db, input.product_id, input.category_id, input.position).await
    }

    #[instrument(skip(self))]
    pub async fn unlink(&self, product_id: i32, category_id: i32) -> Result<(), ServiceError> {
        let result = ProductCategory::delete_by_id((product_id, category_id))
            .exec(&*self.db_pool)
            .await
            .map_err(db_failure("delete product category"))?;
        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound(format!(
                "Product {} is not in category {}",
                product_id, category_id
            )));
        }
        info!(product_id, category_id, "Product removed from category");
        Ok(())
    }

    /// Category links with their categories for a batch of products.
    pub async fn links_for_products(
        &self,
        product_ids: &[i32],
    ) -> Result<HashMap<i32, Vec<(product_category::Model, category::Model)>>, ServiceError> {
        let rows = ProductCategory::find()
            .filter(product_category::Column::ProductId.is_in(product_ids.to_vec()))
            .find_also_related(category::Entity)
            .order_by_asc(product_category::Column::Position)
            .order_by_asc(product_category::Column::CategoryId)
            .all(&*self.db_pool)
            .await
            .map_err(db_failure("fetch product categories"))?;

        let mut links: HashMap<i32, Vec<_>> = HashMap::new();
        for (link, category) in rows {
            if let Some(category) = category {
                links.entry(link.product_id).or_default().push((link, category));
            }
        }
        Ok(links)
    }
}

/// Inserts or repositions a product/category link.
pub(crate) async fn link_product<C: ConnectionTrait>(
    db: &C,
    product_id: i32,
    category_id: i32,
    position: i32,
) -> Result<product_category::Model, ServiceError> {
    let existing = ProductCategory::find_by_id((product_id, category_id))
        .one(db)
        .await
        .map_err(db_failure("fetch product category"))?;

    let link = match existing {
        Some(link) => {
            let mut active: product_category::ActiveModel = link.into();
            active.position = Set(position);
            active
                .update(db)
                .await
                .map_err(db_failure("update product category"))?
        }
        None => product_category::ActiveModel {
            product_id: Set(product_id),
            category_id: Set(category_id),
            position: Set(position),
        }
        .insert(db)
        .await
        .map_err(db_failure("create product category"))?,
    };

    info!(product_id, category_id, position, "Product linked to category");
    Ok(link)
}
