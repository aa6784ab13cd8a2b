use crate::{
    db::DbPool,
    entities::{
        asset, attribute, category,
        product::{self, ProductStatus, ProductType},
        store,
    },
    errors::ServiceError,
    services::db_failure,
};
use chrono::{DateTime, Utc};
use sea_orm::{ColumnTrait, EntityTrait, Iterable, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;

/// Number of recently updated products on the dashboard
pub const RECENT_PRODUCTS: u64 = 5;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CatalogTotals {
    pub products: u64,
    pub attributes: u64,
    pub categories: u64,
    pub assets: u64,
    pub stores: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusCount {
    pub status: ProductStatus,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TypeCount {
    pub product_type: ProductType,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetrics {
    pub totals: CatalogTotals,
    /// One entry per workflow stage, in workflow order
    pub products_by_status: Vec<StatusCount>,
    pub products_by_type: Vec<TypeCount>,
    pub recent_products: Vec<product::Model>,
    pub generated_at: DateTime<Utc>,
}

/// Catalog analytics for the admin dashboard
#[derive(Clone)]
pub struct AnalyticsService {
    db_pool: Arc<DbPool>,
}

impl AnalyticsService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    #[instrument(skip(self))]
    pub async fn get_dashboard_metrics(&self) -> Result<DashboardMetrics, ServiceError> {
        info!("Generating dashboard metrics");

        let totals = self.catalog_totals().await?;
        let products_by_status = self.products_by_status().await?;
        let products_by_type = self.products_by_type().await?;
        let recent_products = product::Entity::find()
            .order_by_desc(product::Column::UpdatedAt)
            .order_by_desc(product::Column::Id)
            .limit(RECENT_PRODUCTS)
            .all(&*self.db_pool)
            .await
            .map_err(db_failure("fetch recent products"))?;

        Ok(DashboardMetrics {
            totals,
            products_by_status,
            products_by_type,
            recent_products,
            generated_at: Utc::now(),
        })
    }

    pub async fn catalog_totals(&self) -> Result<CatalogTotals, ServiceError> {
        let db = &*self.db_pool;
        Ok(CatalogTotals {
            products: product::Entity::find()
                .count(db)
                .await
                .map_err(db_failure("count products"))?,
            attributes: attribute::Entity::find()
                .count(db)
                .await
                .map_err(db_failure("count attributes"))?,
            categories: category::Entity::find()
                .count(db)
                .await
                .map_err(db_failure("count categories"))?,
            assets: asset::Entity::find()
                .count(db)
                .await
                .map_err(db_failure("count assets"))?,
            stores: store::Entity::find()
                .count(db)
                .await
                .map_err(db_failure("count stores"))?,
        })
    }

    pub async fn products_by_status(&self) -> Result<Vec<StatusCount>, ServiceError> {
        let mut counts = Vec::new();
        for status in ProductStatus::iter() {
            let count = product::Entity::find()
                .filter(product::Column::Status.eq(status))
                .count(&*self.db_pool)
                .await
                .map_err(db_failure("count products by status"))?;
            counts.push(StatusCount { status, count });
        }
        Ok(counts)
    }

    pub async fn products_by_type(&self) -> Result<Vec<TypeCount>, ServiceError> {
        let mut counts = Vec::new();
        for product_type in ProductType::iter() {
            let count = product::Entity::find()
                .filter(product::Column::ProductType.eq(product_type))
                .count(&*self.db_pool)
                .await
                .map_err(db_failure("count products by type"))?;
            counts.push(TypeCount {
                product_type,
                count,
            });
        }
        Ok(counts)
    }
}
