pub mod common;

// Product data model
pub mod attribute_groups;
pub mod attribute_sets;
pub mod attributes;
pub mod product_attributes;
pub mod products;

// Catalog structure
pub mod assets;
pub mod categories;
pub mod category_translations;
pub mod product_assets;
pub mod product_categories;

// Store scopes
pub mod locales;
pub mod store_views;
pub mod stores;

// Collaboration
pub mod invitations;
pub mod teams;
pub mod workspaces;

// Operational
pub mod analytics;
pub mod csrf;
pub mod health;

use crate::{
    config::AppConfig,
    db::DbPool,
    services::{
        analytics::AnalyticsService, assets::AssetService,
        attribute_groups::AttributeGroupService, attribute_sets::AttributeSetService,
        attributes::AttributeService, categories::CategoryService,
        category_translations::CategoryTranslationService,
        product_attributes::ProductAttributeService, product_categories::ProductCategoryService,
        product_transfer::ProductTransferService, products::ProductService, stores::StoreService,
        teams::TeamService, workspaces::WorkspaceService,
    },
};
use std::sync::Arc;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub products: Arc<ProductService>,
    pub attributes: Arc<AttributeService>,
    pub attribute_sets: Arc<AttributeSetService>,
    pub attribute_groups: Arc<AttributeGroupService>,
    pub product_attributes: Arc<ProductAttributeService>,
    pub categories: Arc<CategoryService>,
    pub category_translations: Arc<CategoryTranslationService>,
    pub product_categories: Arc<ProductCategoryService>,
    pub assets: Arc<AssetService>,
    pub stores: Arc<StoreService>,
    pub workspaces: Arc<WorkspaceService>,
    pub teams: Arc<TeamService>,
    pub analytics: Arc<AnalyticsService>,
    pub transfer: Arc<ProductTransferService>,
}

impl AppServices {
    pub fn new(db_pool: Arc<DbPool>, config: &AppConfig) -> Self {
        Self {
            products: Arc::new(ProductService::new(db_pool.clone())),
            attributes: Arc::new(AttributeService::new(db_pool.clone())),
            attribute_sets: Arc::new(AttributeSetService::new(db_pool.clone())),
            attribute_groups: Arc::new(AttributeGroupService::new(db_pool.clone())),
            product_attributes: Arc::new(ProductAttributeService::new(db_pool.clone())),
            categories: Arc::new(CategoryService::new(db_pool.clone())),
            category_translations: Arc::new(CategoryTranslationService::new(db_pool.clone())),
            product_categories: Arc::new(ProductCategoryService::new(db_pool.clone())),
            assets: Arc::new(AssetService::new(db_pool.clone())),
            stores: Arc::new(StoreService::new(db_pool.clone())),
            workspaces: Arc::new(WorkspaceService::new(
                db_pool.clone(),
                config.invitation_ttl_hours,
            )),
            teams: Arc::new(TeamService::new(db_pool.clone())),
            analytics: Arc::new(AnalyticsService::new(db_pool.clone())),
            transfer: Arc::new(ProductTransferService::new(db_pool)),
        }
    }
}
