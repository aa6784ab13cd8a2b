use crate::{
    db::DbPool,
    entities::{
        asset::{self, Entity as Asset},
        product,
        product_asset::{self, AssetRole, Entity as ProductAsset},
    },
    errors::ServiceError,
    services::db_failure,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAssetInput {
    #[validate(length(min = 1, max = 255))]
    pub file_name: String,
    #[validate(url)]
    pub url: String,
    #[validate(length(min = 3, max = 127))]
    pub mime_type: String,
    #[validate(range(min = 0))]
    #[serde(default)]
    pub size: i64,
    pub alt_text: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAssetInput {
    #[validate(length(min = 1, max = 255))]
    pub file_name: Option<String>,
    #[validate(url)]
    pub url: Option<String>,
    #[validate(length(min = 3, max = 127))]
    pub mime_type: Option<String>,
    #[validate(range(min = 0))]
    pub size: Option<i64>,
    pub alt_text: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttachAssetInput {
    pub product_id: i32,
    pub asset_id: i32,
    #[serde(default)]
    pub role: AssetRole,
    #[serde(default)]
    pub position: i32,
}

/// Service for media assets and their product attachments
#[derive(Clone)]
pub struct AssetService {
    db_pool: Arc<DbPool>,
}

impl AssetService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    #[instrument(skip(self))]
    pub async fn create_asset(&self, input: CreateAssetInput) -> Result<asset::Model, ServiceError> {
        input.validate()?;
        let now = Utc::now();
        let asset = asset::ActiveModel {
            file_name: Set(input.file_name),
            url: Set(input.url),
            mime_type: Set(input.mime_type),
            size: Set(input.size),
            alt_text: Set(input.alt_text),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&*self.db_pool)
        .await
        .map_err(db_failure("create asset"))?;

        info!(asset_id = asset.id, file_name = %asset.file_name, "Asset created");
        Ok(asset)
    }

    #[instrument(skip(self))]
    pub async fn get_asset(&self, id: i32) -> Result<asset::Model, ServiceError> {
        Asset::find_by_id(id)
            .one(&*self.db_pool)
            .await
            .map_err(db_failure("fetch asset"))?
            .ok_or_else(|| ServiceError::not_found("Asset", id))
    }

    #[instrument(skip(self))]
    pub async fn list_assets(
        &self,
        mime_type: Option<String>,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<asset::Model>, u64), ServiceError> {
        let mut query = Asset::find();
        if let Some(mime_type) = mime_type {
            query = query.filter(asset::Column::MimeType.starts_with(&mime_type));
        }
        let paginator = query
            .order_by_desc(asset::Column::CreatedAt)
            .order_by_desc(asset::Column::Id)
            .paginate(&*self.db_pool, limit);
        let total = paginator
            .num_items()
            .await
            .map_err(db_failure("count assets"))?;
        let assets = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(db_failure("fetch assets"))?;
        Ok((assets, total))
    }

    #[instrument(skip(self))]
    pub async fn update_asset(
        &self,
        id: i32,
        input: UpdateAssetInput,
    ) -> Result<asset::Model, ServiceError> {
        input.validate()?;
        let asset = self.get_asset(id).await?;

        let mut active: asset::ActiveModel = asset.into();
        if let Some(file_name) = input.file_name {
            active.file_name = Set(file_name);
        }
        if let Some(url) = input.url {
            active.url = Set(url);
        }
        if let Some(mime_type) = input.mime_type {
            active.mime_type = Set(mime_type);
        }
        if let Some(size) = input.size {
            active.size = Set(size);
        }
        if let Some(alt_text) = input.alt_text {
            active.alt_text = Set(Some(alt_text));
        }
        active.updated_at = Set(Utc::now());

        let asset = active
            .update(&*self.db_pool)
            .await
            .map_err(db_failure("update asset"))?;
        info!(asset_id = id, "Asset updated");
        Ok(asset)
    }

    /// Deletes the asset and detaches it from every product.
    #[instrument(skip(self))]
    pub async fn delete_asset(&self, id: i32) -> Result<(), ServiceError> {
        self.get_asset(id).await?;
        let txn = self
            .db_pool
            .begin()
            .await
            .map_err(db_failure("begin transaction"))?;
        ProductAsset::delete_many()
            .filter(product_asset::Column::AssetId.eq(id))
            .exec(&txn)
            .await
            .map_err(db_failure("detach asset"))?;
        Asset::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(db_failure("delete asset"))?;
        txn.commit().await.map_err(db_failure("commit asset deletion"))?;
        info!(asset_id = id, "Asset deleted");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn list_product_assets(
        &self,
        product_id: Option<i32>,
        asset_id: Option<i32>,
    ) -> Result<Vec<product_asset::Model>, ServiceError> {
        let mut query = ProductAsset::find();
        if let Some(product_id) = product_id {
            query = query.filter(product_asset::Column::ProductId.eq(product_id));
        }
        if let Some(asset_id) = asset_id {
            query = query.filter(product_asset::Column::AssetId.eq(asset_id));
        }
        query
            .order_by_asc(product_asset::Column::ProductId)
            .order_by_asc(product_asset::Column::Position)
            .order_by_asc(product_asset::Column::AssetId)
            .all(&*self.db_pool)
            .await
            .map_err(db_failure("fetch product assets"))
    }

    /// Attaches an asset to a product; reattaching updates role and position.
    #[instrument(skip(self))]
    pub async fn attach(&self, input: AttachAssetInput) -> Result<product_asset::Model, ServiceError> {
        let db = &*self.db_pool;
        product::Entity::find_by_id(input.product_id)
            .one(db)
            .await
            .map_err(db_failure("fetch product"))?
            .ok_or_else(|| ServiceError::not_found("Product", input.product_id))?;
        self.get_asset(input.asset_id).await?;

        let existing = ProductAsset::find_by_id((input.product_id, input.asset_id))
            .one(db)
            .await
            .map_err(db_failure("fetch product asset"))?;

        let link = match existing {
            Some(link) => {
                let mut active: product_asset::ActiveModel = link.into();
                active.role = Set(input.role);
                active.position = Set(input.position);
                active
                    .update(db)
                    .await
                    .map_err(db_failure("update product asset"))?
            }
            None => product_asset::ActiveModel {
                product_id: Set(input.product_id),
                asset_id: Set(input.asset_id),
                role: Set(input.role),
                position: Set(input.position),
            }
            .insert(db)
            .await
            .map_err(db_failure("attach asset"))?,
        };

        info!(product_id = input.product_id, asset_id = input.asset_id, role = %input.role, "Asset attached");
        Ok(link)
    }

    #[instrument(skip(self))]
    pub async fn detach(&self, product_id: i32, asset_id: i32) -> Result<(), ServiceError> {
        let result = ProductAsset::delete_by_id((product_id, asset_id))
            .exec(&*self.db_pool)
            .await
            .map_err(db_failure("detach asset"))?;
        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound(format!(
                "Asset {} is not attached to product {}",
                asset_id, product_id
            )));
        }
        info!(product_id, asset_id, "Asset detached");
        Ok(())
    }

    /// Attached assets with their files for a batch of products.
    pub async fn assets_for_products(
        &self,
        product_ids: &[i32],
    ) -> Result<HashMap<i32, Vec<(product_asset::Model, asset::Model)>>, ServiceError> {
        let rows = ProductAsset::find()
            .filter(product_asset::Column::ProductId.is_in(product_ids.to_vec()))
            .find_also_related(Asset)
            .order_by_asc(product_asset::Column::Position)
            .order_by_asc(product_asset::Column::AssetId)
            .all(&*self.db_pool)
            .await
            .map_err(db_failure("fetch product assets"))?;

        let mut assets: HashMap<i32, Vec<_>> = HashMap::new();
        for (link, asset) in rows {
            if let Some(asset) = asset {
                assets.entry(link.product_id).or_default().push((link, asset));
            }
        }
        Ok(assets)
    }
}
