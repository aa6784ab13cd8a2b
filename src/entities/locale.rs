use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "locales")]
#[serde(rename_all = "camelCase")]
#[schema(as = Locale)]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// e.g. `en_US`
    #[sea_orm(unique)]
    pub code: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::store_view::Entity")]
    StoreViews,
}

impl Related<super::store_view::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StoreViews.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
