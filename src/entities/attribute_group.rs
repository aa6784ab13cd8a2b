use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Display section inside an attribute set
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "attribute_groups")]
#[serde(rename_all = "camelCase")]
#[schema(as = AttributeGroup)]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub attribute_set_id: i32,
    pub code: String,
    pub label: String,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::attribute_set::Entity",
        from = "Column::AttributeSetId",
        to = "super::attribute_set::Column::Id",
        on_delete = "Cascade"
    )]
    AttributeSet,
    #[sea_orm(has_many = "super::attribute_set_attribute::Entity")]
    Memberships,
}

impl Related<super::attribute_set::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AttributeSet.def()
    }
}

impl Related<super::attribute_set_attribute::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Memberships.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
