use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Membership of an attribute in a set, optionally placed in a group
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "attribute_set_attributes")]
#[serde(rename_all = "camelCase")]
#[schema(as = AttributeSetAttribute)]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub attribute_set_id: i32,
    pub attribute_group_id: Option<i32>,
    pub attribute_id: i32,
    pub sort_order: i32,
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
    #[sea_orm(
        belongs_to = "super::attribute_group::Entity",
        from = "Column::AttributeGroupId",
        to = "super::attribute_group::Column::Id",
        on_delete = "SetNull"
    )]
    AttributeGroup,
    #[sea_orm(
        belongs_to = "super::attribute::Entity",
        from = "Column::AttributeId",
        to = "super::attribute::Column::Id",
        on_delete = "Cascade"
    )]
    Attribute,
}

impl Related<super::attribute_set::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AttributeSet.def()
    }
}

impl Related<super::attribute_group::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AttributeGroup.def()
    }
}

impl Related<super::attribute::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Attribute.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
