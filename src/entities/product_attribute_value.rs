use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Raw EAV value row. Exactly one `value_*` column is populated, chosen by the
/// attribute's data type; go through `models::AttributeValue` to read or write it.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "product_attribute_values")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub product_id: i32,
    pub attribute_id: i32,
    /// `None` for the global (all store views) value
    pub store_view_id: Option<i32>,
    pub value_string: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub value_text: Option<String>,
    pub value_int: Option<i64>,
    #[sea_orm(column_type = "Decimal(Some((16, 6)))", nullable)]
    pub value_decimal: Option<Decimal>,
    pub value_boolean: Option<bool>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id",
        on_delete = "Cascade"
    )]
    Product,
    #[sea_orm(
        belongs_to = "super::attribute::Entity",
        from = "Column::AttributeId",
        to = "super::attribute::Column::Id",
        on_delete = "Cascade"
    )]
    Attribute,
    #[sea_orm(
        belongs_to = "super::store_view::Entity",
        from = "Column::StoreViewId",
        to = "super::store_view::Column::Id",
        on_delete = "Cascade"
    )]
    StoreView,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl Related<super::attribute::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Attribute.def()
    }
}

impl Related<super::store_view::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StoreView.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
