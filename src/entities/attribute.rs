use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Storage type of an attribute's values. Selects the value column used by
/// `product_attribute_values`.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    ToSchema,
    strum::Display,
    strum::EnumString,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum DataType {
    #[sea_orm(string_value = "BOOLEAN")]
    Boolean,
    #[sea_orm(string_value = "STRING")]
    String,
    #[sea_orm(string_value = "INT")]
    Int,
    #[sea_orm(string_value = "DECIMAL")]
    Decimal,
    #[sea_orm(string_value = "TEXT")]
    Text,
    #[sea_orm(string_value = "JSON")]
    Json,
}

/// Editor widget hint for the admin UI.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    ToSchema,
    strum::Display,
    strum::EnumString,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum InputType {
    #[sea_orm(string_value = "TEXT")]
    Text,
    #[sea_orm(string_value = "SELECT")]
    Select,
    #[sea_orm(string_value = "MULTISELECT")]
    Multiselect,
    #[sea_orm(string_value = "DATE")]
    Date,
    #[sea_orm(string_value = "MEDIA")]
    Media,
}

/// Attribute definition in the EAV model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "attributes")]
#[serde(rename_all = "camelCase")]
#[schema(as = Attribute)]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Unique, immutable once created
    #[sea_orm(unique)]
    pub code: String,
    pub label: String,
    pub data_type: DataType,
    pub input_type: InputType,
    pub is_required: bool,
    pub is_filterable: bool,
    /// Global attributes hold a single value shared by all store views
    pub is_global: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::product_attribute_value::Entity")]
    Values,
    #[sea_orm(has_many = "super::attribute_set_attribute::Entity")]
    SetMemberships,
}

impl Related<super::product_attribute_value::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Values.def()
    }
}

impl Related<super::attribute_set_attribute::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SetMemberships.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
