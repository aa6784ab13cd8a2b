//! Export-side value tree.
//!
//! Products are lowered into a [`RecordValue`] tree before formatting. The tree
//! keeps decimals as exact [`Decimal`]s; `export::serialize_value` is the one
//! place that turns them into JSON numbers.

use crate::entities::{
    asset, attribute, attribute_set, category, product, product_asset, product_category,
};
use crate::models::AttributeValue;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum RecordValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Decimal(Decimal),
    Text(String),
    List(Vec<RecordValue>),
    /// Ordered key/value pairs; order is kept in every output format.
    Map(Vec<(String, RecordValue)>),
}

impl RecordValue {
    pub fn map<const N: usize>(entries: [(&str, RecordValue); N]) -> Self {
        RecordValue::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        )
    }

    pub fn get(&self, key: &str) -> Option<&RecordValue> {
        match self {
            RecordValue::Map(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }
}

impl From<bool> for RecordValue {
    fn from(v: bool) -> Self {
        RecordValue::Bool(v)
    }
}

impl From<i32> for RecordValue {
    fn from(v: i32) -> Self {
        RecordValue::Int(i64::from(v))
    }
}

impl From<i64> for RecordValue {
    fn from(v: i64) -> Self {
        RecordValue::Int(v)
    }
}

impl From<Decimal> for RecordValue {
    fn from(v: Decimal) -> Self {
        RecordValue::Decimal(v)
    }
}

impl From<String> for RecordValue {
    fn from(v: String) -> Self {
        RecordValue::Text(v)
    }
}

impl From<&str> for RecordValue {
    fn from(v: &str) -> Self {
        RecordValue::Text(v.to_string())
    }
}

impl From<DateTime<Utc>> for RecordValue {
    fn from(v: DateTime<Utc>) -> Self {
        RecordValue::Text(v.to_rfc3339())
    }
}

impl<T: Into<RecordValue>> From<Option<T>> for RecordValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(RecordValue::Null)
    }
}

impl<T: Into<RecordValue>> From<Vec<T>> for RecordValue {
    fn from(v: Vec<T>) -> Self {
        RecordValue::List(v.into_iter().map(Into::into).collect())
    }
}

/// Lifts already-parsed data (e.g. an import file being converted) into the tree.
impl From<Value> for RecordValue {
    fn from(v: Value) -> Self {
        match v {
            Value::Null => RecordValue::Null,
            Value::Bool(b) => RecordValue::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => RecordValue::Int(i),
                None => RecordValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => RecordValue::Text(s),
            Value::Array(items) => RecordValue::List(items.into_iter().map(Into::into).collect()),
            Value::Object(fields) => {
                RecordValue::Map(fields.into_iter().map(|(k, v)| (k, v.into())).collect())
            }
        }
    }
}

impl From<&AttributeValue> for RecordValue {
    fn from(v: &AttributeValue) -> Self {
        match v {
            AttributeValue::Boolean(b) => RecordValue::Bool(*b),
            AttributeValue::String(s) | AttributeValue::Text(s) => RecordValue::Text(s.clone()),
            AttributeValue::Int(i) => RecordValue::Int(*i),
            AttributeValue::Decimal(d) => RecordValue::Decimal(*d),
            AttributeValue::Json(json) => json.clone().into(),
        }
    }
}

/// One stored attribute value together with its definition.
#[derive(Debug, Clone)]
pub struct AttributeEntry {
    pub attribute: attribute::Model,
    pub store_view_id: Option<i32>,
    pub value: AttributeValue,
}

/// A product with every association the export formats carry.
#[derive(Debug, Clone)]
pub struct ProductRecord {
    pub product: product::Model,
    pub attribute_set: Option<attribute_set::Model>,
    pub categories: Vec<(product_category::Model, category::Model)>,
    pub assets: Vec<(product_asset::Model, asset::Model)>,
    pub attributes: Vec<AttributeEntry>,
}

impl ProductRecord {
    pub fn new(product: product::Model) -> Self {
        Self {
            product,
            attribute_set: None,
            categories: Vec::new(),
            assets: Vec::new(),
            attributes: Vec::new(),
        }
    }

    pub fn to_record(&self) -> RecordValue {
        let p = &self.product;
        let attribute_set = self
            .attribute_set
            .as_ref()
            .map(|set| {
                RecordValue::map([
                    ("id", set.id.into()),
                    ("code", set.code.as_str().into()),
                    ("label", set.label.as_str().into()),
                ])
            })
            .unwrap_or(RecordValue::Null);

        let categories = self
            .categories
            .iter()
            .map(|(link, c)| {
                RecordValue::map([
                    ("categoryId", c.id.into()),
                    ("code", c.code.as_str().into()),
                    ("position", link.position.into()),
                ])
            })
            .collect::<Vec<_>>();

        let assets = self
            .assets
            .iter()
            .map(|(link, a)| {
                RecordValue::map([
                    ("assetId", a.id.into()),
                    ("fileName", a.file_name.as_str().into()),
                    ("url", a.url.as_str().into()),
                    ("mimeType", a.mime_type.as_str().into()),
                    ("role", link.role.to_string().into()),
                    ("position", link.position.into()),
                ])
            })
            .collect::<Vec<_>>();

        let attributes = self
            .attributes
            .iter()
            .map(|entry| {
                RecordValue::map([
                    ("attributeId", entry.attribute.id.into()),
                    ("attributeCode", entry.attribute.code.as_str().into()),
                    ("dataType", entry.attribute.data_type.to_string().into()),
                    ("storeViewId", entry.store_view_id.into()),
                    ("value", (&entry.value).into()),
                ])
            })
            .collect::<Vec<_>>();

        RecordValue::map([
            ("id", p.id.into()),
            ("sku", p.sku.as_str().into()),
            ("name", p.name.as_str().into()),
            ("productType", p.product_type.to_string().into()),
            ("status", p.status.to_string().into()),
            ("attributeSetId", p.attribute_set_id.into()),
            ("createdAt", p.created_at.into()),
            ("updatedAt", p.updated_at.into()),
            ("attributeSet", attribute_set),
            ("categories", RecordValue::List(categories)),
            ("assets", RecordValue::List(assets)),
            ("attributes", RecordValue::List(attributes)),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::attribute::{DataType, InputType};
    use crate::entities::product::{ProductStatus, ProductType};
    use rust_decimal_macros::dec;

    fn product() -> product::Model {
        product::Model {
            id: 7,
            sku: "TSHIRT-RED".into(),
            name: "Red T-Shirt".into(),
            product_type: ProductType::Simple,
            status: ProductStatus::Enrichment,
            attribute_set_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn record_keeps_decimal_exact_and_nulls() {
        let mut record = ProductRecord::new(product());
        record.attributes.push(AttributeEntry {
            attribute: attribute::Model {
                id: 3,
                code: "price".into(),
                label: "Price".into(),
                data_type: DataType::Decimal,
                input_type: InputType::Text,
                is_required: false,
                is_filterable: true,
                is_global: true,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
            store_view_id: None,
            value: AttributeValue::Decimal(dec!(19.99)),
        });

        let tree = record.to_record();
        assert_eq!(tree.get("attributeSetId"), Some(&RecordValue::Null));
        assert_eq!(tree.get("status"), Some(&RecordValue::Text("ENRICHMENT".into())));

        let RecordValue::List(attributes) = tree.get("attributes").unwrap() else {
            panic!("attributes must be a list");
        };
        assert_eq!(
            attributes[0].get("value"),
            Some(&RecordValue::Decimal(dec!(19.99)))
        );
    }

    #[test]
    fn lifts_json_values() {
        let lifted: RecordValue = serde_json::json!({"a": [1, 2.5, null, "x"]}).into();
        assert_eq!(
            lifted,
            RecordValue::map([(
                "a",
                RecordValue::List(vec![
                    RecordValue::Int(1),
                    RecordValue::Float(2.5),
                    RecordValue::Null,
                    RecordValue::Text("x".into()),
                ])
            )])
        );
    }
}
