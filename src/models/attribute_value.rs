//! Typed EAV values.
//!
//! A product attribute value row has one column per storage type. The column
//! that may be populated is chosen by the attribute's [`DataType`]; every
//! read and write goes through [`AttributeValue`] so a row can never carry a
//! value in the wrong column or in two columns at once.

use crate::entities::attribute::DataType;
use crate::entities::product_attribute_value;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde_json::{Number, Value};
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ValueError {
    #[error("a value is required for {0} attributes")]
    Missing(DataType),

    #[error("cannot convert {found} to {data_type}")]
    Coercion { data_type: DataType, found: String },

    #[error("{0} value column is empty")]
    EmptyColumn(DataType),

    #[error("{data_type} value row also populates {column}")]
    ConflictingColumn {
        data_type: DataType,
        column: &'static str,
    },

    #[error("stored JSON is malformed: {0}")]
    MalformedJson(String),
}

/// A value of exactly one storage type.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    Boolean(bool),
    String(String),
    Int(i64),
    Decimal(Decimal),
    Text(String),
    Json(Value),
}

/// The nullable value columns of a `product_attribute_values` row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueColumns {
    pub value_string: Option<String>,
    pub value_text: Option<String>,
    pub value_int: Option<i64>,
    pub value_decimal: Option<Decimal>,
    pub value_boolean: Option<bool>,
}

impl From<&product_attribute_value::Model> for ValueColumns {
    fn from(row: &product_attribute_value::Model) -> Self {
        Self {
            value_string: row.value_string.clone(),
            value_text: row.value_text.clone(),
            value_int: row.value_int,
            value_decimal: row.value_decimal,
            value_boolean: row.value_boolean,
        }
    }
}

impl ValueColumns {
    fn populated(&self) -> Vec<&'static str> {
        let mut columns = Vec::new();
        if self.value_string.is_some() {
            columns.push("valueString");
        }
        if self.value_text.is_some() {
            columns.push("valueText");
        }
        if self.value_int.is_some() {
            columns.push("valueInt");
        }
        if self.value_decimal.is_some() {
            columns.push("valueDecimal");
        }
        if self.value_boolean.is_some() {
            columns.push("valueBoolean");
        }
        columns
    }
}

fn column_for(data_type: DataType) -> &'static str {
    match data_type {
        DataType::Boolean => "valueBoolean",
        DataType::String => "valueString",
        DataType::Int => "valueInt",
        DataType::Decimal => "valueDecimal",
        DataType::Text | DataType::Json => "valueText",
    }
}

impl AttributeValue {
    pub fn data_type(&self) -> DataType {
        match self {
            Self::Boolean(_) => DataType::Boolean,
            Self::String(_) => DataType::String,
            Self::Int(_) => DataType::Int,
            Self::Decimal(_) => DataType::Decimal,
            Self::Text(_) => DataType::Text,
            Self::Json(_) => DataType::Json,
        }
    }

    /// Splits the value into row columns. JSON is stored serialized in the text column.
    pub fn into_columns(self) -> ValueColumns {
        let mut columns = ValueColumns::default();
        match self {
            Self::Boolean(b) => columns.value_boolean = Some(b),
            Self::String(s) => columns.value_string = Some(s),
            Self::Int(i) => columns.value_int = Some(i),
            Self::Decimal(d) => columns.value_decimal = Some(d),
            Self::Text(t) => columns.value_text = Some(t),
            Self::Json(v) => columns.value_text = Some(v.to_string()),
        }
        columns
    }

    /// Reads a stored row back, rejecting rows whose populated columns disagree with `data_type`.
    pub fn from_columns(data_type: DataType, columns: &ValueColumns) -> Result<Self, ValueError> {
        let expected = column_for(data_type);
        if let Some(column) = columns.populated().into_iter().find(|c| *c != expected) {
            return Err(ValueError::ConflictingColumn { data_type, column });
        }

        let empty = || ValueError::EmptyColumn(data_type);
        Ok(match data_type {
            DataType::Boolean => Self::Boolean(columns.value_boolean.ok_or_else(empty)?),
            DataType::String => Self::String(columns.value_string.clone().ok_or_else(empty)?),
            DataType::Int => Self::Int(columns.value_int.ok_or_else(empty)?),
            DataType::Decimal => Self::Decimal(columns.value_decimal.ok_or_else(empty)?),
            DataType::Text => Self::Text(columns.value_text.clone().ok_or_else(empty)?),
            DataType::Json => {
                let raw = columns.value_text.as_deref().ok_or_else(empty)?;
                Self::Json(
                    serde_json::from_str(raw)
                        .map_err(|e| ValueError::MalformedJson(e.to_string()))?,
                )
            }
        })
    }

    /// Coerces loosely typed input (request bodies, import files) into `data_type`.
    pub fn from_json(data_type: DataType, input: &Value) -> Result<Self, ValueError> {
        if input.is_null() {
            return Err(ValueError::Missing(data_type));
        }
        let mismatch = || ValueError::Coercion {
            data_type,
            found: describe(input),
        };

        match data_type {
            DataType::Boolean => match input {
                Value::Bool(b) => Ok(Self::Boolean(*b)),
                Value::Number(n) => match n.as_i64() {
                    Some(0) => Ok(Self::Boolean(false)),
                    Some(1) => Ok(Self::Boolean(true)),
                    _ => Err(mismatch()),
                },
                Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                    "true" | "1" | "yes" => Ok(Self::Boolean(true)),
                    "false" | "0" | "no" => Ok(Self::Boolean(false)),
                    _ => Err(mismatch()),
                },
                _ => Err(mismatch()),
            },
            DataType::String | DataType::Text => {
                let text = match input {
                    Value::String(s) => s.clone(),
                    Value::Number(n) => n.to_string(),
                    Value::Bool(b) => b.to_string(),
                    _ => return Err(mismatch()),
                };
                Ok(if data_type == DataType::String {
                    Self::String(text)
                } else {
                    Self::Text(text)
                })
            }
            DataType::Int => match input {
                Value::Number(n) => n
                    .as_i64()
                    .or_else(|| {
                        n.as_f64()
                            .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                            .map(|f| f as i64)
                    })
                    .map(Self::Int)
                    .ok_or_else(mismatch),
                Value::String(s) => s.trim().parse().map(Self::Int).map_err(|_| mismatch()),
                _ => Err(mismatch()),
            },
            DataType::Decimal => match input {
                Value::Number(n) => Decimal::from_str(&n.to_string())
                    .or_else(|_| Decimal::from_scientific(&n.to_string()))
                    .map(Self::Decimal)
                    .map_err(|_| mismatch()),
                Value::String(s) => Decimal::from_str(s.trim())
                    .map(Self::Decimal)
                    .map_err(|_| mismatch()),
                _ => Err(mismatch()),
            },
            DataType::Json => Ok(Self::Json(input.clone())),
        }
    }

    /// JSON view of the value; decimals become JSON numbers.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Boolean(b) => Value::Bool(*b),
            Self::String(s) | Self::Text(s) => Value::String(s.clone()),
            Self::Int(i) => Value::from(*i),
            Self::Decimal(d) => d
                .to_f64()
                .and_then(Number::from_f64)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            Self::Json(v) => v.clone(),
        }
    }
}

fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".into(),
        Value::Bool(b) => format!("boolean {}", b),
        Value::Number(n) => format!("number {}", n),
        Value::String(s) => format!("string \"{}\"", s),
        Value::Array(_) => "array".into(),
        Value::Object(_) => "object".into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use rstest::rstest;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[rstest]
    #[case(AttributeValue::Boolean(true))]
    #[case(AttributeValue::String("red".into()))]
    #[case(AttributeValue::Int(-42))]
    #[case(AttributeValue::Decimal(dec!(19.99)))]
    #[case(AttributeValue::Text("long description".into()))]
    #[case(AttributeValue::Json(json!({"sizes": ["S", "M"]})))]
    fn columns_hold_exactly_one_value(#[case] value: AttributeValue) {
        let data_type = value.data_type();
        let columns = value.clone().into_columns();
        assert_eq!(columns.populated().len(), 1);
        assert_eq!(columns.populated()[0], column_for(data_type));
        assert_eq!(AttributeValue::from_columns(data_type, &columns).unwrap(), value);
    }

    #[test]
    fn json_is_stored_in_text_column() {
        let columns = AttributeValue::Json(json!([1, 2])).into_columns();
        assert_eq!(columns.value_text.as_deref(), Some("[1,2]"));
    }

    #[test]
    fn row_with_wrong_column_is_rejected() {
        let columns = ValueColumns {
            value_string: Some("12".into()),
            ..Default::default()
        };
        assert_matches!(
            AttributeValue::from_columns(DataType::Int, &columns),
            Err(ValueError::ConflictingColumn {
                column: "valueString",
                ..
            })
        );
    }

    #[test]
    fn row_with_two_columns_is_rejected() {
        let columns = ValueColumns {
            value_int: Some(1),
            value_boolean: Some(true),
            ..Default::default()
        };
        assert_matches!(
            AttributeValue::from_columns(DataType::Int, &columns),
            Err(ValueError::ConflictingColumn { .. })
        );
    }

    #[test]
    fn empty_row_is_rejected() {
        assert_eq!(
            AttributeValue::from_columns(DataType::Text, &ValueColumns::default()),
            Err(ValueError::EmptyColumn(DataType::Text))
        );
    }

    #[rstest]
    #[case(DataType::Boolean, json!("yes"), AttributeValue::Boolean(true))]
    #[case(DataType::Boolean, json!(0), AttributeValue::Boolean(false))]
    #[case(DataType::Int, json!("17"), AttributeValue::Int(17))]
    #[case(DataType::Int, json!(3.0), AttributeValue::Int(3))]
    #[case(DataType::Decimal, json!("4.50"), AttributeValue::Decimal(dec!(4.50)))]
    #[case(DataType::Decimal, json!(19.99), AttributeValue::Decimal(dec!(19.99)))]
    #[case(DataType::String, json!(12), AttributeValue::String("12".into()))]
    #[case(DataType::Json, json!({"a": 1}), AttributeValue::Json(json!({"a": 1})))]
    fn coerces_input(#[case] data_type: DataType, #[case] input: Value, #[case] expected: AttributeValue) {
        assert_eq!(AttributeValue::from_json(data_type, &input).unwrap(), expected);
    }

    #[rstest]
    #[case(DataType::Int, json!("twelve"))]
    #[case(DataType::Int, json!(1.5))]
    #[case(DataType::Boolean, json!("maybe"))]
    #[case(DataType::Decimal, json!([1]))]
    #[case(DataType::String, json!({"x": 1}))]
    fn rejects_uncoercible_input(#[case] data_type: DataType, #[case] input: Value) {
        assert_matches!(
            AttributeValue::from_json(data_type, &input),
            Err(ValueError::Coercion { .. })
        );
    }

    #[test]
    fn null_is_missing() {
        assert_eq!(
            AttributeValue::from_json(DataType::Json, &Value::Null),
            Err(ValueError::Missing(DataType::Json))
        );
    }

    #[test]
    fn decimal_renders_as_number() {
        assert_eq!(AttributeValue::Decimal(dec!(2.5)).to_json(), json!(2.5));
    }
}
