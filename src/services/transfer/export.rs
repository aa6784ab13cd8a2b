//! Product export formatters: JSON, XML and CSV.

use super::record::RecordValue;
use super::TransferError;
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use serde_json::{json, Map, Number, Value};
use treexml::{Document, Element, XmlVersion};

/// Relation fields that travel as JSON text inside a single CSV cell.
pub const CSV_RELATION_FIELDS: [&str; 3] = ["assets", "categories", "attributes"];

/// Normalizes a record tree into JSON. Decimals become numbers by parsing
/// their string form as `f64`.
pub fn serialize_value(value: &RecordValue) -> Value {
    match value {
        RecordValue::Null => Value::Null,
        RecordValue::Bool(b) => Value::Bool(*b),
        RecordValue::Int(i) => Value::from(*i),
        RecordValue::Float(f) => float_value(*f),
        RecordValue::Decimal(d) => decimal_value(d),
        RecordValue::Text(s) => Value::String(s.clone()),
        RecordValue::List(items) => Value::Array(items.iter().map(serialize_value).collect()),
        RecordValue::Map(entries) => Value::Object(
            entries
                .iter()
                .map(|(k, v)| (k.clone(), serialize_value(v)))
                .collect::<Map<String, Value>>(),
        ),
    }
}

fn decimal_value(d: &Decimal) -> Value {
    d.to_string()
        .parse::<f64>()
        .map(float_value)
        .unwrap_or(Value::Null)
}

fn float_value(f: f64) -> Value {
    Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null)
}

/// Flattens one serialized product into CSV cells. Scalars become text
/// (null → empty cell); the relation fields become JSON strings; any other
/// nested value is left out of the row.
pub fn flatten_for_csv(product: &Value) -> Vec<(String, String)> {
    let Some(fields) = product.as_object() else {
        return Vec::new();
    };

    fields
        .iter()
        .filter_map(|(key, value)| {
            if CSV_RELATION_FIELDS.contains(&key.as_str()) {
                let cell = match value {
                    Value::Null => String::new(),
                    other => other.to_string(),
                };
                return Some((key.clone(), cell));
            }
            scalar_text(value).map(|text| (key.clone(), text))
        })
        .collect()
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => Some(String::new()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.clone()),
        Value::Array(_) | Value::Object(_) => None,
    }
}

/// `{ "products": [...] }`, pretty-printed.
pub fn format_to_json(products: &[RecordValue]) -> Result<String, TransferError> {
    let serialized: Vec<Value> = products.iter().map(serialize_value).collect();
    serde_json::to_string_pretty(&json!({ "products": serialized }))
        .map_err(|e| TransferError::Write(format!("JSON serialization error: {}", e)))
}

/// `<products><product>…</product></products>` with an XML 1.0 UTF-8 declaration.
/// Null-valued fields are omitted. A key that is not a valid element name is
/// a write error.
pub fn format_to_xml(products: &[RecordValue]) -> Result<String, TransferError> {
    let mut root = Element::new("products");
    for product in products {
        let mut element = Element::new("product");
        if let Value::Object(fields) = serialize_value(product) {
            element.children = convert_object_to_elements(&fields)?;
        }
        root.children.push(element);
    }

    let document = Document {
        version: XmlVersion::Version10,
        encoding: "UTF-8".to_string(),
        root: Some(root),
    };

    let mut data: Vec<u8> = vec![];
    document
        .write(&mut data)
        .map_err(|e| TransferError::Write(format!("XML serialization error: {}", e)))?;
    String::from_utf8(data).map_err(|e| TransferError::Write(format!("XML encoding error: {}", e)))
}

static XML_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_.\-]*$").unwrap());

fn convert_object_to_elements(fields: &Map<String, Value>) -> Result<Vec<Element>, TransferError> {
    fields
        .iter()
        .filter(|(_, value)| !value.is_null())
        .map(|(key, value)| convert_value(key, value))
        .collect()
}

fn convert_value(name: &str, value: &Value) -> Result<Element, TransferError> {
    if !XML_NAME_RE.is_match(name) {
        return Err(TransferError::Write(format!(
            "Invalid XML element name: {}",
            name
        )));
    }
    let mut element = Element::new(name);
    match value {
        Value::Array(items) => {
            element.children = items
                .iter()
                .map(|item| convert_value("item", item))
                .collect::<Result<_, _>>()?;
        }
        Value::Object(fields) => {
            element.children = convert_object_to_elements(fields)?;
        }
        Value::Null => {}
        scalar => element.text = scalar_text(scalar),
    }
    Ok(element)
}

/// Header row followed by one row per product. Headers are every key in
/// first-seen order; rows fill missing columns with empty cells.
pub fn format_to_csv(products: &[RecordValue]) -> Result<String, TransferError> {
    let rows: Vec<Vec<(String, String)>> = products
        .iter()
        .map(|p| flatten_for_csv(&serialize_value(p)))
        .collect();

    if rows.is_empty() {
        return Ok(String::new());
    }
    let mut headers: Vec<&str> = Vec::new();
    for (key, _) in rows.iter().flatten() {
        if !headers.contains(&key.as_str()) {
            headers.push(key.as_str());
        }
    }

    let write_err = |e: csv::Error| TransferError::Write(format!("CSV write error: {}", e));
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record(&headers).map_err(write_err)?;
    for row in &rows {
        let record = headers.iter().map(|header| {
            row.iter()
                .find(|(k, _)| k == header)
                .map(|(_, v)| v.as_str())
                .unwrap_or("")
        });
        writer.write_record(record).map_err(write_err)?;
    }

    let data = writer
        .into_inner()
        .map_err(|e| TransferError::Write(format!("CSV flush error: {}", e)))?;
    String::from_utf8(data).map_err(|e| TransferError::Write(format!("CSV encoding error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::transfer::import::{parse_csv, parse_xml};
    use assert_matches::assert_matches;
    use rust_decimal_macros::dec;

    fn sample() -> RecordValue {
        RecordValue::map([
            ("id", RecordValue::Int(1)),
            ("sku", "SKU-1".into()),
            ("name", "Widget".into()),
            ("attributeSetId", RecordValue::Null),
            (
                "attributeSet",
                RecordValue::map([("id", RecordValue::Int(2)), ("code", "default".into())]),
            ),
            (
                "categories",
                RecordValue::List(vec![RecordValue::map([("categoryId", RecordValue::Int(4))])]),
            ),
            ("assets", RecordValue::List(vec![])),
            (
                "attributes",
                RecordValue::List(vec![RecordValue::map([
                    ("attributeCode", "price".into()),
                    ("value", RecordValue::Decimal(dec!(12.50))),
                ])]),
            ),
        ])
    }

    #[test]
    fn decimals_serialize_as_numbers() {
        let value = serialize_value(&RecordValue::List(vec![
            RecordValue::Decimal(dec!(19.99)),
            RecordValue::Null,
        ]));
        assert_eq!(value, json!([19.99, null]));
    }

    #[test]
    fn json_wraps_products() {
        let out = format_to_json(&[sample()]).unwrap();
        let parsed: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["products"][0]["sku"], "SKU-1");
        assert_eq!(parsed["products"][0]["attributes"][0]["value"], json!(12.5));
        assert!(parsed["products"][0]["attributeSetId"].is_null());
        assert!(out.contains('\n'), "output is pretty-printed");
    }

    #[test]
    fn flatten_stringifies_relations_and_skips_nested_objects() {
        let row = flatten_for_csv(&serialize_value(&sample()));
        let keys: Vec<&str> = row.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(
            keys,
            vec!["id", "sku", "name", "attributeSetId", "categories", "assets", "attributes"]
        );
        let cell = |name: &str| row.iter().find(|(k, _)| k == name).unwrap().1.clone();
        assert_eq!(cell("attributeSetId"), "");
        assert_eq!(cell("assets"), "[]");
        let categories: Value = serde_json::from_str(&cell("categories")).unwrap();
        assert_eq!(categories, json!([{"categoryId": 4}]));
    }

    #[test]
    fn xml_omits_nulls_and_wraps_arrays_in_items() {
        let xml = format_to_xml(&[sample()]).unwrap();
        assert!(xml.starts_with("<?xml"));
        assert!(xml.contains("version=\"1.0\""));
        assert!(xml.contains("encoding=\"UTF-8\""));
        assert!(xml.contains("<products>"));
        assert!(xml.contains("<sku>SKU-1</sku>"));
        assert!(!xml.contains("attributeSetId"));
        assert!(xml.contains("<item>"));
        assert!(xml.contains("<categoryId>4</categoryId>"));
        assert!(xml.contains("<value>12.5</value>"));
    }

    #[test]
    fn xml_null_fields_are_absent_after_reparse() {
        let product = RecordValue::map([
            ("sku", "A".into()),
            ("name", "Lamp".into()),
            ("attributeSetId", RecordValue::Null),
        ]);
        let parsed = parse_xml(&format_to_xml(&[product]).unwrap()).unwrap();
        let fields = parsed[0].as_object().unwrap();
        assert_eq!(fields.get("sku"), Some(&json!("A")));
        assert!(!fields.contains_key("attributeSetId"));
    }

    #[test]
    fn xml_rejects_keys_that_are_not_element_names() {
        let product = RecordValue::map([
            ("sku", "A".into()),
            (
                "value",
                RecordValue::map([("2 sizes", RecordValue::List(vec!["S".into()]))]),
            ),
        ]);
        assert_matches!(
            format_to_xml(&[product]),
            Err(TransferError::Write(message)) if message == "Invalid XML element name: 2 sizes"
        );

        let fine = RecordValue::map([("sku", "A".into()), ("size_eu.v2", "42".into())]);
        let parsed = parse_xml(&format_to_xml(&[fine]).unwrap()).unwrap();
        assert_eq!(parsed[0]["size_eu.v2"], "42");
    }

    #[test]
    fn csv_header_covers_keys_from_every_row() {
        let first = RecordValue::map([("sku", "A".into()), ("name", "Lamp".into())]);
        let second = RecordValue::map([
            ("sku", "B".into()),
            ("color", "red".into()),
            ("name", "Desk".into()),
        ]);
        let csv = format_to_csv(&[first, second]).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines, vec!["sku,name,color", "A,Lamp,", "B,Desk,red"]);

        let parsed = parse_csv(&csv).unwrap();
        assert_eq!(parsed[1]["color"], "red");
    }

    #[test]
    fn csv_has_header_and_row() {
        let csv = format_to_csv(&[sample(), sample()]).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "id,sku,name,attributeSetId,categories,assets,attributes"
        );
        assert!(lines[1].starts_with("1,SKU-1,Widget,,"));
    }

    #[test]
    fn csv_of_nothing_is_empty() {
        assert_eq!(format_to_csv(&[]).unwrap(), "");
    }
}
