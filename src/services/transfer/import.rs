//! Product import parsers and pre-persistence validation.

use super::export::CSV_RELATION_FIELDS;
use super::{TransferError, TransferFormat};
use crate::entities::product::ProductType;
use serde::Serialize;
use serde_json::{Map, Value};
use std::str::FromStr;
use treexml::{Document, Element};
use utoipa::ToSchema;

/// CSV columns coerced to integers on import.
const CSV_INTEGER_FIELDS: [&str; 2] = ["id", "attributeSetId"];

/// Parses `{ "products": [...] }` and returns the array.
pub fn parse_json(content: &str) -> Result<Vec<Value>, TransferError> {
    let parsed: Value = serde_json::from_str(content)
        .map_err(|e| TransferError::Parse(format!("JSON parsing error: {}", e)))?;

    match parsed.get("products") {
        Some(Value::Array(products)) => Ok(products.clone()),
        _ => Err(TransferError::Invalid(
            "Invalid JSON format: expected a \"products\" array".to_string(),
        )),
    }
}

/// Parses `<products><product>…</product></products>` into generic JSON values.
pub fn parse_xml(content: &str) -> Result<Vec<Value>, TransferError> {
    let document = Document::parse(content.as_bytes())
        .map_err(|e| TransferError::Parse(format!("XML parsing error: {}", e)))?;

    let products: Vec<Value> = document
        .root
        .as_ref()
        .filter(|root| root.name == "products")
        .map(|root| {
            root.children
                .iter()
                .filter(|child| child.name == "product")
                .map(extract_element_data)
                .collect()
        })
        .unwrap_or_default();

    if products.is_empty() {
        return Err(TransferError::Invalid(
            "No products found in XML".to_string(),
        ));
    }
    Ok(products)
}

/// Recovers structure from an element:
/// - no children: the element text (empty string when absent)
/// - children all named `item`: an array
/// - two or more children sharing one name: an array
/// - otherwise: an object keyed by child name
///
/// A single uniquely named child is indistinguishable from a one-field object
/// and extracts as an object.
pub fn extract_element_data(element: &Element) -> Value {
    if element.children.is_empty() {
        let text = element
            .text
            .clone()
            .or_else(|| element.cdata.clone())
            .unwrap_or_default();
        return Value::String(text);
    }

    let first = &element.children[0].name;
    let same_name = element.children.iter().all(|c| &c.name == first);
    let is_array = same_name && (first == "item" || element.children.len() > 1);

    if is_array {
        return Value::Array(element.children.iter().map(extract_element_data).collect());
    }

    let mut fields = Map::new();
    for child in &element.children {
        fields.insert(child.name.clone(), extract_element_data(child));
    }
    Value::Object(fields)
}

/// Parses header-led CSV. Relation columns are decoded from JSON (empty → `[]`),
/// `id` and `attributeSetId` become integers (empty or non-numeric → null).
pub fn parse_csv(content: &str) -> Result<Vec<Value>, TransferError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_reader(content.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| TransferError::Parse(format!("CSV parsing error: {}", e)))?
        .clone();

    let mut products = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record =
            record.map_err(|e| TransferError::Parse(format!("CSV parsing error: {}", e)))?;
        let row = index + 1;

        let mut fields = Map::new();
        for (header, cell) in headers.iter().zip(record.iter()) {
            let value = if CSV_RELATION_FIELDS.contains(&header) {
                decode_relation(cell).map_err(|e| {
                    TransferError::Parse(format!(
                        "CSV parsing error: row {} field \"{}\" is not valid JSON: {}",
                        row, header, e
                    ))
                })?
            } else if CSV_INTEGER_FIELDS.contains(&header) {
                cell.trim()
                    .parse::<i64>()
                    .map(Value::from)
                    .unwrap_or(Value::Null)
            } else {
                Value::String(cell.to_string())
            };
            fields.insert(header.to_string(), value);
        }
        products.push(Value::Object(fields));
    }

    if products.is_empty() {
        return Err(TransferError::Invalid(
            "No products found in CSV".to_string(),
        ));
    }
    Ok(products)
}

fn decode_relation(cell: &str) -> Result<Value, serde_json::Error> {
    if cell.trim().is_empty() {
        return Ok(Value::Array(Vec::new()));
    }
    serde_json::from_str(cell)
}

/// Picks a format from the file extension, falling back to sniffing the content.
pub fn detect_format(filename: &str, sample: &str) -> TransferFormat {
    let extension = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase());
    if let Some(format) = extension.and_then(|ext| TransferFormat::from_str(&ext).ok()) {
        return format;
    }

    let trimmed = sample.trim_start();
    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        TransferFormat::Json
    } else if trimmed.starts_with("<?xml") || trimmed.starts_with("<products") {
        TransferFormat::Xml
    } else if trimmed.contains(',') {
        TransferFormat::Csv
    } else {
        TransferFormat::Json
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<String>,
}

/// Checks the fields a product needs before it can be persisted. Every rule is
/// evaluated; the result lists each failure.
pub fn validate_product_data(product: &Value) -> ValidationResult {
    let mut errors = Vec::new();

    if !is_non_empty_string(product.get("sku")) {
        errors.push("SKU is required and must be a string".to_string());
    }
    if !is_non_empty_string(product.get("name")) {
        errors.push("Name is required and must be a string".to_string());
    }

    match product.get("productType") {
        None | Some(Value::Null) => errors.push("Product type is required".to_string()),
        Some(Value::String(s)) if s.is_empty() => {
            errors.push("Product type is required".to_string())
        }
        Some(Value::String(s)) => {
            if ProductType::from_str(s).is_err() {
                errors.push(format!("Invalid product type: {}", s));
            }
        }
        Some(other) => errors.push(format!("Invalid product type: {}", other)),
    }

    ValidationResult {
        valid: errors.is_empty(),
        errors,
    }
}

fn is_non_empty_string(value: Option<&Value>) -> bool {
    matches!(value, Some(Value::String(s)) if !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use rstest::rstest;
    use serde_json::json;

    #[test]
    fn json_requires_products_array() {
        assert_matches!(parse_json("{\"items\": []}"), Err(TransferError::Invalid(_)));
        assert_matches!(parse_json("{\"products\": {}}"), Err(TransferError::Invalid(_)));
        assert_matches!(parse_json("not json"), Err(TransferError::Parse(msg)) if msg.starts_with("JSON parsing error"));
        assert_eq!(parse_json("{\"products\": [{\"sku\": \"A\"}]}").unwrap(), vec![json!({"sku": "A"})]);
    }

    #[test]
    fn xml_without_products_is_rejected() {
        assert_matches!(
            parse_xml("<products></products>"),
            Err(TransferError::Invalid(msg)) if msg == "No products found in XML"
        );
        assert_matches!(
            parse_xml("<catalog><product><sku>A</sku></product></catalog>"),
            Err(TransferError::Invalid(_))
        );
        assert_matches!(parse_xml("<products><product>"), Err(TransferError::Parse(_)));
    }

    #[test]
    fn xml_extraction_rules() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
            <products>
              <product>
                <sku>A-1</sku>
                <tags><item>red</item></tags>
                <sizes><size>S</size><size>M</size></sizes>
                <dimensions><width>10</width><height>20</height></dimensions>
                <wrapper><only>x</only></wrapper>
                <empty></empty>
              </product>
            </products>"#;
        let products = parse_xml(xml).unwrap();
        assert_eq!(
            products[0],
            json!({
                "sku": "A-1",
                "tags": ["red"],
                "sizes": ["S", "M"],
                "dimensions": {"width": "10", "height": "20"},
                "wrapper": {"only": "x"},
                "empty": ""
            })
        );
    }

    #[test]
    fn csv_decodes_relations_and_ids() {
        let csv = "id,sku,attributeSetId,categories,assets,attributes\n\
                   3,A,,\"[{\"\"categoryId\"\":1}]\",,[]\n";
        let products = parse_csv(csv).unwrap();
        assert_eq!(
            products[0],
            json!({
                "id": 3,
                "sku": "A",
                "attributeSetId": null,
                "categories": [{"categoryId": 1}],
                "assets": [],
                "attributes": []
            })
        );
    }

    #[test]
    fn csv_rejects_empty_and_bad_json() {
        assert_matches!(
            parse_csv(""),
            Err(TransferError::Invalid(msg)) if msg == "No products found in CSV"
        );
        assert_matches!(parse_csv("sku,name\n"), Err(TransferError::Invalid(_)));
        assert_matches!(
            parse_csv("sku,assets\nA,{broken\n"),
            Err(TransferError::Parse(msg)) if msg.contains("assets")
        );
    }

    #[rstest]
    #[case("x.json", "", TransferFormat::Json)]
    #[case("x.xml", "", TransferFormat::Xml)]
    #[case("x.csv", "", TransferFormat::Csv)]
    #[case("X.CSV", "{", TransferFormat::Csv)]
    #[case("x.txt", "{\"a\":1}", TransferFormat::Json)]
    #[case("x.txt", "  [1]", TransferFormat::Json)]
    #[case("x.txt", "<?xml version=\"1.0\"?>", TransferFormat::Xml)]
    #[case("upload", "<products/>", TransferFormat::Xml)]
    #[case("x.txt", "a,b,c", TransferFormat::Csv)]
    #[case("x.txt", "plain", TransferFormat::Json)]
    fn detects_format(#[case] filename: &str, #[case] sample: &str, #[case] expected: TransferFormat) {
        assert_eq!(detect_format(filename, sample), expected);
    }

    #[test]
    fn validation_reports_every_failure() {
        let result = validate_product_data(&json!({}));
        assert!(!result.valid);
        assert_eq!(
            result.errors,
            vec![
                "SKU is required and must be a string",
                "Name is required and must be a string",
                "Product type is required",
            ]
        );
    }

    #[test]
    fn validation_accepts_complete_product() {
        let result = validate_product_data(&json!({"sku": "A", "name": "B", "productType": "SIMPLE"}));
        assert_eq!(result, ValidationResult { valid: true, errors: vec![] });
    }

    #[test]
    fn validation_rejects_unknown_type_and_non_strings() {
        let result = validate_product_data(&json!({"sku": 12, "name": "B", "productType": "GADGET"}));
        assert_eq!(
            result.errors,
            vec!["SKU is required and must be a string", "Invalid product type: GADGET"]
        );
    }
}
