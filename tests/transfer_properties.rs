//! Property-based checks for the transfer formats and small helpers.

use pim_api::entities::attribute::DataType;
use pim_api::models::AttributeValue;
use pim_api::services::transfer::{
    detect_format, format_to_csv, format_to_json, parse_csv, parse_json, RecordValue,
    TransferFormat,
};
use pim_api::services::{slugify, total_pages};
use proptest::prelude::*;

fn cell_text() -> impl Strategy<Value = String> {
    "[A-Za-z0-9 ,;\"'\\-]{1,24}"
}

fn product(id: i64, sku: String, name: String) -> RecordValue {
    RecordValue::map([
        ("id", RecordValue::Int(id)),
        ("sku", sku.into()),
        ("name", name.into()),
        ("productType", "SIMPLE".into()),
        ("attributeSetId", RecordValue::Null),
        ("categories", RecordValue::List(Vec::new())),
    ])
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn csv_keeps_text_cells_and_integer_ids(
        rows in prop::collection::vec((1i64..100_000, cell_text(), cell_text()), 1..8)
    ) {
        let products: Vec<RecordValue> = rows
            .iter()
            .map(|(id, sku, name)| product(*id, sku.clone(), name.clone()))
            .collect();
        let csv = format_to_csv(&products).unwrap();
        let parsed = parse_csv(&csv).unwrap();

        prop_assert_eq!(parsed.len(), rows.len());
        for ((id, sku, name), value) in rows.iter().zip(parsed.iter()) {
            prop_assert_eq!(value["id"].as_i64(), Some(*id));
            prop_assert_eq!(value["sku"].as_str(), Some(sku.as_str()));
            prop_assert_eq!(value["name"].as_str(), Some(name.as_str()));
            prop_assert!(value["attributeSetId"].is_null());
            prop_assert_eq!(value["categories"].as_array().map(Vec::len), Some(0));
        }
    }

    #[test]
    fn json_keeps_nulls_and_order(
        rows in prop::collection::vec((1i64..100_000, cell_text(), cell_text()), 1..8)
    ) {
        let products: Vec<RecordValue> = rows
            .iter()
            .map(|(id, sku, name)| product(*id, sku.clone(), name.clone()))
            .collect();
        let json = format_to_json(&products).unwrap();
        let parsed = parse_json(&json).unwrap();

        prop_assert_eq!(parsed.len(), rows.len());
        for ((_, sku, _), value) in rows.iter().zip(parsed.iter()) {
            prop_assert_eq!(value["sku"].as_str(), Some(sku.as_str()));
            let fields = value.as_object().unwrap();
            prop_assert!(fields.contains_key("attributeSetId"));
            let keys: Vec<&str> = fields.keys().map(String::as_str).collect();
            prop_assert_eq!(keys[0], "id");
            prop_assert_eq!(keys[1], "sku");
        }
    }

    #[test]
    fn extension_decides_the_format(stem in "[a-z]{1,12}", content in ".{0,40}") {
        prop_assert_eq!(detect_format(&format!("{}.csv", stem), &content), TransferFormat::Csv);
        prop_assert_eq!(detect_format(&format!("{}.XML", stem), &content), TransferFormat::Xml);
        prop_assert_eq!(detect_format(&format!("{}.json", stem), &content), TransferFormat::Json);
    }

    #[test]
    fn slugs_are_url_safe(input in ".{0,60}") {
        let slug = slugify(&input);
        prop_assert!(slug.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
        prop_assert!(!slug.starts_with('-'));
        prop_assert!(!slug.ends_with('-'));
        prop_assert!(!slug.contains("--"));
    }

    #[test]
    fn pages_cover_every_item(total in 0u64..10_000, limit in 1u64..=100) {
        let pages = total_pages(total, limit);
        prop_assert!(pages * limit >= total);
        if total > 0 {
            prop_assert!((pages - 1) * limit < total);
        } else {
            prop_assert_eq!(pages, 0);
        }
    }

    #[test]
    fn int_values_survive_json(value in any::<i64>()) {
        let stored = AttributeValue::Int(value);
        let restored = AttributeValue::from_json(DataType::Int, &stored.to_json()).unwrap();
        prop_assert_eq!(restored, stored);
    }

    #[test]
    fn values_occupy_one_column(text in "[a-z ]{0,30}", flag in any::<bool>()) {
        for value in [AttributeValue::String(text.clone()), AttributeValue::Boolean(flag)] {
            let data_type = value.data_type();
            let columns = value.clone().into_columns();
            prop_assert_eq!(AttributeValue::from_columns(data_type, &columns).unwrap(), value);
        }
    }
}
