//! Product import and export against the catalog database.

use crate::{
    db::DbPool,
    entities::{
        attribute, attribute_set, category,
        product::{self, ProductStatus, ProductType},
    },
    errors::ServiceError,
    models::AttributeValue,
    services::{
        assets::AssetService,
        db_failure,
        product_attributes::{write_value, ProductAttributeService},
        product_categories::{link_product, ProductCategoryService},
        transfer::{
            detect_format, format_products, parse_products, validate_product_data, ProductRecord,
            TransferFormat, ValidationResult,
        },
    },
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseTransaction, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use utoipa::ToSchema;
use validator::Validate;

/// A rendered export file
#[derive(Debug, Clone)]
pub struct ExportFile {
    pub format: TransferFormat,
    pub filename: String,
    pub content: String,
}

impl ExportFile {
    pub fn content_type(&self) -> &'static str {
        self.format.content_type()
    }
}

/// Import payload. The format is taken from `format`, else from the filename
/// extension, else sniffed from the content.
#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImportRequest {
    pub filename: Option<String>,
    pub format: Option<TransferFormat>,
    #[validate(length(min = 1, message = "Import content is empty"))]
    pub content: String,
}

impl ImportRequest {
    pub fn resolved_format(&self) -> TransferFormat {
        self.format.unwrap_or_else(|| {
            detect_format(self.filename.as_deref().unwrap_or_default(), &self.content)
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImportRowError {
    /// Zero-based position of the record in the file
    pub index: usize,
    pub sku: Option<String>,
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub format: TransferFormat,
    pub total: usize,
    pub created: usize,
    pub updated: usize,
    pub failed: usize,
    pub errors: Vec<ImportRowError>,
}

/// Validation outcome for one record of a dry run
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecordValidation {
    pub index: usize,
    pub sku: Option<String>,
    #[serde(flatten)]
    pub result: ValidationResult,
}

enum Upserted {
    Created,
    Updated,
}

/// Fields of one import record after type checks.
#[derive(Debug)]
struct ImportRecord {
    sku: String,
    name: String,
    product_type: ProductType,
    status: Option<ProductStatus>,
    attribute_set_id: Option<i32>,
    categories: Vec<CategoryInput>,
    attributes: Vec<AttributeInput>,
}

/// A category link. `code` wins over `category_id` so files move between
/// databases whose ids differ.
#[derive(Debug, PartialEq)]
struct CategoryInput {
    category_id: Option<i32>,
    code: Option<String>,
    position: i32,
}

#[derive(Debug)]
struct AttributeInput {
    attribute_id: Option<i32>,
    attribute_code: Option<String>,
    store_view_id: Option<i32>,
    value: Value,
}

/// Service moving products between the database and transfer files
#[derive(Clone)]
pub struct ProductTransferService {
    db_pool: Arc<DbPool>,
    product_attributes: ProductAttributeService,
    product_categories: ProductCategoryService,
    assets: AssetService,
}

impl ProductTransferService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self {
            product_attributes: ProductAttributeService::new(db_pool.clone()),
            product_categories: ProductCategoryService::new(db_pool.clone()),
            assets: AssetService::new(db_pool.clone()),
            db_pool,
        }
    }

    /// Renders products (all, or the given ids) with their attribute set,
    /// categories, assets and attribute values.
    #[instrument(skip(self))]
    pub async fn export(
        &self,
        format: TransferFormat,
        ids: Option<Vec<i32>>,
    ) -> Result<ExportFile, ServiceError> {
        let records = self.load_records(ids).await?;
        let rows: Vec<_> = records.iter().map(ProductRecord::to_record).collect();
        let content = format_products(format, &rows)?;

        let filename = format!(
            "products-export-{}.{}",
            Utc::now().format("%Y%m%d%H%M%S"),
            format.extension()
        );
        info!(format = %format, products = rows.len(), bytes = content.len(), "Products exported");
        Ok(ExportFile {
            format,
            filename,
            content,
        })
    }

    pub async fn load_records(&self, ids: Option<Vec<i32>>) -> Result<Vec<ProductRecord>, ServiceError> {
        let db = &*self.db_pool;
        let mut query = product::Entity::find().order_by_asc(product::Column::Id);
        if let Some(ids) = ids {
            query = query.filter(product::Column::Id.is_in(ids));
        }
        let products = query.all(db).await.map_err(db_failure("fetch products"))?;
        if products.is_empty() {
            return Ok(Vec::new());
        }

        let product_ids: Vec<i32> = products.iter().map(|p| p.id).collect();
        let set_ids: Vec<i32> = products.iter().filter_map(|p| p.attribute_set_id).collect();
        let sets: HashMap<i32, attribute_set::Model> = if set_ids.is_empty() {
            HashMap::new()
        } else {
            attribute_set::Entity::find()
                .filter(attribute_set::Column::Id.is_in(set_ids))
                .all(db)
                .await
                .map_err(db_failure("fetch attribute sets"))?
                .into_iter()
                .map(|s| (s.id, s))
                .collect()
        };
        let mut categories = self
            .product_categories
            .links_for_products(&product_ids)
            .await?;
        let mut assets = self.assets.assets_for_products(&product_ids).await?;
        let mut attributes = self
            .product_attributes
            .entries_for_products(&product_ids)
            .await?;

        Ok(products
            .into_iter()
            .map(|product| {
                let id = product.id;
                let attribute_set = product.attribute_set_id.and_then(|s| sets.get(&s).cloned());
                let mut record = ProductRecord::new(product);
                record.attribute_set = attribute_set;
                record.categories = categories.remove(&id).unwrap_or_default();
                record.assets = assets.remove(&id).unwrap_or_default();
                record.attributes = attributes.remove(&id).unwrap_or_default();
                record
            })
            .collect())
    }

    /// Validates every record without writing anything.
    #[instrument(skip(self, request), fields(bytes = request.content.len()))]
    pub fn validate_import(
        &self,
        request: &ImportRequest,
    ) -> Result<Vec<RecordValidation>, ServiceError> {
        request.validate()?;
        let products = parse_products(request.resolved_format(), &request.content)?;
        Ok(products
            .iter()
            .enumerate()
            .map(|(index, product)| RecordValidation {
                index,
                sku: sku_of(product),
                result: validate_product_data(product),
            })
            .collect())
    }

    /// Imports products, creating new SKUs and updating existing ones. Each
    /// record is written in its own transaction; a failing record is reported
    /// and the rest continue.
    #[instrument(skip(self, request), fields(bytes = request.content.len()))]
    pub async fn import(&self, request: ImportRequest) -> Result<ImportSummary, ServiceError> {
        request.validate()?;
        let format = request.resolved_format();
        let products = parse_products(format, &request.content)?;

        let mut summary = ImportSummary {
            format,
            total: products.len(),
            ..Default::default()
        };

        for (index, raw) in products.iter().enumerate() {
            let sku = sku_of(raw);
            let outcome = match read_record(raw) {
                Ok(record) => self.import_record(record).await,
                Err(errors) => Err(errors),
            };
            match outcome {
                Ok(Upserted::Created) => summary.created += 1,
                Ok(Upserted::Updated) => summary.updated += 1,
                Err(errors) => {
                    debug!(index, sku = ?sku, ?errors, "Import record rejected");
                    summary.failed += 1;
                    summary.errors.push(ImportRowError { index, sku, errors });
                }
            }
        }

        info!(
            format = %format,
            total = summary.total,
            created = summary.created,
            updated = summary.updated,
            failed = summary.failed,
            "Product import finished"
        );
        Ok(summary)
    }

    async fn import_record(&self, record: ImportRecord) -> Result<Upserted, Vec<String>> {
        let internal = |e: ServiceError| vec![e.response_message()];

        let txn = self.db_pool.begin().await.map_err(|e| {
            warn!(error = %e, "Failed to begin import transaction");
            vec!["Database error".to_string()]
        })?;

        let result = upsert_record(&txn, record).await;
        match result {
            Ok(outcome) => {
                txn.commit()
                    .await
                    .map_err(db_failure("commit imported product"))
                    .map_err(internal)?;
                Ok(outcome)
            }
            Err(errors) => {
                if let Err(e) = txn.rollback().await {
                    warn!(error = %e, "Failed to roll back import record");
                }
                Err(errors)
            }
        }
    }
}

async fn upsert_record(
    txn: &DatabaseTransaction,
    record: ImportRecord,
) -> Result<Upserted, Vec<String>> {
    let internal = |e: ServiceError| vec![e.response_message()];

    if let Some(set_id) = record.attribute_set_id {
        let exists = attribute_set::Entity::find_by_id(set_id)
            .one(txn)
            .await
            .map_err(db_failure("fetch attribute set"))
            .map_err(internal)?
            .is_some();
        if !exists {
            return Err(vec![format!("Attribute set {} does not exist", set_id)]);
        }
    }

    let existing = product::Entity::find()
        .filter(product::Column::Sku.eq(record.sku.as_str()))
        .one(txn)
        .await
        .map_err(db_failure("fetch product by SKU"))
        .map_err(internal)?;

    let now = Utc::now();
    let (product, outcome) = match existing {
        Some(product) => {
            let mut active: product::ActiveModel = product.into();
            active.name = Set(record.name);
            active.product_type = Set(record.product_type);
            if let Some(status) = record.status {
                active.status = Set(status);
            }
            active.attribute_set_id = Set(record.attribute_set_id);
            active.updated_at = Set(now);
            let product = active
                .update(txn)
                .await
                .map_err(db_failure("update imported product"))
                .map_err(internal)?;
            (product, Upserted::Updated)
        }
        None => {
            let product = product::ActiveModel {
                sku: Set(record.sku),
                name: Set(record.name),
                product_type: Set(record.product_type),
                status: Set(record.status.unwrap_or_default()),
                attribute_set_id: Set(record.attribute_set_id),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            }
            .insert(txn)
            .await
            .map_err(db_failure("create imported product"))
            .map_err(internal)?;
            (product, Upserted::Created)
        }
    };

    let mut errors = Vec::new();

    for input in record.categories {
        let found = match (input.code.as_deref(), input.category_id) {
            (Some(code), _) => {
                category::Entity::find()
                    .filter(category::Column::Code.eq(code))
                    .one(txn)
                    .await
            }
            (None, Some(id)) => category::Entity::find_by_id(id).one(txn).await,
            (None, None) => {
                errors.push("Category entry needs code or categoryId".to_string());
                continue;
            }
        }
        .map_err(db_failure("fetch category"))
        .map_err(internal)?;

        let Some(found) = found else {
            let label = input
                .code
                .clone()
                .or_else(|| input.category_id.map(|id| id.to_string()))
                .unwrap_or_default();
            errors.push(format!("Category {} does not exist", label));
            continue;
        };
        link_product(txn, product.id, found.id, input.position)
            .await
            .map_err(internal)?;
    }

    for input in record.attributes {
        let attribute = match (input.attribute_code.as_deref(), input.attribute_id) {
            (Some(code), _) => {
                attribute::Entity::find()
                    .filter(attribute::Column::Code.eq(code))
                    .one(txn)
                    .await
            }
            (None, Some(id)) => attribute::Entity::find_by_id(id).one(txn).await,
            (None, None) => {
                errors.push("Attribute entry needs attributeCode or attributeId".to_string());
                continue;
            }
        }
        .map_err(db_failure("fetch attribute"))
        .map_err(internal)?;

        let label = input
            .attribute_code
            .clone()
            .or_else(|| input.attribute_id.map(|id| id.to_string()))
            .unwrap_or_default();
        let Some(attribute) = attribute else {
            errors.push(format!("Unknown attribute '{}'", label));
            continue;
        };
        let value = match AttributeValue::from_json(attribute.data_type, &input.value) {
            Ok(value) => value,
            Err(e) => {
                errors.push(format!("{}: {}", attribute.code, e));
                continue;
            }
        };
        if let Err(e) = write_value(txn, product.id, &attribute, input.store_view_id, value).await {
            errors.push(e.response_message());
        }
    }

    if errors.is_empty() {
        Ok(outcome)
    } else {
        Err(errors)
    }
}

fn sku_of(product: &Value) -> Option<String> {
    product
        .get("sku")
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .map(|s| s.trim().to_string())
}

/// Checks a parsed record and extracts its typed fields. Every problem is
/// collected before giving up.
fn read_record(raw: &Value) -> Result<ImportRecord, Vec<String>> {
    let validation = validate_product_data(raw);
    if !validation.valid {
        return Err(validation.errors);
    }

    let mut errors = Vec::new();
    let text = |key: &str| {
        raw.get(key)
            .and_then(Value::as_str)
            .map(|s| s.trim().to_string())
            .unwrap_or_default()
    };

    let product_type = ProductType::from_str(&text("productType")).unwrap_or(ProductType::Simple);

    let status = match raw.get("status") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.trim().is_empty() => None,
        Some(Value::String(s)) => match ProductStatus::from_str(s.trim()) {
            Ok(status) => Some(status),
            Err(_) => {
                errors.push(format!("Invalid status: {}", s));
                None
            }
        },
        Some(other) => {
            errors.push(format!("Invalid status: {}", other));
            None
        }
    };

    let attribute_set_id = optional_id(raw.get("attributeSetId")).unwrap_or_else(|e| {
        errors.push(format!("attributeSetId {}", e));
        None
    });

    let mut categories = Vec::new();
    for (i, entry) in list_entries(raw.get("categories")).into_iter().enumerate() {
        let id = optional_id(entry.get("categoryId"));
        let position = optional_id(entry.get("position"));
        let code = entry
            .get("code")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        match (id, position) {
            (Ok(None), _) if code.is_none() => {
                errors.push(format!("categories[{}] needs code or categoryId", i))
            }
            (Ok(category_id), Ok(position)) => categories.push(CategoryInput {
                category_id,
                code,
                position: position.unwrap_or(0),
            }),
            (Err(e), _) => errors.push(format!("categories[{}].categoryId {}", i, e)),
            (_, Err(e)) => errors.push(format!("categories[{}].position {}", i, e)),
        }
    }

    let mut attributes = Vec::new();
    for (i, entry) in list_entries(raw.get("attributes")).into_iter().enumerate() {
        let attribute_id = optional_id(entry.get("attributeId"));
        let store_view_id = optional_id(entry.get("storeViewId"));
        match (attribute_id, store_view_id) {
            (Ok(attribute_id), Ok(store_view_id)) => attributes.push(AttributeInput {
                attribute_id,
                attribute_code: entry
                    .get("attributeCode")
                    .and_then(Value::as_str)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string),
                store_view_id,
                value: entry.get("value").cloned().unwrap_or(Value::Null),
            }),
            (Err(e), _) => errors.push(format!("attributes[{}].attributeId {}", i, e)),
            (_, Err(e)) => errors.push(format!("attributes[{}].storeViewId {}", i, e)),
        }
    }

    if !errors.is_empty() {
        return Err(errors);
    }
    Ok(ImportRecord {
        sku: text("sku"),
        name: text("name"),
        product_type,
        status,
        attribute_set_id,
        categories,
        attributes,
    })
}

/// Reads an optional integer id. XML and CSV deliver numbers as text, and an
/// empty value means absent.
fn optional_id(value: Option<&Value>) -> Result<Option<i32>, String> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_i64()
            .and_then(|i| i32::try_from(i).ok())
            .map(Some)
            .ok_or_else(|| format!("is not a valid id: {}", n)),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => s
            .trim()
            .parse::<i32>()
            .map(Some)
            .map_err(|_| format!("is not a valid id: {}", s)),
        Some(other) => Err(format!("is not a valid id: {}", other)),
    }
}

/// Relation lists: an array, or an empty XML element (`""`) for none.
fn list_entries(value: Option<&Value>) -> Vec<&Value> {
    match value {
        Some(Value::Array(items)) => items.iter().collect(),
        Some(obj @ Value::Object(_)) => vec![obj],
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    #[test]
    fn ids_accept_numbers_and_numeric_text() {
        assert_eq!(optional_id(Some(&json!(7))), Ok(Some(7)));
        assert_eq!(optional_id(Some(&json!("12"))), Ok(Some(12)));
        assert_eq!(optional_id(Some(&json!(""))), Ok(None));
        assert_eq!(optional_id(Some(&Value::Null)), Ok(None));
        assert_eq!(optional_id(None), Ok(None));
        assert!(optional_id(Some(&json!("abc"))).is_err());
        assert!(optional_id(Some(&json!(1.5))).is_err());
    }

    #[test]
    fn record_reads_xml_shaped_values() {
        let raw = json!({
            "sku": "XML-1",
            "name": "From XML",
            "productType": "BUNDLE",
            "status": "APPROVAL",
            "attributeSetId": "3",
            "categories": [{"categoryId": "4", "code": "shoes", "position": "2"}],
            "attributes": {"attributeCode": "color", "value": "red"}
        });
        let record = read_record(&raw).unwrap();
        assert_eq!(record.product_type, ProductType::Bundle);
        assert_eq!(record.status, Some(ProductStatus::Approval));
        assert_eq!(record.attribute_set_id, Some(3));
        assert_eq!(
            record.categories,
            vec![CategoryInput {
                category_id: Some(4),
                code: Some("shoes".to_string()),
                position: 2,
            }]
        );
        assert_eq!(record.attributes.len(), 1);
        assert_eq!(record.attributes[0].attribute_code.as_deref(), Some("color"));
    }

    #[test]
    fn record_collects_every_problem() {
        let raw = json!({
            "sku": "BAD-1",
            "name": "Broken",
            "productType": "SIMPLE",
            "status": "ARCHIVED",
            "attributeSetId": "x",
            "categories": [{"position": "1"}]
        });
        let errors = read_record(&raw).unwrap_err();
        assert_eq!(
            errors,
            vec![
                "Invalid status: ARCHIVED",
                "attributeSetId is not a valid id: x",
                "categories[0] needs code or categoryId",
            ]
        );
    }

    #[test]
    fn record_reports_validation_failures_first() {
        let errors = read_record(&json!({"name": "No SKU"})).unwrap_err();
        assert_matches!(errors.as_slice(), [first, ..] if first == "SKU is required and must be a string");
    }

    #[test]
    fn empty_relation_cells_mean_none() {
        assert!(list_entries(Some(&json!(""))).is_empty());
        assert!(list_entries(None).is_empty());
        assert_eq!(list_entries(Some(&json!([{"a": 1}, {"a": 2}]))).len(), 2);
    }

    #[test]
    fn request_format_resolution() {
        let request = ImportRequest {
            filename: Some("catalog.csv".into()),
            format: None,
            content: "{\"products\": []}".into(),
        };
        assert_eq!(request.resolved_format(), TransferFormat::Csv);

        let request = ImportRequest {
            filename: None,
            format: Some(TransferFormat::Xml),
            content: "{}".into(),
        };
        assert_eq!(request.resolved_format(), TransferFormat::Xml);

        let request = ImportRequest {
            filename: None,
            format: None,
            content: "<products/>".into(),
        };
        assert_eq!(request.resolved_format(), TransferFormat::Xml);
    }
}
