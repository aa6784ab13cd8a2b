use crate::{
    db::DbPool,
    entities::{
        attribute::{self, DataType, Entity as Attribute, InputType},
        product_attribute_value,
    },
    errors::ServiceError,
    services::db_failure,
};
use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

static ATTRIBUTE_CODE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z][a-z0-9_]*$").unwrap());

fn validate_attribute_code(code: &str) -> Result<(), ValidationError> {
    if ATTRIBUTE_CODE_RE.is_match(code) {
        Ok(())
    } else {
        let mut err = ValidationError::new("attribute_code");
        err.message = Some(
            "Attribute code must start with a lowercase letter and contain only lowercase letters, digits and underscores"
                .into(),
        );
        Err(err)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAttributeInput {
    #[validate(length(min = 1, max = 64), custom = "validate_attribute_code")]
    pub code: String,
    #[validate(length(min = 1, max = 255))]
    pub label: String,
    pub data_type: DataType,
    #[serde(default = "default_input_type")]
    pub input_type: InputType,
    #[serde(default)]
    pub is_required: bool,
    #[serde(default)]
    pub is_filterable: bool,
    #[serde(default)]
    pub is_global: bool,
}

fn default_input_type() -> InputType {
    InputType::Text
}

/// `code` may be sent back unchanged; a different code is rejected.
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAttributeInput {
    pub code: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub label: Option<String>,
    pub data_type: Option<DataType>,
    pub input_type: Option<InputType>,
    pub is_required: Option<bool>,
    pub is_filterable: Option<bool>,
    pub is_global: Option<bool>,
}

#[derive(Debug, Clone, Default)]
pub struct AttributeFilter {
    pub search: Option<String>,
    pub data_type: Option<DataType>,
    pub is_filterable: Option<bool>,
}

/// Service for EAV attribute definitions
#[derive(Clone)]
pub struct AttributeService {
    db_pool: Arc<DbPool>,
}

impl AttributeService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    #[instrument(skip(self))]
    pub async fn create_attribute(
        &self,
        input: CreateAttributeInput,
    ) -> Result<attribute::Model, ServiceError> {
        input.validate()?;

        if self.find_by_code(&input.code).await?.is_some() {
            return Err(ServiceError::Conflict(format!(
                "Attribute with code '{}' already exists",
                input.code
            )));
        }

        let now = Utc::now();
        let attribute = attribute::ActiveModel {
            code: Set(input.code),
            label: Set(input.label),
            data_type: Set(input.data_type),
            input_type: Set(input.input_type),
            is_required: Set(input.is_required),
            is_filterable: Set(input.is_filterable),
            is_global: Set(input.is_global),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&*self.db_pool)
        .await
        .map_err(db_failure("create attribute"))?;

        info!(attribute_id = attribute.id, code = %attribute.code, "Attribute created");
        Ok(attribute)
    }

    #[instrument(skip(self))]
    pub async fn get_attribute(&self, id: i32) -> Result<attribute::Model, ServiceError> {
        Attribute::find_by_id(id)
            .one(&*self.db_pool)
            .await
            .map_err(db_failure("fetch attribute"))?
            .ok_or_else(|| ServiceError::not_found("Attribute", id))
    }

    #[instrument(skip(self))]
    pub async fn get_attribute_by_code(&self, code: &str) -> Result<attribute::Model, ServiceError> {
        self.find_by_code(code).await?.ok_or_else(|| {
            ServiceError::NotFound(format!("Attribute with code '{}' not found", code))
        })
    }

    pub(crate) async fn find_by_code(
        &self,
        code: &str,
    ) -> Result<Option<attribute::Model>, ServiceError> {
        Attribute::find()
            .filter(attribute::Column::Code.eq(code))
            .one(&*self.db_pool)
            .await
            .map_err(db_failure("fetch attribute by code"))
    }

    #[instrument(skip(self))]
    pub async fn list_attributes(
        &self,
        filter: AttributeFilter,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<attribute::Model>, u64), ServiceError> {
        let mut query = Attribute::find();
        if let Some(search) = filter.search.filter(|s| !s.trim().is_empty()) {
            let term = search.trim().to_string();
            query = query.filter(
                sea_orm::Condition::any()
                    .add(attribute::Column::Code.contains(&term))
                    .add(attribute::Column::Label.contains(&term)),
            );
        }
        if let Some(data_type) = filter.data_type {
            query = query.filter(attribute::Column::DataType.eq(data_type));
        }
        if let Some(is_filterable) = filter.is_filterable {
            query = query.filter(attribute::Column::IsFilterable.eq(is_filterable));
        }

        let paginator = query
            .order_by_asc(attribute::Column::Code)
            .paginate(&*self.db_pool, limit);
        let total = paginator
            .num_items()
            .await
            .map_err(db_failure("count attributes"))?;
        let attributes = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(db_failure("fetch attributes"))?;
        Ok((attributes, total))
    }

    #[instrument(skip(self))]
    pub async fn update_attribute(
        &self,
        id: i32,
        input: UpdateAttributeInput,
    ) -> Result<attribute::Model, ServiceError> {
        input.validate()?;
        let attribute = self.get_attribute(id).await?;

        if let Some(ref code) = input.code {
            if code != &attribute.code {
                return Err(ServiceError::ValidationError(format!(
                    "Attribute code is immutable (currently '{}')",
                    attribute.code
                )));
            }
        }

        if let Some(data_type) = input.data_type {
            if data_type != attribute.data_type && self.has_values(id).await? {
                return Err(ServiceError::Conflict(format!(
                    "Cannot change data type of attribute '{}' while products hold values for it",
                    attribute.code
                )));
            }
        }

        let mut active: attribute::ActiveModel = attribute.into();
        if let Some(label) = input.label {
            active.label = Set(label);
        }
        if let Some(data_type) = input.data_type {
            active.data_type = Set(data_type);
        }
        if let Some(input_type) = input.input_type {
            active.input_type = Set(input_type);
        }
        if let Some(is_required) = input.is_required {
            active.is_required = Set(is_required);
        }
        if let Some(is_filterable) = input.is_filterable {
            active.is_filterable = Set(is_filterable);
        }
        if let Some(is_global) = input.is_global {
            active.is_global = Set(is_global);
        }
        active.updated_at = Set(Utc::now());

        let attribute = active
            .update(&*self.db_pool)
            .await
            .map_err(db_failure("update attribute"))?;
        info!(attribute_id = id, "Attribute updated");
        Ok(attribute)
    }

    /// Deletes the attribute; its values and set memberships cascade.
    #[instrument(skip(self))]
    pub async fn delete_attribute(&self, id: i32) -> Result<(), ServiceError> {
        self.get_attribute(id).await?;
        product_attribute_value::Entity::delete_many()
            .filter(product_attribute_value::Column::AttributeId.eq(id))
            .exec(&*self.db_pool)
            .await
            .map_err(db_failure("delete attribute values"))?;
        Attribute::delete_by_id(id)
            .exec(&*self.db_pool)
            .await
            .map_err(db_failure("delete attribute"))?;
        info!(attribute_id = id, "Attribute deleted");
        Ok(())
    }

    async fn has_values(&self, attribute_id: i32) -> Result<bool, ServiceError> {
        let count = product_attribute_value::Entity::find()
            .filter(product_attribute_value::Column::AttributeId.eq(attribute_id))
            .count(&*self.db_pool)
            .await
            .map_err(db_failure("count attribute values"))?;
        Ok(count > 0)
    }
}
