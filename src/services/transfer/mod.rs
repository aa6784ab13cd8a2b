//! Bidirectional product conversion between JSON, XML and CSV.
//!
//! Everything here is a pure, synchronous transform. Database access lives in
//! `services::product_transfer`.
//!
//! Round-trip notes:
//! - JSON keeps null fields; XML drops them, so a null field comes back absent.
//! - XML and CSV scalars come back as strings, except the CSV `id` and
//!   `attributeSetId` columns which are restored as integers.

pub mod export;
pub mod import;
pub mod record;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use utoipa::ToSchema;

pub use export::{flatten_for_csv, format_to_csv, format_to_json, format_to_xml, serialize_value};
pub use import::{
    detect_format, extract_element_data, parse_csv, parse_json, parse_xml, validate_product_data,
    ValidationResult,
};
pub use record::{AttributeEntry, ProductRecord, RecordValue};

#[derive(Debug, Error, PartialEq)]
pub enum TransferError {
    /// Malformed input; the message wraps the underlying parser error.
    #[error("{0}")]
    Parse(String),

    /// Well-formed input with the wrong structure.
    #[error("{0}")]
    Invalid(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("{0}")]
    Write(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TransferFormat {
    #[default]
    Json,
    Xml,
    Csv,
}

impl TransferFormat {
    pub fn content_type(&self) -> &'static str {
        match self {
            TransferFormat::Json => "application/json",
            TransferFormat::Xml => "application/xml",
            TransferFormat::Csv => "text/csv",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            TransferFormat::Json => "json",
            TransferFormat::Xml => "xml",
            TransferFormat::Csv => "csv",
        }
    }
}

impl fmt::Display for TransferFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for TransferFormat {
    type Err = TransferError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(TransferFormat::Json),
            "xml" => Ok(TransferFormat::Xml),
            "csv" => Ok(TransferFormat::Csv),
            other => Err(TransferError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// MIME type for a format name; `application/octet-stream` when unknown.
pub fn get_content_type(format: &str) -> &'static str {
    TransferFormat::from_str(format)
        .map(|f| f.content_type())
        .unwrap_or("application/octet-stream")
}

/// File extension for a format name; `txt` when unknown.
pub fn get_file_extension(format: &str) -> &'static str {
    TransferFormat::from_str(format)
        .map(|f| f.extension())
        .unwrap_or("txt")
}

/// Formats records in the requested format.
pub fn format_products(
    format: TransferFormat,
    products: &[RecordValue],
) -> Result<String, TransferError> {
    match format {
        TransferFormat::Json => format_to_json(products),
        TransferFormat::Xml => format_to_xml(products),
        TransferFormat::Csv => format_to_csv(products),
    }
}

/// Parses file content in the given format into product objects.
pub fn parse_products(format: TransferFormat, content: &str) -> Result<Vec<Value>, TransferError> {
    match format {
        TransferFormat::Json => parse_json(content),
        TransferFormat::Xml => parse_xml(content),
        TransferFormat::Csv => parse_csv(content),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_types_and_extensions() {
        assert_eq!(get_content_type("json"), "application/json");
        assert_eq!(get_content_type("xml"), "application/xml");
        assert_eq!(get_content_type("csv"), "text/csv");
        assert_eq!(get_content_type("unknown"), "application/octet-stream");
        assert_eq!(get_file_extension("CSV"), "csv");
        assert_eq!(get_file_extension("pdf"), "txt");
    }

    #[test]
    fn format_names_parse() {
        assert_eq!("Xml".parse::<TransferFormat>().unwrap(), TransferFormat::Xml);
        assert_eq!(
            "yaml".parse::<TransferFormat>(),
            Err(TransferError::UnsupportedFormat("yaml".into()))
        );
        assert_eq!(TransferFormat::Csv.to_string(), "csv");
    }
}
