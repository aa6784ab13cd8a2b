// Product data model
pub mod attribute_groups;
pub mod attribute_sets;
pub mod attributes;
pub mod product_attributes;
pub mod products;

// Catalog structure
pub mod assets;
pub mod categories;
pub mod category_translations;
pub mod product_categories;

// Store scopes
pub mod stores;

// Collaboration
pub mod teams;
pub mod workspaces;

// Import / export
pub mod product_transfer;
pub mod transfer;

// Analytics
pub mod analytics;

use crate::errors::ServiceError;
use sea_orm::DbErr;
use tracing::error;

/// Maps a database error to `ServiceError`, logging the failed action.
pub(crate) fn db_failure(action: &'static str) -> impl Fn(DbErr) -> ServiceError {
    move |e| {
        error!(error = %e, "Failed to {}", action);
        ServiceError::db_error(format!("Failed to {}: {}", action, e))
    }
}

/// URL-safe slug: lowercase ASCII alphanumerics separated by single dashes.
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_dash = false;
    for ch in input.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}

/// Total pages for a result set; zero when there are no items.
pub fn total_pages(total: u64, limit: u64) -> u64 {
    if limit == 0 {
        0
    } else {
        total.div_ceil(limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_collapses_separators() {
        assert_eq!(slugify("  Summer Sale -- 2024! "), "summer-sale-2024");
        assert_eq!(slugify("Électronique"), "lectronique");
        assert_eq!(slugify("***"), "");
    }

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages(0, 20), 0);
        assert_eq!(total_pages(20, 20), 1);
        assert_eq!(total_pages(21, 20), 2);
        assert_eq!(total_pages(5, 0), 0);
    }
}
