use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "PIM API",
        version = "0.1.0",
        description = r#"
# Product Information Management API

Manages a product catalog on an entity-attribute-value model.

## Features

- **Products**: SKU-unique products moving through the enrichment workflow
- **Attributes**: typed attribute definitions, sets and groups
- **Attribute values**: global or store-view scoped typed values
- **Categories**: category tree with per-store-view translations
- **Assets**: media files attached to products by role
- **Stores**: stores, store views and locales
- **Workspaces**: members, teams and email invitations
- **Import/Export**: JSON, XML and CSV product files

## CSRF protection

Every POST, PUT, PATCH and DELETE under `/api/v1` needs a `csrf-token` header
holding a token obtained from `GET /api/v1/csrf-token`.

## Responses

Successes use `{ success, statusCode, message, data, meta? }`; list endpoints add
`meta: { total, page, limit, totalPages }`. Failures use
`{ success: false, statusCode, message, error? }`.

## Pagination

- `page`: Page number (default: 1)
- `limit`: Items per page (default: 20, max: 100)
        "#,
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development")
    ),
    tags(
        (name = "Products", description = "Product management endpoints"),
        (name = "Attributes", description = "Attribute definition endpoints"),
        (name = "Attribute Sets", description = "Attribute set and layout endpoints"),
        (name = "Attribute Groups", description = "Attribute group endpoints"),
        (name = "Product Attributes", description = "Typed attribute value endpoints"),
        (name = "Categories", description = "Category, translation and product link endpoints"),
        (name = "Assets", description = "Asset and product asset endpoints"),
        (name = "Stores", description = "Store, store view and locale endpoints"),
        (name = "Workspaces", description = "Workspace, member and invitation endpoints"),
        (name = "Teams", description = "Team endpoints"),
        (name = "Import/Export", description = "Product file import and export"),
        (name = "Analytics", description = "Dashboard metrics"),
        (name = "Security", description = "CSRF token issuance"),
        (name = "Health", description = "Health check endpoints")
    ),
    paths(
        // Products
        crate::handlers::products::list_products,
        crate::handlers::products::create_product,
        crate::handlers::products::get_product,
        crate::handlers::products::get_product_by_sku,
        crate::handlers::products::update_product,
        crate::handlers::products::update_product_status,
        crate::handlers::products::delete_product,
        crate::handlers::products::export_products,
        crate::handlers::products::import_products,
        crate::handlers::products::validate_import,

        // Attributes
        crate::handlers::attributes::list_attributes,
        crate::handlers::attributes::create_attribute,
        crate::handlers::attributes::get_attribute,
        crate::handlers::attributes::get_attribute_by_code,
        crate::handlers::attributes::update_attribute,
        crate::handlers::attributes::delete_attribute,

        // Attribute sets and groups
        crate::handlers::attribute_sets::list_attribute_sets,
        crate::handlers::attribute_sets::create_attribute_set,
        crate::handlers::attribute_sets::get_attribute_set,
        crate::handlers::attribute_sets::update_attribute_set,
        crate::handlers::attribute_sets::delete_attribute_set,
        crate::handlers::attribute_sets::get_set_layout,
        crate::handlers::attribute_sets::assign_attribute,
        crate::handlers::attribute_sets::remove_attribute,
        crate::handlers::attribute_sets::get_group_attributes,
        crate::handlers::attribute_sets::assign_group_attribute,
        crate::handlers::attribute_groups::list_attribute_groups,
        crate::handlers::attribute_groups::create_attribute_group,
        crate::handlers::attribute_groups::get_attribute_group,
        crate::handlers::attribute_groups::update_attribute_group,
        crate::handlers::attribute_groups::delete_attribute_group,

        // Attribute values
        crate::handlers::product_attributes::list_product_attributes,
        crate::handlers::product_attributes::set_product_attribute,
        crate::handlers::product_attributes::get_product_attribute,
        crate::handlers::product_attributes::delete_product_attribute,
        crate::handlers::product_attributes::delete_attribute_for_product,
        crate::handlers::product_attributes::delete_attribute_for_store_view,

        // Categories
        crate::handlers::categories::list_categories,
        crate::handlers::categories::create_category,
        crate::handlers::categories::get_root_categories,
        crate::handlers::categories::get_child_categories,
        crate::handlers::categories::get_category_tree,
        crate::handlers::categories::get_category,
        crate::handlers::categories::update_category,
        crate::handlers::categories::delete_category,
        crate::handlers::category_translations::list_translations,
        crate::handlers::category_translations::create_translation,
        crate::handlers::category_translations::get_translation,
        crate::handlers::category_translations::update_translation,
        crate::handlers::category_translations::delete_translation,
        crate::handlers::product_categories::list_links,
        crate::handlers::product_categories::link_product,
        crate::handlers::product_categories::unlink_product,

        // Assets
        crate::handlers::assets::list_assets,
        crate::handlers::assets::create_asset,
        crate::handlers::assets::get_asset,
        crate::handlers::assets::update_asset,
        crate::handlers::assets::delete_asset,
        crate::handlers::product_assets::list_product_assets,
        crate::handlers::product_assets::attach_asset,
        crate::handlers::product_assets::detach_asset,

        // Stores
        crate::handlers::stores::list_stores,
        crate::handlers::stores::create_store,
        crate::handlers::stores::get_store,
        crate::handlers::stores::get_store_by_code,
        crate::handlers::stores::update_store,
        crate::handlers::stores::delete_store,
        crate::handlers::store_views::list_store_views,
        crate::handlers::store_views::create_store_view,
        crate::handlers::store_views::get_store_view,
        crate::handlers::store_views::update_store_view,
        crate::handlers::store_views::delete_store_view,
        crate::handlers::locales::list_locales,
        crate::handlers::locales::create_locale,
        crate::handlers::locales::get_locale,
        crate::handlers::locales::update_locale,
        crate::handlers::locales::delete_locale,

        // Collaboration
        crate::handlers::workspaces::list_workspaces,
        crate::handlers::workspaces::create_workspace,
        crate::handlers::workspaces::get_workspace,
        crate::handlers::workspaces::update_workspace,
        crate::handlers::workspaces::delete_workspace,
        crate::handlers::workspaces::list_members,
        crate::handlers::workspaces::add_member,
        crate::handlers::workspaces::remove_member,
        crate::handlers::workspaces::list_invitations,
        crate::handlers::workspaces::create_invitation,
        crate::handlers::invitations::accept_invitation,
        crate::handlers::teams::list_teams,
        crate::handlers::teams::create_team,
        crate::handlers::teams::get_team,
        crate::handlers::teams::update_team,
        crate::handlers::teams::delete_team,
        crate::handlers::teams::list_members,
        crate::handlers::teams::add_member,
        crate::handlers::teams::remove_member,

        // Operational
        crate::handlers::analytics::get_dashboard_metrics,
        crate::handlers::csrf::get_csrf_token,
        crate::handlers::health::health_check,
    ),
    components(
        schemas(
            crate::PageMeta,
            crate::errors::ErrorResponse,
            crate::services::transfer::TransferFormat,
        )
    )
)]
pub struct ApiDocV1;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDocV1::openapi())
        .config(utoipa_swagger_ui::Config::from("/api-docs/openapi.json").try_it_out_enabled(true))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_lists_core_paths() {
        let openapi = ApiDocV1::openapi();
        let json = serde_json::to_string_pretty(&openapi).unwrap();
        assert!(json.contains("PIM API"));
        assert!(json.contains("/api/v1/products/{id}/status"));
        assert!(json.contains("/api/v1/attribute-sets/{id}/groups/{group_id}/attributes"));
        assert!(json.contains("/api/v1/invitations/accept"));
    }
}
