//! sea-orm entities for the PIM schema.

// EAV core
pub mod attribute;
pub mod attribute_group;
pub mod attribute_set;
pub mod attribute_set_attribute;
pub mod product;
pub mod product_attribute_value;

// Catalog structure
pub mod asset;
pub mod category;
pub mod category_translation;
pub mod product_asset;
pub mod product_category;

// Store scopes
pub mod locale;
pub mod store;
pub mod store_view;

// Collaboration
pub mod team;
pub mod team_member;
pub mod workspace;
pub mod workspace_invitation;
pub mod workspace_member;
