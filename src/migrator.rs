use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_store_tables::Migration),
            Box::new(m20240101_000002_create_attribute_tables::Migration),
            Box::new(m20240101_000003_create_product_tables::Migration),
            Box::new(m20240101_000004_create_category_tables::Migration),
            Box::new(m20240101_000005_create_asset_tables::Migration),
            Box::new(m20240101_000006_create_workspace_tables::Migration),
        ]
    }
}

fn created_at<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col)
        .timestamp_with_time_zone()
        .not_null()
        .default(Expr::current_timestamp())
        .to_owned()
}

mod m20240101_000001_create_store_tables {
    use super::created_at;
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000001_create_store_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Locales::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Locales::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Locales::Code).string_len(16).not_null().unique_key())
                        .col(ColumnDef::new(Locales::Name).string().not_null())
                        .col(created_at(Locales::CreatedAt))
                        .col(created_at(Locales::UpdatedAt))
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Stores::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Stores::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Stores::Code).string_len(64).not_null().unique_key())
                        .col(ColumnDef::new(Stores::Name).string().not_null())
                        .col(
                            ColumnDef::new(Stores::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(created_at(Stores::CreatedAt))
                        .col(created_at(Stores::UpdatedAt))
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(StoreViews::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(StoreViews::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(StoreViews::Code)
                                .string_len(64)
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(StoreViews::Name).string().not_null())
                        .col(ColumnDef::new(StoreViews::StoreId).integer().not_null())
                        .col(ColumnDef::new(StoreViews::LocaleId).integer().not_null())
                        .col(
                            ColumnDef::new(StoreViews::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(created_at(StoreViews::CreatedAt))
                        .col(created_at(StoreViews::UpdatedAt))
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_store_views_store")
                                .from(StoreViews::Table, StoreViews::StoreId)
                                .to(Stores::Table, Stores::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_store_views_locale")
                                .from(StoreViews::Table, StoreViews::LocaleId)
                                .to(Locales::Table, Locales::Id)
                                .on_delete(ForeignKeyAction::Restrict),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(StoreViews::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Stores::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Locales::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub enum Locales {
        Table,
        Id,
        Code,
        Name,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    pub enum Stores {
        Table,
        Id,
        Code,
        Name,
        IsActive,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    pub enum StoreViews {
        Table,
        Id,
        Code,
        Name,
        StoreId,
        LocaleId,
        IsActive,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000002_create_attribute_tables {
    use super::created_at;
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000002_create_attribute_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Attributes::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Attributes::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(Attributes::Code)
                                .string_len(128)
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Attributes::Label).string().not_null())
                        .col(ColumnDef::new(Attributes::DataType).string_len(32).not_null())
                        .col(ColumnDef::new(Attributes::InputType).string_len(32).not_null())
                        .col(
                            ColumnDef::new(Attributes::IsRequired)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(Attributes::IsFilterable)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(Attributes::IsGlobal)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(created_at(Attributes::CreatedAt))
                        .col(created_at(Attributes::UpdatedAt))
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(AttributeSets::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(AttributeSets::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(AttributeSets::Code)
                                .string_len(128)
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(AttributeSets::Label).string().not_null())
                        .col(ColumnDef::new(AttributeSets::ProductType).string_len(32).null())
                        .col(
                            ColumnDef::new(AttributeSets::IsDefault)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(created_at(AttributeSets::CreatedAt))
                        .col(created_at(AttributeSets::UpdatedAt))
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(AttributeGroups::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(AttributeGroups::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(AttributeGroups::AttributeSetId)
                                .integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(AttributeGroups::Code).string_len(128).not_null())
                        .col(ColumnDef::new(AttributeGroups::Label).string().not_null())
                        .col(
                            ColumnDef::new(AttributeGroups::SortOrder)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(created_at(AttributeGroups::CreatedAt))
                        .col(created_at(AttributeGroups::UpdatedAt))
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_attribute_groups_set")
                                .from(AttributeGroups::Table, AttributeGroups::AttributeSetId)
                                .to(AttributeSets::Table, AttributeSets::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_attribute_groups_set_code")
                        .table(AttributeGroups::Table)
                        .col(AttributeGroups::AttributeSetId)
                        .col(AttributeGroups::Code)
                        .unique()
                        .if_not_exists()
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(AttributeSetAttributes::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(AttributeSetAttributes::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(AttributeSetAttributes::AttributeSetId)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(AttributeSetAttributes::AttributeGroupId)
                                .integer()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(AttributeSetAttributes::AttributeId)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(AttributeSetAttributes::SortOrder)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_set_attributes_set")
                                .from(
                                    AttributeSetAttributes::Table,
                                    AttributeSetAttributes::AttributeSetId,
                                )
                                .to(AttributeSets::Table, AttributeSets::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_set_attributes_group")
                                .from(
                                    AttributeSetAttributes::Table,
                                    AttributeSetAttributes::AttributeGroupId,
                                )
                                .to(AttributeGroups::Table, AttributeGroups::Id)
                                .on_delete(ForeignKeyAction::SetNull),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_set_attributes_attribute")
                                .from(
                                    AttributeSetAttributes::Table,
                                    AttributeSetAttributes::AttributeId,
                                )
                                .to(Attributes::Table, Attributes::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_set_attributes_unique")
                        .table(AttributeSetAttributes::Table)
                        .col(AttributeSetAttributes::AttributeSetId)
                        .col(AttributeSetAttributes::AttributeId)
                        .unique()
                        .if_not_exists()
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(AttributeSetAttributes::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(AttributeGroups::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(AttributeSets::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Attributes::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub enum Attributes {
        Table,
        Id,
        Code,
        Label,
        DataType,
        InputType,
        IsRequired,
        IsFilterable,
        IsGlobal,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    pub enum AttributeSets {
        Table,
        Id,
        Code,
        Label,
        ProductType,
        IsDefault,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    pub enum AttributeGroups {
        Table,
        Id,
        AttributeSetId,
        Code,
        Label,
        SortOrder,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum AttributeSetAttributes {
        Table,
        Id,
        AttributeSetId,
        AttributeGroupId,
        AttributeId,
        SortOrder,
    }
}

mod m20240101_000003_create_product_tables {
    use super::created_at;
    use super::m20240101_000001_create_store_tables::StoreViews;
    use super::m20240101_000002_create_attribute_tables::{AttributeSets, Attributes};
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000003_create_product_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Products::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Products::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Products::Sku).string_len(128).not_null().unique_key())
                        .col(ColumnDef::new(Products::Name).string().not_null())
                        .col(ColumnDef::new(Products::ProductType).string_len(32).not_null())
                        .col(
                            ColumnDef::new(Products::Status)
                                .string_len(32)
                                .not_null()
                                .default("DRAFT"),
                        )
                        .col(ColumnDef::new(Products::AttributeSetId).integer().null())
                        .col(created_at(Products::CreatedAt))
                        .col(created_at(Products::UpdatedAt))
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_products_attribute_set")
                                .from(Products::Table, Products::AttributeSetId)
                                .to(AttributeSets::Table, AttributeSets::Id)
                                .on_delete(ForeignKeyAction::SetNull),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_products_status")
                        .table(Products::Table)
                        .col(Products::Status)
                        .if_not_exists()
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(ProductAttributeValues::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ProductAttributeValues::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(ProductAttributeValues::ProductId)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ProductAttributeValues::AttributeId)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ProductAttributeValues::StoreViewId)
                                .integer()
                                .null(),
                        )
                        .col(ColumnDef::new(ProductAttributeValues::ValueString).string().null())
                        .col(ColumnDef::new(ProductAttributeValues::ValueText).text().null())
                        .col(ColumnDef::new(ProductAttributeValues::ValueInt).big_integer().null())
                        .col(
                            ColumnDef::new(ProductAttributeValues::ValueDecimal)
                                .decimal_len(16, 6)
                                .null(),
                        )
                        .col(ColumnDef::new(ProductAttributeValues::ValueBoolean).boolean().null())
                        .col(created_at(ProductAttributeValues::CreatedAt))
                        .col(created_at(ProductAttributeValues::UpdatedAt))
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_product_values_product")
                                .from(ProductAttributeValues::Table, ProductAttributeValues::ProductId)
                                .to(Products::Table, Products::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_product_values_attribute")
                                .from(
                                    ProductAttributeValues::Table,
                                    ProductAttributeValues::AttributeId,
                                )
                                .to(Attributes::Table, Attributes::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_product_values_store_view")
                                .from(
                                    ProductAttributeValues::Table,
                                    ProductAttributeValues::StoreViewId,
                                )
                                .to(StoreViews::Table, StoreViews::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_product_values_scope")
                        .table(ProductAttributeValues::Table)
                        .col(ProductAttributeValues::ProductId)
                        .col(ProductAttributeValues::AttributeId)
                        .col(ProductAttributeValues::StoreViewId)
                        .unique()
                        .if_not_exists()
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(ProductAttributeValues::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Products::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub enum Products {
        Table,
        Id,
        Sku,
        Name,
        ProductType,
        Status,
        AttributeSetId,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum ProductAttributeValues {
        Table,
        Id,
        ProductId,
        AttributeId,
        StoreViewId,
        ValueString,
        ValueText,
        ValueInt,
        ValueDecimal,
        ValueBoolean,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000004_create_category_tables {
    use super::created_at;
    use super::m20240101_000001_create_store_tables::StoreViews;
    use super::m20240101_000003_create_product_tables::Products;
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000004_create_category_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Categories::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Categories::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(Categories::Code)
                                .string_len(128)
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Categories::ParentId).integer().null())
                        .col(
                            ColumnDef::new(Categories::Position)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Categories::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(created_at(Categories::CreatedAt))
                        .col(created_at(Categories::UpdatedAt))
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_categories_parent")
                                .from(Categories::Table, Categories::ParentId)
                                .to(Categories::Table, Categories::Id)
                                .on_delete(ForeignKeyAction::Restrict),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(CategoryTranslations::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(CategoryTranslations::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(CategoryTranslations::CategoryId)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(CategoryTranslations::StoreViewId)
                                .integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(CategoryTranslations::Name).string().not_null())
                        .col(ColumnDef::new(CategoryTranslations::Slug).string().not_null())
                        .col(ColumnDef::new(CategoryTranslations::Description).text().null())
                        .col(created_at(CategoryTranslations::CreatedAt))
                        .col(created_at(CategoryTranslations::UpdatedAt))
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_category_translations_category")
                                .from(CategoryTranslations::Table, CategoryTranslations::CategoryId)
                                .to(Categories::Table, Categories::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_category_translations_store_view")
                                .from(
                                    CategoryTranslations::Table,
                                    CategoryTranslations::StoreViewId,
                                )
                                .to(StoreViews::Table, StoreViews::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_category_translations_scope")
                        .table(CategoryTranslations::Table)
                        .col(CategoryTranslations::CategoryId)
                        .col(CategoryTranslations::StoreViewId)
                        .unique()
                        .if_not_exists()
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(ProductCategories::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ProductCategories::ProductId)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ProductCategories::CategoryId)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ProductCategories::Position)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .primary_key(
                            Index::create()
                                .col(ProductCategories::ProductId)
                                .col(ProductCategories::CategoryId),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_product_categories_product")
                                .from(ProductCategories::Table, ProductCategories::ProductId)
                                .to(Products::Table, Products::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_product_categories_category")
                                .from(ProductCategories::Table, ProductCategories::CategoryId)
                                .to(Categories::Table, Categories::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(ProductCategories::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(CategoryTranslations::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Categories::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Categories {
        Table,
        Id,
        Code,
        ParentId,
        Position,
        IsActive,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum CategoryTranslations {
        Table,
        Id,
        CategoryId,
        StoreViewId,
        Name,
        Slug,
        Description,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum ProductCategories {
        Table,
        ProductId,
        CategoryId,
        Position,
    }
}

mod m20240101_000005_create_asset_tables {
    use super::created_at;
    use super::m20240101_000003_create_product_tables::Products;
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000005_create_asset_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Assets::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Assets::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Assets::FileName).string().not_null())
                        .col(ColumnDef::new(Assets::Url).string().not_null())
                        .col(ColumnDef::new(Assets::MimeType).string_len(128).not_null())
                        .col(ColumnDef::new(Assets::Size).big_integer().not_null().default(0))
                        .col(ColumnDef::new(Assets::AltText).string().null())
                        .col(created_at(Assets::CreatedAt))
                        .col(created_at(Assets::UpdatedAt))
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(ProductAssets::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(ProductAssets::ProductId).integer().not_null())
                        .col(ColumnDef::new(ProductAssets::AssetId).integer().not_null())
                        .col(
                            ColumnDef::new(ProductAssets::Role)
                                .string_len(32)
                                .not_null()
                                .default("IMAGE"),
                        )
                        .col(
                            ColumnDef::new(ProductAssets::Position)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .primary_key(
                            Index::create()
                                .col(ProductAssets::ProductId)
                                .col(ProductAssets::AssetId),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_product_assets_product")
                                .from(ProductAssets::Table, ProductAssets::ProductId)
                                .to(Products::Table, Products::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_product_assets_asset")
                                .from(ProductAssets::Table, ProductAssets::AssetId)
                                .to(Assets::Table, Assets::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(ProductAssets::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Assets::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Assets {
        Table,
        Id,
        FileName,
        Url,
        MimeType,
        Size,
        AltText,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum ProductAssets {
        Table,
        ProductId,
        AssetId,
        Role,
        Position,
    }
}

mod m20240101_000006_create_workspace_tables {
    use super::created_at;
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000006_create_workspace_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Workspaces::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Workspaces::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Workspaces::Name).string().not_null())
                        .col(
                            ColumnDef::new(Workspaces::Slug)
                                .string_len(128)
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Workspaces::OwnerId).string().not_null())
                        .col(created_at(Workspaces::CreatedAt))
                        .col(created_at(Workspaces::UpdatedAt))
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(WorkspaceMembers::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(WorkspaceMembers::WorkspaceId)
                                .integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(WorkspaceMembers::UserId).string().not_null())
                        .col(ColumnDef::new(WorkspaceMembers::Role).string_len(32).not_null())
                        .col(created_at(WorkspaceMembers::JoinedAt))
                        .primary_key(
                            Index::create()
                                .col(WorkspaceMembers::WorkspaceId)
                                .col(WorkspaceMembers::UserId),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_workspace_members_workspace")
                                .from(WorkspaceMembers::Table, WorkspaceMembers::WorkspaceId)
                                .to(Workspaces::Table, Workspaces::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Teams::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Teams::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Teams::WorkspaceId).integer().not_null())
                        .col(ColumnDef::new(Teams::Name).string().not_null())
                        .col(created_at(Teams::CreatedAt))
                        .col(created_at(Teams::UpdatedAt))
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_teams_workspace")
                                .from(Teams::Table, Teams::WorkspaceId)
                                .to(Workspaces::Table, Workspaces::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(TeamMembers::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(TeamMembers::TeamId).integer().not_null())
                        .col(ColumnDef::new(TeamMembers::UserId).string().not_null())
                        .col(ColumnDef::new(TeamMembers::Role).string_len(32).not_null())
                        .col(created_at(TeamMembers::JoinedAt))
                        .primary_key(
                            Index::create()
                                .col(TeamMembers::TeamId)
                                .col(TeamMembers::UserId),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_team_members_team")
                                .from(TeamMembers::Table, TeamMembers::TeamId)
                                .to(Teams::Table, Teams::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(WorkspaceInvitations::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(WorkspaceInvitations::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(WorkspaceInvitations::WorkspaceId)
                                .integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(WorkspaceInvitations::Email).string().not_null())
                        .col(
                            ColumnDef::new(WorkspaceInvitations::Role)
                                .string_len(32)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(WorkspaceInvitations::TokenHash)
                                .string_len(64)
                                .not_null()
                                .unique_key(),
                        )
                        .col(
                            ColumnDef::new(WorkspaceInvitations::ExpiresAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(WorkspaceInvitations::AcceptedAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(created_at(WorkspaceInvitations::CreatedAt))
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_workspace_invitations_workspace")
                                .from(
                                    WorkspaceInvitations::Table,
                                    WorkspaceInvitations::WorkspaceId,
                                )
                                .to(Workspaces::Table, Workspaces::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(WorkspaceInvitations::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(TeamMembers::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Teams::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(WorkspaceMembers::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Workspaces::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Workspaces {
        Table,
        Id,
        Name,
        Slug,
        OwnerId,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum WorkspaceMembers {
        Table,
        WorkspaceId,
        UserId,
        Role,
        JoinedAt,
    }

    #[derive(DeriveIden)]
    enum Teams {
        Table,
        Id,
        WorkspaceId,
        Name,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum TeamMembers {
        Table,
        TeamId,
        UserId,
        Role,
        JoinedAt,
    }

    #[derive(DeriveIden)]
    enum WorkspaceInvitations {
        Table,
        Id,
        WorkspaceId,
        Email,
        Role,
        TokenHash,
        ExpiresAt,
        AcceptedAt,
        CreatedAt,
    }
}
