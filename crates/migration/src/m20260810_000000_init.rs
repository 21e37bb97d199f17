//! Initial schema migration - creates all tables from scratch.
//!
//! Consolidated schema for Brigade:
//!
//! - `organizations`: tenant boundary, every catalog row hangs off one
//! - `users`: authentication, resolved to an organization
//! - `major_groups` / `food_categories` / `food_sub_categories`: the
//!   three-level food taxonomy
//! - `master_ingredients`: purchased catalog entries with derived costs
//! - `prepared_items`: house-made components referenceable by recipes
//! - `recipes`: authored recipe documents with JSON detail columns

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Organizations {
    Table,
    Id,
    Name,
}

#[derive(Iden)]
enum Users {
    Table,
    Username,
    Password,
    OrganizationId,
}

#[derive(Iden)]
enum MajorGroups {
    Table,
    Id,
    OrganizationId,
    Name,
    Description,
    Icon,
    Color,
    SortOrder,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum FoodCategories {
    Table,
    Id,
    OrganizationId,
    GroupId,
    Name,
    Description,
    SortOrder,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum FoodSubCategories {
    Table,
    Id,
    OrganizationId,
    CategoryId,
    Name,
    Description,
    SortOrder,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum MasterIngredients {
    Table,
    Id,
    OrganizationId,
    ItemCode,
    Product,
    Vendor,
    CaseSize,
    UnitsPerCase,
    CurrentPrice,
    UnitOfMeasure,
    RecipeUnitsPerCase,
    RecipeUnitType,
    YieldPercent,
    CostPerRecipeUnit,
    StorageArea,
    MajorGroup,
    Category,
    SubCategory,
    Allergens,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum PreparedItems {
    Table,
    Id,
    OrganizationId,
    ItemId,
    Product,
    Category,
    Station,
    SubCategory,
    Container,
    ContainerType,
    RecipeUnit,
    CostPerRecipeUnit,
    FinalCost,
    YieldPercent,
    StorageArea,
    Allergens,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Recipes {
    Table,
    Id,
    OrganizationId,
    RecipeType,
    Name,
    Category,
    SubCategory,
    Station,
    Description,
    PrepTimeMinutes,
    CookTimeMinutes,
    YieldValue,
    YieldUnit,
    IngredientCost,
    LaborCost,
    TotalCost,
    CostPerUnit,
    Ingredients,
    Steps,
    Equipment,
    Storage,
    Training,
    QualityControl,
    Allergens,
    Versions,
    CurrentVersion,
    CreatedBy,
    UpdatedBy,
    CreatedAt,
    UpdatedAt,
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Organizations
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Organizations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Organizations::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Organizations::Name).string().not_null())
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Users
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Username)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::Password).string().not_null())
                    .col(ColumnDef::new(Users::OrganizationId).uuid().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-users-organization_id")
                            .from(Users::Table, Users::OrganizationId)
                            .to(Organizations::Table, Organizations::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Taxonomy
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(MajorGroups::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MajorGroups::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(MajorGroups::OrganizationId).uuid().not_null())
                    .col(ColumnDef::new(MajorGroups::Name).string().not_null())
                    .col(ColumnDef::new(MajorGroups::Description).string())
                    .col(ColumnDef::new(MajorGroups::Icon).string().not_null())
                    .col(ColumnDef::new(MajorGroups::Color).string().not_null())
                    .col(ColumnDef::new(MajorGroups::SortOrder).integer().not_null())
                    .col(
                        ColumnDef::new(MajorGroups::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MajorGroups::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-major_groups-organization_id")
                            .from(MajorGroups::Table, MajorGroups::OrganizationId)
                            .to(Organizations::Table, Organizations::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(FoodCategories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FoodCategories::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(FoodCategories::OrganizationId)
                            .uuid()
                            .not_null(),
                    )
                    .col(ColumnDef::new(FoodCategories::GroupId).uuid().not_null())
                    .col(ColumnDef::new(FoodCategories::Name).string().not_null())
                    .col(ColumnDef::new(FoodCategories::Description).string())
                    .col(
                        ColumnDef::new(FoodCategories::SortOrder)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FoodCategories::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FoodCategories::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-food_categories-group_id")
                            .from(FoodCategories::Table, FoodCategories::GroupId)
                            .to(MajorGroups::Table, MajorGroups::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(FoodSubCategories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FoodSubCategories::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(FoodSubCategories::OrganizationId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FoodSubCategories::CategoryId)
                            .uuid()
                            .not_null(),
                    )
                    .col(ColumnDef::new(FoodSubCategories::Name).string().not_null())
                    .col(ColumnDef::new(FoodSubCategories::Description).string())
                    .col(
                        ColumnDef::new(FoodSubCategories::SortOrder)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FoodSubCategories::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FoodSubCategories::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-food_sub_categories-category_id")
                            .from(
                                FoodSubCategories::Table,
                                FoodSubCategories::CategoryId,
                            )
                            .to(FoodCategories::Table, FoodCategories::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 4. Master ingredients
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(MasterIngredients::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MasterIngredients::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(MasterIngredients::OrganizationId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MasterIngredients::ItemCode)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MasterIngredients::Product)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(MasterIngredients::Vendor).string().not_null())
                    .col(
                        ColumnDef::new(MasterIngredients::CaseSize)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MasterIngredients::UnitsPerCase)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MasterIngredients::CurrentPrice)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MasterIngredients::UnitOfMeasure)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MasterIngredients::RecipeUnitsPerCase)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MasterIngredients::RecipeUnitType)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MasterIngredients::YieldPercent)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MasterIngredients::CostPerRecipeUnit)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MasterIngredients::StorageArea)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(MasterIngredients::MajorGroup).uuid())
                    .col(ColumnDef::new(MasterIngredients::Category).uuid())
                    .col(ColumnDef::new(MasterIngredients::SubCategory).uuid())
                    .col(
                        ColumnDef::new(MasterIngredients::Allergens)
                            .json()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MasterIngredients::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MasterIngredients::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-master_ingredients-organization_id")
                            .from(
                                MasterIngredients::Table,
                                MasterIngredients::OrganizationId,
                            )
                            .to(Organizations::Table, Organizations::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // The spreadsheet import upserts on this key.
        manager
            .create_index(
                Index::create()
                    .name("idx-master_ingredients-org-item_code-unique")
                    .table(MasterIngredients::Table)
                    .col(MasterIngredients::OrganizationId)
                    .col(MasterIngredients::ItemCode)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 5. Prepared items
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(PreparedItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PreparedItems::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PreparedItems::OrganizationId)
                            .uuid()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PreparedItems::ItemId).string().not_null())
                    .col(ColumnDef::new(PreparedItems::Product).string().not_null())
                    .col(ColumnDef::new(PreparedItems::Category).string().not_null())
                    .col(ColumnDef::new(PreparedItems::Station).string().not_null())
                    .col(
                        ColumnDef::new(PreparedItems::SubCategory)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PreparedItems::Container).string().not_null())
                    .col(
                        ColumnDef::new(PreparedItems::ContainerType)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PreparedItems::RecipeUnit).string().not_null())
                    .col(
                        ColumnDef::new(PreparedItems::CostPerRecipeUnit)
                            .double()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PreparedItems::FinalCost).double().not_null())
                    .col(
                        ColumnDef::new(PreparedItems::YieldPercent)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PreparedItems::StorageArea)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PreparedItems::Allergens).json().not_null())
                    .col(
                        ColumnDef::new(PreparedItems::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PreparedItems::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-prepared_items-organization_id")
                            .from(PreparedItems::Table, PreparedItems::OrganizationId)
                            .to(Organizations::Table, Organizations::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-prepared_items-org-item_id-unique")
                    .table(PreparedItems::Table)
                    .col(PreparedItems::OrganizationId)
                    .col(PreparedItems::ItemId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 6. Recipes
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Recipes::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Recipes::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Recipes::OrganizationId).uuid().not_null())
                    .col(ColumnDef::new(Recipes::RecipeType).string().not_null())
                    .col(ColumnDef::new(Recipes::Name).string().not_null())
                    .col(ColumnDef::new(Recipes::Category).string().not_null())
                    .col(ColumnDef::new(Recipes::SubCategory).string().not_null())
                    .col(ColumnDef::new(Recipes::Station).string().not_null())
                    .col(ColumnDef::new(Recipes::Description).string().not_null())
                    .col(
                        ColumnDef::new(Recipes::PrepTimeMinutes)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Recipes::CookTimeMinutes)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Recipes::YieldValue).double().not_null())
                    .col(ColumnDef::new(Recipes::YieldUnit).string().not_null())
                    .col(ColumnDef::new(Recipes::IngredientCost).double().not_null())
                    .col(ColumnDef::new(Recipes::LaborCost).double().not_null())
                    .col(ColumnDef::new(Recipes::TotalCost).double().not_null())
                    .col(ColumnDef::new(Recipes::CostPerUnit).double().not_null())
                    .col(ColumnDef::new(Recipes::Ingredients).json().not_null())
                    .col(ColumnDef::new(Recipes::Steps).json().not_null())
                    .col(ColumnDef::new(Recipes::Equipment).json().not_null())
                    .col(ColumnDef::new(Recipes::Storage).json().not_null())
                    .col(ColumnDef::new(Recipes::Training).json().not_null())
                    .col(ColumnDef::new(Recipes::QualityControl).json().not_null())
                    .col(ColumnDef::new(Recipes::Allergens).json().not_null())
                    .col(ColumnDef::new(Recipes::Versions).json().not_null())
                    .col(ColumnDef::new(Recipes::CurrentVersion).string().not_null())
                    .col(ColumnDef::new(Recipes::CreatedBy).string().not_null())
                    .col(ColumnDef::new(Recipes::UpdatedBy).string().not_null())
                    .col(
                        ColumnDef::new(Recipes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Recipes::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-recipes-organization_id")
                            .from(Recipes::Table, Recipes::OrganizationId)
                            .to(Organizations::Table, Organizations::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-recipes-org-type")
                    .table(Recipes::Table)
                    .col(Recipes::OrganizationId)
                    .col(Recipes::RecipeType)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Recipes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PreparedItems::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(MasterIngredients::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(FoodSubCategories::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(FoodCategories::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(MajorGroups::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Organizations::Table).to_owned())
            .await?;
        Ok(())
    }
}
