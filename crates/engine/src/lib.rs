//! The brigade engine: catalog data, costing and the operations on top.
//!
//! Everything is scoped to an organization. Domain types live next to
//! their sea-orm entities; the pure logic (costing, validation,
//! versioning, import coercion) has no database dependency and the
//! organization-scoped operations live under [`ops`].

pub use allergens::{Allergen, AllergenProfile, CustomAllergen, MAX_CUSTOM_ALLERGENS};
pub use costing::{
    DEFAULT_LABOR_RATE_PER_HOUR, RecipeCosts, calculate_recipe_costs,
    cost_per_recipe_unit, parse_decimal, validate_ingredient_costs,
    weighted_yield_percent,
};
pub use error::EngineError;
pub use food_categories::FoodCategory;
pub use food_sub_categories::FoodSubCategory;
pub use import::{
    IMPORT_BATCH_SIZE, ImportRow, ImportedIngredientRow, coerce_flag,
    coerce_number, normalize_master_ingredient_row, normalize_prepared_item_row,
};
pub use major_groups::MajorGroup;
pub use master_ingredients::{MasterIngredient, MasterIngredientInput};
pub use ops::{Engine, EngineBuilder, RecipeListFilter, ReorderDirection};
pub use prepared_items::{PreparedItem, PreparedItemInput};
pub use recipes::{
    EquipmentItem, IngredientSource, MeasuredRange, Recipe, RecipeIngredient,
    RecipeStep, RecipeStorage, RecipeTraining, RecipeType, RecipeVersion,
    RecipeYield, SkillLevel,
};
pub use selection::EditorSelection;
pub use validation::validate_recipe;
pub use versioning::{RecipeUpdate, apply_update, bump_patch};

pub mod allergens;
pub mod costing;
mod error;
pub mod food_categories;
pub mod food_sub_categories;
pub mod import;
pub mod major_groups;
pub mod master_ingredients;
pub mod ops;
pub mod organizations;
pub mod prepared_items;
pub mod recipes;
pub mod selection;
pub mod users;
mod util;
pub mod validation;
pub mod versioning;

type ResultEngine<T> = Result<T, EngineError>;
