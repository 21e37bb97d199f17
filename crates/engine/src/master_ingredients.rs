//! Master ingredients: the purchasable catalog entries recipes cost
//! against.
//!
//! `item_code` is unique per organization and doubles as the spreadsheet
//! import conflict key. `cost_per_recipe_unit` is derived (see
//! [`crate::costing::cost_per_recipe_unit`]) and stored for fast reads.

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};

use crate::allergens::AllergenProfile;

/// Snapshot of one master ingredient, with taxonomy names resolved where
/// the referenced nodes still exist.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MasterIngredient {
    pub id: Uuid,
    pub item_code: String,
    pub product: String,
    pub vendor: String,
    pub case_size: String,
    pub units_per_case: String,
    pub current_price: f64,
    pub unit_of_measure: String,
    pub recipe_units_per_case: f64,
    pub recipe_unit_type: String,
    pub yield_percent: f64,
    pub cost_per_recipe_unit: f64,
    pub storage_area: String,
    pub major_group: Option<Uuid>,
    pub category: Option<Uuid>,
    pub sub_category: Option<Uuid>,
    /// `None` when unclassified or when the taxonomy node was deleted
    /// after assignment (dangling references are tolerated on read).
    pub major_group_name: Option<String>,
    pub category_name: Option<String>,
    pub sub_category_name: Option<String>,
    pub allergens: AllergenProfile,
}

/// Input for creating or replacing a master ingredient. Derived fields are
/// computed by the engine.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MasterIngredientInput {
    pub item_code: String,
    pub product: String,
    #[serde(default)]
    pub vendor: String,
    #[serde(default)]
    pub case_size: String,
    #[serde(default)]
    pub units_per_case: String,
    pub current_price: f64,
    #[serde(default)]
    pub unit_of_measure: String,
    pub recipe_units_per_case: f64,
    #[serde(default)]
    pub recipe_unit_type: String,
    pub yield_percent: f64,
    #[serde(default)]
    pub storage_area: String,
    #[serde(default)]
    pub major_group: Option<Uuid>,
    #[serde(default)]
    pub category: Option<Uuid>,
    #[serde(default)]
    pub sub_category: Option<Uuid>,
    #[serde(default)]
    pub allergens: AllergenProfile,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "master_ingredients")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub organization_id: Uuid,
    pub item_code: String,
    pub product: String,
    pub vendor: String,
    pub case_size: String,
    pub units_per_case: String,
    pub current_price: f64,
    pub unit_of_measure: String,
    pub recipe_units_per_case: f64,
    pub recipe_unit_type: String,
    pub yield_percent: f64,
    pub cost_per_recipe_unit: f64,
    pub storage_area: String,
    pub major_group: Option<Uuid>,
    pub category: Option<Uuid>,
    pub sub_category: Option<Uuid>,
    pub allergens: Json,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::organizations::Entity",
        from = "Column::OrganizationId",
        to = "super::organizations::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Organization,
}

impl Related<super::organizations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Organization.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Decode the stored allergen document, falling back to an empty
    /// profile for rows written before allergen tracking existed.
    pub fn allergen_profile(&self) -> AllergenProfile {
        serde_json::from_value(self.allergens.clone()).unwrap_or_default()
    }
}

pub(crate) fn active_model_from_input(
    id: Uuid,
    organization_id: Uuid,
    input: &MasterIngredientInput,
    cost_per_recipe_unit: f64,
    created_at: DateTimeUtc,
    updated_at: DateTimeUtc,
) -> ActiveModel {
    ActiveModel {
        id: ActiveValue::Set(id),
        organization_id: ActiveValue::Set(organization_id),
        item_code: ActiveValue::Set(input.item_code.clone()),
        product: ActiveValue::Set(input.product.clone()),
        vendor: ActiveValue::Set(input.vendor.clone()),
        case_size: ActiveValue::Set(input.case_size.clone()),
        units_per_case: ActiveValue::Set(input.units_per_case.clone()),
        current_price: ActiveValue::Set(input.current_price),
        unit_of_measure: ActiveValue::Set(input.unit_of_measure.clone()),
        recipe_units_per_case: ActiveValue::Set(input.recipe_units_per_case),
        recipe_unit_type: ActiveValue::Set(input.recipe_unit_type.clone()),
        yield_percent: ActiveValue::Set(input.yield_percent),
        cost_per_recipe_unit: ActiveValue::Set(cost_per_recipe_unit),
        storage_area: ActiveValue::Set(input.storage_area.clone()),
        major_group: ActiveValue::Set(input.major_group),
        category: ActiveValue::Set(input.category),
        sub_category: ActiveValue::Set(input.sub_category),
        allergens: ActiveValue::Set(
            serde_json::to_value(&input.allergens).unwrap_or_default(),
        ),
        created_at: ActiveValue::Set(created_at),
        updated_at: ActiveValue::Set(updated_at),
    }
}
