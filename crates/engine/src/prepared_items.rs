//! Prepared items: house-made components (sauces, stocks, par-cooked
//! goods) that recipes can reference as ingredients alongside purchased
//! master ingredients.
//!
//! `item_id` is unique per organization and is the spreadsheet import
//! conflict key, mirroring `item_code` on master ingredients.

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};

use crate::allergens::AllergenProfile;

/// Snapshot of one prepared item.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PreparedItem {
    pub id: Uuid,
    pub item_id: String,
    pub product: String,
    pub category: String,
    pub station: String,
    pub sub_category: String,
    pub container: String,
    pub container_type: String,
    pub recipe_unit: String,
    pub cost_per_recipe_unit: f64,
    pub final_cost: f64,
    pub yield_percent: f64,
    pub storage_area: String,
    pub allergens: AllergenProfile,
}

/// Input for creating or replacing a prepared item.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PreparedItemInput {
    pub item_id: String,
    pub product: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub station: String,
    #[serde(default)]
    pub sub_category: String,
    #[serde(default)]
    pub container: String,
    #[serde(default)]
    pub container_type: String,
    #[serde(default)]
    pub recipe_unit: String,
    pub cost_per_recipe_unit: f64,
    pub final_cost: f64,
    pub yield_percent: f64,
    #[serde(default)]
    pub storage_area: String,
    #[serde(default)]
    pub allergens: AllergenProfile,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "prepared_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub organization_id: Uuid,
    pub item_id: String,
    pub product: String,
    pub category: String,
    pub station: String,
    pub sub_category: String,
    pub container: String,
    pub container_type: String,
    pub recipe_unit: String,
    pub cost_per_recipe_unit: f64,
    pub final_cost: f64,
    pub yield_percent: f64,
    pub storage_area: String,
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
    pub fn allergen_profile(&self) -> AllergenProfile {
        serde_json::from_value(self.allergens.clone()).unwrap_or_default()
    }
}

impl From<Model> for PreparedItem {
    fn from(model: Model) -> Self {
        let allergens = model.allergen_profile();
        Self {
            id: model.id,
            item_id: model.item_id,
            product: model.product,
            category: model.category,
            station: model.station,
            sub_category: model.sub_category,
            container: model.container,
            container_type: model.container_type,
            recipe_unit: model.recipe_unit,
            cost_per_recipe_unit: model.cost_per_recipe_unit,
            final_cost: model.final_cost,
            yield_percent: model.yield_percent,
            storage_area: model.storage_area,
            allergens,
        }
    }
}

pub(crate) fn active_model_from_input(
    id: Uuid,
    organization_id: Uuid,
    input: &PreparedItemInput,
    created_at: DateTimeUtc,
    updated_at: DateTimeUtc,
) -> ActiveModel {
    ActiveModel {
        id: ActiveValue::Set(id),
        organization_id: ActiveValue::Set(organization_id),
        item_id: ActiveValue::Set(input.item_id.clone()),
        product: ActiveValue::Set(input.product.clone()),
        category: ActiveValue::Set(input.category.clone()),
        station: ActiveValue::Set(input.station.clone()),
        sub_category: ActiveValue::Set(input.sub_category.clone()),
        container: ActiveValue::Set(input.container.clone()),
        container_type: ActiveValue::Set(input.container_type.clone()),
        recipe_unit: ActiveValue::Set(input.recipe_unit.clone()),
        cost_per_recipe_unit: ActiveValue::Set(input.cost_per_recipe_unit),
        final_cost: ActiveValue::Set(input.final_cost),
        yield_percent: ActiveValue::Set(input.yield_percent),
        storage_area: ActiveValue::Set(input.storage_area.clone()),
        allergens: ActiveValue::Set(
            serde_json::to_value(&input.allergens).unwrap_or_default(),
        ),
        created_at: ActiveValue::Set(created_at),
        updated_at: ActiveValue::Set(updated_at),
    }
}
