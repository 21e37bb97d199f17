//! Recipes: the full authored document plus the derived cost figures.
//!
//! Scalar fields (name, times, costs, version) live in table columns so
//! lists and searches stay cheap; the structured parts of the document
//! (ingredients, steps, storage, training, quality control, version
//! history) persist as JSON columns and are decoded on read.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Whether a recipe produces a house-made component or a plated menu item.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecipeType {
    Prepared,
    Final,
}

impl RecipeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecipeType::Prepared => "prepared",
            RecipeType::Final => "final",
        }
    }
}

impl TryFrom<&str> for RecipeType {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "prepared" => Ok(RecipeType::Prepared),
            "final" => Ok(RecipeType::Final),
            other => Err(EngineError::Validation(format!(
                "unknown recipe type \"{other}\""
            ))),
        }
    }
}

/// Where an ingredient line gets its unit cost from.
///
/// Raw lines reference a master ingredient by `item_code`; prepared lines
/// reference a prepared item by id. The tag is flattened into the
/// ingredient object on the wire.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum IngredientSource {
    Raw { item_code: String },
    Prepared { prepared_item_id: Uuid },
}

/// One ingredient line. `quantity` stays a string as authored; costing
/// parses it leniently. `cost` is a cached extension (unit cost times
/// quantity) refreshed on every recompute, never authoritative.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecipeIngredient {
    #[serde(flatten)]
    pub source: IngredientSource,
    pub name: String,
    pub quantity: String,
    pub unit: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub cost: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StepTemperature {
    pub value: f64,
    pub unit: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StepDuration {
    pub value: f64,
    pub unit: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QualityCheck {
    pub description: String,
    pub criteria: String,
}

/// Reference to an uploaded photo or video attached to a step.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MediaRef {
    pub media_type: String,
    pub url: String,
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RecipeStep {
    pub id: String,
    pub description: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub sub_steps: Vec<String>,
    #[serde(default)]
    pub equipment: Vec<String>,
    #[serde(default)]
    pub temperature: Option<StepTemperature>,
    #[serde(default)]
    pub duration: Option<StepDuration>,
    #[serde(default)]
    pub quality_checks: Vec<QualityCheck>,
    #[serde(default)]
    pub warnings: Vec<String>,
    #[serde(default)]
    pub tips: Vec<String>,
    #[serde(default)]
    pub media: Vec<MediaRef>,
    #[serde(default)]
    pub is_quality_control_point: bool,
    #[serde(default)]
    pub is_critical_control_point: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EquipmentItem {
    pub name: String,
    #[serde(default)]
    pub station: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MeasuredRange {
    pub min: f64,
    pub max: f64,
    pub unit: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RecipeStorage {
    #[serde(default)]
    pub temperature: Option<MeasuredRange>,
    #[serde(default)]
    pub humidity: Option<MeasuredRange>,
    #[serde(default)]
    pub container: String,
    #[serde(default)]
    pub container_type: String,
    #[serde(default)]
    pub fifo_labeling: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillLevel {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RecipeTraining {
    #[serde(default)]
    pub skill_level: Option<SkillLevel>,
    #[serde(default)]
    pub common_mistakes: Vec<String>,
    #[serde(default)]
    pub certifications: Vec<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TemperatureCheck {
    pub stage: String,
    pub min_temp: f64,
    pub max_temp: f64,
    pub unit: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct QualityControl {
    #[serde(default)]
    pub temperature_checks: Vec<TemperatureCheck>,
    #[serde(default)]
    pub visual_standards: Vec<String>,
    #[serde(default)]
    pub texture_guidelines: Vec<String>,
}

/// One entry in the version history. `current_version` on the recipe
/// always equals the last entry's `version`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecipeVersion {
    pub version: String,
    pub date: DateTime<Utc>,
    pub author: String,
    pub changes: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecipeYield {
    pub value: f64,
    pub unit: String,
}

impl Default for RecipeYield {
    fn default() -> Self {
        Self { value: 1.0, unit: String::new() }
    }
}

/// The full recipe document as the engine hands it to callers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub recipe_type: RecipeType,
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub sub_category: String,
    #[serde(default)]
    pub station: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub prep_time_minutes: u32,
    #[serde(default)]
    pub cook_time_minutes: u32,
    #[serde(rename = "yield", default)]
    pub recipe_yield: RecipeYield,
    #[serde(default)]
    pub ingredients: Vec<RecipeIngredient>,
    #[serde(default)]
    pub steps: Vec<RecipeStep>,
    #[serde(default)]
    pub equipment: Vec<EquipmentItem>,
    #[serde(default)]
    pub storage: RecipeStorage,
    #[serde(default)]
    pub training: RecipeTraining,
    #[serde(default)]
    pub quality_control: QualityControl,
    #[serde(default)]
    pub allergens: Vec<String>,
    #[serde(default)]
    pub ingredient_cost: f64,
    #[serde(default)]
    pub labor_cost: f64,
    #[serde(default)]
    pub total_cost: f64,
    #[serde(default)]
    pub cost_per_unit: f64,
    #[serde(default)]
    pub versions: Vec<RecipeVersion>,
    #[serde(default)]
    pub current_version: String,
    #[serde(default)]
    pub created_by: String,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_by: String,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "recipes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub organization_id: Uuid,
    pub recipe_type: String,
    pub name: String,
    pub category: String,
    pub sub_category: String,
    pub station: String,
    pub description: String,
    pub prep_time_minutes: i32,
    pub cook_time_minutes: i32,
    pub yield_value: f64,
    pub yield_unit: String,
    pub ingredient_cost: f64,
    pub labor_cost: f64,
    pub total_cost: f64,
    pub cost_per_unit: f64,
    pub ingredients: Json,
    pub steps: Json,
    pub equipment: Json,
    pub storage: Json,
    pub training: Json,
    pub quality_control: Json,
    pub allergens: Json,
    pub versions: Json,
    pub current_version: String,
    pub created_by: String,
    pub updated_by: String,
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

fn decode<T: serde::de::DeserializeOwned>(
    value: &Json,
    column: &str,
) -> Result<T, EngineError> {
    serde_json::from_value(value.clone()).map_err(|err| {
        EngineError::Validation(format!("corrupt {column} document: {err}"))
    })
}

fn encode<T: Serialize>(value: &T, column: &str) -> Result<Json, EngineError> {
    serde_json::to_value(value).map_err(|err| {
        EngineError::Validation(format!("unencodable {column} document: {err}"))
    })
}

impl TryFrom<Model> for Recipe {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            recipe_type: RecipeType::try_from(model.recipe_type.as_str())?,
            name: model.name,
            category: model.category,
            sub_category: model.sub_category,
            station: model.station,
            description: model.description,
            prep_time_minutes: model.prep_time_minutes.max(0) as u32,
            cook_time_minutes: model.cook_time_minutes.max(0) as u32,
            recipe_yield: RecipeYield {
                value: model.yield_value,
                unit: model.yield_unit,
            },
            ingredients: decode(&model.ingredients, "ingredients")?,
            steps: decode(&model.steps, "steps")?,
            equipment: decode(&model.equipment, "equipment")?,
            storage: decode(&model.storage, "storage")?,
            training: decode(&model.training, "training")?,
            quality_control: decode(&model.quality_control, "quality_control")?,
            allergens: decode(&model.allergens, "allergens")?,
            ingredient_cost: model.ingredient_cost,
            labor_cost: model.labor_cost,
            total_cost: model.total_cost,
            cost_per_unit: model.cost_per_unit,
            versions: decode(&model.versions, "versions")?,
            current_version: model.current_version,
            created_by: model.created_by,
            updated_by: model.updated_by,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

impl Recipe {
    pub(crate) fn to_active_model(
        &self,
        organization_id: Uuid,
    ) -> Result<ActiveModel, EngineError> {
        Ok(ActiveModel {
            id: ActiveValue::Set(self.id),
            organization_id: ActiveValue::Set(organization_id),
            recipe_type: ActiveValue::Set(self.recipe_type.as_str().to_owned()),
            name: ActiveValue::Set(self.name.clone()),
            category: ActiveValue::Set(self.category.clone()),
            sub_category: ActiveValue::Set(self.sub_category.clone()),
            station: ActiveValue::Set(self.station.clone()),
            description: ActiveValue::Set(self.description.clone()),
            prep_time_minutes: ActiveValue::Set(self.prep_time_minutes as i32),
            cook_time_minutes: ActiveValue::Set(self.cook_time_minutes as i32),
            yield_value: ActiveValue::Set(self.recipe_yield.value),
            yield_unit: ActiveValue::Set(self.recipe_yield.unit.clone()),
            ingredient_cost: ActiveValue::Set(self.ingredient_cost),
            labor_cost: ActiveValue::Set(self.labor_cost),
            total_cost: ActiveValue::Set(self.total_cost),
            cost_per_unit: ActiveValue::Set(self.cost_per_unit),
            ingredients: ActiveValue::Set(encode(&self.ingredients, "ingredients")?),
            steps: ActiveValue::Set(encode(&self.steps, "steps")?),
            equipment: ActiveValue::Set(encode(&self.equipment, "equipment")?),
            storage: ActiveValue::Set(encode(&self.storage, "storage")?),
            training: ActiveValue::Set(encode(&self.training, "training")?),
            quality_control: ActiveValue::Set(encode(
                &self.quality_control,
                "quality_control",
            )?),
            allergens: ActiveValue::Set(encode(&self.allergens, "allergens")?),
            versions: ActiveValue::Set(encode(&self.versions, "versions")?),
            current_version: ActiveValue::Set(self.current_version.clone()),
            created_by: ActiveValue::Set(self.created_by.clone()),
            updated_by: ActiveValue::Set(self.updated_by.clone()),
            created_at: ActiveValue::Set(self.created_at),
            updated_at: ActiveValue::Set(self.updated_at),
        })
    }
}
