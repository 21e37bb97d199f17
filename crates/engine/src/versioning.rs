//! Version-bump policy for recipe updates.
//!
//! Only changes to the fields that affect what a cook produces count as
//! significant: ingredients, steps, equipment, storage, quality control,
//! allergens. A significant update increments the patch segment and
//! appends a history entry; anything else just moves the last-modified
//! stamps. There is no major or minor bump path.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::recipes::{
    EquipmentItem, QualityControl, Recipe, RecipeIngredient, RecipeStep,
    RecipeStorage, RecipeTraining, RecipeVersion, RecipeYield,
};
use crate::{EngineError, ResultEngine};

/// Partial update over a recipe document. Absent fields are left alone.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct RecipeUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub sub_category: Option<String>,
    #[serde(default)]
    pub station: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub prep_time_minutes: Option<u32>,
    #[serde(default)]
    pub cook_time_minutes: Option<u32>,
    #[serde(rename = "yield", default)]
    pub recipe_yield: Option<RecipeYield>,
    #[serde(default)]
    pub ingredients: Option<Vec<RecipeIngredient>>,
    #[serde(default)]
    pub steps: Option<Vec<RecipeStep>>,
    #[serde(default)]
    pub equipment: Option<Vec<EquipmentItem>>,
    #[serde(default)]
    pub storage: Option<RecipeStorage>,
    #[serde(default)]
    pub training: Option<RecipeTraining>,
    #[serde(default)]
    pub quality_control: Option<QualityControl>,
    #[serde(default)]
    pub allergens: Option<Vec<String>>,
}

impl RecipeUpdate {
    /// Whether this update touches any field that warrants a version bump.
    pub fn is_significant(&self) -> bool {
        self.ingredients.is_some()
            || self.steps.is_some()
            || self.equipment.is_some()
            || self.storage.is_some()
            || self.quality_control.is_some()
            || self.allergens.is_some()
    }

    /// Fixed change-list descriptions for the touched significant fields,
    /// in a stable order.
    pub fn changes(&self) -> Vec<String> {
        let mut changes = Vec::new();
        if self.ingredients.is_some() {
            changes.push("Updated ingredients".to_owned());
        }
        if self.steps.is_some() {
            changes.push("Modified recipe steps".to_owned());
        }
        if self.equipment.is_some() {
            changes.push("Updated equipment requirements".to_owned());
        }
        if self.storage.is_some() {
            changes.push("Modified storage requirements".to_owned());
        }
        if self.quality_control.is_some() {
            changes.push("Updated quality control standards".to_owned());
        }
        if self.allergens.is_some() {
            changes.push("Modified allergen information".to_owned());
        }
        changes
    }
}

/// Increment the patch segment of a `major.minor.patch` version string.
pub fn bump_patch(version: &str) -> ResultEngine<String> {
    let mut parts = version.split('.');
    let (Some(major), Some(minor), Some(patch), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(EngineError::Validation(format!(
            "malformed version \"{version}\""
        )));
    };
    let patch: u64 = patch.parse().map_err(|_| {
        EngineError::Validation(format!("malformed version \"{version}\""))
    })?;
    Ok(format!("{major}.{minor}.{}", patch + 1))
}

/// Apply an update to a recipe in place, bumping the version and
/// appending a history entry when the update is significant. Derived
/// costs are the caller's job to recompute afterwards.
pub fn apply_update(
    recipe: &mut Recipe,
    update: RecipeUpdate,
    author: &str,
    now: DateTime<Utc>,
) -> ResultEngine<()> {
    let significant = update.is_significant();
    let changes = update.changes();

    if let Some(name) = update.name {
        recipe.name = name;
    }
    if let Some(category) = update.category {
        recipe.category = category;
    }
    if let Some(sub_category) = update.sub_category {
        recipe.sub_category = sub_category;
    }
    if let Some(station) = update.station {
        recipe.station = station;
    }
    if let Some(description) = update.description {
        recipe.description = description;
    }
    if let Some(minutes) = update.prep_time_minutes {
        recipe.prep_time_minutes = minutes;
    }
    if let Some(minutes) = update.cook_time_minutes {
        recipe.cook_time_minutes = minutes;
    }
    if let Some(recipe_yield) = update.recipe_yield {
        recipe.recipe_yield = recipe_yield;
    }
    if let Some(ingredients) = update.ingredients {
        recipe.ingredients = ingredients;
    }
    if let Some(steps) = update.steps {
        recipe.steps = steps;
    }
    if let Some(equipment) = update.equipment {
        recipe.equipment = equipment;
    }
    if let Some(storage) = update.storage {
        recipe.storage = storage;
    }
    if let Some(training) = update.training {
        recipe.training = training;
    }
    if let Some(quality_control) = update.quality_control {
        recipe.quality_control = quality_control;
    }
    if let Some(allergens) = update.allergens {
        recipe.allergens = allergens;
    }

    recipe.updated_by = author.to_owned();
    recipe.updated_at = now;

    if significant {
        let next = bump_patch(&recipe.current_version)?;
        recipe.versions.push(RecipeVersion {
            version: next.clone(),
            date: now,
            author: author.to_owned(),
            changes,
        });
        recipe.current_version = next;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patch_bump_keeps_major_and_minor() {
        assert_eq!(bump_patch("1.0.0"), Ok("1.0.1".to_owned()));
        assert_eq!(bump_patch("2.3.9"), Ok("2.3.10".to_owned()));
        assert!(bump_patch("1.0").is_err());
        assert!(bump_patch("1.0.x").is_err());
        assert!(bump_patch("1.0.0.0").is_err());
    }

    #[test]
    fn change_list_uses_fixed_descriptions() {
        let update = RecipeUpdate {
            steps: Some(Vec::new()),
            allergens: Some(vec!["peanut".to_owned()]),
            ..Default::default()
        };
        assert!(update.is_significant());
        assert_eq!(
            update.changes(),
            vec![
                "Modified recipe steps".to_owned(),
                "Modified allergen information".to_owned(),
            ]
        );
    }

    #[test]
    fn cosmetic_update_is_not_significant() {
        let update = RecipeUpdate {
            name: Some("Renamed".to_owned()),
            description: Some("New blurb".to_owned()),
            training: Some(RecipeTraining::default()),
            ..Default::default()
        };
        assert!(!update.is_significant());
        assert!(update.changes().is_empty());
    }
}
