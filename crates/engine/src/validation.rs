//! Recipe validation. Every check runs and every violation is collected;
//! callers get the full list in one pass instead of fixing errors one
//! resubmission at a time.

use crate::costing::parse_decimal;
use crate::recipes::{
    IngredientSource, Recipe, RecipeIngredient, RecipeStep, RecipeStorage,
};

/// Validate a recipe document for saving. Returns one human-readable
/// message per violation, empty when the recipe is valid.
pub fn validate_recipe(recipe: &Recipe) -> Vec<String> {
    let mut errors = Vec::new();

    if recipe.name.trim().is_empty() {
        errors.push("Recipe name is required".to_owned());
    }
    if recipe.category.trim().is_empty() {
        errors.push("Category is required".to_owned());
    }

    if recipe.ingredients.is_empty() {
        errors.push("At least one ingredient is required".to_owned());
    } else {
        for (index, ingredient) in recipe.ingredients.iter().enumerate() {
            let position = index + 1;
            for err in validate_ingredient(ingredient) {
                errors.push(format!("Ingredient {position}: {err}"));
            }
        }
    }

    if recipe.steps.is_empty() {
        errors.push("At least one step is required".to_owned());
    } else {
        for (index, step) in recipe.steps.iter().enumerate() {
            let position = index + 1;
            for err in validate_step(step) {
                errors.push(format!("Step {position}: {err}"));
            }
        }
    }

    for (index, equipment) in recipe.equipment.iter().enumerate() {
        if equipment.name.trim().is_empty() {
            errors.push(format!("Equipment {}: Name is required", index + 1));
        }
    }

    errors.extend(validate_storage(&recipe.storage));

    if recipe.training.skill_level.is_none() {
        errors.push("Skill level is required".to_owned());
    }

    for (index, check) in
        recipe.quality_control.temperature_checks.iter().enumerate()
    {
        let position = index + 1;
        if check.stage.trim().is_empty() {
            errors.push(format!("Temperature check {position}: Stage is required"));
        }
        if check.min_temp >= check.max_temp {
            errors.push(format!(
                "Temperature check {position}: Min temperature must be less than max temperature"
            ));
        }
    }

    if recipe.versions.is_empty() || recipe.current_version.is_empty() {
        errors.push("Version information is required".to_owned());
    }

    errors
}

fn validate_ingredient(ingredient: &RecipeIngredient) -> Vec<String> {
    let mut errors = Vec::new();

    if ingredient.name.trim().is_empty() {
        errors.push("Name is required".to_owned());
    }
    if ingredient.quantity.is_empty() || parse_decimal(&ingredient.quantity).is_nan()
    {
        errors.push("Valid quantity is required".to_owned());
    }
    if ingredient.unit.trim().is_empty() {
        errors.push("Unit is required".to_owned());
    }
    if let IngredientSource::Prepared { prepared_item_id } = &ingredient.source
        && prepared_item_id.is_nil()
    {
        errors.push("Prepared item reference is required".to_owned());
    }

    errors
}

fn validate_step(step: &RecipeStep) -> Vec<String> {
    let mut errors = Vec::new();

    if step.description.trim().is_empty() {
        errors.push("Description is required".to_owned());
    }

    if let Some(temperature) = &step.temperature {
        if temperature.value == 0.0 || temperature.value.is_nan() {
            errors.push("Valid temperature value is required".to_owned());
        }
        if temperature.unit.is_empty() {
            errors.push("Temperature unit is required".to_owned());
        }
    }

    if let Some(duration) = &step.duration {
        if duration.value == 0.0 || duration.value.is_nan() {
            errors.push("Valid duration value is required".to_owned());
        }
        if duration.unit.is_empty() {
            errors.push("Duration unit is required".to_owned());
        }
    }

    for (index, check) in step.quality_checks.iter().enumerate() {
        let position = index + 1;
        if check.description.trim().is_empty() {
            errors.push(format!("Quality check {position}: Description is required"));
        }
        if check.criteria.trim().is_empty() {
            errors.push(format!("Quality check {position}: Criteria is required"));
        }
    }

    errors
}

fn validate_storage(storage: &RecipeStorage) -> Vec<String> {
    let mut errors = Vec::new();

    match &storage.temperature {
        None => errors.push("Storage temperature is required".to_owned()),
        Some(range) => {
            if range.min >= range.max {
                errors.push(
                    "Min temperature must be less than max temperature".to_owned(),
                );
            }
            if range.unit.is_empty() {
                errors.push("Temperature unit is required".to_owned());
            }
        }
    }

    if storage.container.trim().is_empty() {
        errors.push("Storage container is required".to_owned());
    }
    if storage.container_type.trim().is_empty() {
        errors.push("Container type is required".to_owned());
    }

    if let Some(humidity) = &storage.humidity {
        if humidity.min >= humidity.max {
            errors.push("Min humidity must be less than max humidity".to_owned());
        }
        if humidity.unit.is_empty() {
            errors.push("Humidity unit is required".to_owned());
        }
    }

    errors
}
