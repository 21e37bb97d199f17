//! Recipe costing. Pure functions over in-memory data so the figures can
//! be recomputed anywhere (engine writes, server previews, tests) with no
//! hidden state.

use std::collections::HashMap;

use sea_orm::entity::prelude::Uuid;
use serde::Serialize;

use crate::recipes::{IngredientSource, Recipe};
use crate::{EngineError, ResultEngine};

/// Labor rate applied when the caller has no configured rate.
pub const DEFAULT_LABOR_RATE_PER_HOUR: f64 = 30.0;

/// The four derived cost figures stored on a recipe.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize)]
pub struct RecipeCosts {
    pub ingredient_cost: f64,
    pub labor_cost: f64,
    pub total_cost: f64,
    pub cost_per_unit: f64,
}

/// Lenient decimal parse over authored quantity strings: reads the longest
/// leading numeric prefix (optional sign, one decimal point) and returns
/// NaN when there is none. "2.5 kg" parses as 2.5, "abc" as NaN.
pub fn parse_decimal(value: &str) -> f64 {
    let trimmed = value.trim_start();
    let mut end = 0;
    let mut seen_digit = false;
    let mut seen_dot = false;
    for (idx, ch) in trimmed.char_indices() {
        match ch {
            '+' | '-' if idx == 0 => end = idx + 1,
            '.' if !seen_dot => {
                seen_dot = true;
                end = idx + 1;
            }
            '0'..='9' => {
                seen_digit = true;
                end = idx + 1;
            }
            _ => break,
        }
    }
    if !seen_digit {
        return f64::NAN;
    }
    trimmed[..end].parse().unwrap_or(f64::NAN)
}

fn unit_cost(
    source: &IngredientSource,
    ingredient_costs: &HashMap<String, f64>,
    prepared_costs: &HashMap<Uuid, f64>,
) -> Option<f64> {
    match source {
        IngredientSource::Raw { item_code } => {
            ingredient_costs.get(item_code).copied()
        }
        IngredientSource::Prepared { prepared_item_id } => {
            prepared_costs.get(prepared_item_id).copied()
        }
    }
}

/// Compute all four cost figures for a recipe against the current
/// catalogs.
///
/// Unresolved ingredient references and unparseable quantities contribute
/// nothing to the total; [`validate_ingredient_costs`] is the warning
/// surface for those lines. `cost_per_unit` divides by the yield value as
/// authored, so a zero yield produces a non-finite figure for the caller
/// to reject upstream.
pub fn calculate_recipe_costs(
    recipe: &Recipe,
    ingredient_costs: &HashMap<String, f64>,
    prepared_costs: &HashMap<Uuid, f64>,
    labor_rate_per_hour: f64,
) -> RecipeCosts {
    let mut ingredient_cost = 0.0;
    for line in &recipe.ingredients {
        let Some(unit) = unit_cost(&line.source, ingredient_costs, prepared_costs)
        else {
            continue;
        };
        let quantity = parse_decimal(&line.quantity);
        if quantity.is_nan() {
            continue;
        }
        ingredient_cost += unit * quantity;
    }

    let minutes =
        f64::from(recipe.prep_time_minutes) + f64::from(recipe.cook_time_minutes);
    let labor_cost = minutes / 60.0 * labor_rate_per_hour;
    let total_cost = ingredient_cost + labor_cost;
    let cost_per_unit = total_cost / recipe.recipe_yield.value;

    RecipeCosts { ingredient_cost, labor_cost, total_cost, cost_per_unit }
}

/// Report the ingredient lines [`calculate_recipe_costs`] silently
/// skipped: unresolved catalog references and non-positive quantities.
pub fn validate_ingredient_costs(
    recipe: &Recipe,
    ingredient_costs: &HashMap<String, f64>,
    prepared_costs: &HashMap<Uuid, f64>,
) -> Vec<String> {
    let mut warnings = Vec::new();
    for (index, line) in recipe.ingredients.iter().enumerate() {
        let position = index + 1;
        if unit_cost(&line.source, ingredient_costs, prepared_costs).is_none() {
            match line.source {
                IngredientSource::Raw { .. } => warnings.push(format!(
                    "Ingredient {position}: Master ingredient not found"
                )),
                IngredientSource::Prepared { .. } => warnings.push(format!(
                    "Ingredient {position}: Prepared item not found"
                )),
            }
        }
        let quantity = parse_decimal(&line.quantity);
        if !(quantity > 0.0) {
            warnings.push(format!("Ingredient {position}: Invalid quantity"));
        }
    }
    warnings
}

/// Quantity-weighted average yield across ingredient lines. Prepared
/// lines count at 100%; raw lines with no known yield contribute nothing
/// to the weighted sum but their quantity still counts in the total, so
/// unresolved references drag the average down. Returns 100 for a recipe
/// with no weighable lines.
pub fn weighted_yield_percent(
    recipe: &Recipe,
    ingredient_yields: &HashMap<String, f64>,
) -> f64 {
    let mut weighted = 0.0;
    let mut total = 0.0;
    for line in &recipe.ingredients {
        let quantity = parse_decimal(&line.quantity);
        if !(quantity > 0.0) {
            continue;
        }
        let percent = match &line.source {
            IngredientSource::Raw { item_code } => {
                ingredient_yields.get(item_code).copied().unwrap_or(0.0)
            }
            IngredientSource::Prepared { .. } => 100.0,
        };
        weighted += percent * quantity;
        total += quantity;
    }
    if total == 0.0 { 100.0 } else { weighted / total }
}

/// Derived unit cost for a master ingredient:
/// `(price / recipe units per case) × (100 / yield %)`.
///
/// Non-positive divisors are rejected here rather than letting an
/// infinite cost propagate into stored rows.
pub fn cost_per_recipe_unit(
    current_price: f64,
    recipe_units_per_case: f64,
    yield_percent: f64,
) -> ResultEngine<f64> {
    if !(recipe_units_per_case > 0.0) {
        return Err(EngineError::Validation(
            "recipe units per case must be greater than zero".to_owned(),
        ));
    }
    if !(yield_percent > 0.0) || yield_percent > 100.0 {
        return Err(EngineError::Validation(
            "yield percent must be in (0, 100]".to_owned(),
        ));
    }
    Ok(current_price / recipe_units_per_case * (100.0 / yield_percent))
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use sea_orm::entity::prelude::Uuid;

    use super::*;
    use crate::recipes::{
        RecipeIngredient, RecipeType, RecipeYield,
    };

    fn recipe_with(ingredients: Vec<RecipeIngredient>) -> Recipe {
        let now = Utc::now();
        Recipe {
            id: Uuid::new_v4(),
            recipe_type: RecipeType::Prepared,
            name: "Veloute".to_owned(),
            category: String::new(),
            sub_category: String::new(),
            station: String::new(),
            description: String::new(),
            prep_time_minutes: 15,
            cook_time_minutes: 45,
            recipe_yield: RecipeYield { value: 4.0, unit: "L".to_owned() },
            ingredients,
            steps: Vec::new(),
            equipment: Vec::new(),
            storage: Default::default(),
            training: Default::default(),
            quality_control: Default::default(),
            allergens: Vec::new(),
            ingredient_cost: 0.0,
            labor_cost: 0.0,
            total_cost: 0.0,
            cost_per_unit: 0.0,
            versions: Vec::new(),
            current_version: "1.0.0".to_owned(),
            created_by: String::new(),
            updated_by: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    fn raw_line(item_code: &str, quantity: &str) -> RecipeIngredient {
        RecipeIngredient {
            source: IngredientSource::Raw { item_code: item_code.to_owned() },
            name: item_code.to_owned(),
            quantity: quantity.to_owned(),
            unit: "kg".to_owned(),
            notes: None,
            cost: 0.0,
        }
    }

    #[test]
    fn parse_decimal_reads_leading_prefix() {
        assert_eq!(parse_decimal("2.5 kg"), 2.5);
        assert_eq!(parse_decimal("  -3"), -3.0);
        assert_eq!(parse_decimal("4.5.6"), 4.5);
        assert!(parse_decimal("a pinch").is_nan());
        assert!(parse_decimal("").is_nan());
    }

    #[test]
    fn costs_sum_resolved_lines_and_labor() {
        let recipe = recipe_with(vec![
            raw_line("FLOUR-01", "2"),
            raw_line("MISSING", "5"),
            raw_line("BUTTER-02", "not a number"),
        ]);
        let ingredient_costs = HashMap::from([
            ("FLOUR-01".to_owned(), 1.25),
            ("BUTTER-02".to_owned(), 9.0),
        ]);
        let costs = calculate_recipe_costs(
            &recipe,
            &ingredient_costs,
            &HashMap::new(),
            DEFAULT_LABOR_RATE_PER_HOUR,
        );
        assert_eq!(costs.ingredient_cost, 2.5);
        assert_eq!(costs.labor_cost, 30.0);
        assert_eq!(costs.total_cost, 32.5);
        assert_eq!(costs.cost_per_unit, 32.5 / 4.0);
    }

    #[test]
    fn warnings_name_the_skipped_lines() {
        let prepared_id = Uuid::new_v4();
        let mut recipe = recipe_with(vec![raw_line("MISSING", "0")]);
        recipe.ingredients.push(RecipeIngredient {
            source: IngredientSource::Prepared { prepared_item_id: prepared_id },
            name: "Stock".to_owned(),
            quantity: "2".to_owned(),
            unit: "L".to_owned(),
            notes: None,
            cost: 0.0,
        });
        let warnings = validate_ingredient_costs(
            &recipe,
            &HashMap::new(),
            &HashMap::new(),
        );
        assert_eq!(
            warnings,
            vec![
                "Ingredient 1: Master ingredient not found".to_owned(),
                "Ingredient 1: Invalid quantity".to_owned(),
                "Ingredient 2: Prepared item not found".to_owned(),
            ]
        );
    }

    #[test]
    fn weighted_yield_averages_by_quantity() {
        let recipe = recipe_with(vec![
            raw_line("TRIM-HEAVY", "3"),
            raw_line("NO-TRIM", "1"),
        ]);
        let yields = HashMap::from([
            ("TRIM-HEAVY".to_owned(), 60.0),
            ("NO-TRIM".to_owned(), 100.0),
        ]);
        let percent = weighted_yield_percent(&recipe, &yields);
        assert_eq!(percent, (60.0 * 3.0 + 100.0) / 4.0);
    }

    #[test]
    fn unresolved_yield_references_weigh_in_at_zero() {
        let recipe = recipe_with(vec![
            raw_line("TRIM-HEAVY", "3"),
            raw_line("UNKNOWN", "1"),
        ]);
        let yields = HashMap::from([("TRIM-HEAVY".to_owned(), 60.0)]);
        let percent = weighted_yield_percent(&recipe, &yields);
        assert_eq!(percent, (60.0 * 3.0) / 4.0);
    }

    #[test]
    fn extreme_prep_and_cook_times_stay_finite() {
        let mut recipe = recipe_with(vec![raw_line("FLOUR-01", "1")]);
        recipe.prep_time_minutes = u32::MAX;
        recipe.cook_time_minutes = u32::MAX;
        let costs = calculate_recipe_costs(
            &recipe,
            &HashMap::new(),
            &HashMap::new(),
            DEFAULT_LABOR_RATE_PER_HOUR,
        );
        assert!(costs.labor_cost.is_finite());
        assert_eq!(
            costs.labor_cost,
            (f64::from(u32::MAX) * 2.0) / 60.0 * DEFAULT_LABOR_RATE_PER_HOUR
        );
    }

    #[test]
    fn unit_cost_rejects_bad_divisors() {
        assert!(cost_per_recipe_unit(10.0, 0.0, 90.0).is_err());
        assert!(cost_per_recipe_unit(10.0, 5.0, 0.0).is_err());
        assert!(cost_per_recipe_unit(10.0, 5.0, 101.0).is_err());
        let cost = cost_per_recipe_unit(125.99, 10.0, 85.0);
        assert_eq!(cost, Ok(125.99 / 10.0 * (100.0 / 85.0)));
    }
}
