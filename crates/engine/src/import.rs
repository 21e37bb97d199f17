//! Spreadsheet import normalization.
//!
//! Rows arrive as generic column→value maps (the CSV/xlsx reader is the
//! caller's concern). Coercion is deliberately forgiving so a sheet
//! touched by hand still imports:
//!
//! - numeric fields: `$`, `,` and `%` stripped, then lenient decimal
//!   parse; missing or unparseable values fall back to 0 (yield % falls
//!   back to 100)
//! - boolean flags: `"1"` or `"true"` means set, anything else means
//!   unset
//! - text fields: trimmed, missing means empty

use std::collections::HashMap;

use crate::allergens::{Allergen, AllergenProfile};
use crate::costing::parse_decimal;
use crate::master_ingredients::MasterIngredientInput;
use crate::prepared_items::PreparedItemInput;

/// Upsert batch size for imports. Each batch commits in its own
/// transaction, sequentially.
pub const IMPORT_BATCH_SIZE: usize = 100;

/// One spreadsheet row as read by the caller, column label to raw value.
pub type ImportRow = HashMap<String, String>;

/// A normalized master-ingredient row. Taxonomy assignments stay as the
/// sheet's display names; the catalog ops resolve them to ids.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ImportedIngredientRow {
    pub input: MasterIngredientInput,
    pub major_group_name: String,
    pub category_name: String,
    pub sub_category_name: String,
}

fn text(row: &ImportRow, column: &str) -> String {
    row.get(column).map(|v| v.trim().to_owned()).unwrap_or_default()
}

/// Numeric coercion: strip currency/percent punctuation, parse leniently,
/// fall back to the column's default.
pub fn coerce_number(row: &ImportRow, column: &str, default: f64) -> f64 {
    let Some(raw) = row.get(column) else {
        return default;
    };
    let cleaned: String =
        raw.chars().filter(|c| !matches!(c, '$' | ',' | '%')).collect();
    let parsed = parse_decimal(&cleaned);
    if parsed.is_nan() { default } else { parsed }
}

/// Flag coercion: `"1"` and `"true"` set the flag, everything else
/// (missing, `"0"`, `"yes"`, garbage) leaves it unset.
pub fn coerce_flag(row: &ImportRow, column: &str) -> bool {
    matches!(row.get(column).map(String::as_str), Some("1") | Some("true"))
}

fn allergens_from_row(row: &ImportRow) -> AllergenProfile {
    let mut profile = AllergenProfile::default();
    for allergen in Allergen::ALL {
        if coerce_flag(row, allergen.column_label()) {
            profile.set(allergen, true);
        }
    }
    for slot in 1..=3 {
        let name = text(row, &format!("Custom Allergen {slot} Name"));
        if name.is_empty() {
            continue;
        }
        let active = coerce_flag(row, &format!("Custom Allergen {slot} Active"));
        // Cap cannot trip: three named slots at most.
        let _ = profile.add_custom(&name, active);
    }
    profile
}

/// Normalize one row of the master-ingredients template.
pub fn normalize_master_ingredient_row(row: &ImportRow) -> ImportedIngredientRow {
    ImportedIngredientRow {
        input: MasterIngredientInput {
            item_code: text(row, "Item Code"),
            product: text(row, "Product Name"),
            vendor: text(row, "Vendor"),
            case_size: text(row, "Case Size"),
            units_per_case: text(row, "Units/Case"),
            current_price: coerce_number(row, "Case Price", 0.0),
            unit_of_measure: text(row, "Unit of Measure"),
            recipe_units_per_case: coerce_number(row, "Recipe Units/Case", 0.0),
            recipe_unit_type: text(row, "Recipe Unit Type"),
            yield_percent: coerce_number(row, "Yield %", 100.0),
            storage_area: text(row, "Storage Area"),
            major_group: None,
            category: None,
            sub_category: None,
            allergens: allergens_from_row(row),
        },
        major_group_name: text(row, "Major Group"),
        category_name: text(row, "Category"),
        sub_category_name: text(row, "Sub-Category"),
    }
}

/// Normalize one row of the prepared-items sheet. That sheet's headers
/// are upper-cased in the source template.
pub fn normalize_prepared_item_row(row: &ImportRow) -> PreparedItemInput {
    PreparedItemInput {
        item_id: text(row, "Item ID"),
        product: text(row, "PRODUCT"),
        category: text(row, "CATEGORY"),
        station: text(row, "STATION"),
        sub_category: text(row, "SUB CATEGORY"),
        container: text(row, "CONTAINER"),
        container_type: text(row, "CONTAINER TYPE"),
        recipe_unit: text(row, "RECIPE UNIT"),
        cost_per_recipe_unit: coerce_number(row, "COST PER R/U", 0.0),
        final_cost: coerce_number(row, "FINAL $", 0.0),
        yield_percent: coerce_number(row, "YIELD %", 100.0),
        storage_area: text(row, "STORAGE AREA"),
        allergens: allergens_from_row(row),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, &str)]) -> ImportRow {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    #[test]
    fn currency_and_percent_punctuation_is_stripped() {
        let row = row(&[
            ("Case Price", "$1,250.50"),
            ("Yield %", "85%"),
            ("Recipe Units/Case", "10"),
        ]);
        assert_eq!(coerce_number(&row, "Case Price", 0.0), 1250.50);
        assert_eq!(coerce_number(&row, "Yield %", 100.0), 85.0);
        assert_eq!(coerce_number(&row, "Recipe Units/Case", 0.0), 10.0);
    }

    #[test]
    fn missing_numbers_take_column_defaults() {
        let row = row(&[("Case Price", "n/a")]);
        assert_eq!(coerce_number(&row, "Case Price", 0.0), 0.0);
        assert_eq!(coerce_number(&row, "Yield %", 100.0), 100.0);
    }

    #[test]
    fn only_one_and_true_set_flags() {
        let row = row(&[
            ("Peanut", "1"),
            ("Milk", "true"),
            ("Fish", "yes"),
            ("Egg", "0"),
        ]);
        assert!(coerce_flag(&row, "Peanut"));
        assert!(coerce_flag(&row, "Milk"));
        assert!(!coerce_flag(&row, "Fish"));
        assert!(!coerce_flag(&row, "Egg"));
        assert!(!coerce_flag(&row, "Sesame"));
    }

    #[test]
    fn template_row_normalizes() {
        let row = row(&[
            ("Item Code", " BEEF-001 "),
            ("Product Name", "Beef Brisket"),
            ("Major Group", "Food"),
            ("Category", "Proteins"),
            ("Sub-Category", "Beef"),
            ("Vendor", "US Foods"),
            ("Case Size", "2x5kg"),
            ("Units/Case", "2"),
            ("Case Price", "125.99"),
            ("Unit of Measure", "kg"),
            ("Recipe Units/Case", "10"),
            ("Recipe Unit Type", "portion"),
            ("Yield %", "85"),
            ("Storage Area", "Walk-in Cooler"),
            ("Milk", "1"),
            ("Custom Allergen 1 Name", "truffle"),
            ("Custom Allergen 1 Active", "1"),
        ]);
        let normalized = normalize_master_ingredient_row(&row);
        assert_eq!(normalized.input.item_code, "BEEF-001");
        assert_eq!(normalized.input.current_price, 125.99);
        assert_eq!(normalized.input.yield_percent, 85.0);
        assert_eq!(normalized.major_group_name, "Food");
        assert_eq!(
            normalized.input.allergens.active_names(),
            vec!["milk", "truffle"]
        );
    }
}
