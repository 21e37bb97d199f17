//! Allergen tracking shared by master ingredients, prepared items and
//! recipes.
//!
//! The allergen set is fixed; organizations can add up to
//! [`MAX_CUSTOM_ALLERGENS`] custom entries on top of it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{EngineError, ResultEngine};

/// Maximum number of organization-defined allergens per item.
pub const MAX_CUSTOM_ALLERGENS: usize = 3;

/// The fixed allergen catalogue.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Allergen {
    Peanut,
    Crustacean,
    Treenut,
    Shellfish,
    Sesame,
    Soy,
    Fish,
    Wheat,
    Milk,
    Sulphite,
    Egg,
    Gluten,
    Mustard,
    Celery,
    Garlic,
    Onion,
    Nitrite,
    Mushroom,
    HotPepper,
    Citrus,
    Pork,
}

impl Allergen {
    pub const ALL: [Allergen; 21] = [
        Self::Peanut,
        Self::Crustacean,
        Self::Treenut,
        Self::Shellfish,
        Self::Sesame,
        Self::Soy,
        Self::Fish,
        Self::Wheat,
        Self::Milk,
        Self::Sulphite,
        Self::Egg,
        Self::Gluten,
        Self::Mustard,
        Self::Celery,
        Self::Garlic,
        Self::Onion,
        Self::Nitrite,
        Self::Mushroom,
        Self::HotPepper,
        Self::Citrus,
        Self::Pork,
    ];

    /// Returns the canonical name used in stored documents.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Peanut => "peanut",
            Self::Crustacean => "crustacean",
            Self::Treenut => "treenut",
            Self::Shellfish => "shellfish",
            Self::Sesame => "sesame",
            Self::Soy => "soy",
            Self::Fish => "fish",
            Self::Wheat => "wheat",
            Self::Milk => "milk",
            Self::Sulphite => "sulphite",
            Self::Egg => "egg",
            Self::Gluten => "gluten",
            Self::Mustard => "mustard",
            Self::Celery => "celery",
            Self::Garlic => "garlic",
            Self::Onion => "onion",
            Self::Nitrite => "nitrite",
            Self::Mushroom => "mushroom",
            Self::HotPepper => "hot_pepper",
            Self::Citrus => "citrus",
            Self::Pork => "pork",
        }
    }

    /// Column label used by the spreadsheet import template.
    pub fn column_label(self) -> &'static str {
        match self {
            Self::Peanut => "Peanut",
            Self::Crustacean => "Crustacean",
            Self::Treenut => "Tree Nut",
            Self::Shellfish => "Shellfish",
            Self::Sesame => "Sesame",
            Self::Soy => "Soy",
            Self::Fish => "Fish",
            Self::Wheat => "Wheat",
            Self::Milk => "Milk",
            Self::Sulphite => "Sulphite",
            Self::Egg => "Egg",
            Self::Gluten => "Gluten",
            Self::Mustard => "Mustard",
            Self::Celery => "Celery",
            Self::Garlic => "Garlic",
            Self::Onion => "Onion",
            Self::Nitrite => "Nitrite",
            Self::Mushroom => "Mushroom",
            Self::HotPepper => "Hot Pepper",
            Self::Citrus => "Citrus",
            Self::Pork => "Pork",
        }
    }
}

impl TryFrom<&str> for Allergen {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|a| a.as_str() == value)
            .ok_or_else(|| EngineError::Validation(format!("unknown allergen: {value}")))
    }
}

/// An organization-defined allergen slot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CustomAllergen {
    pub name: String,
    pub active: bool,
}

/// Allergen flags for one item: the fixed set plus custom slots.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AllergenProfile {
    #[serde(default)]
    pub flags: BTreeMap<Allergen, bool>,
    #[serde(default)]
    pub custom: Vec<CustomAllergen>,
}

impl AllergenProfile {
    pub fn set(&mut self, allergen: Allergen, active: bool) {
        self.flags.insert(allergen, active);
    }

    pub fn is_active(&self, allergen: Allergen) -> bool {
        self.flags.get(&allergen).copied().unwrap_or(false)
    }

    /// Add a custom allergen slot, enforcing the [`MAX_CUSTOM_ALLERGENS`]
    /// cap and a non-empty name.
    pub fn add_custom(&mut self, name: &str, active: bool) -> ResultEngine<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(EngineError::Validation(
                "custom allergen name must not be empty".to_string(),
            ));
        }
        if self.custom.len() >= MAX_CUSTOM_ALLERGENS {
            return Err(EngineError::Validation(format!(
                "at most {MAX_CUSTOM_ALLERGENS} custom allergens are supported"
            )));
        }
        self.custom.push(CustomAllergen {
            name: name.to_string(),
            active,
        });
        Ok(())
    }

    /// Names of every active allergen, fixed ones first, then custom ones.
    pub fn active_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Allergen::ALL
            .into_iter()
            .filter(|a| self.is_active(*a))
            .map(|a| a.as_str().to_string())
            .collect();
        names.extend(
            self.custom
                .iter()
                .filter(|c| c.active)
                .map(|c| c.name.clone()),
        );
        names
    }

    /// Check invariants for profiles built from deserialized documents.
    pub fn validate(&self) -> ResultEngine<()> {
        if self.custom.len() > MAX_CUSTOM_ALLERGENS {
            return Err(EngineError::Validation(format!(
                "at most {MAX_CUSTOM_ALLERGENS} custom allergens are supported"
            )));
        }
        if self.custom.iter().any(|c| c.name.trim().is_empty()) {
            return Err(EngineError::Validation(
                "custom allergen name must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
