//! Recipe operations: CRUD, search, cost recomputation and the version
//! policy on update.

use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
};

use crate::costing::{
    DEFAULT_LABOR_RATE_PER_HOUR, calculate_recipe_costs, parse_decimal,
};
use crate::recipes::{
    IngredientSource, Recipe, RecipeIngredient, RecipeStorage, RecipeType,
    RecipeVersion, RecipeYield,
};
use crate::util::normalize_required_name;
use crate::versioning::{RecipeUpdate, apply_update};
use crate::{
    EngineError, ResultEngine, master_ingredients, prepared_items, recipes,
};

use super::{Engine, with_tx};

/// Filter for recipe listings.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RecipeListFilter {
    pub recipe_type: Option<RecipeType>,
    /// Case-insensitive substring match over name, category and
    /// sub-category.
    pub search: Option<String>,
}

/// Unit costs for every catalog entry, keyed the way ingredient lines
/// reference them.
struct CostMaps {
    raw: HashMap<String, f64>,
    prepared: HashMap<Uuid, f64>,
}

fn refresh_line_costs(lines: &mut [RecipeIngredient], maps: &CostMaps) {
    for line in lines {
        let unit_cost = match &line.source {
            IngredientSource::Raw { item_code } => {
                maps.raw.get(item_code).copied()
            }
            IngredientSource::Prepared { prepared_item_id } => {
                maps.prepared.get(prepared_item_id).copied()
            }
        };
        let quantity = parse_decimal(&line.quantity);
        line.cost = match unit_cost {
            Some(cost) if !quantity.is_nan() => cost * quantity,
            _ => 0.0,
        };
    }
}

impl Engine {
    async fn catalog_cost_maps(
        &self,
        db: &DatabaseTransaction,
        organization_id: Uuid,
    ) -> ResultEngine<CostMaps> {
        let raw = master_ingredients::Entity::find()
            .filter(master_ingredients::Column::OrganizationId.eq(organization_id))
            .all(db)
            .await?
            .into_iter()
            .map(|m| (m.item_code, m.cost_per_recipe_unit))
            .collect();
        let prepared = prepared_items::Entity::find()
            .filter(prepared_items::Column::OrganizationId.eq(organization_id))
            .all(db)
            .await?
            .into_iter()
            .map(|m| (m.id, m.cost_per_recipe_unit))
            .collect();
        Ok(CostMaps { raw, prepared })
    }

    fn recompute_costs(recipe: &mut Recipe, maps: &CostMaps) {
        refresh_line_costs(&mut recipe.ingredients, maps);
        let costs = calculate_recipe_costs(
            recipe,
            &maps.raw,
            &maps.prepared,
            DEFAULT_LABOR_RATE_PER_HOUR,
        );
        recipe.ingredient_cost = costs.ingredient_cost;
        recipe.labor_cost = costs.labor_cost;
        recipe.total_cost = costs.total_cost;
        recipe.cost_per_unit = costs.cost_per_unit;
    }

    async fn require_recipe(
        &self,
        db: &DatabaseTransaction,
        organization_id: Uuid,
        id: Uuid,
    ) -> ResultEngine<recipes::Model> {
        recipes::Entity::find_by_id(id)
            .filter(recipes::Column::OrganizationId.eq(organization_id))
            .one(db)
            .await?
            .ok_or_else(|| EngineError::NotFound(format!("recipe {id}")))
    }

    /// List recipes, optionally filtered by type and search term.
    pub async fn list_recipes(
        &self,
        organization_id: Uuid,
        filter: &RecipeListFilter,
    ) -> ResultEngine<Vec<Recipe>> {
        with_tx!(self, |db_tx| {
            self.require_organization(&db_tx, organization_id).await?;
            let mut query = recipes::Entity::find()
                .filter(recipes::Column::OrganizationId.eq(organization_id))
                .order_by_asc(recipes::Column::Name);
            if let Some(recipe_type) = filter.recipe_type {
                query = query
                    .filter(recipes::Column::RecipeType.eq(recipe_type.as_str()));
            }
            let models = query.all(&db_tx).await?;
            let mut out = Vec::with_capacity(models.len());
            for model in models {
                out.push(Recipe::try_from(model)?);
            }
            if let Some(term) = &filter.search {
                let term = term.to_lowercase();
                out.retain(|recipe| {
                    recipe.name.to_lowercase().contains(&term)
                        || recipe.category.to_lowercase().contains(&term)
                        || recipe.sub_category.to_lowercase().contains(&term)
                });
            }
            Ok(out)
        })
    }

    /// Fetch one recipe.
    pub async fn get_recipe(
        &self,
        organization_id: Uuid,
        id: Uuid,
    ) -> ResultEngine<Recipe> {
        with_tx!(self, |db_tx| {
            self.require_organization(&db_tx, organization_id).await?;
            let model = self.require_recipe(&db_tx, organization_id, id).await?;
            Recipe::try_from(model)
        })
    }

    /// Create a recipe. The document's id, version history and derived
    /// costs are assigned here regardless of what the caller sent.
    pub async fn create_recipe(
        &self,
        organization_id: Uuid,
        author: &str,
        mut recipe: Recipe,
    ) -> ResultEngine<Recipe> {
        recipe.name = normalize_required_name(&recipe.name, "recipe")?;
        with_tx!(self, |db_tx| {
            self.require_organization(&db_tx, organization_id).await?;
            let now = Utc::now();
            recipe.id = Uuid::new_v4();
            recipe.current_version = "1.0.0".to_owned();
            recipe.versions = vec![RecipeVersion {
                version: "1.0.0".to_owned(),
                date: now,
                author: author.to_owned(),
                changes: vec!["Initial version".to_owned()],
            }];
            recipe.created_by = author.to_owned();
            recipe.created_at = now;
            recipe.updated_by = author.to_owned();
            recipe.updated_at = now;

            let maps = self.catalog_cost_maps(&db_tx, organization_id).await?;
            Self::recompute_costs(&mut recipe, &maps);

            recipe.to_active_model(organization_id)?.insert(&db_tx).await?;
            Ok(recipe)
        })
    }

    /// Apply a partial update: significant changes bump the patch version
    /// and append a history entry, then costs are recomputed against the
    /// current catalogs.
    pub async fn update_recipe(
        &self,
        organization_id: Uuid,
        id: Uuid,
        author: &str,
        update: RecipeUpdate,
    ) -> ResultEngine<Recipe> {
        with_tx!(self, |db_tx| {
            self.require_organization(&db_tx, organization_id).await?;
            let model = self.require_recipe(&db_tx, organization_id, id).await?;
            let mut recipe = Recipe::try_from(model)?;

            apply_update(&mut recipe, update, author, Utc::now())?;

            let maps = self.catalog_cost_maps(&db_tx, organization_id).await?;
            Self::recompute_costs(&mut recipe, &maps);

            recipe.to_active_model(organization_id)?.update(&db_tx).await?;
            Ok(recipe)
        })
    }

    /// Remove a recipe.
    pub async fn delete_recipe(
        &self,
        organization_id: Uuid,
        id: Uuid,
    ) -> ResultEngine<Uuid> {
        with_tx!(self, |db_tx| {
            self.require_organization(&db_tx, organization_id).await?;
            let model = self.require_recipe(&db_tx, organization_id, id).await?;
            model.delete(&db_tx).await?;
            Ok(id)
        })
    }

    /// Create one "prepared" recipe shell per prepared item that has no
    /// recipe with the same name yet, carrying the item's cost, storage
    /// container and active allergens. Returns how many were created.
    pub async fn seed_from_prepared_items(
        &self,
        organization_id: Uuid,
        author: &str,
    ) -> ResultEngine<usize> {
        with_tx!(self, |db_tx| {
            self.require_organization(&db_tx, organization_id).await?;
            let items = prepared_items::Entity::find()
                .filter(prepared_items::Column::OrganizationId.eq(organization_id))
                .all(&db_tx)
                .await?;
            let existing: Vec<String> = recipes::Entity::find()
                .filter(recipes::Column::OrganizationId.eq(organization_id))
                .filter(
                    recipes::Column::RecipeType.eq(RecipeType::Prepared.as_str()),
                )
                .all(&db_tx)
                .await?
                .into_iter()
                .map(|m| m.name.to_lowercase())
                .collect();

            let mut created = 0;
            let now = Utc::now();
            for item in items {
                if existing.contains(&item.product.to_lowercase()) {
                    continue;
                }
                let allergens = item.allergen_profile().active_names();
                let recipe = Recipe {
                    id: Uuid::new_v4(),
                    recipe_type: RecipeType::Prepared,
                    name: item.product.clone(),
                    category: item.category.clone(),
                    sub_category: item.sub_category.clone(),
                    station: item.station.clone(),
                    description: String::new(),
                    prep_time_minutes: 0,
                    cook_time_minutes: 0,
                    recipe_yield: RecipeYield {
                        value: 1.0,
                        unit: item.recipe_unit.clone(),
                    },
                    ingredients: Vec::new(),
                    steps: Vec::new(),
                    equipment: Vec::new(),
                    storage: RecipeStorage {
                        temperature: None,
                        humidity: None,
                        container: item.container.clone(),
                        container_type: item.container_type.clone(),
                        fifo_labeling: false,
                    },
                    training: Default::default(),
                    quality_control: Default::default(),
                    allergens,
                    ingredient_cost: 0.0,
                    labor_cost: 0.0,
                    total_cost: item.final_cost,
                    cost_per_unit: item.cost_per_recipe_unit,
                    versions: vec![RecipeVersion {
                        version: "1.0.0".to_owned(),
                        date: now,
                        author: author.to_owned(),
                        changes: vec!["Initial version".to_owned()],
                    }],
                    current_version: "1.0.0".to_owned(),
                    created_by: author.to_owned(),
                    updated_by: author.to_owned(),
                    created_at: now,
                    updated_at: now,
                };
                recipe.to_active_model(organization_id)?.insert(&db_tx).await?;
                created += 1;
            }
            tracing::info!(organization = %organization_id, created, "seeded recipes from prepared items");
            Ok(created)
        })
    }
}
