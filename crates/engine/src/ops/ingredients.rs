//! Master-ingredient catalog operations, including the spreadsheet
//! import.

use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
    sea_query::OnConflict,
};

use crate::costing::cost_per_recipe_unit;
use crate::util::{normalize_name_key, normalize_required_name};
use crate::{
    EngineError, IMPORT_BATCH_SIZE, ImportRow, ImportedIngredientRow,
    MasterIngredient, MasterIngredientInput, ResultEngine, food_categories,
    food_sub_categories, import, major_groups, master_ingredients,
};

use super::{Engine, with_tx};

/// Taxonomy id→name lookup for resolving classification display names.
struct TaxonomyNames {
    groups: HashMap<Uuid, String>,
    categories: HashMap<Uuid, String>,
    sub_categories: HashMap<Uuid, String>,
}

impl Engine {
    async fn taxonomy_names(
        &self,
        db: &DatabaseTransaction,
        organization_id: Uuid,
    ) -> ResultEngine<TaxonomyNames> {
        let groups = major_groups::Entity::find()
            .filter(major_groups::Column::OrganizationId.eq(organization_id))
            .all(db)
            .await?
            .into_iter()
            .map(|m| (m.id, m.name))
            .collect();
        let categories = food_categories::Entity::find()
            .filter(food_categories::Column::OrganizationId.eq(organization_id))
            .all(db)
            .await?
            .into_iter()
            .map(|m| (m.id, m.name))
            .collect();
        let sub_categories = food_sub_categories::Entity::find()
            .filter(food_sub_categories::Column::OrganizationId.eq(organization_id))
            .all(db)
            .await?
            .into_iter()
            .map(|m| (m.id, m.name))
            .collect();
        Ok(TaxonomyNames { groups, categories, sub_categories })
    }

    /// Referenced taxonomy nodes must exist and nest: a sub-category
    /// belongs to the given category, which belongs to the given group.
    async fn check_taxonomy_nesting(
        &self,
        db: &DatabaseTransaction,
        organization_id: Uuid,
        input: &MasterIngredientInput,
    ) -> ResultEngine<()> {
        if let Some(category_id) = input.category {
            let category = food_categories::Entity::find_by_id(category_id)
                .filter(food_categories::Column::OrganizationId.eq(organization_id))
                .one(db)
                .await?
                .ok_or_else(|| {
                    EngineError::Validation(format!("unknown category {category_id}"))
                })?;
            if input.major_group != Some(category.group_id) {
                return Err(EngineError::Validation(
                    "category does not belong to the selected major group"
                        .to_owned(),
                ));
            }
        } else if input.sub_category.is_some() {
            return Err(EngineError::Validation(
                "sub-category requires a category".to_owned(),
            ));
        }
        if let Some(sub_category_id) = input.sub_category {
            let sub_category =
                food_sub_categories::Entity::find_by_id(sub_category_id)
                    .filter(
                        food_sub_categories::Column::OrganizationId
                            .eq(organization_id),
                    )
                    .one(db)
                    .await?
                    .ok_or_else(|| {
                        EngineError::Validation(format!(
                            "unknown sub-category {sub_category_id}"
                        ))
                    })?;
            if input.category != Some(sub_category.category_id) {
                return Err(EngineError::Validation(
                    "sub-category does not belong to the selected category"
                        .to_owned(),
                ));
            }
        }
        if input.category.is_none()
            && let Some(group_id) = input.major_group
        {
            let exists = major_groups::Entity::find_by_id(group_id)
                .filter(major_groups::Column::OrganizationId.eq(organization_id))
                .one(db)
                .await?
                .is_some();
            if !exists {
                return Err(EngineError::Validation(format!(
                    "unknown major group {group_id}"
                )));
            }
        }
        Ok(())
    }

    fn ingredient_view(
        model: master_ingredients::Model,
        names: &TaxonomyNames,
    ) -> MasterIngredient {
        let allergens = model.allergen_profile();
        MasterIngredient {
            id: model.id,
            item_code: model.item_code,
            product: model.product,
            vendor: model.vendor,
            case_size: model.case_size,
            units_per_case: model.units_per_case,
            current_price: model.current_price,
            unit_of_measure: model.unit_of_measure,
            recipe_units_per_case: model.recipe_units_per_case,
            recipe_unit_type: model.recipe_unit_type,
            yield_percent: model.yield_percent,
            cost_per_recipe_unit: model.cost_per_recipe_unit,
            storage_area: model.storage_area,
            major_group: model.major_group,
            category: model.category,
            sub_category: model.sub_category,
            major_group_name: model
                .major_group
                .and_then(|id| names.groups.get(&id).cloned()),
            category_name: model
                .category
                .and_then(|id| names.categories.get(&id).cloned()),
            sub_category_name: model
                .sub_category
                .and_then(|id| names.sub_categories.get(&id).cloned()),
            allergens,
        }
    }

    /// List the organization's master ingredients with resolved taxonomy
    /// names. Dangling taxonomy references come back with a `None` name.
    pub async fn list_master_ingredients(
        &self,
        organization_id: Uuid,
    ) -> ResultEngine<Vec<MasterIngredient>> {
        with_tx!(self, |db_tx| {
            self.require_organization(&db_tx, organization_id).await?;
            let names = self.taxonomy_names(&db_tx, organization_id).await?;
            let models = master_ingredients::Entity::find()
                .filter(
                    master_ingredients::Column::OrganizationId.eq(organization_id),
                )
                .order_by_asc(master_ingredients::Column::Product)
                .all(&db_tx)
                .await?;
            Ok(models
                .into_iter()
                .map(|model| Self::ingredient_view(model, &names))
                .collect())
        })
    }

    /// Add a master ingredient, computing its recipe-unit cost.
    pub async fn create_master_ingredient(
        &self,
        organization_id: Uuid,
        input: MasterIngredientInput,
    ) -> ResultEngine<MasterIngredient> {
        let mut input = input;
        input.item_code = normalize_required_name(&input.item_code, "item code")?;
        input.product = normalize_required_name(&input.product, "product")?;
        input.allergens.validate()?;
        let unit_cost = cost_per_recipe_unit(
            input.current_price,
            input.recipe_units_per_case,
            input.yield_percent,
        )?;
        with_tx!(self, |db_tx| {
            self.require_organization(&db_tx, organization_id).await?;
            self.check_taxonomy_nesting(&db_tx, organization_id, &input)
                .await?;
            let exists = master_ingredients::Entity::find()
                .filter(
                    master_ingredients::Column::OrganizationId.eq(organization_id),
                )
                .filter(master_ingredients::Column::ItemCode.eq(&input.item_code))
                .one(&db_tx)
                .await?
                .is_some();
            if exists {
                return Err(EngineError::ExistingKey(input.item_code.clone()));
            }
            let now = Utc::now();
            let model = master_ingredients::active_model_from_input(
                Uuid::new_v4(),
                organization_id,
                &input,
                unit_cost,
                now,
                now,
            )
            .insert(&db_tx)
            .await?;
            let names = self.taxonomy_names(&db_tx, organization_id).await?;
            Ok(Self::ingredient_view(model, &names))
        })
    }

    /// Replace a master ingredient, recomputing its recipe-unit cost.
    pub async fn update_master_ingredient(
        &self,
        organization_id: Uuid,
        id: Uuid,
        input: MasterIngredientInput,
    ) -> ResultEngine<MasterIngredient> {
        let mut input = input;
        input.item_code = normalize_required_name(&input.item_code, "item code")?;
        input.product = normalize_required_name(&input.product, "product")?;
        input.allergens.validate()?;
        let unit_cost = cost_per_recipe_unit(
            input.current_price,
            input.recipe_units_per_case,
            input.yield_percent,
        )?;
        with_tx!(self, |db_tx| {
            self.require_organization(&db_tx, organization_id).await?;
            self.check_taxonomy_nesting(&db_tx, organization_id, &input)
                .await?;
            let current = master_ingredients::Entity::find_by_id(id)
                .filter(
                    master_ingredients::Column::OrganizationId.eq(organization_id),
                )
                .one(&db_tx)
                .await?
                .ok_or_else(|| {
                    EngineError::NotFound(format!("master ingredient {id}"))
                })?;
            let taken = master_ingredients::Entity::find()
                .filter(
                    master_ingredients::Column::OrganizationId.eq(organization_id),
                )
                .filter(master_ingredients::Column::ItemCode.eq(&input.item_code))
                .filter(master_ingredients::Column::Id.ne(id))
                .one(&db_tx)
                .await?
                .is_some();
            if taken {
                return Err(EngineError::ExistingKey(input.item_code.clone()));
            }
            let model = master_ingredients::active_model_from_input(
                id,
                organization_id,
                &input,
                unit_cost,
                current.created_at,
                Utc::now(),
            )
            .update(&db_tx)
            .await?;
            let names = self.taxonomy_names(&db_tx, organization_id).await?;
            Ok(Self::ingredient_view(model, &names))
        })
    }

    /// Remove a master ingredient. Recipes referencing its item code keep
    /// the reference and cost it at zero until it is re-added.
    pub async fn delete_master_ingredient(
        &self,
        organization_id: Uuid,
        id: Uuid,
    ) -> ResultEngine<Uuid> {
        with_tx!(self, |db_tx| {
            self.require_organization(&db_tx, organization_id).await?;
            let model = master_ingredients::Entity::find_by_id(id)
                .filter(
                    master_ingredients::Column::OrganizationId.eq(organization_id),
                )
                .one(&db_tx)
                .await?
                .ok_or_else(|| {
                    EngineError::NotFound(format!("master ingredient {id}"))
                })?;
            model.delete(&db_tx).await?;
            Ok(id)
        })
    }

    /// Import master ingredients from normalized spreadsheet rows.
    ///
    /// Every row is validated up front; rows then upsert on
    /// `(organization_id, item_code)` in fixed batches of
    /// [`IMPORT_BATCH_SIZE`], each batch in its own transaction,
    /// sequentially. A failure mid-sequence leaves earlier batches
    /// committed; re-running the import is safe because of the conflict
    /// key. Returns the number of rows applied.
    pub async fn import_master_ingredients(
        &self,
        organization_id: Uuid,
        rows: &[ImportRow],
    ) -> ResultEngine<usize> {
        let normalized: Vec<ImportedIngredientRow> = rows
            .iter()
            .map(import::normalize_master_ingredient_row)
            .collect();

        let resolved = with_tx!(self, |db_tx| {
            self.require_organization(&db_tx, organization_id).await?;
            self.resolve_import_rows(&db_tx, organization_id, normalized)
                .await
        })?;

        let mut applied = 0;
        for batch in resolved.chunks(IMPORT_BATCH_SIZE) {
            with_tx!(self, |db_tx| {
                self.upsert_ingredient_batch(&db_tx, organization_id, batch)
                    .await
            })?;
            applied += batch.len();
        }
        tracing::info!(organization = %organization_id, rows = applied, "imported master ingredients");
        Ok(applied)
    }

    /// Validate normalized rows and resolve taxonomy display names to ids
    /// (case and accent insensitive). Unmatched names import as
    /// unclassified.
    async fn resolve_import_rows(
        &self,
        db: &DatabaseTransaction,
        organization_id: Uuid,
        rows: Vec<ImportedIngredientRow>,
    ) -> ResultEngine<Vec<MasterIngredientInput>> {
        let groups: HashMap<String, Uuid> = major_groups::Entity::find()
            .filter(major_groups::Column::OrganizationId.eq(organization_id))
            .all(db)
            .await?
            .into_iter()
            .map(|m| (normalize_name_key(&m.name), m.id))
            .collect();
        let categories: HashMap<(Uuid, String), Uuid> =
            food_categories::Entity::find()
                .filter(food_categories::Column::OrganizationId.eq(organization_id))
                .all(db)
                .await?
                .into_iter()
                .map(|m| ((m.group_id, normalize_name_key(&m.name)), m.id))
                .collect();
        let sub_categories: HashMap<(Uuid, String), Uuid> =
            food_sub_categories::Entity::find()
                .filter(
                    food_sub_categories::Column::OrganizationId.eq(organization_id),
                )
                .all(db)
                .await?
                .into_iter()
                .map(|m| ((m.category_id, normalize_name_key(&m.name)), m.id))
                .collect();

        let mut inputs = Vec::with_capacity(rows.len());
        for (index, row) in rows.into_iter().enumerate() {
            let position = index + 1;
            let mut input = row.input;
            if input.item_code.is_empty() {
                return Err(EngineError::Validation(format!(
                    "row {position}: item code is required"
                )));
            }
            if input.product.is_empty() {
                return Err(EngineError::Validation(format!(
                    "row {position}: product name is required"
                )));
            }
            cost_per_recipe_unit(
                input.current_price,
                input.recipe_units_per_case,
                input.yield_percent,
            )
            .map_err(|err| {
                EngineError::Validation(format!("row {position}: {err}"))
            })?;

            input.major_group =
                groups.get(&normalize_name_key(&row.major_group_name)).copied();
            input.category = input.major_group.and_then(|group_id| {
                categories
                    .get(&(group_id, normalize_name_key(&row.category_name)))
                    .copied()
            });
            input.sub_category = input.category.and_then(|category_id| {
                sub_categories
                    .get(&(category_id, normalize_name_key(&row.sub_category_name)))
                    .copied()
            });
            inputs.push(input);
        }
        Ok(inputs)
    }

    async fn upsert_ingredient_batch(
        &self,
        db: &DatabaseTransaction,
        organization_id: Uuid,
        batch: &[MasterIngredientInput],
    ) -> ResultEngine<()> {
        if batch.is_empty() {
            return Ok(());
        }
        let now = Utc::now();
        let models: ResultEngine<Vec<master_ingredients::ActiveModel>> = batch
            .iter()
            .map(|input| {
                let unit_cost = cost_per_recipe_unit(
                    input.current_price,
                    input.recipe_units_per_case,
                    input.yield_percent,
                )?;
                Ok(master_ingredients::active_model_from_input(
                    Uuid::new_v4(),
                    organization_id,
                    input,
                    unit_cost,
                    now,
                    now,
                ))
            })
            .collect();
        master_ingredients::Entity::insert_many(models?)
            .on_conflict(
                OnConflict::columns([
                    master_ingredients::Column::OrganizationId,
                    master_ingredients::Column::ItemCode,
                ])
                .update_columns([
                    master_ingredients::Column::Product,
                    master_ingredients::Column::Vendor,
                    master_ingredients::Column::CaseSize,
                    master_ingredients::Column::UnitsPerCase,
                    master_ingredients::Column::CurrentPrice,
                    master_ingredients::Column::UnitOfMeasure,
                    master_ingredients::Column::RecipeUnitsPerCase,
                    master_ingredients::Column::RecipeUnitType,
                    master_ingredients::Column::YieldPercent,
                    master_ingredients::Column::CostPerRecipeUnit,
                    master_ingredients::Column::StorageArea,
                    master_ingredients::Column::MajorGroup,
                    master_ingredients::Column::Category,
                    master_ingredients::Column::SubCategory,
                    master_ingredients::Column::Allergens,
                    master_ingredients::Column::UpdatedAt,
                ])
                .to_owned(),
            )
            .exec(db)
            .await?;
        Ok(())
    }
}
