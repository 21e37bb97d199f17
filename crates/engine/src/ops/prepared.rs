//! Prepared-item catalog operations.

use chrono::Utc;
use sea_orm::{
    DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
    sea_query::OnConflict,
};

use crate::util::normalize_required_name;
use crate::{
    EngineError, IMPORT_BATCH_SIZE, ImportRow, PreparedItem, PreparedItemInput,
    ResultEngine, import, prepared_items,
};

use super::{Engine, with_tx};

impl Engine {
    /// List the organization's prepared items.
    pub async fn list_prepared_items(
        &self,
        organization_id: Uuid,
    ) -> ResultEngine<Vec<PreparedItem>> {
        with_tx!(self, |db_tx| {
            self.require_organization(&db_tx, organization_id).await?;
            let models = prepared_items::Entity::find()
                .filter(prepared_items::Column::OrganizationId.eq(organization_id))
                .order_by_asc(prepared_items::Column::Product)
                .all(&db_tx)
                .await?;
            Ok(models.into_iter().map(Into::into).collect())
        })
    }

    /// Add a prepared item.
    pub async fn create_prepared_item(
        &self,
        organization_id: Uuid,
        input: PreparedItemInput,
    ) -> ResultEngine<PreparedItem> {
        let mut input = input;
        input.item_id = normalize_required_name(&input.item_id, "item id")?;
        input.product = normalize_required_name(&input.product, "product")?;
        input.allergens.validate()?;
        with_tx!(self, |db_tx| {
            self.require_organization(&db_tx, organization_id).await?;
            let exists = prepared_items::Entity::find()
                .filter(prepared_items::Column::OrganizationId.eq(organization_id))
                .filter(prepared_items::Column::ItemId.eq(&input.item_id))
                .one(&db_tx)
                .await?
                .is_some();
            if exists {
                return Err(EngineError::ExistingKey(input.item_id.clone()));
            }
            let now = Utc::now();
            let model = prepared_items::active_model_from_input(
                Uuid::new_v4(),
                organization_id,
                &input,
                now,
                now,
            )
            .insert(&db_tx)
            .await?;
            Ok(model.into())
        })
    }

    /// Remove a prepared item. Recipes referencing it keep the reference
    /// and cost it at zero.
    pub async fn delete_prepared_item(
        &self,
        organization_id: Uuid,
        id: Uuid,
    ) -> ResultEngine<Uuid> {
        with_tx!(self, |db_tx| {
            self.require_organization(&db_tx, organization_id).await?;
            let model = prepared_items::Entity::find_by_id(id)
                .filter(prepared_items::Column::OrganizationId.eq(organization_id))
                .one(&db_tx)
                .await?
                .ok_or_else(|| {
                    EngineError::NotFound(format!("prepared item {id}"))
                })?;
            model.delete(&db_tx).await?;
            Ok(id)
        })
    }

    /// Import prepared items from normalized spreadsheet rows, upserting
    /// on `(organization_id, item_id)` in batches of [`IMPORT_BATCH_SIZE`].
    /// Returns the number of rows applied.
    pub async fn import_prepared_items(
        &self,
        organization_id: Uuid,
        rows: &[ImportRow],
    ) -> ResultEngine<usize> {
        let mut inputs = Vec::with_capacity(rows.len());
        for (index, row) in rows.iter().enumerate() {
            let input = import::normalize_prepared_item_row(row);
            if input.item_id.is_empty() {
                return Err(EngineError::Validation(format!(
                    "row {}: item id is required",
                    index + 1
                )));
            }
            inputs.push(input);
        }

        with_tx!(self, |db_tx| {
            self.require_organization(&db_tx, organization_id).await?;
            ResultEngine::Ok(())
        })?;

        let mut applied = 0;
        for batch in inputs.chunks(IMPORT_BATCH_SIZE) {
            with_tx!(self, |db_tx| {
                self.upsert_prepared_batch(&db_tx, organization_id, batch).await
            })?;
            applied += batch.len();
        }
        tracing::info!(organization = %organization_id, rows = applied, "imported prepared items");
        Ok(applied)
    }

    async fn upsert_prepared_batch(
        &self,
        db: &DatabaseTransaction,
        organization_id: Uuid,
        batch: &[PreparedItemInput],
    ) -> ResultEngine<()> {
        if batch.is_empty() {
            return Ok(());
        }
        let now = Utc::now();
        let models: Vec<prepared_items::ActiveModel> = batch
            .iter()
            .map(|input| {
                prepared_items::active_model_from_input(
                    Uuid::new_v4(),
                    organization_id,
                    input,
                    now,
                    now,
                )
            })
            .collect();
        prepared_items::Entity::insert_many(models)
            .on_conflict(
                OnConflict::columns([
                    prepared_items::Column::OrganizationId,
                    prepared_items::Column::ItemId,
                ])
                .update_columns([
                    prepared_items::Column::Product,
                    prepared_items::Column::Category,
                    prepared_items::Column::Station,
                    prepared_items::Column::SubCategory,
                    prepared_items::Column::Container,
                    prepared_items::Column::ContainerType,
                    prepared_items::Column::RecipeUnit,
                    prepared_items::Column::CostPerRecipeUnit,
                    prepared_items::Column::FinalCost,
                    prepared_items::Column::YieldPercent,
                    prepared_items::Column::StorageArea,
                    prepared_items::Column::Allergens,
                    prepared_items::Column::UpdatedAt,
                ])
                .to_owned(),
            )
            .exec(db)
            .await?;
        Ok(())
    }
}
