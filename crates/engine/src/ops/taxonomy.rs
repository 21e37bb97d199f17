//! Taxonomy operations: major groups, food categories and sub-categories.
//!
//! Siblings are ordered by `sort_order` with insertion order breaking
//! ties. New nodes take the current sibling count as their sort order, so
//! appends land at the end without renumbering anything.

use chrono::Utc;
use sea_orm::{
    ActiveValue, PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait,
    prelude::*,
};

use crate::util::{normalize_optional_text, normalize_required_name};
use crate::{
    EngineError, FoodCategory, FoodSubCategory, MajorGroup, ResultEngine,
    food_categories, food_sub_categories, major_groups,
};

use super::{Engine, ReorderDirection, with_tx};

/// Generates rename, reorder and delete for one taxonomy level. The
/// optional `parent` pair scopes sibling queries to the node's parent.
macro_rules! impl_taxonomy_node_ops {
    ($rename_fn:ident, $reorder_fn:ident, $delete_fn:ident, $module:ident,
     $label:literal $(, parent $parent_col:ident => $parent_field:ident)?) => {
        /// Rename a node and replace its description.
        pub async fn $rename_fn(
            &self,
            organization_id: Uuid,
            id: Uuid,
            name: &str,
            description: Option<&str>,
        ) -> ResultEngine<()> {
            let name = normalize_required_name(name, $label)?;
            let description = normalize_optional_text(description);
            with_tx!(self, |db_tx| {
                self.require_organization(&db_tx, organization_id).await?;
                let model = $module::Entity::find_by_id(id)
                    .filter($module::Column::OrganizationId.eq(organization_id))
                    .one(&db_tx)
                    .await?
                    .ok_or_else(|| {
                        EngineError::NotFound(format!("{} {id}", $label))
                    })?;
                let mut active: $module::ActiveModel = model.into();
                active.name = ActiveValue::Set(name);
                active.description = ActiveValue::Set(description);
                active.updated_at = ActiveValue::Set(Utc::now());
                active.update(&db_tx).await?;
                Ok(())
            })
        }

        /// Swap sort order with the adjacent sibling. A move past either
        /// end of the list is a silent no-op.
        pub async fn $reorder_fn(
            &self,
            organization_id: Uuid,
            id: Uuid,
            direction: ReorderDirection,
        ) -> ResultEngine<()> {
            with_tx!(self, |db_tx| {
                self.require_organization(&db_tx, organization_id).await?;
                let model = $module::Entity::find_by_id(id)
                    .filter($module::Column::OrganizationId.eq(organization_id))
                    .one(&db_tx)
                    .await?
                    .ok_or_else(|| {
                        EngineError::NotFound(format!("{} {id}", $label))
                    })?;
                let siblings = $module::Entity::find()
                    .filter($module::Column::OrganizationId.eq(organization_id))
                    $( .filter($module::Column::$parent_col.eq(model.$parent_field)) )?
                    .order_by_asc($module::Column::SortOrder)
                    .order_by_asc($module::Column::CreatedAt)
                    .all(&db_tx)
                    .await?;
                let position = siblings
                    .iter()
                    .position(|sibling| sibling.id == model.id)
                    .ok_or_else(|| {
                        EngineError::NotFound(format!("{} {id}", $label))
                    })?;
                let neighbor = match direction {
                    ReorderDirection::Up => position.checked_sub(1),
                    ReorderDirection::Down => {
                        let next = position + 1;
                        (next < siblings.len()).then_some(next)
                    }
                };
                let Some(neighbor) = neighbor else {
                    return Ok(());
                };

                let now = Utc::now();
                let node = siblings[position].clone();
                let other = siblings[neighbor].clone();
                let (node_order, other_order) = (node.sort_order, other.sort_order);

                let mut node: $module::ActiveModel = node.into();
                node.sort_order = ActiveValue::Set(other_order);
                node.updated_at = ActiveValue::Set(now);
                node.update(&db_tx).await?;

                let mut other: $module::ActiveModel = other.into();
                other.sort_order = ActiveValue::Set(node_order);
                other.updated_at = ActiveValue::Set(now);
                other.update(&db_tx).await?;

                Ok(())
            })
        }

        /// Delete a node and return its id so callers can invalidate any
        /// editor selection pointing at it. Catalog rows classified under
        /// the node keep their dangling reference.
        pub async fn $delete_fn(
            &self,
            organization_id: Uuid,
            id: Uuid,
        ) -> ResultEngine<Uuid> {
            with_tx!(self, |db_tx| {
                self.require_organization(&db_tx, organization_id).await?;
                let model = $module::Entity::find_by_id(id)
                    .filter($module::Column::OrganizationId.eq(organization_id))
                    .one(&db_tx)
                    .await?
                    .ok_or_else(|| {
                        EngineError::NotFound(format!("{} {id}", $label))
                    })?;
                model.delete(&db_tx).await?;
                Ok(id)
            })
        }
    };
}

impl Engine {
    impl_taxonomy_node_ops!(
        rename_major_group,
        reorder_major_group,
        delete_major_group,
        major_groups,
        "major group"
    );

    impl_taxonomy_node_ops!(
        rename_category,
        reorder_category,
        delete_category,
        food_categories,
        "category",
        parent GroupId => group_id
    );

    impl_taxonomy_node_ops!(
        rename_sub_category,
        reorder_sub_category,
        delete_sub_category,
        food_sub_categories,
        "sub-category",
        parent CategoryId => category_id
    );

    /// List the organization's major groups in display order.
    pub async fn list_major_groups(
        &self,
        organization_id: Uuid,
    ) -> ResultEngine<Vec<MajorGroup>> {
        with_tx!(self, |db_tx| {
            self.require_organization(&db_tx, organization_id).await?;
            let models = major_groups::Entity::find()
                .filter(major_groups::Column::OrganizationId.eq(organization_id))
                .order_by_asc(major_groups::Column::SortOrder)
                .order_by_asc(major_groups::Column::CreatedAt)
                .all(&db_tx)
                .await?;
            Ok(models.into_iter().map(Into::into).collect())
        })
    }

    /// List one group's categories in display order.
    pub async fn list_categories(
        &self,
        organization_id: Uuid,
        group_id: Uuid,
    ) -> ResultEngine<Vec<FoodCategory>> {
        with_tx!(self, |db_tx| {
            self.require_organization(&db_tx, organization_id).await?;
            let models = food_categories::Entity::find()
                .filter(food_categories::Column::OrganizationId.eq(organization_id))
                .filter(food_categories::Column::GroupId.eq(group_id))
                .order_by_asc(food_categories::Column::SortOrder)
                .order_by_asc(food_categories::Column::CreatedAt)
                .all(&db_tx)
                .await?;
            Ok(models.into_iter().map(Into::into).collect())
        })
    }

    /// List one category's sub-categories in display order.
    pub async fn list_sub_categories(
        &self,
        organization_id: Uuid,
        category_id: Uuid,
    ) -> ResultEngine<Vec<FoodSubCategory>> {
        with_tx!(self, |db_tx| {
            self.require_organization(&db_tx, organization_id).await?;
            let models = food_sub_categories::Entity::find()
                .filter(
                    food_sub_categories::Column::OrganizationId.eq(organization_id),
                )
                .filter(food_sub_categories::Column::CategoryId.eq(category_id))
                .order_by_asc(food_sub_categories::Column::SortOrder)
                .order_by_asc(food_sub_categories::Column::CreatedAt)
                .all(&db_tx)
                .await?;
            Ok(models.into_iter().map(Into::into).collect())
        })
    }

    /// Add a major group at the end of the list.
    pub async fn create_major_group(
        &self,
        organization_id: Uuid,
        name: &str,
        description: Option<&str>,
        icon: &str,
        color: &str,
    ) -> ResultEngine<MajorGroup> {
        let name = normalize_required_name(name, "major group")?;
        let description = normalize_optional_text(description);
        with_tx!(self, |db_tx| {
            self.require_organization(&db_tx, organization_id).await?;
            let siblings = major_groups::Entity::find()
                .filter(major_groups::Column::OrganizationId.eq(organization_id))
                .count(&db_tx)
                .await?;
            let now = Utc::now();
            let model = major_groups::ActiveModel {
                id: ActiveValue::Set(Uuid::new_v4()),
                organization_id: ActiveValue::Set(organization_id),
                name: ActiveValue::Set(name),
                description: ActiveValue::Set(description),
                icon: ActiveValue::Set(icon.trim().to_owned()),
                color: ActiveValue::Set(color.trim().to_owned()),
                sort_order: ActiveValue::Set(siblings as i32),
                created_at: ActiveValue::Set(now),
                updated_at: ActiveValue::Set(now),
            }
            .insert(&db_tx)
            .await?;
            Ok(model.into())
        })
    }

    /// Add a category at the end of its group's list.
    pub async fn create_category(
        &self,
        organization_id: Uuid,
        group_id: Uuid,
        name: &str,
        description: Option<&str>,
    ) -> ResultEngine<FoodCategory> {
        let name = normalize_required_name(name, "category")?;
        let description = normalize_optional_text(description);
        with_tx!(self, |db_tx| {
            self.require_organization(&db_tx, organization_id).await?;
            let parent = major_groups::Entity::find_by_id(group_id)
                .filter(major_groups::Column::OrganizationId.eq(organization_id))
                .one(&db_tx)
                .await?;
            if parent.is_none() {
                return Err(EngineError::NotFound(format!(
                    "major group {group_id}"
                )));
            }
            let siblings = food_categories::Entity::find()
                .filter(food_categories::Column::OrganizationId.eq(organization_id))
                .filter(food_categories::Column::GroupId.eq(group_id))
                .count(&db_tx)
                .await?;
            let now = Utc::now();
            let model = food_categories::ActiveModel {
                id: ActiveValue::Set(Uuid::new_v4()),
                organization_id: ActiveValue::Set(organization_id),
                group_id: ActiveValue::Set(group_id),
                name: ActiveValue::Set(name),
                description: ActiveValue::Set(description),
                sort_order: ActiveValue::Set(siblings as i32),
                created_at: ActiveValue::Set(now),
                updated_at: ActiveValue::Set(now),
            }
            .insert(&db_tx)
            .await?;
            Ok(model.into())
        })
    }

    /// Add a sub-category at the end of its category's list.
    pub async fn create_sub_category(
        &self,
        organization_id: Uuid,
        category_id: Uuid,
        name: &str,
        description: Option<&str>,
    ) -> ResultEngine<FoodSubCategory> {
        let name = normalize_required_name(name, "sub-category")?;
        let description = normalize_optional_text(description);
        with_tx!(self, |db_tx| {
            self.require_organization(&db_tx, organization_id).await?;
            let parent = food_categories::Entity::find_by_id(category_id)
                .filter(food_categories::Column::OrganizationId.eq(organization_id))
                .one(&db_tx)
                .await?;
            if parent.is_none() {
                return Err(EngineError::NotFound(format!(
                    "category {category_id}"
                )));
            }
            let siblings = food_sub_categories::Entity::find()
                .filter(
                    food_sub_categories::Column::OrganizationId.eq(organization_id),
                )
                .filter(food_sub_categories::Column::CategoryId.eq(category_id))
                .count(&db_tx)
                .await?;
            let now = Utc::now();
            let model = food_sub_categories::ActiveModel {
                id: ActiveValue::Set(Uuid::new_v4()),
                organization_id: ActiveValue::Set(organization_id),
                category_id: ActiveValue::Set(category_id),
                name: ActiveValue::Set(name),
                description: ActiveValue::Set(description),
                sort_order: ActiveValue::Set(siblings as i32),
                created_at: ActiveValue::Set(now),
                updated_at: ActiveValue::Set(now),
            }
            .insert(&db_tx)
            .await?;
            Ok(model.into())
        })
    }
}
