//! Organization-scoped catalog operations.
//!
//! Every public method takes the caller's organization id and verifies it
//! before touching catalog rows. All writes run inside a database
//! transaction.

use sea_orm::{DatabaseConnection, DatabaseTransaction, prelude::*};
use serde::{Deserialize, Serialize};

use crate::{EngineError, ResultEngine, organizations};

mod ingredients;
mod prepared;
mod recipes;
mod taxonomy;

pub use recipes::RecipeListFilter;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

/// Direction for moving a taxonomy node among its siblings.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReorderDirection {
    Up,
    Down,
}

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// Resolve the organization or refuse the operation.
    pub(crate) async fn require_organization(
        &self,
        db: &DatabaseTransaction,
        organization_id: Uuid,
    ) -> ResultEngine<organizations::Model> {
        organizations::Entity::find_by_id(organization_id)
            .one(db)
            .await?
            .ok_or_else(|| EngineError::Unauthorized(organization_id.to_string()))
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        Ok(Engine {
            database: self.database,
        })
    }
}
