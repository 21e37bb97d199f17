use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::EngineError;

use serde::Serialize;
pub use server::{app, run, run_with_listener, spawn_with_listener};

mod ingredients;
mod prepared_items;
mod recipes;
mod server;
mod taxonomy;

pub mod types {
    pub mod taxonomy {
        pub use api_types::taxonomy::{
            Deleted, Direction, GroupNew, NodeNew, NodeRename, NodeReorder,
        };
        pub use engine::{FoodCategory, FoodSubCategory, MajorGroup};
    }

    pub mod import {
        pub use api_types::import::{ImportResult, ImportRows};
    }

    pub mod ingredient {
        pub use engine::{MasterIngredient, MasterIngredientInput};
    }

    pub mod prepared {
        pub use engine::{PreparedItem, PreparedItemInput};
    }

    pub mod recipe {
        pub use api_types::recipe::{RecipeList, Seeded, ValidationReport};
        pub use engine::{Recipe, RecipeUpdate};
    }
}

pub enum ServerError {
    Engine(EngineError),
    /// A recipe document failed validation; all messages travel back.
    RecipeInvalid(Vec<String>),
    Generic(String),
}

#[derive(Serialize)]
struct Error {
    error: String,
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        EngineError::NotFound(_) => StatusCode::NOT_FOUND,
        EngineError::ExistingKey(_) => StatusCode::CONFLICT,
        EngineError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        EngineError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        match self {
            ServerError::Engine(err) => {
                let status = status_for_engine_error(&err);
                let error = message_for_engine_error(err);
                (status, Json(Error { error })).into_response()
            }
            ServerError::RecipeInvalid(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(api_types::recipe::ValidationReport { errors }),
            )
                .into_response(),
            ServerError::Generic(error) => {
                (StatusCode::BAD_REQUEST, Json(Error { error })).into_response()
            }
        }
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}
