//! Recipe API endpoints.
//!
//! Creation validates the whole document first and refuses to save an
//! invalid recipe; the standalone validate endpoint runs the same checks
//! without saving, so editors can surface every problem at once.

use api_types::recipe::{RecipeList, Seeded, ValidationReport};
use api_types::taxonomy::Deleted;
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use engine::{Recipe, RecipeListFilter, RecipeType, RecipeUpdate, users, validate_recipe};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

fn list_filter(query: RecipeList) -> Result<RecipeListFilter, ServerError> {
    let recipe_type = query
        .recipe_type
        .as_deref()
        .map(RecipeType::try_from)
        .transpose()?;
    Ok(RecipeListFilter {
        recipe_type,
        search: query.search,
    })
}

pub async fn list(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Query(query): Query<RecipeList>,
) -> Result<Json<Vec<Recipe>>, ServerError> {
    let filter = list_filter(query)?;
    let recipes = state.engine.list_recipes(user.organization_id, &filter).await?;
    Ok(Json(recipes))
}

pub async fn get_one(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Recipe>, ServerError> {
    let recipe = state.engine.get_recipe(user.organization_id, id).await?;
    Ok(Json(recipe))
}

pub async fn create(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<Recipe>,
) -> Result<Json<Recipe>, ServerError> {
    let errors = validate_recipe(&payload);
    if !errors.is_empty() {
        return Err(ServerError::RecipeInvalid(errors));
    }
    let recipe = state
        .engine
        .create_recipe(user.organization_id, &user.username, payload)
        .await?;
    Ok(Json(recipe))
}

pub async fn update(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<RecipeUpdate>,
) -> Result<Json<Recipe>, ServerError> {
    let recipe = state
        .engine
        .update_recipe(user.organization_id, id, &user.username, payload)
        .await?;
    Ok(Json(recipe))
}

pub async fn remove(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Deleted>, ServerError> {
    let id = state.engine.delete_recipe(user.organization_id, id).await?;
    Ok(Json(Deleted { id }))
}

/// Run the full validation pass over a posted document without saving.
pub async fn validate(
    Json(payload): Json<Recipe>,
) -> Result<Json<ValidationReport>, ServerError> {
    Ok(Json(ValidationReport {
        errors: validate_recipe(&payload),
    }))
}

pub async fn seed(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
) -> Result<Json<Seeded>, ServerError> {
    let created = state
        .engine
        .seed_from_prepared_items(user.organization_id, &user.username)
        .await?;
    Ok(Json(Seeded { created }))
}
