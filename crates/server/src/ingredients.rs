//! Master-ingredient API endpoints.

use api_types::import::{ImportResult, ImportRows};
use api_types::taxonomy::Deleted;
use axum::{
    Extension, Json,
    extract::{Path, State},
};
use engine::{MasterIngredient, MasterIngredientInput, users};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

pub async fn list(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<MasterIngredient>>, ServerError> {
    let ingredients = state
        .engine
        .list_master_ingredients(user.organization_id)
        .await?;
    Ok(Json(ingredients))
}

pub async fn create(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<MasterIngredientInput>,
) -> Result<Json<MasterIngredient>, ServerError> {
    let ingredient = state
        .engine
        .create_master_ingredient(user.organization_id, payload)
        .await?;
    Ok(Json(ingredient))
}

pub async fn update(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<MasterIngredientInput>,
) -> Result<Json<MasterIngredient>, ServerError> {
    let ingredient = state
        .engine
        .update_master_ingredient(user.organization_id, id, payload)
        .await?;
    Ok(Json(ingredient))
}

pub async fn remove(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Deleted>, ServerError> {
    let id = state
        .engine
        .delete_master_ingredient(user.organization_id, id)
        .await?;
    Ok(Json(Deleted { id }))
}

pub async fn import(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<ImportRows>,
) -> Result<Json<ImportResult>, ServerError> {
    let applied = state
        .engine
        .import_master_ingredients(user.organization_id, &payload.rows)
        .await?;
    Ok(Json(ImportResult { applied }))
}
