//! Prepared-item API endpoints.

use api_types::import::{ImportResult, ImportRows};
use axum::{Extension, Json, extract::State};
use engine::{PreparedItem, users};

use crate::{ServerError, server::ServerState};

pub async fn list(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<PreparedItem>>, ServerError> {
    let items = state.engine.list_prepared_items(user.organization_id).await?;
    Ok(Json(items))
}

pub async fn import(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<ImportRows>,
) -> Result<Json<ImportResult>, ServerError> {
    let applied = state
        .engine
        .import_prepared_items(user.organization_id, &payload.rows)
        .await?;
    Ok(Json(ImportResult { applied }))
}
