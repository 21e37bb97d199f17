//! Taxonomy API endpoints.

use api_types::taxonomy::{Deleted, Direction, GroupNew, NodeNew, NodeRename, NodeReorder};
use axum::{
    Extension, Json,
    extract::{Path, State},
};
use engine::{FoodCategory, FoodSubCategory, MajorGroup, ReorderDirection, users};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

fn direction(value: Direction) -> ReorderDirection {
    match value {
        Direction::Up => ReorderDirection::Up,
        Direction::Down => ReorderDirection::Down,
    }
}

pub async fn list_major_groups(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<MajorGroup>>, ServerError> {
    let groups = state.engine.list_major_groups(user.organization_id).await?;
    Ok(Json(groups))
}

pub async fn create_major_group(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<GroupNew>,
) -> Result<Json<MajorGroup>, ServerError> {
    let group = state
        .engine
        .create_major_group(
            user.organization_id,
            &payload.name,
            payload.description.as_deref(),
            &payload.icon,
            &payload.color,
        )
        .await?;
    Ok(Json(group))
}

pub async fn rename_major_group(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<NodeRename>,
) -> Result<(), ServerError> {
    state
        .engine
        .rename_major_group(
            user.organization_id,
            id,
            &payload.name,
            payload.description.as_deref(),
        )
        .await?;
    Ok(())
}

pub async fn reorder_major_group(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<NodeReorder>,
) -> Result<(), ServerError> {
    state
        .engine
        .reorder_major_group(user.organization_id, id, direction(payload.direction))
        .await?;
    Ok(())
}

pub async fn delete_major_group(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Deleted>, ServerError> {
    let id = state.engine.delete_major_group(user.organization_id, id).await?;
    Ok(Json(Deleted { id }))
}

pub async fn list_categories(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(group_id): Path<Uuid>,
) -> Result<Json<Vec<FoodCategory>>, ServerError> {
    let categories = state
        .engine
        .list_categories(user.organization_id, group_id)
        .await?;
    Ok(Json(categories))
}

pub async fn create_category(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<NodeNew>,
) -> Result<Json<FoodCategory>, ServerError> {
    let category = state
        .engine
        .create_category(
            user.organization_id,
            payload.parent_id,
            &payload.name,
            payload.description.as_deref(),
        )
        .await?;
    Ok(Json(category))
}

pub async fn rename_category(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<NodeRename>,
) -> Result<(), ServerError> {
    state
        .engine
        .rename_category(
            user.organization_id,
            id,
            &payload.name,
            payload.description.as_deref(),
        )
        .await?;
    Ok(())
}

pub async fn reorder_category(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<NodeReorder>,
) -> Result<(), ServerError> {
    state
        .engine
        .reorder_category(user.organization_id, id, direction(payload.direction))
        .await?;
    Ok(())
}

pub async fn delete_category(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Deleted>, ServerError> {
    let id = state.engine.delete_category(user.organization_id, id).await?;
    Ok(Json(Deleted { id }))
}

pub async fn list_sub_categories(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(category_id): Path<Uuid>,
) -> Result<Json<Vec<FoodSubCategory>>, ServerError> {
    let sub_categories = state
        .engine
        .list_sub_categories(user.organization_id, category_id)
        .await?;
    Ok(Json(sub_categories))
}

pub async fn create_sub_category(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<NodeNew>,
) -> Result<Json<FoodSubCategory>, ServerError> {
    let sub_category = state
        .engine
        .create_sub_category(
            user.organization_id,
            payload.parent_id,
            &payload.name,
            payload.description.as_deref(),
        )
        .await?;
    Ok(Json(sub_category))
}

pub async fn rename_sub_category(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<NodeRename>,
) -> Result<(), ServerError> {
    state
        .engine
        .rename_sub_category(
            user.organization_id,
            id,
            &payload.name,
            payload.description.as_deref(),
        )
        .await?;
    Ok(())
}

pub async fn reorder_sub_category(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<NodeReorder>,
) -> Result<(), ServerError> {
    state
        .engine
        .reorder_sub_category(user.organization_id, id, direction(payload.direction))
        .await?;
    Ok(())
}

pub async fn delete_sub_category(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Deleted>, ServerError> {
    let id = state
        .engine
        .delete_sub_category(user.organization_id, id)
        .await?;
    Ok(Json(Deleted { id }))
}
