use sea_orm::{ActiveValue, Database, DatabaseConnection, EntityTrait};

use engine::{EditorSelection, Engine, EngineError, ReorderDirection, organizations};
use migration::MigratorTrait;
use uuid::Uuid;

async fn engine_with_org() -> (Engine, DatabaseConnection, Uuid) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let org_id = Uuid::new_v4();
    organizations::Entity::insert(organizations::ActiveModel {
        id: ActiveValue::Set(org_id),
        name: ActiveValue::Set("Test Kitchen".to_string()),
    })
    .exec(&db)
    .await
    .unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (engine, db, org_id)
}

#[tokio::test]
async fn groups_list_in_creation_order() {
    let (engine, _db, org) = engine_with_org().await;

    let food = engine
        .create_major_group(org, "Food", None, "utensils", "amber")
        .await
        .unwrap();
    let beverage = engine
        .create_major_group(org, "Beverage", None, "cup", "blue")
        .await
        .unwrap();

    assert_eq!(food.sort_order, 0);
    assert_eq!(beverage.sort_order, 1);

    let groups = engine.list_major_groups(org).await.unwrap();
    let names: Vec<&str> = groups.iter().map(|g| g.name.as_str()).collect();
    assert_eq!(names, vec!["Food", "Beverage"]);
}

#[tokio::test]
async fn unknown_org_is_unauthorized() {
    let (engine, _db, _org) = engine_with_org().await;

    let err = engine.list_major_groups(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, EngineError::Unauthorized(_)));
}

#[tokio::test]
async fn category_requires_existing_group() {
    let (engine, _db, org) = engine_with_org().await;

    let err = engine
        .create_category(org, Uuid::new_v4(), "Proteins", None)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::NotFound(_)));
}

#[tokio::test]
async fn blank_name_is_rejected() {
    let (engine, _db, org) = engine_with_org().await;

    let err = engine
        .create_major_group(org, "   ", None, "", "")
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
}

#[tokio::test]
async fn reorder_swaps_with_neighbor_and_ignores_boundaries() {
    let (engine, _db, org) = engine_with_org().await;

    let food = engine
        .create_major_group(org, "Food", None, "utensils", "amber")
        .await
        .unwrap();
    engine
        .create_major_group(org, "Beverage", None, "cup", "blue")
        .await
        .unwrap();

    // Already first: no-op.
    engine
        .reorder_major_group(org, food.id, ReorderDirection::Up)
        .await
        .unwrap();
    let groups = engine.list_major_groups(org).await.unwrap();
    assert_eq!(groups[0].name, "Food");

    engine
        .reorder_major_group(org, food.id, ReorderDirection::Down)
        .await
        .unwrap();
    let groups = engine.list_major_groups(org).await.unwrap();
    let names: Vec<&str> = groups.iter().map(|g| g.name.as_str()).collect();
    assert_eq!(names, vec!["Beverage", "Food"]);

    // Now last: no-op again.
    engine
        .reorder_major_group(org, food.id, ReorderDirection::Down)
        .await
        .unwrap();
    let groups = engine.list_major_groups(org).await.unwrap();
    assert_eq!(groups[1].name, "Food");
}

#[tokio::test]
async fn reorder_scopes_to_siblings_of_the_same_parent() {
    let (engine, _db, org) = engine_with_org().await;

    let food = engine
        .create_major_group(org, "Food", None, "utensils", "amber")
        .await
        .unwrap();
    let proteins = engine
        .create_category(org, food.id, "Proteins", None)
        .await
        .unwrap();
    let produce = engine
        .create_category(org, food.id, "Produce", None)
        .await
        .unwrap();

    engine
        .reorder_category(org, produce.id, ReorderDirection::Up)
        .await
        .unwrap();
    let categories = engine.list_categories(org, food.id).await.unwrap();
    assert_eq!(categories[0].id, produce.id);
    assert_eq!(categories[1].id, proteins.id);
}

#[tokio::test]
async fn rename_unknown_node_is_not_found() {
    let (engine, _db, org) = engine_with_org().await;

    let err = engine
        .rename_major_group(org, Uuid::new_v4(), "Renamed", None)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::NotFound(_)));
}

#[tokio::test]
async fn delete_returns_id_for_selection_invalidation() {
    let (engine, _db, org) = engine_with_org().await;

    let food = engine
        .create_major_group(org, "Food", None, "utensils", "amber")
        .await
        .unwrap();
    let proteins = engine
        .create_category(org, food.id, "Proteins", None)
        .await
        .unwrap();
    let beef = engine
        .create_sub_category(org, proteins.id, "Beef", None)
        .await
        .unwrap();

    let mut selection = EditorSelection::default();
    selection.select_group(food.id);
    selection.select_category(proteins.id);
    selection.select_sub_category(beef.id);

    let deleted = engine.delete_category(org, proteins.id).await.unwrap();
    assert_eq!(deleted, proteins.id);

    selection.clear_deleted(deleted);
    assert_eq!(selection.group, Some(food.id));
    assert_eq!(selection.category, None);
    assert_eq!(selection.sub_category, None);
}
