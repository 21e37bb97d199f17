use sea_orm::{ActiveValue, Database, DatabaseConnection, EntityTrait};

use engine::{Engine, EngineError, ImportRow, organizations};
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

fn import_row(pairs: &[(&str, &str)]) -> ImportRow {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect()
}

#[tokio::test]
async fn import_upserts_on_item_id() {
    let (engine, _db, org) = engine_with_org().await;

    let marinara = import_row(&[
        ("Item ID", "PREP-001"),
        ("PRODUCT", "Marinara Sauce"),
        ("COST PER R/U", "$2.50"),
        ("YIELD %", "95%"),
        ("STORAGE AREA", "Walk-in"),
        ("Milk", "0"),
    ]);
    let stock = import_row(&[
        ("Item ID", "PREP-002"),
        ("PRODUCT", "Chicken Stock"),
        ("COST PER R/U", "1.10"),
    ]);
    let applied = engine
        .import_prepared_items(org, &[marinara, stock])
        .await
        .unwrap();
    assert_eq!(applied, 2);

    let listed = engine.list_prepared_items(org).await.unwrap();
    assert_eq!(listed.len(), 2);
    // Listing orders by product name.
    assert_eq!(listed[0].product, "Chicken Stock");
    assert_eq!(listed[1].product, "Marinara Sauce");
    assert!((listed[1].cost_per_recipe_unit - 2.50).abs() < 1e-9);
    assert!((listed[1].yield_percent - 95.0).abs() < 1e-9);

    // Re-importing the same item id updates in place.
    let revised = import_row(&[
        ("Item ID", "PREP-001"),
        ("PRODUCT", "Marinara Sauce"),
        ("COST PER R/U", "3.00"),
        ("Milk", "1"),
    ]);
    let applied = engine
        .import_prepared_items(org, &[revised])
        .await
        .unwrap();
    assert_eq!(applied, 1);

    let listed = engine.list_prepared_items(org).await.unwrap();
    assert_eq!(listed.len(), 2);
    let marinara = listed
        .iter()
        .find(|item| item.item_id == "PREP-001")
        .unwrap();
    assert!((marinara.cost_per_recipe_unit - 3.00).abs() < 1e-9);
    assert_eq!(marinara.allergens.active_names(), vec!["milk".to_owned()]);
}

#[tokio::test]
async fn import_requires_a_known_organization() {
    let (engine, _db, _org) = engine_with_org().await;

    let row = import_row(&[
        ("Item ID", "PREP-001"),
        ("PRODUCT", "Marinara Sauce"),
    ]);
    let err = engine
        .import_prepared_items(Uuid::new_v4(), &[row])
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Unauthorized(_)));
}

#[tokio::test]
async fn import_rejects_rows_without_an_item_id() {
    let (engine, _db, org) = engine_with_org().await;

    let nameless = import_row(&[("PRODUCT", "Mystery Prep")]);
    let err = engine
        .import_prepared_items(org, &[nameless])
        .await
        .unwrap_err();
    let EngineError::Validation(message) = err else {
        panic!("expected validation error");
    };
    assert!(message.starts_with("row 1:"));

    assert!(engine.list_prepared_items(org).await.unwrap().is_empty());
}
