use chrono::Utc;
use sea_orm::{ActiveValue, Database, DatabaseConnection, EntityTrait};

use engine::{
    Allergen, AllergenProfile, Engine, EngineError, IngredientSource,
    MasterIngredientInput, PreparedItemInput, Recipe, RecipeIngredient,
    RecipeListFilter, RecipeStorage, RecipeTraining, RecipeType, RecipeUpdate,
    RecipeYield, organizations,
};
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

/// A recipe using 2 recipe units of BEEF-001 and yielding 10 portions.
fn brisket_recipe(name: &str) -> Recipe {
    Recipe {
        id: Uuid::nil(),
        recipe_type: RecipeType::Final,
        name: name.to_owned(),
        category: "Mains".to_owned(),
        sub_category: "Beef".to_owned(),
        station: "Grill".to_owned(),
        description: String::new(),
        prep_time_minutes: 30,
        cook_time_minutes: 60,
        recipe_yield: RecipeYield { value: 10.0, unit: "portion".to_owned() },
        ingredients: vec![RecipeIngredient {
            source: IngredientSource::Raw { item_code: "BEEF-001".to_owned() },
            name: "Beef Brisket".to_owned(),
            quantity: "2".to_owned(),
            unit: "portion".to_owned(),
            notes: None,
            cost: 0.0,
        }],
        steps: Vec::new(),
        equipment: Vec::new(),
        storage: RecipeStorage::default(),
        training: RecipeTraining::default(),
        quality_control: Default::default(),
        allergens: Vec::new(),
        ingredient_cost: 0.0,
        labor_cost: 0.0,
        total_cost: 0.0,
        cost_per_unit: 0.0,
        versions: Vec::new(),
        current_version: String::new(),
        created_by: String::new(),
        updated_by: String::new(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

/// BEEF-001 at 10.00 per recipe unit.
async fn seed_brisket(engine: &Engine, org: Uuid) {
    engine
        .create_master_ingredient(
            org,
            MasterIngredientInput {
                item_code: "BEEF-001".to_owned(),
                product: "Beef Brisket".to_owned(),
                current_price: 100.0,
                recipe_units_per_case: 10.0,
                yield_percent: 100.0,
                ..Default::default()
            },
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn create_assigns_initial_version_and_costs() {
    let (engine, _db, org) = engine_with_org().await;
    seed_brisket(&engine, org).await;

    let created = engine
        .create_recipe(org, "chef", brisket_recipe("Smoked Brisket"))
        .await
        .unwrap();

    assert_eq!(created.current_version, "1.0.0");
    assert_eq!(created.versions.len(), 1);
    assert_eq!(created.versions[0].changes, vec!["Initial version"]);
    assert_eq!(created.created_by, "chef");

    // 2 units at 10.00, plus 90 minutes of labor at 30.00/h, over 10 portions.
    assert!((created.ingredients[0].cost - 20.0).abs() < 1e-9);
    assert!((created.ingredient_cost - 20.0).abs() < 1e-9);
    assert!((created.labor_cost - 45.0).abs() < 1e-9);
    assert!((created.total_cost - 65.0).abs() < 1e-9);
    assert!((created.cost_per_unit - 6.5).abs() < 1e-9);

    let fetched = engine.get_recipe(org, created.id).await.unwrap();
    assert_eq!(fetched.id, created.id);
    assert_eq!(fetched.current_version, "1.0.0");
    assert!((fetched.total_cost - 65.0).abs() < 1e-9);
}

#[tokio::test]
async fn significant_update_bumps_the_patch_version() {
    let (engine, _db, org) = engine_with_org().await;
    seed_brisket(&engine, org).await;

    let created = engine
        .create_recipe(org, "chef", brisket_recipe("Smoked Brisket"))
        .await
        .unwrap();

    let update = RecipeUpdate {
        ingredients: Some(vec![RecipeIngredient {
            source: IngredientSource::Raw { item_code: "BEEF-001".to_owned() },
            name: "Beef Brisket".to_owned(),
            quantity: "3".to_owned(),
            unit: "portion".to_owned(),
            notes: None,
            cost: 0.0,
        }]),
        ..Default::default()
    };
    let updated = engine
        .update_recipe(org, created.id, "sous chef", update)
        .await
        .unwrap();

    assert_eq!(updated.current_version, "1.0.1");
    assert_eq!(updated.versions.len(), 2);
    assert_eq!(updated.versions[1].version, "1.0.1");
    assert_eq!(updated.versions[1].author, "sous chef");
    assert_eq!(updated.versions[1].changes, vec!["Updated ingredients"]);
    assert!((updated.ingredient_cost - 30.0).abs() < 1e-9);
}

#[tokio::test]
async fn cosmetic_update_leaves_the_version_alone() {
    let (engine, _db, org) = engine_with_org().await;
    seed_brisket(&engine, org).await;

    let created = engine
        .create_recipe(org, "chef", brisket_recipe("Smoked Brisket"))
        .await
        .unwrap();

    let update = RecipeUpdate {
        description: Some("Low and slow over oak.".to_owned()),
        ..Default::default()
    };
    let updated = engine
        .update_recipe(org, created.id, "sous chef", update)
        .await
        .unwrap();

    assert_eq!(updated.current_version, "1.0.0");
    assert_eq!(updated.versions.len(), 1);
    assert_eq!(updated.updated_by, "sous chef");
    assert_eq!(updated.description, "Low and slow over oak.");
}

#[tokio::test]
async fn updates_recost_against_the_current_catalog() {
    let (engine, _db, org) = engine_with_org().await;
    seed_brisket(&engine, org).await;

    let created = engine
        .create_recipe(org, "chef", brisket_recipe("Smoked Brisket"))
        .await
        .unwrap();
    assert!((created.ingredient_cost - 20.0).abs() < 1e-9);

    // Price doubles; even a cosmetic edit picks up the new unit cost.
    let ingredient = &engine.list_master_ingredients(org).await.unwrap()[0];
    engine
        .update_master_ingredient(
            org,
            ingredient.id,
            MasterIngredientInput {
                item_code: "BEEF-001".to_owned(),
                product: "Beef Brisket".to_owned(),
                current_price: 200.0,
                recipe_units_per_case: 10.0,
                yield_percent: 100.0,
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let updated = engine
        .update_recipe(org, created.id, "chef", RecipeUpdate::default())
        .await
        .unwrap();
    assert!((updated.ingredient_cost - 40.0).abs() < 1e-9);
    assert_eq!(updated.current_version, "1.0.0");
}

#[tokio::test]
async fn unresolved_ingredients_cost_zero() {
    let (engine, _db, org) = engine_with_org().await;

    // No BEEF-001 in the catalog: the line and the roll-up cost nothing.
    let created = engine
        .create_recipe(org, "chef", brisket_recipe("Smoked Brisket"))
        .await
        .unwrap();
    assert!((created.ingredients[0].cost).abs() < 1e-9);
    assert!((created.ingredient_cost).abs() < 1e-9);
    assert!((created.labor_cost - 45.0).abs() < 1e-9);
}

#[tokio::test]
async fn list_filters_by_type_and_search_term() {
    let (engine, _db, org) = engine_with_org().await;
    seed_brisket(&engine, org).await;

    engine
        .create_recipe(org, "chef", brisket_recipe("Smoked Brisket"))
        .await
        .unwrap();
    let mut sauce = brisket_recipe("Barbecue Sauce");
    sauce.recipe_type = RecipeType::Prepared;
    sauce.category = "Sauces".to_owned();
    sauce.sub_category = String::new();
    engine.create_recipe(org, "chef", sauce).await.unwrap();

    let prepared = engine
        .list_recipes(
            org,
            &RecipeListFilter {
                recipe_type: Some(RecipeType::Prepared),
                search: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(prepared.len(), 1);
    assert_eq!(prepared[0].name, "Barbecue Sauce");

    let matched = engine
        .list_recipes(
            org,
            &RecipeListFilter {
                recipe_type: None,
                search: Some("BRISKET".to_owned()),
            },
        )
        .await
        .unwrap();
    assert_eq!(matched.len(), 1);
    assert_eq!(matched[0].name, "Smoked Brisket");
}

#[tokio::test]
async fn delete_removes_the_recipe() {
    let (engine, _db, org) = engine_with_org().await;

    let created = engine
        .create_recipe(org, "chef", brisket_recipe("Smoked Brisket"))
        .await
        .unwrap();
    let deleted = engine.delete_recipe(org, created.id).await.unwrap();
    assert_eq!(deleted, created.id);

    let err = engine.get_recipe(org, created.id).await.unwrap_err();
    assert!(matches!(err, EngineError::NotFound(_)));
}

#[tokio::test]
async fn seeding_creates_one_shell_per_new_prepared_item() {
    let (engine, _db, org) = engine_with_org().await;

    let mut allergens = AllergenProfile::default();
    allergens.set(Allergen::Milk, true);
    engine
        .create_prepared_item(
            org,
            PreparedItemInput {
                item_id: "PREP-001".to_owned(),
                product: "Marinara Sauce".to_owned(),
                category: "Sauces".to_owned(),
                station: "Prep".to_owned(),
                recipe_unit: "liter".to_owned(),
                cost_per_recipe_unit: 2.5,
                final_cost: 12.0,
                yield_percent: 100.0,
                allergens,
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let created = engine.seed_from_prepared_items(org, "chef").await.unwrap();
    assert_eq!(created, 1);

    let recipes = engine
        .list_recipes(
            org,
            &RecipeListFilter {
                recipe_type: Some(RecipeType::Prepared),
                search: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(recipes.len(), 1);
    let shell = &recipes[0];
    assert_eq!(shell.name, "Marinara Sauce");
    assert_eq!(shell.category, "Sauces");
    assert_eq!(shell.recipe_yield.unit, "liter");
    assert!((shell.cost_per_unit - 2.5).abs() < 1e-9);
    assert!((shell.total_cost - 12.0).abs() < 1e-9);
    assert_eq!(shell.allergens, vec!["milk"]);
    assert_eq!(shell.current_version, "1.0.0");

    // Seeding again finds nothing new.
    let created = engine.seed_from_prepared_items(org, "chef").await.unwrap();
    assert_eq!(created, 0);
}
