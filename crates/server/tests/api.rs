use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use chrono::Utc;
use http_body_util::BodyExt;
use sea_orm::{ActiveValue, Database, EntityTrait};
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

use engine::{organizations, users};
use migration::MigratorTrait;

async fn test_app() -> Router {
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
    users::Entity::insert(users::ActiveModel {
        username: ActiveValue::Set("chef".to_string()),
        password: ActiveValue::Set("secret".to_string()),
        organization_id: ActiveValue::Set(org_id),
    })
    .exec(&db)
    .await
    .unwrap();

    let engine = engine::Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    server::app(engine, db)
}

fn request(method: &str, uri: &str, credentials: &str, body: Option<Value>) -> Request<Body> {
    let token = STANDARD.encode(credentials);
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Basic {token}"));
    match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

fn authed(method: &str, uri: &str, body: Option<Value>) -> Request<Body> {
    request(method, uri, "chef:secret", body)
}

async fn json_body(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn valid_recipe_payload(name: &str) -> Value {
    json!({
        "recipe_type": "final",
        "name": name,
        "category": "Sauces",
        "station": "Saute",
        "prep_time_minutes": 5,
        "cook_time_minutes": 10,
        "yield": { "value": 2.0, "unit": "L" },
        "ingredients": [{
            "type": "raw",
            "item_code": "WINE-01",
            "name": "White wine",
            "quantity": "0.5",
            "unit": "L"
        }],
        "steps": [{ "id": "1", "description": "Deglaze the pan" }],
        "storage": {
            "temperature": { "min": 1.0, "max": 4.0, "unit": "C" },
            "container": "Cambro",
            "container_type": "6qt"
        },
        "training": { "skill_level": "intermediate" },
        "versions": [{
            "version": "1.0.0",
            "date": Utc::now(),
            "author": "chef",
            "changes": ["Initial version"]
        }],
        "current_version": "1.0.0"
    })
}

#[tokio::test]
async fn requests_without_valid_credentials_are_refused() {
    let app = test_app().await;

    let anonymous = Request::builder()
        .method("GET")
        .uri("/majorGroups")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(anonymous).await.unwrap();
    assert!(response.status().is_client_error());

    let response = app
        .oneshot(request("GET", "/majorGroups", "chef:wrong", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn taxonomy_endpoints_round_trip() {
    let app = test_app().await;

    let response = app
        .clone()
        .oneshot(authed(
            "POST",
            "/majorGroups",
            Some(json!({
                "name": "Food",
                "description": null,
                "icon": "utensils",
                "color": "amber"
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let group = json_body(response).await;
    assert_eq!(group["name"], "Food");
    assert_eq!(group["sort_order"], 0);
    let group_id = group["id"].as_str().unwrap().to_owned();

    let response = app
        .clone()
        .oneshot(authed(
            "POST",
            "/categories",
            Some(json!({ "parent_id": group_id, "name": "Proteins", "description": null })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(authed(
            "GET",
            &format!("/majorGroups/{group_id}/categories"),
            None,
        ))
        .await
        .unwrap();
    let categories = json_body(response).await;
    assert_eq!(categories.as_array().unwrap().len(), 1);
    assert_eq!(categories[0]["name"], "Proteins");

    let response = app
        .clone()
        .oneshot(authed(
            "POST",
            &format!("/majorGroups/{group_id}/reorder"),
            Some(json!({ "direction": "down" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(authed("DELETE", &format!("/majorGroups/{group_id}"), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let deleted = json_body(response).await;
    assert_eq!(deleted["id"].as_str().unwrap(), group_id);
}

#[tokio::test]
async fn creating_an_invalid_recipe_returns_every_violation() {
    let app = test_app().await;

    let response = app
        .oneshot(authed(
            "POST",
            "/recipes",
            Some(json!({ "recipe_type": "final", "name": "" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let report = json_body(response).await;
    let errors = report["errors"].as_array().unwrap();
    assert!(errors.contains(&json!("Recipe name is required")));
    assert!(errors.contains(&json!("Category is required")));
    assert!(errors.contains(&json!("At least one ingredient is required")));
    assert!(errors.contains(&json!("At least one step is required")));
    assert!(errors.contains(&json!("Version information is required")));
}

#[tokio::test]
async fn recipe_lifecycle_over_http() {
    let app = test_app().await;

    let response = app
        .clone()
        .oneshot(authed(
            "POST",
            "/recipes",
            Some(valid_recipe_payload("Pan Sauce")),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let recipe = json_body(response).await;
    assert_eq!(recipe["current_version"], "1.0.0");
    assert_eq!(recipe["created_by"], "chef");
    let id = recipe["id"].as_str().unwrap().to_owned();

    // Significant update over the wire bumps the patch version.
    let response = app
        .clone()
        .oneshot(authed(
            "PUT",
            &format!("/recipes/{id}"),
            Some(json!({
                "steps": [{ "id": "1", "description": "Deglaze, then mount with butter" }]
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let updated = json_body(response).await;
    assert_eq!(updated["current_version"], "1.0.1");

    let response = app
        .clone()
        .oneshot(authed("GET", "/recipes?recipe_type=final", None))
        .await
        .unwrap();
    let listed = json_body(response).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let response = app
        .clone()
        .oneshot(authed("DELETE", &format!("/recipes/{id}"), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(authed("GET", &format!("/recipes/{id}"), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn validate_endpoint_reports_without_saving() {
    let app = test_app().await;

    let response = app
        .clone()
        .oneshot(authed(
            "POST",
            "/recipes/validate",
            Some(valid_recipe_payload("Pan Sauce")),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let report = json_body(response).await;
    assert!(report["errors"].as_array().unwrap().is_empty());

    let response = app
        .oneshot(authed("GET", "/recipes", None))
        .await
        .unwrap();
    let listed = json_body(response).await;
    assert!(listed.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn ingredient_import_applies_rows() {
    let app = test_app().await;

    let response = app
        .clone()
        .oneshot(authed(
            "POST",
            "/ingredients/import",
            Some(json!({
                "rows": [{
                    "Item Code": "BEEF-001",
                    "Product Name": "Beef Brisket",
                    "Case Price": "$125.99",
                    "Recipe Units/Case": "10",
                    "Yield %": "85%"
                }]
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let result = json_body(response).await;
    assert_eq!(result["applied"], 1);

    let response = app
        .oneshot(authed("GET", "/ingredients", None))
        .await
        .unwrap();
    let listed = json_body(response).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["item_code"], "BEEF-001");
}

#[tokio::test]
async fn duplicate_ingredient_item_code_conflicts() {
    let app = test_app().await;

    let payload = json!({
        "item_code": "BEEF-001",
        "product": "Beef Brisket",
        "current_price": 100.0,
        "recipe_units_per_case": 10.0,
        "yield_percent": 100.0
    });
    let response = app
        .clone()
        .oneshot(authed("POST", "/ingredients", Some(payload.clone())))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(authed("POST", "/ingredients", Some(payload)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}
