use axum::{
    Router,
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::{get, post, put},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Basic},
};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

use std::sync::Arc;

use crate::{ingredients, prepared_items, recipes, taxonomy};
use engine::{Engine, users};

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    pub db: DatabaseConnection,
}

/// Basic-auth middleware. Resolves the credentials to a user row and
/// attaches it to the request; handlers read the organization from it.
async fn auth(
    auth_header: TypedHeader<Authorization<Basic>>,
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    if auth_header.username().is_empty() || auth_header.password().is_empty() {
        return Err(StatusCode::UNAUTHORIZED);
    }

    let user: Option<users::Model> = users::Entity::find()
        .filter(users::Column::Username.eq(auth_header.username()))
        .filter(users::Column::Password.eq(auth_header.password()))
        .one(&state.db)
        .await
        .map_err(|_| StatusCode::UNAUTHORIZED)?;

    let Some(user) = user else {
        return Err(StatusCode::UNAUTHORIZED);
    };

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

fn router(state: ServerState) -> Router {
    Router::new()
        .route(
            "/majorGroups",
            get(taxonomy::list_major_groups).post(taxonomy::create_major_group),
        )
        .route(
            "/majorGroups/{id}",
            put(taxonomy::rename_major_group).delete(taxonomy::delete_major_group),
        )
        .route("/majorGroups/{id}/reorder", post(taxonomy::reorder_major_group))
        .route("/majorGroups/{id}/categories", get(taxonomy::list_categories))
        .route("/categories", post(taxonomy::create_category))
        .route(
            "/categories/{id}",
            put(taxonomy::rename_category).delete(taxonomy::delete_category),
        )
        .route("/categories/{id}/reorder", post(taxonomy::reorder_category))
        .route(
            "/categories/{id}/subCategories",
            get(taxonomy::list_sub_categories),
        )
        .route("/subCategories", post(taxonomy::create_sub_category))
        .route(
            "/subCategories/{id}",
            put(taxonomy::rename_sub_category)
                .delete(taxonomy::delete_sub_category),
        )
        .route(
            "/subCategories/{id}/reorder",
            post(taxonomy::reorder_sub_category),
        )
        .route(
            "/ingredients",
            get(ingredients::list).post(ingredients::create),
        )
        .route(
            "/ingredients/{id}",
            put(ingredients::update).delete(ingredients::remove),
        )
        .route("/ingredients/import", post(ingredients::import))
        .route("/preparedItems", get(prepared_items::list))
        .route("/preparedItems/import", post(prepared_items::import))
        .route("/recipes", get(recipes::list).post(recipes::create))
        .route("/recipes/validate", post(recipes::validate))
        .route("/recipes/seed", post(recipes::seed))
        .route(
            "/recipes/{id}",
            get(recipes::get_one)
                .put(recipes::update)
                .delete(recipes::remove),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), auth))
        .with_state(state)
}

/// Build the full application router over an engine and its database.
pub fn app(engine: Engine, db: DatabaseConnection) -> Router {
    router(ServerState {
        engine: Arc::new(engine),
        db,
    })
}

pub async fn run(engine: Engine, db: DatabaseConnection) {
    let listener = match tokio::net::TcpListener::bind("127.0.0.1:3000").await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(engine, db, listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(
    engine: Engine,
    db: DatabaseConnection,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app(engine, db)).await
}

pub fn spawn_with_listener(
    engine: Engine,
    db: DatabaseConnection,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, db, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
