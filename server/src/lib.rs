//! HTTP service exposing CRUD over the todo item store.
//!
//! # Overview
//! Routes live under `/todoitems`. Handlers hold an `Arc<dyn TodoStore>`
//! and perform exactly one store operation per request. Two middleware
//! layers wrap them: the basic-auth gate (`auth`), and outermost the
//! request/response transcript logger (`logging`), so rejected requests
//! are transcribed too.
//!
//! # Design
//! - PUT checks the path/body id mismatch before touching the store (400),
//!   then existence (404), then updates. The two failures are distinct:
//!   400 means the request itself is malformed, 404 means a valid request
//!   targeted a missing resource.
//! - POST ignores any client-supplied id and answers 201 with a `Location`
//!   header pointing at the stored item.
//! - Store failures surface as 500 with an error record; they carry no body.

pub mod auth;
pub mod logging;

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, HeaderName, StatusCode},
    middleware,
    routing::get,
    Json, Router,
};
use tokio::net::TcpListener;

use todo_store::{StoreError, TodoItem, TodoStore};

pub use auth::Credential;

pub type Store = Arc<dyn TodoStore>;

/// Service configuration, passed in explicitly rather than read from
/// ambient state. `main` assembles it from the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub credential: Credential,
    pub http_log: bool,
}

pub fn app(store: Store, config: AppConfig) -> Router {
    let router = Router::new()
        .route("/todoitems", get(list_items).post(create_item))
        .route(
            "/todoitems/{id}",
            get(get_item).put(update_item).delete(delete_item),
        )
        .with_state(store)
        .layer(middleware::from_fn_with_state(
            config.credential,
            auth::require_basic,
        ));
    if config.http_log {
        router.layer(middleware::from_fn(logging::transcript))
    } else {
        router
    }
}

pub async fn run(
    listener: TcpListener,
    store: Store,
    config: AppConfig,
) -> Result<(), std::io::Error> {
    axum::serve(listener, app(store, config)).await
}

async fn list_items(State(store): State<Store>) -> Result<Json<Vec<TodoItem>>, StatusCode> {
    store.list().await.map(Json).map_err(internal)
}

async fn get_item(
    State(store): State<Store>,
    Path(id): Path<i64>,
) -> Result<Json<TodoItem>, StatusCode> {
    match store.get(id).await.map_err(internal)? {
        Some(item) => Ok(Json(item)),
        None => Err(StatusCode::NOT_FOUND),
    }
}

async fn create_item(
    State(store): State<Store>,
    Json(input): Json<TodoItem>,
) -> Result<(StatusCode, [(HeaderName, String); 1], Json<TodoItem>), StatusCode> {
    let item = store.insert(input).await.map_err(internal)?;
    let location = format!("/todoitems/{}", item.id);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(item)))
}

async fn update_item(
    State(store): State<Store>,
    Path(id): Path<i64>,
    Json(item): Json<TodoItem>,
) -> Result<StatusCode, StatusCode> {
    if item.id != id {
        return Err(StatusCode::BAD_REQUEST);
    }
    if !store.exists(id).await.map_err(internal)? {
        return Err(StatusCode::NOT_FOUND);
    }
    store.update(&item).await.map_err(internal)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_item(
    State(store): State<Store>,
    Path(id): Path<i64>,
) -> Result<StatusCode, StatusCode> {
    if !store.exists(id).await.map_err(internal)? {
        return Err(StatusCode::NOT_FOUND);
    }
    store.delete(id).await.map_err(internal)?;
    Ok(StatusCode::NO_CONTENT)
}

fn internal(err: StoreError) -> StatusCode {
    tracing::error!("store failure: {err}");
    StatusCode::INTERNAL_SERVER_ERROR
}
