//! `/todos` route table and handlers.

use std::sync::Arc;

use serde_json::{Value, json};
use tracing::{error, warn};

use super::error::TodoError;
use super::id::ListId;
use super::param::todo_contents;
use super::store::TodoStore;
use crate::health;
use crate::method::Method;
use crate::request::Request;
use crate::response::{IntoResponse, Json, Response};
use crate::router::Router;

type Store = Arc<TodoStore>;

/// Every route the service answers, bound to `store`.
pub fn router(store: Store) -> Router<Store> {
    Router::with_state(store)
        .on(Method::Get,    "/todos",      list_todos)
        .on(Method::Post,   "/todos/{id}", create_todo)
        .on(Method::Get,    "/todos/{id}", read_todo)
        .on(Method::Put,    "/todos/{id}", replace_todo)
        .on(Method::Delete, "/todos/{id}", delete_todo)
        .on(Method::Get,    "/healthz",    health::liveness)
        .on(Method::Get,    "/readyz",     health::readiness)
}

// GET /todos
async fn list_todos(_req: Request, store: Store) -> Response {
    match store.list().await {
        Ok(ids) => Json(ids).into_response(),
        Err(e) => failure(None, &e),
    }
}

// POST /todos/{id}
async fn create_todo(req: Request, store: Store) -> Response {
    outcome("created", create(&req, &store).await)
}

// GET /todos/{id}
async fn read_todo(req: Request, store: Store) -> Response {
    match read(&req, &store).await {
        Ok(contents) => Json(contents).into_response(),
        Err(e) => failure(None, &e),
    }
}

// PUT /todos/{id}
async fn replace_todo(req: Request, store: Store) -> Response {
    outcome("updated", replace(&req, &store).await)
}

// DELETE /todos/{id}
async fn delete_todo(req: Request, store: Store) -> Response {
    outcome("deleted", delete(&req, &store).await)
}

async fn create(req: &Request, store: &TodoStore) -> Result<(), TodoError> {
    let id = list_id(req)?;
    let contents = todo_contents(req)?;
    store.create(&id, &contents).await
}

async fn read(req: &Request, store: &TodoStore) -> Result<Value, TodoError> {
    store.read(&list_id(req)?).await
}

async fn replace(req: &Request, store: &TodoStore) -> Result<(), TodoError> {
    let id = list_id(req)?;
    let contents = todo_contents(req)?;
    store.replace(&id, &contents).await
}

async fn delete(req: &Request, store: &TodoStore) -> Result<(), TodoError> {
    store.delete(&list_id(req)?).await
}

fn list_id(req: &Request) -> Result<ListId, TodoError> {
    let raw = req.try_param("id").map_err(|_| TodoError::InvalidIdentifier {
        reason: "Identifier is not valid percent-encoded UTF-8",
    })?;
    ListId::parse(raw.unwrap_or_default())
}

/// `{"<flag>": true}` on success, `{"<flag>": false, "error": …}` otherwise.
fn outcome(flag: &'static str, result: Result<(), TodoError>) -> Response {
    match result {
        Ok(()) => Json(json!({ flag: true })).into_response(),
        Err(e) => failure(Some(flag), &e),
    }
}

fn failure(flag: Option<&'static str>, err: &TodoError) -> Response {
    let status = err.status();
    if status.is_server_error() {
        error!(error = %err, name = err.name(), "todo request failed");
    } else {
        warn!(error = %err, name = err.name(), "todo request rejected");
    }

    let body = match flag {
        Some(flag) => json!({ flag: false, "error": err.payload() }),
        None => json!({ "error": err.payload() }),
    };
    (status, Json(body)).into_response()
}
