//! Handler tests for the `/todos` endpoints, driven through the router.

use std::sync::Arc;

use bytes::Bytes;
use http::StatusCode;
use http_body_util::{BodyExt, Full};
use serde_json::{Value, json};
use tempfile::TempDir;

use super::{TodoStore, router};
use crate::Router;

struct TestApp {
    dir: TempDir,
    app: Router<Arc<TodoStore>>,
}

async fn test_app() -> TestApp {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let store = TodoStore::open(dir.path()).await.expect("Failed to open store");
    TestApp { app: router(Arc::new(store)), dir }
}

impl TestApp {
    async fn send(&self, method: &str, uri: &str, body: Option<(&str, String)>) -> (StatusCode, Value) {
        let mut builder = http::Request::builder().method(method).uri(uri);
        let body = match body {
            Some((content_type, body)) => {
                builder = builder.header("content-type", content_type);
                Full::new(Bytes::from(body))
            }
            None => Full::new(Bytes::new()),
        };
        let response = self.app.call(builder.body(body).unwrap()).await;
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send("GET", uri, None).await
    }

    async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.send("DELETE", uri, None).await
    }

    /// Sends `todo` as a form field, the way a browser form would.
    async fn form(&self, method: &str, uri: &str, todo: &str) -> (StatusCode, Value) {
        let body = form_urlencoded::Serializer::new(String::new())
            .append_pair("todo", todo)
            .finish();
        self.send(method, uri, Some(("application/x-www-form-urlencoded", body))).await
    }

    async fn json(&self, method: &str, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(method, uri, Some(("application/json", body.to_string()))).await
    }

    fn file(&self, name: &str) -> std::path::PathBuf {
        self.dir.path().join(name)
    }
}

// =============================================================================
// End-to-end scenario
// =============================================================================

#[tokio::test]
async fn groceries_lifecycle() {
    let t = test_app().await;

    let (status, body) = t.form("POST", "/todos/groceries", r#"{"items":["milk"]}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "created": true }));

    let (status, body) = t.get("/todos/groceries").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "items": ["milk"] }));

    let (_, body) = t.get("/todos").await;
    assert_eq!(body, json!(["groceries"]));

    let (status, body) = t.delete("/todos/groceries").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "deleted": true }));

    let (status, body) = t.get("/todos/groceries").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["name"], "Task list does not exist");
}

// =============================================================================
// GET /todos
// =============================================================================

#[tokio::test]
async fn list_initially_empty() {
    let t = test_app().await;
    let (status, body) = t.get("/todos").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn list_matches_files_on_disk() {
    let t = test_app().await;
    for name in ["a", "b", "c"] {
        t.form("POST", &format!("/todos/{name}"), "[]").await;
    }
    t.delete("/todos/b").await;

    let (_, body) = t.get("/todos").await;
    let mut ids: Vec<String> = serde_json::from_value(body).unwrap();
    ids.sort();
    assert_eq!(ids, ["a", "c"]);
}

#[tokio::test]
async fn list_with_missing_directory_is_500() {
    let t = test_app().await;
    std::fs::remove_dir(t.dir.path()).unwrap();

    let (status, body) = t.get("/todos").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["name"], "IOError");
}

// =============================================================================
// POST /todos/{id}
// =============================================================================

#[tokio::test]
async fn create_accepts_json_body() {
    let t = test_app().await;
    let (status, body) = t.json("POST", "/todos/work", json!({ "todo": "[\"ship it\"]" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "created": true }));
    assert_eq!(t.get("/todos/work").await.1, json!(["ship it"]));
}

#[tokio::test]
async fn create_existing_is_conflict_and_keeps_file() {
    let t = test_app().await;
    t.form("POST", "/todos/a", r#"{"v":1}"#).await;

    let (status, body) = t.form("POST", "/todos/a", r#"{"v":2}"#).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["created"], false);
    assert_eq!(body["error"]["name"], "Task already exists");
    assert_eq!(t.get("/todos/a").await.1, json!({ "v": 1 }));
}

#[tokio::test]
async fn create_rejects_bad_params_without_writing() {
    let t = test_app().await;
    let cases = [
        (json!({}), "Empty param"),
        (json!({ "todo": "" }), "Empty param"),
        (json!({ "todo": 42 }), "Wrong param type"),
        (json!({ "todo": "{oops" }), "SyntaxError"),
    ];
    for (body, name) in cases {
        let (status, res) = t.json("POST", "/todos/bad", body.clone()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
        assert_eq!(res["created"], false, "{body}");
        assert_eq!(res["error"]["name"], name, "{body}");
    }
    assert!(!t.file("bad.json").exists());
}

#[tokio::test]
async fn create_rejects_traversal() {
    let t = test_app().await;
    let (status, body) = t.form("POST", "/todos/..%2Fescape", "[]").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["name"], "Invalid identifier");
    assert!(!t.dir.path().parent().unwrap().join("escape.json").exists());
}

#[tokio::test]
async fn create_rejects_non_utf8_identifiers() {
    let t = test_app().await;
    for uri in ["/todos/%FF", "/todos/%FE", "/todos/a%C3"] {
        let (status, body) = t.form("POST", uri, "[]").await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body["created"], false, "{uri}");
        assert_eq!(body["error"]["name"], "Invalid identifier", "{uri}");
    }
    assert_eq!(t.get("/todos").await.1, json!([]));

    let (status, _) = t.get("/todos/%FF").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn failure_bodies_carry_flag_and_error_only() {
    let t = test_app().await;
    t.form("POST", "/todos/a", "[]").await;

    let (_, body) = t.form("POST", "/todos/a", "[]").await;
    assert_eq!(
        body,
        json!({ "created": false, "error": { "name": "Task already exists", "message": "Task already exists" } })
    );

    let (_, body) = t.get("/todos/ghost").await;
    assert_eq!(
        body,
        json!({ "error": { "name": "Task list does not exist", "message": "Task list does not exist" } })
    );
}

#[tokio::test]
async fn stored_file_is_tab_indented() {
    let t = test_app().await;
    t.form("POST", "/todos/a", r#"{"items":["milk"]}"#).await;
    let text = std::fs::read_to_string(t.file("a.json")).unwrap();
    assert_eq!(text, "{\n\t\"items\": [\n\t\t\"milk\"\n\t]\n}");
}

// =============================================================================
// GET /todos/{id}
// =============================================================================

#[tokio::test]
async fn read_corrupt_file_is_500() {
    let t = test_app().await;
    std::fs::write(t.file("broken.json"), "{").unwrap();

    let (status, body) = t.get("/todos/broken").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["name"], "SyntaxError");
    assert!(body.get("created").is_none());
}

// =============================================================================
// PUT /todos/{id}
// =============================================================================

#[tokio::test]
async fn replace_overwrites_without_merge() {
    let t = test_app().await;
    t.form("POST", "/todos/a", r#"{"x":1,"y":2}"#).await;

    let (status, body) = t.form("PUT", "/todos/a", r#"{"z":3}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "updated": true }));
    assert_eq!(t.get("/todos/a").await.1, json!({ "z": 3 }));
}

#[tokio::test]
async fn replace_missing_is_404_and_creates_nothing() {
    let t = test_app().await;
    let (status, body) = t.form("PUT", "/todos/ghost", "[]").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["updated"], false);
    assert_eq!(body["error"]["message"], "Task list does not exist");
    assert!(!t.file("ghost.json").exists());
}

#[tokio::test]
async fn replace_validates_before_touching_file() {
    let t = test_app().await;
    t.form("POST", "/todos/a", "[1]").await;

    let (status, body) = t.form("PUT", "/todos/a", "not json").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["updated"], false);
    assert_eq!(t.get("/todos/a").await.1, json!([1]));
}

// =============================================================================
// DELETE /todos/{id}
// =============================================================================

#[tokio::test]
async fn delete_missing_is_404() {
    let t = test_app().await;
    let (status, body) = t.delete("/todos/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["deleted"], false);
    assert_eq!(body["error"]["name"], "Task list does not exist");
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn readiness_follows_data_directory() {
    let t = test_app().await;
    let (status, body) = t.get("/readyz").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ready" }));

    std::fs::remove_dir(t.dir.path()).unwrap();
    let (status, _) = t.get("/readyz").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    let (status, body) = t.get("/healthz").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
}
