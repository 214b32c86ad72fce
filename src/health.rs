//! Health-check handlers.
//!
//! | Probe | Path | Question |
//! |---|---|---|
//! | **Liveness** | `/healthz` | Is the process alive? Failure → restart. |
//! | **Readiness** | `/readyz` | Is the data directory usable? Failure → pulled from load-balancer. |

use std::sync::Arc;

use serde_json::json;
use tracing::warn;

use crate::todos::TodoStore;
use crate::{IntoResponse, Json, Request, Response, Status};

/// Liveness check. Always `200 {"status":"ok"}`; it has no dependencies.
pub async fn liveness<S>(_req: Request, _state: S) -> Response {
    Json(json!({ "status": "ok" })).into_response()
}

/// Readiness check. `200` while the data directory exists and is a
/// directory, `503` otherwise.
pub async fn readiness(_req: Request, store: Arc<TodoStore>) -> Response {
    match tokio::fs::metadata(store.dir()).await {
        Ok(meta) if meta.is_dir() => Json(json!({ "status": "ready" })).into_response(),
        outcome => {
            let reason = match outcome {
                Ok(_) => "not a directory".to_owned(),
                Err(e) => e.to_string(),
            };
            warn!(dir = %store.dir().display(), %reason, "data directory unavailable");
            (Status::ServiceUnavailable, Json(json!({ "status": "unavailable" }))).into_response()
        }
    }
}
