//! # todostore
//!
//! A small HTTP service that stores named todo-lists as JSON files, one file
//! per list, in a single data directory.
//!
//! | Method | Path | Success |
//! |---|---|---|
//! | `GET` | `/todos` | `["groceries", …]` |
//! | `POST` | `/todos/{id}` | `{"created":true}` |
//! | `GET` | `/todos/{id}` | the stored JSON document |
//! | `PUT` | `/todos/{id}` | `{"updated":true}` |
//! | `DELETE` | `/todos/{id}` | `{"deleted":true}` |
//!
//! `POST` and `PUT` take a `todo` parameter holding the list as a JSON-encoded
//! string, sent either as a form field or as a member of a JSON body.
//! Failures answer `{"error":{"name":…,"message":…}}`, alongside
//! `"created":false` etc. where the operation has a flag.
//!
//! What a reverse proxy already owns (TLS, rate limiting, body-size limits,
//! slow clients) is left to the proxy.
//!
//! ## Running
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use todostore::{Server, middleware::Trace, todos::{self, TodoStore}};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), todostore::Error> {
//!     let store = TodoStore::open("data").await?;
//!     let app = todos::router(Arc::new(store)).layer(Trace);
//!     Server::bind(([0, 0, 0, 0], 5000)).serve(app).await
//! }
//! ```

mod error;
mod handler;
mod method;
mod request;
mod response;
mod router;
mod server;
mod status;

pub mod config;
pub mod health;
pub mod middleware;
pub mod todos;

pub use config::Config;
pub use error::Error;
pub use handler::{BoxFuture, Handler};
pub use method::{Method, UnknownMethod};
pub use request::{InvalidParam, Request};
pub use response::{IntoResponse, Json, Response, ResponseBuilder};
pub use router::Router;
pub use server::Server;
pub use status::Status;
