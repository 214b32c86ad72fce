//! Todo-lists persisted as JSON files, and the HTTP surface over them.

mod api;
mod error;
mod id;
mod param;
mod store;

#[cfg(test)]
mod api_test;

pub use api::router;
pub use error::{ErrorPayload, TodoError};
pub use id::ListId;
pub use param::todo_contents;
pub use store::TodoStore;
