//! Middleware layer.
//!
//! Middleware wraps every request the router dispatches, including the 404
//! and 405 fallbacks, and is the place for cross-cutting concerns.
//!
//! Built-in middleware:
//! - [`Trace`]: per-request span with method, path, status, latency
//! - [`Latency`]: artificial response delay for front-end development
//!
//! Layers registered first run outermost:
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use todostore::Router;
//! use todostore::middleware::{Latency, Trace};
//!
//! let app = Router::new()
//!     .layer(Trace)                                  // sees the full latency
//!     .layer(Latency::new(Duration::from_millis(500), Duration::from_secs(1)));
//! ```

mod latency;
mod trace;

use std::sync::Arc;

use crate::handler::BoxFuture;
use crate::request::Request;
use crate::response::Response;

pub use latency::Latency;
pub use trace::Trace;

/// A layer around request dispatch.
///
/// Call [`Next::run`] to continue down the chain, or return a response
/// without calling it to short-circuit.
pub trait Middleware: Send + Sync + 'static {
    fn handle(&self, req: Request, next: Next) -> BoxFuture;
}

/// The innermost step of the chain: the matched handler (or fallback) with its
/// state already bound.
pub(crate) type Endpoint = Box<dyn FnOnce(Request) -> BoxFuture + Send>;

/// The remainder of the middleware chain for one request.
pub struct Next {
    chain: Arc<[Arc<dyn Middleware>]>,
    index: usize,
    endpoint: Endpoint,
}

impl Next {
    pub(crate) fn new(chain: Arc<[Arc<dyn Middleware>]>, endpoint: Endpoint) -> Self {
        Self { chain, index: 0, endpoint }
    }

    /// Runs the next middleware, or the endpoint once the chain is exhausted.
    pub async fn run(mut self, req: Request) -> Response {
        match self.chain.get(self.index).cloned() {
            Some(layer) => {
                self.index += 1;
                layer.handle(req, self).await
            }
            None => (self.endpoint)(req).await,
        }
    }
}
