use std::time::Instant;

use tracing::{Instrument, info, info_span, warn};

use super::{Middleware, Next};
use crate::handler::BoxFuture;
use crate::request::Request;

/// Opens one `request` span per request and logs its outcome.
pub struct Trace;

impl Middleware for Trace {
    fn handle(&self, req: Request, next: Next) -> BoxFuture {
        let span = info_span!("request", method = %req.method(), path = %req.path());
        Box::pin(
            async move {
                let started = Instant::now();
                let res = next.run(req).await;
                let status = u16::from(res.status_code());
                let elapsed_ms = started.elapsed().as_millis() as u64;
                if res.status_code().is_server_error() {
                    warn!(status, elapsed_ms, "request failed");
                } else {
                    info!(status, elapsed_ms, "request handled");
                }
                res
            }
            .instrument(span),
        )
    }
}
