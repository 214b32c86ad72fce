use std::time::Duration;

use super::{Middleware, Next};
use crate::handler::BoxFuture;
use crate::request::Request;

/// Delays every response by `base` plus a uniformly random share of `spread`.
///
/// Emulates a slow backend so front-end loading states can be exercised
/// locally. Never enable it in production.
#[derive(Clone, Copy, Debug)]
pub struct Latency {
    base: Duration,
    spread: Duration,
}

impl Latency {
    pub fn new(base: Duration, spread: Duration) -> Self {
        Self { base, spread }
    }

    fn sample(&self) -> Duration {
        self.base + self.spread.mul_f64(rand::random::<f64>())
    }
}

impl Middleware for Latency {
    fn handle(&self, req: Request, next: Next) -> BoxFuture {
        let delay = self.sample();
        Box::pin(async move {
            tokio::time::sleep(delay).await;
            next.run(req).await
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_stays_within_bounds() {
        let latency = Latency::new(Duration::from_millis(500), Duration::from_millis(1000));
        for _ in 0..100 {
            let d = latency.sample();
            assert!(d >= Duration::from_millis(500));
            assert!(d <= Duration::from_millis(1500));
        }
    }

    #[test]
    fn zero_spread_is_constant() {
        let latency = Latency::new(Duration::from_millis(20), Duration::ZERO);
        assert_eq!(latency.sample(), Duration::from_millis(20));
    }
}
