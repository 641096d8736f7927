use async_trait::async_trait;
use std::time::{Duration, Instant};

/// Time source for every wait in the engine, so polling can be driven by a
/// manual clock in tests.
#[async_trait]
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;

    async fn sleep(&self, duration: Duration);
}
