//! Single-worker task queue with a fixed delay between tasks.
//!
//! The destination store rate-limits writes, so committee writes go through
//! a [`PacedQueue`]: one task in flight, in submission order, with `delay`
//! between the end of one task and the start of the next.

use std::future::Future;
use std::time::Duration;

use tracing::debug;

#[derive(Debug, Clone, Copy)]
pub struct PacedQueue {
    delay: Duration,
}

impl PacedQueue {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Run `task` over `items` sequentially and collect the outputs in order.
    ///
    /// There is no delay before the first task or after the last.
    pub async fn run<T, R, F, Fut>(
        &self,
        items: impl IntoIterator<Item = T>,
        mut task: F,
    ) -> Vec<R>
    where
        F: FnMut(T) -> Fut,
        Fut: Future<Output = R>,
    {
        let mut outputs = Vec::new();
        for (i, item) in items.into_iter().enumerate() {
            if i > 0 && !self.delay.is_zero() {
                debug!(delay_ms = self.delay.as_millis() as u64, "pacing before next task");
                tokio::time::sleep(self.delay).await;
            }
            outputs.push(task(item).await);
        }
        outputs
    }
}
