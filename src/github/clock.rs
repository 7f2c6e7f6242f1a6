//! Time source used by the transport for backoff sleeps and reset maths.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

/// Suspension and wall-clock access.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Clock: Send + Sync {
    /// Suspends the current task for `duration`.
    async fn sleep(&self, duration: Duration);

    /// Current Unix time in whole seconds.
    fn now_unix_seconds(&self) -> u64;
}

/// Clock backed by the Tokio timer and the system wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioClock;

#[async_trait]
impl Clock for TokioClock {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }

    fn now_unix_seconds(&self) -> u64 {
        u64::try_from(chrono::Utc::now().timestamp()).unwrap_or(0)
    }
}

#[async_trait]
impl<C: Clock + ?Sized> Clock for Arc<C> {
    async fn sleep(&self, duration: Duration) {
        (**self).sleep(duration).await;
    }

    fn now_unix_seconds(&self) -> u64 {
        (**self).now_unix_seconds()
    }
}
