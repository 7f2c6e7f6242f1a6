//! Exponential backoff for transient transport failures.
//!
//! Delays double from `initial_delay` up to `max_delay`. With jitter enabled
//! each delay gains a random extra of up to half its base value, so
//! concurrent callers that failed together do not retry in lockstep.

use std::collections::hash_map::RandomState;
use std::hash::{BuildHasher, Hasher};
use std::time::Duration;

/// Backoff schedule for transport retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffPolicy {
    initial_delay: Duration,
    max_delay: Duration,
    jitter: bool,
}

impl BackoffPolicy {
    /// 500 ms doubling up to 30 s, with jitter.
    pub const DEFAULT: Self = Self {
        initial_delay: Duration::from_millis(500),
        max_delay: Duration::from_secs(30),
        jitter: true,
    };

    /// Creates a jittered policy.
    #[must_use]
    pub const fn new(initial_delay: Duration, max_delay: Duration) -> Self {
        Self {
            initial_delay,
            max_delay,
            jitter: true,
        }
    }

    /// Disables jitter, making delays deterministic.
    #[must_use]
    pub const fn without_jitter(mut self) -> Self {
        self.jitter = false;
        self
    }

    /// Delay before the first retry.
    #[must_use]
    pub const fn initial_delay(&self) -> Duration {
        self.initial_delay
    }

    /// Upper bound on the base delay.
    #[must_use]
    pub const fn max_delay(&self) -> Duration {
        self.max_delay
    }

    /// Base delay for the zero-based `retry`, before jitter.
    #[must_use]
    pub fn base_delay(&self, retry: u32) -> Duration {
        let factor = 1_u32.checked_shl(retry).unwrap_or(u32::MAX);
        self.initial_delay
            .saturating_mul(factor)
            .min(self.max_delay)
    }

    /// Delay to sleep before the zero-based `retry`.
    #[must_use]
    pub fn delay(&self, retry: u32) -> Duration {
        let base = self.base_delay(retry);
        if !self.jitter {
            return base;
        }
        let spread = base.checked_div(2).unwrap_or_default();
        base.saturating_add(random_up_to(spread))
    }
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self::DEFAULT
    }
}

fn random_up_to(bound: Duration) -> Duration {
    let Ok(bound_millis) = u64::try_from(bound.as_millis()) else {
        return bound;
    };
    if bound_millis == 0 {
        return Duration::ZERO;
    }
    // Each RandomState carries fresh keys, so hashing nothing yields a
    // different value per call.
    let entropy = RandomState::new().build_hasher().finish();
    let offset = entropy
        .checked_rem(bound_millis.saturating_add(1))
        .unwrap_or(0);
    Duration::from_millis(offset)
}
