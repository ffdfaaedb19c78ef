//! Per-caller admission gate.
//!
//! A fixed window counter keyed by caller id. Each caller's entry is updated
//! under the map shard's exclusive lock for the duration of one
//! check-and-increment and is never held across I/O. Windows that have
//! expired are swept every few hundred checks so idle callers do not pile up.

use dashmap::DashMap;
use log::debug;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::time::Instant;

use crate::constants;

/// Admission decision for one call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Allowed,
    Denied,
}

impl Admission {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Admission::Allowed)
    }
}

/// Window bookkeeping for one caller.
#[derive(Debug, Clone, Copy)]
struct WindowState {
    window_start: Instant,
    count: u32,
}

/// Snapshot of a caller's budget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitUsage {
    pub used: u32,
    pub remaining: u32,
    pub reset_in: Duration,
}

/// Rate limiter owning the per-caller window state.
#[derive(Debug)]
pub struct RateLimiter {
    windows: DashMap<String, WindowState>,
    limit: u32,
    window: Duration,
    checks: AtomicU64,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(
            constants::DEFAULT_RATE_LIMIT_COUNT,
            Duration::from_secs(constants::DEFAULT_RATE_LIMIT_WINDOW_SECS),
        )
    }
}

impl RateLimiter {
    /// Creates a limiter allowing `limit` calls per `window` for each caller.
    pub fn new(limit: u32, window: Duration) -> Self {
        Self {
            windows: DashMap::new(),
            limit,
            window,
            checks: AtomicU64::new(0),
        }
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Admits or denies a call made by `caller_id` at `now`.
    ///
    /// When `now` lies outside the caller's current window the window restarts
    /// at `now` with a zero count. The count is then incremented, and the call
    /// is denied once it exceeds `limit`. Denied calls still count, so retrying
    /// inside a window never frees budget.
    ///
    /// # Parameters
    /// * `caller_id` - Opaque caller identifier
    /// * `now` - Time of the call
    /// * `limit` - Calls allowed per window
    /// * `window` - Window length
    pub fn admit(&self, caller_id: &str, now: Instant, limit: u32, window: Duration) -> Admission {
        let mut entry = self
            .windows
            .entry(caller_id.to_string())
            .or_insert(WindowState { window_start: now, count: 0 });

        let state = entry.value_mut();
        if now.saturating_duration_since(state.window_start) >= window {
            state.window_start = now;
            state.count = 0;
        }
        state.count = state.count.saturating_add(1);

        let admission = if state.count > limit {
            Admission::Denied
        } else {
            Admission::Allowed
        };

        debug!(
            "Rate limiter: caller '{}' at {}/{} in current window -> {:?}",
            caller_id, state.count, limit, admission
        );

        admission
    }

    /// Admits a call made now using the configured limit and window.
    pub fn check(&self, caller_id: &str) -> Admission {
        let now = Instant::now();
        let admission = self.admit(caller_id, now, self.limit, self.window);

        // Swept after admit so no shard lock is held here
        let checks = self.checks.fetch_add(1, Ordering::Relaxed) + 1;
        if checks % constants::RATE_LIMIT_PURGE_INTERVAL == 0 {
            self.purge_expired(now);
        }

        admission
    }

    /// Drops every caller whose window has expired at `now`.
    ///
    /// An expired caller behaves exactly like an unseen one on its next call,
    /// so removing it never changes an admission decision. Returns the number
    /// of callers removed.
    pub fn purge_expired(&self, now: Instant) -> usize {
        let before = self.windows.len();
        self.windows
            .retain(|_, state| now.saturating_duration_since(state.window_start) < self.window);
        let removed = before.saturating_sub(self.windows.len());

        if removed > 0 {
            debug!("Rate limiter: purged {} expired caller windows", removed);
        }
        removed
    }

    /// Current usage for a caller, if it has made any call.
    pub fn usage(&self, caller_id: &str) -> Option<RateLimitUsage> {
        let now = Instant::now();
        self.windows.get(caller_id).map(|state| {
            let elapsed = now.saturating_duration_since(state.window_start);
            if elapsed >= self.window {
                return RateLimitUsage {
                    used: 0,
                    remaining: self.limit,
                    reset_in: Duration::ZERO,
                };
            }
            RateLimitUsage {
                used: state.count,
                remaining: self.limit.saturating_sub(state.count),
                reset_in: self.window - elapsed,
            }
        })
    }

    /// Forgets a caller's window.
    pub fn reset(&self, caller_id: &str) {
        self.windows.remove(caller_id);
        debug!("Rate limiter: reset caller '{}'", caller_id);
    }

    /// Number of callers currently tracked.
    pub fn tracked_callers(&self) -> usize {
        self.windows.len()
    }
}
