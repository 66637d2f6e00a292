//! Per-client admission control for write-triggering requests.

use crate::models::ClientKey;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// Outcome of an admission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// Request admitted; `remaining` more fit in the current window.
    Allowed { remaining: u32 },
    /// Budget exhausted; the window resets after `retry_after`.
    Limited { retry_after: Duration },
}

impl Admission {
    /// Whether the request may proceed.
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed { .. })
    }
}

#[derive(Debug, Clone, Copy)]
struct Bucket {
    window_start: Instant,
    count: u32,
}

#[derive(Default)]
struct LimiterState {
    buckets: HashMap<ClientKey, Bucket>,
    last_sweep: Option<Instant>,
}

/// Fixed-window request limiter keyed by client.
///
/// Each client gets `max_requests` admissions per `window`, counted from its
/// first admitted request. Counters live only in memory and are dropped once
/// their window has passed.
pub struct AdmissionController {
    max_requests: u32,
    window: Duration,
    inner: Mutex<LimiterState>,
}

impl AdmissionController {
    /// Create a limiter. `max_requests == 0` disables limiting.
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            inner: Mutex::new(LimiterState::default()),
        }
    }

    /// Configured per-window budget.
    pub fn max_requests(&self) -> u32 {
        self.max_requests
    }

    /// Configured window length.
    pub fn window(&self) -> Duration {
        self.window
    }

    fn state(&self) -> MutexGuard<'_, LimiterState> {
        // Counters stay consistent even if a holder panicked mid-update.
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Check and count a request from `client` at the current time.
    pub fn allow(&self, client: &ClientKey) -> Admission {
        self.allow_at(client, Instant::now())
    }

    /// Check and count a request from `client` at `now`.
    ///
    /// Rejected requests do not consume budget.
    pub fn allow_at(&self, client: &ClientKey, now: Instant) -> Admission {
        if self.max_requests == 0 {
            return Admission::Allowed {
                remaining: u32::MAX,
            };
        }

        let mut state = self.state();
        self.sweep_expired(&mut state, now);

        let bucket = state.buckets.entry(client.clone()).or_insert(Bucket {
            window_start: now,
            count: 0,
        });
        if now.saturating_duration_since(bucket.window_start) >= self.window {
            *bucket = Bucket {
                window_start: now,
                count: 0,
            };
        }

        if bucket.count >= self.max_requests {
            let elapsed = now.saturating_duration_since(bucket.window_start);
            let retry_after = self.window.saturating_sub(elapsed);
            tracing::debug!(client = %client, ?retry_after, "admission denied");
            return Admission::Limited { retry_after };
        }

        bucket.count += 1;
        Admission::Allowed {
            remaining: self.max_requests - bucket.count,
        }
    }

    fn sweep_expired(&self, state: &mut LimiterState, now: Instant) {
        let due = state
            .last_sweep
            .map(|last| now.saturating_duration_since(last) >= self.window)
            .unwrap_or(true);
        if !due {
            return;
        }
        let window = self.window;
        state
            .buckets
            .retain(|_, bucket| now.saturating_duration_since(bucket.window_start) < window);
        state.last_sweep = Some(now);
    }

    /// Number of clients with a live counter.
    pub fn tracked_clients(&self) -> usize {
        self.state().buckets.len()
    }
}
