use crate::clock::{Clock, SystemClock};
use crate::policy::RateLimitPolicy;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use sitelog_core::SitelogResult;
use std::collections::HashMap;
use std::sync::{Arc, LazyLock};
use tracing::{debug, info, warn};

/// Attempt counter for one identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitEntry {
    /// Attempts counted in the current window. Always at least 1.
    pub count: u32,
    /// Time of the most recent counted attempt.
    pub last_attempt: DateTime<Utc>,
}

/// Result of checking an identifier against the limiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateLimitDecision {
    /// Whether this attempt may proceed.
    pub allowed: bool,
    /// Attempts left in the window. Absent when blocked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remaining_attempts: Option<u32>,
}

impl RateLimitDecision {
    fn allowed(remaining: u32) -> Self {
        Self {
            allowed: true,
            remaining_attempts: Some(remaining),
        }
    }

    fn blocked() -> Self {
        Self {
            allowed: false,
            remaining_attempts: None,
        }
    }
}

/// Backing ledger for [`AuthRateLimiter`].
///
/// `update` must run the closure while holding whatever lock protects the
/// entry, so the read-check-increment sequence is atomic per identifier.
pub trait RateLimitStore: Send + Sync {
    /// Read-modify-write the slot for `id`. Leaving `None` in the slot deletes it.
    fn update<R>(&self, id: &str, f: impl FnOnce(&mut Option<RateLimitEntry>) -> R) -> R;

    /// Delete the entry for `id`. Returns whether one existed.
    fn remove(&self, id: &str) -> bool;

    /// Keep only entries for which `keep` returns true. Returns how many were dropped.
    fn retain(&self, keep: &mut dyn FnMut(&str, &RateLimitEntry) -> bool) -> usize;

    /// Number of tracked identifiers.
    fn len(&self) -> usize;

    /// Whether no identifier is tracked.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Process-local store: a hash map behind one mutex.
#[derive(Debug, Default)]
pub struct InMemoryRateLimitStore {
    entries: Mutex<HashMap<String, RateLimitEntry>>,
}

impl InMemoryRateLimitStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the entry for `id`, if any.
    pub fn get(&self, id: &str) -> Option<RateLimitEntry> {
        self.entries.lock().get(id).cloned()
    }
}

impl RateLimitStore for InMemoryRateLimitStore {
    fn update<R>(&self, id: &str, f: impl FnOnce(&mut Option<RateLimitEntry>) -> R) -> R {
        let mut entries = self.entries.lock();
        let mut slot = entries.remove(id);
        let out = f(&mut slot);
        if let Some(entry) = slot {
            entries.insert(id.to_string(), entry);
        }
        out
    }

    fn remove(&self, id: &str) -> bool {
        self.entries.lock().remove(id).is_some()
    }

    fn retain(&self, keep: &mut dyn FnMut(&str, &RateLimitEntry) -> bool) -> usize {
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|id, entry| keep(id, entry));
        before - entries.len()
    }

    fn len(&self) -> usize {
        self.entries.lock().len()
    }
}

/// Authentication attempt limiter.
///
/// Each identifier gets `max_attempts` checks per window. The window is
/// measured from the last counted attempt and restarts in full on the first
/// check after it has elapsed. Blocked checks do not extend the window.
pub struct AuthRateLimiter<S: RateLimitStore = InMemoryRateLimitStore> {
    policy: RateLimitPolicy,
    store: S,
    clock: Arc<dyn Clock>,
}

impl Default for AuthRateLimiter {
    fn default() -> Self {
        Self {
            policy: RateLimitPolicy::default(),
            store: InMemoryRateLimitStore::new(),
            clock: Arc::new(SystemClock),
        }
    }
}

impl AuthRateLimiter {
    /// Create a limiter with an in-memory store and the wall clock.
    pub fn new(policy: RateLimitPolicy) -> SitelogResult<Self> {
        Self::with_parts(policy, InMemoryRateLimitStore::new(), Arc::new(SystemClock))
    }

    /// Create a limiter with an in-memory store and the given clock.
    pub fn with_clock(policy: RateLimitPolicy, clock: Arc<dyn Clock>) -> SitelogResult<Self> {
        Self::with_parts(policy, InMemoryRateLimitStore::new(), clock)
    }
}

impl<S: RateLimitStore> AuthRateLimiter<S> {
    /// Create a limiter over an arbitrary store and clock.
    pub fn with_parts(
        policy: RateLimitPolicy,
        store: S,
        clock: Arc<dyn Clock>,
    ) -> SitelogResult<Self> {
        policy.validate()?;
        Ok(Self {
            policy,
            store,
            clock,
        })
    }

    /// Count one attempt for `id` and decide whether it may proceed.
    pub fn check(&self, id: &str) -> RateLimitDecision {
        let now = self.clock.now();
        let max = self.policy.max_attempts;
        let window = self.policy.window();

        self.store.update(id, |slot| {
            if let Some(entry) = slot
                .as_mut()
                .filter(|entry| now - entry.last_attempt <= window)
            {
                if entry.count >= max {
                    warn!(identifier = %id, attempts = entry.count, "Authentication attempts blocked");
                    return RateLimitDecision::blocked();
                }
                entry.count += 1;
                entry.last_attempt = now;
                return RateLimitDecision::allowed(max.saturating_sub(entry.count));
            }

            debug!(identifier = %id, "Starting new authentication window");
            *slot = Some(RateLimitEntry {
                count: 1,
                last_attempt: now,
            });
            RateLimitDecision::allowed(max.saturating_sub(1))
        })
    }

    /// Forget `id`. Call after a successful authentication.
    pub fn reset(&self, id: &str) {
        if self.store.remove(id) {
            info!(identifier = %id, "Authentication rate limit reset");
        }
    }

    /// Drop entries whose window has elapsed. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let window = self.policy.window();
        let removed = self
            .store
            .retain(&mut |_: &str, entry: &RateLimitEntry| now - entry.last_attempt <= window);
        if removed > 0 {
            debug!(removed, "Purged expired rate limit entries");
        }
        removed
    }

    /// Number of identifiers currently tracked.
    pub fn tracked(&self) -> usize {
        self.store.len()
    }

    /// The policy this limiter enforces.
    pub fn policy(&self) -> &RateLimitPolicy {
        &self.policy
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }
}

static DEFAULT_LIMITER: LazyLock<AuthRateLimiter> = LazyLock::new(AuthRateLimiter::default);

/// Check `id` against the process-wide limiter (5 attempts per 15 minutes).
pub fn check_auth_rate_limit(id: &str) -> RateLimitDecision {
    DEFAULT_LIMITER.check(id)
}

/// Clear `id` from the process-wide limiter.
pub fn reset_auth_rate_limit(id: &str) {
    DEFAULT_LIMITER.reset(id);
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use chrono::Duration;

    fn limiter() -> (AuthRateLimiter, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::default());
        let limiter = AuthRateLimiter::with_clock(RateLimitPolicy::default(), clock.clone()).unwrap();
        (limiter, clock)
    }

    #[test]
    fn test_counts_down_then_blocks() {
        let (limiter, _clock) = limiter();
        for expected in [4, 3, 2, 1, 0] {
            let decision = limiter.check("u1");
            assert!(decision.allowed);
            assert_eq!(decision.remaining_attempts, Some(expected));
        }
        let blocked = limiter.check("u1");
        assert!(!blocked.allowed);
        assert_eq!(blocked.remaining_attempts, None);
    }

    #[test]
    fn test_blocked_check_does_not_mutate() {
        let (limiter, clock) = limiter();
        for _ in 0..5 {
            limiter.check("u1");
        }
        let before = limiter.store().get("u1").unwrap();
        clock.advance(Duration::minutes(10));
        assert!(!limiter.check("u1").allowed);
        assert_eq!(limiter.store().get("u1").unwrap(), before);

        // Window still measured from the fifth attempt, not the blocked one.
        clock.advance(Duration::minutes(5) + Duration::seconds(1));
        assert_eq!(limiter.check("u1").remaining_attempts, Some(4));
    }

    #[test]
    fn test_exactly_window_is_not_expired() {
        let (limiter, clock) = limiter();
        for _ in 0..5 {
            limiter.check("u1");
        }
        clock.advance(Duration::minutes(15));
        assert!(!limiter.check("u1").allowed);
        clock.advance(Duration::milliseconds(1));
        assert!(limiter.check("u1").allowed);
    }

    #[test]
    fn test_reset_starts_fresh() {
        let (limiter, _clock) = limiter();
        for _ in 0..6 {
            limiter.check("u1");
        }
        limiter.reset("u1");
        assert_eq!(limiter.tracked(), 0);
        assert_eq!(limiter.check("u1").remaining_attempts, Some(4));
    }

    #[test]
    fn test_identifiers_are_independent() {
        let (limiter, _clock) = limiter();
        for _ in 0..5 {
            limiter.check("a");
        }
        assert!(!limiter.check("a").allowed);
        assert_eq!(limiter.check("b").remaining_attempts, Some(4));
    }

    #[test]
    fn test_purge_expired() {
        let (limiter, clock) = limiter();
        limiter.check("old");
        clock.advance(Duration::minutes(20));
        limiter.check("new");
        assert_eq!(limiter.purge_expired(), 1);
        assert_eq!(limiter.tracked(), 1);
        assert!(limiter.store().get("new").is_some());
    }

    #[test]
    fn test_decision_serialization() {
        let json = serde_json::to_string(&RateLimitDecision::allowed(3)).unwrap();
        assert_eq!(json, r#"{"allowed":true,"remainingAttempts":3}"#);
        let json = serde_json::to_string(&RateLimitDecision::blocked()).unwrap();
        assert_eq!(json, r#"{"allowed":false}"#);
    }
}
