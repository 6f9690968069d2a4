use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Instant;

use async_trait::async_trait;

use super::{RateLimitDecision, RateLimitPolicy, RateLimitStore, RateLimitStoreError};

#[derive(Debug, Clone, Copy)]
struct WindowCounter {
    count: u32,
    expires_at: Instant,
}

/// Fixed-window counters held in process memory.
///
/// Counters are lost on restart. The read-check-increment sequence runs under
/// a single lock, which makes it atomic for every key.
pub struct InMemoryRateLimitStore {
    policy: RateLimitPolicy,
    counters: Mutex<HashMap<String, WindowCounter>>,
}

impl InMemoryRateLimitStore {
    pub fn new(policy: RateLimitPolicy) -> Self {
        Self {
            policy,
            counters: Mutex::new(HashMap::new()),
        }
    }

    fn counters(&self) -> MutexGuard<'_, HashMap<String, WindowCounter>> {
        // Counter updates never leave the map half-written, so a poisoned lock is still usable
        self.counters.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn check_and_increment_at(&self, key: &str, now: Instant) -> RateLimitDecision {
        let limit = self.policy.max_requests;
        let mut counters = self.counters();

        let counter = counters
            .entry(key.to_string())
            .or_insert_with(|| WindowCounter {
                count: 0,
                expires_at: now + self.policy.window,
            });

        if counter.expires_at <= now {
            *counter = WindowCounter {
                count: 0,
                expires_at: now + self.policy.window,
            };
        }

        let reset_after = counter.expires_at.saturating_duration_since(now);

        if counter.count >= limit {
            return RateLimitDecision {
                allowed: false,
                remaining: 0,
                limit,
                reset_after,
            };
        }

        counter.count += 1;
        RateLimitDecision {
            allowed: true,
            remaining: limit - counter.count,
            limit,
            reset_after,
        }
    }

    fn status_at(&self, key: &str, now: Instant) -> RateLimitDecision {
        let limit = self.policy.max_requests;
        let counters = self.counters();

        match counters.get(key) {
            Some(counter) if counter.expires_at > now => {
                let remaining = limit.saturating_sub(counter.count);
                RateLimitDecision {
                    allowed: remaining > 0,
                    remaining,
                    limit,
                    reset_after: counter.expires_at.saturating_duration_since(now),
                }
            }
            _ => RateLimitDecision {
                allowed: true,
                remaining: limit,
                limit,
                reset_after: self.policy.window,
            },
        }
    }

    fn sweep_expired_at(&self, now: Instant) -> usize {
        let mut counters = self.counters();
        let before = counters.len();
        counters.retain(|_, counter| counter.expires_at > now);
        before - counters.len()
    }

    #[cfg(test)]
    fn tracked_keys(&self) -> usize {
        self.counters().len()
    }
}

#[async_trait]
impl RateLimitStore for InMemoryRateLimitStore {
    async fn check_and_increment(
        &self,
        key: &str,
    ) -> Result<RateLimitDecision, RateLimitStoreError> {
        Ok(self.check_and_increment_at(key, Instant::now()))
    }

    async fn status(&self, key: &str) -> Result<RateLimitDecision, RateLimitStoreError> {
        Ok(self.status_at(key, Instant::now()))
    }

    async fn sweep_expired(&self) -> Result<usize, RateLimitStoreError> {
        Ok(self.sweep_expired_at(Instant::now()))
    }
}
