//! Rate limit counter storage
//!
//! The conversion path only ever talks to [`RateLimitStore`], so the
//! in-process map can be replaced by a shared counter service without touching
//! the callers.

mod in_memory_store;

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

pub use in_memory_store::InMemoryRateLimitStore;

/// Capacity and window of a fixed-window limiter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    pub max_requests: u32,
    pub window: Duration,
}

/// Outcome of an admission check (or a read-only peek)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitDecision {
    pub allowed: bool,
    pub remaining: u32,
    pub limit: u32,
    /// Time until the current window ends
    pub reset_after: Duration,
}

#[derive(Debug, Error)]
pub enum RateLimitStoreError {
    #[error("Rate limit backend error: {0}")]
    Backend(String),
}

#[async_trait]
pub trait RateLimitStore: Send + Sync {
    /// Admit `key` if it is under capacity, charging one slot.
    ///
    /// Must be atomic per key: concurrent callers can never be admitted past
    /// capacity. A denied request is not charged.
    async fn check_and_increment(&self, key: &str)
        -> Result<RateLimitDecision, RateLimitStoreError>;

    /// Report the quota of `key` without charging it.
    async fn status(&self, key: &str) -> Result<RateLimitDecision, RateLimitStoreError>;

    /// Drop counters whose window has ended; returns how many were removed.
    async fn sweep_expired(&self) -> Result<usize, RateLimitStoreError>;
}
