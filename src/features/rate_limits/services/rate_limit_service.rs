use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::task::JoinHandle;

use crate::features::rate_limits::dtos::RateLimitStatusDto;
use crate::features::rate_limits::stores::{
    RateLimitDecision, RateLimitStore, RateLimitStoreError,
};

/// Service for checking and enforcing per-client conversion limits
pub struct RateLimitService {
    store: Arc<dyn RateLimitStore>,
}

impl RateLimitService {
    pub fn new(store: Arc<dyn RateLimitStore>) -> Self {
        Self { store }
    }

    /// Admission check: charges one slot for `client_id` when allowed
    pub async fn limit(&self, client_id: &str) -> Result<RateLimitDecision, RateLimitStoreError> {
        self.store.check_and_increment(client_id).await
    }

    /// Get a client's quota without consuming it
    pub async fn get_client_status(
        &self,
        client_id: &str,
    ) -> Result<RateLimitStatusDto, RateLimitStoreError> {
        let decision = self.store.status(client_id).await?;
        let resets_at = Utc::now()
            + chrono::Duration::from_std(decision.reset_after).unwrap_or(chrono::Duration::zero());

        Ok(RateLimitStatusDto {
            limit: decision.limit,
            used: decision.limit.saturating_sub(decision.remaining),
            remaining: decision.remaining,
            resets_at,
        })
    }

    /// Periodically evict counters whose window has ended
    pub fn spawn_sweeper(self: &Arc<Self>, interval: Duration) -> JoinHandle<()> {
        let service = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // First tick completes immediately
            ticker.tick().await;
            loop {
                ticker.tick().await;
                match service.store.sweep_expired().await {
                    Ok(0) => {}
                    Ok(removed) => {
                        tracing::debug!("Evicted {} expired rate limit counters", removed)
                    }
                    Err(e) => tracing::warn!("Rate limit sweep failed: {}", e),
                }
            }
        })
    }
}
