use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Response DTO for a client's conversion quota
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RateLimitStatusDto {
    /// Maximum conversions allowed per window
    pub limit: u32,
    /// Conversions already admitted in the current window
    pub used: u32,
    /// Conversions left before requests are rejected
    pub remaining: u32,
    /// When the current window ends
    pub resets_at: DateTime<Utc>,
}
