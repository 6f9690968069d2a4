pub mod dtos;
pub mod services;
pub mod stores;

pub use services::RateLimitService;
pub use stores::{InMemoryRateLimitStore, RateLimitDecision, RateLimitPolicy, RateLimitStore};
