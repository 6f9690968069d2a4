pub mod conversions;
pub mod rate_limits;
