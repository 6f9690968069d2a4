// =============================================================================
// CLIENT IDENTITY
// =============================================================================

/// Proxy header carrying the originating client address (first hop wins)
pub const HEADER_FORWARDED_FOR: &str = "x-forwarded-for";

/// Proxy header carrying the client address as seen by the edge proxy
pub const HEADER_REAL_IP: &str = "x-real-ip";

/// Bucket shared by every client that carries no identifying header
pub const UNKNOWN_CLIENT_ID: &str = "unknown";

// =============================================================================
// RATE LIMIT HEADERS
// =============================================================================

pub const HEADER_RATE_LIMIT_LIMIT: &str = "x-ratelimit-limit";
pub const HEADER_RATE_LIMIT_REMAINING: &str = "x-ratelimit-remaining";
