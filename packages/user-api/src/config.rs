//! API configuration.

/// Request handling configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Maximum time to receive a request body, in milliseconds
    pub request_timeout_ms: u64,
    /// Maximum time for a storage operation, in milliseconds
    pub response_timeout_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            request_timeout_ms: 5000,   // 5 seconds default
            response_timeout_ms: 10000, // 10 seconds default
        }
    }
}
