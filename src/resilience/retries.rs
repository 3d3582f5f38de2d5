//! Retry classification for explorer calls.
//!
//! # Design Decisions
//! - Connection errors and timeouts are always retryable
//! - HTTP 429 and 5xx are retryable; other statuses are not
//! - Explorer payload errors are retried only when they report rate limiting
//! - Decode and configuration errors never are

use crate::blockchain::types::ProviderError;

/// Whether a failed explorer call is worth another attempt.
pub fn is_retryable(error: &ProviderError) -> bool {
    match error {
        ProviderError::Http(_) | ProviderError::Timeout(_) => true,
        ProviderError::Status(code) => *code == 429 || (500..600).contains(code),
        ProviderError::Upstream(message) => is_rate_limit_message(message),
        ProviderError::Decode(_) | ProviderError::Config(_) => false,
    }
}

fn is_rate_limit_message(message: &str) -> bool {
    let lower = message.to_ascii_lowercase();
    lower.contains("rate limit") || lower.contains("too many")
}
