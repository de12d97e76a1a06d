//! Error taxonomy for the discovery subsystem
//!
//! Every failure a tool call can produce falls into one of these variants.
//! The MCP boundary converts them into an `{"error": ...}` envelope; they
//! never escape as a panic.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// Caller supplied an invalid combination of request fields.
    /// Reported before any external call is made.
    #[error("Invalid request: {0}")]
    Validation(String),

    /// Required settings are absent from the environment.
    #[error("Missing configuration: {}", missing.join(", "))]
    Configuration { missing: Vec<String> },

    /// The similarity input matched no stored record by ID or URL.
    #[error("No community found for '{input}'")]
    NotFound { input: String },

    /// The record resolved but carries no stored embedding. This is an
    /// upstream data-quality gap, not a wrong input.
    #[error("Community '{id}' has no stored embedding")]
    EmbeddingUnavailable { id: String },

    /// The external store or forum call failed. Not retried here.
    #[error("Upstream request failed: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for DiscoveryError {
    fn from(err: reqwest::Error) -> Self {
        let detail = match err.status() {
            Some(status) => format!("{} ({})", err, status),
            None => err.to_string(),
        };
        DiscoveryError::Transport(detail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_lists_all_missing() {
        let err = DiscoveryError::Configuration {
            missing: vec!["FORUM_URL".to_string(), "FORUM_API_KEY".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("FORUM_URL"));
        assert!(msg.contains("FORUM_API_KEY"));
    }

    #[test]
    fn test_not_found_carries_input() {
        let err = DiscoveryError::NotFound {
            input: "https://example.org/weird".to_string(),
        };
        assert!(err.to_string().contains("https://example.org/weird"));
    }
}
