//! Environment-based configuration
//!
//! All settings come from environment variables. Missing variables are
//! collected and reported together so a misconfigured deployment fails
//! once with the full list instead of one variable at a time.

use crate::error::DiscoveryError;

/// Environment variables read at startup
pub const ENV_FORUM_URL: &str = "FORUM_URL";
pub const ENV_FORUM_API_KEY: &str = "FORUM_API_KEY";
pub const ENV_FORUM_API_USERNAME: &str = "FORUM_API_USERNAME";
pub const ENV_VECTOR_STORE_URL: &str = "VECTOR_STORE_URL";
pub const ENV_VECTOR_COLLECTION: &str = "VECTOR_COLLECTION";

const DEFAULT_COLLECTION: &str = "communities";

/// Runtime configuration for forum and vector-store access
#[derive(Debug, Clone)]
pub struct Config {
    pub forum_url: String,
    pub forum_api_key: String,
    pub forum_api_username: String,
    pub vector_store_url: String,
    pub vector_collection: String,
}

impl Config {
    /// Load configuration from the environment, failing fast with every
    /// missing variable named.
    pub fn from_env() -> Result<Self, DiscoveryError> {
        let mut missing = Vec::new();

        let forum_url = require(ENV_FORUM_URL, &mut missing);
        let forum_api_key = require(ENV_FORUM_API_KEY, &mut missing);
        let forum_api_username = require(ENV_FORUM_API_USERNAME, &mut missing);
        let vector_store_url = require(ENV_VECTOR_STORE_URL, &mut missing);

        if !missing.is_empty() {
            return Err(DiscoveryError::Configuration { missing });
        }

        let vector_collection = std::env::var(ENV_VECTOR_COLLECTION)
            .ok()
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_COLLECTION.to_string());

        Ok(Self {
            forum_url: trim_trailing_slash(forum_url),
            forum_api_key,
            forum_api_username,
            vector_store_url: trim_trailing_slash(vector_store_url),
            vector_collection,
        })
    }
}

fn require(name: &'static str, missing: &mut Vec<String>) -> String {
    match std::env::var(name) {
        Ok(v) if !v.is_empty() => v,
        _ => {
            missing.push(name.to_string());
            String::new()
        }
    }
}

fn trim_trailing_slash(url: String) -> String {
    url.strip_suffix('/').map(str::to_string).unwrap_or(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trim_trailing_slash() {
        assert_eq!(
            trim_trailing_slash("https://forum.example.org/".to_string()),
            "https://forum.example.org"
        );
        assert_eq!(
            trim_trailing_slash("https://forum.example.org".to_string()),
            "https://forum.example.org"
        );
    }
}
