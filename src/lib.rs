//! agora-mcp library
//!
//! MCP server for Discourse-style forums with semantic community discovery.
//!
//! # Modules
//!
//! - `config`: environment-based configuration
//! - `error`: error taxonomy shared across the crate
//! - `forum`: typed REST pass-throughs to the forum API
//! - `discovery`: semantic discovery core (scoring, ranking, resolution)
//! - `mcp`: MCP server exposing the tool surface

pub mod config;
pub mod discovery;
pub mod error;
pub mod forum;
#[cfg(feature = "mcp")]
pub mod mcp;

// Re-exports for convenience
pub use config::Config;
pub use discovery::{
    Community, DiscoverRequest, DiscoverResponse, DiscoveryEngine, EngagementTier, MatchTier,
};
pub use error::DiscoveryError;
pub use forum::ForumClient;
