//! Semantic community discovery
//!
//! Turns nearest-neighbor hits from the community directory into a ranked,
//! confidence-scored, tier-classified result set.

pub mod aggregate;
pub mod community;
pub mod engine;
pub mod resolve;
pub mod scoring;
pub mod store;

pub use community::{Community, EngagementTier};
pub use engine::{DiscoverRequest, DiscoverResponse, DiscoveryEngine, SearchMode};
pub use scoring::{confidence, MatchTier};
pub use store::{ChromaStore, VectorStore};
