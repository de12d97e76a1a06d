//! Community records
//!
//! `CommunityMeta` is the metadata shape stored alongside each embedding in
//! the vector store; deserialization is tolerant because the directory is
//! populated upstream and fields drift. `Community` is the derived response
//! record: confidence and match tier are computed from distance at transform
//! time, never stored and never trusted from upstream.

use serde::{Deserialize, Serialize, Serializer};

use super::scoring::{round3, MatchTier};

/// Engagement tier stored in community metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngagementTier {
    High,
    Medium,
    Low,
    Unknown,
}

impl EngagementTier {
    /// Sort ordinal: high=3, medium=2, low=1, unknown=0
    pub fn ordinal(&self) -> u8 {
        match self {
            EngagementTier::High => 3,
            EngagementTier::Medium => 2,
            EngagementTier::Low => 1,
            EngagementTier::Unknown => 0,
        }
    }

    /// Lenient parse from stored metadata; anything unrecognized is unknown.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "high" => EngagementTier::High,
            "medium" => EngagementTier::Medium,
            "low" => EngagementTier::Low,
            _ => EngagementTier::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EngagementTier::High => "high",
            EngagementTier::Medium => "medium",
            EngagementTier::Low => "low",
            EngagementTier::Unknown => "unknown",
        }
    }
}

impl Default for EngagementTier {
    fn default() -> Self {
        EngagementTier::Unknown
    }
}

/// Metadata stored with each embedding in the vector store
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommunityMeta {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub total_users: u64,
    #[serde(default)]
    pub active_users_30_days: u64,
    #[serde(default)]
    pub engagement_tier: String,
    #[serde(default)]
    pub categories: String,
    #[serde(default)]
    pub tags: String,
    #[serde(default)]
    pub locale: String,
}

/// A scored, classified community in a discovery response
#[derive(Debug, Clone, Serialize)]
pub struct Community {
    pub id: String,
    pub title: String,
    pub url: String,
    pub description: String,
    pub total_users: u64,
    pub active_users_30_days: u64,
    pub engagement_tier: EngagementTier,
    pub categories: String,
    pub tags: String,
    /// Held unrounded for reranking; rounded to 3 decimals on the wire.
    #[serde(serialize_with = "serialize_round3")]
    pub confidence: f64,
    pub distance: f64,
    pub match_tier: MatchTier,
}

impl Community {
    /// Build a community from a raw hit, deriving confidence and tier.
    pub fn from_hit(id: String, meta: CommunityMeta, distance: f64) -> Self {
        Self {
            id,
            title: meta.title,
            url: meta.url,
            description: meta.description,
            total_users: meta.total_users,
            active_users_30_days: meta.active_users_30_days,
            engagement_tier: EngagementTier::parse(&meta.engagement_tier),
            categories: meta.categories,
            tags: meta.tags,
            confidence: super::scoring::confidence(distance),
            distance,
            match_tier: MatchTier::classify(distance),
        }
    }
}

fn serialize_round3<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(round3(*value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engagement_parse_lenient() {
        assert_eq!(EngagementTier::parse("high"), EngagementTier::High);
        assert_eq!(EngagementTier::parse(" Medium "), EngagementTier::Medium);
        assert_eq!(EngagementTier::parse("LOW"), EngagementTier::Low);
        assert_eq!(EngagementTier::parse(""), EngagementTier::Unknown);
        assert_eq!(EngagementTier::parse("stellar"), EngagementTier::Unknown);
    }

    #[test]
    fn test_engagement_ordinal_order() {
        assert!(EngagementTier::High.ordinal() > EngagementTier::Medium.ordinal());
        assert!(EngagementTier::Medium.ordinal() > EngagementTier::Low.ordinal());
        assert!(EngagementTier::Low.ordinal() > EngagementTier::Unknown.ordinal());
    }

    #[test]
    fn test_meta_tolerates_missing_fields() {
        let meta: CommunityMeta = serde_json::from_str(r#"{"title": "Rust Users"}"#).unwrap();
        assert_eq!(meta.title, "Rust Users");
        assert_eq!(meta.total_users, 0);
        assert_eq!(meta.url, "");
    }

    #[test]
    fn test_from_hit_derives_score_and_tier() {
        let meta = CommunityMeta {
            title: "Rust Users".to_string(),
            url: "https://users.rust-lang.org".to_string(),
            engagement_tier: "high".to_string(),
            ..Default::default()
        };
        let c = Community::from_hit("community_rust".to_string(), meta, 0.1);
        assert_eq!(c.match_tier, MatchTier::Exact);
        assert_eq!(c.engagement_tier, EngagementTier::High);
        assert!((c.confidence - 0.9875).abs() < 1e-9);
    }

    #[test]
    fn test_confidence_rounded_on_wire() {
        let c = Community::from_hit(
            "community_x".to_string(),
            CommunityMeta::default(),
            0.1,
        );
        let json = serde_json::to_value(&c).unwrap();
        assert_eq!(json["confidence"].as_f64().unwrap(), 0.988);
        assert_eq!(json["match_tier"], "exact");
    }
}
