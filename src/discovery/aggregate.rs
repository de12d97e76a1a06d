//! Result aggregation: transform, summary statistics, reranking
//!
//! Raw vector-store hits arrive distance-ascending. Transformation preserves
//! that order and silently drops sparse entries (null metadata or null
//! distance) — those are an expected condition of the upstream store, not a
//! failure, and must never surface as a zero-confidence placeholder.

use serde::Serialize;
use std::cmp::Ordering;

use super::community::{Community, CommunityMeta};
use super::scoring::{round3, MatchTier};

/// Confidence gap below which two candidates are considered tied and the
/// engagement keys decide instead.
const CONFIDENCE_TIE_BAND: f64 = 0.1;

/// Confidence summary over a result set
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConfidenceStats {
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
}

impl ConfidenceStats {
    pub fn zero() -> Self {
        Self {
            mean: 0.0,
            median: 0.0,
            min: 0.0,
            max: 0.0,
        }
    }
}

/// Per-tier result counts; all four tiers are always present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TierDistribution {
    pub exact: usize,
    pub semantic: usize,
    pub adjacent: usize,
    pub peripheral: usize,
}

/// Convert one batch row of raw hits into communities, preserving order.
///
/// Entries whose metadata or distance is missing are skipped.
pub fn transform(
    ids: &[String],
    metadatas: &[Option<CommunityMeta>],
    distances: &[Option<f64>],
) -> Vec<Community> {
    let mut communities = Vec::with_capacity(ids.len());

    for (i, id) in ids.iter().enumerate() {
        let meta = match metadatas.get(i).and_then(|m| m.clone()) {
            Some(m) => m,
            None => continue,
        };
        let distance = match distances.get(i).and_then(|d| *d) {
            Some(d) => d,
            None => continue,
        };
        communities.push(Community::from_hit(id.clone(), meta, distance));
    }

    communities
}

/// Confidence mean/median/min/max, each rounded to 3 decimals.
/// All-zero for an empty input.
pub fn confidence_stats(communities: &[Community]) -> ConfidenceStats {
    if communities.is_empty() {
        return ConfidenceStats::zero();
    }

    let mut values: Vec<f64> = communities.iter().map(|c| c.confidence).collect();
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

    let n = values.len();
    let mean = values.iter().sum::<f64>() / n as f64;
    let median = if n % 2 == 1 {
        values[n / 2]
    } else {
        (values[n / 2 - 1] + values[n / 2]) / 2.0
    };

    ConfidenceStats {
        mean: round3(mean),
        median: round3(median),
        min: round3(values[0]),
        max: round3(values[n - 1]),
    }
}

/// Count results per match tier.
pub fn tier_distribution(communities: &[Community]) -> TierDistribution {
    let mut dist = TierDistribution::default();
    for c in communities {
        match c.match_tier {
            MatchTier::Exact => dist.exact += 1,
            MatchTier::Semantic => dist.semantic += 1,
            MatchTier::Adjacent => dist.adjacent += 1,
            MatchTier::Peripheral => dist.peripheral += 1,
        }
    }
    dist
}

/// Rerank results so near-equal semantic relevance does not mask more
/// active communities.
///
/// Three keys: confidence descending, decisive only when the gap exceeds
/// 0.1; then engagement tier ordinal descending; then 30-day active users
/// descending. Stable: items indistinguishable by all three keys keep their
/// distance-ascending input order. Unrounded confidence is compared.
pub fn rerank(mut communities: Vec<Community>) -> Vec<Community> {
    communities.sort_by(|a, b| {
        if (a.confidence - b.confidence).abs() > CONFIDENCE_TIE_BAND {
            return b
                .confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(Ordering::Equal);
        }
        b.engagement_tier
            .ordinal()
            .cmp(&a.engagement_tier.ordinal())
            .then(b.active_users_30_days.cmp(&a.active_users_30_days))
    });
    communities
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::community::EngagementTier;

    fn meta(title: &str) -> CommunityMeta {
        CommunityMeta {
            title: title.to_string(),
            url: format!("https://{}.example.org", title),
            ..Default::default()
        }
    }

    fn community(id: &str, confidence: f64, tier: EngagementTier, actives: u64) -> Community {
        let mut c = Community::from_hit(id.to_string(), meta(id), 0.5);
        c.confidence = confidence;
        c.engagement_tier = tier;
        c.active_users_30_days = actives;
        c
    }

    #[test]
    fn test_transform_drops_sparse_entries() {
        let ids = vec![
            "community_a".to_string(),
            "community_b".to_string(),
            "community_c".to_string(),
        ];
        let metadatas = vec![Some(meta("a")), None, Some(meta("c"))];
        let distances = vec![Some(0.1), Some(0.2), None];

        let out = transform(&ids, &metadatas, &distances);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, "community_a");
    }

    #[test]
    fn test_transform_preserves_order() {
        let ids = vec!["community_a".to_string(), "community_b".to_string()];
        let metadatas = vec![Some(meta("a")), Some(meta("b"))];
        let distances = vec![Some(0.1), Some(0.3)];

        let out = transform(&ids, &metadatas, &distances);
        assert_eq!(out[0].id, "community_a");
        assert_eq!(out[1].id, "community_b");
        assert_eq!(out[0].match_tier, MatchTier::Exact);
        assert_eq!(out[1].match_tier, MatchTier::Semantic);
    }

    #[test]
    fn test_stats_empty() {
        assert_eq!(confidence_stats(&[]), ConfidenceStats::zero());
    }

    #[test]
    fn test_stats_odd_count() {
        let cs = vec![
            community("a", 0.9, EngagementTier::Unknown, 0),
            community("b", 0.7, EngagementTier::Unknown, 0),
            community("c", 0.5, EngagementTier::Unknown, 0),
        ];
        let stats = confidence_stats(&cs);
        assert_eq!(stats.mean, 0.7);
        assert_eq!(stats.median, 0.7);
        assert_eq!(stats.min, 0.5);
        assert_eq!(stats.max, 0.9);
    }

    #[test]
    fn test_stats_even_count_median() {
        let cs = vec![
            community("a", 0.9, EngagementTier::Unknown, 0),
            community("b", 0.8, EngagementTier::Unknown, 0),
            community("c", 0.6, EngagementTier::Unknown, 0),
            community("d", 0.5, EngagementTier::Unknown, 0),
        ];
        let stats = confidence_stats(&cs);
        assert_eq!(stats.median, 0.7);
        assert_eq!(stats.mean, 0.7);
    }

    #[test]
    fn test_tier_distribution_counts() {
        let distances = [0.1, 0.15, 0.3, 0.5, 0.9, 1.1];
        let cs: Vec<Community> = distances
            .iter()
            .enumerate()
            .map(|(i, d)| Community::from_hit(format!("community_{}", i), meta("x"), *d))
            .collect();

        let dist = tier_distribution(&cs);
        assert_eq!(
            dist,
            TierDistribution {
                exact: 2,
                semantic: 1,
                adjacent: 1,
                peripheral: 2,
            }
        );
    }

    #[test]
    fn test_tier_distribution_empty_all_zero() {
        assert_eq!(tier_distribution(&[]), TierDistribution::default());
    }

    #[test]
    fn test_rerank_engagement_wins_within_tie_band() {
        let cs = vec![
            community("low", 0.95, EngagementTier::Low, 10),
            community("high", 0.89, EngagementTier::High, 10),
        ];
        let out = rerank(cs);
        assert_eq!(out[0].id, "high");
        assert_eq!(out[1].id, "low");
    }

    #[test]
    fn test_rerank_confidence_wins_beyond_tie_band() {
        let cs = vec![
            community("strong", 0.95, EngagementTier::Low, 10),
            community("weak", 0.80, EngagementTier::High, 10_000),
        ];
        let out = rerank(cs);
        assert_eq!(out[0].id, "strong");
    }

    #[test]
    fn test_rerank_actives_break_engagement_tie() {
        let cs = vec![
            community("quiet", 0.9, EngagementTier::High, 50),
            community("busy", 0.88, EngagementTier::High, 5_000),
        ];
        let out = rerank(cs);
        assert_eq!(out[0].id, "busy");
    }

    #[test]
    fn test_rerank_stable_when_indistinguishable() {
        let cs = vec![
            community("first", 0.9, EngagementTier::Medium, 100),
            community("second", 0.9, EngagementTier::Medium, 100),
        ];
        let out = rerank(cs);
        assert_eq!(out[0].id, "first");
        assert_eq!(out[1].id, "second");
    }
}
