//! Discovery orchestrator
//!
//! Entry point for community discovery. Parses the untyped request into a
//! `SearchMode` sum type at the boundary, builds the metadata filter clause,
//! runs the store query (by text, or by a resolved embedding in similarity
//! mode), and assembles the response envelope. All per-request state lives
//! on the stack; nothing is cached between requests.

use serde::Serialize;

use serde_json::{json, Value};

use super::aggregate::{
    confidence_stats, rerank, tier_distribution, transform, ConfidenceStats, TierDistribution,
};
use super::community::{Community, EngagementTier};
use super::resolve::resolve;
use super::store::{QueryResult, VectorStore};
use crate::error::DiscoveryError;

const DEFAULT_LIMIT: usize = 10;
const MAX_LIMIT: usize = 50;

/// Untyped discovery request as received from the tool boundary
#[derive(Debug, Clone, Default)]
pub struct DiscoverRequest {
    pub query: Option<String>,
    pub similar_to: Option<String>,
    pub limit: Option<usize>,
    pub min_users: Option<u64>,
    pub engagement_tier: Option<EngagementTier>,
    pub locale: Option<String>,
}

/// The two query modes, mutually exclusive by construction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchMode {
    Text(String),
    SimilarTo(String),
}

impl SearchMode {
    /// Parse the untyped request, enforcing exactly one of query/similar_to.
    pub fn from_request(request: &DiscoverRequest) -> Result<Self, DiscoveryError> {
        match (&request.query, &request.similar_to) {
            (Some(query), None) => Ok(SearchMode::Text(query.clone())),
            (None, Some(input)) => Ok(SearchMode::SimilarTo(input.clone())),
            _ => Err(DiscoveryError::Validation(
                "exactly one of 'query' or 'similar_to' must be provided".to_string(),
            )),
        }
    }
}

/// The record a similarity search was seeded from
#[derive(Debug, Clone, Serialize)]
pub struct SimilarSource {
    pub id: String,
    pub title: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub total_found: usize,
    pub returned: usize,
    pub has_more: bool,
    pub confidence_stats: ConfidenceStats,
    pub tier_distribution: TierDistribution,
}

/// Response envelope for the discovery tool. Field names are the wire
/// contract and must not change.
#[derive(Debug, Clone, Serialize)]
pub struct DiscoverResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub similar_to: Option<SimilarSource>,
    pub communities: Vec<Community>,
    pub summary: Summary,
    pub next_actions: Vec<String>,
}

/// Discovery engine over an injected vector store
pub struct DiscoveryEngine<S> {
    store: S,
}

impl<S: VectorStore + Send + Sync> DiscoveryEngine<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Run one discovery request end to end.
    pub async fn discover(
        &self,
        request: DiscoverRequest,
    ) -> Result<DiscoverResponse, DiscoveryError> {
        let mode = SearchMode::from_request(&request)?;
        let limit = request.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        let where_clause = build_where(&request);

        match mode {
            SearchMode::Text(query) => {
                let raw = self
                    .store
                    .query_by_text(&query, limit, where_clause)
                    .await?;
                let communities = rerank(first_row(raw));
                let total_found = communities.len();
                Ok(assemble(
                    Some(query),
                    None,
                    communities,
                    total_found,
                    limit,
                ))
            }
            SearchMode::SimilarTo(input) => {
                let resolved = resolve(&self.store, &input).await?;

                // One extra slot: the seed itself is always the nearest hit.
                let raw = self
                    .store
                    .query_by_embedding(&resolved.embedding, limit + 1, where_clause)
                    .await?;

                let mut communities = first_row(raw);
                communities.retain(|c| c.id != resolved.id);
                let total_found = communities.len();

                let mut communities = rerank(communities);
                communities.truncate(limit);

                let source = SimilarSource {
                    id: resolved.id,
                    title: resolved.meta.title,
                    url: resolved.meta.url,
                };
                Ok(assemble(None, Some(source), communities, total_found, limit))
            }
        }
    }
}

/// Build the metadata filter clause: present filters become equality or
/// range clauses, multiple filters are combined under `$and`, zero filters
/// means no clause.
pub fn build_where(request: &DiscoverRequest) -> Option<Value> {
    let mut clauses = Vec::new();

    if let Some(min_users) = request.min_users {
        clauses.push(json!({ "total_users": { "$gte": min_users } }));
    }
    if let Some(tier) = request.engagement_tier {
        clauses.push(json!({ "engagement_tier": tier.as_str() }));
    }
    if let Some(ref locale) = request.locale {
        clauses.push(json!({ "locale": locale }));
    }

    match clauses.len() {
        0 => None,
        1 => clauses.pop(),
        _ => Some(json!({ "$and": clauses })),
    }
}

/// This subsystem always submits a batch of one and reads index 0.
fn first_row(raw: QueryResult) -> Vec<Community> {
    let ids = raw.ids.into_iter().next().unwrap_or_default();
    let metadatas = raw.metadatas.into_iter().next().unwrap_or_default();
    let distances = raw.distances.into_iter().next().unwrap_or_default();
    transform(&ids, &metadatas, &distances)
}

fn assemble(
    query: Option<String>,
    similar_to: Option<SimilarSource>,
    communities: Vec<Community>,
    total_found: usize,
    limit: usize,
) -> DiscoverResponse {
    let returned = communities.len();
    let summary = Summary {
        total_found,
        returned,
        // Heuristic: the store does not report a total count.
        has_more: returned == limit,
        confidence_stats: confidence_stats(&communities),
        tier_distribution: tier_distribution(&communities),
    };

    DiscoverResponse {
        query,
        similar_to,
        next_actions: next_actions(&communities),
        communities,
        summary,
    }
}

fn next_actions(communities: &[Community]) -> Vec<String> {
    if communities.is_empty() {
        return vec![
            "No communities matched. Broaden the query or relax the filters and search again."
                .to_string(),
        ];
    }

    let mut actions = vec![
        "Pick one of the returned community URLs to explore it further.".to_string(),
    ];
    if communities
        .iter()
        .any(|c| c.engagement_tier == EngagementTier::High)
    {
        actions.push(
            "Prefer the high-engagement communities; they are the most active matches."
                .to_string(),
        );
    }
    actions
}
