//! Similarity input resolution
//!
//! "Find communities similar to X" accepts either an internal community id
//! or a URL. Ids are recognized by shape before any network call; anything
//! else is treated as a URL and looked up by exact metadata equality, with
//! one retry on the alternate trailing-slash form because stored URLs are
//! not normalized consistently upstream.

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::json;

use super::community::CommunityMeta;
use super::store::{GetResult, VectorStore};
use crate::error::DiscoveryError;

lazy_static! {
    /// Internal id shape: fixed prefix followed by an identifier.
    static ref COMMUNITY_ID: Regex = Regex::new(r"^community_[A-Za-z0-9_-]+$").unwrap();
}

/// A resolved similarity seed
#[derive(Debug, Clone)]
pub struct Resolved {
    pub id: String,
    pub meta: CommunityMeta,
    pub embedding: Vec<f32>,
}

/// Resolve a user-supplied id or URL to a stored record and its embedding.
///
/// Fails with NotFound when neither path matches, and with
/// EmbeddingUnavailable when the record exists but has no stored vector —
/// the caller's remediation differs, so the two are never folded together.
pub async fn resolve<S: VectorStore + Sync>(
    store: &S,
    input: &str,
) -> Result<Resolved, DiscoveryError> {
    let input = input.trim();

    let result = if COMMUNITY_ID.is_match(input) {
        store.get_by_id(input).await?
    } else {
        lookup_by_url(store, input).await?
    };

    first_record(result).unwrap_or_else(|| {
        Err(DiscoveryError::NotFound {
            input: input.to_string(),
        })
    })
}

/// Look up by normalized URL, retrying once with a trailing slash.
async fn lookup_by_url<S: VectorStore + Sync>(
    store: &S,
    input: &str,
) -> Result<GetResult, DiscoveryError> {
    let normalized = input.strip_suffix('/').unwrap_or(input);

    let result = store.get_by_metadata(json!({ "url": normalized })).await?;
    if !result.ids.is_empty() {
        return Ok(result);
    }

    store
        .get_by_metadata(json!({ "url": format!("{}/", normalized) }))
        .await
}

/// Pull the first record out of a lookup, requiring its embedding.
fn first_record(result: GetResult) -> Option<Result<Resolved, DiscoveryError>> {
    let id = result.ids.first()?.clone();
    let meta = result
        .metadatas
        .first()
        .and_then(|m| m.clone())
        .unwrap_or_default();
    let embedding = result.embeddings.first().and_then(|e| e.clone());

    Some(match embedding {
        Some(embedding) if !embedding.is_empty() => Ok(Resolved {
            id,
            meta,
            embedding,
        }),
        _ => Err(DiscoveryError::EmbeddingUnavailable { id }),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::store::QueryResult;
    use serde_json::Value;
    use std::sync::Mutex;

    /// Records lookups and serves canned responses keyed by url/id.
    struct FakeStore {
        records: Vec<(String, String, Option<Vec<f32>>)>, // (id, url, embedding)
        lookups: Mutex<Vec<String>>,
    }

    impl FakeStore {
        fn new(records: Vec<(&str, &str, Option<Vec<f32>>)>) -> Self {
            Self {
                records: records
                    .into_iter()
                    .map(|(id, url, e)| (id.to_string(), url.to_string(), e))
                    .collect(),
                lookups: Mutex::new(Vec::new()),
            }
        }

        fn hit(&self, id: &str, emb: &Option<Vec<f32>>) -> GetResult {
            GetResult {
                ids: vec![id.to_string()],
                metadatas: vec![Some(CommunityMeta {
                    title: id.to_string(),
                    ..Default::default()
                })],
                embeddings: vec![emb.clone()],
            }
        }
    }

    impl VectorStore for FakeStore {
        async fn query_by_text(
            &self,
            _text: &str,
            _limit: usize,
            _where_clause: Option<Value>,
        ) -> Result<QueryResult, DiscoveryError> {
            unreachable!("resolver never queries by text")
        }

        async fn query_by_embedding(
            &self,
            _embedding: &[f32],
            _limit: usize,
            _where_clause: Option<Value>,
        ) -> Result<QueryResult, DiscoveryError> {
            unreachable!("resolver never queries by embedding")
        }

        async fn get_by_id(&self, id: &str) -> Result<GetResult, DiscoveryError> {
            self.lookups.lock().unwrap().push(format!("id:{}", id));
            Ok(self
                .records
                .iter()
                .find(|(rid, _, _)| rid == id)
                .map(|(rid, _, e)| self.hit(rid, e))
                .unwrap_or_default())
        }

        async fn get_by_metadata(&self, clause: Value) -> Result<GetResult, DiscoveryError> {
            let url = clause["url"].as_str().unwrap_or_default().to_string();
            self.lookups.lock().unwrap().push(format!("url:{}", url));
            Ok(self
                .records
                .iter()
                .find(|(_, rurl, _)| *rurl == url)
                .map(|(rid, _, e)| self.hit(rid, e))
                .unwrap_or_default())
        }
    }

    #[tokio::test]
    async fn test_id_shaped_input_queries_by_id_only() {
        let store = FakeStore::new(vec![(
            "community_rust",
            "https://example.org/rust",
            Some(vec![0.1, 0.2]),
        )]);

        let resolved = resolve(&store, "community_rust").await.unwrap();
        assert_eq!(resolved.id, "community_rust");
        assert_eq!(
            *store.lookups.lock().unwrap(),
            vec!["id:community_rust".to_string()]
        );
    }

    #[tokio::test]
    async fn test_url_input_strips_trailing_slash() {
        let store = FakeStore::new(vec![(
            "community_rust",
            "https://example.org/rust",
            Some(vec![0.1]),
        )]);

        let resolved = resolve(&store, "https://example.org/rust/").await.unwrap();
        assert_eq!(resolved.id, "community_rust");
        assert_eq!(
            *store.lookups.lock().unwrap(),
            vec!["url:https://example.org/rust".to_string()]
        );
    }

    #[tokio::test]
    async fn test_url_retries_once_with_trailing_slash() {
        let store = FakeStore::new(vec![(
            "community_rust",
            "https://example.org/rust/",
            Some(vec![0.1]),
        )]);

        let resolved = resolve(&store, "https://example.org/rust").await.unwrap();
        assert_eq!(resolved.id, "community_rust");
        assert_eq!(
            *store.lookups.lock().unwrap(),
            vec![
                "url:https://example.org/rust".to_string(),
                "url:https://example.org/rust/".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_not_found_carries_original_input() {
        let store = FakeStore::new(vec![]);
        let err = resolve(&store, "https://example.org/nowhere")
            .await
            .unwrap_err();
        match err {
            DiscoveryError::NotFound { input } => {
                assert_eq!(input, "https://example.org/nowhere");
            }
            other => panic!("expected NotFound, got {:?}", other),
        }
        // exactly two URL attempts, no more
        assert_eq!(store.lookups.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_missing_embedding_is_distinct_failure() {
        let store = FakeStore::new(vec![("community_bare", "https://example.org/bare", None)]);
        let err = resolve(&store, "community_bare").await.unwrap_err();
        match err {
            DiscoveryError::EmbeddingUnavailable { id } => assert_eq!(id, "community_bare"),
            other => panic!("expected EmbeddingUnavailable, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_empty_embedding_is_unavailable() {
        let store = FakeStore::new(vec![(
            "community_empty",
            "https://example.org/empty",
            Some(vec![]),
        )]);
        let err = resolve(&store, "community_empty").await.unwrap_err();
        assert!(matches!(err, DiscoveryError::EmbeddingUnavailable { .. }));
    }
}
