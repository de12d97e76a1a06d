//! Wire types for the forum REST API
//!
//! Pass-through serde models for a Discourse-style API. Deserialization is
//! deliberately loose: the forum adds fields between releases, so everything
//! optional is defaulted and unknown fields are ignored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Topic {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub posts_count: u64,
    #[serde(default)]
    pub reply_count: u64,
    #[serde(default)]
    pub views: u64,
    #[serde(default)]
    pub like_count: u64,
    #[serde(default)]
    pub category_id: Option<u64>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_posted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub closed: bool,
    #[serde(default)]
    pub archived: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: u64,
    #[serde(default)]
    pub topic_id: u64,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub cooked: String,
    #[serde(default)]
    pub raw: Option<String>,
    #[serde(default)]
    pub post_number: u64,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Topic detail with its post stream
#[derive(Debug, Clone, Deserialize)]
pub struct TopicDetail {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub posts_count: u64,
    #[serde(default)]
    pub post_stream: PostStream,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostStream {
    #[serde(default)]
    pub posts: Vec<Post>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub description_text: Option<String>,
    #[serde(default)]
    pub topic_count: u64,
    #[serde(default)]
    pub read_restricted: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryList {
    #[serde(default)]
    pub categories: Vec<Category>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoriesResponse {
    #[serde(default)]
    pub category_list: CategoryList,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub trust_level: u8,
    #[serde(default)]
    pub post_count: u64,
    #[serde(default)]
    pub last_seen_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserResponse {
    pub user: User,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TopicList {
    #[serde(default)]
    pub topics: Vec<Topic>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LatestResponse {
    #[serde(default)]
    pub topic_list: TopicList,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub topics: Vec<Topic>,
    #[serde(default)]
    pub posts: Vec<Post>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatChannel {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub chatable_type: String,
    #[serde(default)]
    pub memberships_count: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatChannelsResponse {
    #[serde(default)]
    pub public_channels: Vec<ChatChannel>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    // the send endpoint reports "message_id", reads report "id"
    #[serde(default, alias = "message_id")]
    pub id: u64,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Draft {
    #[serde(default)]
    pub draft_key: String,
    #[serde(default)]
    pub sequence: u64,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DraftsResponse {
    #[serde(default)]
    pub drafts: Vec<Draft>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topic_tolerates_sparse_payload() {
        let topic: Topic = serde_json::from_str(r#"{"id": 42, "title": "Hello"}"#).unwrap();
        assert_eq!(topic.id, 42);
        assert_eq!(topic.posts_count, 0);
        assert!(topic.created_at.is_none());
        assert!(!topic.closed);
    }

    #[test]
    fn test_categories_nested_shape() {
        let raw = r#"{"category_list": {"categories": [{"id": 1, "name": "General"}]}}"#;
        let response: CategoriesResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(response.category_list.categories.len(), 1);
        assert_eq!(response.category_list.categories[0].name, "General");
    }

    #[test]
    fn test_search_response_defaults() {
        let response: SearchResponse = serde_json::from_str("{}").unwrap();
        assert!(response.topics.is_empty());
        assert!(response.posts.is_empty());
    }
}
