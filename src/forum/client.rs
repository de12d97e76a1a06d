//! Forum REST client
//!
//! Thin wrapper over the forum's HTTP API. Auth headers are injected once
//! at construction; every method is a direct pass-through with no retries —
//! transient failures propagate as Transport errors for the caller to
//! report.

use reqwest::header::{HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use super::types::{
    CategoriesResponse, Category, ChatChannel, ChatChannelsResponse, ChatMessage, Draft,
    DraftsResponse, LatestResponse, Post, SearchResponse, Topic, TopicDetail, User, UserResponse,
};
use crate::config::Config;
use crate::error::DiscoveryError;

pub struct ForumClient {
    http: reqwest::Client,
    base_url: String,
}

impl ForumClient {
    pub fn new(config: &Config) -> Result<Self, DiscoveryError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "Api-Key",
            HeaderValue::from_str(&config.forum_api_key)
                .map_err(|_| DiscoveryError::Validation("invalid API key value".to_string()))?,
        );
        headers.insert(
            "Api-Username",
            HeaderValue::from_str(&config.forum_api_username).map_err(|_| {
                DiscoveryError::Validation("invalid API username value".to_string())
            })?,
        );

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            base_url: config.forum_url.clone(),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, DiscoveryError> {
        let response = self
            .http
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &Value,
    ) -> Result<T, DiscoveryError> {
        let response = self
            .http
            .post(format!("{}{}", self.base_url, path))
            .json(body)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, DiscoveryError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DiscoveryError::Transport(format!(
                "forum returned {}: {}",
                status,
                body.trim()
            )));
        }
        Ok(response.json().await?)
    }

    // ===== Topics =====

    pub async fn latest_topics(&self) -> Result<Vec<Topic>, DiscoveryError> {
        let response: LatestResponse = self.get_json("/latest.json").await?;
        Ok(response.topic_list.topics)
    }

    pub async fn search(&self, query: &str) -> Result<SearchResponse, DiscoveryError> {
        let encoded: String = query
            .bytes()
            .flat_map(|b| match b {
                b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                    vec![b as char]
                }
                b' ' => vec!['+'],
                _ => format!("%{:02X}", b).chars().collect(),
            })
            .collect();
        self.get_json(&format!("/search.json?q={}", encoded)).await
    }

    pub async fn get_topic(&self, id: u64) -> Result<TopicDetail, DiscoveryError> {
        self.get_json(&format!("/t/{}.json", id)).await
    }

    pub async fn create_topic(
        &self,
        title: &str,
        raw: &str,
        category_id: Option<u64>,
    ) -> Result<Post, DiscoveryError> {
        let mut body = json!({ "title": title, "raw": raw });
        if let Some(category) = category_id {
            body["category"] = json!(category);
        }
        self.post_json("/posts.json", &body).await
    }

    // ===== Posts =====

    pub async fn create_post(&self, topic_id: u64, raw: &str) -> Result<Post, DiscoveryError> {
        self.post_json("/posts.json", &json!({ "topic_id": topic_id, "raw": raw }))
            .await
    }

    // ===== Categories =====

    pub async fn list_categories(&self) -> Result<Vec<Category>, DiscoveryError> {
        let response: CategoriesResponse = self.get_json("/categories.json").await?;
        Ok(response.category_list.categories)
    }

    // ===== Users =====

    pub async fn get_user(&self, username: &str) -> Result<User, DiscoveryError> {
        let response: UserResponse = self.get_json(&format!("/u/{}.json", username)).await?;
        Ok(response.user)
    }

    // ===== Chat =====

    pub async fn list_chat_channels(&self) -> Result<Vec<ChatChannel>, DiscoveryError> {
        let response: ChatChannelsResponse = self.get_json("/chat/api/channels.json").await?;
        Ok(response.public_channels)
    }

    pub async fn send_chat_message(
        &self,
        channel_id: u64,
        message: &str,
    ) -> Result<ChatMessage, DiscoveryError> {
        self.post_json(
            &format!("/chat/api/channels/{}/messages.json", channel_id),
            &json!({ "message": message }),
        )
        .await
    }

    // ===== Drafts =====

    pub async fn list_drafts(&self) -> Result<Vec<Draft>, DiscoveryError> {
        let response: DraftsResponse = self.get_json("/drafts.json").await?;
        Ok(response.drafts)
    }
}
