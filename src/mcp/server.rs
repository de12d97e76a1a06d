//! Forum MCP Server implementation

use anyhow::Result;
use rmcp::{
    handler::server::{tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, Content, ServerInfo},
    tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler, ServiceExt,
};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::json;

use crate::config::Config;
use crate::discovery::engine::DiscoverRequest;
use crate::discovery::{ChromaStore, DiscoveryEngine, EngagementTier};
use crate::error::DiscoveryError;
use crate::forum::ForumClient;

/// Parameters for discover_communities tool
#[derive(Debug, Deserialize, JsonSchema)]
pub struct DiscoverParams {
    /// Free-text description of the community you are looking for
    #[schemars(description = "Free-text search query (mutually exclusive with similar_to)")]
    #[serde(default)]
    pub query: Option<String>,
    /// Community id or URL to find similar communities for
    #[schemars(description = "Community id or URL to find similar communities for (mutually exclusive with query)")]
    #[serde(default)]
    pub similar_to: Option<String>,
    /// Maximum number of results (1-50, default: 10)
    #[schemars(description = "Maximum number of results (1-50, default: 10)")]
    #[serde(default)]
    pub limit: Option<usize>,
    /// Only return communities with at least this many users
    #[schemars(description = "Minimum total user count filter")]
    #[serde(default)]
    pub min_users: Option<u64>,
    /// Filter by engagement tier: high, medium, low
    #[schemars(description = "Engagement tier filter: high, medium, low")]
    #[serde(default)]
    pub engagement_tier: Option<String>,
    /// Filter by locale (e.g. "en")
    #[schemars(description = "Locale filter, e.g. 'en'")]
    #[serde(default)]
    pub locale: Option<String>,
}

/// Parameters for forum_search tool
#[derive(Debug, Deserialize, JsonSchema)]
pub struct ForumSearchParams {
    /// Search query for forum topics and posts
    #[schemars(description = "Search query for forum topics and posts")]
    pub query: String,
}

/// Parameters for get_topic tool
#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetTopicParams {
    /// Topic id
    #[schemars(description = "Topic id to retrieve")]
    pub topic_id: u64,
}

/// Parameters for create_topic tool
#[derive(Debug, Deserialize, JsonSchema)]
pub struct CreateTopicParams {
    /// Topic title
    #[schemars(description = "Title of the new topic")]
    pub title: String,
    /// Topic body in Markdown
    #[schemars(description = "Body of the first post, Markdown")]
    pub raw: String,
    /// Category to post into
    #[schemars(description = "Optional category id")]
    #[serde(default)]
    pub category_id: Option<u64>,
}

/// Parameters for create_post tool
#[derive(Debug, Deserialize, JsonSchema)]
pub struct CreatePostParams {
    /// Topic to reply to
    #[schemars(description = "Topic id to reply to")]
    pub topic_id: u64,
    /// Reply body in Markdown
    #[schemars(description = "Reply body, Markdown")]
    pub raw: String,
}

/// Parameters for get_user tool
#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetUserParams {
    /// Forum username
    #[schemars(description = "Username to look up")]
    pub username: String,
}

/// Parameters for send_chat_message tool
#[derive(Debug, Deserialize, JsonSchema)]
pub struct SendChatParams {
    /// Chat channel id
    #[schemars(description = "Chat channel id")]
    pub channel_id: u64,
    /// Message text
    #[schemars(description = "Message text to send")]
    pub message: String,
}

/// Forum MCP Service
#[derive(Clone)]
pub struct AgoraService {
    config: Config,
    tool_router: ToolRouter<Self>,
}

impl AgoraService {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            tool_router: Self::tool_router(),
        }
    }

    fn forum(&self) -> Result<ForumClient, McpError> {
        ForumClient::new(&self.config).map_err(|e| {
            McpError::internal_error(format!("Failed to create forum client: {}", e), None)
        })
    }

    async fn discovery(&self) -> Result<DiscoveryEngine<ChromaStore>, DiscoveryError> {
        let store = ChromaStore::connect(&self.config).await?;
        Ok(DiscoveryEngine::new(store))
    }

    fn json_result<T: serde::Serialize>(value: &T) -> Result<CallToolResult, McpError> {
        let output = serde_json::to_string_pretty(value).map_err(|e| {
            McpError::internal_error(format!("JSON serialization failed: {}", e), None)
        })?;
        Ok(CallToolResult::success(vec![Content::text(output)]))
    }

    /// All discovery failures become the `{"error": ...}` envelope and are
    /// reported as a tool-level error, never a crash.
    fn error_envelope(err: DiscoveryError) -> CallToolResult {
        let envelope = json!({ "error": err.to_string() });
        CallToolResult::error(vec![Content::text(
            serde_json::to_string_pretty(&envelope).unwrap_or_else(|_| envelope.to_string()),
        )])
    }

    fn forum_error(err: DiscoveryError) -> McpError {
        McpError::internal_error(err.to_string(), None)
    }
}

#[tool_router]
impl AgoraService {
    /// Discover forum communities by meaning
    #[tool(description = "Discover communities by semantic search. Provide exactly one of 'query' (free text) or 'similar_to' (a community id or URL). Results are confidence-scored, tier-classified and reranked by engagement.")]
    async fn discover_communities(
        &self,
        params: Parameters<DiscoverParams>,
    ) -> Result<CallToolResult, McpError> {
        let p = params.0;
        let request = DiscoverRequest {
            query: p.query,
            similar_to: p.similar_to,
            limit: p.limit,
            min_users: p.min_users,
            engagement_tier: p.engagement_tier.as_deref().map(EngagementTier::parse),
            locale: p.locale,
        };

        let engine = match self.discovery().await {
            Ok(engine) => engine,
            Err(err) => return Ok(Self::error_envelope(err)),
        };

        match engine.discover(request).await {
            Ok(response) => Self::json_result(&response),
            Err(err) => Ok(Self::error_envelope(err)),
        }
    }

    /// Search forum topics and posts
    #[tool(description = "Full-text search over forum topics and posts.")]
    async fn forum_search(
        &self,
        params: Parameters<ForumSearchParams>,
    ) -> Result<CallToolResult, McpError> {
        let results = self
            .forum()?
            .search(&params.0.query)
            .await
            .map_err(Self::forum_error)?;
        Self::json_result(&json!({
            "topics": results.topics,
            "posts": results.posts,
        }))
    }

    /// Get a topic with its posts
    #[tool(description = "Get a forum topic by id, including its post stream.")]
    async fn get_topic(
        &self,
        params: Parameters<GetTopicParams>,
    ) -> Result<CallToolResult, McpError> {
        let topic = self
            .forum()?
            .get_topic(params.0.topic_id)
            .await
            .map_err(Self::forum_error)?;
        Self::json_result(&json!({
            "id": topic.id,
            "title": topic.title,
            "posts_count": topic.posts_count,
            "posts": topic.post_stream.posts,
        }))
    }

    /// Create a new topic
    #[tool(description = "Create a new forum topic with a title and Markdown body.")]
    async fn create_topic(
        &self,
        params: Parameters<CreateTopicParams>,
    ) -> Result<CallToolResult, McpError> {
        let p = params.0;
        let post = self
            .forum()?
            .create_topic(&p.title, &p.raw, p.category_id)
            .await
            .map_err(Self::forum_error)?;
        Self::json_result(&post)
    }

    /// Reply to a topic
    #[tool(description = "Create a reply post in an existing forum topic.")]
    async fn create_post(
        &self,
        params: Parameters<CreatePostParams>,
    ) -> Result<CallToolResult, McpError> {
        let p = params.0;
        let post = self
            .forum()?
            .create_post(p.topic_id, &p.raw)
            .await
            .map_err(Self::forum_error)?;
        Self::json_result(&post)
    }

    /// List forum categories
    #[tool(description = "List forum categories.")]
    async fn list_categories(&self) -> Result<CallToolResult, McpError> {
        let categories = self
            .forum()?
            .list_categories()
            .await
            .map_err(Self::forum_error)?;
        Self::json_result(&categories)
    }

    /// Get a forum user
    #[tool(description = "Get a forum user's profile by username.")]
    async fn get_user(
        &self,
        params: Parameters<GetUserParams>,
    ) -> Result<CallToolResult, McpError> {
        let user = self
            .forum()?
            .get_user(&params.0.username)
            .await
            .map_err(Self::forum_error)?;
        Self::json_result(&user)
    }

    /// List public chat channels
    #[tool(description = "List public chat channels on the forum.")]
    async fn list_chat_channels(&self) -> Result<CallToolResult, McpError> {
        let channels = self
            .forum()?
            .list_chat_channels()
            .await
            .map_err(Self::forum_error)?;
        Self::json_result(&channels)
    }

    /// Send a chat message
    #[tool(description = "Send a message to a forum chat channel.")]
    async fn send_chat_message(
        &self,
        params: Parameters<SendChatParams>,
    ) -> Result<CallToolResult, McpError> {
        let p = params.0;
        let message = self
            .forum()?
            .send_chat_message(p.channel_id, &p.message)
            .await
            .map_err(Self::forum_error)?;
        Self::json_result(&message)
    }

    /// List the current user's drafts
    #[tool(description = "List the API user's unsent drafts.")]
    async fn list_drafts(&self) -> Result<CallToolResult, McpError> {
        let drafts = self
            .forum()?
            .list_drafts()
            .await
            .map_err(Self::forum_error)?;
        Self::json_result(&drafts)
    }
}

#[tool_handler]
impl ServerHandler for AgoraService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Forum MCP Server. Provides semantic community discovery plus topic, post, user, category, chat and draft access for a Discourse-style forum.".to_string()
            ),
            ..Default::default()
        }
    }
}

/// Run the MCP server
pub async fn run_mcp_server(config: Config) -> Result<()> {
    use tokio::io::{stdin, stdout};

    let service = AgoraService::new(config);
    let transport = (stdin(), stdout());
    let server = service.serve(transport).await?;
    server.waiting().await?;

    Ok(())
}
