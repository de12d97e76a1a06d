mod config;
mod discovery;
mod error;
mod forum;
#[cfg(feature = "mcp")]
mod mcp;

use clap::{Parser, Subcommand};
use colored::Colorize;

use config::Config;
use discovery::engine::DiscoverRequest;
use discovery::{ChromaStore, DiscoverResponse, DiscoveryEngine, EngagementTier};

#[derive(Parser)]
#[command(name = "agora")]
#[command(about = "Forum tools with semantic community discovery", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Discover communities by semantic search
    Discover {
        /// Free-text query (omit when using --similar-to)
        query: Option<String>,
        #[arg(long, help = "Find communities similar to this id or URL")]
        similar_to: Option<String>,
        #[arg(long, short, help = "Limit results (1-50, default 10)")]
        limit: Option<usize>,
        #[arg(long, help = "Minimum total user count")]
        min_users: Option<u64>,
        #[arg(long, help = "Engagement tier filter: high, medium, low")]
        engagement_tier: Option<String>,
        #[arg(long, help = "Locale filter, e.g. en")]
        locale: Option<String>,
        #[arg(long, help = "JSON output")]
        json: bool,
    },
    /// Search forum topics and posts
    Search {
        query: String,
        #[arg(long, help = "JSON output")]
        json: bool,
    },
    /// Start MCP server for Claude integration
    #[cfg(feature = "mcp")]
    Mcp {
        #[arg(long, help = "Show Claude configuration instructions")]
        install: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Discover {
            query,
            similar_to,
            limit,
            min_users,
            engagement_tier,
            locale,
            json,
        } => {
            let request = DiscoverRequest {
                query,
                similar_to,
                limit,
                min_users,
                engagement_tier: engagement_tier.as_deref().map(EngagementTier::parse),
                locale,
            };
            block_on(run_discover(request, json))
        }
        Commands::Search { query, json } => block_on(run_forum_search(query, json)),
        #[cfg(feature = "mcp")]
        Commands::Mcp { install } => {
            if install {
                print_mcp_install_instructions();
                Ok(())
            } else {
                let config = Config::from_env()?;
                block_on(mcp::run_mcp_server(config))
            }
        }
    }
}

fn block_on<F: std::future::Future<Output = anyhow::Result<()>>>(fut: F) -> anyhow::Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(fut)
}

async fn run_discover(request: DiscoverRequest, json: bool) -> anyhow::Result<()> {
    let config = Config::from_env()?;
    let store = ChromaStore::connect(&config).await?;
    let engine = DiscoveryEngine::new(store);

    let response = engine.discover(request).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        print_discover_results(&response);
    }

    Ok(())
}

fn print_discover_results(response: &DiscoverResponse) {
    if let Some(ref query) = response.query {
        println!(
            "{} {} communities for: {}",
            "→".dimmed(),
            response.summary.returned,
            query.cyan()
        );
    } else if let Some(ref source) = response.similar_to {
        println!(
            "{} {} communities similar to: {}",
            "→".dimmed(),
            response.summary.returned,
            source.title.cyan()
        );
    }
    println!();

    if response.communities.is_empty() {
        for action in &response.next_actions {
            println!("{} {}", "!".yellow(), action);
        }
        return;
    }

    for (i, community) in response.communities.iter().enumerate() {
        let confidence = format!("{:.3}", community.confidence);
        let confidence_colored = if community.confidence > 0.8 {
            confidence.green()
        } else if community.confidence > 0.6 {
            confidence.yellow()
        } else {
            confidence.dimmed()
        };

        println!(
            "{}. [{}] {} ({})",
            (i + 1).to_string().bold(),
            confidence_colored,
            community.title.cyan(),
            community.match_tier.as_str()
        );
        println!("   {}", community.url.dimmed());
        if !community.description.is_empty() {
            let description = if community.description.chars().count() > 100 {
                format!(
                    "{}...",
                    community.description.chars().take(100).collect::<String>()
                )
            } else {
                community.description.clone()
            };
            println!("   {}", description.dimmed());
        }
        println!(
            "   {} users | {} active | {} engagement",
            community.total_users, community.active_users_30_days, community.engagement_tier.as_str()
        );
        println!();
    }

    if response.summary.has_more {
        println!("{} More results may be available; raise --limit.", "→".dimmed());
    }
}

async fn run_forum_search(query: String, json: bool) -> anyhow::Result<()> {
    let config = Config::from_env()?;
    let client = forum::ForumClient::new(&config)?;
    let results = client.search(&query).await?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "topics": results.topics,
                "posts": results.posts,
            }))?
        );
        return Ok(());
    }

    if results.topics.is_empty() {
        println!("{} No topics found for: {}", "→".dimmed(), query.cyan());
        return Ok(());
    }

    println!(
        "{} {} topics for: {}",
        "→".dimmed(),
        results.topics.len(),
        query.cyan()
    );
    println!();

    for (i, topic) in results.topics.iter().enumerate() {
        println!(
            "{}. {} ({} posts, {} views)",
            (i + 1).to_string().bold(),
            topic.title.cyan(),
            topic.posts_count,
            topic.views
        );
    }

    Ok(())
}

#[cfg(feature = "mcp")]
fn print_mcp_install_instructions() {
    let binary_path = std::env::current_exe()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|_| "agora".to_string());

    println!("{}", "MCP Server Installation Guide".bold().cyan());
    println!();
    println!("Set the required environment variables:");
    println!("  FORUM_URL, FORUM_API_KEY, FORUM_API_USERNAME, VECTOR_STORE_URL");
    println!("  (optional: VECTOR_COLLECTION, default \"communities\")");
    println!();
    println!("Add the following to your Claude configuration:");
    println!();
    println!(
        r#"{{
  "mcpServers": {{
    "agora": {{
      "command": "{}",
      "args": ["mcp"]
    }}
  }}
}}"#,
        binary_path
    );
    println!();
    println!("{}", "Available tools:".bold());
    println!(
        "  • {} - Semantic community discovery",
        "discover_communities".green()
    );
    println!("  • {} - Full-text topic/post search", "forum_search".green());
    println!("  • {} - Get a topic with posts", "get_topic".green());
    println!("  • {} - Create a topic", "create_topic".green());
    println!("  • {} - Reply to a topic", "create_post".green());
    println!("  • {} - List categories", "list_categories".green());
    println!("  • {} - Get a user profile", "get_user".green());
    println!("  • {} - List chat channels", "list_chat_channels".green());
    println!("  • {} - Send a chat message", "send_chat_message".green());
    println!("  • {} - List drafts", "list_drafts".green());
}
