use anyhow::Context;
use poll_service::PollingService;
use reddit_client::{ListenerRegistry, RedditClient, RedditPostData};
use redwatch_core::{AppConfig, Thing};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

const CONFIG_ENV: &str = "REDWATCH_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "redwatch.toml";
const DEFAULT_LOG_FILTER: &str = "redwatch=info,reddit_client=info,poll_service=info";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let config_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var(CONFIG_ENV).ok())
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let config = AppConfig::from_file(&config_path)
        .with_context(|| format!("loading configuration from {}", config_path))?;

    tracing::info!(
        "Starting redwatch for {} subreddit(s)",
        config.polling.subreddits.len()
    );

    let client = RedditClient::from_config(&config)?;
    client.login(config.reddit.duration).await?;

    let mut service = PollingService::new(client.session().clone(), config.poll_interval())
        .with_token_duration(config.reddit.duration);
    for subreddit in &config.polling.subreddits {
        let poller = client
            .new_posts_poller(subreddit)
            .with_page_limit(config.polling.page_limit);
        let registry = ListenerRegistry::new(poller);
        registry.add_listener(Arc::new(|post: &RedditPostData| {
            let posted = post
                .created_at()
                .map(|at| at.format("%Y-%m-%d %H:%M UTC").to_string())
                .unwrap_or_else(|| "unknown time".to_string());
            tracing::info!(
                "[r/{}] {} by u/{} at {}: https://www.reddit.com{}",
                post.subreddit,
                post.title,
                post.author,
                posted,
                post.permalink
            );
        }));
        service.add_target(Arc::new(registry));
    }

    let service = Arc::new(service);
    let shutdown = service.shutdown_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupt received, shutting down");
            shutdown.cancel();
        }
    });

    let result = service.start().await;
    client.logout().await;
    result?;
    Ok(())
}
