use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use teloxide::prelude::*;
use tracing::info;
use trivia_owl::answer_cache::{AnswerCache, MemoryAnswerCache};
use trivia_owl::bot;
use trivia_owl::config::AppConfig;
use trivia_owl::observability;

/// How often expired pending answers are swept out of the in-memory cache
const CACHE_CLEANUP_INTERVAL_SECS: u64 = 300;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file first
    dotenvy::dotenv().ok();

    observability::init_tracing()?;

    // Load and validate configuration early
    let config = AppConfig::from_env().map_err(|e| anyhow::anyhow!("{}", e))?;
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Configuration validation failed: {}", e))?;
    info!("{}", config.summary());

    // Initialize the bot with custom client configuration for better reliability
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.bot.http_timeout_secs))
        .build()
        .expect("Failed to create HTTP client");

    let bot = Bot::with_client(config.bot.token.clone(), client);
    let shared_config = Arc::new(config);

    // The in-memory cache is valid for a single-process deployment; a
    // multi-instance deployment swaps in an external key-value store behind
    // the same trait.
    let memory_cache = Arc::new(MemoryAnswerCache::new());
    let shared_cache: Arc<dyn AnswerCache> = memory_cache.clone();

    // Sweep expired pending answers periodically
    let cleanup_cache = Arc::clone(&memory_cache);
    tokio::spawn(async move {
        let mut interval =
            tokio::time::interval(Duration::from_secs(CACHE_CLEANUP_INTERVAL_SECS));
        loop {
            interval.tick().await;
            cleanup_cache.cleanup();
        }
    });

    info!("Bot initialized, starting dispatcher");

    // Set up the dispatcher with shared configuration and answer cache
    let handler = dptree::entry()
        .branch(Update::filter_message().endpoint({
            let config = Arc::clone(&shared_config);
            let cache = Arc::clone(&shared_cache);
            move |bot: Bot, msg: Message| {
                let config = Arc::clone(&config);
                let cache = Arc::clone(&cache);
                async move { bot::message_handler(bot, msg, config, cache).await }
            }
        }))
        .branch(Update::filter_callback_query().endpoint({
            let cache = Arc::clone(&shared_cache);
            move |bot: Bot, q: CallbackQuery| {
                let cache = Arc::clone(&cache);
                async move { bot::callback_handler(bot, q, cache).await }
            }
        }));

    Dispatcher::builder(bot, handler)
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}
