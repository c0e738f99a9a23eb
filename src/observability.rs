//! Observability module for structured logging setup.
//!
//! This module provides:
//! - Structured logging configuration (JSON for production, pretty for
//!   development)
//! - Tracing span creation utilities for the bot and question-source
//!   components

use anyhow::Result;
use tracing_subscriber::prelude::*;

/// Initialize structured logging with tracing
pub fn init_tracing() -> Result<()> {
    // Determine log format from environment variable (default to JSON for production)
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "json".to_string());

    // Create the filter
    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive("trivia_owl=info".parse()?)
        .add_directive("teloxide=warn".parse()?)
        .add_directive("reqwest=warn".parse()?);

    // Initialize based on format
    if log_format == "pretty" {
        // Pretty formatting for development
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .pretty()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_thread_names(false),
            )
            .init();
    } else {
        // JSON formatting for production (default)
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_thread_names(false),
            )
            .init();
    }

    tracing::info!(
        log_format = %log_format,
        "Tracing initialized with structured logging"
    );
    Ok(())
}

/// Create a span for Telegram bot operations
pub fn telegram_span(operation: &str, user_id: Option<i64>) -> tracing::Span {
    tracing::info_span!(
        "telegram_operation",
        operation = operation,
        user_id = user_id,
        component = "telegram"
    )
}

/// Create a span for question source operations
pub fn source_span(operation: &str, source: &str) -> tracing::Span {
    tracing::info_span!(
        "source_operation",
        operation = operation,
        source = source,
        component = "questions"
    )
}
