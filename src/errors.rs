//! # Application Error Types
//!
//! This module defines common error types used throughout the Trivia Owl
//! application. It provides structured error handling for the question
//! loading pipeline and the surrounding bot components.

use std::fmt;

/// Errors produced by the question loading pipeline (adapters and factory)
#[derive(Debug, Clone, PartialEq)]
pub enum LoadError {
    /// Non-2xx response or network failure while talking to a question source
    Fetch(String),
    /// A fetched result page contained zero candidate questions
    EmptyResult(String),
    /// Adapter-internal scraping/decoding failure, wraps the underlying message
    Parse(String),
    /// Unrecognized source identifier passed to the loader factory
    UnknownSource(String),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Fetch(msg) => write!(f, "[FETCH] {}", msg),
            LoadError::EmptyResult(msg) => write!(f, "[EMPTY_RESULT] {}", msg),
            LoadError::Parse(msg) => write!(f, "[PARSE] {}", msg),
            LoadError::UnknownSource(msg) => write!(f, "[UNKNOWN_SOURCE] {}", msg),
        }
    }
}

impl std::error::Error for LoadError {}

impl From<reqwest::Error> for LoadError {
    fn from(err: reqwest::Error) -> Self {
        LoadError::Fetch(err.to_string())
    }
}

/// General application error type for consistent error handling
#[derive(Debug, Clone, PartialEq)]
pub enum AppError {
    /// Configuration validation errors
    Config(String),
    /// Question loading errors
    Load(LoadError),
    /// Answer cache errors
    Cache(String),
    /// Internal application errors
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(msg) => write!(f, "[CONFIG] {}", msg),
            AppError::Load(err) => write!(f, "[LOAD] {}", err),
            AppError::Cache(msg) => write!(f, "[CACHE] {}", msg),
            AppError::Internal(msg) => write!(f, "[INTERNAL] {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<LoadError> for AppError {
    fn from(err: LoadError) -> Self {
        AppError::Load(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

/// Standardized error logging utilities for consistent error reporting across the application
pub mod error_logging {
    use tracing::error;

    /// Log question source errors with source and endpoint context
    pub fn log_source_error(
        error: &impl std::fmt::Display,
        operation: &str,
        source: &str,
        endpoint: Option<&str>,
    ) {
        error!(
            error = %error,
            operation = %operation,
            source = %source,
            endpoint = ?endpoint,
            "Question source operation failed"
        );
    }

    /// Log answer cache errors with key context
    pub fn log_cache_error(error: &impl std::fmt::Display, operation: &str, key: &str) {
        error!(
            error = %error,
            operation = %operation,
            key = %key,
            "Answer cache operation failed"
        );
    }

    /// Log Telegram delivery errors with chat context
    pub fn log_telegram_error(
        error: &impl std::fmt::Display,
        operation: &str,
        chat_id: Option<i64>,
    ) {
        error!(
            error = %error,
            operation = %operation,
            chat_id = ?chat_id,
            "Telegram operation failed"
        );
    }

    /// Log configuration errors during startup/initialization
    pub fn log_config_error(error: &impl std::fmt::Display, config_key: &str, operation: &str) {
        error!(
            error = %error,
            config_key = %config_key,
            operation = %operation,
            "Configuration error"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_error_display_tags() {
        assert_eq!(
            LoadError::Fetch("status 502".to_string()).to_string(),
            "[FETCH] status 502"
        );
        assert_eq!(
            LoadError::EmptyResult("page 3".to_string()).to_string(),
            "[EMPTY_RESULT] page 3"
        );
    }

    #[test]
    fn test_load_error_wraps_into_app_error() {
        let err: AppError = LoadError::Parse("bad section".to_string()).into();
        assert_eq!(err, AppError::Load(LoadError::Parse("bad section".to_string())));
        assert!(err.to_string().contains("[PARSE]"));
    }
}
