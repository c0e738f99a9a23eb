//! # Unified Application Configuration
//!
//! This module provides a centralized configuration system that consolidates
//! all application settings into a single, structured configuration object.
//! It supports loading from environment variables, validation, and provides
//! a clean interface for accessing configuration throughout the application.

use crate::errors::{AppError, AppResult};
use crate::questions::{SOURCE_CHGK, SOURCE_GOTQUESTIONS};
use serde::{Deserialize, Serialize};
use std::env;

/// Bot-specific configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    /// Telegram bot token
    pub token: String,
    /// HTTP client timeout in seconds
    pub http_timeout_secs: u64,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            http_timeout_secs: 30,
        }
    }
}

impl BotConfig {
    /// Validate bot configuration
    pub fn validate(&self) -> AppResult<()> {
        if self.token.trim().is_empty() {
            return Err(AppError::Config("Bot token cannot be empty".to_string()));
        }

        // Basic bot token format validation
        if !self.token.contains(':') {
            return Err(AppError::Config(
                "Bot token format is invalid. Expected format: 'bot_id:bot_token'".to_string(),
            ));
        }

        let parts: Vec<&str> = self.token.split(':').collect();
        if parts.len() != 2 {
            return Err(AppError::Config(
                "Bot token format is invalid. Expected format: 'bot_id:bot_token'".to_string(),
            ));
        }

        // Validate bot ID is numeric
        if parts[0].parse::<u64>().is_err() {
            return Err(AppError::Config(
                "Bot token bot ID must be numeric".to_string(),
            ));
        }

        // Validate bot token length
        if parts[1].len() < 20 {
            return Err(AppError::Config(
                "Bot token appears to be too short. Please verify it's a valid token".to_string(),
            ));
        }

        if self.http_timeout_secs == 0 {
            return Err(AppError::Config("HTTP timeout cannot be 0".to_string()));
        }

        if self.http_timeout_secs > 300 {
            return Err(AppError::Config(
                "HTTP timeout cannot be greater than 300 seconds".to_string(),
            ));
        }

        Ok(())
    }
}

/// Quiz behavior configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizConfig {
    /// Question source used when /quiz is issued without arguments
    pub default_source: String,
    /// Difficulty tier used when /quiz is issued without a tier
    pub default_tier: String,
    /// Pending answer TTL in seconds
    pub answer_cache_ttl_secs: u64,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            default_source: SOURCE_GOTQUESTIONS.to_string(),
            default_tier: "random".to_string(),
            answer_cache_ttl_secs: 3600, // 1 hour
        }
    }
}

impl QuizConfig {
    /// Validate quiz configuration
    pub fn validate(&self) -> AppResult<()> {
        if self.default_source != SOURCE_CHGK && self.default_source != SOURCE_GOTQUESTIONS {
            return Err(AppError::Config(format!(
                "Default question source '{}' is invalid. Valid sources: {}, {}",
                self.default_source, SOURCE_CHGK, SOURCE_GOTQUESTIONS
            )));
        }

        if self.answer_cache_ttl_secs == 0 {
            return Err(AppError::Config(
                "Answer cache TTL cannot be 0".to_string(),
            ));
        }

        if self.answer_cache_ttl_secs > 86400 {
            return Err(AppError::Config(
                "Answer cache TTL cannot be greater than 86400 seconds (24 hours)".to_string(),
            ));
        }

        Ok(())
    }
}

/// Unified application configuration
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    /// Bot configuration
    pub bot: BotConfig,
    /// Quiz behavior configuration
    pub quiz: QuizConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> AppResult<Self> {
        let mut config = Self::default();

        // Load bot configuration
        config.bot.token = env::var("TELEGRAM_BOT_TOKEN").map_err(|_| {
            AppError::Config("TELEGRAM_BOT_TOKEN environment variable is required".to_string())
        })?;
        config.bot.http_timeout_secs = env::var("HTTP_CLIENT_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .map_err(|_| {
                AppError::Config("HTTP_CLIENT_TIMEOUT_SECS must be a valid number".to_string())
            })?;

        // Load quiz configuration
        config.quiz.default_source = env::var("DEFAULT_QUESTION_SOURCE")
            .unwrap_or_else(|_| SOURCE_GOTQUESTIONS.to_string());
        config.quiz.default_tier =
            env::var("DEFAULT_DIFFICULTY").unwrap_or_else(|_| "random".to_string());
        config.quiz.answer_cache_ttl_secs = env::var("ANSWER_CACHE_TTL_SECS")
            .unwrap_or_else(|_| "3600".to_string())
            .parse()
            .map_err(|_| {
                AppError::Config("ANSWER_CACHE_TTL_SECS must be a valid number".to_string())
            })?;

        Ok(config)
    }

    /// Validate all configuration sections
    pub fn validate(&self) -> AppResult<()> {
        self.bot.validate()?;
        self.quiz.validate()?;
        Ok(())
    }

    /// Get a summary of the current configuration for logging
    pub fn summary(&self) -> String {
        format!(
            "Configuration: bot_token=[REDACTED], default_source={}, default_tier={}, answer_cache_ttl_secs={}",
            self.quiz.default_source, self.quiz.default_tier, self.quiz.answer_cache_ttl_secs
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bot_config_validation() {
        let mut config = BotConfig::default();

        // Invalid: empty token
        assert!(config.validate().is_err());

        // Invalid: malformed token
        config.token = "invalid-token".to_string();
        assert!(config.validate().is_err());

        // Invalid: short token
        config.token = "123:short".to_string();
        assert!(config.validate().is_err());

        // Valid token format
        config.token = "123456789:AAFakeTokenForTestingPurposes1234567890".to_string();
        assert!(config.validate().is_ok());

        // Invalid: zero timeout
        config.http_timeout_secs = 0;
        assert!(config.validate().is_err());
        config.http_timeout_secs = 30;

        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_quiz_config_validation() {
        let mut config = QuizConfig::default();

        // Valid defaults
        assert!(config.validate().is_ok());

        // Invalid: unknown source
        config.default_source = "wikipedia".to_string();
        assert!(config.validate().is_err());
        config.default_source = SOURCE_CHGK.to_string();
        assert!(config.validate().is_ok());

        // Invalid: zero TTL
        config.answer_cache_ttl_secs = 0;
        assert!(config.validate().is_err());

        // Invalid: TTL beyond a day
        config.answer_cache_ttl_secs = 90000;
        assert!(config.validate().is_err());

        config.answer_cache_ttl_secs = 86400;
        assert!(config.validate().is_ok());
    }
}
