//! # Trivia Owl Telegram Bot
//!
//! A Telegram bot that serves trivia questions pulled from two external
//! question archives, normalizes their content for MarkdownV2 delivery,
//! and manages a short-lived "show answer" inline button backed by a
//! TTL cache.

pub mod answer_cache;
pub mod bot;
pub mod config;
pub mod errors;
pub mod normalize;
pub mod observability;
pub mod questions;

// Re-export types for easier access
pub use questions::{create_source, Question, QuestionSource, Tier};
