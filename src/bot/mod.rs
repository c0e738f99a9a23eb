//! Bot module for handling Telegram interactions
//!
//! This module is split into several submodules for better organization:
//! - `message_handler`: Routes incoming text messages to command handlers
//! - `command_handlers`: /start, /help, and /quiz handling
//! - `callback_handler`: "Show answer" reveal-button handling
//! - `ui_builder`: Creates the reveal keyboard and photo groups

pub mod callback_handler;
pub mod command_handlers;
pub mod message_handler;
pub mod ui_builder;

// Re-export main handler functions for use in main.rs
pub use callback_handler::callback_handler;
pub use message_handler::message_handler;

// Re-export utility functions that might be used elsewhere
pub use ui_builder::{build_photo_group, create_reveal_keyboard, REVEAL_CALLBACK_PREFIX};
