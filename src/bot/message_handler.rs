//! Message Handler module for routing incoming text messages to commands

use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;

use crate::answer_cache::AnswerCache;
use crate::config::AppConfig;

use super::command_handlers;

/// Handle incoming messages and route recognized commands
pub async fn message_handler(
    bot: Bot,
    msg: Message,
    config: Arc<AppConfig>,
    cache: Arc<dyn AnswerCache>,
) -> Result<()> {
    let span = crate::observability::telegram_span(
        "message_handler",
        msg.from.as_ref().map(|user| user.id.0 as i64),
    );
    let _enter = span.enter();

    let Some(text) = msg.text() else {
        return Ok(());
    };

    let (command, args) = split_command(text);
    match command {
        Some("/start") => command_handlers::handle_start_command(&bot, &msg).await,
        Some("/help") => command_handlers::handle_help_command(&bot, &msg).await,
        Some("/quiz") => {
            command_handlers::handle_quiz_command(&bot, &msg, args, &config, &cache).await
        }
        _ => Ok(()),
    }
}

/// Split a message into its leading command and argument tail.
///
/// Commands may carry a bot-name suffix in group chats ("/quiz@TriviaOwlBot").
fn split_command(text: &str) -> (Option<&str>, &str) {
    let trimmed = text.trim();
    if !trimmed.starts_with('/') {
        return (None, "");
    }

    let (head, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (trimmed, ""),
    };
    let command = head.split('@').next().unwrap_or(head);
    (Some(command), rest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_command_bare() {
        assert_eq!(split_command("/quiz"), (Some("/quiz"), ""));
    }

    #[test]
    fn test_split_command_with_args() {
        assert_eq!(
            split_command("/quiz gotquestions hard"),
            (Some("/quiz"), "gotquestions hard")
        );
    }

    #[test]
    fn test_split_command_with_bot_suffix() {
        assert_eq!(
            split_command("/quiz@TriviaOwlBot chgk"),
            (Some("/quiz"), "chgk")
        );
    }

    #[test]
    fn test_split_command_plain_text() {
        assert_eq!(split_command("hello there"), (None, ""));
    }
}
