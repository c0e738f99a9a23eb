//! Command Handlers module for processing bot commands

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use teloxide::prelude::*;
use teloxide::types::ParseMode;
use tracing::{debug, info};

use crate::answer_cache::{answer_key, AnswerCache, PendingAnswer};
use crate::config::AppConfig;
use crate::errors::error_logging;
use crate::questions::{create_source, Tier};

use super::ui_builder::{build_photo_group, create_reveal_keyboard};

/// User-facing message for any question-loading failure. Error kinds are
/// distinguished only in logs.
const LOAD_FAILED_MESSAGE: &str =
    "\u{1F648} Couldn't load a question right now. Please try again.";

/// Handle the /start command
pub async fn handle_start_command(bot: &Bot, msg: &Message) -> Result<()> {
    let welcome_message = "\u{1F989} Welcome to Trivia Owl!\n\n\
         I serve trivia questions from two question archives.\n\n\
         Send /quiz to get a question, then press the button to reveal the answer.\n\
         Send /help for sources and difficulty tiers.";
    bot.send_message(msg.chat.id, welcome_message).await?;
    Ok(())
}

/// Handle the /help command
pub async fn handle_help_command(bot: &Bot, msg: &Message) -> Result<()> {
    let help_message = "\u{1F989} Trivia Owl commands\n\n\
         /quiz: a question from the default source\n\
         /quiz gotquestions [random|easy|medium|hard]: from the search API, filtered by difficulty\n\
         /quiz chgk: a random question from the classic archive\n\n\
         After a question arrives, press \u{1F4A1} Show answer. The answer stays \
         available for a limited time, then the button expires.";
    bot.send_message(msg.chat.id, help_message).await?;
    Ok(())
}

/// Handle the /quiz command: load one question, deliver it, and store the
/// pending answer behind a reveal button
pub async fn handle_quiz_command(
    bot: &Bot,
    msg: &Message,
    args: &str,
    config: &AppConfig,
    cache: &Arc<dyn AnswerCache>,
) -> Result<()> {
    let mut parts = args.split_whitespace();
    let source_id = parts.next().unwrap_or(&config.quiz.default_source);
    let tier = Tier::parse(parts.next().unwrap_or(&config.quiz.default_tier));

    debug!(chat_id = %msg.chat.id, source = %source_id, tier = %tier.name(), "Handling /quiz command");

    let source = match create_source(source_id, tier) {
        Ok(source) => source,
        Err(e) => {
            error_logging::log_source_error(&e, "create_source", source_id, None);
            bot.send_message(msg.chat.id, LOAD_FAILED_MESSAGE).await?;
            return Ok(());
        }
    };

    let span = crate::observability::source_span("load_question", source.name());
    let _enter = span.enter();

    let question = match source.load_question().await {
        Ok(question) if question.is_displayable() => question,
        Ok(_) => {
            error_logging::log_source_error(
                &"loaded question has no prompt body",
                "load_question",
                source.name(),
                None,
            );
            bot.send_message(msg.chat.id, LOAD_FAILED_MESSAGE).await?;
            return Ok(());
        }
        Err(e) => {
            error_logging::log_source_error(&e, "load_question", source.name(), None);
            bot.send_message(msg.chat.id, LOAD_FAILED_MESSAGE).await?;
            return Ok(());
        }
    };

    let text = source.format_question(&question);
    let request = bot
        .send_message(msg.chat.id, text)
        .parse_mode(ParseMode::MarkdownV2);

    // Only attach a reveal button when there is an answer to reveal.
    let sent = if question.answer.is_some() {
        let key = answer_key(msg.chat.id.0, question.source_question_id);
        let sent = request.reply_markup(create_reveal_keyboard(&key)).await?;

        let entry = PendingAnswer {
            answer: source.format_answer(&question),
            answer_preview: question.answer_preview.clone(),
            question_message_id: sent.id.0,
        };
        if let Err(e) = cache
            .set(
                &key,
                entry,
                Duration::from_secs(config.quiz.answer_cache_ttl_secs),
            )
            .await
        {
            error_logging::log_cache_error(&e, "set", &key);
        }
        sent
    } else {
        request.await?
    };

    if !question.question_preview.is_empty() {
        let media = build_photo_group(&question.question_preview, Some("\u{1F4CE} Handout"));
        if !media.is_empty() {
            bot.send_media_group(msg.chat.id, media).await?;
        }
    }

    info!(
        chat_id = %msg.chat.id,
        message_id = sent.id.0,
        source = source.name(),
        question_id = ?question.source_question_id,
        "Delivered question"
    );
    Ok(())
}
