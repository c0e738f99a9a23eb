//! Callback Handler module for processing inline keyboard callback queries

use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::types::{MessageId, ParseMode};
use tracing::{debug, warn};

use crate::answer_cache::{question_id_from_key, AnswerCache, PendingAnswer};
use crate::errors::error_logging;
use crate::normalize;
use crate::questions::gotquestions::question_url_for_id;

use super::ui_builder::{build_photo_group, REVEAL_CALLBACK_PREFIX};

/// Handle callback queries from inline keyboards
pub async fn callback_handler(bot: Bot, q: CallbackQuery, cache: Arc<dyn AnswerCache>) -> Result<()> {
    let span = crate::observability::telegram_span("callback_handler", Some(q.from.id.0 as i64));
    let _enter = span.enter();

    let data = q.data.as_deref().unwrap_or("");
    if let Some(token) = data.strip_prefix(REVEAL_CALLBACK_PREFIX) {
        handle_reveal(&bot, &q, token, &cache).await?;
    }

    // Answer the callback query to remove the loading state
    bot.answer_callback_query(q.id).await?;
    Ok(())
}

/// Reveal the cached answer for a pressed button.
///
/// The cache entry is consumed exactly once; a missing entry is the normal
/// "expired" outcome, not an error.
async fn handle_reveal(
    bot: &Bot,
    q: &CallbackQuery,
    token: &str,
    cache: &Arc<dyn AnswerCache>,
) -> Result<()> {
    let Some(msg) = &q.message else {
        return Ok(());
    };
    let chat_id = msg.chat().id;

    match cache.take(token).await {
        Ok(Some(entry)) => {
            debug!(chat_id = %chat_id, token = %token, "Revealing cached answer");
            send_answer(bot, chat_id, &entry).await
        }
        Ok(None) => {
            debug!(chat_id = %chat_id, token = %token, "Reveal token expired");
            send_expired(bot, chat_id, token).await
        }
        Err(e) => {
            error_logging::log_cache_error(&e, "take", token);
            bot.send_message(chat_id, "\u{1F648} Something went wrong. Please try again.")
                .await?;
            Ok(())
        }
    }
}

async fn send_answer(bot: &Bot, chat_id: ChatId, entry: &PendingAnswer) -> Result<()> {
    // Remove the button from the question message; the answer below makes it
    // redundant. Failing here (message too old, already edited) is harmless.
    if let Err(e) = bot
        .edit_message_reply_markup(chat_id, MessageId(entry.question_message_id))
        .await
    {
        warn!(
            error = %e,
            chat_id = %chat_id,
            message_id = entry.question_message_id,
            "Failed to remove reveal button"
        );
    }

    bot.send_message(chat_id, entry.answer.clone())
        .parse_mode(ParseMode::MarkdownV2)
        .await?;

    if !entry.answer_preview.is_empty() {
        let media = build_photo_group(&entry.answer_preview, None);
        if !media.is_empty() {
            bot.send_media_group(chat_id, media).await?;
        }
    }

    Ok(())
}

async fn send_expired(bot: &Bot, chat_id: ChatId, token: &str) -> Result<()> {
    let mut text = "\u{231B} This answer has expired.".to_string();
    if let Some(question_id) = question_id_from_key(token) {
        text.push_str(&format!(
            " You can still [open the question]({}) on its source site.",
            question_url_for_id(question_id)
        ));
    }

    bot.send_message(chat_id, normalize::escape_markdown_v2(&text))
        .parse_mode(ParseMode::MarkdownV2)
        .await?;
    Ok(())
}
