//! UI Builder module for creating keyboards and media groups

use teloxide::types::{
    InlineKeyboardButton, InlineKeyboardMarkup, InputFile, InputMedia, InputMediaPhoto, ParseMode,
};
use tracing::warn;

/// Prefix marking a reveal-button callback payload; the remainder is the
/// answer cache key
pub const REVEAL_CALLBACK_PREFIX: &str = "reveal:";

/// Create the single-row inline keyboard carrying the reveal token
pub fn create_reveal_keyboard(token: &str) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![InlineKeyboardButton::callback(
        "\u{1F4A1} Show answer".to_string(),
        format!("{}{}", REVEAL_CALLBACK_PREFIX, token),
    )]])
}

/// Assemble a photo group from absolute image URLs.
///
/// The optional caption (already MarkdownV2-escaped) is attached to the
/// first item only. URLs that fail to parse are skipped with a warning
/// rather than failing the whole group.
pub fn build_photo_group(urls: &[String], caption: Option<&str>) -> Vec<InputMedia> {
    let mut media = Vec::with_capacity(urls.len());

    for raw in urls {
        let url = match raw.parse() {
            Ok(url) => url,
            Err(e) => {
                warn!(error = %e, url = %raw, "Skipping unparseable image URL");
                continue;
            }
        };

        let mut photo = InputMediaPhoto::new(InputFile::url(url));
        if media.is_empty() {
            photo.caption = caption.map(str::to_string);
            photo.parse_mode = caption.map(|_| ParseMode::MarkdownV2);
        }
        media.push(InputMedia::Photo(photo));
    }

    media
}
