//! Legacy tag-scraped adapter for the db.chgk.info question archive.
//!
//! The archive serves Windows-1251 encoded pages where each question is laid
//! out as labeled sections (`<strong>Вопрос N:</strong>`, `<strong>Ответ:</strong>`,
//! `<strong>Комментарий:</strong>`). The endpoint itself randomizes question
//! selection server-side, so a single unconditional fetch is enough.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use super::{Question, QuestionSource};
use crate::errors::LoadError;
use crate::normalize::{self, CleanOptions};
use async_trait::async_trait;

/// Public origin of the archive; relative image URLs resolve against it
pub const CHGK_ORIGIN: &str = "https://db.chgk.info";

const RANDOM_PATH: &str = "/random";

/// Section labels of interest. Labels are matched by prefix because the
/// question label carries a trailing number ("Вопрос 3"). Any other label
/// ("Чемпионат", "Автор", "Источник", ...) is ignored and its content
/// discarded.
const QUESTION_LABEL: &str = "Вопрос";
const ANSWER_LABEL: &str = "Ответ";
const COMMENT_LABEL: &str = "Комментари";

lazy_static! {
    /// A section label; the content of a section runs from the end of its
    /// label to the start of the next one (or the end of the page).
    static ref LABEL_RE: Regex =
        Regex::new(r"<strong>\s*([^<]+?)\s*:\s*</strong>").unwrap();
}

/// Adapter for the legacy archive source
#[derive(Debug)]
pub struct ChgkSource {
    client: reqwest::Client,
    base_url: String,
}

impl ChgkSource {
    pub fn new() -> Self {
        Self::with_base_url(CHGK_ORIGIN.to_string())
    }

    /// Build an adapter against a different base URL (used by tests)
    pub fn with_base_url(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    /// Segment a decoded archive page into the common question shape.
    ///
    /// Each labeled section contributes only to its own field; content under
    /// unrecognized labels never leaks into a preceding one.
    fn parse_document(&self, html: &str) -> Result<Question, LoadError> {
        let mut question = None;
        let mut answer = None;
        let mut description = None;
        let mut question_preview = Vec::new();

        let labels: Vec<(&str, usize, usize)> = LABEL_RE
            .captures_iter(html)
            .filter_map(|cap| {
                let whole = cap.get(0)?;
                let label = cap.get(1)?;
                Some((label.as_str().trim(), whole.start(), whole.end()))
            })
            .collect();

        for (index, (label, _, body_start)) in labels.iter().enumerate() {
            let body_end = labels
                .get(index + 1)
                .map(|next| next.1)
                .unwrap_or(html.len());
            let body = &html[*body_start..body_end];

            if label.starts_with(QUESTION_LABEL) {
                question_preview = normalize::extract_images(body, &self.base_url);
                let text = normalize::clean(
                    body,
                    CleanOptions {
                        remove_images: true,
                        stop_at_boundary: false,
                    },
                );
                if !text.is_empty() {
                    question = Some(text);
                }
            } else if label.starts_with(ANSWER_LABEL) {
                let text = normalize::clean(
                    body,
                    CleanOptions {
                        remove_images: false,
                        stop_at_boundary: true,
                    },
                );
                if !text.is_empty() {
                    answer = Some(text);
                }
            } else if label.starts_with(COMMENT_LABEL) {
                let text = normalize::clean(
                    body,
                    CleanOptions {
                        remove_images: false,
                        stop_at_boundary: true,
                    },
                );
                if !text.is_empty() {
                    description = Some(text);
                }
            }
        }

        if question.is_none() {
            return Err(LoadError::Parse(
                "no labeled question section found in archive page".to_string(),
            ));
        }

        Ok(Question {
            question,
            answer,
            description,
            question_preview,
            answer_preview: Vec::new(),
            source_question_id: None,
        })
    }
}

impl Default for ChgkSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl QuestionSource for ChgkSource {
    async fn load_question(&self) -> Result<Question, LoadError> {
        let url = format!("{}{}", self.base_url, RANDOM_PATH);
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(LoadError::Fetch(format!(
                "{} returned status {}",
                url,
                response.status()
            )));
        }

        // The archive serves Windows-1251, not UTF-8. Decoding with the
        // wrong charset garbles the Cyrillic content.
        let raw = response
            .bytes()
            .await
            .map_err(|e| LoadError::Parse(format!("failed to read archive body: {}", e)))?;
        let (decoded, _, _) = encoding_rs::WINDOWS_1251.decode(&raw);

        debug!(url = %url, bytes = raw.len(), "Fetched archive page");
        self.parse_document(&decoded)
    }

    fn name(&self) -> &'static str {
        super::SOURCE_CHGK
    }
}
