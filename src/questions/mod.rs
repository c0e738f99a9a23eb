//! # Question Sources Module
//!
//! This module defines the common question shape produced by every source
//! adapter, the difficulty tiers used to filter the search-API source, the
//! [`QuestionSource`] trait shared by the adapters, and the factory that
//! selects an adapter by source identifier.
//!
//! ## Sources
//!
//! - `chgk`: the legacy db.chgk.info archive (Windows-1251, tag-scraped)
//! - `gotquestions`: the gotquestions.online JSON search API

pub mod chgk;
pub mod gotquestions;

use crate::errors::LoadError;
use crate::normalize;
use async_trait::async_trait;

/// Identifier of the legacy tag-scraped archive source
pub const SOURCE_CHGK: &str = "chgk";
/// Identifier of the JSON search API source
pub const SOURCE_GOTQUESTIONS: &str = "gotquestions";

/// A trivia question in the common shape shared by all adapters.
///
/// Absent optional fields are `None`, never `Some("")` — downstream
/// formatting checks presence. Image URL lists are empty when the source
/// carried no images; when non-empty they contain only absolute URLs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Question {
    /// The prompt body, normalized plain text with optional MarkdownV2
    /// emphasis markers
    pub question: Option<String>,
    /// The answer text
    pub answer: Option<String>,
    /// Supplementary commentary/acceptance notes
    pub description: Option<String>,
    /// Images accompanying the question, in source order
    pub question_preview: Vec<String>,
    /// Images accompanying the answer, in source order
    pub answer_preview: Vec<String>,
    /// Source-assigned numeric identifier, used for cache keys and link-backs
    pub source_question_id: Option<i64>,
}

impl Question {
    /// A question is usable for display if the prompt body is present
    pub fn is_displayable(&self) -> bool {
        self.question.is_some()
    }
}

/// Named difficulty bands used to filter the search-API source.
///
/// The legacy archive ignores the tier entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Random,
    Easy,
    Medium,
    Hard,
}

impl Tier {
    /// Parse a tier name case-insensitively. Unrecognized names fall back to
    /// `Medium` rather than failing.
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "random" => Tier::Random,
            "easy" => Tier::Easy,
            "hard" => Tier::Hard,
            _ => Tier::Medium,
        }
    }

    /// The canonical lowercase name of the tier
    pub fn name(&self) -> &'static str {
        match self {
            Tier::Random => "random",
            Tier::Easy => "easy",
            Tier::Medium => "medium",
            Tier::Hard => "hard",
        }
    }
}

/// Common capability set shared by the two source adapters.
///
/// Adapters implement `load_question`; the Telegram formatting methods are
/// provided here so both sources deliver identically-shaped messages.
#[async_trait]
pub trait QuestionSource: Send + Sync + std::fmt::Debug {
    /// Fetch and normalize one question from the source
    async fn load_question(&self) -> Result<Question, LoadError>;

    /// The source identifier, for logs
    fn name(&self) -> &'static str;

    /// Deep link to the question on its origin site, where the source
    /// supports one
    fn question_url(&self, _question: &Question) -> Option<String> {
        None
    }

    /// Format the question body as MarkdownV2-ready text
    fn format_question(&self, question: &Question) -> String {
        let body = question.question.as_deref().unwrap_or_default();
        format!(
            "*\u{2753} Question*\n\n{}",
            normalize::escape_markdown_v2(body)
        )
    }

    /// Format the answer (and commentary, when present) as MarkdownV2-ready
    /// text
    fn format_answer(&self, question: &Question) -> String {
        let mut parts: Vec<String> = Vec::new();
        if let Some(answer) = question.answer.as_deref() {
            parts.push(format!(
                "*\u{1F4A1} Answer:* {}",
                normalize::escape_markdown_v2(answer)
            ));
        }
        if let Some(description) = question.description.as_deref() {
            parts.push(normalize::escape_markdown_v2(description));
        }
        parts.join("\n\n")
    }
}

/// Select a question source adapter by identifier.
///
/// The difficulty tier is only meaningful to the search-API source; the
/// legacy archive ignores it. An unrecognized identifier fails with
/// [`LoadError::UnknownSource`] naming the valid set.
pub fn create_source(source: &str, tier: Tier) -> Result<Box<dyn QuestionSource>, LoadError> {
    match source {
        SOURCE_CHGK => Ok(Box::new(chgk::ChgkSource::new())),
        SOURCE_GOTQUESTIONS => Ok(Box::new(gotquestions::GotQuestionsSource::new(tier))),
        other => Err(LoadError::UnknownSource(format!(
            "unknown question source '{}', valid sources: {}, {}",
            other, SOURCE_CHGK, SOURCE_GOTQUESTIONS
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_parse_known_names() {
        assert_eq!(Tier::parse("random"), Tier::Random);
        assert_eq!(Tier::parse("Easy"), Tier::Easy);
        assert_eq!(Tier::parse("MEDIUM"), Tier::Medium);
        assert_eq!(Tier::parse(" hard "), Tier::Hard);
    }

    #[test]
    fn test_tier_parse_falls_back_to_medium() {
        assert_eq!(Tier::parse("nightmare"), Tier::Medium);
        assert_eq!(Tier::parse(""), Tier::Medium);
    }

    #[test]
    fn test_create_source_unknown_names_valid_set() {
        let err = create_source("unknown-source", Tier::Medium).unwrap_err();
        match err {
            LoadError::UnknownSource(msg) => {
                assert!(msg.contains(SOURCE_CHGK));
                assert!(msg.contains(SOURCE_GOTQUESTIONS));
            }
            other => panic!("expected UnknownSource, got {:?}", other),
        }
    }

    #[test]
    fn test_create_source_known_identifiers() {
        assert!(create_source(SOURCE_CHGK, Tier::Random).is_ok());
        assert!(create_source(SOURCE_GOTQUESTIONS, Tier::Hard).is_ok());
    }

    #[test]
    fn test_question_displayable_requires_prompt() {
        let mut question = Question::default();
        assert!(!question.is_displayable());
        question.question = Some("body".to_string());
        assert!(question.is_displayable());
    }
}
