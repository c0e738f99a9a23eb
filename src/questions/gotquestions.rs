//! JSON search API adapter for gotquestions.online.
//!
//! The search endpoint returns a bounded page of candidate questions filtered
//! by a normalized difficulty metric. One page within the tier's ceiling is
//! picked at random, then one item from that page, and its fields are mapped
//! into the common question shape.

use rand::Rng;
use serde::Deserialize;
use tracing::debug;

use super::{Question, QuestionSource, Tier};
use crate::errors::LoadError;
use crate::normalize;
use async_trait::async_trait;

/// Public origin of the source; link-backs and relative images resolve
/// against it
pub const GOTQUESTIONS_ORIGIN: &str = "https://gotquestions.online";

const SEARCH_PATH: &str = "/api/question/search/";

/// Fixed accepted-rate band applied to every query
const TAKEN_FROM: u32 = 50;
const TAKEN_TO: u32 = 100;

/// Prefix glyph marking handout material appended to the question body
const HANDOUT_GLYPH: &str = "\u{1F4CE}";

/// Difficulty-metric band and page-count ceiling for one tier
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierRange {
    pub min: f64,
    pub max: f64,
    pub page_ceiling: u32,
}

/// Static table mapping difficulty tiers onto the source's normalized
/// difficulty metric
pub fn tier_range(tier: Tier) -> TierRange {
    match tier {
        Tier::Random => TierRange {
            min: 0.0,
            max: 10.0,
            page_ceiling: 1000,
        },
        Tier::Easy => TierRange {
            min: 0.0,
            max: 3.5,
            page_ceiling: 500,
        },
        Tier::Medium => TierRange {
            min: 3.5,
            max: 6.5,
            page_ceiling: 300,
        },
        Tier::Hard => TierRange {
            min: 6.5,
            max: 10.0,
            page_ceiling: 200,
        },
    }
}

/// Build the search query for a tier and page, exactly as the static table
/// specifies
pub fn build_search_query(tier: Tier, page: u32) -> Vec<(&'static str, String)> {
    let range = tier_range(tier);
    vec![
        ("takenFrom", TAKEN_FROM.to_string()),
        ("takenTo", TAKEN_TO.to_string()),
        ("complexityFrom", range.min.to_string()),
        ("complexityTo", range.max.to_string()),
        ("page", page.to_string()),
    ]
}

/// One page of the search result set
#[derive(Debug, Deserialize)]
struct SearchPage {
    #[serde(default)]
    questions: Vec<ApiQuestion>,
}

/// Raw question schema as returned by the search API
#[derive(Debug, Clone, Deserialize)]
struct ApiQuestion {
    id: i64,
    #[serde(default)]
    text: Option<String>,
    #[serde(default, rename = "razdatkaText")]
    razdatka_text: Option<String>,
    #[serde(default, rename = "razdatkaPic")]
    razdatka_pic: Option<String>,
    #[serde(default)]
    answer: Option<String>,
    #[serde(default)]
    zachet: Option<String>,
    #[serde(default)]
    comment: Option<String>,
    #[serde(default, rename = "answerPic")]
    answer_pic: Option<String>,
    #[serde(default, rename = "commentPic")]
    comment_pic: Option<String>,
    #[serde(default)]
    complexity: Option<Vec<f64>>,
}

/// Adapter for the JSON search API source
#[derive(Debug)]
pub struct GotQuestionsSource {
    client: reqwest::Client,
    base_url: String,
    tier: Tier,
}

impl GotQuestionsSource {
    pub fn new(tier: Tier) -> Self {
        Self::with_base_url(GOTQUESTIONS_ORIGIN.to_string(), tier)
    }

    /// Build an adapter against a different base URL (used by tests)
    pub fn with_base_url(base_url: String, tier: Tier) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
            tier,
        }
    }

    /// Map one API item into the common question shape. Optional fields that
    /// end up empty are wholly omitted.
    fn map_item(&self, item: ApiQuestion) -> Question {
        let mut question = trimmed(item.text);

        if let Some(handout) = trimmed(item.razdatka_text) {
            question = Some(match question {
                Some(text) => format!("{}\n\n{} {}", text, HANDOUT_GLYPH, handout),
                None => format!("{} {}", HANDOUT_GLYPH, handout),
            });
        }

        let question_preview = item
            .razdatka_pic
            .as_deref()
            .and_then(|pic| normalize::resolve_url(pic, GOTQUESTIONS_ORIGIN))
            .into_iter()
            .collect();

        let mut paragraphs: Vec<String> = Vec::new();
        if let Some(zachet) = trimmed(item.zachet) {
            paragraphs.push(format!("Also accepted: {}", zachet));
        }
        if let Some(comment) = trimmed(item.comment) {
            paragraphs.push(comment);
        }
        if let Some(complexity) = item.complexity.as_deref().filter(|c| !c.is_empty()) {
            let mean = complexity.iter().sum::<f64>() / complexity.len() as f64;
            // The link label stays free of MarkdownV2-reserved characters:
            // link constructs pass through escaping verbatim.
            paragraphs.push(format!(
                "Taken by {:.1}% \u{B7} {} tier \u{B7} [open the question]({})",
                mean,
                self.tier.name(),
                question_url_for_id(item.id)
            ));
        }
        let description = if paragraphs.is_empty() {
            None
        } else {
            Some(paragraphs.join("\n\n"))
        };

        let mut answer_preview = Vec::new();
        for pic in [item.answer_pic.as_deref(), item.comment_pic.as_deref()]
            .into_iter()
            .flatten()
        {
            if let Some(url) = normalize::resolve_url(pic, GOTQUESTIONS_ORIGIN) {
                answer_preview.push(url);
            }
        }

        Question {
            question,
            answer: trimmed(item.answer),
            description,
            question_preview,
            answer_preview,
            source_question_id: Some(item.id),
        }
    }
}

/// Trim an optional field, dropping it entirely when empty
fn trimmed(value: Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

#[async_trait]
impl QuestionSource for GotQuestionsSource {
    async fn load_question(&self) -> Result<Question, LoadError> {
        let range = tier_range(self.tier);
        let page = rand::rng().random_range(1..=range.page_ceiling);
        let url = format!("{}{}", self.base_url, SEARCH_PATH);

        let response = self
            .client
            .get(&url)
            .query(&build_search_query(self.tier, page))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(LoadError::Fetch(format!(
                "{} returned status {}",
                url,
                response.status()
            )));
        }

        let result_page: SearchPage = response
            .json()
            .await
            .map_err(|e| LoadError::Parse(format!("failed to decode search page: {}", e)))?;

        // Surfacing empty-page misses is intentional; retrying is the
        // caller's decision.
        if result_page.questions.is_empty() {
            return Err(LoadError::EmptyResult(format!(
                "page {} of the {} tier returned no questions",
                page,
                self.tier.name()
            )));
        }

        let index = rand::rng().random_range(0..result_page.questions.len());
        let item = result_page.questions[index].clone();
        debug!(
            question_id = item.id,
            page,
            tier = self.tier.name(),
            "Picked question from search page"
        );

        Ok(self.map_item(item))
    }

    fn name(&self) -> &'static str {
        super::SOURCE_GOTQUESTIONS
    }

    fn question_url(&self, question: &Question) -> Option<String> {
        question.source_question_id.map(question_url_for_id)
    }
}

/// Deep link for an id-based reveal token, used when the cached answer has
/// already expired
pub fn question_url_for_id(id: i64) -> String {
    format!("{}/question/{}", GOTQUESTIONS_ORIGIN, id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api_question(id: i64) -> ApiQuestion {
        ApiQuestion {
            id,
            text: None,
            razdatka_text: None,
            razdatka_pic: None,
            answer: None,
            zachet: None,
            comment: None,
            answer_pic: None,
            comment_pic: None,
            complexity: None,
        }
    }

    #[test]
    fn test_tier_table_bands_and_ceilings() {
        let hard = tier_range(Tier::Hard);
        assert_eq!(hard.min, 6.5);
        assert_eq!(hard.max, 10.0);
        assert_eq!(hard.page_ceiling, 200);
        assert_eq!(tier_range(Tier::Easy).page_ceiling, 500);
        assert_eq!(tier_range(Tier::Random).page_ceiling, 1000);
    }

    #[test]
    fn test_build_search_query_differs_per_tier() {
        let hard = build_search_query(Tier::Hard, 7);
        let easy = build_search_query(Tier::Easy, 7);
        assert!(hard.contains(&("complexityFrom", "6.5".to_string())));
        assert!(hard.contains(&("complexityTo", "10".to_string())));
        assert!(easy.contains(&("complexityFrom", "0".to_string())));
        assert!(easy.contains(&("complexityTo", "3.5".to_string())));
        assert!(hard.contains(&("takenFrom", "50".to_string())));
        assert!(hard.contains(&("takenTo", "100".to_string())));
        assert!(hard.contains(&("page", "7".to_string())));
    }

    #[test]
    fn test_map_item_appends_handout_to_question() {
        let source = GotQuestionsSource::new(Tier::Medium);
        let mut item = api_question(1);
        item.text = Some("Question body".to_string());
        item.razdatka_text = Some("  handout  ".to_string());
        let question = source.map_item(item);
        assert_eq!(
            question.question.as_deref(),
            Some("Question body\n\n\u{1F4CE} handout")
        );
    }

    #[test]
    fn test_map_item_handout_alone_becomes_question() {
        let source = GotQuestionsSource::new(Tier::Medium);
        let mut item = api_question(2);
        item.razdatka_text = Some("handout only".to_string());
        let question = source.map_item(item);
        assert_eq!(
            question.question.as_deref(),
            Some("\u{1F4CE} handout only")
        );
    }

    #[test]
    fn test_map_item_complexity_mean_one_decimal() {
        let source = GotQuestionsSource::new(Tier::Hard);
        let mut item = api_question(42);
        item.text = Some("q".to_string());
        item.complexity = Some(vec![40.0, 60.0]);
        let question = source.map_item(item);
        let description = question.description.unwrap();
        assert!(description.contains("50.0"));
        assert!(description.contains("hard"));
        assert!(description.contains("https://gotquestions.online/question/42"));
    }

    #[test]
    fn test_map_item_omits_empty_optionals() {
        let source = GotQuestionsSource::new(Tier::Medium);
        let mut item = api_question(3);
        item.text = Some("q".to_string());
        item.answer = Some("   ".to_string());
        item.zachet = Some("".to_string());
        let question = source.map_item(item);
        assert_eq!(question.answer, None);
        assert_eq!(question.description, None);
        assert!(question.question_preview.is_empty());
        assert!(question.answer_preview.is_empty());
    }

    #[test]
    fn test_map_item_collects_answer_previews_in_order() {
        let source = GotQuestionsSource::new(Tier::Medium);
        let mut item = api_question(4);
        item.text = Some("q".to_string());
        item.answer_pic = Some("/images/a.jpg".to_string());
        item.comment_pic = Some("https://cdn.example.org/c.jpg".to_string());
        let question = source.map_item(item);
        assert_eq!(
            question.answer_preview,
            vec![
                format!("{}/images/a.jpg", GOTQUESTIONS_ORIGIN),
                "https://cdn.example.org/c.jpg".to_string(),
            ]
        );
    }
}
