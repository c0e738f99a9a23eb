//! # Content Normalization Module
//!
//! This module provides the pure text-normalization pipeline shared by the
//! question source adapters: HTML tag stripping with entity decoding, image
//! reference extraction with URL resolution, and MarkdownV2 escaping for
//! Telegram delivery.
//!
//! All functions are side-effect free and degrade to best-effort output on
//! malformed input; none of them return errors.

use lazy_static::lazy_static;
use regex::Regex;
use url::Url;

/// Marker that loosely terminates a content section in the legacy archive
/// markup. Sections frequently run past their closing tag, so `clean` can be
/// told to discard everything from this marker on.
pub const SECTION_BOUNDARY: &str = "</p>";

/// Characters that MarkdownV2 requires to be backslash-escaped. The `*`
/// emphasis marker is intentionally absent so callers can compose bold or
/// italic markers around already-escaped text.
const MARKDOWN_V2_RESERVED: &[char] = &[
    '_', '[', ']', '(', ')', '~', '`', '>', '#', '+', '-', '=', '|', '{', '}', '.', '!',
];

lazy_static! {
    /// A self-contained image-carrying fragment.
    static ref IMG_TAG_RE: Regex = Regex::new(r"(?i)<img[^>]*>").unwrap();
    /// Any well-formed markup tag.
    static ref TAG_RE: Regex = Regex::new(r"<[^>]*>").unwrap();
    /// The fixed image-embedding pattern used by both sources.
    static ref IMG_SRC_RE: Regex =
        Regex::new(r#"(?i)<img[^>]+src\s*=\s*["']([^"']+)["'][^>]*>"#).unwrap();
    /// Literal newline/carriage-return runs inside a fragment.
    static ref NEWLINE_RE: Regex = Regex::new(r"[\r\n]+").unwrap();
    /// An inline link construct that must survive escaping byte-identical.
    static ref LINK_RE: Regex = Regex::new(r"\[[^\]\n]*\]\([^)\n]*\)").unwrap();
}

/// Options controlling how [`clean`] treats a raw fragment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanOptions {
    /// Delete self-contained image fragments before stripping tags
    pub remove_images: bool,
    /// Truncate the fragment at the first [`SECTION_BOUNDARY`] marker
    pub stop_at_boundary: bool,
}

/// Convert a raw source fragment into a clean display string.
///
/// Strips all markup tags, decodes a small fixed table of named/numeric
/// entities, collapses literal newline runs, and trims surrounding
/// whitespace. Angle brackets that survive tag stripping (malformed or
/// unterminated tags) are deleted outright; the output never contains a raw
/// `<` or `>`.
pub fn clean(fragment: &str, options: CleanOptions) -> String {
    let mut text = fragment.to_string();

    if options.stop_at_boundary {
        if let Some(pos) = text.find(SECTION_BOUNDARY) {
            text.truncate(pos);
        }
    }

    if options.remove_images {
        text = IMG_TAG_RE.replace_all(&text, "").into_owned();
    }

    let stripped = TAG_RE.replace_all(&text, "");
    let decoded = decode_entities(&stripped);
    let no_brackets: String = decoded.chars().filter(|c| *c != '<' && *c != '>').collect();
    let collapsed = NEWLINE_RE.replace_all(&no_brackets, " ");

    collapsed.trim().to_string()
}

/// Decode the fixed entity table used by the question sources.
///
/// `&amp;` is decoded last so that double-encoded sequences like
/// `&amp;lt;` come out as literal text, not as markup.
fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&#160;", " ")
        .replace("&ndash;", "\u{2013}")
        .replace("&#8211;", "\u{2013}")
        .replace("&quot;", "\"")
        .replace("&#34;", "\"")
        .replace("&lt;", "<")
        .replace("&#60;", "<")
        .replace("&gt;", ">")
        .replace("&#62;", ">")
        .replace("&amp;", "&")
        .replace("&#38;", "&")
}

/// Locate image references inside a fragment and return their absolute URLs.
///
/// Root-relative paths are resolved against `base_origin`; already-absolute
/// URLs pass through unchanged. Source order is preserved and duplicates are
/// kept.
pub fn extract_images(fragment: &str, base_origin: &str) -> Vec<String> {
    IMG_SRC_RE
        .captures_iter(fragment)
        .filter_map(|cap| resolve_url(&cap[1], base_origin))
        .collect()
}

/// Resolve a possibly-relative URL against a base origin.
///
/// Returns `None` when neither the source nor the origin yields a usable
/// absolute URL.
pub fn resolve_url(src: &str, base_origin: &str) -> Option<String> {
    if src.starts_with("http://") || src.starts_with("https://") {
        return Some(src.to_string());
    }
    let base = Url::parse(base_origin).ok()?;
    base.join(src).ok().map(|u| u.to_string())
}

/// Escape arbitrary display text for Telegram MarkdownV2.
///
/// Every character in the reserved set is backslash-prefixed. `[label](url)`
/// constructs are detected first and substituted with placeholders so that
/// punctuation inside the label or URL is not corrupted; they are restored
/// verbatim after the remainder has been escaped.
pub fn escape_markdown_v2(text: &str) -> String {
    let mut links: Vec<String> = Vec::new();
    let protected = LINK_RE.replace_all(text, |caps: &regex::Captures| {
        let idx = links.len();
        links.push(caps[0].to_string());
        format!("\u{0}L{}\u{0}", idx)
    });

    let mut escaped = String::with_capacity(protected.len() * 2);
    for ch in protected.chars() {
        if MARKDOWN_V2_RESERVED.contains(&ch) {
            escaped.push('\\');
        }
        escaped.push(ch);
    }

    let mut result = escaped;
    for (idx, link) in links.iter().enumerate() {
        result = result.replace(&format!("\u{0}L{}\u{0}", idx), link);
    }
    result
}
