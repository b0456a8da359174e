//! Deterministic product-name guess from video text.
//!
//! Used when the inference backend is missing or failing. The output is a
//! display string, never empty.

use lazy_static::lazy_static;
use regex::Regex;

use crate::modules::query::domain::text_normalizer::{
    decode_entities, normalize_whitespace, truncate_chars,
};
use crate::modules::query::domain::vocabulary::{is_acronym, KNOWN_BRANDS};

use super::entities::VideoContext;

lazy_static! {
    static ref EMOJI: Regex = Regex::new(
        r"[\u{1F000}-\u{1FAFF}\u{2600}-\u{27BF}\u{2B00}-\u{2BFF}\u{FE00}-\u{FE0F}\u{200D}\u{20E3}]"
    )
    .unwrap();
    static ref DISALLOWED: Regex = Regex::new(r"[^\p{L}\p{N}\s.,'&+/()!?\-]").unwrap();
    static ref BOILERPLATE: Vec<Regex> = [
        r"(?i)\b(?:19|20)\d{2}\s+(?:review|update)\b",
        r"(?i)\b(?:honest|in[\s-]depth|long[\s-]term)\b",
        r"(?i)\breviews?\b",
        r"(?i)\bunboxing\b",
        r"(?i)\bhands[\s-]?on\b",
        r"(?i)\b(?:vs|versus)\b\.?",
        r"(?i)\bafter\s+\d+\s+(?:days?|weeks?|months?|years?)\b",
        r"(?i)\b(?:\d+|one|two|three|six)\s+(?:months?|years?)\s+later\b",
        r"(?i)\b(?:is\s+it\s+|still\s+)?worth\s+it\b\??",
        r"(?i)\bfirst\s+(?:look|impressions?)\b",
        r"(?i)\bbefore\s+you\s+buy\b",
        r"(?i)\bdon'?t\s+buy\b",
        r"(?i)\bwatch\s+this\b",
        r"(?i)\bmust\s+watch\b",
        r"(?i)\bbuyer'?s?\s+guide\b",
        r"(?i)\b(?:tested|explained)\b",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).unwrap())
    .collect();
    static ref LEADING_PUNCT: Regex = Regex::new(r"^[\s.,;:!?\-/&+)]+").unwrap();
    static ref TRAILING_PUNCT: Regex = Regex::new(r"[\s.,;:!?\-/&+(]+$").unwrap();
}

/// Longest candidate returned, ellipsis included
pub const MAX_CANDIDATE_LENGTH: usize = 120;
/// Shorter candidates trigger the conservative title-only clean
const MIN_CANDIDATE_LENGTH: usize = 3;
/// Tokens kept after a detected brand
const TOKENS_AFTER_BRAND: usize = 5;
/// Returned when nothing usable is left
pub const PLACEHOLDER_PRODUCT: &str = "product";
const ELLIPSIS: &str = "...";
const MAX_DESCRIPTION_LINE_CHARS: usize = 200;

#[derive(Debug, Clone, Default)]
pub struct VideoTextFallbackExtractor;

impl VideoTextFallbackExtractor {
    pub fn new() -> Self {
        Self
    }

    pub fn extract_from_context(&self, context: &VideoContext) -> String {
        let description = Some(context.description.as_str()).filter(|d| !d.trim().is_empty());
        self.extract(context.best_title(), description)
    }

    /// Best-effort product name from a video title and optional description.
    pub fn extract(&self, title: &str, description: Option<&str>) -> String {
        let mut text = title.to_string();
        if let Some(line) = description.and_then(first_meaningful_line) {
            text.push(' ');
            text.push_str(truncate_chars(line, MAX_DESCRIPTION_LINE_CHARS));
        }

        let cleaned = recase_shouting(&remove_boilerplate(&strip_symbols(&decode_entities(
            &text,
        ))));

        let candidate = find_brand_phrase(&cleaned).unwrap_or(cleaned);
        let candidate = finish_candidate(&candidate);
        if candidate.chars().count() >= MIN_CANDIDATE_LENGTH {
            return candidate;
        }

        tracing::debug!(
            "Fallback extraction too short ('{}'), using conservative title clean",
            candidate
        );
        let conservative = finish_candidate(&strip_emoji(&decode_entities(title)));
        if conservative.is_empty() {
            PLACEHOLDER_PRODUCT.to_string()
        } else {
            conservative
        }
    }
}

fn first_meaningful_line(description: &str) -> Option<&str> {
    description.lines().map(str::trim).find(|line| !line.is_empty())
}

fn strip_emoji(text: &str) -> String {
    EMOJI.replace_all(text, " ").into_owned()
}

fn strip_symbols(text: &str) -> String {
    let without_emoji = strip_emoji(text);
    DISALLOWED.replace_all(&without_emoji, " ").into_owned()
}

fn remove_boilerplate(text: &str) -> String {
    let stripped = BOILERPLATE
        .iter()
        .fold(text.to_string(), |acc, pattern| {
            pattern.replace_all(&acc, " ").into_owned()
        });
    normalize_whitespace(&stripped)
}

/// "SONY HEADPHONES" -> "Sony Headphones", keeping known acronyms and
/// anything with digits (model numbers) as written.
fn recase_shouting(text: &str) -> String {
    text.split_whitespace()
        .map(|token| {
            if is_shouted_word(token) && !is_acronym(trim_edges(token)) {
                title_case(token)
            } else {
                token.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn is_shouted_word(token: &str) -> bool {
    token.chars().count() >= 3
        && !token.chars().any(|c| c.is_ascii_digit())
        && token.chars().any(|c| c.is_alphabetic())
        && token
            .chars()
            .filter(|c| c.is_alphabetic())
            .all(|c| c.is_uppercase())
}

fn title_case(token: &str) -> String {
    let mut result = String::with_capacity(token.len());
    let mut seen_letter = false;
    for c in token.chars() {
        if c.is_alphabetic() && !seen_letter {
            result.extend(c.to_uppercase());
            seen_letter = true;
        } else {
            result.extend(c.to_lowercase());
        }
    }
    result
}

fn trim_edges(token: &str) -> &str {
    token.trim_matches(|c: char| !c.is_alphanumeric())
}

/// Earliest known brand in the text plus a few following tokens.
fn find_brand_phrase(text: &str) -> Option<String> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    let mut best: Option<(usize, usize)> = None;

    for brand in KNOWN_BRANDS {
        let brand_words: Vec<&str> = brand.split_whitespace().collect();
        let width = brand_words.len();
        if width == 0 || width > tokens.len() {
            continue;
        }
        let position = (0..=tokens.len() - width).find(|&start| {
            brand_words
                .iter()
                .zip(&tokens[start..start + width])
                .all(|(word, token)| word.eq_ignore_ascii_case(trim_edges(token)))
        });
        if let Some(start) = position {
            if best.map_or(true, |(current, _)| start < current) {
                best = Some((start, width));
            }
        }
    }

    best.map(|(start, width)| {
        let end = (start + width + TOKENS_AFTER_BRAND).min(tokens.len());
        tokens[start..end].join(" ")
    })
}

fn finish_candidate(text: &str) -> String {
    let collapsed = normalize_whitespace(text);
    let trimmed = LEADING_PUNCT.replace(&collapsed, "");
    let trimmed = TRAILING_PUNCT.replace(&trimmed, "").into_owned();

    if trimmed.chars().count() <= MAX_CANDIDATE_LENGTH {
        return trimmed;
    }

    let keep = MAX_CANDIDATE_LENGTH - ELLIPSIS.len();
    format!("{}{}", truncate_chars(&trimmed, keep).trim_end(), ELLIPSIS)
}
