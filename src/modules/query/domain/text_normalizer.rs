use lazy_static::lazy_static;
use regex::Regex;

use super::vocabulary::{is_marketing_word, REMOVABLE_PARENTHETICALS};

lazy_static! {
    static ref SEPARATORS: Regex = Regex::new(r"[-|\u{2013}\u{2014}:\u{2022}\u{00B7}]").unwrap();
    static ref PARENTHETICAL: Regex = Regex::new(r"\(([^()]*)\)|\[([^\[\]]*)\]").unwrap();
    static ref PRESERVED_SPEC: Regex = Regex::new(
        r"(?i)\b\d+(?:\.\d+)?\s*(?:gb|tb|mb|inch(?:es)?|mm|cm|(?:st|nd|rd|th)(?:\s+gen(?:eration)?)?|gen(?:eration)?)\b"
    )
    .unwrap();
    static ref YEAR_2020S: Regex = Regex::new(r"^202\d$").unwrap();
    static ref DEFAULT_NORMALIZER: TitleNormalizer = TitleNormalizer::default_pipeline();
}

const PLACEHOLDER_PREFIX: &str = "__keep_";
const PLACEHOLDER_SUFFIX: &str = "__";

const HTML_ENTITIES: &[(&str, &str)] = &[
    ("&amp;", "&"),
    ("&quot;", "\""),
    ("&#39;", "'"),
    ("&#x27;", "'"),
    ("&apos;", "'"),
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&nbsp;", " "),
    ("&ndash;", "\u{2013}"),
    ("&mdash;", "\u{2014}"),
];

/// Transformation that can be applied to a title
///
/// Each transformation is composable and testable in isolation.
pub trait TitleTransformation: Send + Sync {
    fn transform(&self, title: &str) -> String;
    fn name(&self) -> &'static str;
}

/// Decodes the handful of HTML entities that show up in scraped titles
#[derive(Debug, Clone)]
pub struct DecodeEntitiesTransform;

impl TitleTransformation for DecodeEntitiesTransform {
    fn transform(&self, title: &str) -> String {
        decode_entities(title)
    }

    fn name(&self) -> &'static str {
        "DecodeEntities"
    }
}

/// Replaces separator characters with a space
#[derive(Debug, Clone)]
pub struct SeparatorTransform;

impl TitleTransformation for SeparatorTransform {
    fn transform(&self, title: &str) -> String {
        SEPARATORS.replace_all(title, " ").into_owned()
    }

    fn name(&self) -> &'static str {
        "Separators"
    }
}

/// Drops parenthetical phrases that never describe the product
#[derive(Debug, Clone)]
pub struct RemoveParentheticalsTransform {
    phrases: Vec<String>,
}

impl RemoveParentheticalsTransform {
    pub fn new(phrases: &[&str]) -> Self {
        Self {
            phrases: phrases.iter().map(|p| p.to_lowercase()).collect(),
        }
    }
}

impl TitleTransformation for RemoveParentheticalsTransform {
    fn transform(&self, title: &str) -> String {
        let mut result = title.to_string();
        for phrase in &self.phrases {
            result = remove_case_insensitive(&result, phrase);
        }
        result
    }

    fn name(&self) -> &'static str {
        "RemoveParentheticals"
    }
}

/// Unwraps parentheticals, swapping spec tokens such as "256GB" or "5th Gen"
/// for placeholder tokens that survive word filtering.
#[derive(Debug, Clone)]
pub struct ProtectSpecTokensTransform;

impl TitleTransformation for ProtectSpecTokensTransform {
    fn transform(&self, title: &str) -> String {
        PARENTHETICAL
            .replace_all(title, |caps: &regex::Captures| {
                let inner = caps
                    .get(1)
                    .or_else(|| caps.get(2))
                    .map(|m| m.as_str())
                    .unwrap_or_default();
                let protected = PRESERVED_SPEC.replace_all(inner, |spec: &regex::Captures| {
                    format!(" {} ", placeholder_for(&spec[0]))
                });
                format!(" {} ", protected)
            })
            .into_owned()
    }

    fn name(&self) -> &'static str {
        "ProtectSpecTokens"
    }
}

/// Lowercases, trims punctuation and drops marketing words, short tokens and
/// recent years. Placeholders pass through untouched.
#[derive(Debug, Clone)]
pub struct FilterTokensTransform {
    min_token_length: usize,
}

impl FilterTokensTransform {
    pub fn new(min_token_length: usize) -> Self {
        Self { min_token_length }
    }

    fn keep(&self, token: &str) -> bool {
        token.chars().count() >= self.min_token_length
            && !is_marketing_word(token)
            && !YEAR_2020S.is_match(token)
    }
}

impl TitleTransformation for FilterTokensTransform {
    fn transform(&self, title: &str) -> String {
        title
            .split_whitespace()
            .filter_map(|raw| {
                if is_placeholder(raw) {
                    return Some(raw.to_string());
                }
                let token = raw
                    .to_lowercase()
                    .trim_matches(|c: char| !c.is_alphanumeric())
                    .to_string();
                self.keep(&token).then_some(token)
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn name(&self) -> &'static str {
        "FilterTokens"
    }
}

/// Turns placeholder tokens back into the text they protected
#[derive(Debug, Clone)]
pub struct RestoreSpecTokensTransform;

impl TitleTransformation for RestoreSpecTokensTransform {
    fn transform(&self, title: &str) -> String {
        title
            .split_whitespace()
            .map(|token| restore_placeholder(token).unwrap_or_else(|| token.to_string()))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn name(&self) -> &'static str {
        "RestoreSpecTokens"
    }
}

/// Normalizes whitespace (collapses multiple spaces, trims)
#[derive(Debug, Clone)]
pub struct NormalizeWhitespaceTransform;

impl TitleTransformation for NormalizeWhitespaceTransform {
    fn transform(&self, title: &str) -> String {
        normalize_whitespace(title)
    }

    fn name(&self) -> &'static str {
        "NormalizeWhitespace"
    }
}

/// Title normalizer that applies a pipeline of transformations
///
/// Uses the builder pattern for composability and testability.
pub struct TitleNormalizer {
    transformations: Vec<Box<dyn TitleTransformation>>,
}

impl TitleNormalizer {
    /// Create a new empty normalizer
    pub fn new() -> Self {
        Self {
            transformations: Vec::new(),
        }
    }

    /// Entity decoding, separators, removable parentheticals, spec-token
    /// protection, token filtering, restoration, whitespace. Order matters.
    pub fn default_pipeline() -> Self {
        Self::new()
            .with_transform(DecodeEntitiesTransform)
            .with_transform(SeparatorTransform)
            .with_transform(RemoveParentheticalsTransform::new(REMOVABLE_PARENTHETICALS))
            .with_transform(ProtectSpecTokensTransform)
            .with_transform(FilterTokensTransform::new(2))
            .with_transform(RestoreSpecTokensTransform)
            .with_transform(NormalizeWhitespaceTransform)
    }

    pub fn with_transform<T: TitleTransformation + 'static>(mut self, transform: T) -> Self {
        self.transformations.push(Box::new(transform));
        self
    }

    pub fn normalize(&self, title: &str) -> String {
        self.transformations
            .iter()
            .fold(title.to_string(), |acc, t| t.transform(&acc))
    }

    /// Names of the configured steps, in order
    pub fn pipeline_names(&self) -> Vec<&'static str> {
        self.transformations.iter().map(|t| t.name()).collect()
    }
}

impl Default for TitleNormalizer {
    fn default() -> Self {
        Self::default_pipeline()
    }
}

/// Normalizes a product title with the default pipeline.
pub fn normalize(text: &str) -> String {
    DEFAULT_NORMALIZER.normalize(text)
}

pub fn decode_entities(text: &str) -> String {
    HTML_ENTITIES
        .iter()
        .fold(text.to_string(), |acc, (entity, replacement)| {
            acc.replace(entity, replacement)
        })
}

pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<&str>>().join(" ")
}

/// Truncates to at most `max_chars` characters without splitting a char.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

fn remove_case_insensitive(haystack: &str, needle_lower: &str) -> String {
    if needle_lower.is_empty() {
        return haystack.to_string();
    }
    let mut result = haystack.to_string();
    // ASCII phrases only, so byte offsets line up between the two strings
    while let Some(pos) = result.to_ascii_lowercase().find(needle_lower) {
        result.replace_range(pos..pos + needle_lower.len(), " ");
    }
    result
}

fn placeholder_for(spec: &str) -> String {
    let body = normalize_whitespace(&spec.to_lowercase()).replace(' ', "_");
    format!("{}{}{}", PLACEHOLDER_PREFIX, body, PLACEHOLDER_SUFFIX)
}

fn is_placeholder(token: &str) -> bool {
    token.len() > PLACEHOLDER_PREFIX.len() + PLACEHOLDER_SUFFIX.len()
        && token.starts_with(PLACEHOLDER_PREFIX)
        && token.ends_with(PLACEHOLDER_SUFFIX)
}

fn restore_placeholder(token: &str) -> Option<String> {
    if !is_placeholder(token) {
        return None;
    }
    let body = &token[PLACEHOLDER_PREFIX.len()..token.len() - PLACEHOLDER_SUFFIX.len()];
    Some(body.replace('_', " "))
}
