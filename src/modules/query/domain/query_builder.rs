use lazy_static::lazy_static;
use regex::Regex;

use super::text_normalizer::{normalize_whitespace, truncate_chars, TitleNormalizer};
use super::vocabulary::{find_brand_token, QUALIFIER_WORDS, TECH_TERMS};

lazy_static! {
    static ref SIZE_CAPACITY: Regex = Regex::new(
        r"(?i)\b\d+(?:\.\d+)?\s*(?:gb|tb|mb|mah|w|inch(?:es)?|in|mm|cm|oz|ml|l|qt|ft)\b"
    )
    .unwrap();
}

/// Longest query handed to a search endpoint
pub const MAX_QUERY_LENGTH: usize = 120;
/// Most variants tried for a single product
pub const MAX_VARIANTS: usize = 5;
/// Cut at a space only if it is this close to the limit
const WORD_BOUNDARY_WINDOW: usize = 40;
/// Subtitles longer than this are assumed to carry product detail
const INFORMATIVE_SUBTITLE_LENGTH: usize = 10;

/// Ordered search strings derived from one product title, best first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryVariantSet {
    variants: Vec<String>,
}

impl QueryVariantSet {
    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.variants.iter()
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.variants
    }

    fn push_unique(&mut self, variant: String) {
        if self.variants.len() < MAX_VARIANTS && !self.variants.contains(&variant) {
            self.variants.push(variant);
        }
    }
}

impl<'a> IntoIterator for &'a QueryVariantSet {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.variants.iter()
    }
}

/// Turns noisy marketplace titles into review-oriented search queries
pub struct ProductQueryBuilder {
    normalizer: TitleNormalizer,
}

impl ProductQueryBuilder {
    pub fn new() -> Self {
        Self {
            normalizer: TitleNormalizer::default_pipeline(),
        }
    }

    pub fn with_normalizer(normalizer: TitleNormalizer) -> Self {
        Self { normalizer }
    }

    /// Normalized query for a title, with the subtitle appended when it
    /// carries model or spec information. Never longer than
    /// [`MAX_QUERY_LENGTH`] characters.
    pub fn build_query(&self, title: &str, subtitle: Option<&str>) -> String {
        let mut query = self.normalizer.normalize(title);

        if let Some(raw_subtitle) = subtitle.map(str::trim).filter(|s| !s.is_empty()) {
            let normalized = self.normalizer.normalize(raw_subtitle);
            if !normalized.is_empty()
                && !contains_phrase(&query, &normalized)
                && subtitle_adds_value(raw_subtitle, &normalized)
            {
                query.push(' ');
                query.push_str(&normalized);
            }
        }

        truncate_query(&normalize_whitespace(&query))
    }

    /// Query variants in the order they should be tried.
    pub fn build_variants(&self, title: &str, subtitle: Option<&str>) -> QueryVariantSet {
        let mut set = QueryVariantSet::default();
        if self.normalizer.normalize(title).is_empty() {
            return set;
        }

        let base = self.build_query(title, subtitle);
        set.push_unique(format!("{} review", base));
        set.push_unique(format!("{} unboxing", base));
        if let Some(brand_model) = brand_model_query(&base) {
            set.push_unique(brand_model);
        }
        set.push_unique(format!("{} hands on", base));
        if let Some(comparison) = comparison_query(&base) {
            set.push_unique(comparison);
        }

        set
    }
}

impl Default for ProductQueryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Letters and digits mixed in one token, e.g. "s24", "wh-1000xm5".
pub fn is_model_number(token: &str) -> bool {
    token.chars().count() >= 2
        && token.chars().any(|c| c.is_ascii_digit())
        && token.chars().any(|c| c.is_alphabetic())
}

fn subtitle_adds_value(raw: &str, normalized: &str) -> bool {
    normalized.split_whitespace().any(is_model_number)
        || SIZE_CAPACITY.is_match(raw)
        || TECH_TERMS.iter().any(|term| contains_phrase(normalized, term))
        || normalized.chars().count() > INFORMATIVE_SUBTITLE_LENGTH
}

fn contains_phrase(text: &str, phrase: &str) -> bool {
    format!(" {} ", text).contains(&format!(" {} ", phrase))
}

fn truncate_query(query: &str) -> String {
    if query.chars().count() <= MAX_QUERY_LENGTH {
        return query.to_string();
    }

    let cut = truncate_chars(query, MAX_QUERY_LENGTH);
    let boundary = cut
        .rfind(' ')
        .filter(|&idx| cut[..idx].chars().count() >= MAX_QUERY_LENGTH - WORD_BOUNDARY_WINDOW);

    match boundary {
        Some(idx) => cut[..idx].trim_end().to_string(),
        None => cut.trim_end().to_string(),
    }
}

fn brand_model_query(base: &str) -> Option<String> {
    let tokens: Vec<&str> = base.split_whitespace().collect();
    let brand = find_brand_token(&tokens)?;
    let model = tokens
        .iter()
        .find(|token| **token != brand && is_model_number(token))?;
    Some(format!("{} {} review", brand, model))
}

fn comparison_query(base: &str) -> Option<String> {
    let tokens: Vec<&str> = base.split_whitespace().collect();
    if !tokens.iter().any(|t| QUALIFIER_WORDS.contains(t)) {
        return None;
    }

    let without: Vec<&str> = tokens
        .iter()
        .copied()
        .filter(|t| !QUALIFIER_WORDS.contains(t))
        .collect();
    if without.is_empty() {
        return None;
    }

    Some(format!("{} vs {}", base, without.join(" ")))
}
