use serde::{Deserialize, Serialize};

use super::source_preference::SourcePreference;

/// Inbound product → video request, as scraped from a listing page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSearchRequest {
    pub title: Option<String>,
    #[serde(default)]
    pub subtitle: Option<String>,
}

impl ProductSearchRequest {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            subtitle: None,
        }
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    pub fn title(&self) -> &str {
        self.title.as_deref().map(str::trim).unwrap_or_default()
    }

    pub fn subtitle(&self) -> Option<&str> {
        self.subtitle
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// Per-call knobs. Passed explicitly so no call depends on state left
/// behind by another.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchSettings {
    pub source_preference: SourcePreference,
    pub api_key: Option<String>,
    pub prefer_ai: bool,
    pub bypass_cache: bool,
}

impl SearchSettings {
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_preference(mut self, preference: SourcePreference) -> Self {
        self.source_preference = preference;
        self
    }

    pub fn prefer_ai(mut self, prefer_ai: bool) -> Self {
        self.prefer_ai = prefer_ai;
        self
    }

    pub fn bypass_cache(mut self, bypass_cache: bool) -> Self {
        self.bypass_cache = bypass_cache;
        self
    }

    /// Trimmed, non-empty API key
    pub fn credentials(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}
