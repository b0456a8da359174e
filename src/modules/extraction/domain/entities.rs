use serde::{Deserialize, Serialize};

use crate::modules::query::domain::text_normalizer::truncate_chars;

/// Candidates below this confidence are never shown
pub const MIN_CONFIDENCE: f64 = 0.5;

const MAX_DESCRIPTION_CHARS: usize = 2000;
const MAX_RAW_TEXT_CHARS: usize = 4000;

/// A product the video is believed to discuss
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCandidate {
    pub product_name: String,
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rationale: Option<String>,
}

impl ProductCandidate {
    pub fn new(product_name: impl Into<String>, confidence: f64) -> Self {
        Self {
            product_name: product_name.into(),
            confidence: confidence.clamp(0.0, 1.0),
            rationale: None,
        }
    }

    pub fn with_rationale(mut self, rationale: impl Into<String>) -> Self {
        self.rationale = Some(rationale.into());
        self
    }

    pub fn is_acceptable(&self) -> bool {
        !self.product_name.trim().is_empty() && self.confidence >= MIN_CONFIDENCE
    }
}

/// Text scraped from a video page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoContext {
    pub video_title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub channel_name: String,
    #[serde(default)]
    pub document_title: String,
    #[serde(default)]
    pub raw_text_blob: String,
}

impl VideoContext {
    pub fn new(video_title: impl Into<String>) -> Self {
        Self {
            video_title: video_title.into(),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_channel(mut self, channel_name: impl Into<String>) -> Self {
        self.channel_name = channel_name.into();
        self
    }

    /// Copy with long free-text fields clipped for an upstream request
    pub fn clipped(&self) -> Self {
        Self {
            video_title: self.video_title.trim().to_string(),
            description: truncate_chars(self.description.trim(), MAX_DESCRIPTION_CHARS).to_string(),
            channel_name: self.channel_name.trim().to_string(),
            document_title: self.document_title.trim().to_string(),
            raw_text_blob: truncate_chars(self.raw_text_blob.trim(), MAX_RAW_TEXT_CHARS).to_string(),
        }
    }

    /// True when there is no title or page text to analyse
    pub fn is_blank(&self) -> bool {
        self.best_title().trim().is_empty() && self.raw_text_blob.trim().is_empty()
    }

    /// Title to use when nothing smarter is available
    pub fn best_title(&self) -> &str {
        if !self.video_title.trim().is_empty() {
            &self.video_title
        } else {
            &self.document_title
        }
    }
}
