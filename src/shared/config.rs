use std::path::PathBuf;
use std::time::Duration;

use crate::modules::retrieval::domain::value_objects::{SearchSettings, SourcePreference};
use crate::shared::errors::{AppError, AppResult};

pub const ENV_PROXY_URL: &str = "REVIEW_RESOLVER_PROXY_URL";
pub const ENV_API_KEY: &str = "YOUTUBE_API_KEY";
pub const ENV_SOURCE: &str = "REVIEW_RESOLVER_SOURCE";
pub const ENV_CACHE_TTL_HOURS: &str = "REVIEW_RESOLVER_CACHE_TTL_HOURS";
pub const ENV_MAX_RESULTS: &str = "REVIEW_RESOLVER_MAX_RESULTS";
pub const ENV_CACHE_FILE: &str = "REVIEW_RESOLVER_CACHE_FILE";

const DEFAULT_CACHE_TTL_HOURS: u64 = 24;
const DEFAULT_MAX_RESULTS: usize = 10;
const MAX_RESULTS_LIMIT: usize = 50;

/// Process-level settings, read once at startup
#[derive(Debug, Clone, PartialEq)]
pub struct ResolverConfig {
    pub proxy_url: Option<String>,
    pub api_key: Option<String>,
    pub source_preference: SourcePreference,
    pub cache_ttl: Duration,
    pub max_results: usize,
    pub cache_file: Option<PathBuf>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            proxy_url: None,
            api_key: None,
            source_preference: SourcePreference::default(),
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_HOURS * 3600),
            max_results: DEFAULT_MAX_RESULTS,
            cache_file: None,
        }
    }
}

impl ResolverConfig {
    /// Loads `.env` if present, then reads the process environment.
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the config from any variable source. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let source_preference = match var(ENV_SOURCE) {
            Some(value) => value.parse()?,
            None => SourcePreference::default(),
        };

        let ttl_hours = match var(ENV_CACHE_TTL_HOURS) {
            Some(value) => parse_number::<u64>(ENV_CACHE_TTL_HOURS, &value)?,
            None => DEFAULT_CACHE_TTL_HOURS,
        };
        let ttl_secs = ttl_hours.checked_mul(3600).ok_or_else(|| {
            AppError::ConfigurationError(format!(
                "{} is too large, got {}",
                ENV_CACHE_TTL_HOURS, ttl_hours
            ))
        })?;

        let max_results = match var(ENV_MAX_RESULTS) {
            Some(value) => parse_number::<usize>(ENV_MAX_RESULTS, &value)?,
            None => DEFAULT_MAX_RESULTS,
        };
        if max_results == 0 || max_results > MAX_RESULTS_LIMIT {
            return Err(AppError::ConfigurationError(format!(
                "{} must be between 1 and {}, got {}",
                ENV_MAX_RESULTS, MAX_RESULTS_LIMIT, max_results
            )));
        }

        Ok(Self {
            proxy_url: var(ENV_PROXY_URL),
            api_key: var(ENV_API_KEY),
            source_preference,
            cache_ttl: Duration::from_secs(ttl_secs),
            max_results,
            cache_file: var(ENV_CACHE_FILE).map(PathBuf::from),
        })
    }

    /// Per-call settings seeded from this config
    pub fn search_settings(&self) -> SearchSettings {
        SearchSettings {
            source_preference: self.source_preference,
            api_key: self.api_key.clone(),
            prefer_ai: false,
            bypass_cache: false,
        }
    }

    pub fn has_proxy(&self) -> bool {
        self.proxy_url.is_some()
    }
}

fn parse_number<T: std::str::FromStr>(name: &str, value: &str) -> AppResult<T> {
    value.parse().map_err(|_| {
        AppError::ConfigurationError(format!(
            "{} must be a non-negative whole number, got '{}'",
            name, value
        ))
    })
}
