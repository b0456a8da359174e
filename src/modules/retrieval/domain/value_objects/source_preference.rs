use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::shared::errors::AppError;

/// Where video searches should go first
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum SourcePreference {
    /// Hosted proxy first, the user's own API key as fallback
    #[default]
    #[serde(rename = "proxy")]
    RemoteProxyPreferred,
    /// The user's own API key first, hosted proxy as fallback
    #[serde(rename = "credentials")]
    UserCredentialPreferred,
    /// Never contact the hosted proxy
    #[serde(rename = "credentials-only")]
    CredentialsOnly,
}

/// A concrete backend for one search attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataSource {
    RemoteProxy,
    DirectProvider,
}

impl SourcePreference {
    /// Whether the hosted proxy may be contacted at all, for searches or for
    /// the AI title rewrite.
    pub fn allows_proxy(&self) -> bool {
        *self != SourcePreference::CredentialsOnly
    }

    /// Sources to try, in order, given what is actually available.
    pub fn source_order(&self, proxy_available: bool, has_credentials: bool) -> Vec<DataSource> {
        let proxy = proxy_available && self.allows_proxy();
        let mut order = Vec::with_capacity(2);

        match self {
            SourcePreference::RemoteProxyPreferred => {
                if proxy {
                    order.push(DataSource::RemoteProxy);
                }
                if has_credentials {
                    order.push(DataSource::DirectProvider);
                }
            }
            SourcePreference::UserCredentialPreferred | SourcePreference::CredentialsOnly => {
                if has_credentials {
                    order.push(DataSource::DirectProvider);
                }
                if proxy {
                    order.push(DataSource::RemoteProxy);
                }
            }
        }

        order
    }
}

impl fmt::Display for SourcePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SourcePreference::RemoteProxyPreferred => "proxy",
            SourcePreference::UserCredentialPreferred => "credentials",
            SourcePreference::CredentialsOnly => "credentials-only",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for SourcePreference {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "proxy" | "remote" => Ok(SourcePreference::RemoteProxyPreferred),
            "credentials" | "api-key" => Ok(SourcePreference::UserCredentialPreferred),
            "credentials-only" => Ok(SourcePreference::CredentialsOnly),
            other => Err(AppError::ConfigurationError(format!(
                "Unknown search source '{}'. Use one of: proxy, credentials, credentials-only",
                other
            ))),
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::RemoteProxy => write!(f, "remote proxy"),
            DataSource::DirectProvider => write!(f, "YouTube API"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn proxy_preferred_order() {
        assert_eq!(
            SourcePreference::RemoteProxyPreferred.source_order(true, true),
            vec![DataSource::RemoteProxy, DataSource::DirectProvider]
        );
        assert_eq!(
            SourcePreference::RemoteProxyPreferred.source_order(false, true),
            vec![DataSource::DirectProvider]
        );
    }

    #[test]
    fn credentials_preferred_order() {
        assert_eq!(
            SourcePreference::UserCredentialPreferred.source_order(true, true),
            vec![DataSource::DirectProvider, DataSource::RemoteProxy]
        );
    }

    #[test]
    fn credentials_only_never_uses_proxy() {
        assert!(!SourcePreference::CredentialsOnly.allows_proxy());
        assert!(SourcePreference::UserCredentialPreferred.allows_proxy());
        assert!(SourcePreference::CredentialsOnly
            .source_order(true, false)
            .is_empty());
    }

    #[test]
    fn parses_from_config_strings() {
        assert_eq!(
            "Credentials".parse::<SourcePreference>().unwrap(),
            SourcePreference::UserCredentialPreferred
        );
        assert!("carrier-pigeon".parse::<SourcePreference>().is_err());
    }
}
