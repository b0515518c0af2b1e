//! YAML run configuration.
//!
//! Everything lives under a single top-level `config` mapping:
//!
//! ```yaml
//! config:
//!   access_token: "..."
//!   access_secret: "..."
//!   consumer_key: "..."
//!   consumer_secret: "..."
//!   target: some_account
//!   search_terms: [brexit, election]
//!   dialect: en-GB
//! ```
//!
//! Keys this crate does not know about are kept in [`TargetConfig::extra`].

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use shill_twitter::{RetryConfig, TwitterConfig};
use tracing::debug;

use crate::error::{ConfigError, ConfigResult};

/// Posts fetched when the config does not say otherwise (one full page).
pub const DEFAULT_MAX_TWEETS: usize = 200;

/// Root of the YAML document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HunterConfig {
    /// The `config` mapping
    pub config: TargetConfig,
}

/// Credentials, target and analysis settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetConfig {
    /// OAuth 1.0a access token
    #[serde(default)]
    pub access_token: String,

    /// OAuth 1.0a access token secret
    #[serde(default)]
    pub access_secret: String,

    /// OAuth 1.0a consumer key
    #[serde(default)]
    pub consumer_key: String,

    /// OAuth 1.0a consumer secret
    #[serde(default)]
    pub consumer_secret: String,

    /// Handle of the account to analyze
    pub target: String,

    /// Terms the sentiment processor looks for
    #[serde(default)]
    pub search_terms: Vec<String>,

    /// The dialect the account claims to write in, e.g. "en-GB"
    #[serde(default)]
    pub dialect: Option<String>,

    /// How many historical posts to fetch
    #[serde(default = "default_max_tweets")]
    pub max_tweets: usize,

    /// Directory of `<lang>/<dialect>.yaml` word lists replacing the built-in ones
    #[serde(default)]
    pub dialect_mappings_dir: Option<PathBuf>,

    /// Word list replacing the built-in spelling dictionary
    #[serde(default)]
    pub spelling_dictionary: Option<PathBuf>,

    /// API base URL
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Retry policy for API requests
    #[serde(default)]
    pub retry: RetryConfig,

    /// Free-form options not interpreted by Shill Hunter itself
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

const fn default_max_tweets() -> usize {
    DEFAULT_MAX_TWEETS
}

fn default_api_url() -> String {
    TwitterConfig::default().api_url
}

const fn default_timeout_secs() -> u64 {
    30
}

impl HunterConfig {
    /// Read and parse a YAML configuration file.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::from_io(path, e))?;
        debug!(path = %path.display(), bytes = content.len(), "Read configuration file");
        Self::from_yaml_str(&content)
    }

    /// Parse a YAML configuration document.
    pub fn from_yaml_str(content: &str) -> ConfigResult<Self> {
        let value: serde_yaml::Value = serde_yaml::from_str(content)?;
        if value.is_null() {
            return Err(ConfigError::Empty);
        }
        let mut config: Self = serde_yaml::from_value(value)?;
        config.config.normalize();
        Ok(config)
    }

    /// Check the fields every run needs.
    pub fn validate(&self) -> ConfigResult<()> {
        self.config.validate()
    }
}

impl TargetConfig {
    fn normalize(&mut self) {
        self.target = self.target.trim().trim_start_matches('@').to_string();
        if let Some(dialect) = &mut self.dialect {
            *dialect = dialect.trim().replace('_', "-");
        }
        self.search_terms.retain(|t| !t.is_empty());
    }

    /// Check the fields every run needs.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.target.is_empty() {
            return Err(ConfigError::MissingField("target"));
        }
        if let Some(dialect) = &self.dialect {
            if !is_dialect_tag(dialect) {
                return Err(ConfigError::InvalidField {
                    field: "dialect",
                    reason: format!("expected a tag like \"en\" or \"en-GB\", got {dialect:?}"),
                });
            }
        }
        if self.max_tweets == 0 {
            return Err(ConfigError::InvalidField {
                field: "max_tweets",
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }

    /// Check that all four OAuth credentials are present.
    pub fn require_credentials(&self) -> ConfigResult<()> {
        let fields = [
            ("access_token", &self.access_token),
            ("access_secret", &self.access_secret),
            ("consumer_key", &self.consumer_key),
            ("consumer_secret", &self.consumer_secret),
        ];
        for (name, value) in fields {
            if value.trim().is_empty() {
                return Err(ConfigError::MissingField(name));
            }
        }
        Ok(())
    }

    /// Copy that is safe to log.
    ///
    /// The four OAuth credentials are masked when set, and so are entries in
    /// the free-form options whose key names a credential.
    #[must_use]
    pub fn redacted(&self) -> Self {
        let mask = |value: &str| {
            if value.is_empty() {
                String::new()
            } else {
                REDACTED.to_string()
            }
        };

        Self {
            access_token: mask(&self.access_token),
            access_secret: mask(&self.access_secret),
            consumer_key: mask(&self.consumer_key),
            consumer_secret: mask(&self.consumer_secret),
            extra: self
                .extra
                .iter()
                .map(|(key, value)| (key.clone(), redact_option(key, value)))
                .collect(),
            ..self.clone()
        }
    }

    /// Build the API client configuration.
    #[must_use]
    pub fn twitter_config(&self) -> TwitterConfig {
        TwitterConfig {
            consumer_key: self.consumer_key.clone(),
            consumer_secret: self.consumer_secret.clone(),
            access_token: self.access_token.clone(),
            access_token_secret: self.access_secret.clone(),
            api_url: self.api_url.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
            retry: self.retry.clone(),
        }
    }
}

const REDACTED: &str = "[REDACTED]";

fn is_credential_key(key: &str) -> bool {
    let key = key.to_ascii_lowercase();
    ["token", "secret", "password", "api_key", "consumer_key"]
        .iter()
        .any(|marker| key.contains(marker))
}

fn redact_option(key: &str, value: &serde_yaml::Value) -> serde_yaml::Value {
    if is_credential_key(key) {
        return serde_yaml::Value::String(REDACTED.to_string());
    }
    match value {
        serde_yaml::Value::Mapping(map) => serde_yaml::Value::Mapping(
            map.iter()
                .map(|(k, v)| (k.clone(), redact_option(k.as_str().unwrap_or_default(), v)))
                .collect(),
        ),
        serde_yaml::Value::Sequence(items) => {
            serde_yaml::Value::Sequence(items.iter().map(|v| redact_option("", v)).collect())
        }
        other => other.clone(),
    }
}

/// `xx`, `xxx`, `xx-YY` or `xx-YYY`, letters or digits in the region.
fn is_dialect_tag(tag: &str) -> bool {
    let mut parts = tag.split('-');
    let language_ok = parts
        .next()
        .is_some_and(|l| (2..=3).contains(&l.len()) && l.chars().all(|c| c.is_ascii_alphabetic()));
    let region_ok = parts
        .next()
        .map_or(true, |r| (2..=3).contains(&r.len()) && r.chars().all(|c| c.is_ascii_alphanumeric()));
    language_ok && region_ok && parts.next().is_none()
}
