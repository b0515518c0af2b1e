//! Client settings: credentials, endpoint, timeouts and the retry policy.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use rand::Rng;
use reqwest::header::HeaderMap;
use serde::{Deserialize, Serialize};

const DEFAULT_API_URL: &str = "https://api.twitter.com";

/// OAuth 1.0a user-context credentials plus connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TwitterConfig {
    /// Application key
    pub consumer_key: String,

    /// Application secret
    pub consumer_secret: String,

    /// User access token
    pub access_token: String,

    /// User access token secret
    pub access_token_secret: String,

    /// API root, overridable for tests and proxies
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Per-request timeout, in whole seconds on the wire
    #[serde(default = "default_timeout", with = "duration_secs")]
    pub timeout: Duration,

    #[serde(default)]
    pub retry: RetryConfig,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

const fn default_timeout() -> Duration {
    Duration::from_secs(30)
}

impl Default for TwitterConfig {
    fn default() -> Self {
        Self {
            consumer_key: String::new(),
            consumer_secret: String::new(),
            access_token: String::new(),
            access_token_secret: String::new(),
            api_url: default_api_url(),
            timeout: default_timeout(),
            retry: RetryConfig::default(),
        }
    }
}

impl TwitterConfig {
    /// Name of the first empty credential, if any.
    #[must_use]
    pub fn missing_credential(&self) -> Option<&'static str> {
        [
            ("consumer_key", &self.consumer_key),
            ("consumer_secret", &self.consumer_secret),
            ("access_token", &self.access_token),
            ("access_token_secret", &self.access_token_secret),
        ]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
    }
}

mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Retry policy
// ─────────────────────────────────────────────────────────────────────────────

/// Exponential backoff with jitter.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Attempts per request, the first one included
    pub max_attempts: u32,

    /// Delay before the first retry
    pub initial_delay_ms: u64,

    /// Ceiling for the doubled delay
    pub max_delay_ms: u64,

    /// Random spread applied to each delay, as a fraction (0.0-1.0)
    pub jitter: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay_ms: 1_000,
            max_delay_ms: 60_000,
            jitter: 0.1,
        }
    }
}

impl RetryConfig {
    /// Attempts to make, never fewer than one.
    #[must_use]
    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// Delay before retry number `retry` (1-based), before jitter.
    #[must_use]
    pub fn backoff(&self, retry: u32) -> Duration {
        let doublings = retry.saturating_sub(1).min(32);
        let ms = self
            .initial_delay_ms
            .saturating_mul(1_u64 << doublings)
            .min(self.max_delay_ms);
        Duration::from_millis(ms)
    }

    /// Spread `delay` by up to ± `jitter`.
    #[must_use]
    pub fn jittered(&self, delay: Duration) -> Duration {
        let jitter = self.jitter.clamp(0.0, 1.0);
        if jitter <= 0.0 {
            return delay;
        }
        delay.mul_f64(rand::thread_rng().gen_range(1.0 - jitter..=1.0 + jitter))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Rate limits
// ─────────────────────────────────────────────────────────────────────────────

/// `x-rate-limit-*` response headers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RateLimitInfo {
    /// Requests allowed per window
    pub limit: Option<u32>,

    /// Requests left in the window
    pub remaining: Option<u32>,

    /// Window end, unix seconds
    pub reset_at: Option<u64>,
}

impl RateLimitInfo {
    #[must_use]
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let parse = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok())
        };

        Self {
            limit: parse("x-rate-limit-limit").and_then(|v| u32::try_from(v).ok()),
            remaining: parse("x-rate-limit-remaining").and_then(|v| u32::try_from(v).ok()),
            reset_at: parse("x-rate-limit-reset"),
        }
    }

    /// No requests left in the window.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.remaining == Some(0)
    }

    /// Time until the window resets, `None` if unknown or already past.
    #[must_use]
    pub fn time_until_reset(&self) -> Option<Duration> {
        let now = SystemTime::now().duration_since(UNIX_EPOCH).ok()?.as_secs();
        self.time_until_reset_from(now)
    }

    fn time_until_reset_from(&self, now: u64) -> Option<Duration> {
        self.reset_at
            .filter(|&reset| reset > now)
            .map(|reset| Duration::from_secs(reset - now))
    }
}
