//! Errors raised while talking to the Twitter API.

use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TwitterError {
    /// Transport failure: connect, timeout, TLS or body read
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body did not match the expected shape
    #[error("unexpected response body: {0}")]
    Json(#[from] serde_json::Error),

    #[error("could not sign request: {0}")]
    OAuth(String),

    /// Non-success status. `error_code` is the first entry of the
    /// `errors` array when the body carries one.
    #[error("API returned {status}: {message}")]
    Api {
        status: u16,
        message: String,
        error_code: Option<i32>,
        retry_after: Option<u64>,
    },

    /// 429 with a known reset time, in seconds from now
    #[error("rate limited for {retry_after}s")]
    RateLimited { retry_after: u64 },

    #[error("invalid client settings: {0}")]
    Config(String),
}

impl TwitterError {
    /// Transport errors, 429 and 5xx are worth another attempt.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Http(_) | Self::RateLimited { .. } => true,
            Self::Api { status, .. } => matches!(*status, 429 | 500..=599),
            Self::Json(_) | Self::OAuth(_) | Self::Config(_) => false,
        }
    }

    /// Server-advised wait before retrying, if any.
    #[must_use]
    pub fn retry_after(&self) -> Option<Duration> {
        let secs = match self {
            Self::RateLimited { retry_after } => Some(*retry_after),
            Self::Api { retry_after, .. } => *retry_after,
            _ => None,
        };
        secs.map(Duration::from_secs)
    }

    /// The API rejected the credentials (401).
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Api { status: 401, .. })
    }
}

pub type TwitterResult<T> = Result<T, TwitterError>;
