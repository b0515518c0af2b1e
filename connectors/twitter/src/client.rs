//! Twitter REST API client.

use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use crate::{
    config::{RateLimitInfo, RetryConfig, TwitterConfig},
    error::{TwitterError, TwitterResult},
    oauth::{percent_encode, OAuthSigner},
    types::{Status, TwitterUser},
};

/// Largest page the timeline endpoint will serve.
pub const MAX_TIMELINE_PAGE: u32 = 200;

/// Parameters for one timeline page.
#[derive(Debug, Clone)]
pub struct TimelineRequest {
    /// Handle of the account to read (without @)
    pub screen_name: String,

    /// Page size, capped at [`MAX_TIMELINE_PAGE`]
    pub count: u32,

    /// Only return statuses with an ID at or below this one
    pub max_id: Option<u64>,
}

impl TimelineRequest {
    /// First page of an account's timeline at the maximum page size.
    #[must_use]
    pub fn new(screen_name: impl Into<String>) -> Self {
        Self {
            screen_name: screen_name.into(),
            count: MAX_TIMELINE_PAGE,
            max_id: None,
        }
    }

    fn to_params(&self) -> Vec<(String, String)> {
        let mut params = vec![
            ("screen_name".to_string(), self.screen_name.clone()),
            ("exclude_replies".to_string(), "true".to_string()),
            ("include_rts".to_string(), "false".to_string()),
            (
                "count".to_string(),
                self.count.clamp(1, MAX_TIMELINE_PAGE).to_string(),
            ),
            ("tweet_mode".to_string(), "extended".to_string()),
        ];
        if let Some(max_id) = self.max_id {
            params.push(("max_id".to_string(), max_id.to_string()));
        }
        params
    }
}

/// Twitter REST API client.
#[derive(Debug)]
pub struct TwitterApiClient {
    client: Client,
    base_url: String,
    oauth_signer: OAuthSigner,
    retry: RetryConfig,
}

impl TwitterApiClient {
    /// Create a new API client from configuration.
    pub fn new(config: &TwitterConfig) -> TwitterResult<Self> {
        if let Some(field) = config.missing_credential() {
            return Err(TwitterError::Config(format!("`{field}` is required")));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(format!("shill-hunter/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            oauth_signer: OAuthSigner::new(config),
            retry: config.retry.clone(),
        })
    }

    /// Make an authenticated GET request with query parameters.
    #[instrument(skip(self, params))]
    pub async fn get_with_params<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(String, String)],
    ) -> TwitterResult<T> {
        let url = format!("{}{}", self.base_url, endpoint);
        let full_url = if params.is_empty() {
            url.clone()
        } else {
            let query = params
                .iter()
                .map(|(k, v)| format!("{}={}", percent_encode(k), percent_encode(v)))
                .collect::<Vec<_>>()
                .join("&");
            format!("{url}?{query}")
        };

        let mut attempts = 0;

        loop {
            attempts += 1;
            debug!(attempt = attempts, endpoint, "Making Twitter API request");

            // The signature covers the base URL plus every query parameter.
            let auth_header = self.oauth_signer.sign("GET", &url, params)?;

            let result = self
                .client
                .get(&full_url)
                .header("Authorization", &auth_header)
                .send()
                .await;

            let err = match result {
                Ok(response) => match self.handle_response(response).await {
                    Ok(data) => return Ok(data),
                    Err(e) => e,
                },
                Err(e) if e.is_timeout() || e.is_connect() => TwitterError::Http(e),
                Err(e) => return Err(TwitterError::Http(e)),
            };

            if !err.is_retryable() || attempts >= self.retry.attempts() {
                return Err(err);
            }

            let delay = err.retry_after().map_or_else(
                || self.retry.jittered(self.retry.backoff(attempts)),
                |wait| wait.min(Duration::from_millis(self.retry.max_delay_ms)),
            );
            warn!(
                attempt = attempts,
                delay_ms = delay.as_millis(),
                error = %err,
                "Retrying Twitter API request"
            );
            tokio::time::sleep(delay).await;
        }
    }

    async fn handle_response<T: DeserializeOwned>(&self, response: Response) -> TwitterResult<T> {
        let status = response.status();

        let rate_limit = RateLimitInfo::from_headers(response.headers());
        if rate_limit.is_exhausted() {
            debug!(reset_at = ?rate_limit.reset_at, "Rate limit exhausted");
        }

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = rate_limit
                .time_until_reset()
                .map_or(60, |d| d.as_secs());

            return Err(TwitterError::RateLimited { retry_after });
        }

        let bytes = response.bytes().await?;

        if status.is_success() {
            return serde_json::from_slice(&bytes).map_err(TwitterError::from);
        }

        // v1.1 reports `errors: [{code, message}]`, v2 reports `title`/`detail`.
        #[derive(serde::Deserialize)]
        struct ErrorEntry {
            #[serde(default)]
            code: Option<i32>,
            #[serde(default)]
            message: Option<String>,
        }

        #[derive(serde::Deserialize)]
        struct TwitterErrorResponse {
            #[serde(default)]
            errors: Vec<ErrorEntry>,
            #[serde(default)]
            title: Option<String>,
            #[serde(default)]
            detail: Option<String>,
        }

        let (message, error_code) = match serde_json::from_slice::<TwitterErrorResponse>(&bytes) {
            Ok(body) => {
                let first = body.errors.into_iter().next();
                let code = first.as_ref().and_then(|e| e.code);
                let message = first
                    .and_then(|e| e.message)
                    .or(body.detail)
                    .or(body.title)
                    .unwrap_or_else(|| "Unknown error".into());
                (message, code)
            }
            Err(_) => (String::from_utf8_lossy(&bytes).into_owned(), None),
        };

        Err(TwitterError::Api {
            status: status.as_u16(),
            message,
            error_code,
            retry_after: rate_limit.time_until_reset().map(|d| d.as_secs()),
        })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Account endpoints
    // ─────────────────────────────────────────────────────────────────────────

    /// Check the configured credentials and return the authenticated user.
    pub async fn verify_credentials(&self) -> TwitterResult<TwitterUser> {
        let params = vec![
            ("skip_status".to_string(), "true".to_string()),
            ("include_entities".to_string(), "false".to_string()),
        ];
        self.get_with_params("/1.1/account/verify_credentials.json", &params)
            .await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Timeline endpoints
    // ─────────────────────────────────────────────────────────────────────────

    /// Get one page of an account's timeline, replies and retweets excluded.
    pub async fn user_timeline(&self, request: &TimelineRequest) -> TwitterResult<Vec<Status>> {
        self.get_with_params("/1.1/statuses/user_timeline.json", &request.to_params())
            .await
    }
}
