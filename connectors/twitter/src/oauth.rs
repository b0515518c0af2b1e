//! OAuth 1.0a request signing (RFC 5849, HMAC-SHA1).
//!
//! Timeline reads are made in user context, so every request carries an
//! `Authorization: OAuth ...` header whose signature covers the method, the
//! base URL and every query parameter.

use std::time::{SystemTime, UNIX_EPOCH};

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use hmac::{Hmac, Mac};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use rand::RngCore;
use sha1::Sha1;

use crate::config::TwitterConfig;
use crate::error::{TwitterError, TwitterResult};

/// Everything except the RFC 3986 unreserved set `A-Z a-z 0-9 - . _ ~`.
const RFC3986_RESERVED: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

const SIGNATURE_METHOD: &str = "HMAC-SHA1";
const OAUTH_VERSION: &str = "1.0";

/// Signs requests with a fixed set of user-context credentials.
pub struct OAuthSigner {
    consumer_key: String,
    token: String,
    /// `consumer_secret&token_secret`, both encoded
    signing_key: String,
}

impl std::fmt::Debug for OAuthSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthSigner")
            .field("consumer_key", &self.consumer_key)
            .field("token", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl OAuthSigner {
    #[must_use]
    pub fn new(config: &TwitterConfig) -> Self {
        Self {
            consumer_key: config.consumer_key.clone(),
            token: config.access_token.clone(),
            signing_key: format!(
                "{}&{}",
                percent_encode(&config.consumer_secret),
                percent_encode(&config.access_token_secret)
            ),
        }
    }

    /// `Authorization` header value for a request.
    ///
    /// `url` must not carry a query string; query (or form) parameters go in
    /// `params`.
    pub fn sign(
        &self,
        method: &str,
        url: &str,
        params: &[(String, String)],
    ) -> TwitterResult<String> {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| TwitterError::OAuth(format!("system clock before unix epoch: {e}")))?
            .as_secs();

        self.sign_with(method, url, params, &generate_nonce(), &timestamp.to_string())
    }

    fn sign_with(
        &self,
        method: &str,
        url: &str,
        params: &[(String, String)],
        nonce: &str,
        timestamp: &str,
    ) -> TwitterResult<String> {
        let protocol = [
            ("oauth_consumer_key", self.consumer_key.as_str()),
            ("oauth_nonce", nonce),
            ("oauth_signature_method", SIGNATURE_METHOD),
            ("oauth_timestamp", timestamp),
            ("oauth_token", self.token.as_str()),
            ("oauth_version", OAUTH_VERSION),
        ];

        let request = params.iter().map(|(k, v)| (k.as_str(), v.as_str()));
        let base = signature_base(method, url, protocol.into_iter().chain(request));
        let signature = hmac_sha1(&self.signing_key, &base)?;

        let fields: Vec<String> = protocol
            .into_iter()
            .chain(std::iter::once(("oauth_signature", signature.as_str())))
            .map(|(k, v)| format!("{}=\"{}\"", percent_encode(k), percent_encode(v)))
            .collect();
        Ok(format!("OAuth {}", fields.join(", ")))
    }
}

/// `METHOD&url&params`, with the parameters encoded, sorted and joined.
fn signature_base<'a>(
    method: &str,
    url: &str,
    params: impl Iterator<Item = (&'a str, &'a str)>,
) -> String {
    let mut pairs: Vec<(String, String)> = params
        .map(|(k, v)| (percent_encode(k), percent_encode(v)))
        .collect();
    pairs.sort();

    let joined = pairs
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    format!(
        "{}&{}&{}",
        method.to_ascii_uppercase(),
        percent_encode(url),
        percent_encode(&joined)
    )
}

/// Percent-encode everything outside the RFC 3986 unreserved set.
pub(crate) fn percent_encode(s: &str) -> String {
    utf8_percent_encode(s, RFC3986_RESERVED).to_string()
}

/// 32 random hex characters.
fn generate_nonce() -> String {
    let mut bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

fn hmac_sha1(key: &str, data: &str) -> TwitterResult<String> {
    let mut mac = Hmac::<Sha1>::new_from_slice(key.as_bytes())
        .map_err(|e| TwitterError::OAuth(e.to_string()))?;
    mac.update(data.as_bytes());
    Ok(BASE64.encode(mac.finalize().into_bytes()))
}
