//! Twitter/X REST client for Shill Hunter.
//!
//! Fetches a target account's historical posts so they can be handed to the
//! text processors.
//!
//! ## Endpoints
//!
//! - `GET /1.1/statuses/user_timeline.json` - the account's timeline, paged
//!   backwards with `max_id`
//! - `GET /1.1/account/verify_credentials.json` - credential check
//!
//! All requests are signed with OAuth 1.0a user-context credentials.

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

mod client;
mod config;
mod error;
mod oauth;
mod timeline;
mod types;

pub use client::{TimelineRequest, TwitterApiClient, MAX_TIMELINE_PAGE};
pub use config::{RateLimitInfo, RetryConfig, TwitterConfig};
pub use error::{TwitterError, TwitterResult};
pub use oauth::OAuthSigner;
pub use timeline::{fetch_history, MAX_HISTORY_PAGES};
pub use types::{Coordinates, Place, Status, TwitterUser};
