//! Shill Hunter core types.
//!
//! - [`HunterConfig`]: the YAML run configuration (credentials, target,
//!   search terms, dialect)
//! - [`TweetRecord`]: the flattened per-tweet view every processor consumes

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod tweet;

pub use config::{HunterConfig, TargetConfig, DEFAULT_MAX_TWEETS};
pub use error::{ConfigError, ConfigResult};
pub use tweet::{extract_tweets, load_statuses, TweetRecord, CREATED_AT_FORMAT};
