//! Log output for the CLI.
//!
//! Everything goes to stderr; stdout is reserved for processor output and
//! `--json` reports.

use anyhow::{Context, Result};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the global subscriber.
///
/// A valid `RUST_LOG` takes precedence over `level`.
pub fn init_logging(level: &str, json: bool) -> Result<()> {
    let filter = build_filter(std::env::var("RUST_LOG").ok().as_deref(), level)?;

    let layer = fmt::layer().with_writer(std::io::stderr).with_target(true);
    let layer = if json {
        layer.json().flatten_event(true).with_current_span(true).boxed()
    } else {
        layer.compact().with_ansi(false).boxed()
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()
        .context("failed to initialize logging")
}

fn build_filter(env: Option<&str>, level: &str) -> Result<EnvFilter> {
    if let Some(directives) = env.filter(|d| !d.trim().is_empty()) {
        match EnvFilter::try_new(directives) {
            Ok(filter) => return Ok(filter),
            Err(e) => eprintln!("ignoring invalid RUST_LOG ({e}); using --log-level {level}"),
        }
    }
    EnvFilter::try_new(level).with_context(|| format!("invalid log level `{level}`"))
}
