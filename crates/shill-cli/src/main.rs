//! `shill-hunter` CLI entrypoint.
//!
//! ```text
//! shill-hunter config.yaml sentiment_analysis,grammar_analysis
//! shill-hunter config.yaml geo_analysis --tweets-file timeline.json --json
//! shill-hunter --list-processors
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

mod logging;
mod run;

use std::path::PathBuf;

use clap::Parser;

/// Hunt for shill, bot and sock puppet accounts by analyzing a target's
/// tweet history.
#[derive(Parser, Debug)]
#[command(name = "shill-hunter")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// YAML configuration file.
    #[arg(required_unless_present = "list_processors")]
    pub yaml: Option<PathBuf>,

    /// Comma-separated processors to run, e.g. `sentiment_analysis,geo_analysis`.
    #[arg(required_unless_present = "list_processors")]
    pub plugins: Option<String>,

    /// Print the processor reports as JSON instead of line-by-line output.
    #[arg(long, default_value_t = false)]
    pub json: bool,

    /// Override `max_tweets` from the configuration.
    #[arg(long, value_name = "N")]
    pub max_tweets: Option<usize>,

    /// Override `target` from the configuration.
    #[arg(long, value_name = "NAME")]
    pub target: Option<String>,

    /// Analyze a saved timeline (JSON array of statuses) instead of calling the API.
    #[arg(long, value_name = "PATH")]
    pub tweets_file: Option<PathBuf>,

    /// Check the credentials before fetching.
    #[arg(long, default_value_t = false)]
    pub verify: bool,

    /// Log level used when `RUST_LOG` is unset.
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Emit logs as JSON.
    #[arg(long, default_value_t = false)]
    pub json_logs: bool,

    /// List the available processors and exit.
    #[arg(long, default_value_t = false)]
    pub list_processors: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_logging(&cli.log_level, cli.json_logs)?;

    let all_ok = run::run(&cli).await?;
    if !all_ok {
        std::process::exit(1);
    }
    Ok(())
}
