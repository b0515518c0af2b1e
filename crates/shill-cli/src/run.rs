//! Load the configuration, gather tweets, run the processors.

use std::io::Write;

use anyhow::{bail, Context, Result};
use serde::Serialize;
use shill_core::{extract_tweets, load_statuses, HunterConfig, TargetConfig, TweetRecord};
use shill_processors::{
    parse_plugin_list, Pipeline, ProcessorContext, ProcessorOutcome, ProcessorRegistry,
};
use shill_twitter::{fetch_history, TwitterApiClient};
use tracing::{debug, info, warn};

use crate::Cli;

/// `--json` output.
#[derive(Debug, Serialize)]
struct RunReport<'a> {
    target: &'a str,
    tweets: usize,
    processors: &'a [ProcessorOutcome],
}

/// Run the CLI. Returns whether every processor succeeded.
pub async fn run(cli: &Cli) -> Result<bool> {
    let registry = ProcessorRegistry::builtin();

    if cli.list_processors {
        print_processors(&registry)?;
        return Ok(true);
    }

    let (Some(yaml), Some(plugins)) = (&cli.yaml, &cli.plugins) else {
        bail!("a YAML configuration file and a processor list are required");
    };

    let names = parse_plugin_list(plugins);
    let pipeline = Pipeline::load(&registry, &names).context("failed to load processors")?;
    debug!(processors = ?pipeline.names(), "Loaded processors");

    if !cli.json {
        println!("Processing input YAML");
    }
    let mut hunter = HunterConfig::load(yaml)
        .with_context(|| format!("failed to load configuration from {}", yaml.display()))?;
    apply_overrides(cli, &mut hunter.config);
    hunter.validate().context("invalid configuration")?;
    log_config(&hunter);

    let config = &hunter.config;
    if !cli.json {
        println!("Processing target {}", config.target);
    }

    let tweets = gather_tweets(cli, config).await?;
    info!(account = %config.target, tweets = tweets.len(), "Collected tweets");

    let ctx = ProcessorContext::from_config(config);
    let outcomes = if cli.json {
        pipeline.run(&tweets, &ctx, &mut std::io::sink())
    } else {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        let outcomes = pipeline.run(&tweets, &ctx, &mut out);
        out.flush()?;
        outcomes
    };

    if cli.json {
        let report = RunReport {
            target: &config.target,
            tweets: tweets.len(),
            processors: &outcomes,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    let failed: Vec<&str> = outcomes
        .iter()
        .filter(|o| !o.is_ok())
        .map(|o| o.name)
        .collect();
    if !failed.is_empty() {
        warn!(failed = ?failed, "Some processors failed");
        eprintln!("Processors failed: {}", failed.join(", "));
    }
    Ok(failed.is_empty())
}

fn apply_overrides(cli: &Cli, config: &mut TargetConfig) {
    if let Some(target) = &cli.target {
        config.target = target.trim().trim_start_matches('@').to_string();
    }
    if let Some(max_tweets) = cli.max_tweets {
        config.max_tweets = max_tweets;
    }
}

fn log_config(hunter: &HunterConfig) {
    debug!(config = ?hunter.config.redacted(), "Loaded configuration");
}

async fn gather_tweets(cli: &Cli, config: &TargetConfig) -> Result<Vec<TweetRecord>> {
    let statuses = if let Some(path) = &cli.tweets_file {
        if cli.verify {
            warn!("--verify has no effect with --tweets-file");
        }
        info!(path = %path.display(), "Reading saved timeline");
        let mut statuses = load_statuses(path)
            .with_context(|| format!("failed to read tweets from {}", path.display()))?;
        statuses.truncate(config.max_tweets);
        statuses
    } else {
        config
            .require_credentials()
            .context("credentials are required to fetch tweets")?;
        let client = TwitterApiClient::new(&config.twitter_config())
            .context("failed to create Twitter client")?;

        if cli.verify {
            let user = client
                .verify_credentials()
                .await
                .context("credential check failed")?;
            info!(screen_name = %user.screen_name, "Credentials verified");
        }

        fetch_history(&client, &config.target, config.max_tweets)
            .await
            .inspect_err(|e| {
                if e.is_unauthorized() {
                    warn!("Credentials were rejected; check the access token and consumer key");
                }
            })
            .with_context(|| format!("failed to fetch tweets for @{}", config.target))?
    };

    Ok(extract_tweets(&statuses))
}

fn print_processors(registry: &ProcessorRegistry) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "Processors in {}:", registry.group())?;
    for name in registry.names() {
        let processor = registry.load(name)?;
        let params: Vec<&str> = processor.params().iter().map(|p| p.key()).collect();
        let params = if params.is_empty() {
            "-".to_string()
        } else {
            params.join(", ")
        };
        writeln!(
            out,
            "  {name:<20} {} [{params}]",
            processor.description()
        )?;
    }
    Ok(())
}
