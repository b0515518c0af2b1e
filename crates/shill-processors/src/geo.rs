//! Location and posting-client analysis.

use std::collections::BTreeMap;
use std::io::Write;

use serde::Serialize;
use shill_core::TweetRecord;
use tracing::info;

use crate::error::ProcessorResult;
use crate::processor::{Param, Processor, ProcessorArgs, ProcessorReport};
use crate::SEPARATOR;

const NONE: &str = "None";

/// How often a value was seen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tally {
    pub name: String,
    pub count: usize,
}

/// Outcome of the geo processor.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GeoReport {
    pub total: usize,
    /// Tweets with exact coordinates
    pub geotagged: usize,
    /// Tweets with a tagged place
    pub with_place: usize,
    pub places: Vec<Tally>,
    pub clients: Vec<Tally>,
}

/// Client name from a `source` anchor such as
/// `<a href="…" rel="nofollow">Twitter for iPhone</a>`.
///
/// Plain text is returned trimmed; empty sources yield `None`.
#[must_use]
pub fn client_name(source: &str) -> Option<String> {
    let inner = source
        .split_once('>')
        .and_then(|(_, rest)| rest.split_once("</a>"))
        .map_or(source, |(name, _)| name);
    let name = inner.trim();
    (!name.is_empty()).then(|| name.to_string())
}

fn tally(counts: BTreeMap<String, usize>) -> Vec<Tally> {
    let mut tallies: Vec<Tally> = counts
        .into_iter()
        .map(|(name, count)| Tally { name, count })
        .collect();
    // Stable sort keeps names alphabetical within equal counts.
    tallies.sort_by(|a, b| b.count.cmp(&a.count));
    tallies
}

/// `geo_analysis` processor.
#[derive(Debug, Default)]
pub struct GeoAnalysis;

impl GeoAnalysis {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Processor for GeoAnalysis {
    fn name(&self) -> &'static str {
        "geo_analysis"
    }

    fn description(&self) -> &'static str {
        "Timestamps, coordinates, places and posting clients"
    }

    fn params(&self) -> &'static [Param] {
        &[]
    }

    fn process(
        &self,
        tweets: &[TweetRecord],
        _args: &ProcessorArgs<'_>,
        out: &mut dyn Write,
    ) -> ProcessorResult<ProcessorReport> {
        let mut report = GeoReport {
            total: tweets.len(),
            ..Default::default()
        };
        let mut places = BTreeMap::new();
        let mut clients = BTreeMap::new();

        for tweet in tweets {
            writeln!(out, "{}", tweet.created_at)?;

            match &tweet.coordinates {
                Some(coordinates) => {
                    report.geotagged += 1;
                    writeln!(out, "{coordinates}")?;
                }
                None => writeln!(out, "{NONE}")?,
            }

            match tweet.place.as_ref().and_then(|p| p.label()) {
                Some(label) => {
                    report.with_place += 1;
                    writeln!(out, "{label}")?;
                    *places.entry(label).or_insert(0) += 1;
                }
                None => writeln!(out, "{NONE}")?,
            }

            let source = tweet.source.as_deref().unwrap_or(NONE);
            writeln!(out, "{source}")?;
            if let Some(client) = tweet.source.as_deref().and_then(client_name) {
                *clients.entry(client).or_insert(0) += 1;
            }

            writeln!(out, "{SEPARATOR}")?;
        }

        report.places = tally(places);
        report.clients = tally(clients);

        writeln!(
            out,
            "Geotagged tweets: {} of {}",
            report.geotagged, report.total
        )?;
        for place in &report.places {
            writeln!(out, "Place: {} ({})", place.name, place.count)?;
        }
        for client in &report.clients {
            writeln!(out, "Client: {} ({})", client.name, client.count)?;
        }

        info!(
            total = report.total,
            geotagged = report.geotagged,
            clients = report.clients.len(),
            "Geo analysis complete"
        );
        Ok(ProcessorReport::GeoAnalysis(report))
    }
}
