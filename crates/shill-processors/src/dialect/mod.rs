//! Dialect detection (`grammar_analysis`).
//!
//! Looks for marker words of the other dialects of the configured language.
//! A `en-US` account writing "colour" and "organisation" is a hint that the
//! persona is not what it claims.

mod catalog;

use std::io::Write;

use serde::Serialize;
use shill_core::TweetRecord;
use tracing::{debug, info};

pub use catalog::{language_of, DialectCatalog, DialectMapping};

use crate::error::ProcessorResult;
use crate::processor::{Param, Processor, ProcessorArgs, ProcessorReport};

/// One marker word found in one tweet.
#[derive(Debug, Clone, Serialize)]
pub struct DialectHit {
    pub dialect: String,
    pub word: String,
    pub date: String,
    pub tweet_id: u64,
}

/// Hits per compared dialect.
#[derive(Debug, Clone, Serialize)]
pub struct DialectCount {
    pub dialect: String,
    pub hits: usize,
    /// Distinct tweets with at least one hit
    pub tweets: usize,
}

/// Outcome of the dialect processor.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DialectReport {
    pub dialect: String,
    pub compared: Vec<String>,
    pub hits: Vec<DialectHit>,
    pub counts: Vec<DialectCount>,
    /// Compared dialect with the most hits, if any matched
    pub most_frequent: Option<String>,
}

/// Marker words of `mapping` found in `text`, ignoring case.
#[must_use]
pub fn find_markers<'m>(mapping: &'m DialectMapping, text: &str) -> Vec<&'m str> {
    let text = text.to_lowercase();
    mapping
        .words
        .iter()
        .filter(|word| text.contains(&word.to_lowercase()))
        .map(String::as_str)
        .collect()
}

/// `grammar_analysis` processor.
#[derive(Debug, Default)]
pub struct DialectAnalysis;

impl DialectAnalysis {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Processor for DialectAnalysis {
    fn name(&self) -> &'static str {
        "grammar_analysis"
    }

    fn description(&self) -> &'static str {
        "Marker words of other dialects of the configured language"
    }

    fn params(&self) -> &'static [Param] {
        &[Param::Dialect, Param::DialectMappings]
    }

    fn process(
        &self,
        tweets: &[TweetRecord],
        args: &ProcessorArgs<'_>,
        out: &mut dyn Write,
    ) -> ProcessorResult<ProcessorReport> {
        let dialect = args.dialect()?;
        let catalog = DialectCatalog::new(args.dialect_mappings());
        let compared = catalog.other_dialects(dialect)?;

        writeln!(out, "Chosen language/dialect: {dialect}")?;
        if compared.is_empty() {
            writeln!(
                out,
                "No other dialects known for language: {}",
                language_of(dialect)
            )?;
        }

        let mut hits = Vec::new();
        let mut counts = Vec::with_capacity(compared.len());
        for other in &compared {
            let mapping = catalog.load(other)?;
            debug!(dialect = %other, words = mapping.words.len(), "Comparing dialect");

            let mut count = DialectCount {
                dialect: other.clone(),
                hits: 0,
                tweets: 0,
            };
            for tweet in tweets {
                let found = find_markers(&mapping, &tweet.text);
                if !found.is_empty() {
                    count.tweets += 1;
                }
                for word in found {
                    writeln!(out, "Dialect is: {other}")?;
                    writeln!(out, "Word found is: {word}")?;
                    count.hits += 1;
                    hits.push(DialectHit {
                        dialect: other.clone(),
                        word: word.to_string(),
                        date: tweet.date.clone(),
                        tweet_id: tweet.id,
                    });
                }
            }
            counts.push(count);
        }

        let most_frequent = counts
            .iter()
            .filter(|c| c.hits > 0)
            .max_by(|a, b| a.hits.cmp(&b.hits).then_with(|| b.dialect.cmp(&a.dialect)))
            .map(|c| c.dialect.clone());

        if let Some(top) = counts
            .iter()
            .find(|c| Some(&c.dialect) == most_frequent.as_ref())
        {
            writeln!(
                out,
                "Most frequent other dialect: {} ({} hits in {} tweets)",
                top.dialect, top.hits, top.tweets
            )?;
        }
        info!(dialect, hits = hits.len(), "Dialect analysis complete");

        Ok(ProcessorReport::GrammarAnalysis(DialectReport {
            dialect: dialect.to_string(),
            compared,
            hits,
            counts,
            most_frequent,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProcessorError;
    use crate::processor::ProcessorContext;

    fn tweets() -> Vec<TweetRecord> {
        vec![
            TweetRecord::new(
                "Mon Oct 09 09:00:00 +0000 2023",
                "The colour of the sky is lovely. Our organisation supports this.",
            ),
            TweetRecord::new(
                "Tue Oct 10 09:00:00 +0000 2023",
                "Off to the city centre this arvo.",
            ),
            TweetRecord::new("Wed Oct 11 09:00:00 +0000 2023", "Nothing special today."),
        ]
    }

    fn run(ctx: &ProcessorContext, tweets: &[TweetRecord]) -> ProcessorResult<(DialectReport, String)> {
        let processor = DialectAnalysis::new();
        let args = ProcessorArgs::resolve(processor.name(), processor.params(), ctx)?;
        let mut out = Vec::new();
        let ProcessorReport::GrammarAnalysis(report) = processor.process(tweets, &args, &mut out)?
        else {
            panic!("wrong report type");
        };
        Ok((report, String::from_utf8(out).unwrap()))
    }

    fn context(dialect: &str) -> ProcessorContext {
        ProcessorContext {
            dialect: Some(dialect.into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_finds_other_dialect_markers() {
        let (report, output) = run(&context("en-US"), &tweets()).unwrap();

        assert!(output.starts_with("Chosen language/dialect: en-US\n"));
        assert_eq!(report.compared, vec!["en-AU", "en-GB"]);
        assert!(output.contains("Dialect is: en-GB\nWord found is: colour\n"));
        assert!(output.contains("Word found is: organisation"));
        assert!(output.contains("Dialect is: en-AU\nWord found is: arvo\n"));

        let gb = report.counts.iter().find(|c| c.dialect == "en-GB").unwrap();
        assert!(gb.hits >= 3);
        assert_eq!(gb.tweets, 2);
        assert_eq!(report.most_frequent.as_deref(), Some("en-GB"));
    }

    #[test]
    fn test_chosen_dialect_is_not_compared() {
        let (report, output) = run(&context("en-GB"), &tweets()).unwrap();
        assert!(!report.compared.contains(&"en-GB".to_string()));
        assert!(!output.contains("Dialect is: en-GB"));
    }

    #[test]
    fn test_matching_ignores_case() {
        let tweets = vec![TweetRecord::new("d", "COLOUR me impressed")];
        let (report, _) = run(&context("en-US"), &tweets).unwrap();
        assert_eq!(report.hits.len(), 1);
        assert_eq!(report.hits[0].word, "colour");
    }

    #[test]
    fn test_unknown_language_reports_nothing() {
        let (report, output) = run(&context("de-DE"), &tweets()).unwrap();
        assert!(report.compared.is_empty());
        assert!(report.hits.is_empty());
        assert!(output.contains("No other dialects known for language: de"));
    }

    #[test]
    fn test_requires_dialect() {
        let err = run(&ProcessorContext::default(), &tweets()).unwrap_err();
        assert!(matches!(
            err,
            ProcessorError::MissingParam {
                param: Param::Dialect,
                ..
            }
        ));
    }

    #[test]
    fn test_custom_mappings_dir() {
        let dir = tempfile::tempdir().unwrap();
        let en = dir.path().join("en");
        std::fs::create_dir(&en).unwrap();
        std::fs::write(en.join("en-US.yaml"), "words: [sidewalk]\n").unwrap();
        std::fs::write(en.join("en-IE.yaml"), "name: Irish\nwords: [grand]\n").unwrap();

        let ctx = ProcessorContext {
            dialect: Some("en-US".into()),
            dialect_mappings_dir: Some(dir.path().to_path_buf()),
            ..Default::default()
        };
        let tweets = vec![TweetRecord::new("d", "The weather is grand")];
        let (report, _) = run(&ctx, &tweets).unwrap();

        assert_eq!(report.compared, vec!["en-IE"]);
        assert_eq!(report.hits[0].word, "grand");
    }
}
