//! Spelling analysis.
//!
//! Misspellings, and spellings foreign to the claimed dialect, are flagged
//! with up to five suggested corrections each.

mod checker;
mod levenshtein;

use std::io::Write;

use serde::Serialize;
use shill_core::TweetRecord;
use tracing::info;

pub use checker::{tokenize, SpellChecker, MAX_SUGGESTIONS};

use crate::error::ProcessorResult;
use crate::processor::{Param, Processor, ProcessorArgs, ProcessorReport};

const MISSPELLING_SEPARATOR: &str = "----------------";

/// One unknown word in one tweet.
#[derive(Debug, Clone, Serialize)]
pub struct Misspelling {
    pub tweet_id: u64,
    pub date: String,
    pub word: String,
    pub suggestions: Vec<String>,
}

/// Outcome of the spelling processor.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SpellingReport {
    pub dialect: String,
    pub dictionary_size: usize,
    pub tweets_checked: usize,
    /// Tweets with at least one unknown word
    pub tweets_flagged: usize,
    pub misspellings: Vec<Misspelling>,
}

/// `spelling_analysis` processor.
#[derive(Debug, Default)]
pub struct SpellingAnalysis;

impl SpellingAnalysis {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Processor for SpellingAnalysis {
    fn name(&self) -> &'static str {
        "spelling_analysis"
    }

    fn description(&self) -> &'static str {
        "Unknown words for the configured dialect, with suggestions"
    }

    fn params(&self) -> &'static [Param] {
        &[Param::Dialect, Param::DialectMappings, Param::SpellingDictionary]
    }

    fn process(
        &self,
        tweets: &[TweetRecord],
        args: &ProcessorArgs<'_>,
        out: &mut dyn Write,
    ) -> ProcessorResult<ProcessorReport> {
        let dialect = args.dialect()?;
        let checker =
            SpellChecker::for_dialect(dialect, args.spelling_dictionary(), args.dialect_mappings())?;

        writeln!(out, "Chosen language/dialect: {dialect}")?;

        let mut report = SpellingReport {
            dialect: dialect.to_string(),
            dictionary_size: checker.len(),
            tweets_checked: tweets.len(),
            ..Default::default()
        };

        for tweet in tweets {
            let words = tokenize(&tweet.text);
            let unknown = checker.unknown(words.iter().map(String::as_str));
            if !unknown.is_empty() {
                report.tweets_flagged += 1;
            }

            for word in unknown {
                let suggestions = checker.candidates(word);

                writeln!(out, "{MISSPELLING_SEPARATOR}")?;
                writeln!(out, "Context: {}", tweet.text)?;
                writeln!(out, "Misspelled word: {word}")?;
                writeln!(out, "Suggestions: ")?;
                if suggestions.is_empty() {
                    writeln!(out, "No suggestions available")?;
                } else {
                    writeln!(out, "{}", suggestions.join(", "))?;
                }

                report.misspellings.push(Misspelling {
                    tweet_id: tweet.id,
                    date: tweet.date.clone(),
                    word: word.to_string(),
                    suggestions,
                });
            }
        }

        info!(
            dialect,
            flagged = report.tweets_flagged,
            words = report.misspellings.len(),
            "Spelling analysis complete"
        );
        Ok(ProcessorReport::SpellingAnalysis(report))
    }
}
