//! Sentiment toward configured search terms.
//!
//! Every tweet mentioning at least one search term is scored; the compound
//! scores are then averaged per term and across terms.

mod analyzer;

use std::io::Write;

use serde::Serialize;
use shill_core::TweetRecord;
use tracing::debug;

pub use analyzer::{PolarityScores, SentimentIntensityAnalyzer};

use crate::error::ProcessorResult;
use crate::processor::{Param, Processor, ProcessorArgs, ProcessorReport};
use crate::SEPARATOR;

/// Scores for one tweet that mentioned search terms.
#[derive(Debug, Clone, Serialize)]
pub struct SentimentResult {
    pub date: String,
    pub tweet: String,
    pub search_terms: Vec<String>,
    #[serde(flatten)]
    pub scores: PolarityScores,
}

/// Mean compound score for one search term.
#[derive(Debug, Clone, Serialize)]
pub struct TermSentiment {
    pub term: String,
    pub matches: usize,
    /// 0 when the term never matched
    pub mean_compound: f64,
}

/// Outcome of the sentiment processor.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SentimentReport {
    pub tweets_analyzed: Vec<SentimentResult>,
    pub terms: Vec<TermSentiment>,
    /// Unweighted mean of the per-term means over terms that matched
    pub compound_search_results: f64,
}

/// Aggregate per-term and overall compound scores.
#[must_use]
pub fn aggregate_search_results(
    results: &[SentimentResult],
    search_terms: &[String],
) -> (Vec<TermSentiment>, f64) {
    let mut terms = Vec::with_capacity(search_terms.len());
    let mut total = 0.0;
    let mut counted = 0u32;

    for term in search_terms {
        let compounds: Vec<f64> = results
            .iter()
            .filter(|r| r.search_terms.iter().any(|t| t == term))
            .map(|r| r.scores.compound)
            .collect();

        let mean_compound = if compounds.is_empty() {
            0.0
        } else {
            #[allow(clippy::cast_precision_loss)]
            let n = compounds.len() as f64;
            compounds.iter().sum::<f64>() / n
        };

        if !compounds.is_empty() {
            total += mean_compound;
            counted += 1;
        }

        terms.push(TermSentiment {
            term: term.clone(),
            matches: compounds.len(),
            mean_compound,
        });
    }

    let overall = if counted > 0 {
        total / f64::from(counted)
    } else {
        0.0
    };
    (terms, overall)
}

/// `sentiment_analysis` processor.
#[derive(Debug, Default)]
pub struct SentimentAnalysis {
    analyzer: SentimentIntensityAnalyzer,
}

impl SentimentAnalysis {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            analyzer: SentimentIntensityAnalyzer::new(),
        }
    }
}

impl Processor for SentimentAnalysis {
    fn name(&self) -> &'static str {
        "sentiment_analysis"
    }

    fn description(&self) -> &'static str {
        "Sentiment of tweets mentioning the configured search terms"
    }

    fn params(&self) -> &'static [Param] {
        &[Param::SearchTerms]
    }

    fn process(
        &self,
        tweets: &[TweetRecord],
        args: &ProcessorArgs<'_>,
        out: &mut dyn Write,
    ) -> ProcessorResult<ProcessorReport> {
        let mut search_terms: Vec<String> = Vec::new();
        for term in args.search_terms()? {
            if !search_terms.contains(term) {
                search_terms.push(term.clone());
            }
        }

        let mut results = Vec::new();
        for tweet in tweets {
            let found: Vec<String> = search_terms
                .iter()
                .filter(|term| tweet.text.contains(term.as_str()))
                .cloned()
                .collect();

            if found.is_empty() {
                writeln!(out, "No search terms found in tweet on:")?;
                writeln!(out, "{}", tweet.date)?;
                writeln!(out, "{SEPARATOR}")?;
                continue;
            }

            writeln!(out, "The following search terms were found:")?;
            for term in &found {
                writeln!(out, "{term}")?;
            }
            writeln!(out, "{}", tweet.date)?;
            writeln!(out, "{}", tweet.text)?;

            let scores = self.analyzer.polarity_scores(&tweet.text);
            for (name, value) in scores.entries() {
                writeln!(out, "{name} value is: {value}")?;
            }
            writeln!(out, "{SEPARATOR}")?;

            results.push(SentimentResult {
                date: tweet.date.clone(),
                tweet: tweet.text.clone(),
                search_terms: found,
                scores,
            });
        }

        let (terms, overall) = aggregate_search_results(&results, &search_terms);
        debug!(matched = results.len(), overall, "Aggregated sentiment");

        writeln!(out, "Aggregated average compound value for search terms")?;
        writeln!(out, "{overall}")?;

        Ok(ProcessorReport::SentimentAnalysis(SentimentReport {
            tweets_analyzed: results,
            terms,
            compound_search_results: overall,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processor::ProcessorContext;

    fn tweets() -> Vec<TweetRecord> {
        vec![
            TweetRecord::new(
                "Wed Oct 11 10:30:00 +0000 2023",
                "The color of fall leaves is absolutely amazing this year. Downtown looks beautiful.",
            ),
            TweetRecord::new(
                "Thu Oct 12 14:15:00 +0000 2023",
                "Favor doing this right instead of rushing through it. Organization is key to success.",
            ),
        ]
    }

    fn run(terms: &[&str], tweets: &[TweetRecord]) -> (SentimentReport, String) {
        let ctx = ProcessorContext {
            search_terms: terms.iter().map(ToString::to_string).collect(),
            ..Default::default()
        };
        let processor = SentimentAnalysis::new();
        let args = ProcessorArgs::resolve(processor.name(), processor.params(), &ctx).unwrap();
        let mut out = Vec::new();
        let report = processor.process(tweets, &args, &mut out).unwrap();
        let ProcessorReport::SentimentAnalysis(report) = report else {
            panic!("wrong report type");
        };
        (report, String::from_utf8(out).unwrap())
    }

    fn result(terms: &[&str], compound: f64) -> SentimentResult {
        SentimentResult {
            date: String::new(),
            tweet: String::new(),
            search_terms: terms.iter().map(ToString::to_string).collect(),
            scores: PolarityScores {
                compound,
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_matching_terms_are_scored() {
        let (report, output) = run(&["color", "Organization", "test"], &tweets());

        assert_eq!(report.tweets_analyzed.len(), 2);
        assert_eq!(report.tweets_analyzed[0].search_terms, vec!["color"]);
        assert_eq!(report.tweets_analyzed[1].search_terms, vec!["Organization"]);
        assert!(report.tweets_analyzed[0].scores.compound > 0.0);
        assert!(output.contains("The following search terms were found:"));
        assert!(output.contains("compound value is: "));
        assert!(output.contains("Aggregated average compound value for search terms"));
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        let (report, output) = run(&["organization"], &tweets());
        assert!(report.tweets_analyzed.is_empty());
        assert_eq!(output.matches("No search terms found in tweet on:").count(), 2);
    }

    #[test]
    fn test_no_matching_terms() {
        let (report, _) = run(&["nonexistent", "notfound"], &tweets());
        assert!(report.tweets_analyzed.is_empty());
        assert!(report.compound_search_results.abs() < f64::EPSILON);
        assert!(report.terms.iter().all(|t| t.matches == 0));
    }

    #[test]
    fn test_empty_tweets_still_aggregates() {
        let (report, output) = run(&["color"], &[]);
        assert!(report.tweets_analyzed.is_empty());
        assert!(output.starts_with("Aggregated average compound value"));
    }

    #[test]
    fn test_empty_search_terms_fail_resolution() {
        let processor = SentimentAnalysis::new();
        let err = ProcessorArgs::resolve(
            processor.name(),
            processor.params(),
            &ProcessorContext::default(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("requires `search_terms`"));
    }

    #[test]
    fn test_aggregate_is_unweighted_mean_of_term_means() {
        let results = vec![
            result(&["a"], 0.8),
            result(&["a", "b"], 0.4),
            result(&["b"], -0.2),
        ];
        let terms = vec!["a".to_string(), "b".to_string(), "c".to_string()];

        let (per_term, overall) = aggregate_search_results(&results, &terms);

        assert!((per_term[0].mean_compound - 0.6).abs() < 1e-9);
        assert!((per_term[1].mean_compound - 0.1).abs() < 1e-9);
        assert_eq!(per_term[2].matches, 0);
        // "c" never matched and does not drag the mean down.
        assert!((overall - 0.35).abs() < 1e-9);
    }

    #[test]
    fn test_duplicate_terms_counted_once() {
        let (report, _) = run(&["color", "color"], &tweets());
        assert_eq!(report.terms.len(), 1);
        assert_eq!(report.tweets_analyzed[0].search_terms, vec!["color"]);
    }
}
