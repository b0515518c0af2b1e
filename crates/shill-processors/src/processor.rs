//! The processor entry point and the values processors can ask for.
//!
//! A processor declares the configuration values it needs through
//! [`Processor::params`]; the pipeline resolves exactly those from the run
//! configuration into [`ProcessorArgs`] before calling
//! [`Processor::process`].

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use shill_core::{TargetConfig, TweetRecord};

use crate::dialect::DialectReport;
use crate::error::{ProcessorError, ProcessorResult};
use crate::geo::GeoReport;
use crate::sentiment::SentimentReport;
use crate::spelling::SpellingReport;

// ─────────────────────────────────────────────────────────────────────────────
// Parameters
// ─────────────────────────────────────────────────────────────────────────────

/// A configuration value a processor may request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Param {
    /// `search_terms`
    SearchTerms,
    /// `dialect`
    Dialect,
    /// `dialect_mappings_dir` (optional)
    DialectMappings,
    /// `spelling_dictionary` (optional)
    SpellingDictionary,
}

impl Param {
    /// Config key the value is read from.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::SearchTerms => "search_terms",
            Self::Dialect => "dialect",
            Self::DialectMappings => "dialect_mappings_dir",
            Self::SpellingDictionary => "spelling_dictionary",
        }
    }

    /// Whether resolution fails when the value is absent.
    #[must_use]
    pub const fn is_required(self) -> bool {
        matches!(self, Self::SearchTerms | Self::Dialect)
    }
}

/// Every value processors can draw on for one run.
#[derive(Debug, Clone, Default)]
pub struct ProcessorContext {
    pub search_terms: Vec<String>,
    pub dialect: Option<String>,
    pub dialect_mappings_dir: Option<PathBuf>,
    pub spelling_dictionary: Option<PathBuf>,
}

impl ProcessorContext {
    /// Collect processor inputs from the run configuration.
    #[must_use]
    pub fn from_config(config: &TargetConfig) -> Self {
        Self {
            search_terms: config.search_terms.clone(),
            dialect: config.dialect.clone(),
            dialect_mappings_dir: config.dialect_mappings_dir.clone(),
            spelling_dictionary: config.spelling_dictionary.clone(),
        }
    }
}

/// The subset of [`ProcessorContext`] a processor declared.
#[derive(Debug, Clone)]
pub struct ProcessorArgs<'a> {
    processor: &'static str,
    search_terms: Option<&'a [String]>,
    dialect: Option<&'a str>,
    dialect_mappings: Option<&'a Path>,
    spelling_dictionary: Option<&'a Path>,
}

impl<'a> ProcessorArgs<'a> {
    /// Resolve the declared parameters against the context.
    pub fn resolve(
        processor: &'static str,
        params: &[Param],
        ctx: &'a ProcessorContext,
    ) -> ProcessorResult<Self> {
        let mut args = Self::empty(processor);

        for &param in params {
            let present = match param {
                Param::SearchTerms => {
                    // An empty or all-blank list counts as unset.
                    args.search_terms = Some(ctx.search_terms.as_slice())
                        .filter(|terms| terms.iter().any(|t| !t.trim().is_empty()));
                    args.search_terms.is_some()
                }
                Param::Dialect => {
                    args.dialect = ctx.dialect.as_deref().filter(|d| !d.is_empty());
                    args.dialect.is_some()
                }
                Param::DialectMappings => {
                    args.dialect_mappings = ctx.dialect_mappings_dir.as_deref();
                    args.dialect_mappings.is_some()
                }
                Param::SpellingDictionary => {
                    args.spelling_dictionary = ctx.spelling_dictionary.as_deref();
                    args.spelling_dictionary.is_some()
                }
            };

            if !present && param.is_required() {
                return Err(ProcessorError::MissingParam { processor, param });
            }
        }

        Ok(args)
    }

    /// Arguments with nothing resolved.
    #[must_use]
    pub const fn empty(processor: &'static str) -> Self {
        Self {
            processor,
            search_terms: None,
            dialect: None,
            dialect_mappings: None,
            spelling_dictionary: None,
        }
    }

    /// Search terms; an error if the processor did not declare them.
    pub fn search_terms(&self) -> ProcessorResult<&'a [String]> {
        self.search_terms.ok_or(ProcessorError::MissingParam {
            processor: self.processor,
            param: Param::SearchTerms,
        })
    }

    /// Dialect tag; an error if the processor did not declare it.
    pub fn dialect(&self) -> ProcessorResult<&'a str> {
        self.dialect.ok_or(ProcessorError::MissingParam {
            processor: self.processor,
            param: Param::Dialect,
        })
    }

    /// Directory overriding the built-in dialect mappings.
    #[must_use]
    pub const fn dialect_mappings(&self) -> Option<&'a Path> {
        self.dialect_mappings
    }

    /// Word list overriding the built-in spelling dictionary.
    #[must_use]
    pub const fn spelling_dictionary(&self) -> Option<&'a Path> {
        self.spelling_dictionary
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Processor trait
// ─────────────────────────────────────────────────────────────────────────────

/// Structured result of one processor run.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "processor", rename_all = "snake_case")]
pub enum ProcessorReport {
    SentimentAnalysis(SentimentReport),
    GrammarAnalysis(DialectReport),
    SpellingAnalysis(SpellingReport),
    GeoAnalysis(GeoReport),
}

/// A tweet analyzer loaded by name from the registry.
pub trait Processor: Send + Sync {
    /// Registry name, e.g. `sentiment_analysis`.
    fn name(&self) -> &'static str;

    /// One-line summary for `--list-processors`.
    fn description(&self) -> &'static str;

    /// Configuration values this processor consumes.
    fn params(&self) -> &'static [Param];

    /// Analyze the tweets, writing human-readable findings to `out`.
    fn process(
        &self,
        tweets: &[TweetRecord],
        args: &ProcessorArgs<'_>,
        out: &mut dyn Write,
    ) -> ProcessorResult<ProcessorReport>;
}
