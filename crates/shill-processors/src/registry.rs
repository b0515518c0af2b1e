//! Processor lookup by name.

use crate::dialect::DialectAnalysis;
use crate::error::{ProcessorError, ProcessorResult};
use crate::geo::GeoAnalysis;
use crate::processor::Processor;
use crate::sentiment::SentimentAnalysis;
use crate::spelling::SpellingAnalysis;

/// Group every built-in processor is registered under.
pub const PROCESSOR_GROUP: &str = "shill_hunter.processors";

type Factory = fn() -> Box<dyn Processor>;

/// Named processor factories.
#[derive(Debug, Clone)]
pub struct ProcessorRegistry {
    group: &'static str,
    entries: Vec<(&'static str, Factory)>,
}

impl ProcessorRegistry {
    /// Empty registry for a group.
    #[must_use]
    pub const fn new(group: &'static str) -> Self {
        Self {
            group,
            entries: Vec::new(),
        }
    }

    /// Registry holding the four built-in processors.
    #[must_use]
    pub fn builtin() -> Self {
        let mut registry = Self::new(PROCESSOR_GROUP);
        registry.register("sentiment_analysis", || Box::new(SentimentAnalysis::new()));
        registry.register("grammar_analysis", || Box::new(DialectAnalysis::new()));
        registry.register("spelling_analysis", || Box::new(SpellingAnalysis::new()));
        registry.register("geo_analysis", || Box::new(GeoAnalysis::new()));
        registry
    }

    /// Register a factory; a later registration under the same name wins.
    pub fn register(&mut self, name: &'static str, factory: Factory) {
        self.entries.retain(|(n, _)| *n != name);
        self.entries.push((name, factory));
    }

    #[must_use]
    pub const fn group(&self) -> &'static str {
        self.group
    }

    /// Registered names in registration order.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.entries.iter().map(|(name, _)| *name).collect()
    }

    /// Instantiate the processor registered under `name`.
    pub fn load(&self, name: &str) -> ProcessorResult<Box<dyn Processor>> {
        self.entries
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, factory)| factory())
            .ok_or_else(|| ProcessorError::UnknownProcessor {
                name: name.to_string(),
                group: self.group,
                available: self.names().into_iter().map(String::from).collect(),
            })
    }
}

impl Default for ProcessorRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Split a comma-separated plugin list.
///
/// Names are trimmed; empty entries and repeats are dropped, keeping the
/// first occurrence.
#[must_use]
pub fn parse_plugin_list(list: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for name in list.split(',').map(str::trim) {
        if !name.is_empty() && !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
    names
}
