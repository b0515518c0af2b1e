//! Load the requested processors and run them in order.

use std::io::Write;

use serde::Serialize;
use shill_core::TweetRecord;
use tracing::{error, info, instrument};

use crate::error::{ProcessorError, ProcessorResult};
use crate::processor::{Processor, ProcessorArgs, ProcessorContext, ProcessorReport};
use crate::registry::ProcessorRegistry;

/// What one processor produced.
#[derive(Debug, Serialize)]
pub struct ProcessorOutcome {
    pub name: &'static str,
    #[serde(flatten)]
    pub status: OutcomeStatus,
}

/// Success or failure of one processor run.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OutcomeStatus {
    Ok { report: ProcessorReport },
    Failed { error: String },
}

impl ProcessorOutcome {
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        matches!(self.status, OutcomeStatus::Ok { .. })
    }

    #[must_use]
    pub const fn report(&self) -> Option<&ProcessorReport> {
        match &self.status {
            OutcomeStatus::Ok { report } => Some(report),
            OutcomeStatus::Failed { .. } => None,
        }
    }
}

/// Processors resolved from the registry, in requested order.
pub struct Pipeline {
    processors: Vec<Box<dyn Processor>>,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("processors", &self.names())
            .finish()
    }
}

impl Pipeline {
    /// Load every named processor up front; any unknown name fails.
    pub fn load<S: AsRef<str>>(registry: &ProcessorRegistry, names: &[S]) -> ProcessorResult<Self> {
        if names.is_empty() {
            return Err(ProcessorError::NoProcessors);
        }

        let processors = names
            .iter()
            .map(|name| registry.load(name.as_ref()))
            .collect::<ProcessorResult<Vec<_>>>()?;

        Ok(Self { processors })
    }

    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.processors.iter().map(|p| p.name()).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.processors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.processors.is_empty()
    }

    /// Run each processor with the arguments it declared.
    ///
    /// A failing processor is logged and recorded; the rest still run.
    #[instrument(skip_all, fields(processors = self.processors.len(), tweets = tweets.len()))]
    pub fn run(
        &self,
        tweets: &[TweetRecord],
        ctx: &ProcessorContext,
        out: &mut dyn Write,
    ) -> Vec<ProcessorOutcome> {
        self.processors
            .iter()
            .map(|processor| {
                let name = processor.name();
                info!(processor = name, "Running processor");

                let status = match run_one(processor.as_ref(), tweets, ctx, out) {
                    Ok(report) => OutcomeStatus::Ok { report },
                    Err(e) => {
                        error!(processor = name, error = %e, "Processor failed");
                        OutcomeStatus::Failed {
                            error: e.to_string(),
                        }
                    }
                };
                ProcessorOutcome { name, status }
            })
            .collect()
    }
}

fn run_one(
    processor: &dyn Processor,
    tweets: &[TweetRecord],
    ctx: &ProcessorContext,
    out: &mut dyn Write,
) -> ProcessorResult<ProcessorReport> {
    let args = ProcessorArgs::resolve(processor.name(), processor.params(), ctx)?;
    processor.process(tweets, &args, out)
}
