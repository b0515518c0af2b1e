//! Processor errors.

use std::path::PathBuf;

use thiserror::Error;

use crate::processor::Param;

/// Errors raised while loading or running processors.
#[derive(Error, Debug)]
pub enum ProcessorError {
    /// No processor is registered under this name
    #[error("unknown processor `{name}` in group {group} (available: {})", available.join(", "))]
    UnknownProcessor {
        name: String,
        group: &'static str,
        available: Vec<String>,
    },

    /// No processors were requested
    #[error("no processors requested")]
    NoProcessors,

    /// A processor asked for a value the configuration does not provide
    #[error("processor `{processor}` requires `{}` but the configuration does not set it", param.key())]
    MissingParam {
        processor: &'static str,
        param: Param,
    },

    /// No word list exists for the language
    #[error("no spelling dictionary for language `{0}`; set `spelling_dictionary`")]
    UnsupportedLanguage(String),

    /// A reference data file could not be read
    #[error("failed to read {}: {source}", path.display())]
    Data {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A dialect mapping file is malformed
    #[error("invalid dialect mapping {name}: {source}")]
    Mapping {
        name: String,
        #[source]
        source: serde_yaml::Error,
    },

    /// Writing the report failed
    #[error("output error: {0}")]
    Output(#[from] std::io::Error),
}

/// Result type for processor operations.
pub type ProcessorResult<T> = Result<T, ProcessorError>;
