//! Tweet processors for Shill Hunter.
//!
//! Each processor is registered by name in the `shill_hunter.processors`
//! group, declares the configuration values it needs, and writes its
//! findings line by line while returning a structured report.
//!
//! | Name | Looks at |
//! |------|----------|
//! | `sentiment_analysis` | sentiment of tweets mentioning the search terms |
//! | `grammar_analysis` | marker words of other dialects of the same language |
//! | `spelling_analysis` | words unknown to the dialect's dictionary |
//! | `geo_analysis` | timestamps, coordinates, places and posting clients |

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod dialect;
pub mod error;
pub mod geo;
pub mod pipeline;
pub mod processor;
pub mod registry;
pub mod sentiment;
pub mod spelling;

pub use error::{ProcessorError, ProcessorResult};
pub use pipeline::{OutcomeStatus, Pipeline, ProcessorOutcome};
pub use processor::{Param, Processor, ProcessorArgs, ProcessorContext, ProcessorReport};
pub use registry::{parse_plugin_list, ProcessorRegistry, PROCESSOR_GROUP};

/// Line printed between per-tweet blocks.
pub(crate) const SEPARATOR: &str = "-------------------------";
