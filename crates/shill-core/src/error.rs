//! Configuration and input errors.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading the run configuration or saved timelines.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file does not exist
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Reading the file failed
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The YAML document is empty
    #[error("configuration document is empty")]
    Empty,

    /// The YAML document could not be parsed
    #[error("invalid configuration: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// A saved timeline could not be parsed
    #[error("invalid timeline JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A required field is missing or empty
    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    /// A field is present but unusable
    #[error("invalid value for `{field}`: {reason}")]
    InvalidField { field: &'static str, reason: String },
}

impl ConfigError {
    pub(crate) fn from_io(path: &std::path::Path, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound(path.to_path_buf())
        } else {
            Self::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    }
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
