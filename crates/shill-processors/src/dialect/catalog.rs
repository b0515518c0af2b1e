//! Dialect word lists.
//!
//! Built-in lists are embedded at compile time via `include_str!`. A
//! directory laid out as `<language>/<dialect>.yaml` replaces them at
//! runtime.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::{ProcessorError, ProcessorResult};

const MAPPING_EXTENSION: &str = ".yaml";

/// Words characteristic of one dialect.
#[derive(Debug, Clone, Deserialize)]
pub struct DialectMapping {
    /// Dialect tag, taken from the file name
    #[serde(skip)]
    pub dialect: String,

    /// Human-readable name
    #[serde(default)]
    pub name: Option<String>,

    /// Marker words and spellings
    #[serde(default)]
    pub words: Vec<String>,

    /// Dialect whose spellings this one shares, e.g. `en-GB` for `en-AU`
    #[serde(default)]
    pub spelling: Option<String>,
}

/// Built-in mappings as `(language, dialect, yaml)`.
fn builtin_mappings() -> &'static [(&'static str, &'static str, &'static str)] {
    &[
        ("en", "en-AU", include_str!("../../data/dialect_mappings/en/en-AU.yaml")),
        ("en", "en-GB", include_str!("../../data/dialect_mappings/en/en-GB.yaml")),
        ("en", "en-US", include_str!("../../data/dialect_mappings/en/en-US.yaml")),
        ("fr", "fr-CA", include_str!("../../data/dialect_mappings/fr/fr-CA.yaml")),
        ("fr", "fr-FR", include_str!("../../data/dialect_mappings/fr/fr-FR.yaml")),
    ]
}

/// Language part of a dialect tag: `en-GB` → `en`.
#[must_use]
pub fn language_of(dialect: &str) -> &str {
    dialect.split('-').next().unwrap_or(dialect)
}

/// Where dialect mappings come from.
#[derive(Debug, Clone)]
pub enum DialectCatalog {
    /// Lists compiled into the binary
    Builtin,
    /// `<root>/<language>/<dialect>.yaml` on disk
    Directory(PathBuf),
}

impl DialectCatalog {
    /// Catalog for an optional override directory.
    #[must_use]
    pub fn new(dir: Option<&Path>) -> Self {
        dir.map_or(Self::Builtin, |d| Self::Directory(d.to_path_buf()))
    }

    /// All dialect tags known for a language, sorted.
    pub fn dialects_for(&self, language: &str) -> ProcessorResult<Vec<String>> {
        let mut tags: Vec<String> = match self {
            Self::Builtin => builtin_mappings()
                .iter()
                .filter(|(lang, _, _)| *lang == language)
                .map(|(_, tag, _)| (*tag).to_string())
                .collect(),
            Self::Directory(root) => {
                let dir = root.join(language);
                let entries = match std::fs::read_dir(&dir) {
                    Ok(entries) => entries,
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                        debug!(dir = %dir.display(), "No dialect mappings for language");
                        return Ok(Vec::new());
                    }
                    Err(source) => return Err(ProcessorError::Data { path: dir, source }),
                };

                let mut tags = Vec::new();
                for entry in entries {
                    let entry = entry.map_err(|source| ProcessorError::Data {
                        path: dir.clone(),
                        source,
                    })?;
                    let file_name = entry.file_name().to_string_lossy().into_owned();
                    if let Some(tag) = file_name.strip_suffix(MAPPING_EXTENSION) {
                        tags.push(tag.to_string());
                    }
                }
                tags
            }
        };
        tags.sort();
        Ok(tags)
    }

    /// Every dialect of the same language except `dialect` itself.
    pub fn other_dialects(&self, dialect: &str) -> ProcessorResult<Vec<String>> {
        let mut tags = self.dialects_for(language_of(dialect))?;
        tags.retain(|tag| tag != dialect);
        Ok(tags)
    }

    /// Load the mapping for a dialect, `None` if the catalog has none.
    pub fn find(&self, dialect: &str) -> ProcessorResult<Option<DialectMapping>> {
        let language = language_of(dialect);
        let yaml = match self {
            Self::Builtin => builtin_mappings()
                .iter()
                .find(|(_, tag, _)| *tag == dialect)
                .map(|(_, _, yaml)| (*yaml).to_string()),
            Self::Directory(root) => {
                let path = root
                    .join(language)
                    .join(format!("{dialect}{MAPPING_EXTENSION}"));
                match std::fs::read_to_string(&path) {
                    Ok(content) => Some(content),
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
                    Err(source) => return Err(ProcessorError::Data { path, source }),
                }
            }
        };

        yaml.map(|yaml| parse_mapping(dialect, &yaml)).transpose()
    }

    /// Load the mapping for a dialect the catalog listed.
    pub fn load(&self, dialect: &str) -> ProcessorResult<DialectMapping> {
        self.find(dialect)?.ok_or_else(|| ProcessorError::Data {
            path: PathBuf::from(format!("{dialect}{MAPPING_EXTENSION}")),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        })
    }
}

fn parse_mapping(dialect: &str, yaml: &str) -> ProcessorResult<DialectMapping> {
    let mut mapping: DialectMapping =
        serde_yaml::from_str(yaml).map_err(|source| ProcessorError::Mapping {
            name: format!("{dialect}{MAPPING_EXTENSION}"),
            source,
        })?;
    mapping.dialect = dialect.to_string();
    mapping.words.retain(|w| !w.trim().is_empty());
    Ok(mapping)
}
