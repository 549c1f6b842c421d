//! Error type shared by every stage of the pipeline.

use std::path::PathBuf;

/// Errors raised while loading inputs or configuring the pipeline.
///
/// Retrieval and evaluation themselves never fail on data: empty tables,
/// empty ground truth and zero denominators all degrade to defined values.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Normalization mode string was not one of `none`, `stem`, `lemma`.
    #[error("invalid normalization mode '{0}' (expected none, stem or lemma)")]
    InvalidMode(String),
    /// Field name was not one of `title`, `abstract`, `tags`.
    #[error("invalid field '{0}' (expected title, abstract or tags)")]
    InvalidField(String),
    /// A field-set was parsed from an empty list.
    #[error("field set must name at least one field")]
    EmptyFieldSet,
    /// A named field-set does not exist in the experiment.
    #[error("unknown field set '{0}'")]
    UnknownFieldSet(String),
    /// An input file could not be read.
    #[error("failed to read {path}: {source}")]
    ReadFile {
        /// Offending path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// An input file was not valid JSON of the expected shape.
    #[error("failed to parse {path}: {source}")]
    ParseFile {
        /// Offending path.
        path: PathBuf,
        /// Underlying JSON error.
        source: serde_json::Error,
    },
    /// Corpus JSON parsed but did not have the expected top-level shape.
    #[error("invalid corpus: {0}")]
    InvalidCorpus(String),
    /// A configuration value was out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;
