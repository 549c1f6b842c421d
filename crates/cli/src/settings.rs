//! Optional TOML settings file.
//!
//! Top-level keys are the [`PipelineConfig`] fields; a `[paths]` table may
//! name the input files so they need not be repeated on every command line.
//!
//! ```toml
//! lemma_threshold = 0.3
//! synonym_weight_threshold = 0.2
//! label_convention = "full_collection"
//!
//! [weights]
//! title = 3.0
//! abstract = 2.0
//! tags = 1.0
//!
//! [paths]
//! corpus = "data/articles.json"
//! synonyms = "data/query_synonyms.json"
//! ```

use lexeval_core::{Error, PipelineConfig, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Input files named in the settings file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DataPaths {
    pub corpus: Option<PathBuf>,
    pub synonyms: Option<PathBuf>,
    pub lemmas: Option<PathBuf>,
}

/// Parsed settings file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    #[serde(flatten)]
    pub pipeline: PipelineConfig,
    pub paths: DataPaths,
}

impl Settings {
    /// Parse and validate settings from TOML text.
    pub fn from_toml(text: &str) -> Result<Self> {
        let settings: Settings =
            toml::from_str(text).map_err(|e| Error::InvalidConfig(e.message().to_string()))?;
        settings.pipeline.validate()?;
        Ok(settings)
    }

    /// Read `path`, or return defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path).map_err(|source| Error::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_toml(&text).map_err(|e| match e {
            Error::InvalidConfig(msg) => {
                Error::InvalidConfig(format!("{}: {msg}", path.display()))
            }
            other => other,
        })?;
        tracing::info!(path = %path.display(), "Loaded settings");
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexeval_core::eval::LabelConvention;
    use std::io::Write;

    #[test]
    fn test_defaults_without_file() {
        let s = Settings::load(None).unwrap();
        assert_eq!(s.pipeline, PipelineConfig::default());
        assert!(s.paths.corpus.is_none());
    }

    #[test]
    fn test_parse_overrides() {
        let s = Settings::from_toml(
            r#"
            lemma_threshold = 0.5
            scored_top_k = 20
            label_convention = "restricted"

            [weights]
            title = 4.0

            [paths]
            corpus = "corpus.json"
            "#,
        )
        .unwrap();
        assert_eq!(s.pipeline.lemma_threshold, 0.5);
        assert_eq!(s.pipeline.scored_top_k, Some(20));
        assert_eq!(s.pipeline.label_convention, LabelConvention::Restricted);
        assert_eq!(s.pipeline.weights.title, 4.0);
        assert_eq!(s.pipeline.weights.tags, 1.0);
        assert_eq!(s.paths.corpus, Some(PathBuf::from("corpus.json")));
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            Settings::from_toml("lemma_threshold = 3.0"),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            Settings::from_toml("synonym_top_n = \"five\""),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(b"synonym_weight_threshold = 0.1\n").unwrap();
        let s = Settings::load(Some(f.path())).unwrap();
        assert_eq!(s.pipeline.synonym_weight_threshold, 0.1);
        assert!(matches!(
            Settings::load(Some(Path::new("/no/such/settings.toml"))),
            Err(Error::ReadFile { .. })
        ));
    }
}
