//! Postprocessing configuration via TOML file.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::{PostprocessError, PostprocessResult};

/// Thresholds and switches for one postprocessing run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostprocessConfig {
    /// Minimum majority share for (form, xpos) → lemma entries.
    pub fill_threshold: f64,
    /// Minimum majority share for (form, xpos context) → lemma entries.
    pub context_threshold: f64,
    /// Neighbours on each side in the xpos context window.
    pub context_window: usize,
    /// Highest score still exported to the review glossary.
    pub glossary_threshold: f64,
    /// Prepend the generated `# global.` header when writing.
    pub write_header: bool,
}

impl Default for PostprocessConfig {
    fn default() -> Self {
        Self {
            fill_threshold: 0.7,
            context_threshold: 0.7,
            context_window: 1,
            glossary_threshold: 2.0,
            write_header: true,
        }
    }
}

impl PostprocessConfig {
    /// Load from a TOML file. A missing file gives the defaults.
    pub fn load(path: &Path) -> PostprocessResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| config_error(path, e))?;
        let config: Self = toml::from_str(&content).map_err(|e| config_error(path, e))?;
        config.validate().map_err(|message| config_error(path, message))?;
        Ok(config)
    }

    /// Check that both thresholds are shares in `(0, 1]`.
    pub fn validate(&self) -> Result<(), String> {
        for (name, value) in [
            ("fill_threshold", self.fill_threshold),
            ("context_threshold", self.context_threshold),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(format!("{} must be in (0, 1], got {}", name, value));
            }
        }
        Ok(())
    }
}

fn config_error(path: &Path, message: impl ToString) -> PostprocessError {
    PostprocessError::Config {
        path: path.display().to_string(),
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = PostprocessConfig::load(&dir.path().join("postprocess.toml")).unwrap();
        assert_eq!(config, PostprocessConfig::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("postprocess.toml");
        fs::write(&path, "fill_threshold = 0.9\nwrite_header = false\n").unwrap();

        let config = PostprocessConfig::load(&path).unwrap();
        assert_eq!(config.fill_threshold, 0.9);
        assert!(!config.write_header);
        assert_eq!(config.context_threshold, 0.7);
        assert_eq!(config.context_window, 1);
    }

    #[test]
    fn test_malformed_file_names_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("postprocess.toml");
        fs::write(&path, "fill_threshold = \"high\"\n").unwrap();

        let err = PostprocessConfig::load(&path).unwrap_err();
        assert!(matches!(err, PostprocessError::Config { .. }));
        assert!(err.to_string().contains("postprocess.toml"));
    }

    #[test]
    fn test_out_of_range_threshold() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("postprocess.toml");
        fs::write(&path, "context_threshold = 1.5\n").unwrap();

        let err = PostprocessConfig::load(&path).unwrap_err();
        assert!(err.to_string().contains("context_threshold"));
    }
}
