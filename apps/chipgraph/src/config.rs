//! # Configuration
//!
//! Settings are layered: built-in defaults, then an optional TOML file, then
//! CLI flags (applied in `cli::execute`).
//!
//! ```toml
//! [evaluation]
//! max_depth = 512
//!
//! [output]
//! json = false
//! report = true
//! ```
//!
//! Without `--config`, `chipgraph.toml` in the working directory is used if
//! it exists.

use chipgraph_core::ChipError;
use chipgraph_core::primitives::MAX_EVAL_DEPTH;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// File name picked up from the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "chipgraph.toml";

/// Maximum configuration file size (64 KB).
const MAX_CONFIG_FILE_SIZE: u64 = 64 * 1024;

/// Root of `chipgraph.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub evaluation: EvaluationConfig,
    pub output: OutputConfig,
}

/// `[evaluation]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EvaluationConfig {
    /// Maximum dependency hops below the evaluated chip.
    pub max_depth: usize,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            max_depth: MAX_EVAL_DEPTH,
        }
    }
}

/// `[output]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Emit JSON instead of text.
    pub json: bool,
    /// Print the connection report after running a script.
    pub report: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            json: false,
            report: true,
        }
    }
}

impl Config {
    /// Parse and validate a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ChipError> {
        let config: Self = toml::from_str(text).map_err(|e| ChipError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load the configuration.
    ///
    /// An explicit `path` must exist. Without one, the default file is read if
    /// present, otherwise built-in defaults are returned.
    pub fn load(path: Option<&Path>) -> Result<Self, ChipError> {
        let path = match path {
            Some(path) => path,
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => Path::new(DEFAULT_CONFIG_FILE),
            None => return Ok(Self::default()),
        };

        let metadata = std::fs::metadata(path).map_err(|e| {
            ChipError::Config(format!("Cannot read config '{}': {}", path.display(), e))
        })?;
        if metadata.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ChipError::Config(format!(
                "Config file size {} bytes exceeds maximum allowed {} bytes",
                metadata.len(),
                MAX_CONFIG_FILE_SIZE
            )));
        }

        let text = std::fs::read_to_string(path).map_err(|e| {
            ChipError::Config(format!("Cannot read config '{}': {}", path.display(), e))
        })?;

        tracing::debug!("Loaded configuration from {}", path.display());
        Self::from_toml_str(&text)
    }

    fn validate(&self) -> Result<(), ChipError> {
        if !(1..=MAX_EVAL_DEPTH).contains(&self.evaluation.max_depth) {
            return Err(ChipError::Config(format!(
                "evaluation.max_depth must be between 1 and {}, got {}",
                MAX_EVAL_DEPTH, self.evaluation.max_depth
            )));
        }
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.evaluation.max_depth, MAX_EVAL_DEPTH);
        assert!(!config.output.json);
        assert!(config.output.report);
    }

    #[test]
    fn empty_file_gives_defaults() {
        assert_eq!(Config::from_toml_str("").expect("parse"), Config::default());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = Config::from_toml_str("[output]\njson = true\n").expect("parse");
        assert!(config.output.json);
        assert!(config.output.report);
        assert_eq!(config.evaluation.max_depth, MAX_EVAL_DEPTH);
    }

    #[test]
    fn unknown_keys_rejected() {
        let result = Config::from_toml_str("[evaluation]\nmemoize = true\n");
        assert!(matches!(result, Err(ChipError::Config(_))));
    }

    #[test]
    fn zero_depth_rejected() {
        let result = Config::from_toml_str("[evaluation]\nmax_depth = 0\n");
        assert!(matches!(result, Err(ChipError::Config(_))));
    }

    #[test]
    fn depth_above_builtin_limit_rejected() {
        let text = format!("[evaluation]\nmax_depth = {}\n", MAX_EVAL_DEPTH + 1);
        assert!(matches!(
            Config::from_toml_str(&text),
            Err(ChipError::Config(_))
        ));

        let text = format!("[evaluation]\nmax_depth = {}\n", MAX_EVAL_DEPTH);
        let config = Config::from_toml_str(&text).expect("parse");
        assert_eq!(config.evaluation.max_depth, MAX_EVAL_DEPTH);
    }
}
