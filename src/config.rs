//! Configuration for the analyzer CLI
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (analyzer.toml)
//! - Environment variables (ANALYZER_*)
//!
//! Configuration only shapes the CLI's scanning and reporting; engine
//! semantics (thresholds, scoring) are compile-time constants.
//!
//! ## Example config file (analyzer.toml):
//! ```toml
//! [input]
//! extensions = ["json"]
//!
//! [output]
//! format = "pretty"
//!
//! [report]
//! max_suggestions = 20
//! ```

use config_crate::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

/// Main configuration for the analyzer CLI
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Input scanning settings
    #[serde(default)]
    pub input: InputConfig,

    /// Output settings
    #[serde(default)]
    pub output: OutputConfig,

    /// Report settings
    #[serde(default)]
    pub report: ReportConfig,
}

/// Input scanning configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// File extensions treated as JSON documents
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

/// Output configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Report rendering format
    #[serde(default)]
    pub format: OutputFormat,
}

/// Report rendering format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Pretty,
    Json,
}

/// Report configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Maximum number of suggestions printed per report
    #[serde(default = "default_max_suggestions")]
    pub max_suggestions: usize,
}

fn default_extensions() -> Vec<String> {
    vec!["json".to_string()]
}

fn default_max_suggestions() -> usize {
    20
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            max_suggestions: default_max_suggestions(),
        }
    }
}

impl AnalyzerConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration from a specific file
    pub fn load_from(config_path: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        for location in ["analyzer.toml", ".analyzer.toml"] {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix("ANALYZER")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AnalyzerConfig::default();
        assert_eq!(config.input.extensions, vec!["json"]);
        assert_eq!(config.output.format, OutputFormat::Pretty);
        assert_eq!(config.report.max_suggestions, 20);
    }

    #[test]
    fn test_serialize_config() {
        let config = AnalyzerConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[input]"));
        assert!(toml_str.contains("[output]"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(
            &path,
            "[output]\nformat = \"json\"\n\n[report]\nmax_suggestions = 5\n",
        )
        .unwrap();

        let config = AnalyzerConfig::load_from(path.to_str()).unwrap();
        assert_eq!(config.output.format, OutputFormat::Json);
        assert_eq!(config.report.max_suggestions, 5);
        assert_eq!(config.input.extensions, vec!["json"]);
    }
}
