//! Configuration types for bem-lint.

use crate::bem::{SeparatorError, Separators};
use crate::registry::IgnorePatterns;
use crate::types::Severity;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Top-level configuration for bem-lint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Preset to use (e.g., "recommended", "strict", "minimal").
    #[serde(default)]
    pub preset: Option<String>,

    /// Severity threshold for a failing exit status (default: "error").
    #[serde(default)]
    pub fail_on: Option<String>,

    /// Analyzer configuration.
    #[serde(default)]
    pub analyzer: AnalyzerConfig,

    /// BEM separators.
    #[serde(default)]
    pub separators: Separators,

    /// Per-rule configurations.
    #[serde(default)]
    pub rules: HashMap<String, RuleConfig>,
}

impl Config {
    /// Creates a new default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid or the separators are unusable.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })?;
        config.separators.validate()?;
        Ok(config)
    }

    /// Checks if a rule is enabled.
    #[must_use]
    pub fn is_rule_enabled(&self, rule_name: &str) -> bool {
        self.rules
            .get(rule_name)
            .map_or(true, |c| c.enabled.unwrap_or(true))
    }

    /// Gets the severity override for a rule.
    #[must_use]
    pub fn rule_severity(&self, rule_name: &str) -> Option<Severity> {
        self.rules.get(rule_name).and_then(|c| c.severity)
    }

    /// Gets the configuration of a rule, if any.
    #[must_use]
    pub fn rule(&self, rule_name: &str) -> Option<&RuleConfig> {
        self.rules.get(rule_name)
    }

    /// Severity at or above which a run fails.
    ///
    /// # Errors
    ///
    /// Returns an error if `fail_on` is not a severity name.
    pub fn fail_on_severity(&self) -> Result<Severity, ConfigError> {
        match &self.fail_on {
            None => Ok(Severity::Error),
            Some(value) => value.parse().map_err(|_| ConfigError::InvalidValue {
                key: "fail_on".to_string(),
                value: value.clone(),
            }),
        }
    }
}

/// Analyzer-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Root directory to analyze (default: current directory).
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Glob patterns to exclude from analysis.
    #[serde(default)]
    pub exclude: Vec<String>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            exclude: vec!["**/node_modules/**".to_string()],
        }
    }
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

/// Per-rule configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Whether this rule is enabled.
    #[serde(default)]
    pub enabled: Option<bool>,

    /// Severity override for this rule.
    #[serde(default)]
    pub severity: Option<Severity>,

    /// Rule-specific options as key-value pairs.
    #[serde(flatten)]
    pub options: HashMap<String, toml::Value>,
}

impl RuleConfig {
    /// Gets a boolean option with a default value.
    #[must_use]
    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        self.options
            .get(key)
            .and_then(toml::Value::as_bool)
            .unwrap_or(default)
    }

    /// Gets a string array option.
    #[must_use]
    pub fn get_str_array(&self, key: &str) -> Vec<String> {
        self.options
            .get(key)
            .and_then(|v| v.as_array())
            .map(|arr| {
                arr.iter()
                    .filter_map(|v| v.as_str().map(String::from))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Compiles the `ignore` option into patterns.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first pattern that is not a valid regex.
    pub fn ignore_patterns(&self, rule_name: &str) -> Result<IgnorePatterns, ConfigError> {
        let patterns = self.get_str_array("ignore");
        IgnorePatterns::new(&patterns).map_err(|e| ConfigError::InvalidPattern {
            rule: rule_name.to_string(),
            message: e.to_string(),
        })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Parse error in config file.
    #[error("Failed to parse config: {message}")]
    Parse {
        /// Parse error message.
        message: String,
    },

    /// Unusable separators.
    #[error("Invalid separators: {0}")]
    InvalidSeparators(#[from] SeparatorError),

    /// An `ignore` entry is not a valid regular expression.
    #[error("Invalid ignore pattern for rule '{rule}': {message}")]
    InvalidPattern {
        /// Rule the pattern belongs to.
        rule: String,
        /// Regex compile error.
        message: String,
    },

    /// A setting has a value outside its domain.
    #[error("Invalid value for '{key}': {value}")]
    InvalidValue {
        /// Setting name.
        key: String,
        /// The rejected value.
        value: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.separators, Separators::default());
        assert!(config.rules.is_empty());
        assert_eq!(config.fail_on_severity().unwrap(), Severity::Error);
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
fail_on = "warning"

[analyzer]
root = "./styles"
exclude = ["**/vendor/**"]

[separators]
element = "__"
modifier = "_"
modifier_value = "_"

[rules.no-side-effects]
severity = "warning"
ignore = ['^\.js-']
"#;

        let config = Config::parse(toml).expect("Failed to parse");
        assert_eq!(config.analyzer.root, PathBuf::from("./styles"));
        assert_eq!(config.separators.modifier, "_");
        assert_eq!(config.fail_on_severity().unwrap(), Severity::Warning);
        assert!(config.is_rule_enabled("no-side-effects"));
        assert_eq!(config.rule_severity("no-side-effects"), Some(Severity::Warning));

        let rule_config = config.rule("no-side-effects").unwrap();
        let ignore = rule_config.ignore_patterns("no-side-effects").unwrap();
        assert!(ignore.is_match(".js-toggle"));
    }

    #[test]
    fn test_disabled_rule() {
        let config = Config::parse("[rules.no-chained-entities]\nenabled = false\n").unwrap();
        assert!(!config.is_rule_enabled("no-chained-entities"));
        assert!(config.is_rule_enabled("no-side-effects"));
    }

    #[test]
    fn test_rejects_ambiguous_separators() {
        let err = Config::parse("[separators]\nelement = \"-\"\nmodifier = \"-\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSeparators(_)));
    }

    #[test]
    fn test_rejects_bad_ignore_pattern() {
        let config = Config::parse("[rules.no-side-effects]\nignore = [\"(\"]\n").unwrap();
        let err = config
            .rule("no-side-effects")
            .unwrap()
            .ignore_patterns("no-side-effects")
            .unwrap_err();
        assert!(err.to_string().contains("no-side-effects"));
    }

    #[test]
    fn test_rejects_unknown_fail_on() {
        let config = Config::parse("fail_on = \"fatal\"\n").unwrap();
        assert!(matches!(
            config.fail_on_severity(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }
}
