//! Core analyzer for orchestrating lint execution.

use crate::config::{Config, RuleConfig};
use crate::context::FileContext;
use crate::rule::{Rule, RuleBox};
use crate::stylesheet::loader::{self, LoadError, SourceFile};
use crate::types::{LintResult, Violation};

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// File suffix of the stylesheet AST dumps the analyzer consumes.
pub const AST_DUMP_SUFFIX: &str = ".ast.json";

/// Errors that can occur during analysis.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// IO error reading files.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A stylesheet dump could not be loaded.
    #[error("Failed to load {path}: {source}")]
    Load {
        /// Path to the dump that failed to load.
        path: PathBuf,
        /// Underlying load error.
        source: LoadError,
    },

    /// Glob pattern error.
    #[error("Invalid glob pattern: {0}")]
    Glob(#[from] glob::PatternError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
}

/// Builder for configuring an [`Analyzer`].
#[derive(Default)]
pub struct AnalyzerBuilder {
    root: Option<PathBuf>,
    rules: Vec<RuleBox>,
    exclude_patterns: Vec<String>,
    config: Option<Config>,
    fail_on_parse_error: bool,
}

impl AnalyzerBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the root directory to analyze.
    #[must_use]
    pub fn root(mut self, path: impl Into<PathBuf>) -> Self {
        self.root = Some(path.into());
        self
    }

    /// Adds a rule to the analyzer.
    #[must_use]
    pub fn rule<R: Rule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Adds a boxed rule to the analyzer.
    #[must_use]
    pub fn rule_box(mut self, rule: RuleBox) -> Self {
        self.rules.push(rule);
        self
    }

    /// Adds an exclude glob pattern.
    #[must_use]
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_patterns.push(pattern.into());
        self
    }

    /// Adds multiple exclude glob patterns.
    #[must_use]
    pub fn excludes<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_patterns
            .extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets whether to fail on unloadable dumps (default: false).
    #[must_use]
    pub fn fail_on_parse_error(mut self, fail: bool) -> Self {
        self.fail_on_parse_error = fail;
        self
    }

    /// Builds the analyzer.
    ///
    /// # Errors
    ///
    /// Returns an error if the current directory cannot be determined.
    pub fn build(self) -> Result<Analyzer, AnalyzerError> {
        let root = self
            .root
            .or_else(|| self.config.as_ref().map(|c| c.analyzer.root.clone()))
            .unwrap_or_else(|| PathBuf::from("."));

        let root = if root.is_absolute() {
            root
        } else {
            std::env::current_dir()?.join(&root)
        };

        let mut exclude_patterns = self.exclude_patterns;
        if let Some(ref config) = self.config {
            exclude_patterns.extend(config.analyzer.exclude.clone());
        }

        if exclude_patterns.is_empty() {
            exclude_patterns.push("**/node_modules/**".to_string());
        }

        Ok(Analyzer {
            root,
            rules: self.rules,
            exclude_patterns,
            config: self.config.unwrap_or_default(),
            fail_on_parse_error: self.fail_on_parse_error,
        })
    }
}

/// The main analyzer that orchestrates lint execution.
///
/// Use [`Analyzer::builder()`] to construct an instance.
pub struct Analyzer {
    root: PathBuf,
    rules: Vec<RuleBox>,
    exclude_patterns: Vec<String>,
    config: Config,
    fail_on_parse_error: bool,
}

impl Analyzer {
    /// Creates a new builder for configuring an analyzer.
    #[must_use]
    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::new()
    }

    /// Returns the root directory being analyzed.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the number of registered rules.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Analyzes all dumps below the root and returns the results.
    ///
    /// # Errors
    ///
    /// Returns an error if file discovery fails, or if a dump cannot be
    /// loaded and `fail_on_parse_error` is set.
    pub fn analyze(&self) -> Result<LintResult, AnalyzerError> {
        info!("Starting analysis at {:?}", self.root);

        let mut result = LintResult::new();
        let files = self.discover_files()?;

        info!("Found {} stylesheet dumps to analyze", files.len());

        for dump_path in &files {
            match self.load_file(dump_path) {
                Ok(file) => {
                    result.violations.extend(self.analyze_source(&file));
                    result.files_checked += 1;
                }
                Err(AnalyzerError::Load { path, source }) => {
                    warn!("Failed to load {}: {}", path.display(), source);
                    if self.fail_on_parse_error {
                        return Err(AnalyzerError::Load { path, source });
                    }
                }
                Err(e) => return Err(e),
            }
        }

        result.sort();

        info!(
            "Analysis complete: {} violations in {} files",
            result.violations.len(),
            result.files_checked
        );

        Ok(result)
    }

    /// Runs every enabled rule over an already loaded stylesheet.
    #[must_use]
    pub fn analyze_source(&self, file: &SourceFile) -> Vec<Violation> {
        debug!("Analyzing: {}", file.path.display());

        let base = self.base_dir();
        let path = if file.path.is_absolute() {
            file.path.clone()
        } else {
            base.join(&file.path)
        };
        let ctx = FileContext::new(&path, &file.content, base, &self.config.separators);
        let mut violations = Vec::new();

        for rule in &self.rules {
            if !self.config.is_rule_enabled(rule.name()) {
                debug!("Skipping disabled rule: {}", rule.name());
                continue;
            }

            let rule_violations = rule.check(&ctx, &file.stylesheet);
            debug!(
                "{} reported {} violations",
                rule.name(),
                rule_violations.len()
            );
            let rule_violations = self.apply_severity_override(rule.name(), rule_violations);
            violations.extend(rule_violations);
        }

        violations
    }

    fn load_file(&self, path: &Path) -> Result<SourceFile, AnalyzerError> {
        let json = std::fs::read_to_string(path)?;
        loader::load_json(&json, path).map_err(|source| AnalyzerError::Load {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Applies severity overrides from configuration.
    fn apply_severity_override(
        &self,
        rule_name: &str,
        mut violations: Vec<Violation>,
    ) -> Vec<Violation> {
        if let Some(severity) = self.config.rule_severity(rule_name) {
            for v in &mut violations {
                v.severity = severity;
            }
        }
        violations
    }

    /// Directory that relative stylesheet paths are resolved against.
    fn base_dir(&self) -> &Path {
        if self.root.is_file() {
            self.root.parent().unwrap_or(&self.root)
        } else {
            &self.root
        }
    }

    /// Discovers all stylesheet dumps to analyze.
    ///
    /// A root that is itself a file is analyzed on its own.
    fn discover_files(&self) -> Result<Vec<PathBuf>, AnalyzerError> {
        if self.root.is_file() {
            return Ok(vec![self.root.clone()]);
        }

        let pattern = format!("{}/**/*{AST_DUMP_SUFFIX}", self.root.display());
        let mut files = Vec::new();

        for entry in glob::glob(&pattern)? {
            let path = entry.map_err(|e| AnalyzerError::Io(e.into_error()))?;

            if self.should_exclude(&path) {
                debug!("Excluding: {}", path.display());
                continue;
            }

            files.push(path);
        }

        files.sort();
        Ok(files)
    }

    /// Checks if a path should be excluded.
    fn should_exclude(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy();

        for pattern in &self.exclude_patterns {
            if let Ok(glob_pattern) = glob::Pattern::new(pattern) {
                if glob_pattern.matches(&path_str) {
                    return true;
                }
            }

            // "**/vendor/**" also matches as a plain substring
            let normalized_pattern = pattern.replace("**", "");
            if !normalized_pattern.is_empty() && path_str.contains(&normalized_pattern) {
                return true;
            }
        }

        false
    }

    /// Gets the rule configuration for a specific rule.
    #[must_use]
    pub fn rule_config(&self, rule_name: &str) -> Option<&RuleConfig> {
        self.config.rule(rule_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stylesheet::Stylesheet;
    use crate::types::{Location, Severity};

    struct EveryRule;

    impl Rule for EveryRule {
        fn name(&self) -> &'static str {
            "every-rule"
        }
        fn code(&self) -> &'static str {
            "T001"
        }
        fn check(&self, ctx: &FileContext, sheet: &Stylesheet) -> Vec<Violation> {
            sheet
                .rules()
                .into_iter()
                .map(|_| {
                    Violation::new(
                        self.code(),
                        self.name(),
                        self.default_severity(),
                        Location::new(ctx.relative_path.clone(), 1, 1),
                        "rule",
                    )
                })
                .collect()
        }
    }

    fn source_file() -> SourceFile {
        let json = r#"{
            "file": "card.css",
            "source": ".card {}",
            "root": {"type": "root", "nodes": [
                {"type": "rule", "selector": ".card", "nodes": []}
            ]}
        }"#;
        loader::load_json(json, Path::new("card.css.ast.json")).unwrap()
    }

    #[test]
    fn test_builder() {
        let analyzer = Analyzer::builder()
            .root(".")
            .exclude("**/dist/**")
            .build()
            .expect("Failed to build analyzer");

        assert!(analyzer.root().exists());
        assert_eq!(analyzer.rule_count(), 0);
    }

    #[test]
    fn test_exclude_patterns() {
        let analyzer = Analyzer::builder()
            .root(".")
            .exclude("**/node_modules/**")
            .exclude("**/vendor/**")
            .build()
            .expect("Failed to build analyzer");

        assert!(analyzer.should_exclude(Path::new("/p/node_modules/x/a.css.ast.json")));
        assert!(analyzer.should_exclude(Path::new("/p/vendor/a.css.ast.json")));
        assert!(!analyzer.should_exclude(Path::new("/p/src/a.css.ast.json")));
    }

    #[test]
    fn test_severity_override_and_disabled_rules() {
        let config =
            Config::parse("[rules.every-rule]\nseverity = \"info\"\n").expect("valid config");
        let analyzer = Analyzer::builder()
            .root("/p")
            .rule(EveryRule)
            .config(config)
            .build()
            .unwrap();
        let violations = analyzer.analyze_source(&source_file());
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].severity, Severity::Info);
        assert_eq!(violations[0].location.file, PathBuf::from("card.css"));

        let config = Config::parse("[rules.every-rule]\nenabled = false\n").unwrap();
        let analyzer = Analyzer::builder()
            .root("/p")
            .rule(EveryRule)
            .config(config)
            .build()
            .unwrap();
        assert!(analyzer.analyze_source(&source_file()).is_empty());
    }
}
