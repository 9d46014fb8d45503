//! Rule presets for common configurations.

use crate::{NoChainedEntities, NoSideEffects};
use bem_lint_core::{Config, ConfigError, RuleBox, Severity};

/// Preset configurations for bem-lint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// Recommended rules with sensible defaults.
    Recommended,
    /// Every rule at error severity.
    Strict,
    /// Side-effect checking only, for gradual adoption.
    Minimal,
}

impl Preset {
    /// Returns the rules for this preset.
    #[must_use]
    pub fn rules(self) -> Vec<RuleBox> {
        match self {
            Self::Recommended => recommended_rules(),
            Self::Strict => strict_rules(),
            Self::Minimal => minimal_rules(),
        }
    }

    fn no_side_effects(self) -> NoSideEffects {
        match self {
            Self::Recommended | Self::Strict => NoSideEffects::new(),
            Self::Minimal => NoSideEffects::new().check_pseudo_arguments(false),
        }
    }

    fn no_chained_entities(self) -> Option<NoChainedEntities> {
        match self {
            Self::Recommended => Some(NoChainedEntities::new()),
            Self::Strict => Some(NoChainedEntities::new().severity(Severity::Error)),
            Self::Minimal => None,
        }
    }
}

impl std::str::FromStr for Preset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "recommended" => Ok(Self::Recommended),
            "strict" => Ok(Self::Strict),
            "minimal" => Ok(Self::Minimal),
            other => Err(format!("unknown preset: {other}")),
        }
    }
}

/// Returns the recommended set of rules.
///
/// Includes:
/// - `no-side-effects` (BEM001) - error
/// - `no-chained-entities` (BEM002) - warning
#[must_use]
pub fn recommended_rules() -> Vec<RuleBox> {
    vec![
        Box::new(NoSideEffects::new()),
        Box::new(NoChainedEntities::new()),
    ]
}

/// Returns the strict set of rules: every rule at error severity.
#[must_use]
pub fn strict_rules() -> Vec<RuleBox> {
    vec![
        Box::new(NoSideEffects::new()),
        Box::new(NoChainedEntities::new().severity(Severity::Error)),
    ]
}

/// Returns the minimal set of rules.
///
/// For gradual adoption, only includes `no-side-effects` without
/// `:is()`/`:where()` argument checking.
#[must_use]
pub fn minimal_rules() -> Vec<RuleBox> {
    vec![Box::new(NoSideEffects::new().check_pseudo_arguments(false))]
}

/// Returns all available rules.
#[must_use]
pub fn all_rules() -> Vec<RuleBox> {
    vec![
        Box::new(NoSideEffects::new()),
        Box::new(NoChainedEntities::new()),
    ]
}

/// Builds the rules selected by `config.preset` with each rule's options
/// applied.
///
/// # Errors
///
/// Returns an error for an unknown preset or invalid rule options.
pub fn configured_rules(config: &Config) -> Result<Vec<RuleBox>, ConfigError> {
    let preset = match config.preset.as_deref() {
        None => Preset::Recommended,
        Some(name) => name.parse().map_err(|_| ConfigError::InvalidValue {
            key: "preset".to_string(),
            value: name.to_string(),
        })?,
    };

    let mut side_effects = preset.no_side_effects();
    if let Some(rule_config) = config.rule(crate::no_side_effects::NAME) {
        side_effects = side_effects.configure(rule_config)?;
    }

    let mut rules: Vec<RuleBox> = vec![Box::new(side_effects)];
    if let Some(rule) = preset.no_chained_entities() {
        rules.push(Box::new(rule));
    }
    Ok(rules)
}
