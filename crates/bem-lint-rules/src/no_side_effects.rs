//! Rule to keep a block's selectors inside the block.
//!
//! # Rationale
//!
//! Once a selector names a BEM block, everything it goes on to select should
//! belong to that block. `.card .card__title` is fine; `.card .button` and
//! `.card h2` reach into markup the block does not own, so the rule leaks
//! styles into whatever happens to be rendered inside a card.
//!
//! Nested rules are checked after resolution, so
//!
//! ```css
//! .card {
//!   .button { }
//! }
//! ```
//!
//! is reported on `.button` just like `.card .button` would be.
//!
//! # Configuration
//!
//! - `ignore`: regular expressions; matching segments are never reported
//! - `check_pseudo_arguments`: also check `:is()`/`:where()` arguments (default: true)
//!
//! # Suppression
//!
//! - `/* bem-lint: allow(no-side-effects) reason="..." */` before the rule

use crate::report::{self, Allowance};
use bem_lint_core::bem::resolve_bem_entities;
use bem_lint_core::selector::{parse_resolved, resolve_nested_selector, segments, AdjustedNode, SelectorNodeKind};
use bem_lint_core::{
    ConfigError, FileContext, IgnorePatterns, NodeId, Rule, RuleConfig, Separators, Severity,
    Stylesheet, Suggestion, Violation, ViolationRegistry,
};

/// Rule code for no-side-effects.
pub const CODE: &str = "BEM001";

/// Rule name for no-side-effects.
pub const NAME: &str = "no-side-effects";

/// Pseudo-classes whose arguments select the same element.
const MATCHING_PSEUDOS: &[&str] = &["is", "where"];

/// Forbids selectors that style outside the block they start from.
#[derive(Debug, Clone)]
pub struct NoSideEffects {
    /// Segments matching any of these are not reported.
    pub ignore: IgnorePatterns,
    /// Check the arguments of `:is()` and `:where()`.
    pub check_pseudo_arguments: bool,
    /// Custom severity.
    pub severity: Severity,
}

impl Default for NoSideEffects {
    fn default() -> Self {
        Self::new()
    }
}

impl NoSideEffects {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            ignore: IgnorePatterns::default(),
            check_pseudo_arguments: true,
            severity: Severity::Error,
        }
    }

    /// Sets the ignore patterns.
    #[must_use]
    pub fn ignore(mut self, ignore: IgnorePatterns) -> Self {
        self.ignore = ignore;
        self
    }

    /// Sets whether `:is()`/`:where()` arguments are checked.
    #[must_use]
    pub fn check_pseudo_arguments(mut self, check: bool) -> Self {
        self.check_pseudo_arguments = check;
        self
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Applies the options of a `[rules.no-side-effects]` table.
    ///
    /// # Errors
    ///
    /// Returns an error if an `ignore` entry is not a valid regex.
    pub fn configure(self, config: &RuleConfig) -> Result<Self, ConfigError> {
        let check = config.get_bool("check_pseudo_arguments", self.check_pseudo_arguments);
        Ok(self
            .ignore(config.ignore_patterns(NAME)?)
            .check_pseudo_arguments(check))
    }

    fn check_members(&self, members: &[AdjustedNode], inherited: Option<&str>, out: &mut Collector) {
        let mut block = inherited.map(str::to_string);
        for segment in segments(members) {
            let entities = resolve_bem_entities(segment, out.separators);
            let Some(name) = block.clone() else {
                // Segments before the first block are context, not side effects.
                block = entities.first().map(|e| e.block.value.clone());
                continue;
            };

            if authored_here(segment) && !entities.iter().any(|e| e.block.value == name) {
                out.report(segment, &name);
            }

            if self.check_pseudo_arguments {
                for node in segment.iter().filter(|n| is_matching_pseudo(n)) {
                    for argument in &node.children {
                        self.check_members(&argument.children, Some(&name), out);
                    }
                }
            }
        }
    }
}

impl Rule for NoSideEffects {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Forbids selectors that style elements outside their BEM block"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn check(&self, ctx: &FileContext, sheet: &Stylesheet) -> Vec<Violation> {
        let mut violations = Vec::new();
        let mut registry = ViolationRegistry::new(sheet, &self.ignore);
        let mut blocks = Vec::new();

        for id in sheet.rules() {
            match report::allowance(ctx, sheet, id, CODE, NAME, self.requires_allow_reason()) {
                Allowance::Check => {}
                Allowance::Skip(warning) => {
                    violations.extend(warning);
                    continue;
                }
            }

            let mut out = Collector {
                owner: id,
                separators: ctx.separators,
                registry: &mut registry,
                blocks: &mut blocks,
            };
            for resolved in resolve_nested_selector(sheet, id) {
                for group in parse_resolved(&resolved, 0) {
                    self.check_members(&group.children, None, &mut out);
                }
            }
        }

        let records = registry.into_violations();
        for (record, block) in records.into_iter().zip(blocks) {
            let location =
                report::location(ctx, sheet, record.owner, record.index..record.end_index);
            violations.push(
                Violation::new(
                    CODE,
                    NAME,
                    self.severity,
                    location,
                    format!("`{}` is outside block `{block}`", record.selector),
                )
                .with_suggestion(Suggestion::new(format!(
                    "Style it from its own block, or make it an element of `{block}`"
                ))),
            );
        }

        violations
    }
}

/// Accumulates findings for one rule node.
struct Collector<'r, 'a> {
    owner: NodeId,
    separators: &'r Separators,
    registry: &'r mut ViolationRegistry<'a>,
    blocks: &'r mut Vec<String>,
}

impl Collector<'_, '_> {
    fn report(&mut self, segment: &[AdjustedNode], block: &str) {
        if self.registry.add_violation(self.owner, segment) {
            self.blocks.push(block.to_string());
        }
    }
}

/// True if the segment selects something written in the rule itself.
///
/// Pseudo-only segments select nothing new, and text copied in from a
/// parent is the parent's responsibility.
fn authored_here(segment: &[AdjustedNode]) -> bool {
    segment.iter().any(|n| {
        !matches!(
            n.node.kind,
            SelectorNodeKind::PseudoClass | SelectorNodeKind::PseudoElement | SelectorNodeKind::Comment
        ) && n.meta.is_some_and(|m| m.literal)
    })
}

fn is_matching_pseudo(node: &AdjustedNode) -> bool {
    node.node.has_arguments()
        && node
            .node
            .pseudo_name()
            .is_some_and(|name| MATCHING_PSEUDOS.contains(&name.as_str()))
}
