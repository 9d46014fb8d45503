//! Rule trait for defining lint rules.

use crate::context::FileContext;
use crate::stylesheet::Stylesheet;
use crate::types::{Severity, Violation};

/// A per-stylesheet lint rule.
///
/// Rules receive the whole stylesheet and usually walk its rules, resolving
/// each selector with [`resolve_nested_selector`](crate::selector::resolve_nested_selector).
///
/// # Example
///
/// ```ignore
/// use bem_lint_core::{FileContext, Rule, Stylesheet, Violation};
///
/// pub struct NoIds;
///
/// impl Rule for NoIds {
///     fn name(&self) -> &'static str { "no-ids" }
///     fn code(&self) -> &'static str { "X001" }
///
///     fn check(&self, ctx: &FileContext, sheet: &Stylesheet) -> Vec<Violation> {
///         // ...
///         Vec::new()
///     }
/// }
/// ```
pub trait Rule: Send + Sync {
    /// Returns the kebab-case name of this rule (e.g., "no-side-effects").
    fn name(&self) -> &'static str;

    /// Returns the rule code (e.g., "BEM001").
    fn code(&self) -> &'static str;

    /// Returns a brief description of what this rule checks.
    fn description(&self) -> &'static str {
        ""
    }

    /// Returns the default severity for violations from this rule.
    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    /// Whether this rule requires a reason when using allow directives.
    ///
    /// By default, rules with `Severity::Error` require a reason.
    fn requires_allow_reason(&self) -> bool {
        self.default_severity() == Severity::Error
    }

    /// Checks a single stylesheet and returns any violations found.
    fn check(&self, ctx: &FileContext, sheet: &Stylesheet) -> Vec<Violation>;
}

/// Type alias for boxed Rule trait objects.
pub type RuleBox = Box<dyn Rule>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bem::Separators;
    use crate::types::Location;
    use std::path::Path;

    struct TestRule;

    impl Rule for TestRule {
        fn name(&self) -> &'static str {
            "test-rule"
        }
        fn code(&self) -> &'static str {
            "TEST001"
        }
        fn default_severity(&self) -> Severity {
            Severity::Warning
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
                        "Test violation",
                    )
                })
                .collect()
        }
    }

    #[test]
    fn test_rule_trait() {
        let rule = TestRule;
        assert_eq!(rule.name(), "test-rule");
        assert_eq!(rule.description(), "");
        assert!(!rule.requires_allow_reason());

        let mut sheet = Stylesheet::new();
        sheet.append_rule(sheet.root(), ".a", None);
        let separators = Separators::default();
        let ctx = FileContext::new(Path::new("a.css"), "", Path::new("."), &separators);
        assert_eq!(rule.check(&ctx, &sheet).len(), 1);
    }
}
