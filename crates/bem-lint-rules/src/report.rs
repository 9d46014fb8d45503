//! Helpers shared by the built-in rules for turning findings into violations.

use bem_lint_core::utils::check_allow;
use bem_lint_core::{
    AllowCheck, FileContext, Location, NodeId, Severity, Stylesheet, Suggestion, Violation,
};
use std::ops::Range;

/// Outcome of looking for an allow directive around a rule node.
pub(crate) enum Allowance {
    /// No directive; check the node.
    Check,
    /// Suppressed; skip the node, optionally reporting a missing reason.
    Skip(Option<Violation>),
}

/// Looks up allow directives for `id`.
///
/// When the rule demands a reason and the directive has none, the skip
/// carries a warning telling the author to add one. The warning is attached
/// only to the first rule the directive covers, so nested rules under the
/// same directive stay quiet.
pub(crate) fn allowance(
    ctx: &FileContext,
    sheet: &Stylesheet,
    id: NodeId,
    code: &str,
    name: &str,
    requires_reason: bool,
) -> Allowance {
    let allow = check_allow(sheet, id, name);
    if !allow.is_allowed() {
        return Allowance::Check;
    }
    if requires_reason && allow.reason().is_none() && first_covered(sheet, &allow) == Some(id) {
        let warning = Violation::new(
            code,
            name,
            Severity::Warning,
            location(ctx, sheet, id, 0..0),
            format!("Allow directive for '{name}' is missing required reason"),
        )
        .with_suggestion(Suggestion::new(
            "Add reason=\"...\" to explain why this exception is necessary",
        ));
        return Allowance::Skip(Some(warning));
    }
    Allowance::Skip(None)
}

/// The first rule, in document order, within the directive's scope.
fn first_covered(sheet: &Stylesheet, allow: &AllowCheck) -> Option<NodeId> {
    let scope = allow.scope()?;
    sheet
        .rules()
        .into_iter()
        .find(|&rule| sheet.is_self_or_ancestor(scope, rule))
}

/// Location of `range` (relative to the start of `owner`).
///
/// Nodes the host gave no position for are reported at the top of the file.
pub(crate) fn location(
    ctx: &FileContext,
    sheet: &Stylesheet,
    owner: NodeId,
    range: Range<usize>,
) -> Location {
    ctx.node_location(sheet, owner, range)
        .unwrap_or_else(|| Location::new(ctx.relative_path.clone(), 1, 1))
}
