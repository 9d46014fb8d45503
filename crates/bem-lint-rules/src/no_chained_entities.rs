//! Rule to forbid compound selectors that mix BEM entities.
//!
//! # Rationale
//!
//! `.card.button` or `.card__title.card__icon` only match markup where two
//! entities share one element, which couples them. Modifiers are expected to
//! be chained with their own entity (`.card.card--big`) and are fine.
//!
//! # Suppression
//!
//! - `/* bem-lint: allow(no-chained-entities) */` before the rule

use crate::report::{self, Allowance};
use bem_lint_core::bem::{resolve_bem_entities, BemPartKind};
use bem_lint_core::selector::{
    parse_resolved, resolve_nested_selector, segments, AdjustedNode, ResolvedSelector,
};
use bem_lint_core::{
    FileContext, IgnorePatterns, Label, NodeId, Rule, Severity, Stylesheet, Suggestion, Violation,
    ViolationRegistry,
};
use std::ops::{Range, RangeInclusive};

/// Rule code for no-chained-entities.
pub const CODE: &str = "BEM002";

/// Rule name for no-chained-entities.
pub const NAME: &str = "no-chained-entities";

/// Forbids chaining classes of different blocks or elements.
#[derive(Debug, Clone)]
pub struct NoChainedEntities {
    /// Custom severity.
    pub severity: Severity,
}

impl Default for NoChainedEntities {
    fn default() -> Self {
        Self::new()
    }
}

impl NoChainedEntities {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            severity: Severity::Warning,
        }
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

struct Finding {
    compound: String,
    at: Option<Range<usize>>,
    first: String,
    first_range: Option<Range<usize>>,
    kind: BemPartKind,
    part: String,
    part_range: Option<Range<usize>>,
}

impl Rule for NoChainedEntities {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Forbids compound selectors that chain different BEM entities"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn check(&self, ctx: &FileContext, sheet: &Stylesheet) -> Vec<Violation> {
        let mut violations = Vec::new();
        let ignore = IgnorePatterns::default();
        let mut registry = ViolationRegistry::new(sheet, &ignore);
        let mut findings = Vec::new();

        for id in sheet.rules() {
            match report::allowance(ctx, sheet, id, CODE, NAME, self.requires_allow_reason()) {
                Allowance::Check => {}
                Allowance::Skip(warning) => {
                    violations.extend(warning);
                    continue;
                }
            }

            for resolved in resolve_nested_selector(sheet, id) {
                for group in parse_resolved(&resolved, 0) {
                    for segment in segments(&group.children) {
                        let Some((finding, run)) = chained(segment, &resolved, ctx) else {
                            continue;
                        };
                        if registry.add_violation(id, &segment[run]) {
                            findings.push(finding);
                        }
                    }
                }
            }
        }

        for (record, finding) in registry.into_violations().into_iter().zip(findings) {
            let range = finding.at.unwrap_or(record.index..record.end_index);
            let location = report::location(ctx, sheet, record.owner, range);
            let mut violation = Violation::new(
                CODE,
                NAME,
                self.severity,
                location,
                format!(
                    "`{}` chains {} `{}` onto `{}`",
                    finding.compound, finding.kind, finding.part, finding.first
                ),
            );
            if let Some(range) = finding.first_range {
                violation = violation.with_label(bem_label(ctx, sheet, record.owner, range, &finding.first));
            }
            let help = format!(
                "Give `{}` its own rule, or turn it into a modifier of `{}`",
                finding.part, finding.first
            );
            let suggestion = match finding.part_range {
                Some(range) => {
                    Suggestion::targeting(help, report::location(ctx, sheet, record.owner, range))
                }
                None => Suggestion::new(help),
            };
            violations.push(violation.with_suggestion(suggestion));
        }

        violations
    }
}

/// Finds the first entity of `segment` whose block or element differs from
/// the segment's first entity.
///
/// Also returns the run of `segment` from the first entity through the
/// offending one; repeats are recognised by that run's text.
fn chained(
    segment: &[AdjustedNode],
    resolved: &ResolvedSelector,
    ctx: &FileContext,
) -> Option<(Finding, RangeInclusive<usize>)> {
    let entities = resolve_bem_entities(segment, ctx.separators);
    let first = entities.first()?;
    let second = entities.iter().find(|e| e.base() != first.base())?;
    let (part, kind) = second.most_specific_part();
    let start = segment.iter().position(|n| n == first.node())?;
    let end = segment.iter().position(|n| n == second.node())?;

    let compound: String = segment.iter().map(ToString::to_string).collect();
    let finding = Finding {
        compound: compound.trim().to_string(),
        at: second.node().meta.map(|m| m.source_range()),
        first: first.class_name().to_string(),
        first_range: first.block.node.meta.map(|m| m.source_range()),
        kind,
        part: part.value.clone(),
        part_range: part.source_range(resolved),
    };
    Some((finding, start..=end))
}

fn bem_label(
    ctx: &FileContext,
    sheet: &Stylesheet,
    owner: NodeId,
    range: Range<usize>,
    class: &str,
) -> Label {
    Label::new(
        report::location(ctx, sheet, owner, range),
        format!("`{class}` starts the compound here"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use bem_lint_core::stylesheet::{Position, SourceSpan};
    use bem_lint_core::Separators;
    use std::path::Path;

    fn span(line: usize, column: usize, offset: usize) -> Option<SourceSpan> {
        let start = Position {
            line,
            column,
            offset,
        };
        Some(SourceSpan { start, end: start })
    }

    fn run(sheet: &Stylesheet, content: &str) -> Vec<Violation> {
        let separators = Separators::default();
        let ctx = FileContext::new(Path::new("a.css"), content, Path::new(""), &separators);
        NoChainedEntities::new().check(&ctx, sheet)
    }

    #[test]
    fn reports_second_block() {
        let content = ".card.button {}\n";
        let mut sheet = Stylesheet::new();
        sheet.append_rule(NodeId::ROOT, ".card.button", span(1, 1, 0));

        let violations = run(&sheet, content);
        assert_eq!(violations.len(), 1);
        let v = &violations[0];
        assert_eq!(v.message, "`.card.button` chains block `button` onto `card`");
        assert_eq!((v.location.line, v.location.column), (1, 6));
        assert_eq!(v.severity, Severity::Warning);
        assert_eq!(v.labels.len(), 1);
        let target = v.suggestion.as_ref().and_then(|s| s.target.as_ref()).unwrap();
        assert_eq!(&content[target.offset..target.offset + target.length], "button");
    }

    #[test]
    fn modifiers_of_the_same_entity_are_fine() {
        let mut sheet = Stylesheet::new();
        sheet.append_rule(NodeId::ROOT, ".card.card--big:hover", span(1, 1, 0));
        sheet.append_rule(NodeId::ROOT, ".card__a.card__a--x--y", span(2, 1, 22));
        assert!(run(&sheet, "").is_empty());
    }

    #[test]
    fn reports_sibling_elements_with_most_specific_part() {
        let content = ".card__a.card__b--on {}\n";
        let mut sheet = Stylesheet::new();
        sheet.append_rule(NodeId::ROOT, ".card__a.card__b--on", span(1, 1, 0));
        let violations = run(&sheet, content);
        assert_eq!(violations.len(), 1);
        assert_eq!(
            violations[0].message,
            "`.card__a.card__b--on` chains modifier `on` onto `card__a`"
        );
    }

    #[test]
    fn each_compound_of_a_list_is_reported() {
        let content = ".a.button, .b.button {}\n";
        let mut sheet = Stylesheet::new();
        sheet.append_rule(NodeId::ROOT, ".a.button, .b.button", span(1, 1, 0));

        let violations = run(&sheet, content);
        let found: Vec<_> = violations
            .iter()
            .map(|v| (v.location.column, v.message.as_str()))
            .collect();
        assert_eq!(
            found,
            [
                (3, "`.a.button` chains block `button` onto `a`"),
                (14, "`.b.button` chains block `button` onto `b`"),
            ]
        );
    }

    #[test]
    fn nested_compound_with_different_text_is_reported() {
        // .card.button {
        //   .x.button {}
        // }
        let content = ".card.button {\n  .x.button {}\n}\n";
        let mut sheet = Stylesheet::new();
        let outer = sheet.append_rule(NodeId::ROOT, ".card.button", span(1, 1, 0));
        sheet.append_rule(outer, ".x.button", span(2, 3, 17));

        let violations = run(&sheet, content);
        let found: Vec<_> = violations
            .iter()
            .map(|v| (v.location.line, v.location.column, v.message.as_str()))
            .collect();
        assert_eq!(
            found,
            [
                (1, 6, "`.card.button` chains block `button` onto `card`"),
                (2, 5, "`.x.button` chains block `button` onto `x`"),
            ]
        );
    }

    #[test]
    fn nested_chain_is_reported_once() {
        // .card {
        //   &.button {
        //     &:hover {}
        //   }
        // }
        let content = ".card {\n  &.button {\n    &:hover {}\n  }\n}\n";
        let mut sheet = Stylesheet::new();
        let card = sheet.append_rule(NodeId::ROOT, ".card", span(1, 1, 0));
        let button = sheet.append_rule(card, "&.button", span(2, 3, 10));
        sheet.append_rule(button, "&:hover", span(3, 5, 25));

        let violations = run(&sheet, content);
        assert_eq!(violations.len(), 1, "{violations:?}");
        assert_eq!((violations[0].location.line, violations[0].location.column), (2, 4));
    }
}
