//! Comment-based allowance directives.
//!
//! A comment placed immediately before a rule, or as its first child,
//! suppresses the named lint rules for that rule and everything nested in it:
//! ```text
//! /* bem-lint: allow(no-side-effects) reason="third-party markup" */
//! ```
//! A directive that is the first node of the stylesheet applies to the whole
//! file. `allow(all)` matches every rule.

use crate::stylesheet::{NodeId, NodeKind, Stylesheet};
use std::collections::HashSet;

/// Result of checking for allow directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowCheck {
    /// Rule is not allowed.
    Denied,
    /// Rule is allowed with optional reason.
    Allowed {
        /// The reason provided (if any).
        reason: Option<String>,
        /// The node the directive is attached to.
        scope: NodeId,
    },
}

impl AllowCheck {
    /// Returns true if allowed.
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed { .. })
    }

    /// Returns the reason if allowed.
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Allowed { reason, .. } => reason.as_deref(),
            Self::Denied => None,
        }
    }

    /// Returns the node the directive is attached to, if allowed.
    ///
    /// This is the root for a directive at the top of the file.
    #[must_use]
    pub fn scope(&self) -> Option<NodeId> {
        match self {
            Self::Allowed { scope, .. } => Some(*scope),
            Self::Denied => None,
        }
    }
}

/// Parsed allowance directive.
#[derive(Debug, Clone)]
pub struct AllowDirective {
    /// Rule names that are allowed.
    pub rules: HashSet<String>,
    /// Optional reason for the allowance.
    pub reason: Option<String>,
}

impl AllowDirective {
    fn covers(&self, rule_name: &str) -> bool {
        self.rules.contains(rule_name) || self.rules.contains("all")
    }
}

/// Checks whether `rule_name` is allowed for the node `id`.
///
/// Looks at the comment before `id` and each of its ancestors, and at the
/// first child of each.
#[must_use]
pub fn check_allow(sheet: &Stylesheet, id: NodeId, rule_name: &str) -> AllowCheck {
    let scopes = std::iter::once(id).chain(sheet.ancestors(id));
    for scope in scopes {
        let candidates = [
            sheet.prev_sibling(scope),
            sheet.children(scope).first().copied(),
        ];
        for candidate in candidates.into_iter().flatten() {
            let Some(NodeKind::Comment { text }) = sheet.kind(candidate) else {
                continue;
            };
            if let Some(directive) = parse_allow_directive(text) {
                if directive.covers(rule_name) {
                    return AllowCheck::Allowed {
                        reason: directive.reason,
                        scope,
                    };
                }
            }
        }
    }
    AllowCheck::Denied
}

/// Parses an allowance directive from a comment body.
///
/// The `/*` `*/` delimiters are optional.
#[must_use]
pub fn parse_allow_directive(comment: &str) -> Option<AllowDirective> {
    let body = comment.trim();
    let body = body.strip_prefix("/*").unwrap_or(body);
    let body = body.strip_suffix("*/").unwrap_or(body).trim();

    let directive = body.strip_prefix("bem-lint:")?.trim();
    let allow_content = directive.strip_prefix("allow(")?.trim();

    let paren_end = allow_content.find(')')?;
    let rules: HashSet<String> = allow_content[..paren_end]
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    if rules.is_empty() {
        return None;
    }

    let rest = allow_content[paren_end + 1..].trim();
    let reason = rest
        .strip_prefix("reason=")
        .map(str::trim)
        .and_then(|r| r.strip_prefix('"'))
        .and_then(|r| r.find('"').map(|end| r[..end].to_string()));

    Some(AllowDirective { rules, reason })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comment(sheet: &mut Stylesheet, parent: NodeId, text: &str) -> NodeId {
        sheet.append(parent, NodeKind::Comment { text: text.into() }, None)
    }

    #[test]
    fn test_parse_allow_directive() {
        let directive = parse_allow_directive("bem-lint: allow(no-side-effects)").unwrap();
        assert!(directive.rules.contains("no-side-effects"));
        assert!(directive.reason.is_none());
    }

    #[test]
    fn test_parse_allow_directive_with_reason_and_delimiters() {
        let directive =
            parse_allow_directive("/* bem-lint: allow(a, b) reason=\"vendor widget\" */").unwrap();
        assert!(directive.rules.contains("a"));
        assert!(directive.rules.contains("b"));
        assert_eq!(directive.reason.as_deref(), Some("vendor widget"));
    }

    #[test]
    fn test_parse_rejects_other_comments() {
        assert!(parse_allow_directive("just a note").is_none());
        assert!(parse_allow_directive("bem-lint: allow()").is_none());
    }

    #[test]
    fn test_preceding_comment_covers_subtree() {
        let mut sheet = Stylesheet::new();
        sheet.append_rule(NodeId::ROOT, ".intro", None);
        comment(&mut sheet, NodeId::ROOT, "bem-lint: allow(no-side-effects) reason=\"legacy\"");
        let block = sheet.append_rule(NodeId::ROOT, ".block", None);
        let inner = sheet.append_rule(block, "&__el", None);
        let other = sheet.append_rule(NodeId::ROOT, ".other", None);

        let check = check_allow(&sheet, inner, "no-side-effects");
        assert!(check.is_allowed());
        assert_eq!(check.reason(), Some("legacy"));
        assert_eq!(check.scope(), Some(block));
        assert_eq!(check_allow(&sheet, block, "no-side-effects").scope(), Some(block));
        assert!(!check_allow(&sheet, inner, "no-chained-entities").is_allowed());
        assert!(!check_allow(&sheet, other, "no-side-effects").is_allowed());
    }

    #[test]
    fn test_first_child_comment() {
        let mut sheet = Stylesheet::new();
        let first = sheet.append_rule(NodeId::ROOT, ".first", None);
        let block = sheet.append_rule(NodeId::ROOT, ".block", None);
        comment(&mut sheet, block, "bem-lint: allow(all)");
        let inner = sheet.append_rule(block, "&__el", None);

        assert!(check_allow(&sheet, inner, "anything").is_allowed());
        assert_eq!(check_allow(&sheet, inner, "anything").reason(), None);
        assert_eq!(check_allow(&sheet, inner, "anything").scope(), Some(block));
        assert!(!check_allow(&sheet, first, "anything").is_allowed());
    }

    #[test]
    fn test_leading_comment_covers_file() {
        let mut sheet = Stylesheet::new();
        comment(&mut sheet, NodeId::ROOT, "bem-lint: allow(no-chained-entities)");
        let block = sheet.append_rule(NodeId::ROOT, ".block", None);
        let later = sheet.append_rule(NodeId::ROOT, ".later", None);
        assert!(check_allow(&sheet, block, "no-chained-entities").is_allowed());
        assert!(check_allow(&sheet, later, "no-chained-entities").is_allowed());
        assert_eq!(
            check_allow(&sheet, later, "no-chained-entities").scope(),
            Some(NodeId::ROOT)
        );
    }
}
