//! Splitting class selectors into BEM parts.

use super::Separators;
use crate::selector::{adjust_source, parse_selector, AdjustedNode, ResolvedSelector, SelectorNodeKind};
use std::fmt;
use std::ops::Range;

/// Which part of a BEM name a [`BemPart`] is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BemPartKind {
    /// `block`.
    Block,
    /// `block__element`.
    Element,
    /// `block--modifier`.
    ModifierName,
    /// `block--modifier--value`.
    ModifierValue,
}

impl fmt::Display for BemPartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Block => write!(f, "block"),
            Self::Element => write!(f, "element"),
            Self::ModifierName => write!(f, "modifier"),
            Self::ModifierValue => write!(f, "modifier value"),
        }
    }
}

/// One part of a BEM class name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BemPart {
    /// The part's text, without separator.
    pub value: String,
    /// The separator written before the part (empty for the block).
    pub separator: String,
    /// The class node the part belongs to.
    pub node: AdjustedNode,
    /// Byte offset of [`value`](Self::value) within the node's text
    /// (which starts with `.`).
    pub offset: usize,
}

impl BemPart {
    /// Position of the part in the resolved selector text.
    #[must_use]
    pub fn resolved_range(&self) -> Option<Range<usize>> {
        let meta = self.node.meta?;
        let start = meta.resolved_index + self.offset;
        Some(start..start + self.value.len())
    }

    /// Position of the part relative to the reporting node's start.
    ///
    /// A part produced by `&` substitution maps to the `&`.
    #[must_use]
    pub fn source_range(&self, resolved: &ResolvedSelector) -> Option<Range<usize>> {
        let meta = self.node.meta?;
        let range = resolved.header_range(self.resolved_range()?)?;
        Some(range.start + meta.context_offset..range.end + meta.context_offset)
    }
}

/// A modifier and its optional value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BemModifier {
    /// Modifier name.
    pub name: BemPart,
    /// Modifier value.
    pub value: Option<BemPart>,
}

/// A class name split into BEM parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BemEntity {
    /// The block (always present).
    pub block: BemPart,
    /// The element, if any.
    pub element: Option<BemPart>,
    /// The modifier, if any.
    pub modifier: Option<BemModifier>,
}

impl BemEntity {
    /// The class node the entity was read from.
    #[must_use]
    pub fn node(&self) -> &AdjustedNode {
        &self.block.node
    }

    /// The full class name, without `.`.
    #[must_use]
    pub fn class_name(&self) -> &str {
        &self.block.node.node.value
    }

    /// Block and element names, ignoring the modifier.
    #[must_use]
    pub fn base(&self) -> (&str, Option<&str>) {
        (
            &self.block.value,
            self.element.as_ref().map(|e| e.value.as_str()),
        )
    }

    /// Returns the deepest part present: modifier value, then modifier
    /// name, then element, then block.
    #[must_use]
    pub fn most_specific_part(&self) -> (&BemPart, BemPartKind) {
        if let Some(modifier) = &self.modifier {
            if let Some(value) = &modifier.value {
                return (value, BemPartKind::ModifierValue);
            }
            return (&modifier.name, BemPartKind::ModifierName);
        }
        if let Some(element) = &self.element {
            return (element, BemPartKind::Element);
        }
        (&self.block, BemPartKind::Block)
    }
}

/// Extracts one entity per class in the top-level compound selectors.
///
/// `nodes` may be a selector list or a flat member list. Pseudo-class
/// arguments are not searched. Classes that do not start with a letter are
/// skipped.
#[must_use]
pub fn resolve_bem_entities(nodes: &[AdjustedNode], separators: &Separators) -> Vec<BemEntity> {
    let mut entities = Vec::new();
    collect(nodes, separators, &mut entities);
    entities
}

/// Parses `selector` and extracts its entities.
#[must_use]
pub fn resolve_bem_entities_from_str(selector: &str, separators: &Separators) -> Vec<BemEntity> {
    let resolved = ResolvedSelector::literal(selector, 0);
    let nodes = adjust_source(&parse_selector(selector), &resolved, 0);
    resolve_bem_entities(&nodes, separators)
}

fn collect(nodes: &[AdjustedNode], separators: &Separators, out: &mut Vec<BemEntity>) {
    for node in nodes {
        match node.node.kind {
            SelectorNodeKind::Selector => collect(&node.children, separators, out),
            SelectorNodeKind::Class => out.extend(entity_for(node, separators)),
            _ => {}
        }
    }
}

struct Span {
    kind: BemPartKind,
    separator: Range<usize>,
    value: Range<usize>,
}

fn entity_for(node: &AdjustedNode, separators: &Separators) -> Option<BemEntity> {
    let class = node.node.value.as_str();
    if !class.chars().next().is_some_and(char::is_alphabetic) {
        return None;
    }

    let base = node.node.value_offset();
    let part = |span: &Span| BemPart {
        value: class[span.value.clone()].to_string(),
        separator: class[span.separator.clone()].to_string(),
        node: node.clone(),
        offset: base + span.value.start,
    };
    let find = |kind: BemPartKind, spans: &[Span]| {
        spans
            .iter()
            .find(|s| s.kind == kind && !s.value.is_empty())
            .map(part)
    };

    let spans = tokenize(class, separators);
    let block = find(BemPartKind::Block, &spans)?;
    let element = find(BemPartKind::Element, &spans);
    let modifier = find(BemPartKind::ModifierName, &spans).map(|name| BemModifier {
        name,
        value: find(BemPartKind::ModifierValue, &spans),
    });

    Some(BemEntity {
        block,
        element,
        modifier,
    })
}

/// Splits a class name into parts.
///
/// Separators are matched longest first. Once in a part, only separators
/// that lead to a later part are recognised, so `block--mod--value` works
/// even when the modifier and value separators are the same.
fn tokenize(class: &str, separators: &Separators) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut state = BemPartKind::Block;
    let mut separator = 0..0;
    let mut value_start = 0;
    let mut i = 0;

    while i < class.len() {
        let rest = &class[i..];
        let candidates: Vec<(&str, BemPartKind)> = match state {
            BemPartKind::Block => vec![
                (separators.element.as_str(), BemPartKind::Element),
                (separators.modifier.as_str(), BemPartKind::ModifierName),
            ],
            BemPartKind::Element => vec![(separators.modifier.as_str(), BemPartKind::ModifierName)],
            BemPartKind::ModifierName => vec![(
                separators.modifier_value.as_str(),
                BemPartKind::ModifierValue,
            )],
            BemPartKind::ModifierValue => Vec::new(),
        };
        let next = candidates
            .iter()
            .filter(|(sep, _)| !sep.is_empty() && rest.starts_with(sep))
            .max_by_key(|(sep, _)| sep.len());

        if let Some(&(sep, kind)) = next {
            spans.push(Span {
                kind: state,
                separator,
                value: value_start..i,
            });
            state = kind;
            separator = i..i + sep.len();
            i += sep.len();
            value_start = i;
        } else {
            i += rest.chars().next().map_or(1, char::len_utf8);
        }
    }

    spans.push(Span {
        kind: state,
        separator,
        value: value_start..class.len(),
    });
    spans
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selector::{parse_resolved, resolve_nested_selector};
    use crate::stylesheet::{NodeId, Stylesheet};

    fn entities(selector: &str) -> Vec<BemEntity> {
        resolve_bem_entities_from_str(selector, &Separators::default())
    }

    fn only(selector: &str) -> BemEntity {
        let mut found = entities(selector);
        assert_eq!(found.len(), 1, "{selector}");
        found.remove(0)
    }

    #[test]
    fn block_modifier_value() {
        let entity = only(".block--modifier--value");
        assert_eq!(entity.block.value, "block");
        assert!(entity.element.is_none());
        let modifier = entity.modifier.as_ref().unwrap();
        assert_eq!(modifier.name.value, "modifier");
        assert_eq!(modifier.name.separator, "--");
        assert_eq!(modifier.value.as_ref().unwrap().value, "value");

        let (part, kind) = entity.most_specific_part();
        assert_eq!(kind, BemPartKind::ModifierValue);
        assert_eq!(part.value, "value");
    }

    #[test]
    fn element_and_modifier_offsets() {
        let entity = only(".block__el--mod");
        let element = entity.element.as_ref().unwrap();
        assert_eq!(element.value, "el");
        assert_eq!(element.offset, 8);
        let modifier = entity.modifier.as_ref().unwrap();
        assert_eq!(modifier.name.offset, 12);
        assert!(modifier.value.is_none());
        assert_eq!(entity.most_specific_part().1, BemPartKind::ModifierName);
        assert_eq!(entity.base(), ("block", Some("el")));
    }

    #[test]
    fn most_specific_falls_back_to_block() {
        assert_eq!(only(".block__el").most_specific_part().1, BemPartKind::Element);
        assert_eq!(only(".block").most_specific_part().1, BemPartKind::Block);
    }

    #[test]
    fn one_entity_per_class() {
        let found = entities(".a.b__c > .d, .e");
        let names: Vec<&str> = found.iter().map(BemEntity::class_name).collect();
        assert_eq!(names, vec!["a", "b__c", "d", "e"]);
    }

    #[test]
    fn skips_non_identifier_classes_and_pseudo_arguments() {
        assert!(entities(".-x").is_empty());
        assert!(entities(".\\31 col").is_empty());
        let found = entities(".a:not(.b)");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].class_name(), "a");
    }

    #[test]
    fn empty_parts_are_dropped() {
        let entity = only(".block--");
        assert!(entity.modifier.is_none());
        let entity = only(".block__--mod");
        assert!(entity.element.is_none());
        assert_eq!(entity.modifier.unwrap().name.value, "mod");
    }

    #[test]
    fn custom_separators() {
        let separators = Separators {
            element: "-".into(),
            modifier: "_".into(),
            modifier_value: "_".into(),
        };
        let found = resolve_bem_entities_from_str(".block-el_mod_val", &separators);
        let entity = &found[0];
        assert_eq!(entity.element.as_ref().unwrap().value, "el");
        let modifier = entity.modifier.as_ref().unwrap();
        assert_eq!(modifier.name.value, "mod");
        assert_eq!(modifier.value.as_ref().unwrap().value, "val");
    }

    #[test]
    fn longest_separator_wins() {
        let separators = Separators {
            element: "-".into(),
            modifier: "--".into(),
            modifier_value: "_".into(),
        };
        let found = resolve_bem_entities_from_str(".block--mod", &separators);
        assert!(found[0].element.is_none());
        assert_eq!(found[0].modifier.as_ref().unwrap().name.value, "mod");
    }

    #[test]
    fn part_source_range_through_nesting() {
        let mut sheet = Stylesheet::new();
        let parent = sheet.append_rule(NodeId::ROOT, ".card", None);
        let child = sheet.append_rule(parent, "&__title--big", None);
        let resolved = resolve_nested_selector(&sheet, child);
        let nodes = parse_resolved(&resolved[0], 0);
        let found = resolve_bem_entities(&nodes, &Separators::default());
        let element = found[0].element.as_ref().unwrap();
        assert_eq!(element.resolved_range(), Some(7..12));
        assert_eq!(element.source_range(&resolved[0]), Some(3..8));
        let block = &found[0].block;
        assert_eq!(block.source_range(&resolved[0]), Some(0..1));
    }
}
