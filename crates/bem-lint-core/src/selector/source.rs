//! Mapping parsed nodes of a resolved selector back to the source.

use super::node::{AsSelectorNode, SelectorNode};
use super::parser::parse_selector;
use super::resolve::ResolvedSelector;
use serde::Serialize;
use std::fmt;
use std::ops::Range;

/// Where a node of a resolved selector sits in the stylesheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SourceMeta {
    /// Start of the node in the resolved text.
    pub resolved_index: usize,
    /// Start of the node in the rule's own selector.
    pub resolved_source_index: usize,
    /// Length of the node's source text (covers the whole `&` when the node
    /// overlaps substituted text).
    pub source_length: usize,
    /// Offset of the rule's selector within its raw header.
    pub source_offset: usize,
    /// Distance from the reporting node to the rule header.
    pub context_offset: usize,
    /// True when the node was copied verbatim from the rule's selector.
    pub literal: bool,
}

impl SourceMeta {
    /// Byte range of the node relative to the reporting node's start.
    #[must_use]
    pub fn source_range(&self) -> Range<usize> {
        let start = self.resolved_source_index + self.source_offset + self.context_offset;
        start..start + self.source_length
    }
}

/// A selector node annotated with its source position.
///
/// `meta` is `None` for nodes that exist only in the implicit parent prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdjustedNode {
    /// The parsed node.
    pub node: SelectorNode,
    /// Source position, when the node has one.
    pub meta: Option<SourceMeta>,
    /// Annotated children, parallel to `node.children`.
    pub children: Vec<AdjustedNode>,
}

impl AsSelectorNode for AdjustedNode {
    fn selector_node(&self) -> &SelectorNode {
        &self.node
    }

    fn child_nodes(&self) -> &[Self] {
        &self.children
    }
}

impl fmt::Display for AdjustedNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.node.fmt(f)
    }
}

/// Parses a resolved selector and annotates the result.
#[must_use]
pub fn parse_resolved(resolved: &ResolvedSelector, context_offset: usize) -> Vec<AdjustedNode> {
    adjust_source(&parse_selector(&resolved.text), resolved, context_offset)
}

/// Annotates nodes parsed from `resolved.text` with source positions.
///
/// Nodes are visited in document order while a cursor over the resolved
/// selector's pieces is threaded through, so each piece is passed once.
#[must_use]
pub fn adjust_source(
    nodes: &[SelectorNode],
    resolved: &ResolvedSelector,
    context_offset: usize,
) -> Vec<AdjustedNode> {
    let env = Env {
        resolved,
        context_offset,
    };
    let (adjusted, _) = env.adjust_level(nodes, 0, 0);
    adjusted
}

struct Env<'a> {
    resolved: &'a ResolvedSelector,
    context_offset: usize,
}

impl Env<'_> {
    /// Annotates one sibling list. `base` is the absolute resolved position
    /// that the siblings' `source_index` values are relative to.
    fn adjust_level(
        &self,
        nodes: &[SelectorNode],
        base: usize,
        mut cursor: usize,
    ) -> (Vec<AdjustedNode>, usize) {
        let mut out = Vec::with_capacity(nodes.len());
        for node in nodes {
            let start = base + node.source_index;
            let end = start + node.text_len();

            let first = self.resolved.locate(cursor, start);
            if let Some(first) = first {
                cursor = first;
            }

            let child_base = if node.has_arguments() {
                start + node.value.len() + 1
            } else {
                base
            };
            let (children, after_children) = self.adjust_level(&node.children, child_base, cursor);
            cursor = after_children;

            let last = end
                .checked_sub(1)
                .and_then(|pos| self.resolved.locate(cursor, pos));
            let meta = match (first, last) {
                (Some(first), Some(last)) => {
                    cursor = last;
                    self.meta(start, end, first, last)
                }
                _ => None,
            };

            out.push(AdjustedNode {
                node: node.clone(),
                meta,
                children,
            });
        }
        (out, cursor)
    }

    fn meta(&self, start: usize, end: usize, first: usize, last: usize) -> Option<SourceMeta> {
        let range = self.resolved.source_range(start..end)?;
        let literal = (first..=last).all(|i| self.resolved.piece(i).is_some_and(|p| p.is_literal()));
        Some(SourceMeta {
            resolved_index: start,
            resolved_source_index: range.start,
            source_length: range.len(),
            source_offset: self.resolved.offset,
            context_offset: self.context_offset,
            literal,
        })
    }
}
