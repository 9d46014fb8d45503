//! Compound selector ("segment") extraction.
//!
//! A segment is a maximal run of nodes between combinators: in
//! `.a.b:hover > .c` the segments are `.a.b:hover` and `.c`.

use super::node::AsSelectorNode;

/// Returns the segment containing `nodes[index]`.
///
/// `nodes` is a flat member list (the children of one selector group).
/// The result is empty when `index` is out of range or points at a
/// combinator.
#[must_use]
pub fn extract_segment<N: AsSelectorNode>(nodes: &[N], index: usize) -> &[N] {
    let is_combinator = |n: &N| n.selector_node().is_combinator();
    match nodes.get(index) {
        Some(node) if !is_combinator(node) => {
            let start = nodes[..index]
                .iter()
                .rposition(is_combinator)
                .map_or(0, |p| p + 1);
            let end = nodes[index..]
                .iter()
                .position(is_combinator)
                .map_or(nodes.len(), |p| index + p);
            &nodes[start..end]
        }
        _ => &[],
    }
}

/// Splits a flat member list into its non-empty segments, in order.
#[must_use]
pub fn segments<N: AsSelectorNode>(nodes: &[N]) -> Vec<&[N]> {
    nodes
        .split(|n| n.selector_node().is_combinator())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Returns the segment containing the character at `offset`.
///
/// `groups` is a parsed selector list. When `offset` falls inside the
/// arguments of a pseudo-class, the innermost segment is returned. Offsets
/// on whitespace or combinators, or past the end, yield an empty slice.
#[must_use]
pub fn extract_segment_at<N: AsSelectorNode>(groups: &[N], offset: usize) -> &[N] {
    for group in groups {
        let members = group.child_nodes();
        for (i, member) in members.iter().enumerate() {
            let node = member.selector_node();
            let start = node.source_index;
            let end = start + node.text_len();
            if offset < start || offset >= end {
                continue;
            }
            if node.has_arguments() {
                // Arguments are indexed from the byte after `(`.
                let args_start = start + node.value.len() + 1;
                if offset >= args_start && offset + 1 < end {
                    let inner = extract_segment_at(member.child_nodes(), offset - args_start);
                    if !inner.is_empty() {
                        return inner;
                    }
                }
            }
            return extract_segment(members, i);
        }
    }
    &[]
}
