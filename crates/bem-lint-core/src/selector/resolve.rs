//! Nested selector resolution.
//!
//! Expands a rule's selector against its ancestors (`&` substitution and
//! implicit descendant prefixing) and records, for every byte of the
//! resolved text, where it came from in the rule's own selector.

use crate::stylesheet::{NodeId, NodeKind, Stylesheet};
use std::ops::Range;

/// Result counts above this are logged; they are never truncated.
const LARGE_EXPANSION: usize = 64;

/// A contiguous run of a resolved selector.
///
/// `source` positions index into the rule's own selector text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Piece {
    /// Copied unchanged from the rule's own selector.
    Literal {
        /// Start in the resolved text.
        resolved: usize,
        /// Start in the rule's selector.
        source: usize,
        /// Length in bytes.
        len: usize,
    },
    /// Parent selector text substituted for `&`, or prepended when the
    /// selector has no `&`.
    Injected {
        /// Start in the resolved text.
        resolved: usize,
        /// Length of the injected text.
        len: usize,
        /// Position of the `&` (or of the selector start, for a prefix).
        source: usize,
        /// Source bytes replaced: 1 for `&`, 0 for a prefix.
        literal_len: usize,
    },
}

impl Piece {
    fn resolved_range(&self) -> Range<usize> {
        match *self {
            Piece::Literal { resolved, len, .. } | Piece::Injected { resolved, len, .. } => {
                resolved..resolved + len
            }
        }
    }

    fn map_start(&self, pos: usize) -> usize {
        match *self {
            Piece::Literal {
                resolved, source, ..
            } => source + (pos - resolved),
            Piece::Injected { source, .. } => source,
        }
    }

    fn map_end(&self, pos: usize) -> usize {
        match *self {
            Piece::Literal {
                resolved, source, ..
            } => source + (pos - resolved),
            Piece::Injected {
                source,
                literal_len,
                ..
            } => source + literal_len,
        }
    }

    /// True for pieces taken from the rule's own selector.
    #[must_use]
    pub fn is_literal(&self) -> bool {
        matches!(self, Piece::Literal { .. })
    }
}

/// One fully resolved selector of a rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSelector {
    /// The resolved selector text.
    pub text: String,
    /// The parent selector text substituted for `&` (empty at root level).
    pub inject: String,
    /// Byte offset of the rule's selector within its raw header.
    pub offset: usize,
    pieces: Vec<Piece>,
}

impl ResolvedSelector {
    /// A selector taken verbatim from the header.
    #[must_use]
    pub fn literal(text: impl Into<String>, offset: usize) -> Self {
        let text = text.into();
        let pieces = if text.is_empty() {
            Vec::new()
        } else {
            vec![Piece::Literal {
                resolved: 0,
                source: 0,
                len: text.len(),
            }]
        };
        Self {
            text,
            inject: String::new(),
            offset,
            pieces,
        }
    }

    /// The provenance runs of [`text`](Self::text), in order.
    #[must_use]
    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    /// Index of the piece containing resolved byte `pos`, scanning from `from`.
    pub(crate) fn locate(&self, from: usize, pos: usize) -> Option<usize> {
        self.pieces
            .iter()
            .enumerate()
            .skip(from)
            .find(|(_, p)| p.resolved_range().contains(&pos))
            .map(|(i, _)| i)
    }

    pub(crate) fn piece(&self, index: usize) -> Option<&Piece> {
        self.pieces.get(index)
    }

    /// Maps a range of the resolved text to a range of the rule's selector.
    ///
    /// A range touching substituted text expands to cover the `&` it came
    /// from. Returns `None` for empty ranges and for ranges that lie wholly
    /// inside an implicit parent prefix.
    #[must_use]
    pub fn source_range(&self, range: Range<usize>) -> Option<Range<usize>> {
        if range.is_empty() {
            return None;
        }
        let first = self.locate(0, range.start)?;
        let last = self.locate(first, range.end - 1)?;
        let start = self.pieces[first].map_start(range.start);
        let end = self.pieces[last].map_end(range.end);
        (end > start).then_some(start..end)
    }

    /// Like [`source_range`](Self::source_range), relative to the raw header.
    #[must_use]
    pub fn header_range(&self, range: Range<usize>) -> Option<Range<usize>> {
        self.source_range(range)
            .map(|r| r.start + self.offset..r.end + self.offset)
    }
}

#[derive(Default)]
struct Builder {
    text: String,
    pieces: Vec<Piece>,
}

impl Builder {
    fn literal(&mut self, s: &str, source: usize) {
        if s.is_empty() {
            return;
        }
        self.pieces.push(Piece::Literal {
            resolved: self.text.len(),
            source,
            len: s.len(),
        });
        self.text.push_str(s);
    }

    fn inject(&mut self, s: &str, source: usize, literal_len: usize) {
        self.pieces.push(Piece::Injected {
            resolved: self.text.len(),
            len: s.len(),
            source,
            literal_len,
        });
        self.text.push_str(s);
    }
}

/// Resolves the selector of `id` against its ancestors.
///
/// Rules without selector-bearing ancestors resolve to their own selector,
/// with `offset` 0 unless the host left whitespace before it (see
/// [`Stylesheet::rule_content`]).
/// Otherwise every comma group of the rule is combined with every resolved
/// parent selector, own group first: `.a, .b { &__c, &__d {} }` yields
/// `.a__c`, `.b__c`, `.a__d`, `.b__d`. At-rules are transparent, except
/// `@nest` (which takes part like a rule) and `@at-root` (which restarts the
/// chain). Non-selector nodes resolve to nothing.
#[must_use]
pub fn resolve_nested_selector(sheet: &Stylesheet, id: NodeId) -> Vec<ResolvedSelector> {
    if !bears_selector(sheet, id) {
        return Vec::new();
    }
    let Some(content) = sheet.rule_content(id) else {
        return Vec::new();
    };

    let chain = selector_ancestors(sheet, id);
    let Some((&outermost, rest)) = chain.split_first() else {
        return vec![ResolvedSelector::literal(content.source, content.offset)];
    };

    let mut parents: Vec<String> = sheet
        .rule_content(outermost)
        .map(|c| split_groups(&c.source).into_iter().map(|(_, g)| g.to_string()).collect())
        .unwrap_or_default();
    for &ancestor in rest {
        let Some(own) = sheet.rule_content(ancestor) else {
            continue;
        };
        parents = split_groups(&own.source)
            .into_iter()
            .flat_map(|(start, group)| {
                parents
                    .iter()
                    .map(move |parent| substitute(parent, group, start).text)
            })
            .collect();
    }

    let resolved: Vec<ResolvedSelector> = split_groups(&content.source)
        .into_iter()
        .flat_map(|(start, group)| {
            parents.iter().map(move |parent| {
                let built = substitute(parent, group, start);
                ResolvedSelector {
                    text: built.text,
                    inject: parent.clone(),
                    offset: content.offset,
                    pieces: built.pieces,
                }
            })
        })
        .collect();

    if resolved.len() > LARGE_EXPANSION {
        tracing::debug!(
            "Selector {:?} expands to {} resolved selectors",
            content.source,
            resolved.len()
        );
    }
    resolved
}

/// True for rules, `@nest`, and `@at-root` with a selector.
fn bears_selector(sheet: &Stylesheet, id: NodeId) -> bool {
    match sheet.kind(id) {
        Some(NodeKind::Rule { .. }) => true,
        Some(NodeKind::AtRule { name, params, .. }) => {
            name == "nest" || (name == "at-root" && !params.trim().is_empty())
        }
        _ => false,
    }
}

/// Selector-bearing ancestors of `id`, outermost first.
fn selector_ancestors(sheet: &Stylesheet, id: NodeId) -> Vec<NodeId> {
    let mut chain = Vec::new();
    if matches!(sheet.kind(id), Some(NodeKind::AtRule { name, .. }) if name == "at-root") {
        return chain;
    }
    for ancestor in sheet.ancestors(id) {
        match sheet.kind(ancestor) {
            Some(NodeKind::AtRule { name, .. }) if name == "at-root" => {
                if bears_selector(sheet, ancestor) {
                    chain.push(ancestor);
                }
                break;
            }
            Some(NodeKind::Root) | None => break,
            _ if bears_selector(sheet, ancestor) => chain.push(ancestor),
            _ => {}
        }
    }
    chain.reverse();
    chain
}

/// Resolves one own group against one parent selector.
fn substitute(parent: &str, group: &str, group_start: usize) -> Builder {
    let mut built = Builder::default();
    let markers = nesting_markers(group);
    if markers.is_empty() {
        built.inject(&format!("{parent} "), group_start, 0);
        built.literal(group, group_start);
        return built;
    }

    let mut last = 0;
    for marker in markers {
        built.literal(&group[last..marker], group_start + last);
        built.inject(parent, group_start + marker, 1);
        last = marker + 1;
    }
    built.literal(&group[last..], group_start + last);
    built
}

/// Scanner state shared by [`split_groups`] and [`nesting_markers`].
#[derive(Default)]
struct Scan {
    depth: usize,
    brackets: usize,
    quote: Option<char>,
    comment: bool,
    escaped: bool,
}

impl Scan {
    /// Feeds one character; returns true when it is at top level and not
    /// part of a string, comment or escape.
    fn feed(&mut self, c: char, next: Option<char>, prev: Option<char>) -> bool {
        if self.escaped {
            self.escaped = false;
            return false;
        }
        if self.comment {
            if c == '/' && prev == Some('*') {
                self.comment = false;
            }
            return false;
        }
        if let Some(q) = self.quote {
            if c == '\\' {
                self.escaped = true;
            } else if c == q {
                self.quote = None;
            }
            return false;
        }
        match c {
            '\\' => {
                self.escaped = true;
                false
            }
            '/' if next == Some('*') => {
                self.comment = true;
                false
            }
            '"' | '\'' => {
                self.quote = Some(c);
                false
            }
            '(' => {
                self.depth += 1;
                false
            }
            '[' => {
                self.depth += 1;
                self.brackets += 1;
                false
            }
            ')' => {
                self.depth = self.depth.saturating_sub(1);
                false
            }
            ']' => {
                self.depth = self.depth.saturating_sub(1);
                self.brackets = self.brackets.saturating_sub(1);
                false
            }
            _ => true,
        }
    }
}

/// Splits a selector list on top-level commas into trimmed, non-empty
/// groups with their start offsets.
pub(crate) fn split_groups(selector: &str) -> Vec<(usize, &str)> {
    let mut groups = Vec::new();
    let mut scan = Scan::default();
    let mut start = 0;
    let mut prev = None;
    let mut chars = selector.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        let next = chars.peek().map(|&(_, n)| n);
        if scan.feed(c, next, prev) && c == ',' && scan.depth == 0 {
            push_group(&mut groups, selector, start, i);
            start = i + 1;
        }
        prev = Some(c);
    }
    push_group(&mut groups, selector, start, selector.len());
    groups
}

fn push_group<'a>(groups: &mut Vec<(usize, &'a str)>, selector: &'a str, start: usize, end: usize) {
    let raw = &selector[start..end];
    let trimmed = raw.trim();
    if !trimmed.is_empty() {
        let lead = raw.len() - raw.trim_start().len();
        groups.push((start + lead, trimmed));
    }
}

/// Byte offsets of `&` outside strings, comments and attribute brackets.
fn nesting_markers(group: &str) -> Vec<usize> {
    let mut markers = Vec::new();
    let mut scan = Scan::default();
    let mut prev = None;
    let mut chars = group.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        let next = chars.peek().map(|&(_, n)| n);
        // Attribute values may contain `&` unquoted; pseudo arguments may not.
        if scan.feed(c, next, prev) && c == '&' && scan.brackets == 0 {
            markers.push(i);
        }
        prev = Some(c);
    }
    markers
}
