//! Selector AST node.

use serde::Serialize;
use std::fmt;

/// The kind of a [`SelectorNode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SelectorNodeKind {
    /// A complex selector: one comma-separated entry of a selector list.
    Selector,
    /// Type selector (`div`), or the suffix glued to a nesting marker (`&__el`).
    Tag,
    /// `*`.
    Universal,
    /// `.name`.
    Class,
    /// `#name`.
    Id,
    /// `[attr=value]`.
    Attribute,
    /// `:hover`, `:is(...)`.
    PseudoClass,
    /// `::before`, legacy `:after`.
    PseudoElement,
    /// Descendant whitespace, `>`, `+`, `~`, `||`.
    Combinator,
    /// `&`.
    Nesting,
    /// `/* ... */`.
    Comment,
}

/// Whitespace surrounding a node, kept so serialisation is lossless.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Spaces {
    /// Whitespace before the node.
    pub before: String,
    /// Whitespace after the node.
    pub after: String,
}

/// A node of a parsed selector.
///
/// `value` holds the literal value without syntax sugar: the class name
/// without `.`, the id without `#`, the attribute content without brackets.
/// Pseudo names keep their colons (`:is`, `::before`) and a descendant
/// combinator's value is the whitespace run itself.
///
/// `source_index` is the offset of the node's first character within the
/// string it was parsed from. Children of a pseudo-class are parsed from the
/// argument substring, so their indices are relative to the byte after `(`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectorNode {
    /// Node kind.
    pub kind: SelectorNodeKind,
    /// Literal value.
    pub value: String,
    /// Offset within the parsed string.
    pub source_index: usize,
    /// Surrounding whitespace.
    pub spaces: Spaces,
    /// Selector groups of a pseudo-class argument list, or the members of a
    /// selector group.
    pub children: Vec<SelectorNode>,
}

impl SelectorNode {
    /// Creates a leaf node.
    #[must_use]
    pub fn new(kind: SelectorNodeKind, value: impl Into<String>, source_index: usize) -> Self {
        Self {
            kind,
            value: value.into(),
            source_index,
            spaces: Spaces::default(),
            children: Vec::new(),
        }
    }

    /// The node's own text, without surrounding whitespace.
    #[must_use]
    pub fn text(&self) -> String {
        match self.kind {
            SelectorNodeKind::Selector => self.children.iter().map(ToString::to_string).collect(),
            SelectorNodeKind::Class => format!(".{}", self.value),
            SelectorNodeKind::Id => format!("#{}", self.value),
            SelectorNodeKind::Attribute => format!("[{}]", self.value),
            SelectorNodeKind::PseudoClass if self.has_arguments() => {
                let args: Vec<String> = self.children.iter().map(ToString::to_string).collect();
                format!("{}({})", self.value, args.join(","))
            }
            SelectorNodeKind::Tag
            | SelectorNodeKind::Universal
            | SelectorNodeKind::PseudoClass
            | SelectorNodeKind::PseudoElement
            | SelectorNodeKind::Combinator
            | SelectorNodeKind::Nesting
            | SelectorNodeKind::Comment => self.value.clone(),
        }
    }

    /// Length of [`text`](Self::text) in bytes.
    #[must_use]
    pub fn text_len(&self) -> usize {
        self.text().len()
    }

    /// Byte length of the prefix before [`value`](Self::value) in the text.
    #[must_use]
    pub fn value_offset(&self) -> usize {
        match self.kind {
            SelectorNodeKind::Class | SelectorNodeKind::Id | SelectorNodeKind::Attribute => 1,
            _ => 0,
        }
    }

    /// True for combinators.
    #[must_use]
    pub fn is_combinator(&self) -> bool {
        self.kind == SelectorNodeKind::Combinator
    }

    /// True for a pseudo-class whose arguments were parsed as selectors.
    #[must_use]
    pub fn has_arguments(&self) -> bool {
        self.kind == SelectorNodeKind::PseudoClass && !self.children.is_empty()
    }

    /// Pseudo name without colons, lowercased (`:IS` → `is`).
    #[must_use]
    pub fn pseudo_name(&self) -> Option<String> {
        match self.kind {
            SelectorNodeKind::PseudoClass | SelectorNodeKind::PseudoElement => {
                let name = self.value.trim_start_matches(':');
                let name = name.split('(').next().unwrap_or(name);
                Some(name.to_ascii_lowercase())
            }
            _ => None,
        }
    }
}

impl fmt::Display for SelectorNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.spaces.before, self.text(), self.spaces.after)
    }
}

/// Serialises a selector list back into text.
#[must_use]
pub fn stringify(groups: &[SelectorNode]) -> String {
    groups
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// Anything that wraps a [`SelectorNode`].
///
/// Lets the segment extractor work on raw and source-mapped nodes alike.
pub trait AsSelectorNode {
    /// The wrapped node.
    fn selector_node(&self) -> &SelectorNode;

    /// Child nodes, in the wrapper's own type.
    fn child_nodes(&self) -> &[Self]
    where
        Self: Sized;
}

impl AsSelectorNode for SelectorNode {
    fn selector_node(&self) -> &SelectorNode {
        self
    }

    fn child_nodes(&self) -> &[Self] {
        &self.children
    }
}
