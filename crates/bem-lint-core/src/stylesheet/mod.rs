//! Arena-backed stylesheet AST supplied by the host.
//!
//! The host (a CSS parser running elsewhere) dumps its AST; [`loader`]
//! converts that dump into a [`Stylesheet`]. Every node lives in a single
//! `Vec` and refers to its parent and children through [`NodeId`] indices,
//! so ancestor walks never fight the borrow checker.

pub mod dto;
pub mod loader;

use serde::{Deserialize, Serialize};

/// A type-safe index into a [`Stylesheet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The root node is always at index 0.
    pub const ROOT: NodeId = NodeId(0);
}

/// A position in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Position {
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed).
    pub column: usize,
    /// Byte offset from the start of the file.
    pub offset: usize,
}

/// Source range of a node, as reported by the host parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SourceSpan {
    /// First character of the node.
    pub start: Position,
    /// Last character of the node.
    pub end: Position,
}

/// The closed set of stylesheet node kinds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NodeKind {
    /// The stylesheet itself.
    Root,
    /// A qualified rule: `selector { ... }`.
    Rule {
        /// Raw selector text (the rule header).
        selector: String,
    },
    /// An at-rule: `@name params { ... }` or `@name params;`.
    AtRule {
        /// Name without the leading `@`.
        name: String,
        /// Parameters text.
        params: String,
        /// Whitespace between the name and the params.
        after_name: String,
    },
    /// A declaration: `property: value`.
    Declaration {
        /// Property name.
        property: String,
        /// Property value.
        value: String,
    },
    /// A comment, without its `/*` `*/` delimiters.
    Comment {
        /// Comment body.
        text: String,
    },
}

/// A single node in the arena.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// What this node is.
    pub kind: NodeKind,
    /// Parent node, `None` only for the root.
    pub parent: Option<NodeId>,
    /// Children in source order.
    pub children: Vec<NodeId>,
    /// Source location, when the host knows it.
    pub source: Option<SourceSpan>,
}

/// Header of a selector-bearing node.
///
/// `raw` is the full header text as written, `source` the meaningful part
/// (the selector of a rule, the params of an at-rule) and `offset` the byte
/// index of `source` inside `raw`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleContent {
    /// Full header text.
    pub raw: String,
    /// Meaningful content (selector or params).
    pub source: String,
    /// Start of `source` within `raw`.
    pub offset: usize,
}

/// An arena of stylesheet nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stylesheet {
    nodes: Vec<Node>,
}

impl Default for Stylesheet {
    fn default() -> Self {
        Self::new()
    }
}

impl Stylesheet {
    /// Creates a stylesheet holding only the root node.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                kind: NodeKind::Root,
                parent: None,
                children: Vec::new(),
                source: None,
            }],
        }
    }

    /// Returns the root node id.
    #[must_use]
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Returns the node with the given id.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Returns the kind of a node, if it exists.
    #[must_use]
    pub fn kind(&self, id: NodeId) -> Option<&NodeKind> {
        self.get(id).map(|n| &n.kind)
    }

    /// Number of nodes, including the root.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: the root node is created with the arena.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Appends a new node under `parent` and returns its id.
    pub fn append(&mut self, parent: NodeId, kind: NodeKind, source: Option<SourceSpan>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind,
            parent: Some(parent),
            children: Vec::new(),
            source,
        });
        if let Some(p) = self.nodes.get_mut(parent.0) {
            p.children.push(id);
        }
        id
    }

    /// Appends a rule with the given selector.
    pub fn append_rule(
        &mut self,
        parent: NodeId,
        selector: impl Into<String>,
        source: Option<SourceSpan>,
    ) -> NodeId {
        self.append(
            parent,
            NodeKind::Rule {
                selector: selector.into(),
            },
            source,
        )
    }

    /// Sets the source span of the root node.
    pub fn set_root_source(&mut self, source: Option<SourceSpan>) {
        if let Some(root) = self.nodes.first_mut() {
            root.source = source;
        }
    }

    /// Returns the parent of a node.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Returns the children of a node.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map_or(&[], |n| n.children.as_slice())
    }

    /// Returns the sibling immediately before `id`.
    #[must_use]
    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        let siblings = self.children(self.parent(id)?);
        let pos = siblings.iter().position(|&c| c == id)?;
        pos.checked_sub(1).map(|p| siblings[p])
    }

    /// Iterates over ancestors, from parent to root.
    #[must_use]
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            sheet: self,
            current: self.parent(id),
        }
    }

    /// Returns true if `ancestor` is `id` itself or one of its ancestors.
    #[must_use]
    pub fn is_self_or_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        id == ancestor || self.ancestors(id).any(|a| a == ancestor)
    }

    /// Returns all node ids in depth-first document order, root first.
    #[must_use]
    pub fn walk(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![NodeId::ROOT];
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.children(id).iter().rev().copied());
        }
        order
    }

    /// Returns the ids of all rule nodes in document order.
    #[must_use]
    pub fn rules(&self) -> Vec<NodeId> {
        self.walk()
            .into_iter()
            .filter(|&id| matches!(self.kind(id), Some(NodeKind::Rule { .. })))
            .collect()
    }

    /// Returns the header of a rule or at-rule.
    ///
    /// Declarations, comments and the root have no header. A rule's
    /// `offset` counts any leading whitespace the host left in the selector,
    /// so it is non-zero for `"  .card"` even at the top level; offsets stay
    /// relative to where the node's source span starts. postcss strips that
    /// whitespace into `raws.before`, which gives 0.
    #[must_use]
    pub fn rule_content(&self, id: NodeId) -> Option<RuleContent> {
        match self.kind(id)? {
            NodeKind::Rule { selector } => {
                let source = selector.trim_start();
                Some(RuleContent {
                    raw: selector.clone(),
                    source: source.trim_end().to_string(),
                    offset: selector.len() - source.len(),
                })
            }
            NodeKind::AtRule {
                name,
                params,
                after_name,
            } => Some(RuleContent {
                raw: format!("@{name}{after_name}{params}"),
                source: params.clone(),
                offset: 1 + name.len() + after_name.len(),
            }),
            NodeKind::Root | NodeKind::Declaration { .. } | NodeKind::Comment { .. } => None,
        }
    }

    /// Byte distance from the start of `ancestor` to the start of `id`.
    ///
    /// Returns `None` when either node lacks source information or `id`
    /// starts before `ancestor`.
    #[must_use]
    pub fn offset_between(&self, ancestor: NodeId, id: NodeId) -> Option<usize> {
        let from = self.get(ancestor)?.source?.start.offset;
        let to = self.get(id)?.source?.start.offset;
        to.checked_sub(from)
    }
}

/// Iterator over ancestors of a node.
pub struct Ancestors<'a> {
    sheet: &'a Stylesheet,
    current: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = self.sheet.parent(id);
        Some(id)
    }
}
