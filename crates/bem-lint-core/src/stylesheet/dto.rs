//! JSON deserialization types for host AST dumps (DTO layer).
//!
//! The shape follows the postcss `toJSON()` output so a dump can be produced
//! with a few lines of JavaScript. These types exist solely for serde; the
//! [`loader`](super::loader) converts them into the arena.

use serde::Deserialize;
use std::path::PathBuf;

/// A whole dump file: `{ "file": ..., "source": ..., "root": ... }`.
#[derive(Debug, Clone, Deserialize)]
pub struct StylesheetDumpDto {
    /// Path of the stylesheet the dump was produced from.
    #[serde(default)]
    pub file: Option<PathBuf>,
    /// Full stylesheet text.
    #[serde(default)]
    pub source: String,
    /// Root node of the AST.
    pub root: NodeDto,
}

/// A postcss node.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NodeDto {
    /// `Root`.
    Root {
        /// Child nodes.
        #[serde(default)]
        nodes: Vec<NodeDto>,
        /// Source range.
        #[serde(default)]
        source: Option<SourceDto>,
    },
    /// `Rule`.
    Rule {
        /// Cleaned selector text.
        selector: String,
        /// Raw formatting details.
        #[serde(default)]
        raws: RawsDto,
        /// Child nodes.
        #[serde(default)]
        nodes: Vec<NodeDto>,
        /// Source range.
        #[serde(default)]
        source: Option<SourceDto>,
    },
    /// `AtRule`.
    #[serde(rename = "atrule")]
    AtRule {
        /// Name without `@`.
        name: String,
        /// Parameters.
        #[serde(default)]
        params: String,
        /// Raw formatting details.
        #[serde(default)]
        raws: RawsDto,
        /// Child nodes (absent for statement at-rules).
        #[serde(default)]
        nodes: Vec<NodeDto>,
        /// Source range.
        #[serde(default)]
        source: Option<SourceDto>,
    },
    /// `Declaration`.
    Decl {
        /// Property name.
        prop: String,
        /// Property value.
        #[serde(default)]
        value: String,
        /// Source range.
        #[serde(default)]
        source: Option<SourceDto>,
    },
    /// `Comment`.
    Comment {
        /// Comment body.
        #[serde(default)]
        text: String,
        /// Source range.
        #[serde(default)]
        source: Option<SourceDto>,
    },
}

/// The subset of postcss `raws` the core needs.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawsDto {
    /// Whitespace between an at-rule name and its params.
    #[serde(rename = "afterName", default)]
    pub after_name: Option<String>,
    /// Raw selector, present when it differs from the cleaned one
    /// (for example when it contains comments).
    #[serde(default)]
    pub selector: Option<RawValueDto>,
}

/// A postcss raw value pair.
#[derive(Debug, Clone, Deserialize)]
pub struct RawValueDto {
    /// Cleaned value.
    #[serde(default)]
    pub value: String,
    /// Value as written in the source.
    pub raw: String,
}

/// postcss `source` object.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SourceDto {
    /// Start position.
    #[serde(default)]
    pub start: Option<PositionDto>,
    /// End position.
    #[serde(default)]
    pub end: Option<PositionDto>,
}

/// postcss position. `offset` is only emitted by recent postcss versions.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PositionDto {
    /// Line (1-indexed).
    pub line: usize,
    /// Column (1-indexed).
    pub column: usize,
    /// Byte offset (0-indexed).
    #[serde(default)]
    pub offset: Option<usize>,
}
