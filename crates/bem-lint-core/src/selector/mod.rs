//! Selector parsing, nesting resolution and source mapping.

pub mod node;
pub mod parser;
pub mod resolve;
pub mod segment;
pub mod source;

pub use node::{stringify, AsSelectorNode, SelectorNode, SelectorNodeKind, Spaces};
pub use parser::{parse_selector, try_parse_selector, SelectorError};
pub use resolve::{resolve_nested_selector, Piece, ResolvedSelector};
pub use segment::{extract_segment, extract_segment_at, segments};
pub use source::{adjust_source, parse_resolved, AdjustedNode, SourceMeta};
