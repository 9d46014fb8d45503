//! DTO → arena conversion with validation.

use super::dto::{NodeDto, PositionDto, SourceDto, StylesheetDumpDto};
use super::{NodeId, NodeKind, Position, SourceSpan, Stylesheet};

use std::path::{Path, PathBuf};

/// Errors while loading a host AST dump.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The dump is not valid JSON or does not match the expected shape.
    #[error("invalid AST dump: {0}")]
    Json(#[from] serde_json::Error),

    /// The top-level node is not a root, or a root appears below it.
    #[error("{context}: expected a single `root` node at the top of the dump")]
    MisplacedRoot {
        /// Where the root was found (e.g., "root.nodes[2]").
        context: String,
    },

    /// A source position points past the end of the embedded source text.
    #[error("{context}: offset {offset} is outside the source text ({len} bytes)")]
    OffsetOutOfBounds {
        /// Where the position was found.
        context: String,
        /// The offending offset.
        offset: usize,
        /// Length of the source text.
        len: usize,
    },
}

/// A loaded stylesheet together with its file identity and text.
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Path of the stylesheet.
    pub path: PathBuf,
    /// Full stylesheet text (may be empty when the dump omitted it).
    pub content: String,
    /// The AST.
    pub stylesheet: Stylesheet,
}

/// Parses a JSON dump and converts it into a [`SourceFile`].
///
/// `dump_path` is used as the file identity when the dump has no `file`.
///
/// # Errors
///
/// Returns an error if the JSON is malformed or the tree is inconsistent.
pub fn load_json(json: &str, dump_path: &Path) -> Result<SourceFile, LoadError> {
    let dto: StylesheetDumpDto = serde_json::from_str(json)?;
    load(dto, dump_path)
}

/// Converts a deserialized dump into a [`SourceFile`].
///
/// # Errors
///
/// Returns an error if the tree is inconsistent.
pub fn load(dto: StylesheetDumpDto, dump_path: &Path) -> Result<SourceFile, LoadError> {
    let path = dto.file.unwrap_or_else(|| stylesheet_path_for(dump_path));
    let NodeDto::Root { nodes, source } = dto.root else {
        return Err(LoadError::MisplacedRoot {
            context: "root".to_string(),
        });
    };

    let mut sheet = Stylesheet::new();
    sheet.set_root_source(convert_source(source.as_ref(), &dto.source, "root")?);
    for (i, child) in nodes.into_iter().enumerate() {
        convert_node(&mut sheet, NodeId::ROOT, child, &dto.source, &format!("root.nodes[{i}]"))?;
    }

    Ok(SourceFile {
        path,
        content: dto.source,
        stylesheet: sheet,
    })
}

/// Maps `card.css.ast.json` to `card.css`; other names are kept as-is.
fn stylesheet_path_for(dump_path: &Path) -> PathBuf {
    let name = dump_path.to_string_lossy();
    name.strip_suffix(".ast.json")
        .map_or_else(|| dump_path.to_path_buf(), PathBuf::from)
}

fn convert_node(
    sheet: &mut Stylesheet,
    parent: NodeId,
    dto: NodeDto,
    content: &str,
    ctx: &str,
) -> Result<(), LoadError> {
    let (kind, children, source) = match dto {
        NodeDto::Root { .. } => {
            return Err(LoadError::MisplacedRoot {
                context: ctx.to_string(),
            })
        }
        NodeDto::Rule {
            selector,
            raws,
            nodes,
            source,
        } => {
            let selector = raws.selector.map_or(selector, |r| r.raw);
            (NodeKind::Rule { selector }, nodes, source)
        }
        NodeDto::AtRule {
            name,
            params,
            raws,
            nodes,
            source,
        } => {
            let after_name = raws
                .after_name
                .unwrap_or_else(|| if params.is_empty() { String::new() } else { " ".to_string() });
            (
                NodeKind::AtRule {
                    name,
                    params,
                    after_name,
                },
                nodes,
                source,
            )
        }
        NodeDto::Decl { prop, value, source } => (
            NodeKind::Declaration {
                property: prop,
                value,
            },
            Vec::new(),
            source,
        ),
        NodeDto::Comment { text, source } => (NodeKind::Comment { text }, Vec::new(), source),
    };

    let span = convert_source(source.as_ref(), content, ctx)?;
    let id = sheet.append(parent, kind, span);
    for (i, child) in children.into_iter().enumerate() {
        convert_node(sheet, id, child, content, &format!("{ctx}.nodes[{i}]"))?;
    }
    Ok(())
}

fn convert_source(
    source: Option<&SourceDto>,
    content: &str,
    ctx: &str,
) -> Result<Option<SourceSpan>, LoadError> {
    let Some(SourceDto {
        start: Some(start),
        end,
    }) = source
    else {
        return Ok(None);
    };
    let start = convert_position(*start, content, ctx)?;
    let end = match end {
        Some(end) => convert_position(*end, content, ctx)?,
        None => start,
    };
    Ok(Some(SourceSpan { start, end }))
}

fn convert_position(pos: PositionDto, content: &str, ctx: &str) -> Result<Position, LoadError> {
    let offset = pos
        .offset
        .unwrap_or_else(|| offset_for(content, pos.line, pos.column));
    if !content.is_empty() && offset > content.len() {
        return Err(LoadError::OffsetOutOfBounds {
            context: ctx.to_string(),
            offset,
            len: content.len(),
        });
    }
    Ok(Position {
        line: pos.line,
        column: pos.column,
        offset,
    })
}

/// Calculates the byte offset of a 1-indexed line and column.
///
/// Returns the end of the text when the line is out of bounds.
fn offset_for(content: &str, line: usize, column: usize) -> usize {
    if line == 0 {
        return 0;
    }

    let mut offset = 0;
    for (i, line_content) in content.split_inclusive('\n').enumerate() {
        if i + 1 == line {
            return offset + column.saturating_sub(1);
        }
        offset += line_content.len();
    }

    offset
}
