//! Context types for rule execution.

use crate::bem::Separators;
use crate::stylesheet::{NodeId, Stylesheet};
use crate::types::Location;
use std::ops::Range;
use std::path::{Path, PathBuf};

/// Context provided to rules.
///
/// Carries the stylesheet's identity and text plus the run-wide settings
/// rules need to interpret class names.
#[derive(Debug, Clone)]
pub struct FileContext<'a> {
    /// Path to the stylesheet.
    pub path: &'a Path,
    /// Stylesheet text (empty when the host did not supply it).
    pub content: &'a str,
    /// Path relative to the project root.
    pub relative_path: PathBuf,
    /// BEM separators in effect.
    pub separators: &'a Separators,
}

impl<'a> FileContext<'a> {
    /// Creates a new file context.
    #[must_use]
    pub fn new(path: &'a Path, content: &'a str, root: &Path, separators: &'a Separators) -> Self {
        let relative_path = path
            .strip_prefix(root)
            .map_or_else(|_| path.to_path_buf(), Path::to_path_buf);

        Self {
            path,
            content,
            relative_path,
            separators,
        }
    }

    /// Converts a byte offset into a 1-indexed line and column.
    ///
    /// Columns count characters. Offsets past the end clamp to the end.
    #[must_use]
    pub fn position_for(&self, offset: usize) -> (usize, usize) {
        let mut offset = offset.min(self.content.len());
        while !self.content.is_char_boundary(offset) {
            offset -= 1;
        }
        let before = &self.content[..offset];
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map_or(0, |i| i + 1);
        let column = before[line_start..].chars().count() + 1;
        (line, column)
    }

    /// Builds a location for a byte range of the file.
    #[must_use]
    pub fn location(&self, range: Range<usize>) -> Location {
        let (line, column) = self.position_for(range.start);
        Location::new(self.relative_path.clone(), line, column).with_span(range.start, range.len())
    }

    /// Builds a location for a range relative to the start of `owner`.
    ///
    /// Returns `None` when the host gave no position for `owner`. Without
    /// stylesheet text the owner's own line and column are used.
    #[must_use]
    pub fn node_location(
        &self,
        sheet: &Stylesheet,
        owner: NodeId,
        range: Range<usize>,
    ) -> Option<Location> {
        let start = sheet.get(owner)?.source?.start;
        let absolute = start.offset + range.start..start.offset + range.end;
        if self.content.is_empty() {
            return Some(
                Location::new(self.relative_path.clone(), start.line, start.column)
                    .with_span(absolute.start, absolute.len()),
            );
        }
        Some(self.location(absolute))
    }
}
