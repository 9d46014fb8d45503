//! Deduplicating collection of selector violations.
//!
//! Nested rules are resolved once per rule, so the same offending selector
//! can be found from a rule and again from each of its descendants. The
//! registry keeps the first report and drops repeats.

use crate::selector::AdjustedNode;
use crate::stylesheet::{NodeId, Stylesheet};
use regex::Regex;

/// Markers of preprocessor interpolation.
const INTERPOLATION_MARKERS: &[&str] = &["#{", "@{", "${"];

/// Regular expressions for selectors that must never be reported.
#[derive(Debug, Clone, Default)]
pub struct IgnorePatterns {
    patterns: Vec<Regex>,
}

impl IgnorePatterns {
    /// Compiles a list of patterns.
    ///
    /// # Errors
    ///
    /// Returns the first pattern that fails to compile.
    pub fn new<I, S>(patterns: I) -> Result<Self, regex::Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|p| Regex::new(p.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// True if any pattern matches `selector`.
    #[must_use]
    pub fn is_match(&self, selector: &str) -> bool {
        self.patterns.iter().any(|p| p.is_match(selector))
    }

    /// True if there are no patterns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

/// A recorded violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViolationRecord {
    /// The node the violation is reported on.
    pub owner: NodeId,
    /// The offending selector text.
    pub selector: String,
    /// Start, relative to the owner's start.
    pub index: usize,
    /// End (exclusive), relative to the owner's start.
    pub end_index: usize,
}

/// Collects violations for one stylesheet, dropping duplicates.
#[derive(Debug)]
pub struct ViolationRegistry<'a> {
    sheet: &'a Stylesheet,
    ignore: &'a IgnorePatterns,
    records: Vec<ViolationRecord>,
}

impl<'a> ViolationRegistry<'a> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new(sheet: &'a Stylesheet, ignore: &'a IgnorePatterns) -> Self {
        Self {
            sheet,
            ignore,
            records: Vec::new(),
        }
    }

    /// Records a violation covering `nodes`, reported on `owner`.
    ///
    /// Returns false (and records nothing) when the selector contains
    /// interpolation, matches an ignore pattern, has no source position,
    /// or was already recorded on `owner` or one of its ancestors.
    pub fn add_violation(&mut self, owner: NodeId, nodes: &[AdjustedNode]) -> bool {
        let selector: String = nodes.iter().map(ToString::to_string).collect();
        let selector = selector.trim().to_string();

        if INTERPOLATION_MARKERS.iter().any(|m| selector.contains(m)) {
            tracing::debug!("Skipping interpolated selector {:?}", selector);
            return false;
        }
        if self.ignore.is_match(&selector) {
            tracing::debug!("Ignoring selector {:?}", selector);
            return false;
        }

        let mut located = nodes.iter().filter_map(|n| n.meta);
        let Some(first) = located.next() else {
            return false;
        };
        let last = located.last().unwrap_or(first);

        let duplicate = self.records.iter().any(|r| {
            r.selector == selector && self.sheet.is_self_or_ancestor(r.owner, owner)
        });
        if duplicate {
            return false;
        }

        self.records.push(ViolationRecord {
            owner,
            selector,
            index: first.source_range().start,
            end_index: last.source_range().end,
        });
        true
    }

    /// Recorded violations, in insertion order.
    #[must_use]
    pub fn violations(&self) -> &[ViolationRecord] {
        &self.records
    }

    /// Consumes the registry, returning its records.
    #[must_use]
    pub fn into_violations(self) -> Vec<ViolationRecord> {
        self.records
    }
}
