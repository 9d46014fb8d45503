//! # bem-lint-core
//!
//! Core framework for linting BEM (Block, Element, Modifier) class names in
//! stylesheets, including nested (Sass/Less/postcss-nested style) rules.
//!
//! This crate provides:
//!
//! - [`stylesheet`]: an arena AST loaded from a host parser's JSON dump
//! - [`selector`]: a selector parser, nested selector resolution and the
//!   mapping of resolved selectors back to source offsets
//! - [`bem`]: extraction of BEM entities from class selectors
//! - [`registry`]: deduplicating collection of selector violations
//! - [`Rule`] and [`Analyzer`] for running rules over many stylesheets
//!
//! ## Example
//!
//! ```ignore
//! use bem_lint_core::{Analyzer, Config};
//!
//! let analyzer = Analyzer::builder()
//!     .root("./build/ast")
//!     .config(Config::from_file("bem-lint.toml".as_ref())?)
//!     .rule(MyRule::new())
//!     .build()?;
//!
//! let result = analyzer.analyze()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod analyzer;
mod config;
mod context;
mod rule;
mod types;

pub mod bem;
pub mod registry;
pub mod selector;
pub mod stylesheet;

/// Utility modules for rule implementations.
pub mod utils;

pub use analyzer::{Analyzer, AnalyzerBuilder, AnalyzerError, AST_DUMP_SUFFIX};
pub use bem::{BemEntity, BemPart, BemPartKind, Separators};
pub use config::{AnalyzerConfig, Config, ConfigError, RuleConfig};
pub use context::FileContext;
pub use registry::{IgnorePatterns, ViolationRecord, ViolationRegistry};
pub use rule::{Rule, RuleBox};
pub use stylesheet::{NodeId, Stylesheet};
pub use types::{
    Label, LintResult, Location, Severity, Suggestion, Violation, ViolationDiagnostic,
};
pub use utils::allowance::AllowCheck;
