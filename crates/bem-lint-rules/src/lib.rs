//! # bem-lint-rules
//!
//! Built-in lint rules for bem-lint.
//!
//! ## Available Rules
//!
//! | Code | Name | Description |
//! |------|------|-------------|
//! | BEM001 | `no-side-effects` | Forbids selectors that style elements outside their block |
//! | BEM002 | `no-chained-entities` | Forbids compound selectors chaining different entities |
//!
//! ## Usage
//!
//! ```ignore
//! use bem_lint_core::Analyzer;
//! use bem_lint_rules::{NoChainedEntities, NoSideEffects};
//!
//! let analyzer = Analyzer::builder()
//!     .root("./build/ast")
//!     .rule(NoSideEffects::new())
//!     .rule(NoChainedEntities::new())
//!     .build()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod no_chained_entities;
mod no_side_effects;
mod presets;
mod report;

pub use no_chained_entities::NoChainedEntities;
pub use no_side_effects::NoSideEffects;
pub use presets::{
    all_rules, configured_rules, minimal_rules, recommended_rules, strict_rules, Preset,
};

/// Re-export core types for convenience.
pub use bem_lint_core::{Rule, Severity, Violation};
