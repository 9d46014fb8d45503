//! BEM naming: separators and entity extraction.

mod entity;

pub use entity::{
    resolve_bem_entities, resolve_bem_entities_from_str, BemEntity, BemModifier, BemPart,
    BemPartKind,
};

use serde::{Deserialize, Serialize};

/// Separators between BEM parts.
///
/// The defaults give `block__element--modifier--value`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Separators {
    /// Between block and element.
    pub element: String,
    /// Before a modifier name.
    pub modifier: String,
    /// Between a modifier name and its value.
    pub modifier_value: String,
}

impl Default for Separators {
    fn default() -> Self {
        Self {
            element: "__".to_string(),
            modifier: "--".to_string(),
            modifier_value: "--".to_string(),
        }
    }
}

/// Invalid separator configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SeparatorError {
    /// A separator is the empty string.
    #[error("{0} separator must not be empty")]
    Empty(&'static str),

    /// Element and modifier separators are identical.
    #[error("element and modifier separators must differ (both are {0:?})")]
    Ambiguous(String),
}

impl Separators {
    /// Checks that the separators can be told apart.
    ///
    /// # Errors
    ///
    /// Returns an error for empty separators or identical element and
    /// modifier separators.
    pub fn validate(&self) -> Result<(), SeparatorError> {
        for (name, value) in [
            ("element", &self.element),
            ("modifier", &self.modifier),
            ("modifier value", &self.modifier_value),
        ] {
            if value.is_empty() {
                return Err(SeparatorError::Empty(name));
            }
        }
        if self.element == self.modifier {
            return Err(SeparatorError::Ambiguous(self.element.clone()));
        }
        Ok(())
    }
}
