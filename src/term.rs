//! The atomic value representation shared by facts, rules and queries.

use std::fmt;

/// A single argument position in a fact, rule or query goal.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum Term {
    /// A concrete value: a case-normalized atom (game name, category value)
    /// or a numeric literal in canonical text form.
    Constant(String),
    /// An unbound placeholder scoped to one query (e.g. `What`, `X`).
    Variable(String),
}

impl Term {
    /// Builds a constant from raw text, normalizing it to the canonical form
    /// used for comparison: trimmed and lower-cased.
    #[must_use]
    pub fn constant(text: impl Into<String>) -> Self {
        Self::Constant(text.into().trim().to_lowercase())
    }

    /// Builds a constant from a number, rendered canonically so that `1.0`
    /// and `1` produce the same text.
    #[must_use]
    pub fn number(value: f64) -> Self {
        Self::Constant(format!("{value}"))
    }

    /// Builds a variable. The name is kept verbatim; two variables with the
    /// same name within one resolution attempt denote the same binding slot.
    #[must_use]
    pub fn variable(name: impl Into<String>) -> Self {
        Self::Variable(name.into())
    }

    /// Whether this term is a variable.
    #[must_use]
    pub const fn is_variable(&self) -> bool {
        matches!(self, Self::Variable(_))
    }

    /// Whether this term is a constant.
    #[must_use]
    pub const fn is_constant(&self) -> bool {
        matches!(self, Self::Constant(_))
    }

    /// The textual payload: constant text or variable name.
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Constant(text) | Self::Variable(text) => text,
        }
    }

    /// Parses the constant as a number, if it is one.
    pub(crate) fn numeric_value(&self) -> Option<f64> {
        match self {
            Self::Constant(text) => text.parse().ok(),
            Self::Variable(_) => None,
        }
    }

    /// Constant-to-constant comparison: numeric when both sides parse as
    /// numbers (so `1` matches `1.0`), textual otherwise.
    pub(crate) fn constant_matches(&self, other: &Self) -> bool {
        match (self.numeric_value(), other.numeric_value()) {
            (Some(a), Some(b)) => (a - b).abs() < f64::EPSILON,
            _ => self.text() == other.text(),
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}
