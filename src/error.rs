//! Error types surfaced by the engine.

use thiserror::Error;

/// Errors produced while building or querying a knowledge base.
///
/// An empty result set is never an error: querying an unknown predicate or a
/// goal with no matching clauses yields an empty solution sequence.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A fact or rule was rejected at assert time. The clause store is left
    /// unchanged when this is returned.
    #[error("malformed clause: {0}")]
    MalformedClause(String),

    /// The query text does not match the `predicate(arg, ...)` grammar.
    /// No resolution is attempted.
    #[error("malformed query: {0}")]
    MalformedQuery(String),

    /// A caller asked a result row for a variable that never appeared in the
    /// query goal. This is a contract violation on the caller's side.
    #[error("variable `{0}` does not appear in the query")]
    UnboundVariable(String),

    /// The resolution depth budget was exhausted, typically by a recursive
    /// rule that never bottoms out. Recoverable: retry with a larger budget
    /// or treat the query as unanswered.
    #[error("resolution depth budget of {0} exceeded")]
    DepthExceeded(usize),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
