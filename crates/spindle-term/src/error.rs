//! Term construction and lookup errors.

use thiserror::Error;

/// Errors raised by term construction and context lookup.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TermError {
    #[error("type assertion failed: expected {expected}, found {found}")]
    TypeAssertion {
        expected: &'static str,
        found: String,
    },

    #[error("unbound symbol `{0}`")]
    UnboundSymbol(String),
}
