//! Evaluation errors.

use spindle_term::TermError;
use thiserror::Error;

/// Errors raised during reduction. All are fatal to the evaluation session:
/// nothing is caught internally, and the caller is expected to halt and
/// surface the offending expression.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EvalError {
    #[error(transparent)]
    Term(#[from] TermError),

    #[error("invalid pattern: {0}")]
    InvalidPattern(String),

    #[error("malformed case expression: no pattern matched and no default branch")]
    MalformedCase,

    /// A closure applied to more arguments than it has parameters.
    #[error("arity mismatch: expected at most {expected} argument(s), found {found}")]
    ArityMismatch { expected: usize, found: usize },

    /// A fixed-arity primitive applied to the wrong number of arguments.
    #[error("primitive arity mismatch: expected exactly {expected} argument(s), found {found}")]
    PrimArity { expected: usize, found: usize },
}
