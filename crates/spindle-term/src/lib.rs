//! Term representation for the Spindle lazy-evaluation engine.
//!
//! This crate defines the expression language (a tagged union, one variant
//! per term kind), the persistent evaluation context, and the channel type
//! the evaluator uses as a placeholder for pending reductions.

mod chan;
mod context;
mod error;
mod expr;

pub use chan::{Chan, ChanRef};
pub use context::Context;
pub use error::TermError;
pub use expr::{Expr, ExprKind, ExprRef, PrimOp};
