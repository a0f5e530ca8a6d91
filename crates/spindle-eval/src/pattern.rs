//! Structural pattern matching for case expressions.

use spindle_term::{ExprKind, ExprRef};

use crate::EvalError;

/// Returns whether `cond` matches `pattern`.
///
/// Pure and non-suspending: the condition must already be in weak head
/// normal form. Symbol patterns are wildcards that match anything and bind
/// nothing; see the notes in DESIGN.md on that gap.
pub fn matches(pattern: &ExprRef, cond: &ExprRef) -> Result<bool, EvalError> {
    match pattern.kind() {
        ExprKind::Nil => Ok(matches!(cond.kind(), ExprKind::Nil)),
        ExprKind::Int(want) => match cond.kind() {
            ExprKind::Int(found) => Ok(want == found),
            _ => Ok(false),
        },
        ExprKind::Prim(want) => match cond.kind() {
            ExprKind::Prim(found) => Ok(want == found),
            _ => Ok(false),
        },
        ExprKind::Pair(first, second) => match cond.kind() {
            ExprKind::Pair(cond_first, cond_second) => {
                Ok(matches(first, cond_first)? && matches(second, cond_second)?)
            }
            _ => Ok(false),
        },
        ExprKind::Sym(_) => Ok(true),
        _ => Err(EvalError::InvalidPattern(pattern.to_string())),
    }
}
