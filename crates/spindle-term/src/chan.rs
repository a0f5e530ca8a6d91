//! Channels: placeholder futures for pending reductions.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::{Context, ExprRef};

pub type ChanRef = Rc<Chan>;

/// A placeholder standing in for a not-yet-computed result.
///
/// A channel is created by the evaluator when a non-value expression is
/// first evaluated. While unresolved it tracks the pending expression, which
/// the scheduler re-points at progressively reduced forms; once a reduction
/// yields a recognized value the channel resolves, at most once, and from
/// then on forwards that value transparently.
pub struct Chan {
    ctx: Context,
    pending: RefCell<ExprRef>,
    resolved: RefCell<Option<ExprRef>>,
}

impl Chan {
    pub fn new(ctx: Context, pending: ExprRef) -> ChanRef {
        Rc::new(Chan {
            ctx,
            pending: RefCell::new(pending),
            resolved: RefCell::new(None),
        })
    }

    /// The context the pending expression is being reduced in.
    pub fn ctx(&self) -> Context {
        self.ctx.clone()
    }

    /// The expression this channel is waiting on.
    pub fn pending(&self) -> ExprRef {
        self.pending.borrow().clone()
    }

    /// The resolved value, if any.
    pub fn resolved(&self) -> Option<ExprRef> {
        self.resolved.borrow().clone()
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved.borrow().is_some()
    }

    /// Deliver the result of one reduction step.
    ///
    /// A value resolves the channel; anything else re-points `pending` at
    /// the partially reduced expression so the next step continues from
    /// there. Returns whether the channel should be retired from the active
    /// scheduling set.
    pub fn resolve(&self, v: ExprRef) -> bool {
        if v.is_value() {
            let mut slot = self.resolved.borrow_mut();
            if slot.is_none() {
                *slot = Some(v);
            }
            true
        } else {
            *self.pending.borrow_mut() = v;
            false
        }
    }
}

impl PartialEq for Chan {
    fn eq(&self, other: &Self) -> bool {
        if std::ptr::eq(self, other) {
            return true;
        }
        match (self.resolved(), other.resolved()) {
            (Some(a), Some(b)) => a == b,
            // Two pending computations are only structurally equal if they
            // are reducing the same expression under the same context;
            // equal pending terms under different contexts can resolve to
            // different values.
            (None, None) => self.ctx == other.ctx && self.pending() == other.pending(),
            _ => false,
        }
    }
}

impl fmt::Debug for Chan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(ch {})", self.pending.borrow())
    }
}
