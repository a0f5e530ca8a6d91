//! Cooperative work queue for deferred reductions.

use std::collections::VecDeque;

use spindle_term::ChanRef;

/// A deferred single-step reduction, waiting on a channel.
pub(crate) struct WorkItem {
    pub(crate) chan: ChanRef,
}

/// The scheduler's queue state.
///
/// `spawn` only ever targets the side buffer; the active queue is rebuilt
/// between passes by `requeue`. Work enqueued while a pass is draining is
/// therefore never run in that same pass, which gives every pending
/// reduction one step per pass in enqueue order.
#[derive(Default)]
pub struct Scheduler {
    active: VecDeque<WorkItem>,
    spawned: Vec<WorkItem>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defer a reduction step for the given channel.
    pub fn spawn(&mut self, chan: ChanRef) {
        self.spawned.push(WorkItem { chan });
    }

    /// Take the active queue for draining.
    pub(crate) fn take_active(&mut self) -> VecDeque<WorkItem> {
        std::mem::take(&mut self.active)
    }

    /// Install the next active queue: the pass's surviving items followed by
    /// everything spawned since the last requeue.
    pub(crate) fn requeue(&mut self, mut survivors: VecDeque<WorkItem>) {
        survivors.extend(self.spawned.drain(..));
        self.active = survivors;
    }

    /// Number of work items not yet retired.
    pub fn pending(&self) -> usize {
        self.active.len() + self.spawned.len()
    }

    pub fn is_idle(&self) -> bool {
        self.pending() == 0
    }
}
