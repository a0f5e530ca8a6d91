//! Reducer and cooperative scheduler for the Spindle lazy-evaluation
//! engine.
//!
//! Evaluation is call-by-need and single-threaded: `eval` never blocks,
//! deferring any real work into a channel on the work queue, and `force`
//! drains the queue pass by pass until the top-level expression reaches a
//! recognized value.

mod error;
mod eval;
mod pattern;
mod scheduler;

pub use error::EvalError;
pub use eval::Evaluator;
pub use pattern::matches;
pub use scheduler::Scheduler;
