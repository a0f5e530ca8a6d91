//! One-step reduction and the force loop.

use std::collections::VecDeque;
use std::rc::Rc;

use spindle_term::{Chan, Context, Expr, ExprKind, ExprRef, PrimOp};

use crate::pattern::matches;
use crate::scheduler::{Scheduler, WorkItem};
use crate::EvalError;

/// The evaluator: reduction logic plus the scheduler state that drives
/// deferred work. Each evaluator is an independent session; nothing is
/// shared between instances.
pub struct Evaluator {
    sched: Scheduler,
    step_limit: Option<usize>,
    steps: usize,
}

impl Evaluator {
    pub fn new() -> Self {
        Self {
            sched: Scheduler::new(),
            step_limit: None,
            steps: 0,
        }
    }

    /// Cap the number of force iterations. When the cap is hit, `force`
    /// returns the current partial expression instead of looping forever.
    /// The original interactive engine used a cap of 100 in debug mode.
    pub fn with_step_limit(mut self, limit: usize) -> Self {
        self.step_limit = Some(limit);
        self
    }

    /// Force iterations taken by the most recent `force` call.
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Work items not yet retired from the queue.
    pub fn pending(&self) -> usize {
        self.sched.pending()
    }

    /// Whether the queue has fully drained.
    pub fn is_idle(&self) -> bool {
        self.sched.is_idle()
    }

    /// Evaluate `e` in `ctx` without blocking.
    ///
    /// Values are returned unchanged. A channel forwards its resolved value,
    /// or is returned as-is while still pending. Anything else is wrapped in
    /// a fresh channel whose reduction is deferred to the scheduler; the
    /// channel is returned immediately as a placeholder.
    pub fn eval(&mut self, ctx: &Context, e: &ExprRef) -> Result<ExprRef, EvalError> {
        if e.is_value() {
            return Ok(e.clone());
        }

        if let ExprKind::Chan(chan) = e.kind() {
            return Ok(chan.resolved().unwrap_or_else(|| e.clone()));
        }

        let chan = Chan::new(ctx.clone(), e.clone());
        self.sched.spawn(chan.clone());
        Ok(Expr::chan(chan))
    }

    /// Take one step of reduction. The result is not necessarily a value;
    /// callers that need a value must re-suspend or drive the loop.
    pub fn eval_step(&mut self, ctx: &Context, e: &ExprRef) -> Result<ExprRef, EvalError> {
        match e.kind() {
            ExprKind::Nil
            | ExprKind::Pair(_, _)
            | ExprKind::Int(_)
            | ExprKind::Prim(_)
            | ExprKind::Closure { .. } => Ok(e.clone()),

            ExprKind::Sym(name) => Ok(ctx.lookup(name)?),

            ExprKind::Fun {
                params,
                body,
                fix_name,
            } => Ok(Expr::closure(
                ctx.clone(),
                params.clone(),
                body.clone(),
                fix_name.clone(),
            )),

            ExprKind::Chan(chan) => Ok(chan.resolved().unwrap_or_else(|| e.clone())),

            ExprKind::Fst(operand) => {
                let p = self.eval(ctx, operand)?;
                match p.kind() {
                    ExprKind::Pair(first, _) => Ok(first.clone()),
                    _ => Ok(Expr::fst(p)),
                }
            }

            ExprKind::Snd(operand) => {
                let p = self.eval(ctx, operand)?;
                match p.kind() {
                    ExprKind::Pair(_, second) => Ok(second.clone()),
                    _ => Ok(Expr::snd(p)),
                }
            }

            ExprKind::App { callee, args } => {
                let f = self.eval(ctx, callee)?;
                let mut vargs = Vec::with_capacity(args.len());
                for arg in args {
                    vargs.push(self.eval(ctx, arg)?);
                }

                match f.kind() {
                    ExprKind::Prim(op) => self.apply_prim(*op, f.clone(), vargs),
                    ExprKind::Closure { .. } => self.apply_closure(&f, vargs),
                    // Callee not yet reduced to something applicable: retry later.
                    _ => Ok(Expr::app(f, vargs)),
                }
            }

            ExprKind::Case {
                scrutinee,
                branches,
            } => {
                let cond = self.eval(ctx, scrutinee)?;
                if !cond.is_whnf() {
                    return Ok(Expr::case_of(cond, branches.clone()));
                }

                let mut i = 0;
                while i < branches.len() {
                    // An odd-length branch list ends with an unconditional
                    // default body.
                    if i == branches.len() - 1 {
                        return self.eval(ctx, &branches[i]);
                    }
                    if matches(&branches[i], &cond)? {
                        return self.eval(ctx, &branches[i + 1]);
                    }
                    i += 2;
                }
                Err(EvalError::MalformedCase)
            }
        }
    }

    fn apply_prim(
        &mut self,
        op: PrimOp,
        f: ExprRef,
        args: Vec<ExprRef>,
    ) -> Result<ExprRef, EvalError> {
        match op {
            // Structural equality, type-agnostic; does not wait for its
            // arguments to reduce.
            PrimOp::Eq => {
                expect_arity(2, &args)?;
                if args[0] == args[1] {
                    Ok(Expr::int(1))
                } else {
                    Ok(Expr::nil())
                }
            }

            PrimOp::Add => match all_ints(&args) {
                Some(ns) => Ok(Expr::int(ns.iter().sum())),
                None => Ok(Expr::app(f, args)),
            },

            PrimOp::Mul => match all_ints(&args) {
                Some(ns) => Ok(Expr::int(ns.iter().product())),
                None => Ok(Expr::app(f, args)),
            },

            PrimOp::Sub => {
                expect_arity(2, &args)?;
                match all_ints(&args) {
                    Some(ns) => Ok(Expr::int(ns[0] - ns[1])),
                    None => Ok(Expr::app(f, args)),
                }
            }

            PrimOp::Neg => {
                expect_arity(1, &args)?;
                match all_ints(&args) {
                    Some(ns) => Ok(Expr::int(-ns[0])),
                    None => Ok(Expr::app(f, args)),
                }
            }
        }
    }

    fn apply_closure(&mut self, f: &ExprRef, args: Vec<ExprRef>) -> Result<ExprRef, EvalError> {
        let ExprKind::Closure {
            ctx,
            params,
            body,
            fix_name,
        } = f.kind()
        else {
            return Ok(Expr::app(f.clone(), args));
        };

        // Over-application is an error; under-application binds a prefix of
        // the parameters and leaves the rest unbound.
        if args.len() > params.len() {
            return Err(EvalError::ArityMismatch {
                expected: params.len(),
                found: args.len(),
            });
        }

        let mut bindings: Vec<(String, ExprRef)> = Vec::with_capacity(params.len() + 1);
        if let Some(name) = fix_name {
            // Self-reference for recursion.
            bindings.push((name.clone(), f.clone()));
        }
        for (param, arg) in params.iter().zip(args) {
            bindings.push((param.clone(), arg));
        }

        let app_ctx = ctx.extend(bindings);
        self.eval(&app_ctx, body)
    }

    /// Run one deferred reduction step. Returns whether the item's channel
    /// resolved and the item should be retired.
    fn run_item(&mut self, item: &WorkItem) -> Result<bool, EvalError> {
        let pending = item.chan.pending();
        let v = self.eval_step(&item.chan.ctx(), &pending)?;
        if !Rc::ptr_eq(&v, &pending) {
            pending.set_cached(v.clone());
        }
        Ok(item.chan.resolve(v))
    }

    /// Drive `e` to a recognized value.
    pub fn force(&mut self, ctx: &Context, e: &ExprRef) -> Result<ExprRef, EvalError> {
        self.force_with(ctx, e, |_, _| {})
    }

    /// Drive `e` to a recognized value, invoking `on_step` with the current
    /// expression and iteration index once per pass.
    ///
    /// Each pass runs every work item that was active when the pass began
    /// exactly once, in enqueue order; items spawned during the pass wait
    /// for the next one. The top-level expression then advances one step.
    pub fn force_with(
        &mut self,
        ctx: &Context,
        e: &ExprRef,
        mut on_step: impl FnMut(&ExprRef, usize),
    ) -> Result<ExprRef, EvalError> {
        let mut e = e.clone();
        self.steps = 0;

        while !e.is_value() {
            let active = self.sched.take_active();
            let mut survivors = VecDeque::with_capacity(active.len());
            for item in active {
                if !self.run_item(&item)? {
                    survivors.push_back(item);
                }
            }
            self.sched.requeue(survivors);

            e = self.eval_step(ctx, &e)?;
            on_step(&e, self.steps);
            self.steps += 1;

            if let Some(limit) = self.step_limit {
                if self.steps >= limit && !e.is_value() {
                    // Liveness over correctness: hand back the partial
                    // expression, discarding pending work.
                    return Ok(e);
                }
            }
        }

        Ok(e)
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

fn expect_arity(expected: usize, args: &[ExprRef]) -> Result<(), EvalError> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(EvalError::PrimArity {
            expected,
            found: args.len(),
        })
    }
}

/// The integer payloads of `args`, or `None` if any argument has not yet
/// reduced to an integer.
fn all_ints(args: &[ExprRef]) -> Option<Vec<i64>> {
    args.iter()
        .map(|a| match a.kind() {
            ExprKind::Int(n) => Some(*n),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values() -> Vec<ExprRef> {
        vec![
            Expr::int(3),
            Expr::nil(),
            Expr::pair(Expr::int(1), Expr::int(2)),
            Expr::prim(PrimOp::Add),
            Expr::closure(Context::empty(), vec!["x".to_string()], Expr::sym("x"), None),
        ]
    }

    #[test]
    fn test_eval_step_is_identity_on_values() {
        let mut eval = Evaluator::new();
        let ctx = Context::empty();
        for v in values() {
            let stepped = eval.eval_step(&ctx, &v).unwrap();
            assert!(Rc::ptr_eq(&stepped, &v));
        }
    }

    #[test]
    fn test_eval_does_not_suspend_values() {
        let mut eval = Evaluator::new();
        let ctx = Context::empty();
        for v in values() {
            let out = eval.eval(&ctx, &v).unwrap();
            assert!(Rc::ptr_eq(&out, &v));
        }
        assert_eq!(eval.pending(), 0);
    }

    #[test]
    fn test_eval_suspends_non_values_as_channels() {
        let mut eval = Evaluator::new();
        let ctx = Context::empty().extend([("x".to_string(), Expr::int(1))]);

        let out = eval.eval(&ctx, &Expr::sym("x")).unwrap();
        assert!(matches!(out.kind(), ExprKind::Chan(_)));
        assert_eq!(eval.pending(), 1);
    }

    #[test]
    fn test_eval_forwards_resolved_channels() {
        let mut eval = Evaluator::new();
        let ctx = Context::empty();

        let chan = Chan::new(ctx.clone(), Expr::sym("x"));
        chan.resolve(Expr::int(9));
        let wrapped = Expr::chan(chan);

        let out = eval.eval(&ctx, &wrapped).unwrap();
        assert_eq!(out, Expr::int(9));
        // No new work was spawned for an already-resolved channel.
        assert_eq!(eval.pending(), 0);
    }

    #[test]
    fn test_fun_promotes_to_closure() {
        let mut eval = Evaluator::new();
        let ctx = Context::empty().extend([("y".to_string(), Expr::int(5))]);

        let fun = Expr::fun(vec![Expr::sym("x")], Expr::sym("y"), None).unwrap();
        let stepped = eval.eval_step(&ctx, &fun).unwrap();

        match stepped.kind() {
            ExprKind::Closure {
                ctx: captured,
                params,
                ..
            } => {
                assert_eq!(params, &["x".to_string()]);
                assert_eq!(captured.lookup("y").unwrap(), Expr::int(5));
            }
            other => panic!("expected closure, got {:?}", other),
        }
    }

    #[test]
    fn test_sym_lookup_miss_is_unbound() {
        let mut eval = Evaluator::new();
        let err = eval.eval_step(&Context::empty(), &Expr::sym("ghost"));
        assert!(matches!(err, Err(EvalError::Term(_))));
    }

    #[test]
    fn test_prim_sub_arity_is_checked() {
        let mut eval = Evaluator::new();
        let ctx = Context::empty();
        let e = Expr::app(Expr::prim(PrimOp::Sub), vec![Expr::int(1)]);
        let err = eval.eval_step(&ctx, &e).unwrap_err();
        assert_eq!(err, EvalError::PrimArity {
            expected: 2,
            found: 1
        });
        // Primitives are exact-arity; the message must not suggest an
        // upper bound the way closure over-application does.
        assert_eq!(
            err.to_string(),
            "primitive arity mismatch: expected exactly 2 argument(s), found 1"
        );
    }

    #[test]
    fn test_prim_defers_until_all_ints() {
        let mut eval = Evaluator::new();
        let ctx = Context::empty().extend([("x".to_string(), Expr::int(2))]);

        let e = Expr::app(Expr::prim(PrimOp::Add), vec![Expr::sym("x"), Expr::int(3)]);
        let stepped = eval.eval_step(&ctx, &e).unwrap();

        // The symbol argument suspended, so the application is residual.
        assert!(matches!(stepped.kind(), ExprKind::App { .. }));
        assert_eq!(eval.pending(), 1);
    }
}
