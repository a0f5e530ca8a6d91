//! Expression terms.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::{Chan, ChanRef, Context, TermError};

pub type ExprRef = Rc<Expr>;

/// A primitive operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimOp {
    Add,
    Mul,
    Sub,
    Neg,
    Eq,
}

impl PrimOp {
    pub fn name(self) -> &'static str {
        match self {
            PrimOp::Add => "add",
            PrimOp::Mul => "mul",
            PrimOp::Sub => "sub",
            PrimOp::Neg => "neg",
            PrimOp::Eq => "=",
        }
    }
}

impl fmt::Display for PrimOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The term language, one variant per kind.
#[derive(Debug, Clone)]
pub enum ExprKind {
    /// The empty value
    Nil,
    /// A pair of two expressions
    Pair(ExprRef, ExprRef),
    /// First projection of a pair
    Fst(ExprRef),
    /// Second projection of a pair
    Snd(ExprRef),
    /// Integer literal
    Int(i64),
    /// Free symbol, resolved through the context
    Sym(String),
    /// Placeholder for a pending reduction
    Chan(ChanRef),
    /// Primitive operator
    Prim(PrimOp),
    /// Unevaluated function; promotes to a closure when reduced
    Fun {
        params: Vec<String>,
        body: ExprRef,
        fix_name: Option<String>,
    },
    /// Function paired with its captured lexical context
    Closure {
        ctx: Context,
        params: Vec<String>,
        body: ExprRef,
        fix_name: Option<String>,
    },
    /// Application of a callee to arguments
    App { callee: ExprRef, args: Vec<ExprRef> },
    /// Pattern-matching case expression. Branches alternate pattern, body;
    /// an odd-length list ends with an unconditional default body.
    Case {
        scrutinee: ExprRef,
        branches: Vec<ExprRef>,
    },
}

/// An expression node: a term paired with a transient memoization slot.
///
/// The slot records the most recent reduction result for this node and is
/// read by observers (step tracing, live displays); it takes no part in
/// equality, display, or the reduction semantics themselves.
pub struct Expr {
    kind: ExprKind,
    cached: RefCell<Option<ExprRef>>,
}

impl Expr {
    fn node(kind: ExprKind) -> ExprRef {
        Rc::new(Expr {
            kind,
            cached: RefCell::new(None),
        })
    }

    pub fn nil() -> ExprRef {
        Self::node(ExprKind::Nil)
    }

    pub fn pair(first: ExprRef, second: ExprRef) -> ExprRef {
        Self::node(ExprKind::Pair(first, second))
    }

    pub fn fst(operand: ExprRef) -> ExprRef {
        Self::node(ExprKind::Fst(operand))
    }

    pub fn snd(operand: ExprRef) -> ExprRef {
        Self::node(ExprKind::Snd(operand))
    }

    pub fn int(value: i64) -> ExprRef {
        Self::node(ExprKind::Int(value))
    }

    pub fn sym(name: impl Into<String>) -> ExprRef {
        Self::node(ExprKind::Sym(name.into()))
    }

    pub fn chan(chan: ChanRef) -> ExprRef {
        Self::node(ExprKind::Chan(chan))
    }

    pub fn prim(op: PrimOp) -> ExprRef {
        Self::node(ExprKind::Prim(op))
    }

    /// Construct a function. Every parameter must be a `Sym`.
    pub fn fun(
        params: Vec<ExprRef>,
        body: ExprRef,
        fix_name: Option<String>,
    ) -> Result<ExprRef, TermError> {
        let mut names = Vec::with_capacity(params.len());
        for param in &params {
            match param.kind() {
                ExprKind::Sym(name) => names.push(name.clone()),
                _ => {
                    return Err(TermError::TypeAssertion {
                        expected: "Sym",
                        found: param.to_string(),
                    });
                }
            }
        }
        Ok(Self::node(ExprKind::Fun {
            params: names,
            body,
            fix_name,
        }))
    }

    /// Construct a closure directly from already-validated parts.
    pub fn closure(
        ctx: Context,
        params: Vec<String>,
        body: ExprRef,
        fix_name: Option<String>,
    ) -> ExprRef {
        Self::node(ExprKind::Closure {
            ctx,
            params,
            body,
            fix_name,
        })
    }

    pub fn app(callee: ExprRef, args: Vec<ExprRef>) -> ExprRef {
        Self::node(ExprKind::App { callee, args })
    }

    pub fn case_of(scrutinee: ExprRef, branches: Vec<ExprRef>) -> ExprRef {
        Self::node(ExprKind::Case {
            scrutinee,
            branches,
        })
    }

    pub fn kind(&self) -> &ExprKind {
        &self.kind
    }

    /// Whether this expression is a recognized value.
    pub fn is_value(&self) -> bool {
        matches!(
            self.kind,
            ExprKind::Int(_)
                | ExprKind::Nil
                | ExprKind::Pair(_, _)
                | ExprKind::Prim(_)
                | ExprKind::Closure { .. }
        )
    }

    /// Whether this expression is in weak head normal form. In this engine
    /// the WHNF set coincides with the value set: sub-expressions of values
    /// are never forced further.
    pub fn is_whnf(&self) -> bool {
        self.is_value()
    }

    /// Ordered structural children, for non-semantic traversal.
    pub fn children(&self) -> Vec<ExprRef> {
        match &self.kind {
            ExprKind::Nil | ExprKind::Int(_) | ExprKind::Sym(_) | ExprKind::Prim(_) => Vec::new(),
            ExprKind::Pair(first, second) => vec![first.clone(), second.clone()],
            ExprKind::Fst(operand) | ExprKind::Snd(operand) => vec![operand.clone()],
            ExprKind::Chan(chan) => vec![chan.pending()],
            ExprKind::Fun { body, .. } | ExprKind::Closure { body, .. } => vec![body.clone()],
            ExprKind::App { callee, args } => {
                let mut out = vec![callee.clone()];
                out.extend(args.iter().cloned());
                out
            }
            ExprKind::Case {
                scrutinee,
                branches,
            } => {
                let mut out = vec![scrutinee.clone()];
                out.extend(branches.iter().cloned());
                out
            }
        }
    }

    /// The most recent reduction result recorded for this node, if any.
    pub fn cached_value(&self) -> Option<ExprRef> {
        self.cached.borrow().clone()
    }

    pub fn has_cached_value(&self) -> bool {
        self.cached.borrow().is_some()
    }

    /// Record a reduction result on this node. Overwrites any earlier
    /// result; observers always see the latest.
    pub fn set_cached(&self, v: ExprRef) {
        *self.cached.borrow_mut() = Some(v);
    }

    /// Deep structural copy with fresh node identity. Memoization slots are
    /// not carried over.
    pub fn fresh(&self) -> ExprRef {
        let kind = match &self.kind {
            ExprKind::Nil => ExprKind::Nil,
            ExprKind::Pair(first, second) => ExprKind::Pair(first.fresh(), second.fresh()),
            ExprKind::Fst(operand) => ExprKind::Fst(operand.fresh()),
            ExprKind::Snd(operand) => ExprKind::Snd(operand.fresh()),
            ExprKind::Int(n) => ExprKind::Int(*n),
            ExprKind::Sym(name) => ExprKind::Sym(name.clone()),
            ExprKind::Chan(chan) => {
                let copy = Chan::new(chan.ctx(), chan.pending().fresh());
                if let Some(v) = chan.resolved() {
                    copy.resolve(v);
                }
                ExprKind::Chan(copy)
            }
            ExprKind::Prim(op) => ExprKind::Prim(*op),
            ExprKind::Fun {
                params,
                body,
                fix_name,
            } => ExprKind::Fun {
                params: params.clone(),
                body: body.fresh(),
                fix_name: fix_name.clone(),
            },
            ExprKind::Closure {
                ctx,
                params,
                body,
                fix_name,
            } => ExprKind::Closure {
                ctx: ctx.clone(),
                params: params.clone(),
                body: body.fresh(),
                fix_name: fix_name.clone(),
            },
            ExprKind::App { callee, args } => ExprKind::App {
                callee: callee.fresh(),
                args: args.iter().map(|a| a.fresh()).collect(),
            },
            ExprKind::Case {
                scrutinee,
                branches,
            } => ExprKind::Case {
                scrutinee: scrutinee.fresh(),
                branches: branches.iter().map(|b| b.fresh()).collect(),
            },
        };
        Self::node(kind)
    }
}

impl PartialEq for Expr {
    fn eq(&self, other: &Self) -> bool {
        if std::ptr::eq(self, other) {
            return true;
        }
        match (&self.kind, &other.kind) {
            (ExprKind::Nil, ExprKind::Nil) => true,
            (ExprKind::Pair(a1, b1), ExprKind::Pair(a2, b2)) => a1 == a2 && b1 == b2,
            (ExprKind::Fst(a), ExprKind::Fst(b)) => a == b,
            (ExprKind::Snd(a), ExprKind::Snd(b)) => a == b,
            (ExprKind::Int(a), ExprKind::Int(b)) => a == b,
            (ExprKind::Sym(a), ExprKind::Sym(b)) => a == b,
            (ExprKind::Chan(a), ExprKind::Chan(b)) => a == b,
            (ExprKind::Prim(a), ExprKind::Prim(b)) => a == b,
            (
                ExprKind::Fun {
                    params: p1,
                    body: b1,
                    fix_name: f1,
                },
                ExprKind::Fun {
                    params: p2,
                    body: b2,
                    fix_name: f2,
                },
            ) => p1 == p2 && b1 == b2 && f1 == f2,
            (
                ExprKind::Closure {
                    ctx: c1,
                    params: p1,
                    body: b1,
                    fix_name: f1,
                },
                ExprKind::Closure {
                    ctx: c2,
                    params: p2,
                    body: b2,
                    fix_name: f2,
                },
            ) => p1 == p2 && b1 == b2 && f1 == f2 && c1 == c2,
            (
                ExprKind::App {
                    callee: c1,
                    args: a1,
                },
                ExprKind::App {
                    callee: c2,
                    args: a2,
                },
            ) => c1 == c2 && a1 == a2,
            (
                ExprKind::Case {
                    scrutinee: s1,
                    branches: b1,
                },
                ExprKind::Case {
                    scrutinee: s2,
                    branches: b2,
                },
            ) => s1 == s2 && b1 == b2,
            _ => false,
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ExprKind::Nil => write!(f, "nil"),
            ExprKind::Pair(first, second) => write!(f, "({}, {})", first, second),
            ExprKind::Fst(operand) => write!(f, "{}.1", operand),
            ExprKind::Snd(operand) => write!(f, "{}.2", operand),
            ExprKind::Int(n) => write!(f, "{}", n),
            ExprKind::Sym(name) => f.write_str(name),
            ExprKind::Chan(chan) => write!(f, "(ch {})", chan.pending()),
            ExprKind::Prim(op) => write!(f, "{}", op),
            ExprKind::Fun { params, .. } => write!(f, "fn({})", params.join(",")),
            ExprKind::Closure { params, .. } => write!(f, "<G, fn({})>", params.join(",")),
            ExprKind::App { .. } => write!(f, "apply"),
            ExprKind::Case { .. } => write!(f, "case"),
        }
    }
}

impl fmt::Debug for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}
