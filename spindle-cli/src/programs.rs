//! Built-in demo programs, constructed directly as expression data.

use spindle_term::{Expr, ExprRef, PrimOp, TermError};

/// A named demo program.
pub struct Program {
    pub name: &'static str,
    pub about: &'static str,
    pub build: fn() -> Result<ExprRef, TermError>,
}

/// All available demo programs.
pub fn all() -> Vec<Program> {
    vec![
        Program {
            name: "add",
            about: "2 + 3",
            build: add,
        },
        Program {
            name: "arith",
            about: "nested arithmetic: -((2 * 3 * 4) - (10 + 4))",
            build: arith,
        },
        Program {
            name: "project",
            about: "first projection of a pair",
            build: project,
        },
        Program {
            name: "eq",
            about: "structural equality of two integers",
            build: eq,
        },
        Program {
            name: "case",
            about: "case dispatch with a default branch",
            build: case_dispatch,
        },
        Program {
            name: "fact",
            about: "factorial of 5 via a fixpoint closure",
            build: fact,
        },
    ]
}

/// Find a program by name.
pub fn find(name: &str) -> Option<Program> {
    all().into_iter().find(|p| p.name == name)
}

fn add() -> Result<ExprRef, TermError> {
    Ok(Expr::app(
        Expr::prim(PrimOp::Add),
        vec![Expr::int(2), Expr::int(3)],
    ))
}

fn arith() -> Result<ExprRef, TermError> {
    let product = Expr::app(
        Expr::prim(PrimOp::Mul),
        vec![Expr::int(2), Expr::int(3), Expr::int(4)],
    );
    let sum = Expr::app(Expr::prim(PrimOp::Add), vec![Expr::int(10), Expr::int(4)]);
    let diff = Expr::app(Expr::prim(PrimOp::Sub), vec![product, sum]);
    Ok(Expr::app(Expr::prim(PrimOp::Neg), vec![diff]))
}

fn project() -> Result<ExprRef, TermError> {
    Ok(Expr::fst(Expr::pair(Expr::int(1), Expr::int(2))))
}

fn eq() -> Result<ExprRef, TermError> {
    Ok(Expr::app(
        Expr::prim(PrimOp::Eq),
        vec![Expr::int(3), Expr::int(3)],
    ))
}

fn case_dispatch() -> Result<ExprRef, TermError> {
    Ok(Expr::case_of(
        Expr::int(7),
        vec![
            Expr::int(0),
            Expr::int(99),
            Expr::nil(),
            Expr::int(-1),
            Expr::int(42),
        ],
    ))
}

fn fact() -> Result<ExprRef, TermError> {
    let recurse = Expr::app(
        Expr::sym("fact"),
        vec![Expr::app(
            Expr::prim(PrimOp::Sub),
            vec![Expr::sym("n"), Expr::int(1)],
        )],
    );
    let body = Expr::case_of(
        Expr::sym("n"),
        vec![
            Expr::int(0),
            Expr::int(1),
            Expr::app(Expr::prim(PrimOp::Mul), vec![Expr::sym("n"), recurse]),
        ],
    );
    let f = Expr::fun(vec![Expr::sym("n")], body, Some("fact".to_string()))?;
    Ok(Expr::app(f, vec![Expr::int(5)]))
}
