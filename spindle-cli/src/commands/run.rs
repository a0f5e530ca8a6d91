//! The `spindle run` and `spindle list` commands.

use spindle_eval::Evaluator;
use spindle_term::Context;

use crate::programs;

pub fn run(name: &str, trace: bool, limit: Option<usize>) -> Result<(), String> {
    let program = programs::find(name)
        .ok_or_else(|| format!("unknown program '{}'; see `spindle list`", name))?;
    let expr = (program.build)().map_err(|e| e.to_string())?;
    let ctx = Context::empty();

    let mut eval = match limit {
        Some(n) => Evaluator::new().with_step_limit(n),
        None => Evaluator::new(),
    };

    let result = if trace {
        eval.force_with(&ctx, &expr, |e, t| println!("step {:>3}: {}", t, e))
    } else {
        eval.force(&ctx, &expr)
    }
    .map_err(|e| e.to_string())?;

    if trace {
        println!("force iterations: {}", eval.steps());
        if !eval.is_idle() {
            println!("pending work items: {}", eval.pending());
        }
    }

    if result.is_value() {
        println!("{}", result);
    } else {
        // Step limit hit: show how far we got.
        println!("partial: {}", result);
    }

    Ok(())
}

pub fn list() -> Result<(), String> {
    for p in programs::all() {
        println!("{:<10} {}", p.name, p.about);
    }
    Ok(())
}
