//! Evaluation contexts.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::{ExprRef, TermError};

/// An environment mapping free symbol names to bound expressions.
///
/// Contexts are persistent: `extend` produces a new context and never
/// mutates the receiver, so a closure's captured context is unaffected by
/// anything a nested scope does. `Clone` is a reference-count bump.
#[derive(Clone, Default)]
pub struct Context {
    bindings: Rc<HashMap<String, ExprRef>>,
}

impl Context {
    /// The base context with no bindings, used as the root for top-level
    /// evaluation.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Look up a symbol.
    pub fn lookup(&self, name: &str) -> Result<ExprRef, TermError> {
        self.bindings
            .get(name)
            .cloned()
            .ok_or_else(|| TermError::UnboundSymbol(name.to_string()))
    }

    /// Return a new context equal to the receiver with the given bindings
    /// overlaid.
    pub fn extend(&self, bindings: impl IntoIterator<Item = (String, ExprRef)>) -> Context {
        let mut map = (*self.bindings).clone();
        for (name, expr) in bindings {
            map.insert(name, expr);
        }
        Context {
            bindings: Rc::new(map),
        }
    }

    /// Number of bindings in scope.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl PartialEq for Context {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.bindings, &other.bindings) || self.bindings == other.bindings
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.bindings.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_set().entries(names).finish()
    }
}
