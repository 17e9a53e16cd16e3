//! Lexically-nested variable scopes.
//!
//! A single integer depth tracks nesting: entering a function body pushes,
//! leaving pops and discards everything declared deeper. Shadowing picks the
//! declaration with the greatest depth for a name.

use crate::error::{Error, Result};
use crate::types::Type;

/// A declared variable or bound parameter.
#[derive(Debug, Clone)]
pub struct Variable {
    pub name: String,
    pub ty: Type,
    pub depth: u32,
}

/// The scope manager: an ordered list of live variables plus the current
/// nesting depth. Generics are scoped by the same depth but live in the
/// type engine; the evaluator purges them alongside each pop.
#[derive(Debug, Default)]
pub struct Scopes {
    depth: u32,
    vars: Vec<Variable>,
}

impl Scopes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Enter a function body.
    pub fn push(&mut self) {
        self.depth += 1;
    }

    /// Leave a function body, discarding every variable declared deeper
    /// than the restored depth. Returns the new depth so the caller can
    /// purge generics to match.
    pub fn pop(&mut self) -> u32 {
        self.depth -= 1;
        let depth = self.depth;
        self.vars.retain(|v| v.depth <= depth);
        depth
    }

    /// Declare a variable at the current depth.
    pub fn declare(&mut self, name: &str, ty: Type) {
        self.vars.push(Variable {
            name: name.to_owned(),
            ty,
            depth: self.depth,
        });
    }

    /// Nearest-enclosing-scope lookup: among live variables with this name,
    /// the one with the greatest depth wins.
    pub fn get(&self, name: &str) -> Result<&Variable> {
        self.vars
            .iter()
            .filter(|v| v.name == name)
            .max_by_key(|v| v.depth)
            .ok_or_else(|| Error::UndefinedVariable(name.to_owned()))
    }

    /// All live variables, in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Variable> {
        self.vars.iter()
    }
}
