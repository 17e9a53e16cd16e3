//! Rendering resolved types for reports and error messages.

use std::fmt;

use super::engine::TypeEngine;
use super::ty::Type;

/// Displays a type with all top-level references resolved.
///
/// Tables render by identity (`table#N`); the report prints their field
/// shapes separately.
pub struct TypePrinter<'a> {
    engine: &'a TypeEngine,
    ty: &'a Type,
}

impl<'a> TypePrinter<'a> {
    pub fn new(engine: &'a TypeEngine, ty: &'a Type) -> Self {
        Self { engine, ty }
    }

    fn print(&self, ty: &Type, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.engine.resolve(ty) {
            Type::Primitive(p) => write!(f, "{p}"),
            // Only reachable for a slot holding a bare reference artifact;
            // resolve collapses chains, so render as its arena name.
            Type::Reference(id) => write!(f, "${}", id.as_u32()),
            Type::Function { params, ret } => {
                write!(f, "(")?;
                for (i, p) in params.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    self.print(p, f)?;
                }
                write!(f, ") => ")?;
                self.print(&ret, f)
            }
            Type::Table(id) => write!(f, "table#{}", id.as_u32()),
            Type::Array(inner) => {
                write!(f, "[")?;
                self.print(&inner, f)?;
                write!(f, "]")
            }
            Type::Generic { name, .. } => write!(f, "${name}"),
        }
    }
}

impl fmt::Display for TypePrinter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.print(self.ty, f)
    }
}
