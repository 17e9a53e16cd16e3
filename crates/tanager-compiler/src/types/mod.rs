//! The type system: representation, arenas, and the unification engine.

mod arena;
mod engine;
mod printer;
mod ty;

#[cfg(test)]
mod engine_tests;

pub use arena::{TableArena, TypeVarArena};
pub use engine::{GenericBindings, GenericDecl, TypeEngine};
pub use printer::TypePrinter;
pub use ty::{Primitive, Table, TableId, Type, TypeVarId};
