//! Compilation error types.
//!
//! Every error is fatal: the pass aborts on the first violated contract and
//! unwinds to the driver. There is no warning level and no per-statement
//! recovery.

/// Errors raised during parsing or the infer-and-emit pass.
///
/// Type names inside variants are already rendered to their resolved string
/// form, so errors stay detached from the arenas that produced them.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Reference to a variable that is not in scope.
    #[error("variable not found: {0}")]
    UndefinedVariable(String),

    /// Reference to a generic name outside any declaring signature.
    #[error("generic type does not exist: ${0}")]
    UndefinedGeneric(String),

    /// Two types required to be compatible are not.
    #[error("expected {expected} but got {found}")]
    TypeMismatch { expected: String, found: String },

    /// Call on something that is not a function.
    #[error("attempted to call a {found} instead of a function")]
    NotCallable { found: String },

    /// Field access on something that is not a table.
    #[error("attempted to traverse a {found} instead of a table")]
    NotATable { found: String },

    /// Index on something that is not an array.
    #[error("attempted to index a {found} instead of an array")]
    NotAnArray { found: String },

    /// Call argument count differs from the declared parameter count.
    #[error("expected {expected} arguments but got {found}")]
    Arity { expected: usize, found: usize },

    /// Field access on a table lacking that field.
    #[error("table does not contain member: {0}")]
    UnknownField(String),

    /// A generic was already bound to a conflicting type within one call.
    #[error("generic ${name} already bound to {bound}, cannot rebind to {found}")]
    GenericBinding {
        name: String,
        bound: String,
        found: String,
    },

    /// Malformed surface syntax.
    #[error("parse error at line {line}, column {column}: {message}")]
    Parse {
        line: usize,
        column: usize,
        message: String,
    },
}

/// Result type for compiler operations.
pub type Result<T> = std::result::Result<T, Error>;
