//! Tanager: a single-pass compiler from a small typed expression language
//! to Lua, with structural type inference.
//!
//! The pass walks the AST exactly once, emitting Lua text and inferring a
//! type for every node as it goes. Unresolved types live as mutable slots
//! in an arena and settle through unification; table types are structural;
//! generics bind per call site.
//!
//! # Example
//!
//! ```
//! let out = tanager_compiler::compile("let double = (n: number) => n * 2").unwrap();
//! assert_eq!(out.lua, "local double = (function(n) return (n*2) end)\n");
//! assert_eq!(out.report.variables[0].ty, "(number) => number");
//! ```

pub mod ast;
pub mod error;
pub mod eval;
pub mod parser;
pub mod report;
pub mod scope;
pub mod types;

#[cfg(test)]
mod scope_tests;

pub use error::{Error, Result};
pub use eval::{Compiler, Value};
pub use report::TypeReport;

/// Everything a driver needs from one compilation: the generated Lua and
/// the final type report.
#[derive(Debug, Clone)]
pub struct Compilation {
    pub lua: String,
    pub report: TypeReport,
}

/// Parse and compile a whole source text.
pub fn compile(source: &str) -> Result<Compilation> {
    let program = parser::parse(source)?;
    let mut compiler = Compiler::new();
    let value = compiler.evaluate(&program)?;
    Ok(Compilation {
        lua: value.text,
        report: TypeReport::from_compiler(&compiler),
    })
}
