//! The post-pass type report: every table shape and every surviving
//! variable with its resolved type. This is the read-only view the driver
//! prints after compilation.

use serde::Serialize;

use crate::eval::Compiler;

/// One table's resolved field types.
#[derive(Debug, Clone, Serialize)]
pub struct TableReport {
    pub id: u32,
    pub fields: Vec<FieldReport>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FieldReport {
    pub name: String,
    pub ty: String,
}

/// One declared variable with its resolved type.
#[derive(Debug, Clone, Serialize)]
pub struct VariableReport {
    pub name: String,
    pub ty: String,
}

/// Final contents of the table arena and the variable list, with all types
/// rendered in resolved form.
#[derive(Debug, Clone, Serialize)]
pub struct TypeReport {
    pub tables: Vec<TableReport>,
    pub variables: Vec<VariableReport>,
}

impl TypeReport {
    pub fn from_compiler(compiler: &Compiler) -> Self {
        let engine = compiler.engine();

        let tables = engine
            .tables()
            .iter()
            .map(|(id, table)| TableReport {
                id: id.as_u32(),
                fields: table
                    .fields
                    .iter()
                    .map(|(name, ty)| FieldReport {
                        name: name.clone(),
                        ty: engine.render(ty),
                    })
                    .collect(),
            })
            .collect();

        let variables = compiler
            .scopes()
            .iter()
            .map(|var| VariableReport {
                name: var.name.clone(),
                ty: engine.render(&var.ty),
            })
            .collect();

        Self { tables, variables }
    }
}

impl std::fmt::Display for TypeReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for table in &self.tables {
            writeln!(f, "table#{}: {{", table.id)?;
            for field in &table.fields {
                writeln!(f, "  {}: {}", field.name, field.ty)?;
            }
            writeln!(f, "}}")?;
        }
        for var in &self.variables {
            writeln!(f, "{}: {}", var.name, var.ty)?;
        }
        Ok(())
    }
}
