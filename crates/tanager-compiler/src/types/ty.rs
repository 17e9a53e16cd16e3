//! Type representation.
//!
//! Types form a closed sum. Unresolved types are `Reference`s into the
//! type-variable arena; table types are `Table` ids into the table arena, so
//! a `Type` value is always cheap to clone and never aliases another one
//! through pointers. Identity goes through arena ids only.

use indexmap::IndexMap;

/// A lightweight handle to a slot in the type-variable arena.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct TypeVarId(u32);

impl TypeVarId {
    #[inline]
    pub fn from_raw(index: u32) -> Self {
        Self(index)
    }

    #[inline]
    pub fn as_u32(self) -> u32 {
        self.0
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A lightweight handle to a table in the table arena.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct TableId(u32);

impl TableId {
    #[inline]
    pub fn from_raw(index: u32) -> Self {
        Self(index)
    }

    #[inline]
    pub fn as_u32(self) -> u32 {
        self.0
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Built-in scalar types.
///
/// `Unknown` means "not yet inferred" and `Any` means "deliberately
/// untyped" (the result of a stringify, for example). Both act as universal
/// wildcards in compatibility checks but are never merged into each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    Nil,
    Number,
    String,
    Bool,
    Unknown,
    Any,
}

impl Primitive {
    pub fn name(self) -> &'static str {
        match self {
            Primitive::Nil => "nil",
            Primitive::Number => "number",
            Primitive::String => "string",
            Primitive::Bool => "bool",
            Primitive::Unknown => "unknown",
            Primitive::Any => "any",
        }
    }
}

impl std::fmt::Display for Primitive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// An inferred or declared type.
#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    Primitive(Primitive),
    /// Indirection into the type-variable arena; the canonical form of
    /// "not yet known, to be solved by unification".
    Reference(TypeVarId),
    Function {
        params: Vec<Type>,
        ret: Box<Type>,
    },
    /// Indirection into the table arena. Compared by id except inside
    /// structural compatibility checks.
    Table(TableId),
    Array(Box<Type>),
    /// A named placeholder bound only within one call's unification.
    /// `depth` records the lexical nesting level that introduced it.
    Generic {
        name: String,
        depth: u32,
    },
}

impl Type {
    pub const NIL: Type = Type::Primitive(Primitive::Nil);
    pub const NUMBER: Type = Type::Primitive(Primitive::Number);
    pub const STRING: Type = Type::Primitive(Primitive::String);
    pub const BOOL: Type = Type::Primitive(Primitive::Bool);
    pub const UNKNOWN: Type = Type::Primitive(Primitive::Unknown);
    pub const ANY: Type = Type::Primitive(Primitive::Any);

    /// The wrapped primitive, if this is a primitive type.
    pub fn primitive(&self) -> Option<Primitive> {
        match self {
            Type::Primitive(p) => Some(*p),
            _ => None,
        }
    }
}

/// A structural record type. The field set is fixed at the moment the table
/// literal finishes evaluating; field types may still be unresolved
/// references that settle later.
#[derive(Debug, Clone, Default)]
pub struct Table {
    pub fields: IndexMap<String, Type>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }
}
