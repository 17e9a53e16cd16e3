//! Abstract syntax.
//!
//! Nodes form a closed sum dispatched by exhaustive match in the evaluator,
//! so an unhandled node kind is a compile-time impossibility rather than a
//! runtime lookup failure. `Option` appears only where absence is
//! meaningful: a declaration without an initializer or annotation, a
//! function without a return annotation.

use crate::types::Primitive;

/// One AST node. The parser produces these; tests may build them directly.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Top-level statement sequence.
    Program { statements: Vec<Node> },
    /// Infix binary operation.
    Binary {
        op: BinOp,
        left: Box<Node>,
        right: Box<Node>,
    },
    /// A literal with its text and declared primitive type.
    Factor { text: String, ty: Primitive },
    /// Parenthesized expression; transparent to evaluation.
    Group(Box<Node>),
    /// `let name [: type] [= value]`.
    Let {
        name: String,
        annotation: Option<TypeExpr>,
        value: Option<Box<Node>>,
    },
    /// Reference to a variable in scope.
    Variable { name: String },
    /// `typeof T`: a nil-valued expression carrying an explicit type.
    TypeOf { annotation: TypeExpr },
    /// `expr as T`: unchecked type assertion; text passes through.
    As {
        value: Box<Node>,
        annotation: TypeExpr,
    },
    /// Anonymous function literal.
    Function {
        params: Vec<Param>,
        ret: Option<TypeExpr>,
        body: Box<Node>,
    },
    /// Call expression.
    Call { callee: Box<Node>, args: Vec<Node> },
    /// Field access `target.field`.
    Traverse { target: Box<Node>, field: String },
    /// Array index `target[index]`.
    Index {
        target: Box<Node>,
        index: Box<Node>,
    },
    /// Table literal `{ name = value, ... }`.
    TableLit { fields: Vec<TableField> },
    /// Array literal `[ item, ... ]`.
    ArrayLit { items: Vec<Node> },
    /// Assignment statement.
    Assign { left: Box<Node>, right: Box<Node> },
}

/// A function parameter: name plus optional type annotation.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub annotation: Option<TypeExpr>,
}

/// One field of a table literal.
#[derive(Debug, Clone, PartialEq)]
pub struct TableField {
    pub name: String,
    pub value: Node,
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Plus,
    Minus,
    Times,
    Over,
    Concat,
}

impl BinOp {
    /// The Lua operator this emits as. Concatenation has its own emission
    /// path and never uses this.
    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Plus => "+",
            BinOp::Minus => "-",
            BinOp::Times => "*",
            BinOp::Over => "/",
            BinOp::Concat => "..",
        }
    }
}

/// A surface type annotation, resolved against the engine on evaluation.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeExpr {
    Primitive(Primitive),
    Array(Box<TypeExpr>),
    Function {
        params: Vec<TypeExpr>,
        ret: Box<TypeExpr>,
    },
    /// `$Name`.
    Generic(String),
}
