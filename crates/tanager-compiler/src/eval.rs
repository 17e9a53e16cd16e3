//! The single AST-walking pass: infer types and emit Lua as one traversal.
//!
//! Inference is interleaved with emission deliberately: each node yields a
//! `Value` carrying both its generated text and its inferred type, and the
//! type side effects (slot rebinds, table field registration, generic
//! declarations) happen in source order as the text is produced. There is no
//! second pass; nothing is re-visited after emission.

use crate::ast::{BinOp, Node, Param, TableField, TypeExpr};
use crate::error::{Error, Result};
use crate::scope::Scopes;
use crate::types::{GenericBindings, Primitive, Type, TypeEngine};

/// The result of evaluating one node: an emitted Lua fragment and the
/// node's inferred type. Transient; never stored.
#[derive(Debug, Clone)]
pub struct Value {
    pub text: String,
    pub ty: Type,
}

impl Value {
    /// A statement value: emitted text with type `Nil`.
    fn line(text: String) -> Self {
        Self {
            text,
            ty: Type::NIL,
        }
    }
}

/// One compilation pass. Owns all durable state: the type engine (both
/// arenas plus the generic registry) and the scope stack. Create one per
/// program; state is never reset mid-run.
#[derive(Debug, Default)]
pub struct Compiler {
    engine: TypeEngine,
    scopes: Scopes,
}

impl Compiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn engine(&self) -> &TypeEngine {
        &self.engine
    }

    pub fn scopes(&self) -> &Scopes {
        &self.scopes
    }

    /// Evaluate one node, producing its Lua text and inferred type.
    ///
    /// Children evaluate left to right, depth first, in source order.
    pub fn evaluate(&mut self, node: &Node) -> Result<Value> {
        match node {
            Node::Program { statements } => self.eval_program(statements),
            Node::Binary { op, left, right } => self.eval_binary(*op, left, right),
            Node::Factor { text, ty } => Ok(Value {
                text: text.clone(),
                ty: Type::Primitive(*ty),
            }),
            Node::Group(inner) => self.evaluate(inner),
            Node::Let {
                name,
                annotation,
                value,
            } => self.eval_let(name, annotation.as_ref(), value.as_deref()),
            Node::Variable { name } => {
                let var = self.scopes.get(name)?;
                Ok(Value {
                    text: name.clone(),
                    ty: var.ty.clone(),
                })
            }
            Node::TypeOf { annotation } => {
                let depth = self.scopes.depth();
                let ty = self.engine.resolve_annotation(annotation, false, depth)?;
                Ok(Value {
                    text: "nil".to_owned(),
                    ty,
                })
            }
            Node::As { value, annotation } => {
                let value = self.evaluate(value)?;
                let depth = self.scopes.depth();
                let ty = self.engine.resolve_annotation(annotation, false, depth)?;
                Ok(Value {
                    text: value.text,
                    ty,
                })
            }
            Node::Function { params, ret, body } => self.eval_function(params, ret.as_ref(), body),
            Node::Call { callee, args } => self.eval_call(callee, args),
            Node::Traverse { target, field } => self.eval_traverse(target, field),
            Node::Index { target, index } => self.eval_index(target, index),
            Node::TableLit { fields } => self.eval_table(fields),
            Node::ArrayLit { items } => self.eval_array(items),
            Node::Assign { left, right } => {
                let left = self.evaluate(left)?;
                let right = self.evaluate(right)?;
                self.engine.two_way_coerce(&left.ty, &right.ty, None)?;
                Ok(Value::line(format!("{} = {}", left.text, right.text)))
            }
        }
    }

    fn eval_program(&mut self, statements: &[Node]) -> Result<Value> {
        let mut out = String::new();
        for statement in statements {
            out.push_str(&self.evaluate(statement)?.text);
            out.push('\n');
        }
        Ok(Value::line(out))
    }

    /// Evaluate an operand and require it to coerce to a primitive.
    fn expect_primitive(&mut self, node: &Node, ty: Primitive) -> Result<Value> {
        let value = self.evaluate(node)?;
        self.engine
            .coerce(&value.ty, &Type::Primitive(ty), None)?;
        Ok(value)
    }

    fn eval_binary(&mut self, op: BinOp, left: &Node, right: &Node) -> Result<Value> {
        if op == BinOp::Concat {
            // Stringify-and-concatenate accepts operands of any type.
            let left = self.expect_primitive(left, Primitive::Any)?;
            let right = self.expect_primitive(right, Primitive::Any)?;
            return Ok(Value {
                text: format!("(tostring({})..tostring({}))", left.text, right.text),
                ty: Type::STRING,
            });
        }

        let left = self.expect_primitive(left, Primitive::Number)?;
        let right = self.expect_primitive(right, Primitive::Number)?;
        Ok(Value {
            text: format!("({}{}{})", left.text, op.symbol(), right.text),
            ty: Type::NUMBER,
        })
    }

    fn eval_let(
        &mut self,
        name: &str,
        annotation: Option<&TypeExpr>,
        value: Option<&Node>,
    ) -> Result<Value> {
        let depth = self.scopes.depth();
        let explicit = match annotation {
            Some(expr) => Some(self.engine.resolve_annotation(expr, false, depth)?),
            None => None,
        };

        let value = match value {
            Some(node) => {
                let value = self.evaluate(node)?;
                // Annotation wins: the initializer must fit it.
                if let Some(explicit) = &explicit {
                    self.engine.coerce(&value.ty, explicit, None)?;
                }
                Some(value)
            }
            None => None,
        };

        let ty = match (&explicit, &value) {
            (Some(explicit), _) => explicit.clone(),
            (None, Some(value)) => self.engine.resolve(&value.ty),
            (None, None) => self.engine.fresh_var(),
        };
        self.scopes.declare(name, ty);

        Ok(Value::line(match value {
            Some(value) => format!("local {} = {}", name, value.text),
            None => format!("local {name}"),
        }))
    }

    fn eval_function(
        &mut self,
        params: &[Param],
        ret: Option<&TypeExpr>,
        body: &Node,
    ) -> Result<Value> {
        self.scopes.push();
        let depth = self.scopes.depth();

        let mut param_tys = Vec::with_capacity(params.len());
        for param in params {
            // A signature may introduce new generics.
            let ty = match &param.annotation {
                Some(expr) => self.engine.resolve_annotation(expr, true, depth)?,
                None => self.engine.fresh_var(),
            };
            self.scopes.declare(&param.name, ty.clone());
            param_tys.push(ty);
        }

        let declared_ret = match ret {
            Some(expr) => Some(self.engine.resolve_annotation(expr, true, depth)?),
            None => None,
        };

        let body = self.evaluate(body)?;

        let restored = self.scopes.pop();
        self.engine.purge_generics(restored);

        let ret_ty = match declared_ret {
            Some(declared) => {
                self.engine.coerce(&body.ty, &declared, None)?;
                declared
            }
            None => body.ty,
        };

        let names: Vec<&str> = params.iter().map(|p| p.name.as_str()).collect();
        Ok(Value {
            text: format!("(function({}) return {} end)", names.join(","), body.text),
            ty: Type::Function {
                params: param_tys,
                ret: Box::new(ret_ty),
            },
        })
    }

    fn eval_call(&mut self, callee: &Node, args: &[Node]) -> Result<Value> {
        let callee = self.evaluate(callee)?;

        let Type::Function { params, ret } = self.engine.resolve(&callee.ty) else {
            return Err(Error::NotCallable {
                found: self.engine.render(&callee.ty),
            });
        };

        if args.len() != params.len() {
            return Err(Error::Arity {
                expected: params.len(),
                found: args.len(),
            });
        }

        // Bindings for this call only; they die when the call resolves.
        let mut bindings = GenericBindings::new();

        let mut texts = Vec::with_capacity(args.len());
        for (arg, param_ty) in args.iter().zip(&params) {
            let arg = self.evaluate(arg)?;
            self.engine
                .two_way_coerce(param_ty, &arg.ty, Some(&mut bindings))?;
            texts.push(arg.text);
        }

        let ret_ty = self.engine.apply_generics(&ret, &bindings);

        Ok(Value {
            text: format!("({})({})", callee.text, texts.join(", ")),
            ty: ret_ty,
        })
    }

    fn eval_traverse(&mut self, target: &Node, field: &str) -> Result<Value> {
        let target = self.evaluate(target)?;

        let Type::Table(id) = self.engine.resolve(&target.ty) else {
            return Err(Error::NotATable {
                found: self.engine.render(&target.ty),
            });
        };

        let ty = self
            .engine
            .table(id)
            .fields
            .get(field)
            .cloned()
            .ok_or_else(|| Error::UnknownField(field.to_owned()))?;

        Ok(Value {
            text: format!("{}.{}", target.text, field),
            ty,
        })
    }

    fn eval_index(&mut self, target: &Node, index: &Node) -> Result<Value> {
        let target = self.evaluate(target)?;

        let Type::Array(inner) = self.engine.resolve(&target.ty) else {
            return Err(Error::NotAnArray {
                found: self.engine.render(&target.ty),
            });
        };

        let index = self.evaluate(index)?;

        Ok(Value {
            text: format!("{}[{}]", target.text, index.text),
            ty: *inner,
        })
    }

    fn eval_table(&mut self, fields: &[TableField]) -> Result<Value> {
        let id = self.engine.alloc_table();

        let mut parts = Vec::with_capacity(fields.len());
        for field in fields {
            let value = self.evaluate(&field.value)?;
            // A definite type is stored as-is; anything unresolved gets its
            // own slot, deferring inference of that field.
            let ty = if self.engine.is_definite(&value.ty) {
                value.ty.clone()
            } else {
                self.engine.fresh_var()
            };
            self.engine
                .table_mut(id)
                .fields
                .insert(field.name.clone(), ty);
            parts.push(format!("{} = {}", field.name, value.text));
        }

        Ok(Value {
            text: format!("{{ {} }}", parts.join(", ")),
            ty: Type::Table(id),
        })
    }

    fn eval_array(&mut self, items: &[Node]) -> Result<Value> {
        let mut inner: Option<Type> = None;
        let mut parts = Vec::with_capacity(items.len());

        for item in items {
            let value = self.evaluate(item)?;
            match &inner {
                // First definite element seeds the inner type; later
                // elements must coerce against it. No widening.
                None => {
                    if self.engine.is_definite(&value.ty) {
                        inner = Some(value.ty.clone());
                    }
                }
                Some(seeded) => {
                    self.engine.coerce(&value.ty, seeded, None)?;
                }
            }
            parts.push(value.text);
        }

        let inner = match inner {
            Some(ty) => ty,
            None => self.engine.fresh_var(),
        };

        Ok(Value {
            text: format!("{{ {} }}", parts.join(", ")),
            ty: Type::Array(Box::new(inner)),
        })
    }
}
