//! Unification and coercion over the arenas.
//!
//! # Overview
//!
//! The engine owns the type-variable arena, the table arena, and the
//! registry of declared generics. All compatibility questions funnel through
//! `typecheck`; all mutation of unresolved slots funnels through `coerce`.
//!
//! # Design Decisions
//!
//! ## Write-once slots
//!
//! A type-variable slot starts `Unknown`. Coercing toward a reference chases
//! its chain to the terminal unresolved slot and rebinds it there; once a
//! slot holds a definite type, a later coercion against it degrades to an
//! equality assertion. Chasing to the terminal slot is what makes two
//! mutually aliased variables resolve together: writing through either one
//! lands in the same place.
//!
//! ## Reference cycles
//!
//! `resolve` carries an explicit set of visited ids and answers `Unknown`
//! when a chain revisits itself. Mutual aliasing legitimately produces such
//! cycles, so they are not an error; a genuinely self-referential type shows
//! up as `unknown` in the report instead of aborting the pass.
//!
//! ## Per-call generic bindings
//!
//! Generic parameters bind to concrete types only during one call's argument
//! unification. The bindings live in a `GenericBindings` value owned by the
//! call evaluation and passed down explicitly; when it drops, the next call
//! starts unbound. The engine itself carries no replacement-mode flag.

use indexmap::IndexMap;

use super::arena::{TableArena, TypeVarArena};
use super::printer::TypePrinter;
use super::ty::{Primitive, Table, TableId, Type, TypeVarId};
use crate::ast::TypeExpr;
use crate::error::{Error, Result};

/// A generic declared by some function signature, alive while the scope
/// that introduced it is open.
#[derive(Debug, Clone)]
pub struct GenericDecl {
    pub name: String,
    pub depth: u32,
}

/// Name -> type bindings discovered from one call's arguments.
///
/// Created per call site and dropped when the call resolves, so bindings
/// cannot leak between calls.
#[derive(Debug, Clone, Default)]
pub struct GenericBindings {
    map: IndexMap<String, Type>,
}

impl GenericBindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Type> {
        self.map.get(name)
    }

    pub fn bind(&mut self, name: &str, ty: Type) {
        self.map.insert(name.to_owned(), ty);
    }
}

/// The unification/coercion engine and the durable state it reads and
/// writes: both arenas plus the generic registry.
#[derive(Debug, Default)]
pub struct TypeEngine {
    vars: TypeVarArena,
    tables: TableArena,
    generics: Vec<GenericDecl>,
}

impl TypeEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a fresh type variable and return a reference to it.
    pub fn fresh_var(&mut self) -> Type {
        Type::Reference(self.vars.alloc())
    }

    /// Allocate a fresh empty table.
    pub fn alloc_table(&mut self) -> TableId {
        self.tables.alloc()
    }

    pub fn table(&self, id: TableId) -> &Table {
        self.tables.get(id)
    }

    pub fn table_mut(&mut self, id: TableId) -> &mut Table {
        self.tables.get_mut(id)
    }

    pub fn vars(&self) -> &TypeVarArena {
        &self.vars
    }

    pub fn tables(&self) -> &TableArena {
        &self.tables
    }

    /// Render a type in its resolved form, for reports and error messages.
    pub fn render(&self, ty: &Type) -> String {
        TypePrinter::new(self, ty).to_string()
    }

    /// Follow `Reference` chains to the underlying type.
    ///
    /// Resolution is shallow: it unwraps top-level references but does not
    /// rewrite references nested inside arrays, functions, or table fields.
    /// A chain that revisits an id resolves to `Unknown`.
    pub fn resolve(&self, ty: &Type) -> Type {
        let mut visited = Vec::new();
        self.resolve_guarded(ty, &mut visited)
    }

    fn resolve_guarded(&self, ty: &Type, visited: &mut Vec<TypeVarId>) -> Type {
        match ty {
            Type::Reference(id) => {
                if visited.contains(id) {
                    return Type::UNKNOWN;
                }
                visited.push(*id);
                self.resolve_guarded(self.vars.get(*id), visited)
            }
            other => other.clone(),
        }
    }

    /// True iff no reachable `Reference` remains anywhere in the structure.
    ///
    /// `Generic` counts as complete: it is resolved per call, not globally.
    pub fn is_complete(&self, ty: &Type) -> bool {
        match self.resolve(ty) {
            Type::Primitive(p) => p != Primitive::Unknown,
            Type::Reference(_) => false,
            Type::Array(inner) => self.is_complete(&inner),
            Type::Function { params, ret } => {
                self.is_complete(&ret) && params.iter().all(|p| self.is_complete(p))
            }
            Type::Table(id) => self
                .tables
                .get(id)
                .fields
                .values()
                .all(|f| self.is_complete(f)),
            Type::Generic { .. } => true,
        }
    }

    /// True iff the type is neither `Unknown` nor a reference, without
    /// resolving. Used where a still-definite-looking type should be stored
    /// as-is and anything else deferred to a fresh variable.
    pub fn is_definite(&self, ty: &Type) -> bool {
        !matches!(ty, Type::Reference(_)) && *ty != Type::UNKNOWN
    }

    /// Structural compatibility.
    ///
    /// Either side resolving to `Unknown` or `Any` is compatible with
    /// anything. With `bindings` present (generic-replacement mode, active
    /// only during call-argument unification) a `Generic` on either side is
    /// unconditionally compatible.
    pub fn typecheck(&self, l: &Type, r: &Type, bindings: Option<&GenericBindings>) -> bool {
        let left = self.resolve(l);
        let right = self.resolve(r);

        if bindings.is_some()
            && (matches!(left, Type::Generic { .. }) || matches!(right, Type::Generic { .. }))
        {
            return true;
        }

        if left == Type::UNKNOWN
            || right == Type::UNKNOWN
            || left == Type::ANY
            || right == Type::ANY
        {
            return true;
        }

        self.strictly_equal(&left, &right, bindings)
    }

    /// Structural equality on already-resolved types. No subtyping: table
    /// width and depth must match exactly.
    fn strictly_equal(&self, l: &Type, r: &Type, bindings: Option<&GenericBindings>) -> bool {
        match (l, r) {
            (Type::Table(lid), Type::Table(rid)) => {
                let lfields = &self.tables.get(*lid).fields;
                let rfields = &self.tables.get(*rid).fields;

                if lfields.len() != rfields.len() {
                    return false;
                }

                lfields.iter().all(|(name, lty)| {
                    rfields
                        .get(name)
                        .is_some_and(|rty| self.typecheck(lty, rty, bindings))
                })
            }
            (
                Type::Function {
                    params: lparams,
                    ret: lret,
                },
                Type::Function {
                    params: rparams,
                    ret: rret,
                },
            ) => {
                if lparams.len() != rparams.len() {
                    return false;
                }

                if !self.typecheck(lret, rret, bindings) {
                    return false;
                }

                lparams
                    .iter()
                    .zip(rparams)
                    .all(|(lp, rp)| self.typecheck(lp, rp, bindings))
            }
            (Type::Array(linner), Type::Array(rinner)) => {
                self.typecheck(linner, rinner, bindings)
            }
            (Type::Generic { name: lname, .. }, Type::Generic { name: rname, .. }) => {
                lname == rname
            }
            (Type::Primitive(lp), Type::Primitive(rp)) => lp == rp,
            _ => false,
        }
    }

    /// Fail with a type mismatch unless `l` typechecks against `r`.
    ///
    /// In generic-replacement mode, `r` resolving to an unbound generic
    /// records `l` as its binding instead; a generic binds once per call, so
    /// a second, incompatible `l` is a binding error.
    pub fn assert_types(
        &self,
        l: &Type,
        r: &Type,
        bindings: Option<&mut GenericBindings>,
    ) -> Result<()> {
        if !self.typecheck(l, r, bindings.as_deref()) {
            return Err(Error::TypeMismatch {
                expected: self.render(r),
                found: self.render(l),
            });
        }

        if let Some(bindings) = bindings {
            if let Type::Generic { name, .. } = self.resolve(r) {
                match bindings.get(&name).cloned() {
                    None => bindings.bind(&name, l.clone()),
                    Some(bound) => {
                        if !self.typecheck(l, &bound, Some(&*bindings)) {
                            return Err(Error::GenericBinding {
                                name,
                                bound: self.render(&bound),
                                found: self.render(l),
                            });
                        }
                    }
                }
            }
        }

        Ok(())
    }

    /// One-directional coercion of `r` toward `t`.
    ///
    /// Primitives assert compatibility. An unresolved reference rebinds its
    /// terminal arena slot to `t`; a reference already bound re-coerces its
    /// content (write-once-then-check). Structured types assert top-level
    /// compatibility, then coerce memberwise. Generics are a no-op here:
    /// they resolve only through the call-binding path.
    pub fn coerce(
        &mut self,
        r: &Type,
        t: &Type,
        mut bindings: Option<&mut GenericBindings>,
    ) -> Result<()> {
        match r {
            Type::Primitive(_) => self.assert_types(r, t, bindings),
            Type::Reference(id) => self.rebind(*id, t, bindings),
            Type::Generic { .. } => Ok(()),
            Type::Array(_) | Type::Function { .. } | Type::Table(_) => {
                self.assert_types(r, t, bindings.as_deref_mut())?;

                match (r, self.resolve(t)) {
                    (Type::Array(rinner), Type::Array(tinner)) => {
                        self.coerce(rinner, &tinner, bindings)
                    }
                    (
                        Type::Function {
                            params: rparams,
                            ret: rret,
                        },
                        Type::Function {
                            params: tparams,
                            ret: tret,
                        },
                    ) => {
                        self.coerce(rret, &tret, bindings.as_deref_mut())?;
                        for (rp, tp) in rparams.iter().zip(&tparams) {
                            self.coerce(rp, tp, bindings.as_deref_mut())?;
                        }
                        Ok(())
                    }
                    (Type::Table(rid), Type::Table(tid)) => {
                        // Field sets are identical here: the top-level
                        // assertion only lets two tables through when their
                        // shapes already match.
                        let pairs: Vec<(Type, Option<Type>)> = self
                            .tables
                            .get(*rid)
                            .fields
                            .iter()
                            .map(|(name, rty)| {
                                (rty.clone(), self.tables.get(tid).fields.get(name).cloned())
                            })
                            .collect();
                        for (rty, tty) in pairs {
                            if let Some(tty) = tty {
                                self.coerce(&rty, &tty, bindings.as_deref_mut())?;
                            }
                        }
                        Ok(())
                    }
                    // The assertion passed through a wildcard (Unknown/Any)
                    // or a generic; nothing structural to recurse into.
                    _ => Ok(()),
                }
            }
        }
    }

    /// Chase a reference chain and write `t` at its terminal unresolved
    /// slot. A definite type met along the way turns the write into a
    /// re-coercion of that content; a revisited id (mutual aliasing) writes
    /// at the last slot before the cycle closes.
    fn rebind(
        &mut self,
        id: TypeVarId,
        t: &Type,
        bindings: Option<&mut GenericBindings>,
    ) -> Result<()> {
        let mut visited = vec![id];
        let mut current = id;

        loop {
            match self.vars.get(current).clone() {
                Type::Primitive(Primitive::Unknown) => {
                    self.vars.set(current, t.clone());
                    return Ok(());
                }
                Type::Reference(next) => {
                    if visited.contains(&next) {
                        self.vars.set(current, t.clone());
                        return Ok(());
                    }
                    visited.push(next);
                    current = next;
                }
                bound => return self.coerce(&bound, t, bindings),
            }
        }
    }

    /// Two-way unification.
    ///
    /// Both complete: `r` must satisfy `l`. One complete: the incomplete
    /// side is coerced toward the complete one. Neither: each is coerced
    /// toward the other, mutually aliasing the two so that resolving one
    /// later resolves both.
    pub fn two_way_coerce(
        &mut self,
        l: &Type,
        r: &Type,
        mut bindings: Option<&mut GenericBindings>,
    ) -> Result<()> {
        let l_complete = self.is_complete(l);
        let r_complete = self.is_complete(r);

        if l_complete && r_complete {
            self.assert_types(r, l, bindings)
        } else if l_complete {
            self.coerce(r, l, bindings)
        } else if r_complete {
            self.coerce(l, r, bindings)
        } else {
            self.coerce(l, r, bindings.as_deref_mut())?;
            self.coerce(r, l, bindings)
        }
    }

    /// Deep-copy a type, substituting every bound generic with its recorded
    /// binding. Unbound generics stay as they are. References are re-seated
    /// as fresh variables holding the applied content, snapshotting the
    /// bindings before they die with the call.
    pub fn apply_generics(&mut self, ty: &Type, bindings: &GenericBindings) -> Type {
        match ty {
            Type::Primitive(_) | Type::Table(_) => ty.clone(),
            Type::Generic { name, .. } => bindings.get(name).cloned().unwrap_or_else(|| ty.clone()),
            Type::Array(inner) => Type::Array(Box::new(self.apply_generics(inner, bindings))),
            Type::Function { params, ret } => Type::Function {
                params: params
                    .iter()
                    .map(|p| self.apply_generics(p, bindings))
                    .collect(),
                ret: Box::new(self.apply_generics(ret, bindings)),
            },
            Type::Reference(_) => {
                let content = self.resolve(ty);
                let applied = self.apply_generics(&content, bindings);
                let var = self.vars.alloc();
                self.vars.set(var, applied);
                Type::Reference(var)
            }
        }
    }

    /// Map a surface type annotation to an engine type.
    ///
    /// Generic names look up the registry; with `allow_new` (function
    /// signatures only) an absent name declares a new generic at the given
    /// depth, otherwise it is a name error. The flag propagates through
    /// nested array and function annotations.
    pub fn resolve_annotation(
        &mut self,
        expr: &TypeExpr,
        allow_new: bool,
        depth: u32,
    ) -> Result<Type> {
        match expr {
            TypeExpr::Primitive(p) => Ok(Type::Primitive(*p)),
            TypeExpr::Array(inner) => Ok(Type::Array(Box::new(self.resolve_annotation(
                inner, allow_new, depth,
            )?))),
            TypeExpr::Function { params, ret } => {
                let params = params
                    .iter()
                    .map(|p| self.resolve_annotation(p, allow_new, depth))
                    .collect::<Result<Vec<_>>>()?;
                let ret = self.resolve_annotation(ret, allow_new, depth)?;
                Ok(Type::Function {
                    params,
                    ret: Box::new(ret),
                })
            }
            TypeExpr::Generic(name) => {
                if let Some(decl) = self.generics.iter().find(|g| g.name == *name) {
                    return Ok(Type::Generic {
                        name: decl.name.clone(),
                        depth: decl.depth,
                    });
                }

                if allow_new {
                    self.generics.push(GenericDecl {
                        name: name.clone(),
                        depth,
                    });
                    Ok(Type::Generic {
                        name: name.clone(),
                        depth,
                    })
                } else {
                    Err(Error::UndefinedGeneric(name.clone()))
                }
            }
        }
    }

    /// Drop every generic introduced deeper than `depth`. Paired with scope
    /// pops by the evaluator.
    pub fn purge_generics(&mut self, depth: u32) {
        self.generics.retain(|g| g.depth <= depth);
    }

    /// Declared generics currently alive, outermost first.
    pub fn generics(&self) -> &[GenericDecl] {
        &self.generics
    }
}
