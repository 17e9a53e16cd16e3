use super::{GenericBindings, Type, TypeEngine};
use crate::ast::TypeExpr;
use crate::error::Error;
use crate::types::Primitive;

fn generic(name: &str) -> Type {
    Type::Generic {
        name: name.to_owned(),
        depth: 1,
    }
}

#[test]
fn resolve_follows_chains() {
    let mut engine = TypeEngine::new();
    let a = engine.fresh_var();
    assert_eq!(engine.resolve(&a), Type::UNKNOWN);

    engine.coerce(&a, &Type::NUMBER, None).unwrap();
    assert_eq!(engine.resolve(&a), Type::NUMBER);

    // A second variable aliased to the first resolves through it.
    let b = engine.fresh_var();
    engine.coerce(&b, &a, None).unwrap();
    assert_eq!(engine.resolve(&b), Type::NUMBER);
}

#[test]
fn resolve_is_idempotent() {
    let mut engine = TypeEngine::new();
    let a = engine.fresh_var();
    engine.coerce(&a, &Type::NUMBER, None).unwrap();

    let once = engine.resolve(&a);
    assert_eq!(engine.resolve(&once), once);

    let unknown = engine.resolve(&Type::UNKNOWN);
    assert_eq!(engine.resolve(&unknown), unknown);
}

#[test]
fn resolve_cycle_yields_unknown() {
    let mut engine = TypeEngine::new();
    let a = engine.fresh_var();
    let b = engine.fresh_var();

    // Neither side is complete, so they become mutually aliased.
    engine.two_way_coerce(&a, &b, None).unwrap();
    assert_eq!(engine.resolve(&a), Type::UNKNOWN);
    assert_eq!(engine.resolve(&b), Type::UNKNOWN);
}

#[test]
fn aliased_vars_resolve_together() {
    let mut engine = TypeEngine::new();
    let a = engine.fresh_var();
    let b = engine.fresh_var();
    engine.two_way_coerce(&a, &b, None).unwrap();

    engine.coerce(&a, &Type::NUMBER, None).unwrap();
    assert_eq!(engine.resolve(&a), Type::NUMBER);
    assert_eq!(engine.resolve(&b), Type::NUMBER);
}

#[test]
fn slots_are_write_once_then_check() {
    let mut engine = TypeEngine::new();
    let v = engine.fresh_var();

    engine.coerce(&v, &Type::NUMBER, None).unwrap();
    // Coercing against an equal type succeeds silently.
    engine.coerce(&v, &Type::NUMBER, None).unwrap();
    // Coercing against an incompatible type is now an assertion failure.
    assert_eq!(
        engine.coerce(&v, &Type::STRING, None),
        Err(Error::TypeMismatch {
            expected: "string".to_owned(),
            found: "number".to_owned(),
        })
    );
}

#[test]
fn typecheck_wildcards() {
    let engine = TypeEngine::new();
    assert!(engine.typecheck(&Type::UNKNOWN, &Type::NUMBER, None));
    assert!(engine.typecheck(&Type::NUMBER, &Type::UNKNOWN, None));
    assert!(engine.typecheck(&Type::ANY, &Type::STRING, None));
    assert!(engine.typecheck(&Type::BOOL, &Type::ANY, None));
    assert!(!engine.typecheck(&Type::NUMBER, &Type::STRING, None));
}

#[test]
fn structural_table_equality() {
    let mut engine = TypeEngine::new();

    let t1 = engine.alloc_table();
    engine.table_mut(t1).fields.insert("x".to_owned(), Type::NUMBER);
    engine.table_mut(t1).fields.insert("y".to_owned(), Type::STRING);

    let t2 = engine.alloc_table();
    engine.table_mut(t2).fields.insert("x".to_owned(), Type::NUMBER);
    engine.table_mut(t2).fields.insert("y".to_owned(), Type::STRING);

    assert!(engine.typecheck(&Type::Table(t1), &Type::Table(t2), None));

    // Width must match exactly.
    let t3 = engine.alloc_table();
    engine.table_mut(t3).fields.insert("x".to_owned(), Type::NUMBER);
    assert!(!engine.typecheck(&Type::Table(t1), &Type::Table(t3), None));

    // Same width, different field names.
    let t4 = engine.alloc_table();
    engine.table_mut(t4).fields.insert("x".to_owned(), Type::NUMBER);
    engine.table_mut(t4).fields.insert("z".to_owned(), Type::STRING);
    assert!(!engine.typecheck(&Type::Table(t1), &Type::Table(t4), None));
}

#[test]
fn function_compatibility_is_structural() {
    let engine = TypeEngine::new();
    let f = Type::Function {
        params: vec![Type::NUMBER],
        ret: Box::new(Type::STRING),
    };
    let same = Type::Function {
        params: vec![Type::NUMBER],
        ret: Box::new(Type::STRING),
    };
    let more_params = Type::Function {
        params: vec![Type::NUMBER, Type::NUMBER],
        ret: Box::new(Type::STRING),
    };
    let other_param = Type::Function {
        params: vec![Type::BOOL],
        ret: Box::new(Type::STRING),
    };

    assert!(engine.typecheck(&f, &same, None));
    assert!(!engine.typecheck(&f, &more_params, None));
    assert!(!engine.typecheck(&f, &other_param, None));
}

#[test]
fn array_compatibility_recurses_on_inner() {
    let engine = TypeEngine::new();
    let numbers = Type::Array(Box::new(Type::NUMBER));
    let strings = Type::Array(Box::new(Type::STRING));
    assert!(engine.typecheck(&numbers, &numbers.clone(), None));
    assert!(!engine.typecheck(&numbers, &strings, None));
}

#[test]
fn completeness() {
    let mut engine = TypeEngine::new();

    assert!(engine.is_complete(&Type::NUMBER));
    assert!(engine.is_complete(&Type::ANY));
    assert!(!engine.is_complete(&Type::UNKNOWN));
    assert!(engine.is_complete(&generic("T")));

    let v = engine.fresh_var();
    assert!(!engine.is_complete(&v));
    assert!(!engine.is_complete(&Type::Array(Box::new(v.clone()))));

    let f = Type::Function {
        params: vec![Type::NUMBER],
        ret: Box::new(v.clone()),
    };
    assert!(!engine.is_complete(&f));

    engine.coerce(&v, &Type::NUMBER, None).unwrap();
    assert!(engine.is_complete(&f));

    let t = engine.alloc_table();
    let field = engine.fresh_var();
    engine.table_mut(t).fields.insert("x".to_owned(), field.clone());
    assert!(!engine.is_complete(&Type::Table(t)));
    engine.coerce(&field, &Type::BOOL, None).unwrap();
    assert!(engine.is_complete(&Type::Table(t)));
}

#[test]
fn generics_compare_by_name_outside_replacement_mode() {
    let engine = TypeEngine::new();
    assert!(engine.typecheck(&generic("T"), &generic("T"), None));
    assert!(!engine.typecheck(&generic("T"), &generic("U"), None));
    assert!(!engine.typecheck(&generic("T"), &Type::NUMBER, None));
}

#[test]
fn replacement_mode_binds_once_per_call() {
    let engine = TypeEngine::new();
    let t = generic("T");
    let mut bindings = GenericBindings::new();

    engine
        .assert_types(&Type::NUMBER, &t, Some(&mut bindings))
        .unwrap();
    assert_eq!(bindings.get("T"), Some(&Type::NUMBER));

    // Compatible re-use of the binding is fine.
    engine
        .assert_types(&Type::NUMBER, &t, Some(&mut bindings))
        .unwrap();

    // A conflicting type is a binding error, not a silent widen.
    assert_eq!(
        engine.assert_types(&Type::STRING, &t, Some(&mut bindings)),
        Err(Error::GenericBinding {
            name: "T".to_owned(),
            bound: "number".to_owned(),
            found: "string".to_owned(),
        })
    );
}

#[test]
fn coerce_is_a_noop_for_generics() {
    let mut engine = TypeEngine::new();
    engine.coerce(&generic("T"), &Type::NUMBER, None).unwrap();
    engine.coerce(&generic("T"), &Type::STRING, None).unwrap();
}

#[test]
fn apply_generics_substitutes_bindings() {
    let mut engine = TypeEngine::new();
    let mut bindings = GenericBindings::new();
    bindings.bind("T", Type::NUMBER);

    let applied = engine.apply_generics(&generic("T"), &bindings);
    assert_eq!(applied, Type::NUMBER);

    let f = Type::Function {
        params: vec![generic("T"), Type::BOOL],
        ret: Box::new(Type::Array(Box::new(generic("T")))),
    };
    let applied = engine.apply_generics(&f, &bindings);
    assert_eq!(
        applied,
        Type::Function {
            params: vec![Type::NUMBER, Type::BOOL],
            ret: Box::new(Type::Array(Box::new(Type::NUMBER))),
        }
    );

    // An unbound generic stays untouched.
    let fresh = GenericBindings::new();
    assert_eq!(engine.apply_generics(&generic("T"), &fresh), generic("T"));
}

#[test]
fn apply_generics_reseats_references() {
    let mut engine = TypeEngine::new();
    let v = engine.fresh_var();
    engine.coerce(&v, &generic("T"), None).unwrap();

    let mut bindings = GenericBindings::new();
    bindings.bind("T", Type::STRING);

    let applied = engine.apply_generics(&v, &bindings);
    assert_eq!(engine.resolve(&applied), Type::STRING);
    // The original slot keeps its unapplied content.
    assert_eq!(engine.resolve(&v), generic("T"));
}

#[test]
fn coerce_incomplete_structure_toward_complete() {
    let mut engine = TypeEngine::new();
    let inner = engine.fresh_var();
    let arr = Type::Array(Box::new(inner.clone()));

    engine
        .coerce(&arr, &Type::Array(Box::new(Type::NUMBER)), None)
        .unwrap();
    assert_eq!(engine.resolve(&inner), Type::NUMBER);
    assert!(engine.is_complete(&arr));
}

#[test]
fn two_way_coerce_complete_sides_must_agree() {
    let mut engine = TypeEngine::new();
    assert_eq!(
        engine.two_way_coerce(&Type::NUMBER, &Type::STRING, None),
        Err(Error::TypeMismatch {
            expected: "number".to_owned(),
            found: "string".to_owned(),
        })
    );
    engine.two_way_coerce(&Type::NUMBER, &Type::NUMBER, None).unwrap();
}

#[test]
fn annotations_resolve_against_the_registry() {
    let mut engine = TypeEngine::new();

    assert_eq!(
        engine.resolve_annotation(&TypeExpr::Generic("T".to_owned()), false, 0),
        Err(Error::UndefinedGeneric("T".to_owned()))
    );

    let declared = engine
        .resolve_annotation(&TypeExpr::Generic("T".to_owned()), true, 1)
        .unwrap();
    assert_eq!(declared, generic("T"));

    // A later lookup without allow_new finds the live declaration.
    let found = engine
        .resolve_annotation(&TypeExpr::Generic("T".to_owned()), false, 2)
        .unwrap();
    assert_eq!(found, generic("T"));

    engine.purge_generics(0);
    assert!(
        engine
            .resolve_annotation(&TypeExpr::Generic("T".to_owned()), false, 0)
            .is_err()
    );
}

#[test]
fn annotation_allow_new_propagates_into_nested_types() {
    let mut engine = TypeEngine::new();
    let expr = TypeExpr::Function {
        params: vec![TypeExpr::Generic("U".to_owned())],
        ret: Box::new(TypeExpr::Array(Box::new(TypeExpr::Generic(
            "U".to_owned(),
        )))),
    };

    let ty = engine.resolve_annotation(&expr, true, 1).unwrap();
    assert_eq!(
        ty,
        Type::Function {
            params: vec![Type::Generic {
                name: "U".to_owned(),
                depth: 1
            }],
            ret: Box::new(Type::Array(Box::new(Type::Generic {
                name: "U".to_owned(),
                depth: 1
            }))),
        }
    );
    // Declared once, not once per mention.
    assert_eq!(engine.generics().len(), 1);
}

#[test]
fn annotation_primitives_pass_through() {
    let mut engine = TypeEngine::new();
    assert_eq!(
        engine
            .resolve_annotation(&TypeExpr::Primitive(Primitive::Bool), false, 0)
            .unwrap(),
        Type::BOOL
    );
}

#[test]
fn render_resolves_before_printing() {
    let mut engine = TypeEngine::new();
    let v = engine.fresh_var();
    assert_eq!(engine.render(&v), "unknown");

    engine.coerce(&v, &Type::NUMBER, None).unwrap();
    assert_eq!(engine.render(&v), "number");

    let f = Type::Function {
        params: vec![generic("T"), Type::STRING],
        ret: Box::new(Type::Array(Box::new(v))),
    };
    assert_eq!(engine.render(&f), "($T, string) => [number]");

    let t = engine.alloc_table();
    assert_eq!(engine.render(&Type::Table(t)), "table#0");
}
