use crate::error::Error;
use crate::scope::Scopes;
use crate::types::Type;

#[test]
fn lookup_finds_declared_variable() {
    let mut scopes = Scopes::new();
    scopes.declare("a", Type::NUMBER);
    let var = scopes.get("a").unwrap();
    assert_eq!(var.ty, Type::NUMBER);
    assert_eq!(var.depth, 0);
}

#[test]
fn lookup_fails_for_unknown_name() {
    let scopes = Scopes::new();
    assert_eq!(
        scopes.get("missing").map(|_| ()),
        Err(Error::UndefinedVariable("missing".to_owned()))
    );
}

#[test]
fn deeper_declaration_shadows() {
    let mut scopes = Scopes::new();
    scopes.declare("a", Type::NUMBER);
    scopes.push();
    scopes.declare("a", Type::STRING);

    assert_eq!(scopes.get("a").unwrap().ty, Type::STRING);
    assert_eq!(scopes.get("a").unwrap().depth, 1);

    scopes.pop();
    assert_eq!(scopes.get("a").unwrap().ty, Type::NUMBER);
}

#[test]
fn pop_discards_inner_declarations() {
    let mut scopes = Scopes::new();
    scopes.push();
    scopes.declare("x", Type::BOOL);
    assert!(scopes.get("x").is_ok());

    let restored = scopes.pop();
    assert_eq!(restored, 0);
    assert!(scopes.get("x").is_err());
}

#[test]
fn outer_variables_survive_inner_scopes() {
    let mut scopes = Scopes::new();
    scopes.declare("a", Type::NUMBER);
    scopes.push();
    scopes.declare("b", Type::STRING);
    assert!(scopes.get("a").is_ok());
    scopes.pop();
    assert!(scopes.get("a").is_ok());
    assert!(scopes.get("b").is_err());
}

#[test]
fn iter_preserves_declaration_order() {
    let mut scopes = Scopes::new();
    scopes.declare("first", Type::NUMBER);
    scopes.declare("second", Type::STRING);

    let names: Vec<&str> = scopes.iter().map(|v| v.name.as_str()).collect();
    assert_eq!(names, ["first", "second"]);
}
