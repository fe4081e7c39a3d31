use super::*;
use pretty_assertions::assert_eq;

fn name(s: &str) -> Name {
    Name::from(s)
}

#[test]
fn declare_and_lookup() {
    let env = Environment::new();
    env.declare(name("x"), Value::int(42), Mutability::Constant)
        .ok();
    assert_eq!(env.lookup("x"), Some(Value::int(42)));
    assert_eq!(env.lookup("y"), None);
}

#[test]
fn redeclaration_in_same_scope_fails() {
    let env = Environment::new();
    assert_eq!(
        env.declare(name("a"), Value::Null, Mutability::Mutable),
        Ok(())
    );
    assert_eq!(
        env.declare(name("a"), Value::string("x"), Mutability::Mutable),
        Err(DeclareError::AlreadyDeclared)
    );
}

#[test]
fn child_scope_shadows_without_touching_parent() {
    let parent = Environment::new();
    parent
        .declare(name("x"), Value::int(1), Mutability::Mutable)
        .ok();

    let child = parent.child();
    assert_eq!(
        child.declare(name("x"), Value::int(2), Mutability::Mutable),
        Ok(())
    );
    assert_eq!(child.lookup("x"), Some(Value::int(2)));
    assert_eq!(parent.lookup("x"), Some(Value::int(1)));
}

#[test]
fn assign_walks_to_owning_scope() {
    let parent = Environment::new();
    parent
        .declare(name("x"), Value::int(1), Mutability::Mutable)
        .ok();
    let child = parent.child().child();

    assert_eq!(child.assign("x", Value::int(5)), Ok(()));
    assert_eq!(parent.lookup("x"), Some(Value::int(5)));
}

#[test]
fn assign_to_constant_fails() {
    let env = Environment::new();
    env.declare(name("c"), Value::int(1), Mutability::Constant)
        .ok();
    assert_eq!(
        env.child().assign("c", Value::int(2)),
        Err(AssignError::Constant)
    );
    assert!(env.is_constant("c"));
    assert_eq!(env.lookup("c"), Some(Value::int(1)));
}

#[test]
fn assign_to_undefined_fails() {
    let env = Environment::new().child();
    assert_eq!(env.assign("nope", Value::Null), Err(AssignError::Undefined));
}

#[test]
fn inner_mutable_shadow_of_outer_constant_is_assignable() {
    let outer = Environment::new();
    outer
        .declare(name("v"), Value::int(1), Mutability::Constant)
        .ok();
    let inner = outer.child();
    inner
        .declare(name("v"), Value::int(2), Mutability::Mutable)
        .ok();
    assert_eq!(inner.assign("v", Value::int(3)), Ok(()));
    assert_eq!(outer.lookup("v"), Some(Value::int(1)));
}

#[test]
fn bind_parameter_overwrites_silently() {
    let env = Environment::new();
    env.bind_parameter(name("p"), Value::int(1));
    env.bind_parameter(name("p"), Value::int(2));
    assert_eq!(env.lookup_local("p"), Some(Value::int(2)));
    assert_eq!(env.assign("p", Value::int(3)), Ok(()));
}

#[test]
fn handles_alias_the_same_scope() {
    let env = Environment::new();
    let alias = env.clone();
    env.declare(name("a"), Value::int(25), Mutability::Mutable)
        .ok();
    alias.assign("a", Value::int(1)).ok();
    assert_eq!(env.lookup("a"), Some(Value::int(1)));
    assert!(env.ptr_eq(&alias));
    assert!(!env.ptr_eq(&env.child()));
}

#[test]
fn depth_and_local_names() {
    let root = Environment::new();
    root.declare(name("b"), Value::Null, Mutability::Mutable).ok();
    root.declare(name("a"), Value::Null, Mutability::Mutable).ok();
    assert_eq!(root.child().child().depth(), 3);
    assert_eq!(
        root.local_names()
            .iter()
            .map(Name::as_str)
            .collect::<Vec<_>>(),
        vec!["a", "b"]
    );
}
