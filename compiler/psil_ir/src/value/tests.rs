use super::*;
use crate::errors::{StructuralError, StructuralErrorKind};
use pretty_assertions::assert_eq;
use psil_lexer::Span;
use std::cell::Cell;

fn noop(_: &mut dyn Machine) -> EvalResult<()> {
    Ok(())
}

#[test]
fn display_textual_forms() {
    assert_eq!(Value::Int(-4).to_string(), "-4");
    assert_eq!(Value::Float(6.0).to_string(), "6.0");
    assert_eq!(Value::Float(2.5).to_string(), "2.5");
    assert_eq!(Value::text("hi there").to_string(), "hi there");
    assert_eq!(
        Value::Reference(Reference::new(["a", "b"])).to_string(),
        "a:b"
    );
    assert_eq!(Value::code(" 1 (out) ").to_string(), "{ 1 (out) }");
    assert_eq!(
        Value::native(NativeCode::new("dup", noop)).to_string(),
        "<native dup>"
    );
    assert_eq!(Value::Namespace(Namespace::new()).to_string(), "<namespace 0>");
}

#[test]
fn equality_is_structural_for_data() {
    assert_eq!(Value::Int(3), Value::Int(3));
    assert_ne!(Value::Int(3), Value::Float(3.0));
    assert_eq!(Value::text("a"), Value::text("a"));
    assert_eq!(Value::code("x"), Value::code("x"));
    assert_ne!(Value::code("x"), Value::code("y"));
}

#[test]
fn namespaces_compare_by_identity() {
    let ns = Namespace::new();
    assert_eq!(Value::Namespace(ns.clone()), Value::Namespace(ns));
    assert_ne!(
        Value::Namespace(Namespace::new()),
        Value::Namespace(Namespace::new())
    );
}

#[test]
fn type_names() {
    assert_eq!(Value::Int(1).type_name(), "integer");
    assert_eq!(Value::code("").type_name(), "code");
    assert_eq!(
        Value::native(NativeCode::new("n", noop)).type_name(),
        "native code"
    );
}

#[test]
fn named_only_tags_code() {
    let name = Reference::new(["lib", "f"]);
    let Value::Code(code) = Value::code("1").named(&name) else {
        panic!("expected code");
    };
    assert_eq!(code.name(), Some(&name));
    assert_eq!(Value::Int(1).named(&name), Value::Int(1));
}

#[test]
fn instructions_are_compiled_once() {
    let block = SourceBlock::new("x");
    let calls = Cell::new(0);
    let compile = |_: &str| -> Result<Vec<Instruction>, SyntaxError> {
        calls.set(calls.get() + 1);
        Ok(vec![Instruction::NewExpression(Span::DUMMY)])
    };

    assert!(!block.is_compiled());
    let first = block.instructions_with(compile);
    let second = block.instructions_with(compile);
    assert_eq!(calls.get(), 1);
    assert!(block.is_compiled());
    assert_eq!(first.map(|i| i.len()), Ok(1));
    assert_eq!(second.map(|i| i.len()), Ok(1));
}

#[test]
fn failed_compile_is_not_cached() {
    let block = SourceBlock::new("(");
    let failing = |_: &str| {
        Err(SyntaxError::from(StructuralError::new(
            StructuralErrorKind::UnclosedExpression { open: 1 },
            Span::DUMMY,
        )))
    };
    assert!(block.instructions_with(failing).is_err());
    assert!(!block.is_compiled());
}

#[test]
fn with_name_shares_compiled_cache() {
    let code = CodeBlock::interpreted("1");
    let named = code.clone().with_name(Reference::new(["f"]));

    let (CodeBody::Interpreted(original), CodeBody::Interpreted(renamed)) =
        (code.body(), named.body())
    else {
        panic!("expected interpreted bodies");
    };
    let _ = renamed.instructions_with(|_| Ok(Vec::new()));
    assert!(original.is_compiled());
}
