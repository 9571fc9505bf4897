use super::*;
use crate::print_handler::buffer_handler;
use pretty_assertions::assert_eq;
use psil_ir::{EvalError, EvalErrorKind, StructuralErrorKind};

fn interpreter() -> (Interpreter, SharedPrintHandler) {
    let output = buffer_handler();
    let interp = InterpreterBuilder::new()
        .print_handler(output.clone())
        .build();
    (interp, output)
}

/// Run `source` in a fresh interpreter and return what it printed.
fn output_of(source: &str) -> Result<String, EvalErrorKind> {
    let (mut interp, output) = interpreter();
    interp.run(source).map_err(|err| err.kind)?;
    Ok(output.output())
}

fn error_of(source: &str) -> EvalError {
    let (mut interp, _) = interpreter();
    match interp.run(source) {
        Ok(()) => panic!("expected {source:?} to fail"),
        Err(err) => err,
    }
}

#[test]
fn top_level_literals_stay_on_stack() {
    let (mut interp, _) = interpreter();
    assert_eq!(interp.run("1 2.5 \"s\""), Ok(()));
    assert_eq!(
        interp.stack(),
        &[Value::Int(1), Value::Float(2.5), Value::text("s")]
    );
    assert!(interp.is_halted());
}

#[test]
fn def_binds_value_under_name() {
    let (mut interp, _) = interpreter();
    assert_eq!(interp.run("(5 \"x\" def)"), Ok(()));
    assert_eq!(
        interp.root().resolve(&Reference::new(["x"])),
        Ok(Value::Int(5))
    );
    assert!(interp.stack().is_empty());
}

#[test]
fn arithmetic_promotes_and_prints() {
    assert_eq!(output_of("((3 2.0 mul) out)"), Ok("6.0\n".to_string()));
    assert_eq!(output_of("((3 5 sub) out)"), Ok("-2\n".to_string()));
}

#[test]
fn nested_results_become_arguments() {
    assert_eq!(
        output_of("(((1 2 add) (3 4 add) mul) out)"),
        Ok("21\n".to_string())
    );
}

#[test]
fn dup_then_out_twice() {
    assert_eq!(
        output_of("(\"hi\" dup) (out) (out)"),
        Ok("hi\nhi\n".to_string())
    );
}

#[test]
fn popping_empty_frame_underflows() {
    assert_eq!(output_of("(drop)"), Err(EvalErrorKind::StackUnderflow));
}

#[test]
fn anonymous_block_receives_arguments() {
    assert_eq!(output_of("(3 4 { (mul) }) (out)"), Ok("12\n".to_string()));
}

#[test]
fn block_results_count_as_values_of_enclosing_expression() {
    assert_eq!(
        output_of("((({1 2}) add) out)"),
        Ok("3\n".to_string())
    );
}

#[test]
fn frame_cannot_pop_callers_values() {
    let (mut interp, _) = interpreter();
    let err = interp.run("5 ({ (drop) })").map_err(|e| e.kind);
    assert_eq!(err, Err(EvalErrorKind::StackUnderflow));
}

#[test]
fn named_block_sees_globals() {
    assert_eq!(
        output_of("(10 \"n\" def) ({ (n out) } \"show\" def) (show) (show)"),
        Ok("10\n10\n".to_string())
    );
}

#[test]
fn block_locals_do_not_leak() {
    let (mut interp, _) = interpreter();
    assert_eq!(interp.run("({ (1 \"local\" def) })"), Ok(()));
    assert!(!interp.root().contains("local"));
}

#[test]
fn qualified_call_links_to_definition_site() {
    let program = r#"
        ((namespace) "lib" def)
        (7 "lib:x" def)
        ({ (x out) } "lib:show" def)
        (lib:show)
    "#;
    assert_eq!(output_of(program), Ok("7\n".to_string()));
}

#[test]
fn qualified_call_returns_to_caller_namespace() {
    let program = r#"
        ((namespace) "lib" def)
        ({ 1 } "lib:f" def)
        ({ (2 "local" def) (lib:f) (drop) (local out) } "g" def)
        (g)
    "#;
    assert_eq!(output_of(program), Ok("2\n".to_string()));
}

fn bound_namespace(ns: &Namespace, name: &str) -> Namespace {
    match ns.lookup_local(name) {
        Some(Value::Namespace(found)) => found,
        other => panic!("expected namespace `{name}`, found {other:?}"),
    }
}

#[test]
fn qualified_call_restores_search_links() {
    let (mut interp, output) = interpreter();
    let program = r#"
        ((namespace) "lib" def)
        ({ (lib:g) } "lib:f" def)
        ({ (2 out) } "lib:g" def)
        (lib:f)
    "#;
    assert_eq!(interp.run(program), Ok(()));
    assert_eq!(output.output(), "2\n");
    assert!(bound_namespace(interp.root(), "lib").search_link().is_none());
}

#[test]
fn failed_qualified_call_restores_search_links() {
    let (mut interp, _) = interpreter();
    assert_eq!(
        interp.run("((namespace) \"lib\" def) ({ (nope) } \"lib:f\" def)"),
        Ok(())
    );
    assert!(interp.run("(lib:f)").is_err());
    assert!(bound_namespace(interp.root(), "lib").search_link().is_none());
}

#[test]
fn frame_is_released_after_qualified_call() {
    let (mut interp, _) = interpreter();
    // `:` leaves the frame of `g` on the stack.
    let program = r#"
        ({ ((namespace) "lib" def) ({ 1 } "lib:f" def) (lib:f) (drop) : } "g" def)
        (g)
    "#;
    assert_eq!(interp.run(program), Ok(()));
    let Some(Value::Namespace(frame)) = interp.stack().last().cloned() else {
        panic!("expected the frame of `g` on the stack");
    };
    assert!(frame.frame().is_some());
    let lib = bound_namespace(&frame, "lib");
    assert!(lib.search_link().is_none());

    let weak = frame.downgrade();
    drop(lib);
    drop(frame);
    drop(interp);
    assert!(weak.upgrade().is_none());
}

#[test]
fn namespace_bound_inside_itself_is_callable_through() {
    let (mut interp, output) = interpreter();
    let program = r#"
        ((namespace) "a" def)
        (a "a:a" def)
        ({ (5 out) } "a:a:f" def)
        (a:a:f)
    "#;
    assert_eq!(interp.run(program), Ok(()));
    assert_eq!(output.output(), "5\n");
    let a = bound_namespace(interp.root(), "a");
    assert!(a.search_link().is_none());
    // Break the self-binding so the test does not leak it.
    assert!(a.unbind("a").is_some());
}

#[test]
fn anchored_names_stay_in_current_namespace() {
    assert_eq!(
        output_of("(1 \"x\" def) ({ (3 \":x\" def) (:x out) }) (x out)"),
        Ok("3\n1\n".to_string())
    );
    assert_eq!(
        output_of("(1 \"x\" def) ({ (:x out) })"),
        Err(EvalErrorKind::NameNotFound {
            reference: ":x".to_string(),
            segment: "x".to_string(),
        })
    );
}

#[test]
fn anonymous_call_inside_frame_resolves_frame_locals() {
    let program = r#"
        ({ (5 "v" def) ({ (v out) }) } "f" def)
        (f)
    "#;
    assert_eq!(output_of(program), Ok("5\n".to_string()));
}

#[test]
fn code_is_compiled_once_and_cached() {
    fn compiled(interp: &Interpreter) -> bool {
        match interp.root().lookup_local("f") {
            Some(Value::Code(code)) => match code.body() {
                CodeBody::Interpreted(block) => block.is_compiled(),
                CodeBody::Native(_) => false,
            },
            _ => false,
        }
    }

    let (mut interp, _) = interpreter();
    assert_eq!(interp.run("({ 1 } \"f\" def)"), Ok(()));
    assert!(!compiled(&interp));
    assert_eq!(interp.run("(f) (f)"), Ok(()));
    assert!(compiled(&interp));
    assert_eq!(interp.stack(), &[Value::Int(1), Value::Int(1)]);
}

#[test]
fn exec_runs_code_with_remaining_arguments() {
    assert_eq!(
        output_of("((2 3 { (add) } exec) out)"),
        Ok("5\n".to_string())
    );
    assert_eq!(
        output_of("((5 (\"dup\" get) exec) add) (out)"),
        Ok("10\n".to_string())
    );
}

#[test]
fn quote_and_get_round_trip() {
    assert_eq!(
        output_of("(4 \"four\" def) (((\"four\" quote) get) out)"),
        Ok("4\n".to_string())
    );
}

#[test]
fn undef_removes_binding() {
    let (mut interp, output) = interpreter();
    assert_eq!(interp.run("(1 \"x\" def) ((\"x\" undef) out)"), Ok(()));
    assert_eq!(output.output(), "1\n");
    assert!(!interp.root().contains("x"));
}

#[test]
fn calling_a_number_is_not_callable() {
    assert_eq!(
        output_of("(1 2)"),
        Err(EvalErrorKind::NotCallable {
            type_name: "integer"
        })
    );
}

#[test]
fn unknown_name_carries_context() {
    let err = error_of("1 (2 nope)");
    assert_eq!(
        err.kind,
        EvalErrorKind::NameNotFound {
            reference: "nope".to_string(),
            segment: "nope".to_string(),
        }
    );
    let context = err.context().cloned().unwrap_or_default();
    assert_eq!(context.instruction, "Push nope");
    assert_eq!(context.reference, Some(Reference::new(["nope"])));
    assert_eq!(context.stack, vec!["1", "2"]);
    assert_eq!(err.span().map(|s| (s.line, s.column)), Some((1, 6)));
}

#[test]
fn structural_error_after_partial_execution() {
    let (mut interp, output) = interpreter();
    let err = interp.run("(1 out) )").map_err(|e| e.kind);
    assert!(matches!(
        err,
        Err(EvalErrorKind::Structural(e)) if e.kind == StructuralErrorKind::UnmatchedClose
    ));
    assert_eq!(output.output(), "1\n");
}

#[test]
fn syntax_error_inside_code_block_is_reported_on_call() {
    let (mut interp, _) = interpreter();
    assert_eq!(interp.run("({ ) } \"bad\" def)"), Ok(()));
    let err = interp.run("(bad)").map_err(|e| e.kind);
    assert!(matches!(err, Err(EvalErrorKind::Structural(_))));
}

#[test]
fn error_resets_but_keeps_bindings() {
    let (mut interp, output) = interpreter();
    assert_eq!(interp.run("(9 \"keep\" def) 1 2"), Ok(()));
    assert!(interp.run("({ (nope) })").is_err());
    assert!(interp.is_halted());
    assert!(interp.stack().is_empty());
    assert_eq!(interp.run("(keep out)"), Ok(()));
    assert_eq!(output.output(), "9\n");
}

#[test]
fn stack_persists_across_runs() {
    let (mut interp, output) = interpreter();
    assert_eq!(interp.run("1 2"), Ok(()));
    assert_eq!(interp.run("(add) (out)"), Ok(()));
    assert_eq!(output.output(), "3\n");
}

#[test]
fn unbounded_recursion_hits_frame_limit() {
    let output = buffer_handler();
    let mut interp = InterpreterBuilder::new()
        .print_handler(output)
        .max_frames(64)
        .build();
    let err = interp
        .run("({ (f) } \"f\" def) (f)")
        .map_err(|e| e.kind);
    assert_eq!(err, Err(EvalErrorKind::FrameLimitExceeded { limit: 64 }));
}

#[test]
fn deep_recursion_below_limit_does_not_use_host_stack() {
    let (mut interp, _) = interpreter();
    // Each call nests one frame deeper before any frame returns.
    let mut program = String::from("({ 1 } \"f0\" def)");
    for i in 1..2_000 {
        program.push_str(&format!(" ({{ (f{}) }} \"f{i}\" def)", i - 1));
    }
    program.push_str(" (f1999)");
    assert_eq!(interp.run(&program), Ok(()));
    assert_eq!(interp.stack(), &[Value::Int(1)]);
}

#[test]
fn custom_root_receives_builtins() {
    let root = Namespace::new();
    root.bind("answer", Value::Int(42));
    let output = buffer_handler();
    let mut interp = InterpreterBuilder::new()
        .root(root.clone())
        .print_handler(output.clone())
        .build();
    assert!(root.contains("out"));
    assert_eq!(interp.run("(answer out)"), Ok(()));
    assert_eq!(output.output(), "42\n");
}
