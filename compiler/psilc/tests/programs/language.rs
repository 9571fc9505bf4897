//! Programs that run to completion.

use pretty_assertions::assert_eq;
use psilc::commands::{run_source, RunOptions};

use crate::common::{run, session, FILE};

#[test]
fn hello_world() {
    assert_eq!(run("(\"hello, world\" out)"), Ok("hello, world\n".to_string()));
}

#[test]
fn comments_are_skipped() {
    let program = "(1 out) # not (2 out) this # (3 out)";
    assert_eq!(run(program), Ok("1\n3\n".to_string()));
}

#[test]
fn user_defined_square() {
    let program = r#"
        ({ (dup) (mul) } "square" def)
        ((7 square) out)
        ((1.5 square) out)
    "#;
    assert_eq!(run(program), Ok("49\n2.25\n".to_string()));
}

#[test]
fn integer_and_float_division() {
    assert_eq!(run("((7 2 div) out)"), Ok("3\n".to_string()));
    assert_eq!(run("((7.0 2 div) out)"), Ok("3.5\n".to_string()));
}

#[test]
fn swap_reorders_operands() {
    assert_eq!(run("((10 3 swap) sub) (out)"), Ok("-7\n".to_string()));
}

#[test]
fn namespaced_library() {
    let program = r#"
        ((namespace) "geo" def)
        (3 "geo:sides" def)
        ({ (dup) (mul) } "geo:sq" def)
        ((4 geo:sq) out)
        (geo:sides out)
    "#;
    assert_eq!(run(program), Ok("16\n3\n".to_string()));
}

#[test]
fn library_functions_call_their_siblings() {
    let program = r#"
        ((namespace) "geo" def)
        (4 "geo:sides" def)
        ({ (sides 5 mul) } "geo:perimeter" def)
        ({ ((geo:perimeter) out) } "report" def)
        (report)
    "#;
    assert_eq!(run(program), Ok("20\n".to_string()));
}

#[test]
fn code_values_are_first_class() {
    let program = r#"
        ({ (2 mul) } "double" def)
        (("double" get) "twice" def)
        ((21 twice) out)
        ((5 { (1 add) } exec) out)
    "#;
    assert_eq!(run(program), Ok("42\n6\n".to_string()));
}

#[test]
fn printing_values_of_each_kind() {
    let program = r#"
        (42 out)
        (6.0 out)
        ("text" out)
        (("name" quote) out)
        ({ (1 out) } out)
    "#;
    assert_eq!(
        run(program),
        Ok("42\n6.0\ntext\nname\n{ (1 out) }\n".to_string())
    );
}

#[test]
fn session_keeps_bindings_between_chunks() {
    let (mut interp, output) = session(&RunOptions::default());
    assert_eq!(run_source(&mut interp, FILE, "(10 \"base\" def)", false), Ok(()));
    assert!(run_source(&mut interp, FILE, "(missing)", false).is_err());
    assert_eq!(run_source(&mut interp, FILE, "((base 5 add) out)", false), Ok(()));
    assert_eq!(output.output(), "15\n");
}

#[test]
fn max_frames_option_bounds_recursion() {
    let (mut interp, _) = session(&RunOptions { max_frames: 8 });
    let chain = r#"
        ({ 1 } "a" def)
        ({ (a) } "b" def)
        ({ (b) } "c" def)
        (c)
    "#;
    assert_eq!(run_source(&mut interp, FILE, chain, false), Ok(()));

    let report = run_source(&mut interp, FILE, "({ (loop) } \"loop\" def) (loop)", false);
    assert!(report.is_err_and(|r| r.contains("call depth exceeded 8 frames")));
}
