//! Programs that fail, checked through their rendered reports.

use crate::common::{report, FILE};

#[test]
fn report_names_the_file_and_error() {
    let report = report("(1 out)\n(nope)");
    assert!(report.contains(FILE));
    assert!(report.contains("name `nope` not found while resolving `nope`"));
    assert!(report.contains("while executing `Push nope` in `nope`"));
}

#[test]
fn type_mismatch_report() {
    let report = report("(1 \"a\" add)");
    assert!(report.contains("type mismatch: expected number, found string"));
    assert!(report.contains("wrong operand type"));
}

#[test]
fn division_by_zero_report() {
    let report = report("((1 0 div) out)");
    assert!(report.contains("division by zero"));
    assert!(report.contains("in `div`"));
}

#[test]
fn overflow_report() {
    let report = report("((9223372036854775807 1 add) out)");
    assert!(report.contains("integer overflow"));
}

#[test]
fn calling_a_string_report() {
    let report = report("(\"not code\")");
    assert!(report.contains("string is not callable"));
}

#[test]
fn unclosed_expression_report() {
    let report = report("(1 out)\n(2 out");
    assert!(report.contains("unclosed `(`"));
    assert!(report.contains("unbalanced expression"));
}

#[test]
fn unterminated_code_report() {
    let report = report("({ (1 out) \"f\" def)");
    assert!(report.contains("lexical error"));
    assert!(report.contains("invalid token"));
}

#[test]
fn underflow_report() {
    let report = report("(drop)");
    assert!(report.contains("stack underflow"));
}
