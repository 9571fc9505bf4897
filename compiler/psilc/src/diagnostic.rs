//! Error rendering.
//!
//! Every PSIL error is rendered the same way: the message, a label on the
//! offending source span, and, for runtime errors, a note with what the
//! interpreter was doing (instruction, called name, stack window).

use ariadne::{Color, Config, Label, Report, ReportKind, Source};
use psil_ir::{EvalError, EvalErrorKind};

/// Short label text for the span an error points at.
fn label_message(kind: &EvalErrorKind) -> &'static str {
    match kind {
        EvalErrorKind::Lexical(_) => "invalid token",
        EvalErrorKind::Structural(_) => "unbalanced expression",
        EvalErrorKind::NameNotFound { .. } => "not found",
        EvalErrorKind::NotCallable { .. } => "executed here",
        EvalErrorKind::TypeMismatch { .. } => "wrong operand type",
        EvalErrorKind::StackUnderflow => "not enough values on the stack",
        EvalErrorKind::IntegerOverflow { .. } => "result does not fit in 64 bits",
        EvalErrorKind::DivisionByZero => "divisor is zero",
        EvalErrorKind::FrameLimitExceeded { .. } => "call nests too deeply",
    }
}

/// The interpreter context of `err`, as note text.
pub fn context_note(err: &EvalError) -> Option<String> {
    let context = err.context()?;
    let mut note = format!("while executing `{}`", context.instruction);
    if let Some(reference) = &context.reference {
        note.push_str(&format!(" in `{reference}`"));
    }
    note.push_str(&format!("\nstack: [{}]", context.stack.join(", ")));
    Some(note)
}

/// Render `err` without source context.
pub fn render_plain(err: &EvalError) -> String {
    match context_note(err) {
        Some(note) => format!("error: {err}\n  = note: {note}\n"),
        None => format!("error: {err}\n"),
    }
}

/// Render `err` against `source`, which was read from `path`.
///
/// Spans are character offsets, matching what the lexer records.
pub fn render(path: &str, source: &str, err: &EvalError, color: bool) -> String {
    let Some(span) = err.span() else {
        return render_plain(err);
    };
    let len = source.chars().count();
    let start = (span.start as usize).min(len);
    let end = (span.end as usize).clamp(start, len);

    let mut report = Report::build(ReportKind::Error, path, start)
        .with_config(Config::default().with_color(color))
        .with_message(err.to_string())
        .with_label(
            Label::new((path, start..end))
                .with_message(label_message(&err.kind))
                .with_color(Color::Red),
        );
    if let Some(note) = context_note(err) {
        report = report.with_note(note);
    }

    let mut out = Vec::new();
    if report
        .finish()
        .write((path, Source::from(source)), &mut out)
        .is_err()
    {
        return render_plain(err);
    }
    String::from_utf8_lossy(&out).into_owned()
}
