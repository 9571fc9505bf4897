//! Helpers for running whole programs.

use psil_eval::{buffer_handler, Interpreter, SharedPrintHandler};
use psilc::commands::{run_source, RunOptions};

pub const FILE: &str = "test.psil";

/// A fresh interpreter with captured output.
pub fn session(options: &RunOptions) -> (Interpreter, SharedPrintHandler) {
    let output = buffer_handler();
    let interp = Interpreter::builder()
        .max_frames(options.max_frames)
        .print_handler(output.clone())
        .build();
    (interp, output)
}

/// Run `source` with default options. Returns the printed output, or the
/// uncolored diagnostic report.
pub fn run(source: &str) -> Result<String, String> {
    let (mut interp, output) = session(&RunOptions::default());
    run_source(&mut interp, FILE, source, false)?;
    Ok(output.output())
}

/// Run `source`, which must fail, and return its report.
pub fn report(source: &str) -> String {
    match run(source) {
        Ok(output) => panic!("expected {source:?} to fail, printed {output:?}"),
        Err(report) => report,
    }
}
