//! Command handlers for the `psil` CLI.
//!
//! Each submodule implements one command. Shared input handling lives
//! here in the module root.

use std::io::Read;

mod debug;
mod repl;
mod run;

pub use debug::{lex_file, parse_file};
pub use repl::{run_repl, ReplBuffer};
pub use run::{build_interpreter, parse_run_options, run_file, run_source, run_stdin, RunOptions};

/// Read a source file, or exit with a message saying why it could not be
/// read.
pub(super) fn read_file(path: &str) -> String {
    match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            let msg = match e.kind() {
                std::io::ErrorKind::NotFound => format!("cannot find file '{path}'"),
                std::io::ErrorKind::PermissionDenied => {
                    format!("permission denied reading '{path}'")
                }
                std::io::ErrorKind::InvalidData => {
                    format!("'{path}' is not valid UTF-8")
                }
                _ => format!("error reading '{path}': {e}"),
            };
            eprintln!("error: {msg}");
            std::process::exit(1);
        }
    }
}

/// Read all of standard input, or exit.
pub(super) fn read_stdin() -> String {
    let mut source = String::new();
    if let Err(e) = std::io::stdin().read_to_string(&mut source) {
        eprintln!("error: reading standard input: {e}");
        std::process::exit(1);
    }
    source
}

/// Whether diagnostics on stderr should be colored.
pub(super) fn stderr_color() -> bool {
    std::io::IsTerminal::is_terminal(&std::io::stderr())
}
