//! The interactive read-eval-print loop.
//!
//! Lines are collected until they form a complete chunk (no open literal,
//! comment, or expression), then the chunk runs on a single interpreter
//! that lives for the whole session. Errors are reported and the session
//! continues with its bindings intact.
//!
//! Lines starting with `:` outside a chunk are session commands
//! (`:quit`, `:stack`, `:help`).

use std::io::{self, BufRead, Write};

use super::{build_interpreter, run_source, stderr_color, RunOptions};

const PROMPT: &str = "psil> ";
const CONTINUATION_PROMPT: &str = "....> ";

/// Accumulates input lines into complete chunks.
#[derive(Debug, Default)]
pub struct ReplBuffer {
    pending: String,
}

impl ReplBuffer {
    pub fn new() -> Self {
        ReplBuffer::default()
    }

    /// Returns `true` while a chunk is partially entered.
    pub fn is_continuing(&self) -> bool {
        !self.pending.trim().is_empty()
    }

    /// Add one line. Returns the accumulated chunk once it is complete.
    pub fn push_line(&mut self, line: &str) -> Option<String> {
        self.pending.push_str(line);
        if !line.ends_with('\n') {
            self.pending.push('\n');
        }
        if psil_parse::is_complete(&self.pending) {
            Some(std::mem::take(&mut self.pending))
        } else {
            None
        }
    }

    /// Whatever was entered but never completed.
    pub fn take_pending(&mut self) -> String {
        std::mem::take(&mut self.pending)
    }
}

/// Run the REPL on stdin until end of input.
pub fn run_repl(options: &RunOptions) {
    let mut interp = build_interpreter(options);
    let mut buffer = ReplBuffer::new();
    let stdin = io::stdin();
    let mut chunks = 0usize;
    let color = stderr_color();

    loop {
        let prompt = if buffer.is_continuing() {
            CONTINUATION_PROMPT
        } else {
            PROMPT
        };
        print!("{prompt}");
        // Prompt display is best effort.
        let _ = io::stdout().flush();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                eprintln!("error: reading standard input: {e}");
                break;
            }
        }

        if !buffer.is_continuing() {
            match line.trim() {
                ":quit" | ":q" => return,
                ":help" | ":h" => {
                    print_help();
                    continue;
                }
                ":stack" | ":s" => {
                    let values: Vec<String> =
                        interp.stack().iter().map(ToString::to_string).collect();
                    println!("[{}]", values.join(", "));
                    continue;
                }
                _ => {}
            }
        }

        let Some(chunk) = buffer.push_line(&line) else {
            continue;
        };
        chunks += 1;
        let name = format!("<repl:{chunks}>");
        if let Err(report) = run_source(&mut interp, &name, &chunk, color) {
            eprint!("{report}");
        }
    }

    // Input ended inside a chunk: run it so the error gets reported.
    let rest = buffer.take_pending();
    if !rest.trim().is_empty() {
        chunks += 1;
        let name = format!("<repl:{chunks}>");
        if let Err(report) = run_source(&mut interp, &name, &rest, color) {
            eprint!("{report}");
        }
    }
    println!();
}

fn print_help() {
    println!("Commands:");
    println!("  :quit, :q    Exit the session");
    println!("  :stack, :s   Show the values on the stack");
    println!("  :help, :h    Show this help");
    println!();
    println!("Anything else is run as PSIL. Input continues on the next");
    println!("line until every `(`, `{{` and `\"` is closed.");
}
