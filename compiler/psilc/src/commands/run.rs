//! The `run` command: execute a program from a file or standard input.

use psil_eval::{Interpreter, DEFAULT_MAX_FRAMES};

use super::{read_file, read_stdin, stderr_color};
use crate::diagnostic;

/// Options shared by every command that runs code.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunOptions {
    /// Call depth limit, `--max-frames=N`.
    pub max_frames: usize,
}

impl Default for RunOptions {
    fn default() -> Self {
        RunOptions {
            max_frames: DEFAULT_MAX_FRAMES,
        }
    }
}

/// Pull run options out of `args`, returning them with the remaining
/// arguments in order.
pub fn parse_run_options(args: &[String]) -> Result<(RunOptions, Vec<String>), String> {
    let mut options = RunOptions::default();
    let mut rest = Vec::with_capacity(args.len());
    for arg in args {
        if let Some(value) = arg.strip_prefix("--max-frames=") {
            options.max_frames = match value.parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => return Err(format!("--max-frames expects a positive integer, got '{value}'")),
            };
        } else {
            rest.push(arg.clone());
        }
    }
    Ok((options, rest))
}

/// An interpreter writing to stdout, configured from `options`.
pub fn build_interpreter(options: &RunOptions) -> Interpreter {
    Interpreter::builder().max_frames(options.max_frames).build()
}

/// Run `source` on `interp`. On failure, returns the rendered diagnostic.
pub fn run_source(
    interp: &mut Interpreter,
    name: &str,
    source: &str,
    color: bool,
) -> Result<(), String> {
    tracing::debug!(name, "running source");
    interp
        .run(source)
        .map_err(|err| diagnostic::render(name, source, &err, color))
}

/// Run a PSIL source file.
pub fn run_file(path: &str, options: &RunOptions) {
    let source = read_file(path);
    run_named(path, &source, options);
}

/// Run the program on standard input.
pub fn run_stdin(options: &RunOptions) {
    let source = read_stdin();
    run_named("<stdin>", &source, options);
}

fn run_named(name: &str, source: &str, options: &RunOptions) {
    let mut interp = build_interpreter(options);
    if let Err(report) = run_source(&mut interp, name, source, stderr_color()) {
        eprint!("{report}");
        std::process::exit(1);
    }
}
