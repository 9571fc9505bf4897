//! PSIL Eval - the stack-machine interpreter.
//!
//! # Architecture
//!
//! - [`Interpreter`]: pulls instructions from a stack of instruction
//!   streams and dispatches them against one data stack and the current
//!   namespace
//! - [`InterpreterBuilder`]: configures output, root namespace, and the
//!   frame limit
//! - [`BUILTINS`]: the native library bound into every root namespace
//! - [`evaluate_binary`]: arithmetic with integer-to-float promotion
//! - [`PrintHandlerImpl`]: where `out` writes (stdout, a buffer, or nowhere)

mod builtins;
mod config;
pub mod interpreter;
mod operators;
mod print_handler;

pub use builtins::{install_builtins, BUILTINS};
pub use config::{InterpreterConfig, DEFAULT_MAX_FRAMES};
pub use interpreter::{Interpreter, InterpreterBuilder};
pub use operators::{evaluate_binary, BinaryOp};
pub use print_handler::{
    buffer_handler, silent_handler, stdout_handler, BufferPrintHandler, PrintHandlerImpl,
    SharedPrintHandler, StdoutPrintHandler,
};

pub use psil_ir::{EvalError, EvalErrorKind, EvalResult, Machine, Namespace, Reference, Value};
