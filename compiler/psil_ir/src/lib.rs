//! PSIL IR - runtime data model shared by the parser and the interpreter.
//!
//! # Contents
//!
//! - [`Reference`]: `:`-separated qualified names
//! - [`Value`]: the closed set of runtime values, including first-class
//!   [`CodeBlock`]s and [`Namespace`]s
//! - [`Instruction`]: the parser's output, the interpreter's input
//! - [`Namespace`]: binding tree with search links and two-phase resolution
//! - [`Machine`]: the view of interpreter state handed to native code
//! - [`errors`]: the error taxonomy and its constructors
//!
//! Values and namespaces are reference counted with `Rc`, so nothing in
//! this crate is `Send`. PSIL is single-threaded by construction.

pub mod errors;
mod instruction;
mod machine;
mod namespace;
mod reference;
mod value;

pub use errors::{
    ErrorContext, EvalError, EvalErrorKind, EvalResult, StructuralError, StructuralErrorKind,
    SyntaxError,
};
pub use instruction::Instruction;
pub use machine::Machine;
pub use namespace::{FrameWindow, Namespace, WeakNamespace};
pub use reference::{Name, Reference};
pub use value::{CodeBlock, CodeBody, NativeCode, NativeFn, SourceBlock, Value};

// Spans come from the lexer; re-exported so downstream crates need only one import.
pub use psil_lexer::Span;
