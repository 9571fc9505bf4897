//! Standalone tokenizer for PSIL source text.
//!
//! Turns a stream of characters into a lazy, single-pass stream of
//! [`Token`]s. Whitespace and `#...#` comments are discarded; literal
//! tokens keep their raw text so that decoding into runtime values can be
//! deferred to the parser.
//!
//! # Architecture
//!
//! - [`Cursor`]: peekable character cursor that tracks position
//! - [`Lexer`]: token iterator built on a cursor, fused after the first error
//! - [`LexError`]: fatal lexical errors with the span where they occurred
//!
//! The lexer never backtracks and never looks more than one character
//! ahead, so it works equally on a whole file or on a chunk of REPL input.

mod cursor;
mod lex_error;
mod lexer;
mod token;

pub use cursor::{Cursor, Position};
pub use lex_error::{LexError, LexErrorKind};
pub use lexer::{tokenize, Lexer};
pub use token::{Span, Token, TokenKind};
