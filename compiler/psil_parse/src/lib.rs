//! Parser for PSIL.
//!
//! Turns the lexer's token stream into the flat instruction stream the
//! interpreter consumes. Parsing is lazy: top-level programs are parsed as
//! they run, so a program that fails halfway has already executed its
//! first half. Code literals are compiled eagerly, but only once, on their
//! first execution.

mod parser;

use std::rc::Rc;

use psil_ir::{Instruction, SourceBlock, SyntaxError};
use psil_lexer::Lexer;

pub use parser::{parse, Parser};

/// Instruction stream over owned source text.
pub type SourceParser = Parser<Lexer<std::vec::IntoIter<char>>>;

/// Lazily parse owned source text.
pub fn parse_source(source: &str) -> SourceParser {
    let chars: Vec<char> = source.chars().collect();
    parse(psil_lexer::tokenize(chars))
}

/// Parse a whole program eagerly.
pub fn compile(source: &str) -> Result<Vec<Instruction>, SyntaxError> {
    parse(psil_lexer::tokenize(source.chars())).collect()
}

/// The instructions of a code block, compiling and caching them on first
/// use.
pub fn instructions(block: &SourceBlock) -> Result<Rc<[Instruction]>, SyntaxError> {
    block.instructions_with(compile)
}

/// Returns `true` unless `source` ends in the middle of a literal, a
/// comment, or an expression.
///
/// Other syntax errors count as complete: more input would not fix them,
/// so they should be reported right away.
pub fn is_complete(source: &str) -> bool {
    !parse(psil_lexer::tokenize(source.chars())).any(|item| match item {
        Ok(_) => false,
        Err(err) => err.is_incomplete(),
    })
}
