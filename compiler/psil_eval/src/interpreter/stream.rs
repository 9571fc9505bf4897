//! Instruction streams: pull cursors the interpreter loop draws from.

use std::rc::Rc;

use psil_ir::{Instruction, SyntaxError};
use psil_parse::SourceParser;

/// One pending instruction stream.
///
/// Top-level programs are parsed as they are consumed; code blocks replay
/// their memoized compilation from the start each time they are entered.
pub(crate) enum OpStream {
    Source(Box<SourceParser>),
    Block {
        instructions: Rc<[Instruction]>,
        pos: usize,
    },
}

impl OpStream {
    pub(crate) fn source(source: &str) -> Self {
        OpStream::Source(Box::new(psil_parse::parse_source(source)))
    }

    pub(crate) fn block(instructions: Rc<[Instruction]>) -> Self {
        OpStream::Block {
            instructions,
            pos: 0,
        }
    }
}

impl Iterator for OpStream {
    type Item = Result<Instruction, SyntaxError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            OpStream::Source(parser) => parser.next(),
            OpStream::Block { instructions, pos } => {
                let instruction = instructions.get(*pos)?.clone();
                *pos += 1;
                Some(Ok(instruction))
            }
        }
    }
}
