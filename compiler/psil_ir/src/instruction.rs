//! Interpreter instructions.

use std::fmt;

use psil_lexer::Span;

use crate::value::Value;

/// One step of an instruction stream.
///
/// Every instruction remembers where in source it came from, for
/// diagnostics.
#[derive(Clone, Debug, PartialEq)]
pub enum Instruction {
    /// Push a literal, or the value a reference resolves to.
    Push(Value, Span),
    /// An expression was opened.
    NewExpression(Span),
    /// An expression was closed: pop the callable and run it.
    ///
    /// The count is the number of values written inside the expression,
    /// excluding the callable itself.
    Execute(usize, Span),
}

impl Instruction {
    pub fn span(&self) -> Span {
        match self {
            Instruction::Push(_, span)
            | Instruction::NewExpression(span)
            | Instruction::Execute(_, span) => *span,
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Push(Value::Text(text), _) => write!(f, "Push {text:?}"),
            Instruction::Push(value, _) => write!(f, "Push {value}"),
            Instruction::NewExpression(_) => f.write_str("NewExpression"),
            Instruction::Execute(args, _) => write!(f, "Execute({args})"),
        }
    }
}
