//! Lazy token-to-instruction parser.

use psil_ir::{Instruction, Reference, Span, StructuralError, StructuralErrorKind, SyntaxError, Value};
use psil_lexer::{LexError, LexErrorKind, Token, TokenKind};

/// An expression that has been opened but not yet closed.
#[derive(Clone, Copy, Debug)]
struct OpenExpression {
    /// Elements written inside so far, the eventual callable included.
    elements: usize,
    /// Where the `(` was.
    span: Span,
}

/// Instruction iterator over a token stream.
///
/// Each element of an expression (a literal, a reference, or a nested
/// expression) bumps the innermost open expression's element count; the
/// closing `)` becomes `Execute(elements - 1)`. A nested expression counts
/// as one element of its parent since it leaves its result there.
///
/// The parser yields `Err` at most once, as its final item.
pub struct Parser<T> {
    tokens: T,
    open: Vec<OpenExpression>,
    last_span: Span,
    done: bool,
}

/// Parse a token stream into a lazy instruction stream.
pub fn parse<T>(tokens: T) -> Parser<T::IntoIter>
where
    T: IntoIterator<Item = Result<Token, LexError>>,
{
    Parser::new(tokens.into_iter())
}

impl<T> Parser<T>
where
    T: Iterator<Item = Result<Token, LexError>>,
{
    pub fn new(tokens: T) -> Self {
        Parser {
            tokens,
            open: Vec::new(),
            last_span: Span::DUMMY,
            done: false,
        }
    }

    /// Number of expressions currently open.
    pub fn depth(&self) -> usize {
        self.open.len()
    }

    fn count_element(&mut self) {
        if let Some(innermost) = self.open.last_mut() {
            innermost.elements += 1;
        }
    }

    fn instruction(&mut self, token: Token) -> Result<Instruction, SyntaxError> {
        let span = token.span;
        let value = match token.kind {
            TokenKind::ExpressionStart => {
                self.open.push(OpenExpression { elements: 0, span });
                return Ok(Instruction::NewExpression(span));
            }
            TokenKind::ExpressionEnd => {
                let closed = self.open.pop().ok_or_else(|| {
                    StructuralError::new(StructuralErrorKind::UnmatchedClose, span)
                })?;
                let Some(args) = closed.elements.checked_sub(1) else {
                    return Err(
                        StructuralError::new(StructuralErrorKind::EmptyExpression, span).into(),
                    );
                };
                self.count_element();
                return Ok(Instruction::Execute(args, span));
            }
            TokenKind::Integer(text) => match text.parse::<i64>() {
                Ok(n) => Value::Int(n),
                Err(_) => {
                    return Err(LexError::new(LexErrorKind::IntegerOutOfRange { text }, span).into())
                }
            },
            TokenKind::Float(text) => match text.parse::<f64>() {
                Ok(x) => Value::Float(x),
                Err(_) => {
                    return Err(LexError::new(LexErrorKind::InvalidFloat { text }, span).into())
                }
            },
            TokenKind::Str(text) => Value::text(text),
            TokenKind::Code(source) => Value::code(source),
            TokenKind::Reference(segments) => Value::Reference(reference(segments)),
        };
        self.count_element();
        Ok(Instruction::Push(value, span))
    }

    fn finish(&mut self) -> Option<SyntaxError> {
        let innermost = self.open.last()?;
        let err = StructuralError::new(
            StructuralErrorKind::UnclosedExpression {
                open: self.open.len(),
            },
            innermost.span,
        );
        tracing::trace!(open = self.open.len(), last = %self.last_span, "input ended inside expression");
        self.open.clear();
        Some(err.into())
    }
}

/// Decode lexed segments; an empty first segment marks an anchored name.
fn reference(mut segments: Vec<String>) -> Reference {
    if segments.first().is_some_and(String::is_empty) {
        segments.remove(0);
        Reference::local(segments)
    } else {
        Reference::new(segments)
    }
}

impl<T> Iterator for Parser<T>
where
    T: Iterator<Item = Result<Token, LexError>>,
{
    type Item = Result<Instruction, SyntaxError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.tokens.next() {
            None => {
                self.done = true;
                self.finish().map(Err)
            }
            Some(Err(err)) => {
                self.done = true;
                Some(Err(err.into()))
            }
            Some(Ok(token)) => {
                self.last_span = token.span;
                let result = self.instruction(token);
                if result.is_err() {
                    self.done = true;
                }
                Some(result)
            }
        }
    }
}

impl<T> std::iter::FusedIterator for Parser<T> where T: Iterator<Item = Result<Token, LexError>> {}
