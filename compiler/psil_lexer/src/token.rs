//! Lexical tokens and source spans.

use std::fmt;

/// Location of a token in source.
///
/// Offsets are character indices (not bytes), matching how the lexer
/// consumes its input. `line` and `column` are 1-based and refer to the
/// first character of the span.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Span {
    /// Character offset of the first character.
    pub start: u32,
    /// Character offset one past the last character.
    pub end: u32,
    /// Line of the first character.
    pub line: u32,
    /// Column of the first character.
    pub column: u32,
}

impl Span {
    /// Dummy span for values that did not come from source text.
    pub const DUMMY: Span = Span {
        start: 0,
        end: 0,
        line: 0,
        column: 0,
    };

    /// Returns `true` if this span does not point into source.
    #[inline]
    pub fn is_dummy(&self) -> bool {
        self.line == 0
    }

    /// Span length in characters.
    #[inline]
    pub fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    /// Returns `true` for zero-width spans.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// What kind of token was scanned.
///
/// Literal variants carry raw text; decoding into numbers happens in the
/// parser so that range errors can be reported with the token's span.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// A `:`-separated qualified name, already split into segments. A
    /// leading `:` shows up as an empty first segment.
    Reference(Vec<String>),
    /// Numeric text without a decimal point.
    Integer(String),
    /// Numeric text with exactly one decimal point.
    Float(String),
    /// String contents with escapes already decoded.
    Str(String),
    /// Raw text between the outermost `{` and its matching `}`.
    Code(String),
    /// `(`
    ExpressionStart,
    /// `)`
    ExpressionEnd,
}

impl TokenKind {
    /// Short human-readable description, used in diagnostics.
    pub fn describe(&self) -> &'static str {
        match self {
            TokenKind::Reference(_) => "reference",
            TokenKind::Integer(_) => "integer literal",
            TokenKind::Float(_) => "float literal",
            TokenKind::Str(_) => "string literal",
            TokenKind::Code(_) => "code literal",
            TokenKind::ExpressionStart => "`(`",
            TokenKind::ExpressionEnd => "`)`",
        }
    }
}

/// A token with its location.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    #[inline]
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Token { kind, span }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            TokenKind::Reference(segments) => write!(f, "Reference({})", segments.join(":")),
            TokenKind::Integer(text) => write!(f, "Integer({text})"),
            TokenKind::Float(text) => write!(f, "Float({text})"),
            TokenKind::Str(text) => write!(f, "String({text:?})"),
            TokenKind::Code(text) => write!(f, "Code({{{text}}})"),
            TokenKind::ExpressionStart => f.write_str("ExpressionStart"),
            TokenKind::ExpressionEnd => f.write_str("ExpressionEnd"),
        }
    }
}
