//! Lexer error types.
//!
//! Every lexical error is fatal: the lexer stops producing tokens after the
//! first one. Errors carry the span of the offending text so the driver can
//! point at it.

use std::fmt;

use crate::token::Span;

/// A fatal lexical error.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct LexError {
    /// WHERE the error occurred.
    pub span: Span,
    /// WHAT went wrong.
    pub kind: LexErrorKind,
}

/// What kind of lexical error occurred.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum LexErrorKind {
    // === Unterminated Constructs ===
    /// End of input inside a `"..."` string literal.
    UnterminatedString,
    /// End of input inside a `#...#` comment.
    UnterminatedComment,
    /// End of input before a `{` code literal's braces balanced.
    UnterminatedCode { depth: u32 },

    // === Numeric Errors ===
    /// Second `.` in a numeric literal.
    MultipleDecimalPoints,
    /// A character other than a digit or `.` inside a numeric literal.
    InvalidNumberChar { found: char },
    /// Sign or decimal point with no digits (`-`, `.`, `+.`).
    MissingDigits,
    /// Integer text does not fit in 64 bits.
    IntegerOutOfRange { text: String },
    /// Float text could not be decoded.
    InvalidFloat { text: String },

    // === Reference Errors ===
    /// A character that cannot appear in a reference.
    IllegalReferenceChar { found: char },
    /// `a::b`, or a reference beginning or ending with `:`.
    EmptyReferenceSegment,

    // === Character Errors ===
    /// A character that cannot start any token.
    UnexpectedChar { found: char },
}

impl LexError {
    #[inline]
    pub fn new(kind: LexErrorKind, span: Span) -> Self {
        LexError { span, kind }
    }

    /// Returns `true` if more input could make this error go away.
    ///
    /// The REPL uses this to keep reading lines instead of reporting an
    /// error for a string, comment, or code literal still being typed.
    pub fn is_incomplete(&self) -> bool {
        matches!(
            self.kind,
            LexErrorKind::UnterminatedString
                | LexErrorKind::UnterminatedComment
                | LexErrorKind::UnterminatedCode { .. }
        )
    }
}

impl fmt::Display for LexErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexErrorKind::UnterminatedString => write!(f, "unterminated string literal"),
            LexErrorKind::UnterminatedComment => write!(f, "unterminated comment"),
            LexErrorKind::UnterminatedCode { depth } => {
                write!(f, "unterminated code literal ({depth} unclosed `{{`)")
            }
            LexErrorKind::MultipleDecimalPoints => {
                write!(f, "numeric literal has more than one decimal point")
            }
            LexErrorKind::InvalidNumberChar { found } => {
                write!(f, "invalid character {found:?} in numeric literal")
            }
            LexErrorKind::MissingDigits => write!(f, "numeric literal has no digits"),
            LexErrorKind::IntegerOutOfRange { text } => {
                write!(f, "integer literal `{text}` does not fit in 64 bits")
            }
            LexErrorKind::InvalidFloat { text } => write!(f, "invalid float literal `{text}`"),
            LexErrorKind::IllegalReferenceChar { found } => {
                write!(f, "invalid character {found:?} in reference")
            }
            LexErrorKind::EmptyReferenceSegment => write!(f, "reference has an empty segment"),
            LexErrorKind::UnexpectedChar { found } => write!(f, "unexpected character {found:?}"),
        }
    }
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.kind, self.span)
    }
}

impl std::error::Error for LexError {}
