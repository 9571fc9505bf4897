//! Error taxonomy for parsing and evaluation.
//!
//! Every PSIL error is fatal to the current run: it unwinds the
//! interpreter loop and is returned to the embedding, which renders it.
//! Constructors for each runtime error kind live here so that messages
//! are defined in one place.
//!
//! # Layers
//!
//! - [`LexError`] (from `psil_lexer`): malformed tokens
//! - [`StructuralError`]: unbalanced expressions
//! - [`SyntaxError`]: either of the above, as produced by the parser
//! - [`EvalError`]: everything, plus runtime failures and the interpreter
//!   context at the point of failure

use psil_lexer::{LexError, Span};

use crate::reference::Reference;
use crate::value::Value;

/// Result of evaluation.
pub type EvalResult<T = Value> = Result<T, EvalError>;

/// What went wrong with expression structure.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StructuralErrorKind {
    #[error("unmatched `)`")]
    UnmatchedClose,
    #[error("empty expression `()` has nothing to execute")]
    EmptyExpression,
    #[error("input ended with {open} unclosed `(`")]
    UnclosedExpression { open: usize },
}

/// An unbalanced expression delimiter.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{kind} at {span}")]
pub struct StructuralError {
    pub kind: StructuralErrorKind,
    pub span: Span,
}

impl StructuralError {
    pub fn new(kind: StructuralErrorKind, span: Span) -> Self {
        StructuralError { kind, span }
    }
}

/// Any error the parser can produce.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SyntaxError {
    #[error(transparent)]
    Lexical(#[from] LexError),
    #[error(transparent)]
    Structural(#[from] StructuralError),
}

impl SyntaxError {
    pub fn span(&self) -> Span {
        match self {
            SyntaxError::Lexical(err) => err.span,
            SyntaxError::Structural(err) => err.span,
        }
    }

    /// Returns `true` if appending more input could fix the error.
    pub fn is_incomplete(&self) -> bool {
        match self {
            SyntaxError::Lexical(err) => err.is_incomplete(),
            SyntaxError::Structural(err) => {
                matches!(err.kind, StructuralErrorKind::UnclosedExpression { .. })
            }
        }
    }
}

/// Typed error category.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum EvalErrorKind {
    #[error("lexical error: {0}")]
    Lexical(LexError),
    #[error("structural error: {0}")]
    Structural(StructuralError),
    #[error("name `{segment}` not found while resolving `{reference}`")]
    NameNotFound { reference: String, segment: String },
    #[error("{type_name} is not callable")]
    NotCallable { type_name: &'static str },
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
    #[error("stack underflow")]
    StackUnderflow,
    #[error("integer overflow in `{operation}`")]
    IntegerOverflow { operation: &'static str },
    #[error("division by zero")]
    DivisionByZero,
    #[error("call depth exceeded {limit} frames")]
    FrameLimitExceeded { limit: usize },
}

/// Interpreter state captured when an error unwinds the loop.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ErrorContext {
    /// The instruction being dispatched, rendered.
    pub instruction: String,
    /// Source location of that instruction.
    pub span: Span,
    /// The reference being resolved or called, if any.
    pub reference: Option<Reference>,
    /// The active frame's stack, bottom first, rendered.
    pub stack: Vec<String>,
}

/// A fatal evaluation error.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[error("{kind}")]
pub struct EvalError {
    pub kind: EvalErrorKind,
    pub context: Option<Box<ErrorContext>>,
}

impl EvalError {
    pub fn new(kind: EvalErrorKind) -> Self {
        EvalError {
            kind,
            context: None,
        }
    }

    /// Attach interpreter context, keeping any context already present.
    ///
    /// The innermost failure point wins.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        if self.context.is_none() {
            self.context = Some(Box::new(context));
        }
        self
    }

    pub fn context(&self) -> Option<&ErrorContext> {
        self.context.as_deref()
    }

    /// Best source location for this error.
    ///
    /// Syntax errors know exactly where they are; runtime errors point at
    /// the instruction that was executing.
    pub fn span(&self) -> Option<Span> {
        match &self.kind {
            EvalErrorKind::Lexical(err) => Some(err.span),
            EvalErrorKind::Structural(err) => Some(err.span),
            _ => self
                .context
                .as_ref()
                .map(|c| c.span)
                .filter(|span| !span.is_dummy()),
        }
    }

    /// Report a name lookup failure against the full reference being
    /// resolved rather than the single segment that was missing.
    #[must_use]
    pub fn for_reference(mut self, full: &Reference) -> Self {
        if let EvalErrorKind::NameNotFound { reference, .. } = &mut self.kind {
            *reference = full.to_string();
        }
        self
    }
}

impl From<SyntaxError> for EvalError {
    fn from(err: SyntaxError) -> Self {
        match err {
            SyntaxError::Lexical(err) => EvalError::new(EvalErrorKind::Lexical(err)),
            SyntaxError::Structural(err) => EvalError::new(EvalErrorKind::Structural(err)),
        }
    }
}

impl From<LexError> for EvalError {
    fn from(err: LexError) -> Self {
        EvalError::new(EvalErrorKind::Lexical(err))
    }
}

// Runtime Error Constructors

#[cold]
pub fn stack_underflow() -> EvalError {
    EvalError::new(EvalErrorKind::StackUnderflow)
}

#[cold]
pub fn name_not_found(reference: impl Into<String>, segment: impl Into<String>) -> EvalError {
    EvalError::new(EvalErrorKind::NameNotFound {
        reference: reference.into(),
        segment: segment.into(),
    })
}

#[cold]
pub fn not_callable(type_name: &'static str) -> EvalError {
    EvalError::new(EvalErrorKind::NotCallable { type_name })
}

#[cold]
pub fn type_mismatch(expected: &'static str, found: &'static str) -> EvalError {
    EvalError::new(EvalErrorKind::TypeMismatch { expected, found })
}

#[cold]
pub fn integer_overflow(operation: &'static str) -> EvalError {
    EvalError::new(EvalErrorKind::IntegerOverflow { operation })
}

#[cold]
pub fn division_by_zero() -> EvalError {
    EvalError::new(EvalErrorKind::DivisionByZero)
}

#[cold]
pub fn frame_limit_exceeded(limit: usize) -> EvalError {
    EvalError::new(EvalErrorKind::FrameLimitExceeded { limit })
}
