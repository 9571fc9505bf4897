//! Token scanner.
//!
//! Main dispatch looks at the first character of each token:
//!
//! | first char            | token                         |
//! |-----------------------|-------------------------------|
//! | whitespace            | skipped                       |
//! | `#`                   | comment, skipped up to `#`    |
//! | `(` / `)`             | expression start / end        |
//! | `"`                   | string literal                |
//! | `{`                   | code literal (brace-balanced) |
//! | digit `.` `-` `+`     | integer or float literal      |
//! | letter `_` `:`        | reference                     |

use crate::cursor::{Cursor, Position};
use crate::lex_error::{LexError, LexErrorKind};
use crate::token::{Token, TokenKind};

/// Tokenize a character stream.
///
/// The returned iterator is lazy, finite, and single-pass. It yields
/// `Err` at most once, as its final item.
pub fn tokenize<I: IntoIterator<Item = char>>(chars: I) -> Lexer<I::IntoIter> {
    Lexer::new(chars.into_iter())
}

/// Lazy token iterator over a character stream.
pub struct Lexer<I: Iterator<Item = char>> {
    cursor: Cursor<I>,
    done: bool,
}

/// Characters that end a numeric literal or a reference.
#[inline]
fn is_terminator(c: char) -> bool {
    c.is_whitespace() || c == '(' || c == ')'
}

impl<I: Iterator<Item = char>> Lexer<I> {
    pub fn new(chars: I) -> Self {
        Lexer {
            cursor: Cursor::new(chars),
            done: false,
        }
    }

    /// Scan the next token, skipping whitespace and comments.
    ///
    /// Returns `Ok(None)` at end of input.
    fn next_token(&mut self) -> Result<Option<Token>, LexError> {
        loop {
            let start = self.cursor.position();
            let Some(c) = self.cursor.current() else {
                return Ok(None);
            };
            match c {
                c if c.is_whitespace() => {
                    self.cursor.bump();
                }
                '#' => self.comment(start)?,
                '(' => return Ok(Some(self.single(start, TokenKind::ExpressionStart))),
                ')' => return Ok(Some(self.single(start, TokenKind::ExpressionEnd))),
                '"' => return self.string(start).map(Some),
                '{' => return self.code(start).map(Some),
                '0'..='9' | '.' | '-' | '+' => return self.number(start).map(Some),
                c if c.is_alphabetic() || c == '_' || c == ':' => {
                    return self.reference(start).map(Some)
                }
                found => {
                    self.cursor.bump();
                    return Err(self.error(start, LexErrorKind::UnexpectedChar { found }));
                }
            }
        }
    }

    fn single(&mut self, start: Position, kind: TokenKind) -> Token {
        self.cursor.bump();
        Token::new(kind, self.cursor.span_from(start))
    }

    fn error(&self, start: Position, kind: LexErrorKind) -> LexError {
        LexError::new(kind, self.cursor.span_from(start))
    }

    // ─── Comments ──────────────────────────────────────────────────────

    fn comment(&mut self, start: Position) -> Result<(), LexError> {
        self.cursor.bump();
        loop {
            match self.cursor.bump() {
                Some('#') => return Ok(()),
                Some(_) => {}
                None => return Err(self.error(start, LexErrorKind::UnterminatedComment)),
            }
        }
    }

    // ─── Strings ───────────────────────────────────────────────────────

    fn string(&mut self, start: Position) -> Result<Token, LexError> {
        self.cursor.bump();
        let mut text = String::new();
        loop {
            match self.cursor.bump() {
                Some('"') => break,
                Some('\\') => {
                    let Some(escaped) = self.cursor.bump() else {
                        return Err(self.error(start, LexErrorKind::UnterminatedString));
                    };
                    text.push(unescape(escaped));
                }
                Some(c) => text.push(c),
                None => return Err(self.error(start, LexErrorKind::UnterminatedString)),
            }
        }
        Ok(Token::new(TokenKind::Str(text), self.cursor.span_from(start)))
    }

    // ─── Code Literals ─────────────────────────────────────────────────

    /// Capture raw text up to the `}` matching the opening `{`.
    ///
    /// Strings and comments inside the literal are copied verbatim and
    /// their braces do not affect depth.
    fn code(&mut self, start: Position) -> Result<Token, LexError> {
        self.cursor.bump();
        let mut text = String::new();
        let mut depth: u32 = 1;
        loop {
            let Some(c) = self.cursor.bump() else {
                return Err(self.error(start, LexErrorKind::UnterminatedCode { depth }));
            };
            match c {
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                }
                '"' => {
                    text.push(c);
                    self.copy_quoted(start, &mut text, depth)?;
                    continue;
                }
                '#' => {
                    text.push(c);
                    self.copy_until(start, &mut text, '#', depth)?;
                    continue;
                }
                _ => {}
            }
            text.push(c);
        }
        Ok(Token::new(TokenKind::Code(text), self.cursor.span_from(start)))
    }

    /// Copy a string literal body (after its opening quote) raw into `text`.
    fn copy_quoted(&mut self, start: Position, text: &mut String, depth: u32) -> Result<(), LexError> {
        loop {
            let Some(c) = self.cursor.bump() else {
                return Err(self.error(start, LexErrorKind::UnterminatedCode { depth }));
            };
            text.push(c);
            match c {
                '"' => return Ok(()),
                '\\' => {
                    let Some(escaped) = self.cursor.bump() else {
                        return Err(self.error(start, LexErrorKind::UnterminatedCode { depth }));
                    };
                    text.push(escaped);
                }
                _ => {}
            }
        }
    }

    fn copy_until(
        &mut self,
        start: Position,
        text: &mut String,
        end: char,
        depth: u32,
    ) -> Result<(), LexError> {
        loop {
            let Some(c) = self.cursor.bump() else {
                return Err(self.error(start, LexErrorKind::UnterminatedCode { depth }));
            };
            text.push(c);
            if c == end {
                return Ok(());
            }
        }
    }

    // ─── Numbers ───────────────────────────────────────────────────────

    fn number(&mut self, start: Position) -> Result<Token, LexError> {
        let mut text = String::new();
        let mut dots = 0u32;
        let mut digits = 0u32;
        if let Some(sign @ ('-' | '+')) = self.cursor.current() {
            text.push(sign);
            self.cursor.bump();
        }
        while let Some(c) = self.cursor.current() {
            if is_terminator(c) {
                break;
            }
            match c {
                '0'..='9' => digits += 1,
                '.' => {
                    dots += 1;
                    if dots > 1 {
                        self.cursor.bump();
                        return Err(self.error(start, LexErrorKind::MultipleDecimalPoints));
                    }
                }
                found => {
                    self.cursor.bump();
                    return Err(self.error(start, LexErrorKind::InvalidNumberChar { found }));
                }
            }
            text.push(c);
            self.cursor.bump();
        }
        if digits == 0 {
            return Err(self.error(start, LexErrorKind::MissingDigits));
        }
        let kind = if dots == 0 {
            TokenKind::Integer(text)
        } else {
            TokenKind::Float(text)
        };
        Ok(Token::new(kind, self.cursor.span_from(start)))
    }

    // ─── References ────────────────────────────────────────────────────

    /// Scan `a:b`, anchored `:a:b`, or a lone `:`.
    fn reference(&mut self, start: Position) -> Result<Token, LexError> {
        let mut segments = Vec::new();
        if self.cursor.current() == Some(':') {
            self.cursor.bump();
            segments.push(String::new());
            if self.cursor.current().is_none_or(is_terminator) {
                return Ok(Token::new(
                    TokenKind::Reference(segments),
                    self.cursor.span_from(start),
                ));
            }
        }
        let mut segment = String::new();
        while let Some(c) = self.cursor.current() {
            if is_terminator(c) {
                break;
            }
            self.cursor.bump();
            match c {
                ':' => {
                    if segment.is_empty() {
                        return Err(self.error(start, LexErrorKind::EmptyReferenceSegment));
                    }
                    segments.push(std::mem::take(&mut segment));
                }
                c if c.is_alphanumeric() || c == '_' => segment.push(c),
                found => {
                    return Err(self.error(start, LexErrorKind::IllegalReferenceChar { found }));
                }
            }
        }
        if segment.is_empty() {
            return Err(self.error(start, LexErrorKind::EmptyReferenceSegment));
        }
        segments.push(segment);
        Ok(Token::new(
            TokenKind::Reference(segments),
            self.cursor.span_from(start),
        ))
    }
}

/// Decode the character following a backslash in a string literal.
fn unescape(c: char) -> char {
    match c {
        'n' => '\n',
        't' => '\t',
        'r' => '\r',
        '0' => '\0',
        other => other,
    }
}

impl<I: Iterator<Item = char>> Iterator for Lexer<I> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.next_token() {
            Ok(Some(token)) => Some(Ok(token)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

impl<I: Iterator<Item = char>> std::iter::FusedIterator for Lexer<I> {}
