//! Position-tracking cursor over a character stream.
//!
//! The cursor looks at most one character ahead. It records the character
//! offset, line, and column of the next unread character so that tokens and
//! errors can be located without keeping the source around.

use std::iter::Peekable;

use crate::token::Span;

/// Position of the next unread character.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Position {
    pub offset: u32,
    pub line: u32,
    pub column: u32,
}

/// Single-pass cursor over any character iterator.
///
/// Not restartable: once a character has been bumped it is gone.
pub struct Cursor<I: Iterator<Item = char>> {
    chars: Peekable<I>,
    offset: u32,
    line: u32,
    column: u32,
}

impl<I: Iterator<Item = char>> Cursor<I> {
    /// Create a cursor positioned before the first character.
    pub fn new(chars: I) -> Self {
        Cursor {
            chars: chars.peekable(),
            offset: 0,
            line: 1,
            column: 1,
        }
    }

    /// The next character without consuming it, or `None` at end of input.
    #[inline]
    pub fn current(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    /// Returns `true` once the input is exhausted.
    #[inline]
    pub fn is_eof(&mut self) -> bool {
        self.chars.peek().is_none()
    }

    /// Consume and return the next character, updating the position.
    #[inline]
    pub fn bump(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        self.offset = self.offset.saturating_add(1);
        if c == '\n' {
            self.line = self.line.saturating_add(1);
            self.column = 1;
        } else {
            self.column = self.column.saturating_add(1);
        }
        Some(c)
    }

    /// Consume characters while `pred` holds, appending them to `buf`.
    pub fn eat_while(&mut self, buf: &mut String, mut pred: impl FnMut(char) -> bool) {
        while let Some(c) = self.current() {
            if !pred(c) {
                break;
            }
            buf.push(c);
            self.bump();
        }
    }

    /// Position of the next unread character.
    #[inline]
    pub fn position(&self) -> Position {
        Position {
            offset: self.offset,
            line: self.line,
            column: self.column,
        }
    }

    /// Span from `start` up to (not including) the next unread character.
    #[inline]
    pub fn span_from(&self, start: Position) -> Span {
        Span {
            start: start.offset,
            end: self.offset,
            line: start.line,
            column: start.column,
        }
    }
}
