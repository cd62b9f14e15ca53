//! Reader errors. Offsets are byte positions into the source text.

use std::fmt;

/// Errors produced while reading source text into expressions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadError {
    /// A `"` with no closing quote.
    UnterminatedString {
        /// Offset of the opening quote
        start: usize,
    },

    /// A `(` with no matching `)`.
    UnterminatedList {
        /// Offset of the opening parenthesis
        start: usize,
    },

    /// A `)` with no open list.
    UnexpectedClose {
        /// Offset of the stray parenthesis
        offset: usize,
    },

    /// A token that starts like a number but does not parse as one.
    InvalidNumber {
        /// The offending text
        literal: String,
        /// Offset of the token
        offset: usize,
    },

    /// `read_one` found no expression, or more than one.
    ExpectedSingle {
        /// Number of expressions found
        found: usize,
    },
}

impl fmt::Display for ReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnterminatedString { start } => {
                write!(f, "unterminated string literal starting at byte {start}")
            }
            Self::UnterminatedList { start } => {
                write!(f, "unclosed '(' at byte {start}")
            }
            Self::UnexpectedClose { offset } => write!(f, "unexpected ')' at byte {offset}"),
            Self::InvalidNumber { literal, offset } => {
                write!(f, "invalid numeric literal '{literal}' at byte {offset}")
            }
            Self::ExpectedSingle { found } => {
                write!(f, "expected exactly one expression, found {found}")
            }
        }
    }
}

impl std::error::Error for ReadError {}

/// Result type for reader operations.
pub type ReadResult<T> = Result<T, ReadError>;
