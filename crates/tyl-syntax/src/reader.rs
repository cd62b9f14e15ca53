//! Text to expressions.
//!
//! The grammar is the usual one: `(` and `)` delimit lists, `"` delimits
//! strings (with `\"` and `\\` escapes), `;` starts a comment running to the
//! end of the line, whitespace separates atoms. An atom is a number if it
//! starts with a digit, or with a sign or `.` followed by a digit; `true` and
//! `false` are booleans; everything else is a symbol, so annotations such as
//! `Fn<number<number,number>>` and `<K,V>` come through as single symbols.

use crate::error::{ReadError, ReadResult};
use crate::sexpr::Sexpr;
use std::iter::Peekable;
use std::str::CharIndices;

/// Reads every top-level expression in `source`.
pub fn read(source: &str) -> ReadResult<Vec<Sexpr>> {
    Reader::new(source).read_all()
}

/// Reads exactly one expression.
pub fn read_one(source: &str) -> ReadResult<Sexpr> {
    let mut forms = read(source)?;
    if forms.len() != 1 {
        return Err(ReadError::ExpectedSingle { found: forms.len() });
    }
    Ok(forms.remove(0))
}

/// A single-pass reader over a source string.
pub struct Reader<'src> {
    source: &'src str,
    chars: Peekable<CharIndices<'src>>,
}

impl<'src> Reader<'src> {
    /// Creates a reader positioned at the start of `source`.
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
        }
    }

    /// Reads expressions until the input is exhausted.
    pub fn read_all(&mut self) -> ReadResult<Vec<Sexpr>> {
        // Open lists, innermost last, with the offset of their `(`.
        let mut stack: Vec<(usize, Vec<Sexpr>)> = Vec::new();
        let mut top = Vec::new();

        while let Some(&(offset, ch)) = self.chars.peek() {
            let finished = match ch {
                c if c.is_whitespace() => {
                    self.chars.next();
                    None
                }
                ';' => {
                    self.skip_comment();
                    None
                }
                '(' => {
                    self.chars.next();
                    stack.push((offset, Vec::new()));
                    None
                }
                ')' => {
                    self.chars.next();
                    match stack.pop() {
                        Some((_, items)) => Some(Sexpr::List(items)),
                        None => return Err(ReadError::UnexpectedClose { offset }),
                    }
                }
                '"' => Some(self.read_string(offset)?),
                _ => Some(self.read_atom(offset)?),
            };

            if let Some(expr) = finished {
                match stack.last_mut() {
                    Some((_, items)) => items.push(expr),
                    None => top.push(expr),
                }
            }
        }

        if let Some((start, _)) = stack.pop() {
            return Err(ReadError::UnterminatedList { start });
        }
        Ok(top)
    }

    fn skip_comment(&mut self) {
        for (_, ch) in self.chars.by_ref() {
            if ch == '\n' {
                break;
            }
        }
    }

    fn read_string(&mut self, start: usize) -> ReadResult<Sexpr> {
        self.chars.next();
        let mut text = String::new();
        loop {
            match self.chars.next() {
                Some((_, '"')) => return Ok(Sexpr::Str(text)),
                Some((_, '\\')) => match self.chars.next() {
                    Some((_, escaped)) => text.push(escaped),
                    None => return Err(ReadError::UnterminatedString { start }),
                },
                Some((_, ch)) => text.push(ch),
                None => return Err(ReadError::UnterminatedString { start }),
            }
        }
    }

    fn read_atom(&mut self, start: usize) -> ReadResult<Sexpr> {
        let mut end = self.source.len();
        while let Some(&(offset, ch)) = self.chars.peek() {
            if ch.is_whitespace() || matches!(ch, '(' | ')' | '"' | ';') {
                end = offset;
                break;
            }
            self.chars.next();
        }

        let text = &self.source[start..end];
        match text {
            "true" => return Ok(Sexpr::Bool(true)),
            "false" => return Ok(Sexpr::Bool(false)),
            _ => {}
        }

        if looks_numeric(text) {
            return text
                .parse::<f64>()
                .map(Sexpr::Number)
                .map_err(|_| ReadError::InvalidNumber {
                    literal: text.to_string(),
                    offset: start,
                });
        }
        Ok(Sexpr::Symbol(text.to_string()))
    }
}

fn looks_numeric(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) if c.is_ascii_digit() => true,
        Some('-' | '+' | '.') => chars.next().is_some_and(|c| c.is_ascii_digit() || c == '.'),
        _ => false,
    }
}
