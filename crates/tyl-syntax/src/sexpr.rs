//! The expression tree.
//!
//! A program is a sequence of [`Sexpr`] values. String literals are their own
//! variant, so a symbol can never be mistaken for a string and vice versa.

use std::fmt;

/// An atom or a list.
#[derive(Debug, Clone, PartialEq)]
pub enum Sexpr {
    /// Numeric literal
    Number(f64),
    /// String literal, without its quotes
    Str(String),
    /// `true` or `false`
    Bool(bool),
    /// Any other atom: names, operators, type annotations
    Symbol(String),
    /// `( ... )`
    List(Vec<Sexpr>),
}

impl Sexpr {
    /// Builds a symbol atom.
    pub fn sym(name: impl Into<String>) -> Self {
        Sexpr::Symbol(name.into())
    }

    /// Builds a string literal.
    pub fn string(text: impl Into<String>) -> Self {
        Sexpr::Str(text.into())
    }

    /// Builds a list.
    pub fn list(items: impl IntoIterator<Item = Sexpr>) -> Self {
        Sexpr::List(items.into_iter().collect())
    }

    /// The symbol text, if this is a symbol.
    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            Sexpr::Symbol(name) => Some(name),
            _ => None,
        }
    }

    /// The elements, if this is a list.
    pub fn as_list(&self) -> Option<&[Sexpr]> {
        match self {
            Sexpr::List(items) => Some(items),
            _ => None,
        }
    }

    /// The head symbol of a list, e.g. `var` for `(var x 1)`.
    pub fn tag(&self) -> Option<&str> {
        self.as_list()?.first()?.as_symbol()
    }

    /// Returns true for everything except lists.
    pub fn is_atom(&self) -> bool {
        !matches!(self, Sexpr::List(_))
    }
}

impl fmt::Display for Sexpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sexpr::Number(n) => write!(f, "{n}"),
            Sexpr::Str(s) => {
                write!(f, "\"")?;
                for ch in s.chars() {
                    match ch {
                        '"' => write!(f, "\\\"")?,
                        '\\' => write!(f, "\\\\")?,
                        _ => write!(f, "{ch}")?,
                    }
                }
                write!(f, "\"")
            }
            Sexpr::Bool(b) => write!(f, "{b}"),
            Sexpr::Symbol(name) => write!(f, "{name}"),
            Sexpr::List(items) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, ")")
            }
        }
    }
}

impl From<f64> for Sexpr {
    fn from(n: f64) -> Self {
        Sexpr::Number(n)
    }
}

impl From<bool> for Sexpr {
    fn from(b: bool) -> Self {
        Sexpr::Bool(b)
    }
}
