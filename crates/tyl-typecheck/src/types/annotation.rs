//! The type annotation sublanguage.
//!
//! ```text
//! type      := "Fn" "<" type ( "<" type ( "," type )* ">" )? ">"
//!            | name
//! type-list := "<" type ( "," type )* ">"
//! ```
//!
//! A name is any run of characters other than `<`, `>`, `,` and whitespace.
//! Annotations are parsed into [`TypeExpr`] and left unresolved; the checker
//! resolves names against its registry. Generic templates keep their
//! annotations in this form so type parameters can be substituted before
//! resolution.

use hashbrown::HashMap;
use std::fmt;

/// A parsed, unresolved annotation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeExpr {
    /// A bare type name: `number`, `Point`, `T`
    Named(String),
    /// `Fn<R>` or `Fn<R<P1,P2,...>>`
    Function {
        /// Parameter annotations, in order
        params: Vec<TypeExpr>,
        /// Return annotation
        ret: Box<TypeExpr>,
    },
}

/// A malformed annotation string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationError {
    /// The full annotation text
    pub annotation: String,
    /// What was wrong with it
    pub reason: &'static str,
}

impl fmt::Display for AnnotationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid type annotation '{}': {}", self.annotation, self.reason)
    }
}

impl std::error::Error for AnnotationError {}

impl TypeExpr {
    /// Parses a complete annotation.
    ///
    /// ```
    /// use tyl_typecheck::types::TypeExpr;
    ///
    /// let ty = TypeExpr::parse("Fn<number<number, string>>").unwrap();
    /// assert_eq!(ty.to_string(), "Fn<number<number,string>>");
    /// assert!(TypeExpr::parse("Fn<number").is_err());
    /// ```
    pub fn parse(text: &str) -> Result<Self, AnnotationError> {
        let mut parser = Parser::new(text);
        let ty = parser.parse_type()?;
        parser.skip_ws();
        if !parser.at_end() {
            return Err(parser.error("unexpected trailing characters"));
        }
        Ok(ty)
    }

    /// Returns true for a bare name.
    pub fn is_named(&self) -> bool {
        matches!(self, TypeExpr::Named(_))
    }

    /// Replaces every name found in `map`; other names pass through.
    pub fn substitute(&self, map: &HashMap<&str, &TypeExpr>) -> TypeExpr {
        match self {
            TypeExpr::Named(name) => match map.get(name.as_str()) {
                Some(actual) => (*actual).clone(),
                None => self.clone(),
            },
            TypeExpr::Function { params, ret } => TypeExpr::Function {
                params: params.iter().map(|p| p.substitute(map)).collect(),
                ret: Box::new(ret.substitute(map)),
            },
        }
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeExpr::Named(name) => f.write_str(name),
            TypeExpr::Function { params, ret } => {
                write!(f, "Fn<{ret}")?;
                if !params.is_empty() {
                    write!(f, "<")?;
                    for (i, param) in params.iter().enumerate() {
                        if i > 0 {
                            write!(f, ",")?;
                        }
                        write!(f, "{param}")?;
                    }
                    write!(f, ">")?;
                }
                write!(f, ">")
            }
        }
    }
}

/// Parses a bracketed list such as `<K,V>` or `<number,Fn<string>>`.
///
/// Returns `None` if `text` is not bracketed at all, so callers can tell "not
/// a type list" apart from "a broken type list".
///
/// ```
/// use tyl_typecheck::types::{parse_type_list, TypeExpr};
///
/// let list = parse_type_list("<K,V>").unwrap().unwrap();
/// assert_eq!(list, vec![TypeExpr::Named("K".into()), TypeExpr::Named("V".into())]);
/// assert!(parse_type_list("number").is_none());
/// ```
pub fn parse_type_list(text: &str) -> Option<Result<Vec<TypeExpr>, AnnotationError>> {
    if !is_type_list(text) {
        return None;
    }

    let mut parser = Parser::new(text);
    Some(parser.parse_list())
}

/// True if `text` has the shape of a `<...>` list with something inside.
pub fn is_type_list(text: &str) -> bool {
    text.len() > 2 && text.starts_with('<') && text.ends_with('>')
}

struct Parser<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    fn error(&self, reason: &'static str) -> AnnotationError {
        AnnotationError {
            annotation: self.text.to_string(),
            reason,
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.text.len()
    }

    fn peek(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    fn skip_ws(&mut self) {
        while let Some(ch) = self.peek() {
            if !ch.is_whitespace() {
                break;
            }
            self.pos += ch.len_utf8();
        }
    }

    fn eat(&mut self, expected: char) -> bool {
        self.skip_ws();
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: char, reason: &'static str) -> Result<(), AnnotationError> {
        if self.eat(expected) {
            Ok(())
        } else {
            Err(self.error(reason))
        }
    }

    fn name(&mut self) -> &'a str {
        self.skip_ws();
        let start = self.pos;
        while let Some(ch) = self.peek() {
            if ch.is_whitespace() || matches!(ch, '<' | '>' | ',') {
                break;
            }
            self.pos += ch.len_utf8();
        }
        &self.text[start..self.pos]
    }

    fn parse_type(&mut self) -> Result<TypeExpr, AnnotationError> {
        let name = self.name();
        if name.is_empty() {
            return Err(self.error("expected a type name"));
        }

        if name != "Fn" {
            return Ok(TypeExpr::Named(name.to_string()));
        }

        self.expect('<', "expected '<' after Fn")?;
        let ret = self.parse_type()?;
        let params = if self.eat('<') {
            let mut params = vec![self.parse_type()?];
            while self.eat(',') {
                params.push(self.parse_type()?);
            }
            self.expect('>', "unclosed parameter list")?;
            params
        } else {
            Vec::new()
        };
        self.expect('>', "unclosed Fn<...>")?;

        Ok(TypeExpr::Function {
            params,
            ret: Box::new(ret),
        })
    }

    fn parse_list(&mut self) -> Result<Vec<TypeExpr>, AnnotationError> {
        self.expect('<', "expected '<'")?;
        let mut items = vec![self.parse_type()?];
        while self.eat(',') {
            items.push(self.parse_type()?);
        }
        self.expect('>', "unclosed type list")?;
        self.skip_ws();
        if !self.at_end() {
            return Err(self.error("unexpected trailing characters"));
        }
        Ok(items)
    }
}
