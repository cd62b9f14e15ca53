//! Type checking errors.
//!
//! Checking is fail-fast: the first violation becomes a [`TypeError`] and
//! aborts the whole check. Every error carries the expression it was raised
//! for, rendered back to source form in messages.

use std::fmt;
use tyl_syntax::{ReadError, Sexpr};

/// Result type for type checking.
pub type Result<T> = std::result::Result<T, TypeError>;

/// Type checking errors.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeError {
    /// A name with no binding in any enclosing scope.
    UndefinedName {
        /// The unbound name
        name: String,
        /// Where it was referenced
        expr: Sexpr,
    },

    /// `type` or `class` reusing a registered name.
    DuplicateTypeDeclaration {
        /// The declared name
        name: String,
        /// Canonical name of what is already registered
        existing: String,
        /// The declaration
        expr: Sexpr,
    },

    /// `(type Name Base)` where `Base` is not registered.
    UnknownBaseType {
        /// The missing base name
        name: String,
        /// The declaration
        expr: Sexpr,
    },

    /// An annotation naming an unregistered type.
    UnknownType {
        /// The missing type name
        name: String,
        /// The expression carrying the annotation
        expr: Sexpr,
    },

    /// An annotation string that does not parse.
    InvalidTypeAnnotation {
        /// The annotation text
        annotation: String,
        /// What was wrong with it
        reason: &'static str,
        /// The expression carrying the annotation
        expr: Sexpr,
    },

    /// Wrong number of operands, arguments or type arguments.
    ArityMismatch {
        /// Operator, function or generic name
        callee: String,
        /// Expected count
        expected: usize,
        /// Actual count
        found: usize,
        /// The call
        expr: Sexpr,
    },

    /// Expected and actual types disagree.
    TypeMismatch {
        /// Canonical name of the expected type
        expected: String,
        /// Canonical name of the actual type
        actual: String,
        /// The offending sub-expression
        expr: Sexpr,
        /// The enclosing expression
        context: Sexpr,
    },

    /// An operator-like name with no typing rule.
    UnknownOperator {
        /// The operator
        op: String,
        /// The call
        expr: Sexpr,
    },

    /// A generic function called without `<...>` actual types.
    MissingGenericActualTypes {
        /// Display name of the generic
        callee: String,
        /// The call
        expr: Sexpr,
    },

    /// `new` or `super` on a name that is not a registered class.
    UnknownClass {
        /// The class name
        name: String,
        /// The expression
        expr: Sexpr,
    },

    /// `new` on a class with no `constructor` method.
    MissingConstructor {
        /// The class name
        class: String,
        /// The `new` expression
        expr: Sexpr,
    },

    /// Calling something that is not a function.
    NotCallable {
        /// Canonical name of the callee's type
        ty: String,
        /// The call
        expr: Sexpr,
    },

    /// Field access or `super` on a non-class type.
    NotAClass {
        /// Canonical name of the type
        ty: String,
        /// The expression
        expr: Sexpr,
    },

    /// A field missing from a class and all its superclasses.
    UnknownField {
        /// The class name
        class: String,
        /// The field name
        field: String,
        /// The `prop` expression
        expr: Sexpr,
    },

    /// A special form with the wrong shape.
    MalformedForm {
        /// The form keyword, or `()` for an empty list
        form: String,
        /// What was wrong with it
        reason: &'static str,
        /// The form
        expr: Sexpr,
    },
}

/// The kind of a [`TypeError`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum ErrorKind {
    UndefinedName,
    DuplicateTypeDeclaration,
    UnknownBaseType,
    UnknownType,
    InvalidTypeAnnotation,
    ArityMismatch,
    TypeMismatch,
    UnknownOperator,
    MissingGenericActualTypes,
    UnknownClass,
    MissingConstructor,
    NotCallable,
    NotAClass,
    UnknownField,
    MalformedForm,
}

impl TypeError {
    /// Builds a [`TypeError::TypeMismatch`].
    pub fn mismatch(
        expected: impl Into<String>,
        actual: impl Into<String>,
        expr: &Sexpr,
        context: &Sexpr,
    ) -> Self {
        TypeError::TypeMismatch {
            expected: expected.into(),
            actual: actual.into(),
            expr: expr.clone(),
            context: context.clone(),
        }
    }

    /// Builds a [`TypeError::MalformedForm`].
    pub fn malformed(form: impl Into<String>, reason: &'static str, expr: &Sexpr) -> Self {
        TypeError::MalformedForm {
            form: form.into(),
            reason,
            expr: expr.clone(),
        }
    }

    /// The kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            TypeError::UndefinedName { .. } => ErrorKind::UndefinedName,
            TypeError::DuplicateTypeDeclaration { .. } => ErrorKind::DuplicateTypeDeclaration,
            TypeError::UnknownBaseType { .. } => ErrorKind::UnknownBaseType,
            TypeError::UnknownType { .. } => ErrorKind::UnknownType,
            TypeError::InvalidTypeAnnotation { .. } => ErrorKind::InvalidTypeAnnotation,
            TypeError::ArityMismatch { .. } => ErrorKind::ArityMismatch,
            TypeError::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            TypeError::UnknownOperator { .. } => ErrorKind::UnknownOperator,
            TypeError::MissingGenericActualTypes { .. } => ErrorKind::MissingGenericActualTypes,
            TypeError::UnknownClass { .. } => ErrorKind::UnknownClass,
            TypeError::MissingConstructor { .. } => ErrorKind::MissingConstructor,
            TypeError::NotCallable { .. } => ErrorKind::NotCallable,
            TypeError::NotAClass { .. } => ErrorKind::NotAClass,
            TypeError::UnknownField { .. } => ErrorKind::UnknownField,
            TypeError::MalformedForm { .. } => ErrorKind::MalformedForm,
        }
    }

    /// The expression the error was raised for.
    pub fn expr(&self) -> &Sexpr {
        match self {
            TypeError::UndefinedName { expr, .. }
            | TypeError::DuplicateTypeDeclaration { expr, .. }
            | TypeError::UnknownBaseType { expr, .. }
            | TypeError::UnknownType { expr, .. }
            | TypeError::InvalidTypeAnnotation { expr, .. }
            | TypeError::ArityMismatch { expr, .. }
            | TypeError::TypeMismatch { expr, .. }
            | TypeError::UnknownOperator { expr, .. }
            | TypeError::MissingGenericActualTypes { expr, .. }
            | TypeError::UnknownClass { expr, .. }
            | TypeError::MissingConstructor { expr, .. }
            | TypeError::NotCallable { expr, .. }
            | TypeError::NotAClass { expr, .. }
            | TypeError::UnknownField { expr, .. }
            | TypeError::MalformedForm { expr, .. } => expr,
        }
    }

    /// Short, human-readable label for the error kind.
    pub fn description(&self) -> &'static str {
        match self.kind() {
            ErrorKind::UndefinedName => "undefined name",
            ErrorKind::DuplicateTypeDeclaration => "duplicate type declaration",
            ErrorKind::UnknownBaseType => "unknown base type",
            ErrorKind::UnknownType => "unknown type",
            ErrorKind::InvalidTypeAnnotation => "invalid type annotation",
            ErrorKind::ArityMismatch => "arity mismatch",
            ErrorKind::TypeMismatch => "type mismatch",
            ErrorKind::UnknownOperator => "unknown operator",
            ErrorKind::MissingGenericActualTypes => "missing generic actual types",
            ErrorKind::UnknownClass => "unknown class",
            ErrorKind::MissingConstructor => "missing constructor",
            ErrorKind::NotCallable => "not callable",
            ErrorKind::NotAClass => "not a class",
            ErrorKind::UnknownField => "unknown field",
            ErrorKind::MalformedForm => "malformed form",
        }
    }
}

impl fmt::Display for TypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeError::UndefinedName { name, .. } => {
                write!(f, "variable \"{name}\" is not defined")
            }
            TypeError::DuplicateTypeDeclaration { name, existing, .. } => {
                write!(f, "type \"{name}\" is already defined as \"{existing}\"")
            }
            TypeError::UnknownBaseType { name, expr } => {
                write!(f, "base type \"{name}\" is not defined in {expr}")
            }
            TypeError::UnknownType { name, expr } => {
                write!(f, "type \"{name}\" is not defined in {expr}")
            }
            TypeError::InvalidTypeAnnotation {
                annotation, reason, ..
            } => {
                write!(f, "invalid type annotation \"{annotation}\": {reason}")
            }
            TypeError::ArityMismatch {
                callee,
                expected,
                found,
                expr,
            } => {
                write!(
                    f,
                    "\"{callee}\" expects {expected} argument(s), {found} given in {expr}"
                )
            }
            TypeError::TypeMismatch {
                expected,
                actual,
                expr,
                context,
            } => {
                write!(
                    f,
                    "expected \"{expected}\" type for {expr} in {context}, but got \"{actual}\""
                )
            }
            TypeError::UnknownOperator { op, .. } => {
                write!(f, "unknown operator \"{op}\"")
            }
            TypeError::MissingGenericActualTypes { callee, expr } => {
                write!(f, "generic function \"{callee}\" called without actual types in {expr}")
            }
            TypeError::UnknownClass { name, .. } => {
                write!(f, "class \"{name}\" is not defined")
            }
            TypeError::MissingConstructor { class, .. } => {
                write!(f, "class \"{class}\" has no constructor")
            }
            TypeError::NotCallable { ty, expr } => {
                write!(f, "value of type \"{ty}\" is not callable in {expr}")
            }
            TypeError::NotAClass { ty, expr } => {
                write!(f, "type \"{ty}\" is not a class in {expr}")
            }
            TypeError::UnknownField { class, field, .. } => {
                write!(f, "class \"{class}\" has no field \"{field}\"")
            }
            TypeError::MalformedForm { form, reason, expr } => {
                write!(f, "malformed {form}: {reason} in {expr}")
            }
        }
    }
}

impl std::error::Error for TypeError {}

/// Errors from [`Checker::check_source`](crate::Checker::check_source):
/// either the text did not read, or the program did not check.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// The source text is not a well-formed expression sequence
    Read(ReadError),
    /// The program is ill-typed
    Type(TypeError),
}

impl Error {
    /// The type error, if this is one.
    pub fn as_type_error(&self) -> Option<&TypeError> {
        match self {
            Error::Type(err) => Some(err),
            Error::Read(_) => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Read(err) => write!(f, "read error: {err}"),
            Error::Type(err) => write!(f, "type error: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Read(err) => Some(err),
            Error::Type(err) => Some(err),
        }
    }
}

impl From<ReadError> for Error {
    fn from(err: ReadError) -> Self {
        Error::Read(err)
    }
}

impl From<TypeError> for Error {
    fn from(err: TypeError) -> Self {
        Error::Type(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mismatch_message() {
        let expr = Sexpr::string("a");
        let context = Sexpr::list(vec![Sexpr::sym("+"), Sexpr::from(1.0), Sexpr::string("a")]);
        let err = TypeError::mismatch("number", "string", &expr, &context);

        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
        assert_eq!(err.description(), "type mismatch");
        assert_eq!(
            err.to_string(),
            "expected \"number\" type for \"a\" in (+ 1 \"a\"), but got \"string\""
        );
    }

    #[test]
    fn test_expr_accessor() {
        let expr = Sexpr::sym("x");
        let err = TypeError::UndefinedName {
            name: "x".to_string(),
            expr: expr.clone(),
        };
        assert_eq!(err.expr(), &expr);
        assert_eq!(err.to_string(), "variable \"x\" is not defined");
    }

    #[test]
    fn test_error_wraps_type_error() {
        let err: Error = TypeError::malformed("var", "expected a value", &Sexpr::sym("var")).into();
        assert!(err.as_type_error().is_some());
        assert!(err.to_string().starts_with("type error: malformed var"));
    }
}
