//! Type annotation resolution.
//!
//! Turns annotation text into a [`Ty`] using the registry. Function types
//! are built on demand and cached under both their canonical name and the
//! text they were written as, so each distinct annotation is parsed once.

use crate::check::Context;
use crate::error::{Result, TypeError};
use crate::types::{AnnotationError, TypeExpr, Ty, parse_type_list};
use tyl_syntax::Sexpr;

/// Resolves an annotation such as `number`, `Point` or `Fn<number<string>>`.
pub fn resolve_annotation(cx: &mut Context, text: &str, expr: &Sexpr) -> Result<Ty> {
    if let Some(ty) = cx.registered(text) {
        return Ok(ty.clone());
    }

    let parsed = parse_annotation(text, expr)?;
    let ty = resolve_expr(cx, &parsed, expr)?;

    if !parsed.is_named() {
        let key = cx.intern(text);
        cx.types.cache(key, ty.clone());
    }
    Ok(ty)
}

/// Resolves an already parsed annotation.
pub fn resolve_expr(cx: &mut Context, ty: &TypeExpr, expr: &Sexpr) -> Result<Ty> {
    match ty {
        TypeExpr::Named(name) => {
            cx.registered(name)
                .cloned()
                .ok_or_else(|| TypeError::UnknownType {
                    name: name.clone(),
                    expr: expr.clone(),
                })
        }
        TypeExpr::Function { params, ret } => {
            let canonical = ty.to_string();
            if let Some(cached) = cx.registered(&canonical) {
                return Ok(cached.clone());
            }

            let params = params
                .iter()
                .map(|param| resolve_expr(cx, param, expr))
                .collect::<Result<Vec<_>>>()?;
            let ret = resolve_expr(cx, ret, expr)?;

            let key = cx.intern(&canonical);
            Ok(cx.types.cache(key, Ty::function(params, ret)))
        }
    }
}

/// Parses annotation text, mapping failures to
/// [`TypeError::InvalidTypeAnnotation`].
pub fn parse_annotation(text: &str, expr: &Sexpr) -> Result<TypeExpr> {
    TypeExpr::parse(text).map_err(|err| invalid(err, expr))
}

/// Parses a `<T1,T2>` list.
pub fn parse_list(text: &str, expr: &Sexpr) -> Result<Vec<TypeExpr>> {
    match parse_type_list(text) {
        Some(list) => list.map_err(|err| invalid(err, expr)),
        None => Err(TypeError::InvalidTypeAnnotation {
            annotation: text.to_string(),
            reason: "expected a bracketed type list",
            expr: expr.clone(),
        }),
    }
}

fn invalid(err: AnnotationError, expr: &Sexpr) -> TypeError {
    TypeError::InvalidTypeAnnotation {
        annotation: err.annotation,
        reason: err.reason,
        expr: expr.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::options::Options;

    fn cx() -> Context {
        Context::new(Options::default())
    }

    #[test]
    fn test_resolve_primitive() {
        let mut cx = cx();
        let ty = resolve_annotation(&mut cx, "number", &Sexpr::sym("x")).unwrap();
        assert!(ty.equals(&Ty::NUMBER));
    }

    #[test]
    fn test_resolve_function_is_cached() {
        let mut cx = cx();
        let expr = Sexpr::sym("f");
        let before = cx.types.len();

        let a = resolve_annotation(&mut cx, "Fn<number<number, number>>", &expr).unwrap();
        let after = cx.types.len();
        let b = resolve_annotation(&mut cx, "Fn<number<number,number>>", &expr).unwrap();

        assert_eq!(a.name(), "Fn<number<number,number>>");
        assert!(a.equals(&b));
        // canonical name plus the spaced spelling
        assert_eq!(after, before + 2);
        assert_eq!(cx.types.len(), after);
    }

    #[test]
    fn test_nested_function_registers_inner() {
        let mut cx = cx();
        let ty = resolve_annotation(&mut cx, "Fn<string<Fn<number>>>", &Sexpr::sym("f")).unwrap();
        assert_eq!(ty.name(), "Fn<string<Fn<number>>>");
        assert!(cx.registered("Fn<number>").is_some());
    }

    #[test]
    fn test_unknown_and_invalid() {
        let mut cx = cx();
        let expr = Sexpr::sym("x");

        let unknown = resolve_annotation(&mut cx, "Widget", &expr).unwrap_err();
        assert_eq!(unknown.kind(), ErrorKind::UnknownType);

        let nested = resolve_annotation(&mut cx, "Fn<number<Widget>>", &expr).unwrap_err();
        assert_eq!(nested.kind(), ErrorKind::UnknownType);

        let invalid = resolve_annotation(&mut cx, "Fn<number", &expr).unwrap_err();
        assert_eq!(invalid.kind(), ErrorKind::InvalidTypeAnnotation);
    }

    #[test]
    fn test_parse_list() {
        let expr = Sexpr::sym("id");
        assert_eq!(parse_list("<number,string>", &expr).unwrap().len(), 2);
        assert_eq!(
            parse_list("number", &expr).unwrap_err().kind(),
            ErrorKind::InvalidTypeAnnotation
        );
    }
}
