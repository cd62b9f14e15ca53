//! Function calls and generic instantiation.

use crate::check::Context;
use crate::check::decl::check_function_body;
use crate::check::expr::tc;
use crate::check::form::{Callee, is_operator_like};
use crate::check::ty::{parse_list, resolve_expr};
use crate::context::ScopeId;
use crate::error::{Result, TypeError};
use crate::types::{FnTy, GenericFn, Ty, TypeExpr};
use hashbrown::HashMap;
use std::rc::Rc;
use tyl_log::debug;
use tyl_syntax::Sexpr;

/// `(callee <T,...>? args...)`
pub fn check_call(
    cx: &mut Context,
    callee: Callee<'_>,
    type_args: Option<&str>,
    args: &[Sexpr],
    expr: &Sexpr,
    scope: ScopeId,
) -> Result<Ty> {
    let (callee_ty, callee_name) = match callee {
        Callee::Expr(head) => {
            if let Some(name) = head.as_symbol() {
                if is_operator_like(name) && cx.try_lookup(scope, name).is_none() {
                    return Err(TypeError::UnknownOperator {
                        op: name.to_string(),
                        expr: expr.clone(),
                    });
                }
            }
            (tc(cx, head, scope)?, head.to_string())
        }
        Callee::Name(name) => (cx.lookup(scope, name, expr)?, name.to_string()),
    };

    let sig = match (&callee_ty, type_args) {
        (Ty::Generic(generic), Some(list)) => instantiate(cx, generic, list, expr)?,
        (Ty::Generic(generic), None) => {
            return Err(TypeError::MissingGenericActualTypes {
                callee: generic.display_name().to_string(),
                expr: expr.clone(),
            });
        }
        (_, Some(_)) => {
            return Err(TypeError::malformed(
                callee_name,
                "type arguments given to a non-generic function",
                expr,
            ));
        }
        (ty, None) => match ty.as_function() {
            Some(sig) => Rc::clone(sig),
            None => {
                return Err(TypeError::NotCallable {
                    ty: ty.name().to_string(),
                    expr: expr.clone(),
                });
            }
        },
    };

    let mut checked = Vec::with_capacity(args.len());
    for arg in args {
        checked.push((arg, tc(cx, arg, scope)?));
    }

    check_arguments(&sig, &callee_name, &checked, expr)?;
    Ok(sig.ret().clone())
}

/// Checks argument count and types against a signature. A parameter
/// declared `any` accepts every argument.
pub fn check_arguments(
    sig: &FnTy,
    callee: &str,
    args: &[(&Sexpr, Ty)],
    expr: &Sexpr,
) -> Result<()> {
    if sig.arity() != args.len() {
        return Err(TypeError::ArityMismatch {
            callee: callee.to_string(),
            expected: sig.arity(),
            found: args.len(),
            expr: expr.clone(),
        });
    }

    for (param, (arg, arg_ty)) in sig.params().iter().zip(args) {
        if param.is_any() {
            continue;
        }
        if !arg_ty.equals(param) {
            return Err(TypeError::mismatch(param.name(), arg_ty.name(), arg, expr));
        }
    }
    Ok(())
}

/// Resolves a generic template against the actual types in `list`.
///
/// The signature is cached per (template, actual types) before the body is
/// checked, so a recursive call with the same actual types inside the body
/// resolves to it without checking the body again.
pub fn instantiate(
    cx: &mut Context,
    generic: &Rc<GenericFn>,
    list: &str,
    expr: &Sexpr,
) -> Result<Rc<FnTy>> {
    let actual = parse_list(list, expr)?;
    if actual.len() != generic.type_params.len() {
        return Err(TypeError::ArityMismatch {
            callee: generic.display_name().to_string(),
            expected: generic.type_params.len(),
            found: actual.len(),
            expr: expr.clone(),
        });
    }

    let actual_tys = actual
        .iter()
        .map(|ty| resolve_expr(cx, ty, expr))
        .collect::<Result<Vec<_>>>()?;
    let key = (
        generic.id,
        actual_tys.iter().map(|ty| ty.name().to_string()).collect::<Vec<_>>(),
    );

    if let Some(sig) = cx.instance(&key) {
        return Ok(sig);
    }

    let map: HashMap<&str, &TypeExpr> = generic
        .type_params
        .iter()
        .map(String::as_str)
        .zip(actual.iter())
        .collect();

    let params = generic
        .params
        .iter()
        .map(|(_, annotation)| resolve_expr(cx, &annotation.substitute(&map), expr))
        .collect::<Result<Vec<_>>>()?;
    let ret = resolve_expr(cx, &generic.ret.substitute(&map), expr)?;

    let sig = Rc::new(FnTy::new(params, ret));
    debug!("instantiated {} as {}", generic.display_name(), sig.name());
    cx.record_instance(key.clone(), Rc::clone(&sig));

    let names: HashMap<&str, &str> = generic
        .type_params
        .iter()
        .map(String::as_str)
        .zip(key.1.iter().map(String::as_str))
        .collect();
    let body = substitute_body(&generic.body, &names);

    let bindings = generic
        .params
        .iter()
        .map(|(name, _)| *name)
        .zip(sig.params().iter().cloned())
        .collect();
    let checked = check_function_body(cx, bindings, &body, sig.ret(), expr, generic.closure);
    if let Err(err) = checked {
        cx.forget_instance(&key);
        return Err(err);
    }

    Ok(sig)
}

/// Rewrites type parameter names inside a template body: bare symbols equal
/// to a parameter, and parameter names inside annotations such as
/// `Fn<T<T>>`, `<T>` or `id<T>`.
pub fn substitute_body(body: &Sexpr, names: &HashMap<&str, &str>) -> Sexpr {
    match body {
        Sexpr::Symbol(sym) => match substitute_symbol(sym, names) {
            Some(rewritten) => Sexpr::Symbol(rewritten),
            None => body.clone(),
        },
        Sexpr::List(items) => Sexpr::List(
            items
                .iter()
                .map(|item| substitute_body(item, names))
                .collect(),
        ),
        _ => body.clone(),
    }
}

fn substitute_symbol(sym: &str, names: &HashMap<&str, &str>) -> Option<String> {
    if let Some(actual) = names.get(sym) {
        return Some((*actual).to_string());
    }
    if !sym.contains('<') {
        return None;
    }

    let mut out = String::with_capacity(sym.len());
    let mut token = String::new();
    let mut changed = false;

    let mut flush = |out: &mut String, token: &mut String| {
        match names.get(token.as_str()) {
            Some(actual) => {
                out.push_str(actual);
                changed = true;
            }
            None => out.push_str(token),
        }
        token.clear();
    };

    for ch in sym.chars() {
        if matches!(ch, '<' | '>' | ',') {
            flush(&mut out, &mut token);
            out.push(ch);
        } else {
            token.push(ch);
        }
    }
    flush(&mut out, &mut token);

    changed.then_some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::expr::check_block;
    use crate::error::ErrorKind;
    use crate::options::Options;
    use tyl_syntax::{read, read_one};

    fn check_in(cx: &mut Context, src: &str) -> Result<Ty> {
        let program = read(src).unwrap();
        let global = cx.env.global();
        check_block(cx, &program, global)
    }

    fn check(src: &str) -> Result<Ty> {
        check_in(&mut Context::new(Options::default()), src)
    }

    #[test]
    fn test_prelude_calls() {
        assert_eq!(check("(sum 1 2)").unwrap().name(), "number");
        assert_eq!(check("(square 3)").unwrap().name(), "number");
        assert_eq!(check("(typeof true)").unwrap().name(), "string");
    }

    #[test]
    fn test_call_errors() {
        assert_eq!(check("(sum 1)").unwrap_err().kind(), ErrorKind::ArityMismatch);
        assert_eq!(check("(square \"a\")").unwrap_err().kind(), ErrorKind::TypeMismatch);
        assert_eq!(check("(VERSION 1)").unwrap_err().kind(), ErrorKind::NotCallable);
        assert_eq!(check("(% 1 2)").unwrap_err().kind(), ErrorKind::UnknownOperator);
        assert_eq!(check("(nope 1)").unwrap_err().kind(), ErrorKind::UndefinedName);
        assert_eq!(
            check("(square <number> 1)").unwrap_err().kind(),
            ErrorKind::MalformedForm
        );
    }

    #[test]
    fn test_generic_instantiation() {
        let mut cx = Context::new(Options::default());
        check_in(&mut cx, "(def id <T> ((x T)) -> T x)").unwrap();

        assert_eq!(check_in(&mut cx, "(id <number> 5)").unwrap().name(), "number");
        assert_eq!(check_in(&mut cx, "(id<string> \"a\")").unwrap().name(), "string");
        assert_eq!(check_in(&mut cx, "(id <number> 7)").unwrap().name(), "number");
        assert_eq!(cx.instance_count(), 2);
    }

    #[test]
    fn test_generic_errors() {
        let mut cx = Context::new(Options::default());
        check_in(&mut cx, "(def id <T> ((x T)) -> T x)").unwrap();

        assert_eq!(
            check_in(&mut cx, "(id 5)").unwrap_err().kind(),
            ErrorKind::MissingGenericActualTypes
        );
        assert_eq!(
            check_in(&mut cx, "(id <number,string> 5)").unwrap_err().kind(),
            ErrorKind::ArityMismatch
        );
        assert_eq!(
            check_in(&mut cx, "(id <number> \"a\")").unwrap_err().kind(),
            ErrorKind::TypeMismatch
        );
        assert_eq!(
            check_in(&mut cx, "(id <Widget> 1)").unwrap_err().kind(),
            ErrorKind::UnknownType
        );
    }

    #[test]
    fn test_generic_body_is_checked_per_instance() {
        let mut cx = Context::new(Options::default());
        check_in(&mut cx, "(def double <T> ((x T)) -> T (+ x x))").unwrap();

        assert_eq!(check_in(&mut cx, "(double <number> 2)").unwrap().name(), "number");
        assert_eq!(check_in(&mut cx, "(double <string> \"a\")").unwrap().name(), "string");
        assert_eq!(
            check_in(&mut cx, "(double <boolean> true)").unwrap_err().kind(),
            ErrorKind::TypeMismatch
        );
    }

    #[test]
    fn test_generic_function_parameters() {
        let mut cx = Context::new(Options::default());
        let src = "(def apply <T> ((f Fn<T<T>>) (x T)) -> T (f x))";
        check_in(&mut cx, src).unwrap();

        assert_eq!(check_in(&mut cx, "(apply <number> square 4)").unwrap().name(), "number");
        assert_eq!(
            check_in(&mut cx, "(apply <string> square \"a\")").unwrap_err().kind(),
            ErrorKind::TypeMismatch
        );
    }

    #[test]
    fn test_generic_body_annotations_are_substituted() {
        let mut cx = Context::new(Options::default());
        check_in(&mut cx, "(def keep <T> ((x T)) -> T (begin (var (y T) x) y))").unwrap();
        assert_eq!(check_in(&mut cx, "(keep <boolean> true)").unwrap().name(), "boolean");
    }

    #[test]
    fn test_recursive_generic() {
        let mut cx = Context::new(Options::default());
        let src = "(def count <T> ((n number) (x T)) -> number (if (== n 0) 0 (+ 1 (count <T> (- n 1) x))))";
        check_in(&mut cx, src).unwrap();
        assert_eq!(check_in(&mut cx, "(count <string> 3 \"a\")").unwrap().name(), "number");
    }

    #[test]
    fn test_generic_lambda_call() {
        let ty = check("((lambda <T> ((x T)) -> T x) <number> 1)").unwrap();
        assert_eq!(ty.name(), "number");
    }

    #[test]
    fn test_substitute_body() {
        let mut names = HashMap::new();
        names.insert("T", "number");

        let body = read_one("(begin (var (y Fn<T<T,string>>) f) (id<T> y) T Tx)").unwrap();
        let rewritten = substitute_body(&body, &names);
        assert_eq!(
            rewritten.to_string(),
            "(begin (var (y Fn<number<number,string>>) f) (id<number> y) number Tx)"
        );
    }
}
