//! Expression type checking.
//!
//! [`tc`] classifies an expression and applies the matching rule. Literals,
//! names, operators, variables, blocks and control flow live here; the
//! declaration forms are in [`decl`](super::decl) and calls in
//! [`call`](super::call).

use crate::check::form::{BinOp, Form, Target, classify};
use crate::check::ty::resolve_annotation;
use crate::check::{Context, call, decl};
use crate::context::ScopeId;
use crate::error::{Result, TypeError};
use crate::types::Ty;
use tyl_log::trace;
use tyl_syntax::Sexpr;

/// Type check `expr` in `scope` and return its type.
pub fn tc(cx: &mut Context, expr: &Sexpr, scope: ScopeId) -> Result<Ty> {
    let form = classify(expr)?;
    trace!("tc {} in {}", expr, scope);

    match form {
        // Literals
        Form::Number => Ok(Ty::NUMBER),
        Form::Str => Ok(Ty::STRING),
        Form::Bool => Ok(Ty::BOOLEAN),
        Form::Name(name) => cx.lookup(scope, name, expr),

        // Operators
        Form::Binary { op, args } => check_binary(cx, op, args, expr, scope),

        // Bindings
        Form::Var {
            name,
            annotation,
            value,
        } => check_var(cx, name, annotation, value, expr, scope),
        Form::Set { target, value } => check_set(cx, target, value, expr, scope),

        // Control flow
        Form::Begin(body) => {
            let block = cx.env.child(scope);
            check_block(cx, body, block)
        }
        Form::If { cond, then, els } => check_if(cx, cond, then, els, expr, scope),
        Form::While { cond, body } => {
            check_condition(cx, cond, expr, scope)?;
            tc(cx, body, scope)
        }

        // Functions
        Form::Def {
            name,
            generics,
            parts,
        } => decl::check_def(cx, name, generics, &parts, expr, scope),
        Form::Lambda { generics, parts } => decl::check_lambda(cx, generics, &parts, expr, scope),

        // Types and classes
        Form::TypeDecl { name, base } => decl::check_type_decl(cx, name, &base, expr),
        Form::Class {
            name,
            superclass,
            body,
        } => decl::check_class(cx, name, superclass, body, expr, scope),
        Form::New { class, args } => decl::check_new(cx, class, args, expr, scope),
        Form::Super { class } => decl::check_super(cx, class, expr),
        Form::Prop { instance, field } => decl::field_type(cx, instance, field, expr, scope),

        // Calls
        Form::Call {
            callee,
            type_args,
            args,
        } => call::check_call(cx, callee, type_args, args, expr, scope),
    }
}

/// Checks each expression of a block in `scope`, returning the last type.
/// An empty block has type `null`.
pub fn check_block(cx: &mut Context, body: &[Sexpr], scope: ScopeId) -> Result<Ty> {
    let mut last = Ty::NULL;
    for expr in body {
        last = tc(cx, expr, scope)?;
    }
    Ok(last)
}

/// Checks a function or class body. A `begin` body runs directly in
/// `scope` instead of opening another one.
pub fn check_body(cx: &mut Context, body: &Sexpr, scope: ScopeId) -> Result<Ty> {
    match body.as_list() {
        Some([head, rest @ ..]) if head.as_symbol() == Some("begin") => check_block(cx, rest, scope),
        _ => tc(cx, body, scope),
    }
}

/// Fails with [`TypeError::TypeMismatch`] unless `actual` equals `expected`.
pub fn expect(actual: &Ty, expected: &Ty, expr: &Sexpr, context: &Sexpr) -> Result<()> {
    if actual.equals(expected) {
        Ok(())
    } else {
        Err(TypeError::mismatch(
            expected.name(),
            actual.name(),
            expr,
            context,
        ))
    }
}

fn check_condition(cx: &mut Context, cond: &Sexpr, expr: &Sexpr, scope: ScopeId) -> Result<()> {
    let cond_ty = tc(cx, cond, scope)?;
    expect(&cond_ty, &Ty::BOOLEAN, cond, expr)
}

fn check_binary(
    cx: &mut Context,
    op: BinOp,
    args: &[Sexpr],
    expr: &Sexpr,
    scope: ScopeId,
) -> Result<Ty> {
    let [left, right] = args else {
        return Err(TypeError::ArityMismatch {
            callee: op.as_str().to_string(),
            expected: 2,
            found: args.len(),
            expr: expr.clone(),
        });
    };

    // Both sides first, left to right
    let left_ty = tc(cx, left, scope)?;
    let right_ty = tc(cx, right, scope)?;

    if !op.is_comparison() && cx.options.strict_operands {
        let allowed = allowed_operands(op);
        if !operand_allowed(&left_ty, &allowed) {
            let names: Vec<&str> = allowed.iter().map(Ty::name).collect();
            return Err(TypeError::mismatch(
                names.join(" | "),
                left_ty.name(),
                left,
                expr,
            ));
        }
    }

    // Right must match left
    expect(&right_ty, &left_ty, right, expr)?;

    if op.is_comparison() {
        Ok(Ty::BOOLEAN)
    } else {
        Ok(left_ty)
    }
}

fn allowed_operands(op: BinOp) -> Vec<Ty> {
    match op {
        BinOp::Add => vec![Ty::NUMBER, Ty::STRING],
        _ => vec![Ty::NUMBER],
    }
}

/// A union operand is allowed only if every option is.
fn operand_allowed(ty: &Ty, allowed: &[Ty]) -> bool {
    match ty {
        Ty::Alias(alias) => operand_allowed(&alias.parent, allowed),
        Ty::Union(union) => union
            .options
            .iter()
            .all(|option| operand_allowed(option, allowed)),
        _ => allowed.iter().any(|candidate| ty.equals(candidate)),
    }
}

fn check_var(
    cx: &mut Context,
    name: &str,
    annotation: Option<&str>,
    value: &Sexpr,
    expr: &Sexpr,
    scope: ScopeId,
) -> Result<Ty> {
    let value_ty = tc(cx, value, scope)?;

    let ty = match annotation {
        Some(text) => {
            let declared = resolve_annotation(cx, text, expr)?;
            expect(&value_ty, &declared, value, expr)?;
            declared
        }
        None => value_ty,
    };

    Ok(cx.define(scope, name, ty))
}

fn check_set(
    cx: &mut Context,
    target: Target<'_>,
    value: &Sexpr,
    expr: &Sexpr,
    scope: ScopeId,
) -> Result<Ty> {
    let declared = match target {
        Target::Name(name) => cx.lookup(scope, name, expr)?,
        Target::Field { instance, field } => decl::field_type(cx, instance, field, expr, scope)?,
    };

    let value_ty = tc(cx, value, scope)?;
    expect(&value_ty, &declared, value, expr)?;
    Ok(declared)
}

fn check_if(
    cx: &mut Context,
    cond: &Sexpr,
    then: &Sexpr,
    els: &Sexpr,
    expr: &Sexpr,
    scope: ScopeId,
) -> Result<Ty> {
    check_condition(cx, cond, expr, scope)?;

    let then_scope = match narrowing(cond) {
        Some((name, type_name)) => {
            let narrowed = resolve_annotation(cx, type_name, cond)?;
            let branch = cx.env.child(scope);
            trace!("narrowing {} to {}", name, narrowed);
            cx.define(branch, name, narrowed);
            branch
        }
        None => scope,
    };

    let then_ty = tc(cx, then, then_scope)?;
    let else_ty = tc(cx, els, scope)?;
    expect(&else_ty, &then_ty, els, expr)?;
    Ok(then_ty)
}

/// Matches the guard `(== (typeof name) "Type")`.
fn narrowing(cond: &Sexpr) -> Option<(&str, &str)> {
    match cond.as_list()? {
        [op, guard, Sexpr::Str(type_name)] if op.as_symbol() == Some("==") => {
            match guard.as_list()? {
                [tag, Sexpr::Symbol(name)] if tag.as_symbol() == Some("typeof") => {
                    Some((name.as_str(), type_name.as_str()))
                }
                _ => None,
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::options::Options;
    use tyl_syntax::read_one;

    fn check(src: &str) -> Result<Ty> {
        check_with(Options::default(), src)
    }

    fn check_with(options: Options, src: &str) -> Result<Ty> {
        let mut cx = Context::new(options);
        let expr = read_one(src).unwrap();
        let global = cx.env.global();
        tc(&mut cx, &expr, global)
    }

    #[test]
    fn test_literals() {
        assert_eq!(check("42").unwrap().name(), "number");
        assert_eq!(check("\"hi\"").unwrap().name(), "string");
        assert_eq!(check("false").unwrap().name(), "boolean");
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(check("(+ 1 2)").unwrap().name(), "number");
        assert_eq!(check("(+ \"a\" \"b\")").unwrap().name(), "string");
        assert_eq!(check("(+ 1 \"a\")").unwrap_err().kind(), ErrorKind::TypeMismatch);
        assert_eq!(check("(* 2 (- 5 1))").unwrap().name(), "number");
    }

    #[test]
    fn test_operand_table() {
        let err = check("(- \"a\" \"b\")").unwrap_err();
        match err {
            TypeError::TypeMismatch { expected, actual, .. } => {
                assert_eq!(expected, "number");
                assert_eq!(actual, "string");
            }
            other => panic!("expected mismatch, got {other:?}"),
        }

        let err = check("(+ true false)").unwrap_err();
        assert!(matches!(
            err,
            TypeError::TypeMismatch { ref expected, .. } if expected == "number | string"
        ));

        let loose = Options::default().strict_operands(false);
        assert_eq!(check_with(loose, "(- \"a\" \"b\")").unwrap().name(), "string");
    }

    #[test]
    fn test_operator_arity() {
        assert_eq!(check("(+ 1)").unwrap_err().kind(), ErrorKind::ArityMismatch);
        assert_eq!(check("(== 1 2 3)").unwrap_err().kind(), ErrorKind::ArityMismatch);
    }

    #[test]
    fn test_comparison() {
        assert_eq!(check("(<= 1 2)").unwrap().name(), "boolean");
        assert_eq!(check("(== \"a\" \"b\")").unwrap().name(), "boolean");
        assert_eq!(check("(> 1 \"b\")").unwrap_err().kind(), ErrorKind::TypeMismatch);
    }

    #[test]
    fn test_var_and_begin() {
        assert_eq!(check("(begin (var x 10) (var y 20) (+ x y))").unwrap().name(), "number");
        assert_eq!(check("(begin (var (s string) \"a\") s)").unwrap().name(), "string");
        assert_eq!(
            check("(var (s string) 1)").unwrap_err().kind(),
            ErrorKind::TypeMismatch
        );
        assert_eq!(check("(begin)").unwrap().name(), "null");
    }

    #[test]
    fn test_block_scope_does_not_leak() {
        let err = check("(begin (begin (var x 1)) x)").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UndefinedName);
    }

    #[test]
    fn test_set() {
        assert_eq!(check("(begin (var x 1) (set x 2))").unwrap().name(), "number");
        assert_eq!(
            check("(begin (var x 1) (set x \"a\"))").unwrap_err().kind(),
            ErrorKind::TypeMismatch
        );
        assert_eq!(check("(set y 2)").unwrap_err().kind(), ErrorKind::UndefinedName);
    }

    #[test]
    fn test_if_and_while() {
        assert_eq!(check("(if (> 1 2) 1 2)").unwrap().name(), "number");
        assert_eq!(check("(if 1 1 2)").unwrap_err().kind(), ErrorKind::TypeMismatch);
        assert_eq!(
            check("(if true 1 \"two\")").unwrap_err().kind(),
            ErrorKind::TypeMismatch
        );
        assert_eq!(
            check("(begin (var i 0) (while (< i 10) (set i (+ i 1))))")
                .unwrap()
                .name(),
            "number"
        );
    }

    #[test]
    fn test_narrowing_guard_shape() {
        let guard = read_one("(== (typeof x) \"string\")").unwrap();
        assert_eq!(narrowing(&guard), Some(("x", "string")));

        let other = read_one("(== (typeof x) y)").unwrap();
        assert_eq!(narrowing(&other), None);
    }

    #[test]
    fn test_undefined_name() {
        let err = check("missing").unwrap_err();
        assert!(matches!(err, TypeError::UndefinedName { ref name, .. } if name == "missing"));
    }
}
