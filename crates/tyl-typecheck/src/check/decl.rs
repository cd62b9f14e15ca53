//! Declaration checking: functions, type aliases, unions and classes.

use crate::check::expr::{check_body, expect, tc};
use crate::check::form::{FnParts, TypeBase};
use crate::check::ty::{parse_annotation, parse_list, resolve_annotation};
use crate::check::Context;
use crate::check::call::check_arguments;
use crate::context::ScopeId;
use crate::error::{Result, TypeError};
use crate::types::{ClassTy, GenericFn, Ty, TypeExpr};
use std::rc::Rc;
use tyl_log::debug;
use tyl_mem::Symbol;
use tyl_syntax::Sexpr;

/// The member every instantiable class must expose.
pub const CONSTRUCTOR: &str = "constructor";

/// Name of a class's superclass that marks a root class.
pub const ROOT_SUPERCLASS: &str = "null";

/// `(def name <T,...>? params -> ret body)`
///
/// A plain `def` binds its signature before the body is checked, so the body
/// can call the function recursively. A generic `def` binds a template.
pub fn check_def(
    cx: &mut Context,
    name: &str,
    generics: Option<&str>,
    parts: &FnParts<'_>,
    expr: &Sexpr,
    scope: ScopeId,
) -> Result<Ty> {
    if let Some(list) = generics {
        let template = generic_template(cx, name, list, parts, expr, scope)?;
        debug!("declared generic function {}", template);
        return Ok(cx.define(scope, name, template));
    }

    let (params, ret) = signature(cx, parts, expr)?;
    cx.define(scope, name, Ty::function(params.clone(), ret.clone()));

    let checked = check_function(cx, parts, params, ret, expr, scope)?;
    debug!("declared function {}: {}", name, checked);
    Ok(cx.define(scope, name, checked))
}

/// `(lambda <T,...>? params -> ret body)`
pub fn check_lambda(
    cx: &mut Context,
    generics: Option<&str>,
    parts: &FnParts<'_>,
    expr: &Sexpr,
    scope: ScopeId,
) -> Result<Ty> {
    if let Some(list) = generics {
        return generic_template(cx, "lambda", list, parts, expr, scope);
    }

    let (params, ret) = signature(cx, parts, expr)?;
    check_function(cx, parts, params, ret, expr, scope)
}

fn signature(cx: &mut Context, parts: &FnParts<'_>, expr: &Sexpr) -> Result<(Vec<Ty>, Ty)> {
    let params = parts
        .params
        .iter()
        .map(|param| resolve_annotation(cx, param.annotation, expr))
        .collect::<Result<Vec<_>>>()?;
    let ret = resolve_annotation(cx, parts.ret, expr)?;
    Ok((params, ret))
}

fn check_function(
    cx: &mut Context,
    parts: &FnParts<'_>,
    params: Vec<Ty>,
    ret: Ty,
    expr: &Sexpr,
    closure: ScopeId,
) -> Result<Ty> {
    let bindings = parts
        .params
        .iter()
        .map(|param| cx.intern(param.name))
        .zip(params.iter().cloned())
        .collect::<Vec<_>>();

    check_function_body(cx, bindings, parts.body, &ret, expr, closure)?;
    Ok(Ty::function(params, ret))
}

/// Checks a body in a fresh scope under `closure` with the parameters bound,
/// and requires its type to equal `ret`.
pub fn check_function_body(
    cx: &mut Context,
    bindings: Vec<(Symbol, Ty)>,
    body: &Sexpr,
    ret: &Ty,
    expr: &Sexpr,
    closure: ScopeId,
) -> Result<()> {
    let fn_scope = cx.env.child(closure);
    for (name, ty) in bindings {
        cx.env.define(fn_scope, name, ty);
    }

    let body_ty = check_body(cx, body, fn_scope)?;
    expect(&body_ty, ret, body, expr)
}

fn generic_template(
    cx: &mut Context,
    name: &str,
    list: &str,
    parts: &FnParts<'_>,
    expr: &Sexpr,
    scope: ScopeId,
) -> Result<Ty> {
    let type_params = parse_list(list, expr)?
        .into_iter()
        .map(|param| match param {
            TypeExpr::Named(param) => Ok(param),
            TypeExpr::Function { .. } => Err(TypeError::InvalidTypeAnnotation {
                annotation: list.to_string(),
                reason: "type parameters must be plain names",
                expr: expr.clone(),
            }),
        })
        .collect::<Result<Vec<_>>>()?;

    let mut params = Vec::with_capacity(parts.params.len());
    for param in &parts.params {
        let annotation = parse_annotation(param.annotation, expr)?;
        params.push((cx.intern(param.name), annotation));
    }
    let ret = parse_annotation(parts.ret, expr)?;

    let id = cx.next_generic_id();
    Ok(Ty::Generic(Rc::new(GenericFn::new(
        id,
        name,
        type_params,
        params,
        ret,
        parts.body.clone(),
        scope,
    ))))
}

/// `(type Name Base)`
pub fn check_type_decl(
    cx: &mut Context,
    name: &str,
    base: &TypeBase<'_>,
    expr: &Sexpr,
) -> Result<Ty> {
    ensure_undeclared(cx, name, expr)?;

    let ty = match base {
        TypeBase::Named(base) => Ty::alias(name, resolve_base(cx, base, expr)?),
        TypeBase::Union(options) => {
            let options = options
                .iter()
                .map(|option| resolve_base(cx, option, expr))
                .collect::<Result<Vec<_>>>()?;
            Ty::union(name, options)
        }
    };

    declare(cx, name, ty.clone(), expr)?;
    debug!("declared {} {}", ty.kind_name(), name);
    Ok(ty)
}

fn resolve_base(cx: &mut Context, text: &str, expr: &Sexpr) -> Result<Ty> {
    match resolve_annotation(cx, text, expr) {
        Err(TypeError::UnknownType { name, expr }) => {
            Err(TypeError::UnknownBaseType { name, expr })
        }
        other => other,
    }
}

fn ensure_undeclared(cx: &Context, name: &str, expr: &Sexpr) -> Result<()> {
    match cx.registered(name) {
        Some(existing) => Err(TypeError::DuplicateTypeDeclaration {
            name: name.to_string(),
            existing: existing.name().to_string(),
            expr: expr.clone(),
        }),
        None => Ok(()),
    }
}

fn declare(cx: &mut Context, name: &str, ty: Ty, expr: &Sexpr) -> Result<()> {
    let sym = cx.intern(name);
    cx.types
        .declare(sym, ty)
        .map_err(|existing| TypeError::DuplicateTypeDeclaration {
            name: name.to_string(),
            existing: existing.name().to_string(),
            expr: expr.clone(),
        })
}

/// `(class Name Super body)`
///
/// The class is registered before its body is checked, so methods can name
/// it in their signatures. Every `var` and `def` in the body lands in the
/// class's field table.
pub fn check_class(
    cx: &mut Context,
    name: &str,
    superclass: &str,
    body: &Sexpr,
    expr: &Sexpr,
    scope: ScopeId,
) -> Result<Ty> {
    ensure_undeclared(cx, name, expr)?;

    let parent = if superclass == ROOT_SUPERCLASS {
        None
    } else {
        Some(class_named(cx, superclass, expr)?)
    };

    let fields = cx
        .env
        .member_table(parent.as_ref().map(|class| class.fields), scope);
    let ty = Ty::Class(Rc::new(ClassTy {
        name: name.to_string(),
        superclass: parent,
        fields,
    }));

    declare(cx, name, ty.clone(), expr)?;
    cx.define(scope, name, ty.clone());
    debug!("declared class {} extends {}", name, superclass);

    check_body(cx, body, fields)?;
    Ok(ty)
}

/// Looks a registered class up by name.
pub fn class_named(cx: &Context, name: &str, expr: &Sexpr) -> Result<Rc<ClassTy>> {
    let Some(ty) = cx.registered(name) else {
        return Err(TypeError::UnknownClass {
            name: name.to_string(),
            expr: expr.clone(),
        });
    };

    ty.as_class().cloned().ok_or_else(|| TypeError::NotAClass {
        ty: ty.name().to_string(),
        expr: expr.clone(),
    })
}

/// `(new Class args...)`: checks the constructor call with the instance as
/// the implicit first argument.
pub fn check_new(
    cx: &mut Context,
    class_name: &str,
    args: &[Sexpr],
    expr: &Sexpr,
    scope: ScopeId,
) -> Result<Ty> {
    let class = class_named(cx, class_name, expr)?;

    let constructor = cx
        .lookup_member(class.fields, CONSTRUCTOR)
        .and_then(Ty::as_function)
        .cloned()
        .ok_or_else(|| TypeError::MissingConstructor {
            class: class_name.to_string(),
            expr: expr.clone(),
        })?;

    let class_ty = Ty::Class(class);
    let class_expr = match expr.as_list() {
        Some([_, class_expr, ..]) => class_expr,
        _ => expr,
    };

    let mut checked = Vec::with_capacity(args.len() + 1);
    checked.push((class_expr, class_ty.clone()));
    for arg in args {
        checked.push((arg, tc(cx, arg, scope)?));
    }

    let callee = format!("{class_name} {CONSTRUCTOR}");
    check_arguments(&constructor, &callee, &checked, expr)?;
    Ok(class_ty)
}

/// `(super Class)`: the superclass, or `null` for a root class.
pub fn check_super(cx: &Context, class_name: &str, expr: &Sexpr) -> Result<Ty> {
    let class = class_named(cx, class_name, expr)?;
    Ok(match &class.superclass {
        Some(parent) => Ty::Class(Rc::clone(parent)),
        None => Ty::NULL,
    })
}

/// `(prop instance field)`: the declared type of `field` on the instance's
/// class or one of its superclasses.
pub fn field_type(
    cx: &mut Context,
    instance: &Sexpr,
    field: &str,
    expr: &Sexpr,
    scope: ScopeId,
) -> Result<Ty> {
    let instance_ty = tc(cx, instance, scope)?;
    let Some(class) = instance_ty.as_class() else {
        return Err(TypeError::NotAClass {
            ty: instance_ty.name().to_string(),
            expr: expr.clone(),
        });
    };

    cx.lookup_member(class.fields, field)
        .cloned()
        .ok_or_else(|| TypeError::UnknownField {
            class: class.name.clone(),
            field: field.to_string(),
            expr: expr.clone(),
        })
}
