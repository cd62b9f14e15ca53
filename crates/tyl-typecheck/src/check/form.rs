//! Expression forms.
//!
//! [`classify`] turns a raw [`Sexpr`] into a [`Form`], validating the shape
//! of special forms on the way, so the checking rules can be a single
//! exhaustive `match` over well-formed variants.

use crate::error::{Result, TypeError};
use crate::types::annotation::is_type_list;
use tyl_syntax::Sexpr;

/// Binary operators with built-in typing rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `==`
    Eq,
    /// `!=`
    Ne,
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// `<`
    Lt,
    /// `<=`
    Le,
}

impl BinOp {
    /// Parses an operator atom.
    pub fn from_symbol(sym: &str) -> Option<Self> {
        Some(match sym {
            "+" => BinOp::Add,
            "-" => BinOp::Sub,
            "*" => BinOp::Mul,
            "/" => BinOp::Div,
            "==" => BinOp::Eq,
            "!=" => BinOp::Ne,
            ">" => BinOp::Gt,
            ">=" => BinOp::Ge,
            "<" => BinOp::Lt,
            "<=" => BinOp::Le,
            _ => return None,
        })
    }

    /// The operator as written.
    pub const fn as_str(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Eq => "==",
            BinOp::Ne => "!=",
            BinOp::Gt => ">",
            BinOp::Ge => ">=",
            BinOp::Lt => "<",
            BinOp::Le => "<=",
        }
    }

    /// True for the comparison operators, which always produce `boolean`.
    pub const fn is_comparison(self) -> bool {
        !matches!(self, BinOp::Add | BinOp::Sub | BinOp::Mul | BinOp::Div)
    }
}

/// True if `sym` is spelled like an operator (only operator characters).
pub fn is_operator_like(sym: &str) -> bool {
    !sym.is_empty()
        && sym
            .chars()
            .all(|ch| matches!(ch, '+' | '-' | '*' | '/' | '%' | '<' | '>' | '=' | '!' | '&' | '|' | '^'))
}

/// The left-hand side of `set`.
#[derive(Debug, Clone, Copy)]
pub enum Target<'a> {
    /// `(set name value)`
    Name(&'a str),
    /// `(set (prop instance field) value)`
    Field {
        /// The instance expression
        instance: &'a Sexpr,
        /// The field name
        field: &'a str,
    },
}

/// The base of a `type` declaration.
#[derive(Debug, Clone)]
pub enum TypeBase<'a> {
    /// `(or T1 T2 ...)`
    Union(Vec<&'a str>),
    /// A single type annotation
    Named(&'a str),
}

/// A declared parameter `(name Type)`.
#[derive(Debug, Clone, Copy)]
pub struct Param<'a> {
    /// Parameter name
    pub name: &'a str,
    /// Its annotation text
    pub annotation: &'a str,
}

/// The shared tail of `def` and `lambda`: `params -> ret body`.
#[derive(Debug, Clone)]
pub struct FnParts<'a> {
    /// Declared parameters, in order
    pub params: Vec<Param<'a>>,
    /// Return annotation text
    pub ret: &'a str,
    /// Function body
    pub body: &'a Sexpr,
}

/// What is being called.
#[derive(Debug, Clone, Copy)]
pub enum Callee<'a> {
    /// Any expression in head position
    Expr(&'a Sexpr),
    /// The name part of a fused generic call such as `id<number>`
    Name(&'a str),
}

/// A classified expression.
#[derive(Debug, Clone)]
pub enum Form<'a> {
    /// Numeric literal
    Number,
    /// String literal
    Str,
    /// Boolean literal
    Bool,
    /// Variable reference
    Name(&'a str),
    /// `(op a b)`; the operand count is checked by the rule
    Binary {
        /// The operator
        op: BinOp,
        /// Operand expressions
        args: &'a [Sexpr],
    },
    /// `(var name value)` or `(var (name Type) value)`
    Var {
        /// Variable name
        name: &'a str,
        /// Declared type, if annotated
        annotation: Option<&'a str>,
        /// Initial value
        value: &'a Sexpr,
    },
    /// `(set target value)`
    Set {
        /// What is assigned
        target: Target<'a>,
        /// The new value
        value: &'a Sexpr,
    },
    /// `(begin e1 e2 ...)`
    Begin(&'a [Sexpr]),
    /// `(if cond then else)`
    If {
        /// Condition
        cond: &'a Sexpr,
        /// Consequent
        then: &'a Sexpr,
        /// Alternate
        els: &'a Sexpr,
    },
    /// `(while cond body)`
    While {
        /// Condition
        cond: &'a Sexpr,
        /// Loop body
        body: &'a Sexpr,
    },
    /// `(def name <T,...>? params -> ret body)`
    Def {
        /// Function name
        name: &'a str,
        /// Generic parameter list text, e.g. `<K,V>`
        generics: Option<&'a str>,
        /// Signature and body
        parts: FnParts<'a>,
    },
    /// `(lambda <T,...>? params -> ret body)`
    Lambda {
        /// Generic parameter list text
        generics: Option<&'a str>,
        /// Signature and body
        parts: FnParts<'a>,
    },
    /// `(type Name Base)`
    TypeDecl {
        /// Declared name
        name: &'a str,
        /// Aliased type or union options
        base: TypeBase<'a>,
    },
    /// `(class Name Super Body)`
    Class {
        /// Class name
        name: &'a str,
        /// Superclass name, `null` for a root class
        superclass: &'a str,
        /// Class body
        body: &'a Sexpr,
    },
    /// `(new Class args...)`
    New {
        /// Class name
        class: &'a str,
        /// Constructor arguments, excluding the implicit instance
        args: &'a [Sexpr],
    },
    /// `(super Class)`
    Super {
        /// Class name
        class: &'a str,
    },
    /// `(prop instance field)`
    Prop {
        /// The instance expression
        instance: &'a Sexpr,
        /// The field name
        field: &'a str,
    },
    /// `(callee <T,...>? args...)`
    Call {
        /// The callee
        callee: Callee<'a>,
        /// Actual type list text, separate or fused onto the callee
        type_args: Option<&'a str>,
        /// Arguments
        args: &'a [Sexpr],
    },
}

/// Classifies `expr`, rejecting special forms with the wrong shape.
pub fn classify(expr: &Sexpr) -> Result<Form<'_>> {
    let items = match expr {
        Sexpr::Number(_) => return Ok(Form::Number),
        Sexpr::Str(_) => return Ok(Form::Str),
        Sexpr::Bool(_) => return Ok(Form::Bool),
        Sexpr::Symbol(name) => return Ok(Form::Name(name.as_str())),
        Sexpr::List(items) => items.as_slice(),
    };

    let Some((head, rest)) = items.split_first() else {
        return Err(TypeError::malformed("()", "empty list is not an expression", expr));
    };

    let Some(tag) = head.as_symbol() else {
        return Ok(call(Callee::Expr(head), rest));
    };

    if let Some(op) = BinOp::from_symbol(tag) {
        return Ok(Form::Binary { op, args: rest });
    }

    let form = match tag {
        "var" => classify_var(expr, rest)?,
        "set" => classify_set(expr, rest)?,
        "begin" => Form::Begin(rest),
        "if" => match rest {
            [cond, then, els] => Form::If { cond, then, els },
            _ => return Err(TypeError::malformed(tag, "expected (if cond then else)", expr)),
        },
        "while" => match rest {
            [cond, body] => Form::While { cond, body },
            _ => return Err(TypeError::malformed(tag, "expected (while cond body)", expr)),
        },
        "def" => classify_def(expr, rest)?,
        "lambda" => {
            let (generics, tail) = split_generics(rest);
            Form::Lambda {
                generics,
                parts: fn_parts(expr, tag, tail)?,
            }
        }
        "type" => classify_type(expr, rest)?,
        "class" => match rest {
            [name, superclass, body] => Form::Class {
                name: symbol(expr, tag, name, "class name must be a symbol")?,
                superclass: symbol(expr, tag, superclass, "superclass must be a symbol")?,
                body,
            },
            _ => return Err(TypeError::malformed(tag, "expected (class Name Super body)", expr)),
        },
        "new" => match rest {
            [class, args @ ..] => Form::New {
                class: symbol(expr, tag, class, "class name must be a symbol")?,
                args,
            },
            [] => return Err(TypeError::malformed(tag, "expected (new Class args...)", expr)),
        },
        "super" => match rest {
            [class] => Form::Super {
                class: symbol(expr, tag, class, "class name must be a symbol")?,
            },
            _ => return Err(TypeError::malformed(tag, "expected (super Class)", expr)),
        },
        "prop" => match rest {
            [instance, field] => Form::Prop {
                instance,
                field: symbol(expr, tag, field, "field name must be a symbol")?,
            },
            _ => return Err(TypeError::malformed(tag, "expected (prop instance field)", expr)),
        },
        "or" | "->" => {
            return Err(TypeError::malformed(tag, "only valid inside a declaration", expr));
        }
        _ => match split_fused(tag) {
            Some((name, list)) => Form::Call {
                callee: Callee::Name(name),
                type_args: Some(list),
                args: rest,
            },
            None => call(Callee::Expr(head), rest),
        },
    };

    Ok(form)
}

fn call<'a>(callee: Callee<'a>, rest: &'a [Sexpr]) -> Form<'a> {
    match rest.split_first() {
        Some((first, args)) if first.as_symbol().is_some_and(is_type_list) => Form::Call {
            callee,
            type_args: first.as_symbol(),
            args,
        },
        _ => Form::Call {
            callee,
            type_args: None,
            args: rest,
        },
    }
}

/// Splits `id<number>` into `("id", "<number>")`.
pub fn split_fused(sym: &str) -> Option<(&str, &str)> {
    let open = sym.find('<')?;
    let (name, list) = sym.split_at(open);
    if name.is_empty() || !is_type_list(list) {
        return None;
    }
    Some((name, list))
}

fn split_generics(rest: &[Sexpr]) -> (Option<&str>, &[Sexpr]) {
    match rest.split_first() {
        Some((first, tail)) if first.as_symbol().is_some_and(is_type_list) => {
            (first.as_symbol(), tail)
        }
        _ => (None, rest),
    }
}

fn symbol<'a>(
    expr: &Sexpr,
    tag: &str,
    item: &'a Sexpr,
    reason: &'static str,
) -> Result<&'a str> {
    item.as_symbol()
        .ok_or_else(|| TypeError::malformed(tag, reason, expr))
}

fn classify_var<'a>(expr: &'a Sexpr, rest: &'a [Sexpr]) -> Result<Form<'a>> {
    let [target, value] = rest else {
        return Err(TypeError::malformed("var", "expected (var name value)", expr));
    };

    match target {
        Sexpr::Symbol(name) => Ok(Form::Var {
            name: name.as_str(),
            annotation: None,
            value,
        }),
        Sexpr::List(pair) => match pair.as_slice() {
            [Sexpr::Symbol(name), Sexpr::Symbol(annotation)] => Ok(Form::Var {
                name: name.as_str(),
                annotation: Some(annotation.as_str()),
                value,
            }),
            _ => Err(TypeError::malformed("var", "expected (name Type)", expr)),
        },
        _ => Err(TypeError::malformed("var", "variable name must be a symbol", expr)),
    }
}

fn classify_set<'a>(expr: &'a Sexpr, rest: &'a [Sexpr]) -> Result<Form<'a>> {
    let [target, value] = rest else {
        return Err(TypeError::malformed("set", "expected (set target value)", expr));
    };

    if let Some(name) = target.as_symbol() {
        return Ok(Form::Set {
            target: Target::Name(name),
            value,
        });
    }

    match target.as_list() {
        Some([tag, instance, Sexpr::Symbol(field)]) if tag.as_symbol() == Some("prop") => {
            Ok(Form::Set {
                target: Target::Field {
                    instance,
                    field: field.as_str(),
                },
                value,
            })
        }
        _ => Err(TypeError::malformed(
            "set",
            "target must be a name or (prop instance field)",
            expr,
        )),
    }
}

fn classify_def<'a>(expr: &'a Sexpr, rest: &'a [Sexpr]) -> Result<Form<'a>> {
    let Some((name, tail)) = rest.split_first() else {
        return Err(TypeError::malformed("def", "expected (def name params -> ret body)", expr));
    };
    let name = symbol(expr, "def", name, "function name must be a symbol")?;
    let (generics, tail) = split_generics(tail);

    Ok(Form::Def {
        name,
        generics,
        parts: fn_parts(expr, "def", tail)?,
    })
}

fn fn_parts<'a>(expr: &'a Sexpr, tag: &str, tail: &'a [Sexpr]) -> Result<FnParts<'a>> {
    let [params, arrow, ret, body] = tail else {
        return Err(TypeError::malformed(tag, "expected params -> ret body", expr));
    };

    if arrow.as_symbol() != Some("->") {
        return Err(TypeError::malformed(tag, "expected '->' before the return type", expr));
    }
    let ret = symbol(expr, tag, ret, "return type must be a type annotation")?;

    let Some(params) = params.as_list() else {
        return Err(TypeError::malformed(tag, "parameters must be a list", expr));
    };

    let params = params
        .iter()
        .map(|param| match param.as_list() {
            Some([Sexpr::Symbol(name), Sexpr::Symbol(annotation)]) => Ok(Param {
                name: name.as_str(),
                annotation: annotation.as_str(),
            }),
            _ => Err(TypeError::malformed(tag, "each parameter must be (name Type)", expr)),
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(FnParts { params, ret, body })
}

fn classify_type<'a>(expr: &'a Sexpr, rest: &'a [Sexpr]) -> Result<Form<'a>> {
    let [name, base] = rest else {
        return Err(TypeError::malformed("type", "expected (type Name Base)", expr));
    };
    let name = symbol(expr, "type", name, "type name must be a symbol")?;

    let base = match base {
        Sexpr::Symbol(base) => TypeBase::Named(base.as_str()),
        Sexpr::List(items) => match items.split_first() {
            Some((or, options)) if or.as_symbol() == Some("or") && !options.is_empty() => {
                let options = options
                    .iter()
                    .map(|option| symbol(expr, "type", option, "union options must be type names"))
                    .collect::<Result<Vec<_>>>()?;
                TypeBase::Union(options)
            }
            _ => return Err(TypeError::malformed("type", "expected a type or (or T1 T2 ...)", expr)),
        },
        _ => return Err(TypeError::malformed("type", "expected a type or (or T1 T2 ...)", expr)),
    };

    Ok(Form::TypeDecl { name, base })
}
