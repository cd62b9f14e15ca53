//! Core type representation.
//!
//! Every compound type lives behind an `Rc`, so cloning a `Ty` is cheap and
//! classes and generic templates keep a stable identity.
//!
//! # Equality
//!
//! [`Ty::equals`] is the subtyping test used everywhere in the checker. It is
//! deliberately not `PartialEq`: it is asymmetric for classes (a subclass
//! equals its superclass, not the other way round) and not transitive across
//! unions. Aliases and unions get control first whichever side they are on,
//! so the kind-specific rules below never see them as `other`.

use crate::context::ScopeId;
use crate::types::annotation::TypeExpr;
use std::rc::Rc;
use tyl_mem::Symbol;
use tyl_syntax::Sexpr;

/// A checked type.
#[derive(Debug, Clone)]
pub enum Ty {
    /// `number`, `string`, `boolean`, `null`, `any`
    Primitive(PrimTy),

    /// A concrete function signature, `Fn<R<P1,P2>>`.
    Function(Rc<FnTy>),

    /// `(type Name Base)`: transparently equal to its parent.
    Alias(Rc<AliasTy>),

    /// `(type Name (or T1 T2 ...))`: equal to any one of its options.
    Union(Rc<UnionTy>),

    /// `(class Name Super Body)`: nominal, with a field table.
    Class(Rc<ClassTy>),

    /// An uninstantiated generic function. Not callable until the checker
    /// substitutes actual types and checks the body.
    Generic(Rc<GenericFn>),
}

/// Primitive types built into the language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimTy {
    /// Numeric values
    Number,
    /// String values
    String,
    /// `true` / `false`
    Boolean,
    /// The null value, also the superclass of root classes
    Null,
    /// Only meaningful as a parameter type: accepts every argument
    Any,
}

impl PrimTy {
    /// All primitives, in registration order.
    pub const ALL: [PrimTy; 5] = [
        PrimTy::Number,
        PrimTy::String,
        PrimTy::Boolean,
        PrimTy::Null,
        PrimTy::Any,
    ];

    /// The source-level name.
    pub const fn name(self) -> &'static str {
        match self {
            PrimTy::Number => "number",
            PrimTy::String => "string",
            PrimTy::Boolean => "boolean",
            PrimTy::Null => "null",
            PrimTy::Any => "any",
        }
    }

    /// Parses a source-level primitive name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|prim| prim.name() == name)
    }
}

/// A function signature with its canonical name computed once.
#[derive(Debug, Clone)]
pub struct FnTy {
    params: Vec<Ty>,
    ret: Ty,
    name: String,
}

impl FnTy {
    /// Builds a signature; the canonical name is `Fn<R<P1,...>>` or `Fn<R>`.
    pub fn new(params: Vec<Ty>, ret: Ty) -> Self {
        let name = Self::canonical_name(&params, &ret);
        Self { params, ret, name }
    }

    fn canonical_name(params: &[Ty], ret: &Ty) -> String {
        let mut name = format!("Fn<{}", ret.name());
        if !params.is_empty() {
            name.push('<');
            for (i, param) in params.iter().enumerate() {
                if i > 0 {
                    name.push(',');
                }
                name.push_str(param.name());
            }
            name.push('>');
        }
        name.push('>');
        name
    }

    /// Parameter types, in order.
    pub fn params(&self) -> &[Ty] {
        &self.params
    }

    /// Return type.
    pub fn ret(&self) -> &Ty {
        &self.ret
    }

    /// Canonical name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of parameters.
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// Structural equality: same arity, pairwise equal parameters, equal
    /// return types. `any` gets no special treatment here.
    pub fn equals(&self, other: &FnTy) -> bool {
        self.params.len() == other.params.len()
            && self
                .params
                .iter()
                .zip(&other.params)
                .all(|(a, b)| a.equals(b))
            && self.ret.equals(&other.ret)
    }
}

/// A named stand-in for another type.
#[derive(Debug, Clone)]
pub struct AliasTy {
    /// Declared name
    pub name: String,
    /// The aliased type
    pub parent: Ty,
}

/// A named set of alternatives.
#[derive(Debug, Clone)]
pub struct UnionTy {
    /// Declared name
    pub name: String,
    /// Alternatives, in declaration order
    pub options: Vec<Ty>,
}

impl UnionTy {
    /// Membership test. Another union is included only if its options match
    /// this one's exactly (see [`UnionTy::includes_all`]).
    pub fn includes(&self, ty: &Ty) -> bool {
        match ty {
            Ty::Union(other) => self.includes_all(&other.options),
            _ => self.options.iter().any(|option| option.equals(ty)),
        }
    }

    /// True if `types` has as many entries as this union has options and
    /// every entry is a member. Not a subset test: the sizes must agree.
    pub fn includes_all(&self, types: &[Ty]) -> bool {
        types.len() == self.options.len() && types.iter().all(|ty| self.includes(ty))
    }
}

/// A nominal class type.
///
/// `fields` is a scope in the checker's environment arena; its parent is the
/// superclass's field scope, so member lookup walks the inheritance chain.
#[derive(Debug)]
pub struct ClassTy {
    /// Declared name
    pub name: String,
    /// `None` for a root class (declared with superclass `null`)
    pub superclass: Option<Rc<ClassTy>>,
    /// Field and method table
    pub fields: ScopeId,
}

impl ClassTy {
    /// True if `self` is `other` or inherits from it.
    pub fn is_subclass_of(&self, other: &ClassTy) -> bool {
        let mut current = Some(self);
        while let Some(class) = current {
            if std::ptr::eq(class, other) {
                return true;
            }
            current = class.superclass.as_deref();
        }
        false
    }
}

/// A generic function template: annotations stay unresolved and the body
/// stays unchecked until a call site supplies actual types.
#[derive(Debug)]
pub struct GenericFn {
    /// Unique per checker; keys the instantiation cache
    pub id: u32,
    /// Name of the defining `def`, or `lambda`
    pub name: String,
    /// Type parameter names, e.g. `["K", "V"]`
    pub type_params: Vec<String>,
    /// Parameter names with their unresolved annotations
    pub params: Vec<(Symbol, TypeExpr)>,
    /// Unresolved return annotation
    pub ret: TypeExpr,
    /// The unchecked body
    pub body: Sexpr,
    /// Scope the template was declared in
    pub closure: ScopeId,
    display: String,
}

impl GenericFn {
    /// Creates a template. Its display name is `name <T1,T2>`.
    pub fn new(
        id: u32,
        name: impl Into<String>,
        type_params: Vec<String>,
        params: Vec<(Symbol, TypeExpr)>,
        ret: TypeExpr,
        body: Sexpr,
        closure: ScopeId,
    ) -> Self {
        let name = name.into();
        let display = format!("{} <{}>", name, type_params.join(","));
        Self {
            id,
            name,
            type_params,
            params,
            ret,
            body,
            closure,
            display,
        }
    }

    /// Display name.
    pub fn display_name(&self) -> &str {
        &self.display
    }
}

impl Ty {
    /// Shorthand for `Ty::Primitive(PrimTy::Number)`.
    pub const NUMBER: Ty = Ty::Primitive(PrimTy::Number);
    /// Shorthand for `Ty::Primitive(PrimTy::String)`.
    pub const STRING: Ty = Ty::Primitive(PrimTy::String);
    /// Shorthand for `Ty::Primitive(PrimTy::Boolean)`.
    pub const BOOLEAN: Ty = Ty::Primitive(PrimTy::Boolean);
    /// Shorthand for `Ty::Primitive(PrimTy::Null)`.
    pub const NULL: Ty = Ty::Primitive(PrimTy::Null);
    /// Shorthand for `Ty::Primitive(PrimTy::Any)`.
    pub const ANY: Ty = Ty::Primitive(PrimTy::Any);

    /// Builds a function type.
    pub fn function(params: Vec<Ty>, ret: Ty) -> Ty {
        Ty::Function(Rc::new(FnTy::new(params, ret)))
    }

    /// Builds an alias type.
    pub fn alias(name: impl Into<String>, parent: Ty) -> Ty {
        Ty::Alias(Rc::new(AliasTy {
            name: name.into(),
            parent,
        }))
    }

    /// Builds a union type.
    pub fn union(name: impl Into<String>, options: Vec<Ty>) -> Ty {
        Ty::Union(Rc::new(UnionTy {
            name: name.into(),
            options,
        }))
    }

    /// Returns true for the `any` primitive.
    pub fn is_any(&self) -> bool {
        matches!(self, Ty::Primitive(PrimTy::Any))
    }

    /// The class behind this type, looking through aliases.
    pub fn as_class(&self) -> Option<&Rc<ClassTy>> {
        match self {
            Ty::Class(class) => Some(class),
            Ty::Alias(alias) => alias.parent.as_class(),
            _ => None,
        }
    }

    /// The function signature behind this type, looking through aliases.
    pub fn as_function(&self) -> Option<&Rc<FnTy>> {
        match self {
            Ty::Function(sig) => Some(sig),
            Ty::Alias(alias) => alias.parent.as_function(),
            _ => None,
        }
    }

    /// Subtype-aware equality; see the module docs.
    ///
    /// ```
    /// use tyl_typecheck::types::Ty;
    ///
    /// let int = Ty::alias("int", Ty::NUMBER);
    /// assert!(int.equals(&Ty::NUMBER));
    /// assert!(Ty::NUMBER.equals(&int));
    ///
    /// let num_or_str = Ty::union("NumOrStr", vec![Ty::NUMBER, Ty::STRING]);
    /// assert!(Ty::STRING.equals(&num_or_str));
    /// assert!(!Ty::BOOLEAN.equals(&num_or_str));
    /// ```
    pub fn equals(&self, other: &Ty) -> bool {
        match (self, other) {
            (Ty::Alias(alias), _) => alias.name == other.name() || alias.parent.equals(other),
            (_, Ty::Alias(_)) => other.equals(self),

            (Ty::Union(a), Ty::Union(b)) if Rc::ptr_eq(a, b) => true,
            (Ty::Union(union), _) => union.includes(other),
            (_, Ty::Union(_)) => other.equals(self),

            (Ty::Primitive(a), Ty::Primitive(b)) => a == b,
            (Ty::Function(a), Ty::Function(b)) => Rc::ptr_eq(a, b) || a.equals(b),
            (Ty::Class(a), Ty::Class(b)) => a.is_subclass_of(b),
            (Ty::Generic(a), Ty::Generic(b)) => Rc::ptr_eq(a, b),

            _ => false,
        }
    }
}
