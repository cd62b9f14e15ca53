//! Type environment for lexical scoping.
//!
//! Scopes live in an arena owned by [`TypeEnv`] and refer to each other by
//! [`ScopeId`]. A scope never owns or mutates its parent; it only reads
//! through it on a lookup miss.
//!
//! # Design
//!
//! - **Arena of scopes**: `ScopeId` is an index, so closures and class types
//!   can hold on to a scope without borrowing the environment
//! - **Parent links**: ordinary lexical nesting, and for class field tables,
//!   the superclass's table
//! - **Outer links**: a class field table also remembers the scope the class
//!   was declared in. Plain lookups fall through to it once the inheritance
//!   chain is exhausted; member lookups never do
//!
//! # Example
//!
//! ```
//! use tyl_mem::StringInterner;
//! use tyl_typecheck::context::TypeEnv;
//! use tyl_typecheck::types::Ty;
//!
//! let mut interner = StringInterner::new();
//! let x = interner.intern("x");
//!
//! let mut env = TypeEnv::new();
//! let global = env.global();
//! env.define(global, x, Ty::NUMBER);
//!
//! let inner = env.child(global);
//! env.define(inner, x, Ty::STRING);
//!
//! assert_eq!(env.lookup(inner, x).map(|t| t.name()), Some("string"));
//! assert_eq!(env.lookup(global, x).map(|t| t.name()), Some("number"));
//! ```

use crate::types::Ty;
use hashbrown::HashMap;
use std::fmt;
use tyl_mem::Symbol;

/// Handle to a scope in a [`TypeEnv`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(u32);

impl ScopeId {
    /// The global scope of every environment.
    pub const GLOBAL: ScopeId = ScopeId(0);

    /// Index into the arena.
    pub const fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "scope#{}", self.0)
    }
}

#[derive(Debug, Default)]
struct Scope {
    bindings: HashMap<Symbol, Ty>,
    parent: Option<ScopeId>,
    outer: Option<ScopeId>,
}

/// Arena of scopes mapping symbols to types.
#[derive(Debug)]
pub struct TypeEnv {
    scopes: Vec<Scope>,
}

impl TypeEnv {
    /// Creates an environment holding only an empty global scope.
    pub fn new() -> Self {
        Self {
            scopes: vec![Scope::default()],
        }
    }

    /// The global scope.
    pub fn global(&self) -> ScopeId {
        ScopeId::GLOBAL
    }

    /// Opens a scope whose parent is `parent`.
    pub fn child(&mut self, parent: ScopeId) -> ScopeId {
        self.push(Scope {
            parent: Some(parent),
            ..Scope::default()
        })
    }

    /// Opens a scope with no parent, only an outer link.
    ///
    /// Used for the field table of a root class: member lookups stop here,
    /// while plain lookups continue into `outer`.
    pub fn detached(&mut self, outer: Option<ScopeId>) -> ScopeId {
        self.push(Scope {
            outer,
            ..Scope::default()
        })
    }

    /// Opens a class field table chained to the superclass's table, with
    /// `outer` as the scope the class was declared in.
    pub fn member_table(&mut self, parent: Option<ScopeId>, outer: ScopeId) -> ScopeId {
        self.push(Scope {
            parent,
            outer: Some(outer),
            ..Scope::default()
        })
    }

    fn push(&mut self, scope: Scope) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(scope);
        id
    }

    fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.as_usize()]
    }

    /// Binds `name` in `scope` only, shadowing any outer binding, and
    /// returns the bound type.
    pub fn define(&mut self, scope: ScopeId, name: Symbol, ty: Ty) -> Ty {
        self.scopes[scope.as_usize()]
            .bindings
            .insert(name, ty.clone());
        ty
    }

    /// Looks `name` up starting at `scope`.
    ///
    /// Walks the parent chain first. On a miss, continues from the nearest
    /// outer link seen along that chain.
    pub fn lookup(&self, scope: ScopeId, name: Symbol) -> Option<&Ty> {
        let owner = self.resolve(scope, name)?;
        self.scope(owner).bindings.get(&name)
    }

    /// Returns the scope that owns `name` as seen from `scope`.
    pub fn resolve(&self, scope: ScopeId, name: Symbol) -> Option<ScopeId> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let mut outer = None;
            let mut cursor = Some(id);

            while let Some(frame) = cursor {
                let data = self.scope(frame);
                if data.bindings.contains_key(&name) {
                    return Some(frame);
                }
                if outer.is_none() {
                    outer = data.outer;
                }
                cursor = data.parent;
            }

            current = outer;
        }
        None
    }

    /// Looks `name` up along the parent chain only, ignoring outer links.
    ///
    /// This is the field lookup for class tables: it sees inherited members
    /// but never the names around the class declaration.
    pub fn lookup_member(&self, scope: ScopeId, name: Symbol) -> Option<&Ty> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let data = self.scope(id);
            if let Some(ty) = data.bindings.get(&name) {
                return Some(ty);
            }
            current = data.parent;
        }
        None
    }

    /// Number of scopes ever opened.
    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    /// Always false: the global scope exists from construction.
    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }
}

impl Default for TypeEnv {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tyl_mem::StringInterner;

    #[test]
    fn test_env_new() {
        let env = TypeEnv::new();
        assert_eq!(env.len(), 1);
        assert_eq!(env.global(), ScopeId::GLOBAL);
    }

    #[test]
    fn test_define_and_lookup() {
        let mut interner = StringInterner::new();
        let x = interner.intern("x");
        let y = interner.intern("y");

        let mut env = TypeEnv::new();
        let returned = env.define(ScopeId::GLOBAL, x, Ty::NUMBER);

        assert_eq!(returned.name(), "number");
        assert_eq!(env.lookup(ScopeId::GLOBAL, x).map(Ty::name), Some("number"));
        assert!(env.lookup(ScopeId::GLOBAL, y).is_none());
    }

    #[test]
    fn test_child_reads_through_parent() {
        let mut interner = StringInterner::new();
        let x = interner.intern("x");

        let mut env = TypeEnv::new();
        env.define(ScopeId::GLOBAL, x, Ty::NUMBER);
        let inner = env.child(ScopeId::GLOBAL);
        let innermost = env.child(inner);

        assert_eq!(env.lookup(innermost, x).map(Ty::name), Some("number"));
        assert_eq!(env.resolve(innermost, x), Some(ScopeId::GLOBAL));
        assert_eq!(env.resolve(inner, x), Some(ScopeId::GLOBAL));
    }

    #[test]
    fn test_shadowing_does_not_touch_parent() {
        let mut interner = StringInterner::new();
        let x = interner.intern("x");

        let mut env = TypeEnv::new();
        env.define(ScopeId::GLOBAL, x, Ty::NUMBER);
        let inner = env.child(ScopeId::GLOBAL);
        env.define(inner, x, Ty::STRING);

        assert_eq!(env.lookup(inner, x).map(Ty::name), Some("string"));
        assert_eq!(env.lookup(ScopeId::GLOBAL, x).map(Ty::name), Some("number"));
        assert_eq!(env.resolve(inner, x), Some(inner));
    }

    #[test]
    fn test_member_lookup_follows_inheritance_only() {
        let mut interner = StringInterner::new();
        let x = interner.intern("x");
        let z = interner.intern("z");
        let global_only = interner.intern("square");

        let mut env = TypeEnv::new();
        env.define(ScopeId::GLOBAL, global_only, Ty::NUMBER);

        let base = env.member_table(None, ScopeId::GLOBAL);
        env.define(base, x, Ty::NUMBER);
        let derived = env.member_table(Some(base), ScopeId::GLOBAL);
        env.define(derived, z, Ty::STRING);

        assert_eq!(env.lookup_member(derived, x).map(Ty::name), Some("number"));
        assert_eq!(env.lookup_member(derived, z).map(Ty::name), Some("string"));
        assert!(env.lookup_member(base, z).is_none());
        assert!(env.lookup_member(derived, global_only).is_none());

        // plain lookup reaches the declaring scope
        assert_eq!(env.lookup(derived, global_only).map(Ty::name), Some("number"));
    }

    #[test]
    fn test_method_scope_sees_fields_then_globals() {
        let mut interner = StringInterner::new();
        let x = interner.intern("x");
        let g = interner.intern("g");

        let mut env = TypeEnv::new();
        env.define(ScopeId::GLOBAL, g, Ty::BOOLEAN);
        let block = env.child(ScopeId::GLOBAL);
        let table = env.detached(Some(block));
        env.define(table, x, Ty::NUMBER);
        let method = env.child(table);

        assert_eq!(env.lookup(method, x).map(Ty::name), Some("number"));
        assert_eq!(env.lookup(method, g).map(Ty::name), Some("boolean"));
        assert_eq!(env.resolve(method, g), Some(ScopeId::GLOBAL));
    }

    #[test]
    fn test_unbound_name_misses() {
        let mut interner = StringInterner::new();
        let missing = interner.intern("missing");

        let mut env = TypeEnv::new();
        let inner = env.child(ScopeId::GLOBAL);
        let table = env.detached(Some(inner));

        assert!(env.lookup(table, missing).is_none());
        assert!(env.resolve(table, missing).is_none());
    }
}
