//! Checking context.
//!
//! Bundles everything a check threads through its recursion: the interner,
//! the scope arena, the registry, the options and the generic instantiation
//! cache.

use crate::context::{ScopeId, TypeEnv, TypeRegistry};
use crate::error::{Result, TypeError};
use crate::options::Options;
use crate::types::{FnTy, Ty};
use hashbrown::HashMap;
use std::rc::Rc;
use tyl_log::debug;
use tyl_mem::{StringInterner, Symbol};
use tyl_syntax::Sexpr;

/// Key of a generic instantiation: template id plus the canonical names of
/// the actual types.
pub type InstanceKey = (u32, Vec<String>);

/// Main type checking context.
#[derive(Debug)]
pub struct Context {
    /// Interner for every name the checker binds or registers
    pub interner: StringInterner,

    /// Scope arena; scope 0 is the global scope
    pub env: TypeEnv,

    /// Named types
    pub types: TypeRegistry,

    /// Configuration
    pub options: Options,

    instances: HashMap<InstanceKey, Rc<FnTy>>,
    next_generic: u32,
}

impl Context {
    /// Creates a context and installs the prelude if the options ask for it.
    pub fn new(options: Options) -> Self {
        let mut interner = StringInterner::new();
        let types = TypeRegistry::new(&mut interner);

        let mut cx = Self {
            interner,
            env: TypeEnv::new(),
            types,
            options,
            instances: HashMap::new(),
            next_generic: 0,
        };

        if options.prelude {
            cx.install_prelude();
        }
        cx
    }

    fn install_prelude(&mut self) {
        let prelude = [
            ("VERSION", Ty::STRING),
            ("sum", Ty::function(vec![Ty::NUMBER, Ty::NUMBER], Ty::NUMBER)),
            ("square", Ty::function(vec![Ty::NUMBER], Ty::NUMBER)),
            ("typeof", Ty::function(vec![Ty::ANY], Ty::STRING)),
        ];

        let count = prelude.len();
        let global = self.env.global();
        for (name, ty) in prelude {
            let sym = self.interner.intern(name);
            self.env.define(global, sym, ty);
        }
        debug!("installed {} prelude bindings", count);
    }

    /// Interns `name`.
    pub fn intern(&mut self, name: &str) -> Symbol {
        self.interner.intern(name)
    }

    /// Binds `name` in `scope`.
    pub fn define(&mut self, scope: ScopeId, name: &str, ty: Ty) -> Ty {
        let sym = self.interner.intern(name);
        self.env.define(scope, sym, ty)
    }

    /// Looks a variable up, failing with [`TypeError::UndefinedName`].
    pub fn lookup(&self, scope: ScopeId, name: &str, expr: &Sexpr) -> Result<Ty> {
        self.interner
            .get(name)
            .and_then(|sym| self.env.lookup(scope, sym))
            .cloned()
            .ok_or_else(|| TypeError::UndefinedName {
                name: name.to_string(),
                expr: expr.clone(),
            })
    }

    /// Looks a variable up without failing.
    pub fn try_lookup(&self, scope: ScopeId, name: &str) -> Option<&Ty> {
        let sym = self.interner.get(name)?;
        self.env.lookup(scope, sym)
    }

    /// Looks a member up along a class table's inheritance chain.
    pub fn lookup_member(&self, fields: ScopeId, name: &str) -> Option<&Ty> {
        let sym = self.interner.get(name)?;
        self.env.lookup_member(fields, sym)
    }

    /// Looks a registered type up by name.
    pub fn registered(&self, name: &str) -> Option<&Ty> {
        let sym = self.interner.get(name)?;
        self.types.get(sym)
    }

    /// Allocates an id for a new generic template.
    pub fn next_generic_id(&mut self) -> u32 {
        let id = self.next_generic;
        self.next_generic += 1;
        id
    }

    /// A previously instantiated signature.
    pub fn instance(&self, key: &InstanceKey) -> Option<Rc<FnTy>> {
        self.instances.get(key).cloned()
    }

    /// Records an instantiated signature.
    pub fn record_instance(&mut self, key: InstanceKey, sig: Rc<FnTy>) {
        self.instances.insert(key, sig);
    }

    /// Drops a cached instantiation whose body failed to check.
    pub fn forget_instance(&mut self, key: &InstanceKey) {
        self.instances.remove(key);
    }

    /// Number of cached generic instantiations.
    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }
}
