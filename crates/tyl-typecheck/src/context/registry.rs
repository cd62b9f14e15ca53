//! Type registry for named types.
//!
//! Maps declared type names (aliases, unions, classes) and parsed function
//! annotation strings to their [`Ty`]. The registry is owned by one checker
//! and only ever grows.

use crate::types::{PrimTy, Ty};
use hashbrown::HashMap;
use tyl_mem::{StringInterner, Symbol};

/// Registry of named types.
#[derive(Debug, Clone)]
pub struct TypeRegistry {
    types: HashMap<Symbol, Ty>,
}

impl TypeRegistry {
    /// Creates a registry holding the primitive types.
    pub fn new(interner: &mut StringInterner) -> Self {
        let mut types = HashMap::new();
        for prim in PrimTy::ALL {
            types.insert(interner.intern(prim.name()), Ty::Primitive(prim));
        }
        Self { types }
    }

    /// Looks up a type by name.
    pub fn get(&self, name: Symbol) -> Option<&Ty> {
        self.types.get(&name)
    }

    /// Registers a declared type. Returns the existing type, leaving it in
    /// place, if `name` is already taken.
    pub fn declare(&mut self, name: Symbol, ty: Ty) -> Result<(), Ty> {
        match self.types.get(&name) {
            Some(existing) => Err(existing.clone()),
            None => {
                self.types.insert(name, ty);
                Ok(())
            }
        }
    }

    /// Remembers a parsed function type under `key` unless the key is
    /// already present. Returns the registered type either way.
    pub fn cache(&mut self, key: Symbol, ty: Ty) -> Ty {
        self.types.entry(key).or_insert(ty).clone()
    }

    /// Number of registered names.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// True if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
