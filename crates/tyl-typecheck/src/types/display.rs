//! Canonical type names.
//!
//! The canonical name is what error messages print and what the registry
//! uses as a key, so two function types with the same shape always render
//! identically.

use crate::types::Ty;
use std::fmt;

impl Ty {
    /// The canonical name of this type.
    ///
    /// ```
    /// use tyl_typecheck::types::Ty;
    ///
    /// let f = Ty::function(vec![Ty::NUMBER, Ty::NUMBER], Ty::NUMBER);
    /// assert_eq!(f.name(), "Fn<number<number,number>>");
    /// ```
    pub fn name(&self) -> &str {
        match self {
            Ty::Primitive(prim) => prim.name(),
            Ty::Function(sig) => sig.name(),
            Ty::Alias(alias) => &alias.name,
            Ty::Union(union) => &union.name,
            Ty::Class(class) => &class.name,
            Ty::Generic(generic) => generic.display_name(),
        }
    }

    /// A one-word description of the kind of type, for messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Ty::Primitive(_) => "primitive",
            Ty::Function(_) => "function",
            Ty::Alias(_) => "alias",
            Ty::Union(_) => "union",
            Ty::Class(_) => "class",
            Ty::Generic(_) => "generic function",
        }
    }
}

impl fmt::Display for Ty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
