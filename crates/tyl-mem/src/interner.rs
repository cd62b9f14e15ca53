//! String interning with ID-based references.
//!
//! The interner keeps two views of the same data: `strings` resolves a
//! [`Symbol`] back to text, `symbols` finds the symbol of a string. Both share
//! one `Rc<str>` allocation per distinct string.
//!
//! # Examples
//!
//! ```
//! use tyl_mem::StringInterner;
//!
//! let mut interner = StringInterner::new();
//!
//! let a = interner.intern("fact");
//! let b = interner.intern("fact");
//! assert_eq!(a, b);
//! assert_eq!(interner.resolve(a), Some("fact"));
//! ```

use crate::symbol::Symbol;
use hashbrown::HashMap;
use std::rc::Rc;

/// String interner with bidirectional mapping.
#[derive(Debug, Clone)]
pub struct StringInterner {
    strings: Vec<Rc<str>>,
    symbols: HashMap<Rc<str>, Symbol>,
}

impl StringInterner {
    /// Creates an empty interner. Symbols are handed out in insertion order.
    ///
    /// ```
    /// use tyl_mem::StringInterner;
    ///
    /// let mut interner = StringInterner::new();
    /// assert!(interner.is_empty());
    /// assert_eq!(interner.intern("var").as_u32(), 0);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self {
            strings: Vec::with_capacity(64),
            symbols: HashMap::with_capacity(64),
        }
    }

    /// Interns a string, returning its symbol.
    pub fn intern(&mut self, s: &str) -> Symbol {
        if let Some(&sym) = self.symbols.get(s) {
            return sym;
        }

        let sym = Symbol::new(self.strings.len() as u32);
        let text: Rc<str> = Rc::from(s);
        self.strings.push(Rc::clone(&text));
        self.symbols.insert(text, sym);
        sym
    }

    /// Returns the symbol of an already interned string without adding it.
    #[must_use]
    pub fn get(&self, s: &str) -> Option<Symbol> {
        self.symbols.get(s).copied()
    }

    /// Resolves a symbol to its string; `None` for foreign symbols.
    #[must_use]
    pub fn resolve(&self, sym: Symbol) -> Option<&str> {
        self.strings.get(sym.as_usize()).map(|s| &**s)
    }

    /// Returns the number of interned strings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Returns true if no strings are interned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}
