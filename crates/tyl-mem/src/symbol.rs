//! Symbol type for interned strings.
//!
//! # Examples
//!
//! ```
//! use tyl_mem::Symbol;
//!
//! let a = Symbol::new(42);
//! assert_eq!(a, Symbol::new(42));
//! assert_ne!(a, Symbol::new(7));
//! ```

use std::fmt;

/// A handle to a string owned by a [`crate::StringInterner`].
///
/// Comparing two symbols from the same interner is comparing their strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol(u32);

impl Symbol {
    /// Creates a symbol from a raw ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    /// Returns the raw ID as an index.
    #[must_use]
    pub const fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({})", self.0)
    }
}

impl From<u32> for Symbol {
    fn from(id: u32) -> Self {
        Self(id)
    }
}
