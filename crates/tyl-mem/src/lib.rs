//! Interned names for the `tyl` checker.
//!
//! - **Symbol**: a 32-bit handle standing for an interned string
//! - **StringInterner**: the owning table mapping names to symbols and back

pub mod interner;
pub mod symbol;

pub use interner::StringInterner;
pub use symbol::Symbol;
