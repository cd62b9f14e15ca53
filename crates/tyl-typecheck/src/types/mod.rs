//! Type representation and operations.
//!
//! - **Ty**: the checked types (primitives, functions, aliases, unions,
//!   classes, generic templates) and their equality protocol
//! - **TypeExpr**: the parsed form of a type annotation string
//! - **Display**: canonical names, used both for messages and as keys

pub mod annotation;
pub mod display;
pub mod ty;

pub use annotation::{AnnotationError, TypeExpr, parse_type_list};
pub use ty::{AliasTy, ClassTy, FnTy, GenericFn, PrimTy, Ty, UnionTy};
