//! `tyl` type checker: static checking for a small typed Lisp.
//!
//! The checker walks an expression tree and either produces its type or
//! rejects it with the first type error it finds, without evaluating
//! anything.
//!
//! - **types**: the type model and its equality protocol
//! - **context**: the scope arena and the type registry
//! - **check**: the checking engine
//! - **error**: type errors
//!
//! # Example
//!
//! ```
//! use tyl_typecheck::{Checker, ErrorKind};
//!
//! let mut checker = Checker::new();
//! checker.check_source("(def id <T> ((x T)) -> T x)").unwrap();
//!
//! let ty = checker.check_source("(id <number> 5)").unwrap();
//! assert_eq!(ty.name(), "number");
//!
//! let err = checker.check_source("(id 5)").unwrap_err();
//! assert_eq!(
//!     err.as_type_error().map(|e| e.kind()),
//!     Some(ErrorKind::MissingGenericActualTypes)
//! );
//! ```

#![warn(missing_docs)]

pub mod check;
pub mod checker;
pub mod context;
pub mod error;
pub mod options;
pub mod types;

pub use checker::Checker;
pub use error::{Error, ErrorKind, Result, TypeError};
pub use options::Options;
pub use types::Ty;
