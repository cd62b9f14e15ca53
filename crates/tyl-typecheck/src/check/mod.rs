//! The checking engine.
//!
//! - **form**: classification of raw expressions into checked forms
//! - **expr**: the `tc` dispatch, operators, variables, blocks, control flow
//! - **decl**: functions, aliases, unions, classes and member access
//! - **call**: calls and generic instantiation
//! - **ty**: annotation resolution

pub mod call;
pub mod context;
pub mod decl;
pub mod expr;
pub mod form;
pub mod ty;

pub use context::Context;
pub use expr::{check_block, check_body, tc};
pub use form::{Form, classify};
pub use ty::resolve_annotation;
