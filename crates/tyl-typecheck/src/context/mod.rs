//! Type checking context and environment management.
//!
//! - **TypeEnv**: arena of lexical scopes and class field tables
//! - **TypeRegistry**: named types and cached function annotations

pub mod env;
pub mod registry;

pub use env::{ScopeId, TypeEnv};
pub use registry::TypeRegistry;
