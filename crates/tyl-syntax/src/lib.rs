//! `tyl` syntax: the expression tree the checker consumes, and a reader that
//! builds it from text.
//!
//! # Modules
//!
//! - [`sexpr`] - atoms and lists
//! - [`reader`] - text to [`Sexpr`]
//! - [`error`] - reader errors
//!
//! # Example
//!
//! ```
//! use tyl_syntax::{read, Sexpr};
//!
//! let forms = read("(var x 10) ; trailing comment").unwrap();
//! assert_eq!(forms.len(), 1);
//! assert_eq!(forms[0].tag(), Some("var"));
//! assert_eq!(forms[0].to_string(), "(var x 10)");
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod reader;
pub mod sexpr;

pub use error::{ReadError, ReadResult};
pub use reader::{Reader, read, read_one};
pub use sexpr::Sexpr;
