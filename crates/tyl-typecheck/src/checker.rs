//! The public checker.

use crate::check::{self, Context};
use crate::error::{Error, Result};
use crate::options::Options;
use crate::types::Ty;
use tyl_log::{debug, info, warn};
use tyl_syntax::Sexpr;

/// A type checker holding one program's environment and registry.
///
/// Declarations persist between calls, so a program can be checked one
/// top-level expression at a time. Independent programs should use
/// independent checkers.
///
/// # Example
///
/// ```
/// use tyl_typecheck::Checker;
///
/// let mut checker = Checker::new();
/// let ty = checker
///     .check_source("(def fact ((n number)) -> number (if (== n 0) 1 (* n (fact (- n 1)))))")
///     .unwrap();
/// assert_eq!(ty.name(), "Fn<number<number>>");
/// ```
#[derive(Debug)]
pub struct Checker {
    cx: Context,
}

impl Checker {
    /// Creates a checker with default options.
    pub fn new() -> Self {
        Self::with_options(Options::default())
    }

    /// Creates a checker configured from the process environment.
    ///
    /// Initialises the global logger from `TYL_LOG`/`NO_COLOR` and reads
    /// [`Options::from_env`]. A bad `TYL_LOG` value is reported and ignored.
    pub fn from_env() -> Self {
        if let Err(err) = tyl_log::init_from_env() {
            warn!("ignoring TYL_LOG: {}", err);
        }
        Self::with_options(Options::from_env())
    }

    /// Creates a checker with the given options.
    pub fn with_options(options: Options) -> Self {
        Self {
            cx: Context::new(options),
        }
    }

    /// The options this checker runs with.
    pub fn options(&self) -> &Options {
        &self.cx.options
    }

    /// Type checks one top-level expression.
    ///
    /// A top-level `begin` is checked directly in the global scope, so its
    /// declarations stay visible to later calls.
    pub fn check(&mut self, expr: &Sexpr) -> Result<Ty> {
        let global = self.cx.env.global();
        let ty = check::check_body(&mut self.cx, expr, global)?;
        debug!("top-level expression has type {}", ty);
        Ok(ty)
    }

    /// Type checks a sequence of top-level expressions in the global scope,
    /// stopping at the first error. An empty program has type `null`.
    pub fn check_program(&mut self, program: &[Sexpr]) -> Result<Ty> {
        info!("checking {} top-level expressions", program.len());
        let global = self.cx.env.global();
        check::check_block(&mut self.cx, program, global)
    }

    /// Reads `source` and type checks the resulting program.
    pub fn check_source(&mut self, source: &str) -> std::result::Result<Ty, Error> {
        let program = tyl_syntax::read(source)?;
        Ok(self.check_program(&program)?)
    }

    /// Looks a registered type up by name.
    pub fn lookup_type(&self, name: &str) -> Option<&Ty> {
        self.cx.registered(name)
    }

    /// Looks a global binding up by name.
    pub fn global_type(&self, name: &str) -> Option<&Ty> {
        self.cx.try_lookup(self.cx.env.global(), name)
    }
}

impl Default for Checker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tyl_syntax::read_one;

    #[test]
    fn test_checker_new_has_prelude() {
        let checker = Checker::new();
        assert_eq!(checker.global_type("VERSION").map(Ty::name), Some("string"));
        assert_eq!(
            checker.global_type("typeof").map(Ty::name),
            Some("Fn<string<any>>")
        );
        assert!(checker.lookup_type("number").is_some());
    }

    #[test]
    fn test_checker_from_env() {
        let mut checker = Checker::from_env();
        assert!(checker.options().prelude);
        assert_eq!(checker.check_source("(square 3)").unwrap().name(), "number");
    }

    #[test]
    fn test_checker_without_prelude() {
        let checker = Checker::with_options(Options::default().prelude(false));
        assert!(checker.global_type("sum").is_none());
    }

    #[test]
    fn test_top_level_begin_is_global() {
        let mut checker = Checker::new();
        let program = read_one("(begin (var x 10) (type int number))").unwrap();
        checker.check(&program).unwrap();

        assert_eq!(checker.global_type("x").map(Ty::name), Some("number"));
        assert!(checker.lookup_type("int").is_some());
    }

    #[test]
    fn test_check_program_empty() {
        let mut checker = Checker::new();
        assert_eq!(checker.check_program(&[]).unwrap().name(), "null");
    }

    #[test]
    fn test_check_source_read_error() {
        let mut checker = Checker::new();
        let err = checker.check_source("(var x").unwrap_err();
        assert!(matches!(err, Error::Read(_)));
    }
}
