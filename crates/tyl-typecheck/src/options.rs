//! Checker configuration.

use std::env;

/// Environment variable read by [`Options::from_env`].
pub const STRICT_OPERANDS_ENV: &str = "TYL_STRICT_OPERANDS";

/// Knobs for a [`Checker`](crate::Checker).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    /// Enforce the operand table: `+` takes numbers or strings, `- * /`
    /// take numbers only. When off, arithmetic only requires both operands
    /// to have equal types.
    pub strict_operands: bool,
    /// Bind the prelude (`VERSION`, `sum`, `square`, `typeof`) in the
    /// global scope.
    pub prelude: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            strict_operands: true,
            prelude: true,
        }
    }
}

impl Options {
    /// Defaults, overridden by `TYL_STRICT_OPERANDS` when it is set.
    pub fn from_env() -> Self {
        Self::default().strict_operands_from(env::var(STRICT_OPERANDS_ENV).ok().as_deref())
    }

    /// Applies a raw `TYL_STRICT_OPERANDS` value; unset or unparsable
    /// values keep the current setting.
    fn strict_operands_from(self, value: Option<&str>) -> Self {
        match value.and_then(parse_flag) {
            Some(strict) => self.strict_operands(strict),
            None => self,
        }
    }

    /// Sets [`Options::strict_operands`].
    pub fn strict_operands(mut self, strict: bool) -> Self {
        self.strict_operands = strict;
        self
    }

    /// Sets [`Options::prelude`].
    pub fn prelude(mut self, prelude: bool) -> Self {
        self.prelude = prelude;
        self
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
