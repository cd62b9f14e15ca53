//! Leveled logging for the `tyl` crates.
//!
//! Messages go to stderr so that a host embedding the checker keeps stdout
//! to itself. The minimum level is process-wide and can be set in code or
//! taken from the `TYL_LOG` environment variable.
//!
//! # Example
//!
//! ```
//! use tyl_log::{debug, info, Level};
//!
//! tyl_log::set_level(Level::Debug);
//!
//! info!("checking {} forms", 3);
//! debug!("scope depth: {:?}", vec![0, 1]);
//! ```

use std::fmt::Arguments;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

/// Environment variable consulted by [`init_from_env`].
pub const LEVEL_ENV: &str = "TYL_LOG";

/// Log levels, most severe first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    /// Failures the caller must see
    Error = 0,
    /// Suspicious but recoverable situations
    Warn = 1,
    /// High-level progress
    Info = 2,
    /// Declarations, instantiations and other checker decisions
    Debug = 3,
    /// Every dispatched form
    Trace = 4,
}

impl Level {
    const fn color_code(&self) -> &'static str {
        match self {
            Level::Error => "\x1b[31m",
            Level::Warn => "\x1b[33m",
            Level::Info => "\x1b[32m",
            Level::Debug => "\x1b[36m",
            Level::Trace => "\x1b[35m",
        }
    }

    /// Returns the string representation of this log level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Level::Error => "ERROR",
            Level::Warn => "WARN",
            Level::Info => "INFO",
            Level::Debug => "DEBUG",
            Level::Trace => "TRACE",
        }
    }

    const fn from_u8(raw: u8) -> Self {
        match raw {
            0 => Level::Error,
            1 => Level::Warn,
            2 => Level::Info,
            3 => Level::Debug,
            _ => Level::Trace,
        }
    }

    /// Parses a level name, case-insensitively.
    ///
    /// ```
    /// use tyl_log::Level;
    ///
    /// assert_eq!(Level::from_str("debug"), Ok(Level::Debug));
    /// assert!(Level::from_str("loud").is_err());
    /// ```
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.trim().to_uppercase().as_str() {
            "ERROR" => Ok(Level::Error),
            "WARN" | "WARNING" => Ok(Level::Warn),
            "INFO" => Ok(Level::Info),
            "DEBUG" => Ok(Level::Debug),
            "TRACE" => Ok(Level::Trace),
            _ => Err(format!("Invalid log level: {}", s)),
        }
    }
}

/// Process-wide logger state.
pub struct Logger {
    level: AtomicU8,
    color: AtomicBool,
}

impl Logger {
    const fn new(level: Level) -> Self {
        Logger {
            level: AtomicU8::new(level as u8),
            color: AtomicBool::new(true),
        }
    }

    /// Sets the minimum log level.
    pub fn set_level(&self, level: Level) {
        self.level.store(level as u8, Ordering::SeqCst);
    }

    /// Returns the current minimum log level.
    pub fn level(&self) -> Level {
        Level::from_u8(self.level.load(Ordering::Relaxed))
    }

    /// Checks if a message at the given level would be logged.
    pub fn enabled(&self, level: Level) -> bool {
        level as u8 <= self.level.load(Ordering::Relaxed)
    }

    /// Turns ANSI colouring on or off.
    pub fn set_color(&self, color: bool) {
        self.color.store(color, Ordering::SeqCst);
    }

    fn color(&self) -> bool {
        self.color.load(Ordering::Relaxed)
    }
}

static LOGGER: OnceLock<Logger> = OnceLock::new();

/// Returns the global logger, creating it at `Level::Warn` on first use.
///
/// The checker is quiet unless asked otherwise, so the default sits below
/// `Info`.
pub fn get_logger() -> &'static Logger {
    LOGGER.get_or_init(|| Logger::new(Level::Warn))
}

/// Sets the minimum log level for the global logger.
pub fn set_level(level: Level) {
    get_logger().set_level(level);
}

/// Sets the minimum log level from a string.
///
/// ```
/// tyl_log::set_level_from_str("trace").unwrap();
/// ```
pub fn set_level_from_str(s: &str) -> Result<(), String> {
    let level = Level::from_str(s)?;
    set_level(level);
    Ok(())
}

/// Configures the global logger from the process environment.
///
/// `TYL_LOG` selects the level; an unset variable leaves the level alone and
/// an unparsable one is reported as an error. `NO_COLOR` (any value)
/// disables ANSI colours.
pub fn init_from_env() -> Result<(), String> {
    if std::env::var_os("NO_COLOR").is_some() {
        get_logger().set_color(false);
    }
    match std::env::var(LEVEL_ENV) {
        Ok(value) => set_level_from_str(&value),
        Err(_) => Ok(()),
    }
}

/// Writes one record. Called by the macros after the level check.
#[doc(hidden)]
pub fn __log_with_target(level: Level, target: &str, args: Arguments) {
    static RESET: &str = "\x1b[0m";

    let logger = get_logger();
    if !logger.enabled(level) {
        return;
    }

    let level_str = level.as_str();
    if logger.color() {
        let color = level.color_code();
        eprintln!("{color}[{level_str}]{RESET} {target}: {args}");
    } else {
        eprintln!("[{level_str}] {target}: {args}");
    }
}

/// Logs at an explicit level, tagging the record with the caller's module.
///
/// ```
/// use tyl_log::{log, Level};
///
/// log!(level: Level::Info, "registered {} types", 4);
/// ```
#[macro_export]
macro_rules! log {
    (level: $level:expr, $($arg:tt)*) => {
        {
            if $crate::get_logger().enabled($level) {
                $crate::__log_with_target(
                    $level,
                    module_path!(),
                    format_args!($($arg)*)
                );
            }
        }
    };
}

/// Logs a message at the Error level.
#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        $crate::log!(level: $crate::Level::Error, $($arg)*)
    };
}

/// Logs a message at the Warn level.
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        $crate::log!(level: $crate::Level::Warn, $($arg)*)
    };
}

/// Logs a message at the Info level.
#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        $crate::log!(level: $crate::Level::Info, $($arg)*)
    };
}

/// Logs a message at the Debug level.
#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {
        $crate::log!(level: $crate::Level::Debug, $($arg)*)
    };
}

/// Logs a message at the Trace level.
#[macro_export]
macro_rules! trace {
    ($($arg:tt)*) => {
        $crate::log!(level: $crate::Level::Trace, $($arg)*)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_ordering() {
        assert!(Level::Error < Level::Warn);
        assert!(Level::Warn < Level::Info);
        assert!(Level::Info < Level::Debug);
        assert!(Level::Debug < Level::Trace);
    }

    #[test]
    fn test_level_from_str() {
        assert_eq!(Level::from_str("error"), Ok(Level::Error));
        assert_eq!(Level::from_str("Warning"), Ok(Level::Warn));
        assert_eq!(Level::from_str(" info "), Ok(Level::Info));
        assert_eq!(Level::from_str("TRACE"), Ok(Level::Trace));
        assert!(Level::from_str("verbose").is_err());
    }

    #[test]
    fn test_level_round_trips_through_u8() {
        for level in [Level::Error, Level::Warn, Level::Info, Level::Debug, Level::Trace] {
            assert_eq!(Level::from_u8(level as u8), level);
        }
    }

    #[test]
    fn test_logger_level_filtering() {
        let logger = Logger::new(Level::Info);

        assert!(logger.enabled(Level::Error));
        assert!(logger.enabled(Level::Info));
        assert!(!logger.enabled(Level::Debug));

        logger.set_level(Level::Trace);
        assert!(logger.enabled(Level::Trace));
        assert_eq!(logger.level(), Level::Trace);
    }

    #[test]
    fn test_logger_color_toggle() {
        let logger = Logger::new(Level::Info);
        assert!(logger.color());
        logger.set_color(false);
        assert!(!logger.color());
    }

    #[test]
    fn test_set_level_from_str_rejects_garbage() {
        assert!(set_level_from_str("nope").is_err());
    }

    #[test]
    fn test_macros_do_not_panic() {
        debug!("declared {} as {}", "x", "number");
        trace!("form: {:?}", ["var", "x", "1"]);
    }
}
