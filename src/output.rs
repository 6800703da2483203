//! Process-wide output settings.
//!
//! Model answers are written to stdout so they can be piped. Everything
//! else (status lines, spinner, warnings, errors) goes to stderr.
//! `--quiet` silences status and info lines but never warnings or errors.
//! Color is off with `--no-color` or when `NO_COLOR` is set
//! (<https://no-color.org/>).

use std::sync::OnceLock;

static SETTINGS: OnceLock<OutputConfig> = OnceLock::new();

/// Flags set once from the command line.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    pub quiet: bool,
    pub no_color: bool,
}

impl OutputConfig {
    /// Settings used before [`init`] runs, e.g. in unit tests.
    pub fn from_env() -> Self {
        Self {
            quiet: false,
            no_color: std::env::var_os("NO_COLOR").is_some(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Installs the settings. Only the first call has an effect.
pub fn init(config: OutputConfig) {
    if SETTINGS.set(config).is_err() {
        log::debug!("output settings already initialized");
    }
}

pub fn config() -> &'static OutputConfig {
    SETTINGS.get_or_init(OutputConfig::from_env)
}

pub fn is_quiet() -> bool {
    config().quiet
}

pub fn is_no_color() -> bool {
    config().no_color
}

/// Status line on stderr, suppressed by `--quiet`.
#[macro_export]
macro_rules! status {
    ($($arg:tt)*) => {
        if !$crate::output::is_quiet() {
            eprintln!($($arg)*);
        }
    };
}

/// Informational line on stderr, suppressed by `--quiet`.
#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        if !$crate::output::is_quiet() {
            eprintln!($($arg)*);
        }
    };
}

/// Warning on stderr, shown even with `--quiet`.
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        eprintln!($($arg)*);
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_not_quiet() {
        assert!(!OutputConfig::default().quiet);
    }

    #[test]
    fn test_macros_expand() {
        crate::status!("status {}", 1);
        crate::info!("info {}", 2);
        crate::warn!("warn {}", 3);
    }
}
