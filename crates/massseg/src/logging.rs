//! Tracing subscriber setup for the `massseg` binary.
//!
//! Logs go to stderr so the report on stdout stays clean. `RUST_LOG`
//! overrides the level picked from the command line flags.

use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, util::TryInitError, EnvFilter};

/// Verbosity level derived from CLI flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// `-q`: warnings and errors.
    Quiet,
    /// Progress of the sweep.
    Normal,
    /// `-v`: per-threshold and per-example detail.
    Verbose,
}

impl Verbosity {
    /// Verbose wins when both flags are given.
    pub const fn from_flags(verbose: bool, quiet: bool) -> Self {
        if verbose {
            Self::Verbose
        } else if quiet {
            Self::Quiet
        } else {
            Self::Normal
        }
    }

    pub const fn default_level(self) -> Level {
        match self {
            Self::Quiet => Level::WARN,
            Self::Normal => Level::INFO,
            Self::Verbose => Level::DEBUG,
        }
    }
}

/// Installs the global subscriber.
///
/// # Errors
///
/// Returns an error if a global subscriber is already set.
pub fn init_tracing(verbosity: Verbosity) -> Result<(), TryInitError> {
    let stderr_is_tty = std::io::IsTerminal::is_terminal(&std::io::stderr());

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(stderr_is_tty)
        .with_target(verbosity == Verbosity::Verbose);

    tracing_subscriber::registry()
        .with(build_env_filter(verbosity))
        .with(fmt_layer)
        .try_init()
}

fn build_env_filter(verbosity: Verbosity) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.default_level().as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbose_flag_takes_precedence() {
        assert_eq!(Verbosity::from_flags(true, true), Verbosity::Verbose);
        assert_eq!(Verbosity::from_flags(false, true), Verbosity::Quiet);
        assert_eq!(Verbosity::from_flags(false, false), Verbosity::Normal);
    }

    #[test]
    fn levels_widen_with_verbosity() {
        assert!(Verbosity::Quiet.default_level() < Verbosity::Normal.default_level());
        assert!(Verbosity::Normal.default_level() < Verbosity::Verbose.default_level());
    }
}
