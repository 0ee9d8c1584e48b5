//! Log level selection and subscriber construction.
//!
//! Nothing here installs a global subscriber. [`dispatch`] returns a
//! [`Dispatch`] the caller scopes to the work it runs:
//!
//! ```no_run
//! use tracing::instrument::WithSubscriber;
//! use vehicle_history_reports::logging::{self, LogLevel};
//!
//! # async fn run() {}
//! # async fn example() {
//! run().with_subscriber(logging::dispatch(LogLevel::Debug)).await;
//! # }
//! ```
//!
//! `RUST_LOG`, when set, replaces the level-derived filter.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;

use tracing::Dispatch;
use tracing_subscriber::EnvFilter;

use crate::error::{Error, Result};

/// Targets the level applies to: this library and the bundled binary.
const TARGETS: [&str; 2] = ["vehicle_history_reports", "vin_scraper"];

// ============================================================================
// LogLevel
// ============================================================================

/// Verbosity accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum LogLevel {
    /// Progress messages.
    #[default]
    Info,
    /// Everything, including control-channel traffic.
    Debug,
    /// Failures only.
    Error,
}

impl LogLevel {
    /// Lowercase name as used in filter directives.
    #[inline]
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Error => "error",
        }
    }

    /// Filter directive enabling this level for the crate's targets.
    #[must_use]
    pub fn directive(&self) -> String {
        TARGETS
            .iter()
            .map(|target| format!("{target}={}", self.as_str()))
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str().to_uppercase())
    }
}

impl FromStr for LogLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            "error" => Ok(Self::Error),
            other => Err(Error::config(format!(
                "Unknown log level '{other}', expected INFO, DEBUG or ERROR"
            ))),
        }
    }
}

// ============================================================================
// Dispatch
// ============================================================================

/// Builds a stderr subscriber filtered at `level`.
#[must_use]
pub fn dispatch(level: LogLevel) -> Dispatch {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.directive()));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    Dispatch::new(subscriber)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("INFO".parse::<LogLevel>().expect("parse"), LogLevel::Info);
        assert_eq!("debug".parse::<LogLevel>().expect("parse"), LogLevel::Debug);
        assert_eq!("Error".parse::<LogLevel>().expect("parse"), LogLevel::Error);
    }

    #[test]
    fn test_parse_rejects_unknown_level() {
        let err = "verbose".parse::<LogLevel>().expect_err("unknown level");
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn test_display_round_trips() {
        for level in [LogLevel::Info, LogLevel::Debug, LogLevel::Error] {
            assert_eq!(level.to_string().parse::<LogLevel>().expect("parse"), level);
        }
        assert_eq!(LogLevel::default().to_string(), "INFO");
    }

    #[test]
    fn test_directive_covers_library_and_binary() {
        assert_eq!(
            LogLevel::Debug.directive(),
            "vehicle_history_reports=debug,vin_scraper=debug"
        );
    }

    #[test]
    fn test_dispatch_is_scoped() {
        let dispatch = dispatch(LogLevel::Error);
        tracing::dispatcher::with_default(&dispatch, || {
            tracing::error!(vin = "1HGCM82633A004352", "scoped event");
        });
    }
}
