//! Logging macros with verbosity level control.
//!
//! Each macro checks the caller's verbosity before formatting anything and then
//! emits a `tracing` event at INFO, so the component's verbosity alone decides
//! which records exist and an INFO-level subscriber shows all of them.
//! - 0: SILENT (warnings only, via `tracing::warn!` directly)
//! - 1: CHANGES (structural changes: rehash, graph reset, computed routes)
//! - 2: CHECKS (per-operation decisions: rotations, rejected inserts)
//! - 3: DEBUG (full algorithm internals: probe steps, relaxations)
//!
//! A host without its own subscriber calls [`init_logging`] once to get the
//! records on stderr.

use thiserror::Error;
use tracing_subscriber::{fmt, EnvFilter};

/// Verbosity level constants.
pub const VERBOSITY_SILENT: u8 = 0;
pub const VERBOSITY_CHANGES: u8 = 1;
pub const VERBOSITY_CHECKS: u8 = 2;
pub const VERBOSITY_DEBUG: u8 = 3;

#[derive(Error, Debug)]
pub enum LoggingError {
    #[error("Invalid log filter: {0}")]
    InvalidFilter(String),
    #[error("Logging already initialized")]
    AlreadyInitialized,
}

/// Install a global stderr subscriber filtered by `level` (an `EnvFilter`
/// directive such as `"info"` or `"tableside_rust=warn"`).
pub fn init_logging(level: &str) -> Result<(), LoggingError> {
    fmt()
        .with_env_filter(
            EnvFilter::try_new(level).map_err(|e| LoggingError::InvalidFilter(e.to_string()))?,
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|_| LoggingError::AlreadyInitialized)
}

/// Log at CHANGES level (verbosity >= 1).
///
/// Used for: rehashes, graph re-initialization, route summaries.
#[macro_export]
macro_rules! log_changes {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_CHANGES {
            ::tracing::info!($($arg)*);
        }
    };
}

/// Log at CHECKS level (verbosity >= 2).
///
/// Used for: rotations, duplicate keys, capacity rejections.
#[macro_export]
macro_rules! log_checks {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_CHECKS {
            ::tracing::info!($($arg)*);
        }
    };
}

/// Log at DEBUG level (verbosity >= 3).
///
/// Used for: probe sequences, edge relaxations, heap sifts.
#[macro_export]
macro_rules! log_debug {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_DEBUG {
            ::tracing::info!($($arg)*);
        }
    };
}
