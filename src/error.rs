//! Unified error types for the subsystem controller.
//!
//! A single `Error` enum that every layer converts into, keeping the
//! composition root's error handling uniform.  All variants are `Copy`
//! so they can be passed around the control loop without allocation.
//!
//! Only construction and lifecycle problems are errors.  A transition
//! guard that never becomes true is not an error (the machine holds its
//! state), and degraded sensor readings are passed through unchecked.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible operation in the crate funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Configuration is invalid or could not be parsed.
    Config(ConfigError),
    /// A state table does not line up with its state enum.
    StateTable(&'static str),
    /// The start / loop / stop contract was violated.
    Lifecycle(LifecycleError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::StateTable(name) => write!(f, "state table: {name} does not match its state enum"),
            Self::Lifecycle(e) => write!(f, "lifecycle: {e}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// JSON text was malformed or had the wrong shape.
    Parse { line: usize, column: usize },
    /// A field failed range validation.  Names the field.
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse { line, column } => {
                write!(f, "parse error at line {line}, column {column}")
            }
            Self::Invalid(field) => write!(f, "invalid value for {field}"),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse {
            line: e.line(),
            column: e.column(),
        }
    }
}

// ---------------------------------------------------------------------------
// Lifecycle errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleError {
    /// `start` was called while the loops were already running.
    AlreadyRunning,
    /// `tick` or `stop` was called before `start`.
    NotRunning,
}

impl fmt::Display for LifecycleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyRunning => write!(f, "loops already running"),
            Self::NotRunning => write!(f, "loops not running"),
        }
    }
}

impl From<LifecycleError> for Error {
    fn from(e: LifecycleError) -> Self {
        Self::Lifecycle(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
