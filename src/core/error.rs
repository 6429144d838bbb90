// Author: Dustin Pilgrim
// License: MIT

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A configuration value failed validation.
    ///
    /// Examples:
    /// - `duration` is not a number, or not finite
    /// - `keepalive` is not a number
    InvalidConfig(ConfigError),

    /// A reset carried a date-time string that could not be parsed.
    /// The previous target stays active.
    InvalidTarget(String),

    /// A reset asked for a target that is not later than now.
    PastTarget,

    /// The custom keepalive handler failed; it is disabled from now on.
    KeepaliveCallbackFailure(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidDuration(String),
    InvalidKeepalive(String),
}

impl Error {
    /// Warnings leave the controller exactly as it was.
    pub fn is_warning(&self) -> bool {
        matches!(self, Error::PastTarget)
    }
}

// ---------------- Display ----------------

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidConfig(e) => write!(f, "{e}"),
            Error::InvalidTarget(raw) =>
                write!(f, "invalid target time '{raw}'"),
            Error::PastTarget =>
                write!(f, "target time is not in the future"),
            Error::KeepaliveCallbackFailure(e) =>
                write!(f, "keepalive handler failed: {e}"),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidDuration(raw) =>
                write!(f, "invalid duration '{raw}'"),
            ConfigError::InvalidKeepalive(raw) =>
                write!(f, "invalid keepalive threshold '{raw}'"),
        }
    }
}

impl std::error::Error for Error {}
