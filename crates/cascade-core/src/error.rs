//! Error types for Cascade core.

use thiserror::Error;

/// The main error type for Cascade core operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Timer-related error.
    #[error("timer error: {0}")]
    Timer(#[from] TimerError),

    /// Signal-related error.
    #[error("signal error: {0}")]
    Signal(#[from] SignalError),
}

/// Timer-specific errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimerError {
    /// The timer ID is invalid, was cancelled, or has already fired.
    #[error("invalid or expired timer id")]
    InvalidTimerId,
}

/// Signal-specific errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SignalError {
    /// The connection ID is invalid or has already been disconnected.
    #[error("invalid or disconnected connection id")]
    InvalidConnection,
}

/// A specialized Result type for Cascade core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
