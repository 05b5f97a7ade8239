//! # Error Types — Core Primitive Failures
//!
//! Errors produced while constructing or parsing the foundational types.
//! All errors use `thiserror` for derive-based `Display` and `Error`
//! implementations and carry enough context to identify the offending
//! input without re-running the operation.

use thiserror::Error;

/// Errors from constructing or parsing core primitives.
#[derive(Error, Debug)]
pub enum CoreError {
    /// A timestamp string failed to parse or used a non-UTC offset.
    #[error("timestamp error: {0}")]
    Timestamp(String),

    /// A monetary value was negative or overflowed minor-unit arithmetic.
    #[error("money error: {0}")]
    Money(String),

    /// A coordinate was outside the valid latitude/longitude range.
    #[error("coordinates error: {0}")]
    Coordinates(String),
}
