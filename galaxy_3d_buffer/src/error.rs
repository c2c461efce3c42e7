//! Error types for the Galaxy3D buffer subsystem
//!
//! Every variant is a programmer-contract violation: buffers fail immediately
//! and never perform a partial write, so a corrupted payload is never handed
//! to the graphics driver.

use std::fmt;

/// Result type for buffer operations
pub type Result<T> = std::result::Result<T, Error>;

/// Buffer errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Cursor or index outside the readable/writable window
    OutOfRange {
        /// Offending position or index (in the buffer's own unit)
        index: usize,
        /// Bound that was exceeded (limit or capacity)
        bound: usize,
    },

    /// A write needs more room than the buffer may provide
    Overflow {
        /// Capacity the operation needed
        required: usize,
        /// Capacity available (current capacity, or the ceiling when auto-resize is on)
        capacity: usize,
    },

    /// Caller-supplied slice, offset, length or descriptor is invalid
    InvalidArgument(String),

    /// Operation not allowed in the current state (e.g. `reset` without `mark`)
    InvalidState(String),

    /// Mutation attempted on a read-only buffer
    ReadOnly,

    /// Shared view whose owning storage was released or no longer covers it
    Detached,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::OutOfRange { index, bound } => {
                write!(f, "Index out of range: {} (bound: {})", index, bound)
            }
            Error::Overflow { required, capacity } => {
                write!(f, "Buffer overflow: {} required, {} available", required, capacity)
            }
            Error::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            Error::InvalidState(msg) => write!(f, "Invalid state: {}", msg),
            Error::ReadOnly => write!(f, "Buffer is read-only"),
            Error::Detached => write!(f, "Shared view detached from its storage"),
        }
    }
}

impl std::error::Error for Error {}

// ===== ERROR MACROS =====

/// Log an error (with file:line) and return it from the current function
///
/// # Example
///
/// ```ignore
/// buffer_bail!("galaxy3d::ByteBuffer", Error::ReadOnly);
/// ```
#[macro_export]
macro_rules! buffer_bail {
    ($source:expr, $error:expr) => {
        return Err($crate::buffer_err!($source, $error))
    };
}

/// Log an error (with file:line) and evaluate to it
///
/// Useful inside `ok_or_else` / `map_err` closures.
#[macro_export]
macro_rules! buffer_err {
    ($source:expr, $error:expr) => {{
        let error: $crate::galaxy3d::Error = $error;
        $crate::log::log_detailed(
            $crate::log::LogSeverity::Error,
            $source,
            format!("{}", error),
            file!(),
            line!(),
        );
        error
    }};
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
