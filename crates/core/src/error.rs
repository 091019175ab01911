//! Error types for Runnel.
//!
//! Errors flowing through a producer travel on its own `E` channel. The type
//! here only covers the handful of library calls that can be refused.

use core::fmt;

/// Result type alias for Runnel operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Identifier of a handler group registered in a dispatch queue.
pub type HandlerId = u64;

/// Error types for Runnel library calls.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// The consumer already received a terminal signal or was terminated.
    Terminated,
    /// The dispatch queue was shut down.
    QueueClosed,
    /// No handler group with this id is registered.
    UnknownHandler {
        id: HandlerId,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Terminated => write!(f, "Consumer already terminated"),
            Error::QueueClosed => write!(f, "Dispatch queue is shut down"),
            Error::UnknownHandler { id } => write!(f, "Unknown handler group: {}", id),
        }
    }
}

impl Error {
    /// Creates an unknown handler error.
    pub fn unknown_handler(id: HandlerId) -> Self {
        Error::UnknownHandler { id }
    }

    /// Returns true if retrying the call can never succeed.
    #[inline]
    pub fn is_permanent(&self) -> bool {
        matches!(self, Error::Terminated | Error::QueueClosed)
    }
}
