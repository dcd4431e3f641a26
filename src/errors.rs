//! Error handling for the voting machine panel
//!
//! Nothing in this widget is fatal to the user: the vote path degrades to a
//! safe idle state on every failure. The [`Error`] type exists for the store
//! and configuration internals, where callers still need to know what went
//! wrong before deciding to swallow it.

/// Result type alias for the panel
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the panel
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Persistent store errors (read or write against the key-value store)
    #[error("Storage error: {message}")]
    Storage { message: String },

    /// Vote session errors
    #[error("Session error: {message}")]
    Session { message: String },

    /// Confirmation signal errors (audio sink, haptics)
    #[error("Signal error: {message}")]
    Signal { message: String },

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic internal errors
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl Error {
    /// Create a new storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Create a new session error
    pub fn session(message: impl Into<String>) -> Self {
        Self::Session {
            message: message.into(),
        }
    }

    /// Create a new signal error
    pub fn signal(message: impl Into<String>) -> Self {
        Self::Signal {
            message: message.into(),
        }
    }

    /// Create a new internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

/// Convenience macros for creating specific error types
#[macro_export]
macro_rules! storage_error {
    ($msg:expr) => {
        $crate::Error::storage($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::Error::storage(format!($fmt, $($arg)*))
    };
}

#[macro_export]
macro_rules! session_error {
    ($msg:expr) => {
        $crate::Error::session($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::Error::session(format!($fmt, $($arg)*))
    };
}

#[macro_export]
macro_rules! signal_error {
    ($msg:expr) => {
        $crate::Error::signal($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::Error::signal(format!($fmt, $($arg)*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let storage_err = Error::storage("test storage error");
        assert!(matches!(storage_err, Error::Storage { .. }));

        let session_err = Error::session("test session error");
        assert!(matches!(session_err, Error::Session { .. }));

        let signal_err = Error::signal("test signal error");
        assert!(matches!(signal_err, Error::Signal { .. }));
    }

    #[test]
    fn test_error_macros() {
        let storage_err = storage_error!("test error");
        assert!(matches!(storage_err, Error::Storage { .. }));

        let session_err = session_error!("row {}", 3);
        assert!(matches!(session_err, Error::Session { .. }));
    }
}
