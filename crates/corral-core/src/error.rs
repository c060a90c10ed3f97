//! Error types for pool operations.

use std::fmt;

/// The primary error type for pool checkout operations.
#[derive(Debug)]
pub enum Error {
    /// Pool at capacity with no idle connection and blocking disabled.
    Exhausted,
    /// Pool at capacity, blocking enabled, and the wait elapsed with no
    /// connection freed.
    WaitTimeout,
    /// A pooled connection failed its health check and was discarded.
    Unhealthy(HealthError),
    /// The pool was used before `init` ran.
    NotInitialized,
    /// `init` was called on a pool that is already initialized.
    AlreadyInitialized,
}

/// A health-check failure reported by a [`ManageConnection`] probe.
///
/// [`ManageConnection`]: crate::manage::ManageConnection
#[derive(Debug)]
pub struct HealthError {
    pub message: String,
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl HealthError {
    /// Create a health error with only a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Create a health error wrapping an underlying probe failure.
    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

impl Error {
    /// Is this a retryable error (exhaustion or checkout timeout)?
    ///
    /// A retryable failure means the pool itself is intact and a later
    /// checkout may succeed once a caller returns a connection.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Exhausted | Error::WaitTimeout)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Exhausted => write!(f, "pool exhausted, no connection available"),
            Error::WaitTimeout => write!(f, "pool exhausted, wait timed out"),
            Error::Unhealthy(e) => write!(f, "connection failed health check: {}", e.message),
            Error::NotInitialized => write!(f, "pool has not been initialized"),
            Error::AlreadyInitialized => write!(f, "pool is already initialized"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Unhealthy(e) => e
                .source
                .as_deref()
                .map(|err| err as &(dyn std::error::Error + 'static)),
            _ => None,
        }
    }
}

impl fmt::Display for HealthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for HealthError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|err| err as &(dyn std::error::Error + 'static))
    }
}

impl From<HealthError> for Error {
    fn from(err: HealthError) -> Self {
        Error::Unhealthy(err)
    }
}

/// Result type alias for pool operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_flags() {
        assert!(Error::Exhausted.is_retryable());
        assert!(Error::WaitTimeout.is_retryable());
        assert!(!Error::NotInitialized.is_retryable());
        assert!(!Error::Unhealthy(HealthError::new("ping failed")).is_retryable());
    }

    #[test]
    fn unhealthy_carries_source() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset by peer");
        let err = Error::from(HealthError::with_source("ping failed", io));

        assert!(matches!(err, Error::Unhealthy(_)));
        let source = std::error::Error::source(&err).expect("source");
        assert!(source.to_string().contains("reset by peer"));
    }

    #[test]
    fn display_messages() {
        assert_eq!(
            Error::Exhausted.to_string(),
            "pool exhausted, no connection available"
        );
        assert_eq!(
            Error::WaitTimeout.to_string(),
            "pool exhausted, wait timed out"
        );
    }
}
