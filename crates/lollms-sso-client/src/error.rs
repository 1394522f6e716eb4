//! Error types for the LoLLMs SSO client.
//!
//! Uses `thiserror` for structured error handling with automatic `From` implementations.

/// Why an introspection call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntrospectionFailure {
    /// The request never produced a response (connection, DNS, TLS, timeout).
    Transport,
    /// The backend answered with a non-2xx status.
    Status(u16),
    /// The backend answered 2xx with a body that is not JSON.
    Malformed,
    /// The backend reported the token as no longer active.
    Inactive,
}

/// Errors surfaced by [`SsoClient`](crate::client::SsoClient) and its collaborators.
#[derive(thiserror::Error, Debug)]
pub enum SsoError {
    /// Required configuration is missing.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// No token is stored; the user has to log in first.
    #[error("No SSO token found. Please login first.")]
    NotAuthenticated,

    /// The backend rejected the token or the request failed.
    #[error("{message}")]
    Introspection {
        /// Message taken from the backend when it provides one
        message: String,
        /// Failure category
        reason: IntrospectionFailure,
    },

    /// A persistent storage backend could not be written.
    #[error("Token storage error: {0}")]
    Storage(String),

    /// HTTP client construction failed.
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

impl SsoError {
    /// Create a configuration error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Create an introspection error.
    #[must_use]
    pub fn introspection(message: impl Into<String>, reason: IntrospectionFailure) -> Self {
        Self::Introspection { message: message.into(), reason }
    }

    /// Create a storage error.
    #[must_use]
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    /// Returns true if the backend reported the token inactive.
    ///
    /// The stored token has already been removed when this error is returned.
    #[must_use]
    pub const fn is_inactive(&self) -> bool {
        matches!(self, Self::Introspection { reason: IntrospectionFailure::Inactive, .. })
    }

    /// HTTP status of a rejected introspection request, if any.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Introspection { reason: IntrospectionFailure::Status(status), .. } => {
                Some(*status)
            }
            _ => None,
        }
    }
}

/// Result type alias for SSO operations.
pub type SsoResult<T> = Result<T, SsoError>;
