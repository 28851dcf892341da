//! Gateway error taxonomy
//!
//! Every failure a remote call can produce collapses into one of these
//! variants. Callers match exhaustively; there is no catch-all `Other`.

use thiserror::Error;

/// Classified failure from the health service gateway.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// The login exchange was refused (401 from `/auth/login`).
    #[error("{0}")]
    InvalidCredentials(String),

    /// Account creation was refused (4xx from `/auth/signup`).
    #[error("{0}")]
    SignupRejected(String),

    /// The service accepted the connection but refused the request.
    /// Carries the service's own `detail` message when one was decodable.
    #[error("{0}")]
    RemoteRejected(String),

    /// Transport never produced a usable response: connect failure,
    /// timeout, or an unreadable body.
    #[error("network error: {0}")]
    Network(String),

    /// The session cannot authenticate: either no token was available
    /// (raised client-side, the request never leaves the process) or the
    /// service answered 401 to a bearer-token request.
    #[error("not signed in")]
    Unauthenticated,
}

impl ApiError {
    pub fn invalid_credentials(message: impl Into<String>) -> Self {
        Self::InvalidCredentials(message.into())
    }

    pub fn signup_rejected(message: impl Into<String>) -> Self {
        Self::SignupRejected(message.into())
    }

    pub fn remote_rejected(message: impl Into<String>) -> Self {
        Self::RemoteRejected(message.into())
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// True when the failure means the stored session is no longer valid
    /// and the user must sign in again.
    pub fn is_session_dead(&self) -> bool {
        matches!(self, Self::Unauthenticated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displays_carry_the_service_detail() {
        let err = ApiError::invalid_credentials("Incorrect username or password");
        assert_eq!(err.to_string(), "Incorrect username or password");

        let err = ApiError::remote_rejected("Vitals validation failed");
        assert_eq!(err.to_string(), "Vitals validation failed");
    }

    #[test]
    fn network_errors_are_prefixed() {
        let err = ApiError::network("connection refused");
        assert_eq!(err.to_string(), "network error: connection refused");
    }

    #[test]
    fn unauthenticated_is_session_dead() {
        assert!(ApiError::Unauthenticated.is_session_dead());
        assert!(!ApiError::network("timeout").is_session_dead());
    }
}
