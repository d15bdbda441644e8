//! Upstream client error types.

use super::auth::CredentialsError;

/// Errors from a single upstream request.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    /// Network failure or timeout reaching the upstream
    #[error("upstream unreachable: {0}")]
    Unreachable(#[from] reqwest::Error),

    /// Upstream answered with a non-2xx status
    #[error("upstream returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// Response body was not the JSON shape we expected
    #[error("malformed upstream response: {message}")]
    Malformed { message: String, body: String },

    /// The detail endpoint had nothing for this service (cancelled, expired,
    /// or an unusable UID in a search result)
    #[error("no detail available for service {uid:?}: {reason}")]
    DetailUnavailable { uid: String, reason: &'static str },

    /// The request limiter was shut down
    #[error("upstream request limiter closed")]
    LimiterClosed,
}

impl UpstreamError {
    /// The upstream HTTP status, if the upstream answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            UpstreamError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the request was abandoned because it took too long.
    pub fn is_timeout(&self) -> bool {
        matches!(self, UpstreamError::Unreachable(e) if e.is_timeout())
    }
}

/// Errors building an upstream client.
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error("invalid credentials: {0}")]
    Credentials(#[from] CredentialsError),

    #[error("credentials cannot be sent as an HTTP header")]
    InvalidHeader,

    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = UpstreamError::Status {
            status: 500,
            body: "Internal Server Error".into(),
        };
        assert_eq!(
            err.to_string(),
            "upstream returned status 500: Internal Server Error"
        );
        assert_eq!(err.status(), Some(500));

        let err = UpstreamError::Malformed {
            message: "expected value at line 1 column 1".into(),
            body: "<html>".into(),
        };
        assert!(err.to_string().contains("malformed upstream response"));
        assert_eq!(err.status(), None);
        assert!(!err.is_timeout());

        let err = UpstreamError::DetailUnavailable {
            uid: "G67890".into(),
            reason: "not found upstream",
        };
        assert_eq!(
            err.to_string(),
            "no detail available for service \"G67890\": not found upstream"
        );

        let err = SetupError::from(CredentialsError::EmptyPassword);
        assert_eq!(
            err.to_string(),
            "invalid credentials: upstream password is empty"
        );
    }
}
