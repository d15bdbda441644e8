//! HTTP Basic Auth credentials for the upstream API.

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Error returned when credentials cannot form a usable token.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialsError {
    #[error("upstream username is empty")]
    EmptyUsername,

    #[error("upstream password is empty")]
    EmptyPassword,
}

/// Upstream username and password.
///
/// `Debug` never prints the password.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// The value of the `Authorization` header, including the `Basic ` prefix.
    pub fn header_value(&self) -> Result<String, CredentialsError> {
        basic_auth_token(&self.username, &self.password).map(|token| format!("Basic {token}"))
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Encode `username:password` as a Basic Auth token.
///
/// Empty usernames and passwords are rejected rather than producing a token
/// the upstream would refuse on every request.
///
/// ```
/// use rail_gateway::rtt::basic_auth_token;
///
/// assert_eq!(basic_auth_token("alice", "secret").unwrap(), "YWxpY2U6c2VjcmV0");
/// assert!(basic_auth_token("", "secret").is_err());
/// ```
pub fn basic_auth_token(username: &str, password: &str) -> Result<String, CredentialsError> {
    if username.is_empty() {
        return Err(CredentialsError::EmptyUsername);
    }
    if password.is_empty() {
        return Err(CredentialsError::EmptyPassword);
    }
    Ok(STANDARD.encode(format!("{username}:{password}")))
}
