//! Service UID type.

use std::fmt;

/// Error returned when parsing an invalid service UID.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid service UID: {reason}")]
pub struct InvalidServiceUid {
    reason: &'static str,
}

/// A Realtime Trains service unique identifier.
///
/// Service UIDs are opaque identifiers (`G12345`, `P04561`) assigned by the
/// upstream to one scheduled service. They are used as a path segment of the
/// detail endpoint, so only ASCII letters and digits are accepted.
///
/// # Examples
///
/// ```
/// use rail_gateway::domain::ServiceUid;
///
/// let uid = ServiceUid::new("G12345".to_string()).unwrap();
/// assert_eq!(uid.as_str(), "G12345");
///
/// assert!(ServiceUid::new("".to_string()).is_err());
/// assert!(ServiceUid::new("G1/../x".to_string()).is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ServiceUid(String);

impl ServiceUid {
    /// Create a new service UID from a string.
    pub fn new(s: String) -> Result<Self, InvalidServiceUid> {
        if s.is_empty() {
            return Err(InvalidServiceUid {
                reason: "service UID cannot be empty",
            });
        }
        if !s.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return Err(InvalidServiceUid {
                reason: "service UID must be ASCII letters or digits",
            });
        }
        Ok(ServiceUid(s))
    }

    /// Returns the service UID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ServiceUid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ServiceUid({})", self.0)
    }
}

impl fmt::Display for ServiceUid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
