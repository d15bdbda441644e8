//! Station code types.

use std::fmt;

/// Error returned when parsing an invalid station code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid station code: {reason}")]
pub struct InvalidStationCode {
    reason: &'static str,
}

/// A station code accepted by the upstream search endpoints.
///
/// Either a 3-letter CRS code (`KGX`) or a TIPLOC of up to 7 characters
/// (`KNGX`, `EDINBUR`). Codes are stored uppercase and contain only ASCII
/// letters and digits, so they can be spliced into an upstream URL path
/// without escaping.
///
/// # Examples
///
/// ```
/// use rail_gateway::domain::StationCode;
///
/// let kgx = StationCode::parse("KGX").unwrap();
/// assert_eq!(kgx.as_str(), "KGX");
///
/// // Path input is normalized before validation
/// let edb = StationCode::parse_normalized(" edb ").unwrap();
/// assert_eq!(edb.as_str(), "EDB");
///
/// // Lowercase is rejected by the strict parser
/// assert!(StationCode::parse("kgx").is_err());
///
/// // Wrong length is rejected
/// assert!(StationCode::parse("KG").is_err());
/// assert!(StationCode::parse("KINGSCROSS").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct StationCode(String);

impl StationCode {
    /// Shortest accepted code (CRS).
    pub const MIN_LEN: usize = 3;

    /// Longest accepted code (TIPLOC).
    pub const MAX_LEN: usize = 7;

    /// Parse a station code from a string.
    ///
    /// The input must be 3 to 7 uppercase ASCII letters or digits.
    pub fn parse(s: &str) -> Result<Self, InvalidStationCode> {
        let bytes = s.as_bytes();

        if bytes.len() < Self::MIN_LEN || bytes.len() > Self::MAX_LEN {
            return Err(InvalidStationCode {
                reason: "must be between 3 and 7 characters",
            });
        }

        for &b in bytes {
            if !(b.is_ascii_uppercase() || b.is_ascii_digit()) {
                return Err(InvalidStationCode {
                    reason: "must be uppercase ASCII letters A-Z or digits",
                });
            }
        }

        Ok(StationCode(s.to_string()))
    }

    /// Parse a station code after trimming whitespace and uppercasing.
    ///
    /// Use this for codes taken from request paths.
    pub fn parse_normalized(s: &str) -> Result<Self, InvalidStationCode> {
        Self::parse(&s.trim().to_ascii_uppercase())
    }

    /// Returns the station code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for StationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StationCode({})", self.0)
    }
}

impl fmt::Display for StationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_codes() {
        assert!(StationCode::parse("KGX").is_ok());
        assert!(StationCode::parse("EDB").is_ok());
        assert!(StationCode::parse("KNGX").is_ok());
        assert!(StationCode::parse("EDINBUR").is_ok());
        assert!(StationCode::parse("CLPHMJ2").is_ok());
    }

    #[test]
    fn reject_lowercase() {
        assert!(StationCode::parse("kgx").is_err());
        assert!(StationCode::parse("Kgx").is_err());
    }

    #[test]
    fn reject_wrong_length() {
        assert!(StationCode::parse("").is_err());
        assert!(StationCode::parse("K").is_err());
        assert!(StationCode::parse("KG").is_err());
        assert!(StationCode::parse("KINGSXRD").is_err());
    }

    #[test]
    fn reject_path_characters() {
        assert!(StationCode::parse("K/X").is_err());
        assert!(StationCode::parse("KGX?a").is_err());
        assert!(StationCode::parse("K X").is_err());
        assert!(StationCode::parse("..%2F").is_err());
        assert!(StationCode::parse("KÖX").is_err());
    }

    #[test]
    fn normalized_parse() {
        let code = StationCode::parse_normalized("  kgx ").unwrap();
        assert_eq!(code.as_str(), "KGX");
        assert!(StationCode::parse_normalized("k x").is_err());
    }

    #[test]
    fn display_and_debug() {
        let code = StationCode::parse("PAD").unwrap();
        assert_eq!(format!("{}", code), "PAD");
        assert_eq!(format!("{:?}", code), "StationCode(PAD)");
    }
}
