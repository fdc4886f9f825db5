//! Requester fingerprint used by the duplicate-order heuristic.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Network-address-derived identity of whoever submitted an order.
///
/// This is an abuse heuristic only. It is trivially spoofable and must never
/// be used for authentication or authorization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequesterFingerprint(String);

impl RequesterFingerprint {
    /// Value recorded when no address could be determined.
    pub const UNKNOWN: &'static str = "unknown";

    /// Build a fingerprint from a raw address string.
    ///
    /// Blank input collapses to [`Self::unknown`].
    #[must_use]
    pub fn new(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            Self::unknown()
        } else {
            Self(trimmed.to_owned())
        }
    }

    /// Fingerprint used when the requester address is not available.
    #[must_use]
    pub fn unknown() -> Self {
        Self(Self::UNKNOWN.to_owned())
    }

    /// Whether this is the fallback fingerprint.
    #[must_use]
    pub fn is_unknown(&self) -> bool {
        self.0 == Self::UNKNOWN
    }

    /// Returns the fingerprint as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<std::net::IpAddr> for RequesterFingerprint {
    fn from(ip: std::net::IpAddr) -> Self {
        Self(ip.to_string())
    }
}

impl fmt::Display for RequesterFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_is_unknown() {
        assert!(RequesterFingerprint::new("  ").is_unknown());
        assert!(!RequesterFingerprint::new("10.0.0.1").is_unknown());
    }

    #[test]
    fn test_from_ip() {
        let ip: std::net::IpAddr = [192, 168, 1, 7].into();
        assert_eq!(RequesterFingerprint::from(ip).as_str(), "192.168.1.7");
    }
}
