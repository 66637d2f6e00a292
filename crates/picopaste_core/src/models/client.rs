//! Admission-control client identity.

use std::fmt;
use std::net::IpAddr;

/// Bucket key for per-client admission control.
///
/// Derived from the client's network origin. Only ever held in memory for the
/// length of an admission window.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClientKey(String);

impl ClientKey {
    /// Construct a key from an arbitrary caller-provided origin string.
    pub fn new(origin: impl Into<String>) -> Self {
        Self(origin.into())
    }

    /// Key used when the client origin cannot be determined.
    pub fn unknown() -> Self {
        Self::new("unknown")
    }

    /// Return the key as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<IpAddr> for ClientKey {
    fn from(value: IpAddr) -> Self {
        // IPv4-mapped IPv6 peers share a bucket with their IPv4 form.
        let canonical = match value {
            IpAddr::V6(v6) => v6
                .to_ipv4_mapped()
                .map(IpAddr::V4)
                .unwrap_or(IpAddr::V6(v6)),
            v4 => v4,
        };
        Self(canonical.to_string())
    }
}

impl fmt::Display for ClientKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
