//! Hostname type for tenant directory lookups.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::Ipv6Addr;
use std::str::FromStr;

use super::ValidationError;

const MAX_HOSTNAME_LEN: usize = 253;
const MAX_LABEL_LEN: usize = 63;

/// Normalised hostname.
///
/// Hostnames are stored lowercase, without a port and without a trailing
/// dot. IPv6 literals are kept in bracketed, canonical form (`[::1]`).
///
/// # Examples
///
/// ```
/// use podhost_core::types::Hostname;
///
/// let host = Hostname::from_host_header("Acme-Podcasts.test:3000").unwrap();
/// assert_eq!(host.as_str(), "acme-podcasts.test");
///
/// let v6 = Hostname::from_host_header("[::1]:8080").unwrap();
/// assert_eq!(v6.as_str(), "[::1]");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Hostname(String);

impl Hostname {
    /// Creates a hostname from a bare host (no port).
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` if the host is empty or not a valid DNS
    /// name or bracketed IPv6 literal.
    pub fn new(value: impl AsRef<str>) -> Result<Self, ValidationError> {
        let raw = value.as_ref().trim();
        if raw.is_empty() {
            return Err(ValidationError::EmptyHostname);
        }

        if let Some(literal) = raw.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
            return Self::from_ipv6_literal(literal, raw);
        }

        let lowered = raw.to_ascii_lowercase();
        let name = lowered.strip_suffix('.').unwrap_or(&lowered);
        if name.is_empty() {
            return Err(ValidationError::EmptyHostname);
        }
        if name.len() > MAX_HOSTNAME_LEN {
            return Err(ValidationError::InvalidHostname(raw.to_string()));
        }

        let labels_ok = name.split('.').all(|label| {
            !label.is_empty()
                && label.len() <= MAX_LABEL_LEN
                && label
                    .bytes()
                    .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
        });
        if !labels_ok {
            return Err(ValidationError::InvalidHostname(raw.to_string()));
        }

        Ok(Self(name.to_string()))
    }

    /// Parses a raw `Host` header value, discarding any `:port` suffix.
    ///
    /// Ports are not part of tenant identity, so `acme.test` and
    /// `acme.test:3000` yield the same hostname.
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` if the header is empty, the port is not a
    /// decimal number, or the host part is malformed.
    pub fn from_host_header(header: &str) -> Result<Self, ValidationError> {
        let raw = header.trim();
        if raw.is_empty() {
            return Err(ValidationError::EmptyHostname);
        }

        if let Some(rest) = raw.strip_prefix('[') {
            let (literal, after) = rest
                .split_once(']')
                .ok_or_else(|| ValidationError::InvalidHostname(raw.to_string()))?;
            if !after.is_empty() {
                let port = after
                    .strip_prefix(':')
                    .ok_or_else(|| ValidationError::InvalidHostname(raw.to_string()))?;
                validate_port(port)?;
            }
            return Self::from_ipv6_literal(literal, raw);
        }

        let host = match raw.split_once(':') {
            Some((host, port)) => {
                validate_port(port)?;
                host
            }
            None => raw,
        };

        Self::new(host)
    }

    fn from_ipv6_literal(literal: &str, raw: &str) -> Result<Self, ValidationError> {
        let addr: Ipv6Addr = literal
            .parse()
            .map_err(|_| ValidationError::InvalidHostname(raw.to_string()))?;
        Ok(Self(format!("[{addr}]")))
    }

    /// Returns the hostname as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `{label}.{self}`, e.g. a tenant slug under the platform domain.
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` if the resulting name is invalid.
    pub fn subdomain(&self, label: &str) -> Result<Self, ValidationError> {
        Self::new(format!("{label}.{}", self.0))
    }
}

fn validate_port(port: &str) -> Result<(), ValidationError> {
    if port.is_empty() || !port.bytes().all(|b| b.is_ascii_digit()) || port.parse::<u16>().is_err()
    {
        return Err(ValidationError::InvalidPort(port.to_string()));
    }
    Ok(())
}

impl fmt::Display for Hostname {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Hostname {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Hostname {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Hostname> for String {
    fn from(host: Hostname) -> Self {
        host.0
    }
}

impl AsRef<str> for Hostname {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_port() {
        let with_port = Hostname::from_host_header("acme-podcasts.test:3000").unwrap();
        let without = Hostname::from_host_header("acme-podcasts.test").unwrap();
        assert_eq!(with_port, without);
        assert_eq!(with_port.as_str(), "acme-podcasts.test");
    }

    #[test]
    fn test_normalises_case_and_trailing_dot() {
        let host = Hostname::from_host_header("  Indie-Media.TEST.  ").unwrap();
        assert_eq!(host.as_str(), "indie-media.test");
    }

    #[test]
    fn test_localhost() {
        let host = Hostname::from_host_header("localhost:3000").unwrap();
        assert_eq!(host.as_str(), "localhost");
    }

    #[test]
    fn test_ipv6_literal() {
        let host = Hostname::from_host_header("[0:0:0:0:0:0:0:1]:8080").unwrap();
        assert_eq!(host.as_str(), "[::1]");
        assert_eq!(Hostname::new("[::1]").unwrap(), host);
    }

    #[test]
    fn test_rejects_malformed() {
        for bad in [
            "",
            "   ",
            ":3000",
            "acme.test:",
            "acme.test:http",
            "acme.test:99999",
            "a:b:c",
            "acme..test",
            "acme test",
            "acme.test/evil",
            "user@acme.test",
            "[::1",
            "[::1]x",
            "[not-v6]:80",
        ] {
            assert!(
                Hostname::from_host_header(bad).is_err(),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_rejects_overlong_label() {
        let label = "a".repeat(64);
        assert!(Hostname::new(format!("{label}.test")).is_err());
    }

    #[test]
    fn test_subdomain() {
        let platform = Hostname::new("podhost.test").unwrap();
        let host = platform.subdomain("acme").unwrap();
        assert_eq!(host.as_str(), "acme.podhost.test");
        assert!(platform.subdomain("bad slug").is_err());
    }
}
