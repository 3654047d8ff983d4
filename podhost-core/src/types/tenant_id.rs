//! Tenant identifier type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ValidationError;

/// Opaque identifier of a tenant.
///
/// The value is embedded verbatim in the tenant namespace prefix
/// (`/tenant/{id}`) and in the trusted tenant header, so it is restricted to
/// ASCII alphanumerics plus `-`, `_` and `.`.
///
/// # Examples
///
/// ```
/// use podhost_core::types::TenantId;
///
/// let id = TenantId::new("550e8400-e29b-41d4-a716-446655440000").unwrap();
/// assert_eq!(id.as_str(), "550e8400-e29b-41d4-a716-446655440000");
/// assert!(TenantId::new("a/b").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TenantId(String);

impl TenantId {
    /// Creates a new `TenantId`.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::EmptyTenantId` if the value is empty and
    /// `ValidationError::InvalidTenantId` if it contains unsafe characters.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let s = value.into();
        if s.is_empty() {
            return Err(ValidationError::EmptyTenantId);
        }
        if !s.chars().all(is_id_char) || s == "." || s == ".." {
            return Err(ValidationError::InvalidTenantId(s));
        }
        Ok(Self(s))
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_id_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for TenantId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for TenantId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TenantId> for String {
    fn from(id: TenantId) -> Self {
        id.0
    }
}

impl AsRef<str> for TenantId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
