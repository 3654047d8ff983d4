//! Routing configuration.

use podhost_core::config::Validatable;
use podhost_core::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Configuration of the tenant routing layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    /// Request header carrying the resolved tenant to downstream handlers.
    pub tenant_header: String,
    /// First path segment of the tenant namespace (`/{segment}/{tenant_id}`).
    pub namespace_segment: String,
    /// Path prefixes that are never rewritten.
    pub excluded_prefixes: Vec<String>,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            tenant_header: "x-tenant-id".to_string(),
            namespace_segment: "tenant".to_string(),
            excluded_prefixes: vec![
                "/api".to_string(),
                "/_static".to_string(),
                "/favicon.ico".to_string(),
                "/robots.txt".to_string(),
            ],
        }
    }
}

impl Validatable for RoutingConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.tenant_header.is_empty() {
            return Err(ConfigError::missing_field_in_section(
                "tenant_header",
                "routing",
            ));
        }
        if !self.tenant_header.bytes().all(is_lowercase_token_byte) {
            return Err(ConfigError::invalid_value(
                "routing.tenant_header",
                format!(
                    "'{}' is not a lowercase HTTP header name",
                    self.tenant_header
                ),
            ));
        }

        if self.namespace_segment.is_empty() {
            return Err(ConfigError::missing_field_in_section(
                "namespace_segment",
                "routing",
            ));
        }
        if self.namespace_segment.contains('/') || self.namespace_segment.contains('?') {
            return Err(ConfigError::invalid_value(
                "routing.namespace_segment",
                "must be a single path segment",
            ));
        }

        for prefix in &self.excluded_prefixes {
            if !prefix.starts_with('/') {
                return Err(ConfigError::invalid_value(
                    "routing.excluded_prefixes",
                    format!("'{prefix}' must start with '/'"),
                ));
            }
            if prefix.trim_end_matches('/').is_empty() {
                return Err(ConfigError::invalid_value(
                    "routing.excluded_prefixes",
                    "'/' would exclude every path",
                ));
            }
            let segment = format!("/{}", self.namespace_segment);
            if prefix.trim_end_matches('/') == segment {
                return Err(ConfigError::invalid_value(
                    "routing.excluded_prefixes",
                    format!("'{prefix}' shadows the tenant namespace"),
                ));
            }
        }

        Ok(())
    }
}

// RFC 9110 token characters, restricted to lowercase.
fn is_lowercase_token_byte(b: u8) -> bool {
    b.is_ascii_lowercase()
        || b.is_ascii_digit()
        || matches!(
            b,
            b'!' | b'#'
                | b'$'
                | b'%'
                | b'&'
                | b'\''
                | b'*'
                | b'+'
                | b'-'
                | b'.'
                | b'^'
                | b'_'
                | b'`'
                | b'|'
                | b'~'
        )
}
