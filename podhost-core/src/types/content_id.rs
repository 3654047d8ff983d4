//! Show and episode identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValidationError;

macro_rules! content_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier.
            ///
            /// # Errors
            ///
            /// Returns `ValidationError::EmptyContentId` if the value is empty.
            pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
                let s = value.into();
                if s.trim().is_empty() {
                    return Err(ValidationError::EmptyContentId);
                }
                Ok(Self(s))
            }

            /// Returns the identifier as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

content_id!(
    /// Identifier of a show.
    ShowId
);

content_id!(
    /// Identifier of an episode.
    EpisodeId
);
