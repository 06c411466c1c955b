//! Caller identity carried into every domain call.

use super::ChatDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum identity length, matching the `VARCHAR(255)` columns.
const MAX_IDENTITY_LENGTH: usize = 255;

/// Opaque, pre-authenticated user identity (an email address in practice).
///
/// The value is trimmed on construction and compared exactly afterwards.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserIdentity(String);

impl UserIdentity {
    /// Creates a validated user identity.
    ///
    /// # Errors
    ///
    /// Returns [`ChatDomainError::EmptyUserIdentity`] when the value is blank,
    /// [`ChatDomainError::InvalidUserIdentity`] when it contains interior
    /// whitespace, or [`ChatDomainError::UserIdentityTooLong`] when it exceeds
    /// 255 characters.
    pub fn new(value: impl Into<String>) -> Result<Self, ChatDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();

        if trimmed.is_empty() {
            return Err(ChatDomainError::EmptyUserIdentity);
        }

        let length = trimmed.chars().count();
        if length > MAX_IDENTITY_LENGTH {
            return Err(ChatDomainError::UserIdentityTooLong {
                actual: length,
                limit: MAX_IDENTITY_LENGTH,
            });
        }

        if trimmed.chars().any(char::is_whitespace) {
            return Err(ChatDomainError::InvalidUserIdentity(raw));
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the identity as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for UserIdentity {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for UserIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
