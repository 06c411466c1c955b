//! Room aggregate and its validated name.

use super::{ChatDomainError, RoomId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum length for a room name, matching the `VARCHAR(255)` column.
const MAX_ROOM_NAME_LENGTH: usize = 255;

/// Validated display name of a room. Names are not unique.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomName(String);

impl RoomName {
    /// Creates a validated room name.
    ///
    /// # Errors
    ///
    /// Returns [`ChatDomainError::EmptyRoomName`] when the value is blank or
    /// [`ChatDomainError::RoomNameTooLong`] when it exceeds 255 characters.
    pub fn new(value: impl Into<String>) -> Result<Self, ChatDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();

        if trimmed.is_empty() {
            return Err(ChatDomainError::EmptyRoomName);
        }

        let length = trimmed.chars().count();
        if length > MAX_ROOM_NAME_LENGTH {
            return Err(ChatDomainError::RoomNameTooLong {
                actual: length,
                limit: MAX_ROOM_NAME_LENGTH,
            });
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for RoomName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for RoomName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A room that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRoom {
    name: RoomName,
    created_at: DateTime<Utc>,
}

impl NewRoom {
    /// Prepares a room for insertion, stamped with the current clock time.
    #[must_use]
    pub fn new(name: RoomName, clock: &impl Clock) -> Self {
        Self {
            name,
            created_at: clock.utc(),
        }
    }

    /// Returns the room name.
    #[must_use]
    pub const fn name(&self) -> &RoomName {
        &self.name
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Persisted chat room. The name is immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    id: RoomId,
    name: RoomName,
    created_at: DateTime<Utc>,
}

impl Room {
    /// Reconstructs a room from persisted storage.
    #[must_use]
    pub const fn from_persisted(id: RoomId, name: RoomName, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name,
            created_at,
        }
    }

    /// Returns the room identifier.
    #[must_use]
    pub const fn id(&self) -> RoomId {
        self.id
    }

    /// Returns the room name.
    #[must_use]
    pub const fn name(&self) -> &RoomName {
        &self.name
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
