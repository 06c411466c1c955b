//! Identifier newtypes for rooms, participants, and messages.
//!
//! Identifiers are assigned by the store and are always positive. Wrapping
//! them prevents a participant id from being passed where a room id is
//! expected.

use super::ChatDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a chat room.
///
/// # Examples
///
/// ```
/// use chatroom::chat::domain::RoomId;
///
/// let id = RoomId::new(7).expect("positive id");
/// assert_eq!(id.value(), 7);
/// assert!(RoomId::new(0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(i64);

impl RoomId {
    /// Creates a room identifier from a store-assigned value.
    ///
    /// # Errors
    ///
    /// Returns [`ChatDomainError::InvalidId`] when the value is not positive.
    pub fn new(value: i64) -> Result<Self, ChatDomainError> {
        positive(value, "room").map(Self)
    }

    /// Returns the raw identifier.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl TryFrom<u64> for RoomId {
    type Error = ChatDomainError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::new(narrow(value, "room")?)
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a room participant record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(i64);

impl ParticipantId {
    /// Creates a participant identifier from a store-assigned value.
    ///
    /// # Errors
    ///
    /// Returns [`ChatDomainError::InvalidId`] when the value is not positive.
    pub fn new(value: i64) -> Result<Self, ChatDomainError> {
        positive(value, "participant").map(Self)
    }

    /// Returns the raw identifier.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(i64);

impl MessageId {
    /// Creates a message identifier from a store-assigned value.
    ///
    /// # Errors
    ///
    /// Returns [`ChatDomainError::InvalidId`] when the value is not positive.
    pub fn new(value: i64) -> Result<Self, ChatDomainError> {
        positive(value, "message").map(Self)
    }

    /// Returns the raw identifier.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl TryFrom<u64> for MessageId {
    type Error = ChatDomainError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::new(narrow(value, "message")?)
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn positive(value: i64, entity: &'static str) -> Result<i64, ChatDomainError> {
    if value > 0 {
        Ok(value)
    } else {
        Err(ChatDomainError::InvalidId {
            entity,
            value: value.to_string(),
        })
    }
}

fn narrow(value: u64, entity: &'static str) -> Result<i64, ChatDomainError> {
    i64::try_from(value).map_err(|_| ChatDomainError::InvalidId {
        entity,
        value: value.to_string(),
    })
}
