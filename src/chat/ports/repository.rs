//! Repository ports for room, membership, and message persistence.
//!
//! Adapters own schema-level invariants: every message belongs to an
//! existing room, and a user identity appears at most once per room. The
//! participant insert is a single atomic check-then-insert so that two
//! concurrent joins for the same identity cannot both succeed.

use crate::chat::domain::{
    Message, MessageId, NewMessage, NewParticipant, NewRoom, PageRequest, Room, RoomId,
    RoomParticipant, UserIdentity,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for repository operations.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Room and membership persistence contract.
#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// Stores a new room and returns it with its assigned identifier.
    async fn insert_room(&self, room: &NewRoom) -> RepositoryResult<Room>;

    /// Finds a room by identifier.
    ///
    /// Returns `None` when the room does not exist.
    async fn find_room(&self, id: RoomId) -> RepositoryResult<Option<Room>>;

    /// Atomically checks for an existing membership and stores a new one.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::RoomNotFound`] when the room does not
    /// exist or [`RepositoryError::DuplicateParticipant`] when the identity is
    /// already a member of the room.
    async fn insert_participant(
        &self,
        participant: &NewParticipant,
    ) -> RepositoryResult<RoomParticipant>;

    /// Returns the room's participants in ascending participant-id order.
    ///
    /// Returns an empty list for unknown rooms; callers check existence
    /// separately.
    async fn list_participants(&self, room_id: RoomId) -> RepositoryResult<Vec<RoomParticipant>>;
}

/// One page of a room's history as read from the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessagePage {
    /// Messages on the requested page, oldest first.
    pub messages: Vec<Message>,
    /// Count of all messages in the room at read time.
    pub total_items: u64,
}

/// Message persistence contract.
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Stores a new message and returns it with its assigned identifier.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::RoomNotFound`] when the owning room does
    /// not exist.
    async fn insert_message(&self, message: &NewMessage) -> RepositoryResult<Message>;

    /// Finds a message by identifier.
    ///
    /// Returns `None` when the message does not exist.
    async fn find_message(&self, id: MessageId) -> RepositoryResult<Option<Message>>;

    /// Reads one page of a room's history ordered by creation time, then by
    /// identifier, together with the room's total message count.
    async fn page_messages(
        &self,
        room_id: RoomId,
        request: PageRequest,
    ) -> RepositoryResult<MessagePage>;

    /// Sets the read timestamp if it is still absent and returns the stored
    /// message. An existing read timestamp is never overwritten.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::MessageNotFound`] when the message does not
    /// exist.
    async fn mark_read(&self, id: MessageId, read_at: DateTime<Utc>) -> RepositoryResult<Message>;
}

/// Errors returned by repository implementations.
#[derive(Debug, Clone, Error)]
pub enum RepositoryError {
    /// The referenced room does not exist.
    #[error("room not found: {0}")]
    RoomNotFound(RoomId),

    /// The referenced message does not exist.
    #[error("message not found: {0}")]
    MessageNotFound(MessageId),

    /// The identity is already a participant in the room.
    #[error("duplicate participant {user} in room {room_id}")]
    DuplicateParticipant {
        /// The room holding the existing membership.
        room_id: RoomId,
        /// The duplicated identity.
        user: UserIdentity,
    },

    /// Persisted data could not be reconstructed into domain types.
    #[error("invalid persisted data: {0}")]
    InvalidPersistedData(Arc<dyn std::error::Error + Send + Sync>),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl RepositoryError {
    /// Wraps a data-quality or conversion error from persisted rows.
    pub fn invalid_persisted_data(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::InvalidPersistedData(Arc::new(err))
    }

    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

#[cfg(feature = "postgres")]
impl From<diesel::result::Error> for RepositoryError {
    fn from(err: diesel::result::Error) -> Self {
        Self::persistence(err)
    }
}
