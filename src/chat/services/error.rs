//! Service-level error type shared by the room and message services.

use crate::chat::{
    domain::{ChatDomainError, MessageId, RoomId, UserIdentity},
    ports::RepositoryError,
};
use thiserror::Error;

/// Coarse classification of a service failure, used by transports to pick a
/// status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The addressed room or message does not exist.
    NotFound,
    /// The request collides with existing state.
    Conflict,
    /// The request failed input validation.
    Validation,
    /// The store failed.
    Internal,
}

/// Errors returned by chat services.
#[derive(Debug, Clone, Error)]
pub enum ChatServiceError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] ChatDomainError),

    /// The room does not exist.
    #[error("room {0} not found")]
    RoomNotFound(RoomId),

    /// The message does not exist.
    #[error("message {0} not found")]
    MessageNotFound(MessageId),

    /// The identity is already a participant in the room.
    #[error("user {user} is already a participant in room {room_id}")]
    AlreadyParticipant {
        /// The room holding the membership.
        room_id: RoomId,
        /// The duplicated identity.
        user: UserIdentity,
    },

    /// Repository operation failed.
    #[error(transparent)]
    Repository(RepositoryError),
}

impl ChatServiceError {
    /// Classifies the error for transport mapping.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(_) => ErrorKind::Validation,
            Self::RoomNotFound(_) | Self::MessageNotFound(_) => ErrorKind::NotFound,
            Self::AlreadyParticipant { .. } => ErrorKind::Conflict,
            Self::Repository(_) => ErrorKind::Internal,
        }
    }
}

impl From<RepositoryError> for ChatServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::RoomNotFound(room_id) => Self::RoomNotFound(room_id),
            RepositoryError::MessageNotFound(message_id) => Self::MessageNotFound(message_id),
            RepositoryError::DuplicateParticipant { room_id, user } => {
                Self::AlreadyParticipant { room_id, user }
            }
            other => Self::Repository(other),
        }
    }
}

/// Result type for chat service operations.
pub type ChatServiceResult<T> = Result<T, ChatServiceError>;
