//! Error types for chat domain validation.

use super::{MessageId, RoomId};
use thiserror::Error;

/// Errors returned while constructing or validating chat domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ChatDomainError {
    /// A numeric identifier was zero, negative, or out of range.
    #[error("{entity} identifier must be a positive integer, got {value}")]
    InvalidId {
        /// The kind of entity the identifier refers to.
        entity: &'static str,
        /// The rejected raw value.
        value: String,
    },

    /// The room name is empty after trimming.
    #[error("room name must not be empty")]
    EmptyRoomName,

    /// The room name exceeds the storage limit.
    #[error("room name exceeds {limit} character limit ({actual} characters)")]
    RoomNameTooLong {
        /// Characters in the rejected name.
        actual: usize,
        /// Maximum permitted characters.
        limit: usize,
    },

    /// The user identity is empty after trimming.
    #[error("user identity must not be empty")]
    EmptyUserIdentity,

    /// The user identity contains whitespace.
    #[error("user identity '{0}' must not contain whitespace")]
    InvalidUserIdentity(String),

    /// The user identity exceeds the storage limit.
    #[error("user identity exceeds {limit} character limit ({actual} characters)")]
    UserIdentityTooLong {
        /// Characters in the rejected identity.
        actual: usize,
        /// Maximum permitted characters.
        limit: usize,
    },

    /// The message content exceeds the configured limit.
    #[error("message content has {actual} characters, exceeds limit of {limit}")]
    ContentTooLong {
        /// Characters in the rejected content.
        actual: usize,
        /// Maximum permitted characters.
        limit: usize,
    },

    /// An attachment reference was supplied but is blank.
    #[error("attachment URL must not be blank when present")]
    EmptyAttachmentUrl,

    /// The requested page size is zero or negative.
    #[error("page size must be positive, got {0}")]
    InvalidPageSize(i64),

    /// The requested page number is zero or negative.
    #[error("page number must be positive, got {0}")]
    InvalidPageNumber(i64),

    /// The reply target does not exist.
    #[error("reply target message {0} does not exist")]
    ReplyTargetMissing(MessageId),

    /// The reply target belongs to a different room.
    #[error("reply target message {reply_to} does not belong to room {room_id}")]
    ReplyTargetOutsideRoom {
        /// The referenced message.
        reply_to: MessageId,
        /// The room the new message is posted to.
        room_id: RoomId,
    },
}
