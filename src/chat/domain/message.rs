//! Message aggregate, content, and attachment references.
//!
//! Messages are immutable once stored except for the read timestamp, which
//! moves once from absent to set. Optional attachment and reply references
//! are real [`Option`]s here; empty-string sentinels exist only on the wire.

use super::{ChatDomainError, MessageId, RoomId, UserIdentity};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Text body of a message. Empty content is permitted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageContent(String);

impl MessageContent {
    /// Wraps message text without length checks.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Rejects content longer than `limit` characters.
    ///
    /// # Errors
    ///
    /// Returns [`ChatDomainError::ContentTooLong`] when the limit is exceeded.
    pub fn ensure_within(&self, limit: usize) -> Result<(), ChatDomainError> {
        let actual = self.0.chars().count();
        if actual > limit {
            return Err(ChatDomainError::ContentTooLong { actual, limit });
        }
        Ok(())
    }

    /// Returns the content as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MessageContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Non-blank reference to an attached file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttachmentUrl(String);

impl AttachmentUrl {
    /// Creates a validated attachment reference.
    ///
    /// # Errors
    ///
    /// Returns [`ChatDomainError::EmptyAttachmentUrl`] when the value is
    /// blank.
    pub fn new(value: impl Into<String>) -> Result<Self, ChatDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ChatDomainError::EmptyAttachmentUrl);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the reference as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AttachmentUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A message that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessage {
    room_id: RoomId,
    sender: UserIdentity,
    content: MessageContent,
    attachment: Option<AttachmentUrl>,
    reply_to: Option<MessageId>,
    created_at: DateTime<Utc>,
}

impl NewMessage {
    /// Prepares a message for insertion, stamped with the current clock time.
    #[must_use]
    pub fn new(
        room_id: RoomId,
        sender: UserIdentity,
        content: MessageContent,
        clock: &impl Clock,
    ) -> Self {
        Self {
            room_id,
            sender,
            content,
            attachment: None,
            reply_to: None,
            created_at: clock.utc(),
        }
    }

    /// Sets the optional attachment reference.
    #[must_use]
    pub fn with_attachment(mut self, attachment: Option<AttachmentUrl>) -> Self {
        self.attachment = attachment;
        self
    }

    /// Sets the optional reply target.
    #[must_use]
    pub const fn with_reply_to(mut self, reply_to: Option<MessageId>) -> Self {
        self.reply_to = reply_to;
        self
    }

    /// Returns the owning room.
    #[must_use]
    pub const fn room_id(&self) -> RoomId {
        self.room_id
    }

    /// Returns the sender identity.
    #[must_use]
    pub const fn sender(&self) -> &UserIdentity {
        &self.sender
    }

    /// Returns the message body.
    #[must_use]
    pub const fn content(&self) -> &MessageContent {
        &self.content
    }

    /// Returns the attachment reference, if any.
    #[must_use]
    pub const fn attachment(&self) -> Option<&AttachmentUrl> {
        self.attachment.as_ref()
    }

    /// Returns the reply target, if any.
    #[must_use]
    pub const fn reply_to(&self) -> Option<MessageId> {
        self.reply_to
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Parameter object for reconstructing a persisted message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedMessageData {
    /// Store-assigned identifier.
    pub id: MessageId,
    /// Owning room.
    pub room_id: RoomId,
    /// Sender identity.
    pub sender: UserIdentity,
    /// Message body.
    pub content: MessageContent,
    /// Optional attachment reference.
    pub attachment: Option<AttachmentUrl>,
    /// Optional reply target.
    pub reply_to: Option<MessageId>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Read timestamp, when the message has been read.
    pub read_at: Option<DateTime<Utc>>,
}

/// Persisted chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    id: MessageId,
    room_id: RoomId,
    sender: UserIdentity,
    content: MessageContent,
    attachment: Option<AttachmentUrl>,
    reply_to: Option<MessageId>,
    created_at: DateTime<Utc>,
    read_at: Option<DateTime<Utc>>,
}

impl Message {
    /// Reconstructs a message from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedMessageData) -> Self {
        Self {
            id: data.id,
            room_id: data.room_id,
            sender: data.sender,
            content: data.content,
            attachment: data.attachment,
            reply_to: data.reply_to,
            created_at: data.created_at,
            read_at: data.read_at,
        }
    }

    /// Materialises a pending message under a store-assigned identifier.
    #[must_use]
    pub fn from_new(id: MessageId, message: NewMessage) -> Self {
        Self {
            id,
            room_id: message.room_id,
            sender: message.sender,
            content: message.content,
            attachment: message.attachment,
            reply_to: message.reply_to,
            created_at: message.created_at,
            read_at: None,
        }
    }

    /// Returns the message identifier.
    #[must_use]
    pub const fn id(&self) -> MessageId {
        self.id
    }

    /// Returns the owning room.
    #[must_use]
    pub const fn room_id(&self) -> RoomId {
        self.room_id
    }

    /// Returns the sender identity.
    #[must_use]
    pub const fn sender(&self) -> &UserIdentity {
        &self.sender
    }

    /// Returns the message body.
    #[must_use]
    pub const fn content(&self) -> &MessageContent {
        &self.content
    }

    /// Returns the attachment reference, if any.
    #[must_use]
    pub const fn attachment(&self) -> Option<&AttachmentUrl> {
        self.attachment.as_ref()
    }

    /// Returns the reply target, if any.
    #[must_use]
    pub const fn reply_to(&self) -> Option<MessageId> {
        self.reply_to
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the read timestamp, if the message has been read.
    #[must_use]
    pub const fn read_at(&self) -> Option<DateTime<Utc>> {
        self.read_at
    }

    /// Returns `true` once a read timestamp has been recorded.
    #[must_use]
    pub const fn is_read(&self) -> bool {
        self.read_at.is_some()
    }

    /// Records the read timestamp if none is set yet.
    ///
    /// Returns `false` and leaves the existing timestamp untouched when the
    /// message was already read.
    pub fn mark_read(&mut self, at: DateTime<Utc>) -> bool {
        if self.read_at.is_some() {
            return false;
        }
        self.read_at = Some(at);
        true
    }
}
