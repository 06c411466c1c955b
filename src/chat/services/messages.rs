//! Message posting, history paging, and read tracking.

use super::error::{ChatServiceError, ChatServiceResult};
use crate::chat::{
    domain::{
        AttachmentUrl, ChatDomainError, Message, MessageContent, MessageId, NewMessage,
        PageRequest, PaginationResult, Room, RoomId, UserIdentity,
    },
    ports::{MessageRepository, RoomRepository},
};
use crate::config::{ChatConfig, ReplyPolicy};
use mockable::Clock;
use std::sync::Arc;
use tracing::{debug, info};

/// Request payload for posting a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveMessageRequest {
    room_id: RoomId,
    sender: String,
    content: String,
    attachment: Option<String>,
    reply_to: Option<MessageId>,
}

impl SaveMessageRequest {
    /// Creates a request with the required fields.
    #[must_use]
    pub fn new(room_id: RoomId, sender: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            room_id,
            sender: sender.into(),
            content: content.into(),
            attachment: None,
            reply_to: None,
        }
    }

    /// Sets the attachment reference.
    #[must_use]
    pub fn with_attachment(mut self, attachment: impl Into<String>) -> Self {
        self.attachment = Some(attachment.into());
        self
    }

    /// Sets the message being replied to.
    #[must_use]
    pub const fn with_reply_to(mut self, reply_to: MessageId) -> Self {
        self.reply_to = Some(reply_to);
        self
    }
}

/// One page of a room's history with the room metadata needed for the
/// response envelope.
#[derive(Debug, Clone)]
pub struct RoomHistory {
    /// The room the history belongs to.
    pub room: Room,
    /// The requested page.
    pub page: PaginationResult,
}

/// Message persistence and retrieval service.
#[derive(Clone)]
pub struct MessageService<R, M, C>
where
    R: RoomRepository,
    M: MessageRepository,
    C: Clock + Send + Sync,
{
    rooms: Arc<R>,
    messages: Arc<M>,
    clock: Arc<C>,
    max_page_size: u32,
    max_content_length: usize,
    reply_policy: ReplyPolicy,
}

impl<R, M, C> MessageService<R, M, C>
where
    R: RoomRepository,
    M: MessageRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new message service with limits taken from `config`.
    #[must_use]
    pub fn new(rooms: Arc<R>, messages: Arc<M>, clock: Arc<C>, config: &ChatConfig) -> Self {
        Self {
            rooms,
            messages,
            clock,
            max_page_size: config.max_page_size(),
            max_content_length: config.max_content_length(),
            reply_policy: config.reply_policy(),
        }
    }

    /// Validates and stores a message, stamping it with the current time.
    ///
    /// # Errors
    ///
    /// Returns [`ChatServiceError::Domain`] for an invalid sender, oversized
    /// content, a blank attachment, or a reply target rejected by the
    /// configured [`ReplyPolicy`]. Returns [`ChatServiceError::RoomNotFound`]
    /// when the room is absent.
    pub async fn save_message(&self, request: SaveMessageRequest) -> ChatServiceResult<Message> {
        let SaveMessageRequest {
            room_id,
            sender,
            content,
            attachment,
            reply_to,
        } = request;

        let sender_identity = UserIdentity::new(sender)?;
        let message_content = MessageContent::new(content);
        message_content.ensure_within(self.max_content_length)?;
        let attachment_url = attachment.map(AttachmentUrl::new).transpose()?;
        if let Some(target) = reply_to {
            self.check_reply_target(room_id, target).await?;
        }

        let new_message = NewMessage::new(room_id, sender_identity, message_content, &*self.clock)
            .with_attachment(attachment_url)
            .with_reply_to(reply_to);
        let message = self.messages.insert_message(&new_message).await?;
        info!(
            room_id = %room_id,
            message_id = %message.id(),
            sender = %message.sender(),
            "message saved"
        );
        Ok(message)
    }

    async fn check_reply_target(&self, room_id: RoomId, target: MessageId) -> ChatServiceResult<()> {
        if self.reply_policy == ReplyPolicy::Unchecked {
            return Ok(());
        }
        let replied = self
            .messages
            .find_message(target)
            .await?
            .ok_or(ChatDomainError::ReplyTargetMissing(target))?;
        if replied.room_id() != room_id {
            return Err(ChatDomainError::ReplyTargetOutsideRoom {
                reply_to: target,
                room_id,
            }
            .into());
        }
        Ok(())
    }

    /// Returns one page of a room's history, oldest first.
    ///
    /// `page` is 1-indexed. A `limit` above the configured maximum is
    /// clamped; pages past the end are empty but carry correct totals.
    ///
    /// # Errors
    ///
    /// Returns [`ChatServiceError::Domain`] for a non-positive `limit` or
    /// `page`, [`ChatServiceError::RoomNotFound`] when the room is absent, or
    /// [`ChatServiceError::Repository`] when persistence fails.
    pub async fn get_room_messages(
        &self,
        room_id: RoomId,
        limit: i64,
        page: i64,
    ) -> ChatServiceResult<RoomHistory> {
        let request = PageRequest::new(page, limit, self.max_page_size)?;
        let room = self
            .rooms
            .find_room(room_id)
            .await?
            .ok_or(ChatServiceError::RoomNotFound(room_id))?;

        let stored = self.messages.page_messages(room_id, request).await?;
        debug!(
            room_id = %room_id,
            page = request.page(),
            limit = request.limit(),
            total_items = stored.total_items,
            "room history page read"
        );
        Ok(RoomHistory {
            room,
            page: PaginationResult::new(stored.messages, request, stored.total_items),
        })
    }

    /// Marks a message as read. A message that is already read is returned
    /// unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`ChatServiceError::MessageNotFound`] when the message is
    /// absent or [`ChatServiceError::Repository`] when persistence fails.
    pub async fn mark_message_read(&self, message_id: MessageId) -> ChatServiceResult<Message> {
        let message = self.messages.mark_read(message_id, self.clock.utc()).await?;
        debug!(message_id = %message_id, read_at = ?message.read_at(), "message marked read");
        Ok(message)
    }

    /// Returns a single message.
    ///
    /// # Errors
    ///
    /// Returns [`ChatServiceError::MessageNotFound`] when the message is
    /// absent or [`ChatServiceError::Repository`] when persistence fails.
    pub async fn get_message(&self, message_id: MessageId) -> ChatServiceResult<Message> {
        self.messages
            .find_message(message_id)
            .await?
            .ok_or(ChatServiceError::MessageNotFound(message_id))
    }
}
