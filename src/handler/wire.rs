//! Wire request and response shapes.
//!
//! These mirror the RPC contract field for field, in camelCase. Optional
//! domain values travel as sentinels here and only here: an absent
//! attachment or read time is `""` and an absent reply target is `0`.

use super::status::{Status, StatusCode};
use crate::chat::{
    domain::{Message, MessageId, PaginationResult, Room, RoomId, RoomParticipant},
    services::{self, MembershipOutcome, MembershipStatus},
};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Formats a timestamp as RFC 3339 in UTC.
#[must_use]
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

const fn wire_id(value: i64) -> u64 {
    value.unsigned_abs()
}

/// Resolves a wire room id. Zero and values beyond `i64::MAX` name no room.
///
/// # Errors
///
/// Returns a `NotFound` [`Status`] when no room can carry `value`.
pub fn resolve_room_id(value: u64) -> Result<RoomId, Status> {
    RoomId::try_from(value)
        .map_err(|_| Status::new(StatusCode::NotFound, format!("room {value} not found")))
}

/// Resolves a wire message id. Zero and values beyond `i64::MAX` name no
/// message.
///
/// # Errors
///
/// Returns a `NotFound` [`Status`] when no message can carry `value`.
pub fn resolve_message_id(value: u64) -> Result<MessageId, Status> {
    MessageId::try_from(value)
        .map_err(|_| Status::new(StatusCode::NotFound, format!("message {value} not found")))
}

/// `CreateRoom` request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateRoomRequest {
    /// Display name for the new room.
    pub room_name: String,
    /// Identities to add as initial members.
    pub user_emails: Vec<String>,
}

/// Outcome label for one requested member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberResultStatus {
    /// The identity joined the room.
    Added,
    /// The identity was listed more than once.
    AlreadyMember,
    /// The identity failed validation.
    Rejected,
    /// The store failed while adding the identity.
    Failed,
}

/// Per-member result in a [`CreateRoomResponse`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberResult {
    /// The identity as requested.
    pub user_email: String,
    /// What happened to it.
    pub status: MemberResultStatus,
    /// Failure detail; empty on success.
    pub detail: String,
}

impl From<&MembershipOutcome> for MemberResult {
    fn from(outcome: &MembershipOutcome) -> Self {
        let (status, detail) = match &outcome.status {
            MembershipStatus::Added(_) => (MemberResultStatus::Added, String::new()),
            MembershipStatus::AlreadyMember => (MemberResultStatus::AlreadyMember, String::new()),
            MembershipStatus::Rejected(err) => (MemberResultStatus::Rejected, err.to_string()),
            MembershipStatus::Failed(err) => (MemberResultStatus::Failed, err.to_string()),
        };
        Self {
            user_email: outcome.identity.clone(),
            status,
            detail,
        }
    }
}

/// `CreateRoom` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoomResponse {
    /// Assigned room id.
    pub room_id: u64,
    /// Stored room name.
    pub room_name: String,
    /// One entry per requested member, in request order.
    pub member_results: Vec<MemberResult>,
}

impl From<&services::CreateRoomOutcome> for CreateRoomResponse {
    fn from(outcome: &services::CreateRoomOutcome) -> Self {
        Self {
            room_id: wire_id(outcome.room.id().value()),
            room_name: outcome.room.name().as_str().to_owned(),
            member_results: outcome.memberships.iter().map(MemberResult::from).collect(),
        }
    }
}

/// `AddRoomParticipant` request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AddRoomParticipantRequest {
    /// Target room.
    pub room_id: u64,
    /// Identity to add.
    pub user_email: String,
}

/// `GetRoomParticipants` request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GetRoomRequest {
    /// Target room.
    pub room_id: u64,
}

/// A room participant on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireUser {
    /// The participant record id.
    pub user_id: u64,
    /// The participant identity.
    pub username: String,
}

impl From<&RoomParticipant> for WireUser {
    fn from(participant: &RoomParticipant) -> Self {
        Self {
            user_id: wire_id(participant.id().value()),
            username: participant.user().as_str().to_owned(),
        }
    }
}

/// Room envelope with its participant list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomParticipantsResponse {
    /// Room id.
    pub room_id: u64,
    /// Room name.
    pub room_name: String,
    /// Participants in ascending participant-id order.
    pub users: Vec<WireUser>,
}

impl RoomParticipantsResponse {
    /// Builds the envelope from a room and its participants.
    #[must_use]
    pub fn new(room: &Room, participants: &[RoomParticipant]) -> Self {
        Self {
            room_id: wire_id(room.id().value()),
            room_name: room.name().as_str().to_owned(),
            users: participants.iter().map(WireUser::from).collect(),
        }
    }
}

/// `SaveMessage` request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SaveMessageRequest {
    /// Target room.
    pub room_id: u64,
    /// Sender identity.
    pub sender_email: String,
    /// Message body.
    pub content: String,
    /// Attachment reference; empty means none.
    pub attachment_url: String,
    /// Reply target; `0` means none.
    pub reply_to: u64,
}

impl SaveMessageRequest {
    /// Converts sentinels into a service request.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when `room_id` names no room, and `Internal` when
    /// `reply_to` is out of range.
    pub fn into_service_request(self) -> Result<services::SaveMessageRequest, Status> {
        let Self {
            room_id,
            sender_email,
            content,
            attachment_url,
            reply_to,
        } = self;

        let mut request =
            services::SaveMessageRequest::new(resolve_room_id(room_id)?, sender_email, content);
        if !attachment_url.is_empty() {
            request = request.with_attachment(attachment_url);
        }
        if reply_to != 0 {
            let target = MessageId::try_from(reply_to)
                .map_err(|err| Status::from(services::ChatServiceError::from(err)))?;
            request = request.with_reply_to(target);
        }
        Ok(request)
    }
}

/// `SaveMessage` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveMessageResponse {
    /// Assigned message id.
    pub message_id: u64,
    /// Creation time, RFC 3339 UTC.
    pub created_at: String,
}

impl From<&Message> for SaveMessageResponse {
    fn from(message: &Message) -> Self {
        Self {
            message_id: wire_id(message.id().value()),
            created_at: format_timestamp(message.created_at()),
        }
    }
}

/// `GetRoomMessages` request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GetMessagesRequest {
    /// Target room.
    pub room_id: u64,
    /// Page size; must be positive.
    pub limit: i32,
    /// 1-indexed page number; must be positive.
    pub page: i32,
}

/// A message on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireMessage {
    /// Message id.
    pub message_id: u64,
    /// Sender identity.
    pub sender_email: String,
    /// Message body.
    pub content: String,
    /// Attachment reference or `""`.
    pub attachment_url: String,
    /// Reply target or `0`.
    pub reply_to: u64,
    /// Creation time, RFC 3339 UTC.
    pub sent_at: String,
    /// Read time, RFC 3339 UTC, or `""`.
    pub read_at: String,
}

impl From<&Message> for WireMessage {
    fn from(message: &Message) -> Self {
        Self {
            message_id: wire_id(message.id().value()),
            sender_email: message.sender().as_str().to_owned(),
            content: message.content().as_str().to_owned(),
            attachment_url: message
                .attachment()
                .map(|url| url.as_str().to_owned())
                .unwrap_or_default(),
            reply_to: message
                .reply_to()
                .map_or(0, |target| wire_id(target.value())),
            sent_at: format_timestamp(message.created_at()),
            read_at: message.read_at().map(format_timestamp).unwrap_or_default(),
        }
    }
}

/// Pagination block of a history response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WirePagination {
    /// 1-indexed page number served.
    pub page: u32,
    /// Effective page size after clamping.
    pub limit: u32,
    /// Ceiling of `total_items / limit`.
    pub total_pages: u64,
    /// Messages in the room.
    pub total_items: u64,
}

impl From<&PaginationResult> for WirePagination {
    fn from(result: &PaginationResult) -> Self {
        Self {
            page: result.page(),
            limit: result.limit(),
            total_pages: result.total_pages(),
            total_items: result.total_items(),
        }
    }
}

/// `GetRoomMessages` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedMessagesResponse {
    /// Room id.
    pub room_id: u64,
    /// Room name.
    pub room_name: String,
    /// Messages on this page, oldest first.
    pub messages: Vec<WireMessage>,
    /// Page metadata.
    pub pagination: WirePagination,
}

impl From<&services::RoomHistory> for PaginatedMessagesResponse {
    fn from(history: &services::RoomHistory) -> Self {
        Self {
            room_id: wire_id(history.room.id().value()),
            room_name: history.room.name().as_str().to_owned(),
            messages: history.page.messages().iter().map(WireMessage::from).collect(),
            pagination: WirePagination::from(&history.page),
        }
    }
}

/// `MarkMessageRead` request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MarkMessageReadRequest {
    /// Target message.
    pub message_id: u64,
}

/// `MarkMessageRead` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkMessageReadResponse {
    /// Message id.
    pub message_id: u64,
    /// The stored read time, RFC 3339 UTC.
    pub read_at: String,
}

impl From<&Message> for MarkMessageReadResponse {
    fn from(message: &Message) -> Self {
        Self {
            message_id: wire_id(message.id().value()),
            read_at: message.read_at().map(format_timestamp).unwrap_or_default(),
        }
    }
}
