//! Diesel row models for chat persistence.

use super::schema::{messages, room_participants, rooms};
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for rooms.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = rooms)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct RoomRow {
    /// Store-assigned room identifier.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Insert model for rooms.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = rooms)]
pub struct NewRoomRow {
    /// Display name.
    pub name: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Query result row for room memberships.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = room_participants)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ParticipantRow {
    /// Store-assigned participant identifier.
    pub id: i64,
    /// Owning room.
    pub room_id: i64,
    /// Member identity.
    pub user_identity: String,
    /// Join timestamp.
    pub joined_at: DateTime<Utc>,
}

/// Insert model for room memberships.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = room_participants)]
pub struct NewParticipantRow {
    /// Owning room.
    pub room_id: i64,
    /// Member identity.
    pub user_identity: String,
    /// Join timestamp.
    pub joined_at: DateTime<Utc>,
}

/// Query result row for messages.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = messages)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct MessageRow {
    /// Store-assigned message identifier.
    pub id: i64,
    /// Owning room.
    pub room_id: i64,
    /// Sender identity.
    pub sender_identity: String,
    /// Message body.
    pub content: String,
    /// Optional attachment reference.
    pub attachment_url: Option<String>,
    /// Optional reply target.
    pub reply_to: Option<i64>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Read timestamp.
    pub read_at: Option<DateTime<Utc>>,
}

/// Insert model for messages.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = messages)]
pub struct NewMessageRow {
    /// Owning room.
    pub room_id: i64,
    /// Sender identity.
    pub sender_identity: String,
    /// Message body.
    pub content: String,
    /// Optional attachment reference.
    pub attachment_url: Option<String>,
    /// Optional reply target.
    pub reply_to: Option<i64>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}
