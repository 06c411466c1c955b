//! Room membership records.

use super::{ParticipantId, RoomId, UserIdentity};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// A membership that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewParticipant {
    room_id: RoomId,
    user: UserIdentity,
    joined_at: DateTime<Utc>,
}

impl NewParticipant {
    /// Prepares a membership for insertion, stamped with the current clock
    /// time.
    #[must_use]
    pub fn new(room_id: RoomId, user: UserIdentity, clock: &impl Clock) -> Self {
        Self {
            room_id,
            user,
            joined_at: clock.utc(),
        }
    }

    /// Returns the room being joined.
    #[must_use]
    pub const fn room_id(&self) -> RoomId {
        self.room_id
    }

    /// Returns the joining identity.
    #[must_use]
    pub const fn user(&self) -> &UserIdentity {
        &self.user
    }

    /// Returns the join timestamp.
    #[must_use]
    pub const fn joined_at(&self) -> DateTime<Utc> {
        self.joined_at
    }
}

/// A user's membership in a room. Never mutated once stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomParticipant {
    id: ParticipantId,
    room_id: RoomId,
    user: UserIdentity,
    joined_at: DateTime<Utc>,
}

impl RoomParticipant {
    /// Reconstructs a participant from persisted storage.
    #[must_use]
    pub const fn from_persisted(
        id: ParticipantId,
        room_id: RoomId,
        user: UserIdentity,
        joined_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            room_id,
            user,
            joined_at,
        }
    }

    /// Returns the participant's own identifier.
    #[must_use]
    pub const fn id(&self) -> ParticipantId {
        self.id
    }

    /// Returns the owning room.
    #[must_use]
    pub const fn room_id(&self) -> RoomId {
        self.room_id
    }

    /// Returns the member identity.
    #[must_use]
    pub const fn user(&self) -> &UserIdentity {
        &self.user
    }

    /// Returns the join timestamp.
    #[must_use]
    pub const fn joined_at(&self) -> DateTime<Utc> {
        self.joined_at
    }
}
