//! Room and membership orchestration.

use super::error::{ChatServiceError, ChatServiceResult};
use crate::chat::{
    domain::{
        ChatDomainError, NewParticipant, NewRoom, Room, RoomId, RoomName, RoomParticipant,
        UserIdentity,
    },
    ports::{RepositoryError, RoomRepository},
};
use mockable::Clock;
use std::sync::Arc;
use tracing::{info, warn};

/// Result of adding one identity during bulk room creation.
#[derive(Debug, Clone)]
pub enum MembershipStatus {
    /// The identity joined the room.
    Added(RoomParticipant),
    /// The identity was already a member, typically listed twice.
    AlreadyMember,
    /// The identity failed validation and was skipped.
    Rejected(ChatDomainError),
    /// The store failed while adding the identity.
    Failed(RepositoryError),
}

/// Per-identity result of [`RoomService::create_room_with_members`].
#[derive(Debug, Clone)]
pub struct MembershipOutcome {
    /// The identity exactly as supplied by the caller.
    pub identity: String,
    /// What happened to it.
    pub status: MembershipStatus,
}

/// A freshly created room together with the outcome for each requested
/// member.
#[derive(Debug, Clone)]
pub struct CreateRoomOutcome {
    /// The persisted room.
    pub room: Room,
    /// One entry per requested identity, in request order.
    pub memberships: Vec<MembershipOutcome>,
}

impl CreateRoomOutcome {
    /// Returns the participants that were added.
    pub fn added(&self) -> impl Iterator<Item = &RoomParticipant> {
        self.memberships.iter().filter_map(|outcome| match &outcome.status {
            MembershipStatus::Added(participant) => Some(participant),
            _ => None,
        })
    }
}

/// Room creation and participant management service.
#[derive(Clone)]
pub struct RoomService<R, C>
where
    R: RoomRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> RoomService<R, C>
where
    R: RoomRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new room service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Creates a room. Duplicate names are allowed.
    ///
    /// # Errors
    ///
    /// Returns [`ChatServiceError::Domain`] when the name is invalid, or
    /// [`ChatServiceError::Repository`] when persistence fails.
    pub async fn create_room(&self, name: &str) -> ChatServiceResult<Room> {
        let room_name = RoomName::new(name)?;
        let room = self
            .repository
            .insert_room(&NewRoom::new(room_name, &*self.clock))
            .await?;
        info!(room_id = %room.id(), room_name = %room.name(), "room created");
        Ok(room)
    }

    /// Creates a room and attempts to add each identity to it.
    ///
    /// Member failures never undo the room or earlier memberships; each is
    /// logged and reported in the returned outcome.
    ///
    /// # Errors
    ///
    /// Fails only when the room itself cannot be created.
    pub async fn create_room_with_members<I, S>(
        &self,
        name: &str,
        identities: I,
    ) -> ChatServiceResult<CreateRoomOutcome>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let room = self.create_room(name).await?;
        let mut memberships = Vec::new();

        for raw in identities {
            let identity = raw.as_ref().to_owned();
            let status = self.add_initial_member(room.id(), &identity).await;
            memberships.push(MembershipOutcome { identity, status });
        }

        Ok(CreateRoomOutcome { room, memberships })
    }

    async fn add_initial_member(&self, room_id: RoomId, raw: &str) -> MembershipStatus {
        let user = match UserIdentity::new(raw) {
            Ok(user) => user,
            Err(err) => {
                warn!(room_id = %room_id, identity = raw, error = %err, "rejected room member");
                return MembershipStatus::Rejected(err);
            }
        };

        let participant = NewParticipant::new(room_id, user, &*self.clock);
        match self.repository.insert_participant(&participant).await {
            Ok(added) => {
                info!(room_id = %room_id, user = %added.user(), "participant added");
                MembershipStatus::Added(added)
            }
            Err(RepositoryError::DuplicateParticipant { user, .. }) => {
                warn!(room_id = %room_id, user = %user, "member listed more than once");
                MembershipStatus::AlreadyMember
            }
            Err(err) => {
                warn!(room_id = %room_id, identity = raw, error = %err, "failed to add room member");
                MembershipStatus::Failed(err)
            }
        }
    }

    /// Adds an identity to an existing room and returns the room with its
    /// refreshed participant list.
    ///
    /// The room is resolved before the identity is validated, so a missing
    /// room always reports [`ChatServiceError::RoomNotFound`].
    ///
    /// # Errors
    ///
    /// Returns [`ChatServiceError::RoomNotFound`] when the room is absent,
    /// [`ChatServiceError::AlreadyParticipant`] when the identity is already
    /// a member, [`ChatServiceError::Domain`] for an invalid identity, or
    /// [`ChatServiceError::Repository`] when persistence fails.
    pub async fn add_room_participant(
        &self,
        room_id: RoomId,
        identity: &str,
    ) -> ChatServiceResult<(Room, Vec<RoomParticipant>)> {
        let room = self.require_room(room_id).await?;
        let user = UserIdentity::new(identity)?;

        let current = self.repository.list_participants(room_id).await?;
        if current.iter().any(|participant| participant.user() == &user) {
            return Err(ChatServiceError::AlreadyParticipant { room_id, user });
        }

        let added = self
            .repository
            .insert_participant(&NewParticipant::new(room_id, user, &*self.clock))
            .await?;
        info!(room_id = %room_id, user = %added.user(), "participant added");

        let participants = self.repository.list_participants(room_id).await?;
        Ok((room, participants))
    }

    /// Returns the room's participants in ascending participant-id order.
    ///
    /// # Errors
    ///
    /// Returns [`ChatServiceError::RoomNotFound`] when the room is absent or
    /// [`ChatServiceError::Repository`] when persistence fails.
    pub async fn get_room_participants(
        &self,
        room_id: RoomId,
    ) -> ChatServiceResult<Vec<RoomParticipant>> {
        self.require_room(room_id).await?;
        Ok(self.repository.list_participants(room_id).await?)
    }

    /// Returns the room's metadata.
    ///
    /// # Errors
    ///
    /// Returns [`ChatServiceError::RoomNotFound`] when the room is absent or
    /// [`ChatServiceError::Repository`] when persistence fails.
    pub async fn get_room_details(&self, room_id: RoomId) -> ChatServiceResult<Room> {
        self.require_room(room_id).await
    }

    /// Returns the room together with its participants.
    ///
    /// # Errors
    ///
    /// Returns [`ChatServiceError::RoomNotFound`] when the room is absent or
    /// [`ChatServiceError::Repository`] when persistence fails.
    pub async fn get_room_with_participants(
        &self,
        room_id: RoomId,
    ) -> ChatServiceResult<(Room, Vec<RoomParticipant>)> {
        let room = self.require_room(room_id).await?;
        let participants = self.repository.list_participants(room_id).await?;
        Ok((room, participants))
    }

    async fn require_room(&self, room_id: RoomId) -> ChatServiceResult<Room> {
        self.repository
            .find_room(room_id)
            .await?
            .ok_or(ChatServiceError::RoomNotFound(room_id))
    }
}
