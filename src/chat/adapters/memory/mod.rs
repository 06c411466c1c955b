//! In-memory adapter implementing both chat repository ports.
//!
//! One lock guards rooms, memberships, and messages so that the
//! participant check-then-insert and the history count-then-slice are each
//! atomic, mirroring the transactional guarantees of the `PostgreSQL`
//! adapter.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::chat::{
    domain::{
        Message, MessageId, NewMessage, NewParticipant, NewRoom, PageRequest, ParticipantId,
        Room, RoomId, RoomParticipant,
    },
    ports::{MessagePage, MessageRepository, RepositoryError, RepositoryResult, RoomRepository},
};

/// Thread-safe in-memory chat store.
///
/// Identifiers are assigned from per-table counters starting at 1, like a
/// `BIGSERIAL` column.
///
/// # Example
///
/// ```
/// use chatroom::chat::adapters::memory::InMemoryChatStore;
///
/// let store = InMemoryChatStore::new();
/// assert_eq!(store.room_count(), 0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryChatStore {
    state: Arc<RwLock<StoreState>>,
}

#[derive(Debug, Default)]
struct StoreState {
    last_room_id: i64,
    last_participant_id: i64,
    last_message_id: i64,
    rooms: BTreeMap<RoomId, Room>,
    participants: BTreeMap<ParticipantId, RoomParticipant>,
    messages: BTreeMap<MessageId, Message>,
}

impl InMemoryChatStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored rooms.
    ///
    /// Returns `0` if the internal lock is poisoned.
    #[must_use]
    pub fn room_count(&self) -> usize {
        self.state.read().map(|state| state.rooms.len()).unwrap_or(0)
    }

    /// Returns the number of stored memberships across all rooms.
    ///
    /// Returns `0` if the internal lock is poisoned.
    #[must_use]
    pub fn participant_count(&self) -> usize {
        self.state
            .read()
            .map(|state| state.participants.len())
            .unwrap_or(0)
    }

    fn read(&self) -> RepositoryResult<RwLockReadGuard<'_, StoreState>> {
        self.state
            .read()
            .map_err(|err| RepositoryError::persistence(std::io::Error::other(err.to_string())))
    }

    fn write(&self) -> RepositoryResult<RwLockWriteGuard<'_, StoreState>> {
        self.state
            .write()
            .map_err(|err| RepositoryError::persistence(std::io::Error::other(err.to_string())))
    }
}

fn next_id(counter: &mut i64) -> i64 {
    *counter = counter.saturating_add(1);
    *counter
}

#[async_trait]
impl RoomRepository for InMemoryChatStore {
    async fn insert_room(&self, room: &NewRoom) -> RepositoryResult<Room> {
        let mut state = self.write()?;
        let id = RoomId::new(next_id(&mut state.last_room_id))
            .map_err(RepositoryError::invalid_persisted_data)?;
        let stored = Room::from_persisted(id, room.name().clone(), room.created_at());
        state.rooms.insert(id, stored.clone());
        Ok(stored)
    }

    async fn find_room(&self, id: RoomId) -> RepositoryResult<Option<Room>> {
        let state = self.read()?;
        Ok(state.rooms.get(&id).cloned())
    }

    async fn insert_participant(
        &self,
        participant: &NewParticipant,
    ) -> RepositoryResult<RoomParticipant> {
        let mut state = self.write()?;
        let room_id = participant.room_id();

        if !state.rooms.contains_key(&room_id) {
            return Err(RepositoryError::RoomNotFound(room_id));
        }

        let already_member = state
            .participants
            .values()
            .any(|p| p.room_id() == room_id && p.user() == participant.user());
        if already_member {
            return Err(RepositoryError::DuplicateParticipant {
                room_id,
                user: participant.user().clone(),
            });
        }

        let id = ParticipantId::new(next_id(&mut state.last_participant_id))
            .map_err(RepositoryError::invalid_persisted_data)?;
        let stored = RoomParticipant::from_persisted(
            id,
            room_id,
            participant.user().clone(),
            participant.joined_at(),
        );
        state.participants.insert(id, stored.clone());
        Ok(stored)
    }

    async fn list_participants(&self, room_id: RoomId) -> RepositoryResult<Vec<RoomParticipant>> {
        let state = self.read()?;
        Ok(state
            .participants
            .values()
            .filter(|p| p.room_id() == room_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl MessageRepository for InMemoryChatStore {
    async fn insert_message(&self, message: &NewMessage) -> RepositoryResult<Message> {
        let mut state = self.write()?;

        if !state.rooms.contains_key(&message.room_id()) {
            return Err(RepositoryError::RoomNotFound(message.room_id()));
        }

        let id = MessageId::new(next_id(&mut state.last_message_id))
            .map_err(RepositoryError::invalid_persisted_data)?;
        let stored = Message::from_new(id, message.clone());
        state.messages.insert(id, stored.clone());
        Ok(stored)
    }

    async fn find_message(&self, id: MessageId) -> RepositoryResult<Option<Message>> {
        let state = self.read()?;
        Ok(state.messages.get(&id).cloned())
    }

    async fn page_messages(
        &self,
        room_id: RoomId,
        request: PageRequest,
    ) -> RepositoryResult<MessagePage> {
        let state = self.read()?;

        let mut history: Vec<&Message> = state
            .messages
            .values()
            .filter(|m| m.room_id() == room_id)
            .collect();
        history.sort_by_key(|m| (m.created_at(), m.id()));

        let total_items = u64::try_from(history.len()).unwrap_or(u64::MAX);
        let offset = usize::try_from(request.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(request.limit()).unwrap_or(usize::MAX);
        let messages = history
            .into_iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect();

        Ok(MessagePage {
            messages,
            total_items,
        })
    }

    async fn mark_read(&self, id: MessageId, read_at: DateTime<Utc>) -> RepositoryResult<Message> {
        let mut state = self.write()?;
        let message = state
            .messages
            .get_mut(&id)
            .ok_or(RepositoryError::MessageNotFound(id))?;
        message.mark_read(read_at);
        Ok(message.clone())
    }
}
