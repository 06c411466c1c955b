//! Shared fixtures for in-memory chat integration tests.

use std::sync::Arc;

use chatroom::{
    chat::{
        adapters::memory::InMemoryChatStore,
        domain::{Room, UserIdentity},
        services::{MessageService, RoomService, SaveMessageRequest},
    },
    config::ChatConfig,
    handler::{ChatHandler, RequestContext},
};
use mockable::DefaultClock;
use rstest::fixture;

/// Room service over the in-memory store.
pub type Rooms = RoomService<InMemoryChatStore, DefaultClock>;

/// Message service over the in-memory store.
pub type Messages = MessageService<InMemoryChatStore, InMemoryChatStore, DefaultClock>;

/// Handler over the in-memory store.
pub type Handler = ChatHandler<InMemoryChatStore, InMemoryChatStore, DefaultClock>;

/// Services sharing one store.
pub struct Services {
    /// Backing store, exposed for row-count assertions.
    pub store: Arc<InMemoryChatStore>,
    /// Room service.
    pub rooms: Rooms,
    /// Message service.
    pub messages: Messages,
}

impl Services {
    /// Creates a room with the given members.
    ///
    /// # Panics
    ///
    /// Panics when room creation fails.
    pub async fn room_with_members(&self, name: &str, members: &[&str]) -> Room {
        self.rooms
            .create_room_with_members(name, members.iter().copied())
            .await
            .expect("room creation should succeed")
            .room
    }

    /// Posts a message with content `body` from `sender`.
    ///
    /// # Panics
    ///
    /// Panics when the save fails.
    pub async fn post(&self, room: &Room, sender: &str, body: &str) {
        self.messages
            .save_message(SaveMessageRequest::new(room.id(), sender, body))
            .await
            .expect("message save should succeed");
    }
}

/// Provides services over a fresh store with default configuration.
#[fixture]
pub fn services() -> Services {
    let store = Arc::new(InMemoryChatStore::new());
    let clock = Arc::new(DefaultClock);
    Services {
        rooms: RoomService::new(Arc::clone(&store), Arc::clone(&clock)),
        messages: MessageService::new(
            Arc::clone(&store),
            Arc::clone(&store),
            clock,
            &ChatConfig::default(),
        ),
        store,
    }
}

/// Provides a handler over a fresh store.
#[fixture]
pub fn handler() -> Handler {
    ChatHandler::with_store(
        Arc::new(InMemoryChatStore::new()),
        Arc::new(DefaultClock),
        &ChatConfig::default(),
    )
}

/// Provides a request context for an authenticated caller.
#[fixture]
pub fn ctx() -> RequestContext {
    RequestContext::new(UserIdentity::new("caller@x.com").expect("valid identity"))
}
