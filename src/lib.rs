//! Chatroom: the room and message core of a chat backend.
//!
//! This crate manages chat rooms, the participants admitted to them, and the
//! messages exchanged inside them, and serves paginated history to callers.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain**: validated value types with no infrastructure dependencies
//! - **Ports**: repository traits the services depend on
//! - **Adapters**: an in-memory store and a `PostgreSQL` store (behind the
//!   `postgres` feature)
//!
//! # Modules
//!
//! - [`chat`]: domain, ports, adapters, and services
//! - [`handler`]: transport-agnostic RPC facade and wire shapes
//! - [`config`]: runtime configuration
//! - [`telemetry`]: tracing subscriber setup
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use chatroom::chat::adapters::memory::InMemoryChatStore;
//! use chatroom::chat::services::RoomService;
//! use mockable::DefaultClock;
//!
//! # tokio::runtime::Runtime::new().expect("runtime").block_on(async {
//! let rooms = RoomService::new(Arc::new(InMemoryChatStore::new()), Arc::new(DefaultClock));
//! let room = rooms.create_room("General").await.expect("room created");
//! assert_eq!(room.name().as_str(), "General");
//! # });
//! ```

pub mod chat;
pub mod config;
pub mod handler;
pub mod telemetry;
