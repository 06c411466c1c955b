//! Port contracts for chat persistence.
//!
//! Ports define infrastructure-agnostic interfaces used by the room and
//! message services.

pub mod repository;

pub use repository::{
    MessagePage, MessageRepository, RepositoryError, RepositoryResult, RoomRepository,
};
