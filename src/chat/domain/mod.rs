//! Domain model for chat rooms, memberships, and message history.
//!
//! The chat domain models rooms, the participants admitted to them, and the
//! messages exchanged inside them. All infrastructure concerns are kept
//! outside the domain boundary; identifiers are assigned by the store.

mod error;
mod identity;
mod ids;
mod message;
mod pagination;
mod participant;
mod room;

pub use error::ChatDomainError;
pub use identity::UserIdentity;
pub use ids::{MessageId, ParticipantId, RoomId};
pub use message::{AttachmentUrl, Message, MessageContent, NewMessage, PersistedMessageData};
pub use pagination::{PageRequest, PaginationResult};
pub use participant::{NewParticipant, RoomParticipant};
pub use room::{NewRoom, Room, RoomName};
