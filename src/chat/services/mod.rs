//! Application services for rooms, memberships, and messages.

mod error;
mod messages;
mod rooms;

pub use error::{ChatServiceError, ChatServiceResult, ErrorKind};
pub use messages::{MessageService, RoomHistory, SaveMessageRequest};
pub use rooms::{CreateRoomOutcome, MembershipOutcome, MembershipStatus, RoomService};
