//! RPC facade translating wire requests into service calls.

use super::{
    context::RequestContext,
    status::Status,
    wire::{
        self, AddRoomParticipantRequest, CreateRoomRequest, CreateRoomResponse,
        GetMessagesRequest, GetRoomRequest, MarkMessageReadRequest, MarkMessageReadResponse,
        PaginatedMessagesResponse, RoomParticipantsResponse, SaveMessageResponse,
    },
};
use crate::chat::{
    ports::{MessageRepository, RoomRepository},
    services::{ChatServiceError, MessageService, RoomService},
};
use crate::config::ChatConfig;
use mockable::Clock;
use std::sync::Arc;
use tracing::{Instrument, Span, info, info_span, warn};

/// Chat RPC handler.
///
/// Each method records an `rpc` span carrying the request id and caller,
/// converts sentinels and raw ids, delegates to the services, and maps
/// failures to [`Status`].
#[derive(Clone)]
pub struct ChatHandler<R, M, C>
where
    R: RoomRepository,
    M: MessageRepository,
    C: Clock + Send + Sync,
{
    rooms: RoomService<R, C>,
    messages: MessageService<R, M, C>,
}

impl<S, C> ChatHandler<S, S, C>
where
    S: RoomRepository + MessageRepository,
    C: Clock + Send + Sync,
{
    /// Builds both services over a single store implementing both ports.
    #[must_use]
    pub fn with_store(store: Arc<S>, clock: Arc<C>, config: &ChatConfig) -> Self {
        let rooms = RoomService::new(Arc::clone(&store), Arc::clone(&clock));
        let messages = MessageService::new(Arc::clone(&store), store, clock, config);
        Self::new(rooms, messages)
    }
}

impl<R, M, C> ChatHandler<R, M, C>
where
    R: RoomRepository,
    M: MessageRepository,
    C: Clock + Send + Sync,
{
    /// Creates a handler from prepared services.
    #[must_use]
    pub const fn new(rooms: RoomService<R, C>, messages: MessageService<R, M, C>) -> Self {
        Self { rooms, messages }
    }

    /// Creates a room and adds the listed members, reporting each member's
    /// outcome.
    ///
    /// # Errors
    ///
    /// Returns a [`Status`] when the room itself cannot be created.
    pub async fn create_room(
        &self,
        ctx: &RequestContext,
        request: CreateRoomRequest,
    ) -> Result<CreateRoomResponse, Status> {
        let CreateRoomRequest {
            room_name,
            user_emails,
        } = request;
        async {
            info!(room_name = %room_name, members = user_emails.len(), "CreateRoom received");
            let outcome = self
                .rooms
                .create_room_with_members(&room_name, user_emails)
                .await
                .map_err(failed)?;
            Ok(CreateRoomResponse::from(&outcome))
        }
        .instrument(rpc_span(ctx, "CreateRoom"))
        .await
    }

    /// Adds one participant to an existing room.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for a missing room, `AlreadyExists` for an existing
    /// member, and `Internal` otherwise.
    pub async fn add_room_participant(
        &self,
        ctx: &RequestContext,
        request: AddRoomParticipantRequest,
    ) -> Result<RoomParticipantsResponse, Status> {
        let AddRoomParticipantRequest {
            room_id: raw_room_id,
            user_email,
        } = request;
        async {
            info!(room_id = raw_room_id, user = %user_email, "AddRoomParticipant received");
            let room_id = wire::resolve_room_id(raw_room_id).map_err(unresolved)?;
            let (room, participants) = self
                .rooms
                .add_room_participant(room_id, &user_email)
                .await
                .map_err(failed)?;
            Ok(RoomParticipantsResponse::new(&room, &participants))
        }
        .instrument(rpc_span(ctx, "AddRoomParticipant"))
        .await
    }

    /// Stores a message.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for a missing room and `Internal` for invalid input
    /// or store failures.
    pub async fn save_message(
        &self,
        ctx: &RequestContext,
        request: wire::SaveMessageRequest,
    ) -> Result<SaveMessageResponse, Status> {
        async {
            info!(room_id = request.room_id, "SaveMessage received");
            let service_request = request.into_service_request().map_err(unresolved)?;
            let message = self
                .messages
                .save_message(service_request)
                .await
                .map_err(failed)?;
            Ok(SaveMessageResponse::from(&message))
        }
        .instrument(rpc_span(ctx, "SaveMessage"))
        .await
    }

    /// Lists a room's participants.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for a missing room, including ids no room can
    /// carry, and `Internal` otherwise.
    pub async fn get_room_participants(
        &self,
        ctx: &RequestContext,
        request: GetRoomRequest,
    ) -> Result<RoomParticipantsResponse, Status> {
        async {
            info!(room_id = request.room_id, "GetRoomParticipants received");
            let room_id = wire::resolve_room_id(request.room_id).map_err(unresolved)?;
            let (room, participants) = self
                .rooms
                .get_room_with_participants(room_id)
                .await
                .map_err(failed)?;
            info!(participants = participants.len(), "participants fetched");
            Ok(RoomParticipantsResponse::new(&room, &participants))
        }
        .instrument(rpc_span(ctx, "GetRoomParticipants"))
        .await
    }

    /// Returns one page of room history, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for a missing room and `Internal` for non-positive
    /// `limit`/`page` or store failures.
    pub async fn get_room_messages(
        &self,
        ctx: &RequestContext,
        request: GetMessagesRequest,
    ) -> Result<PaginatedMessagesResponse, Status> {
        async {
            info!(
                room_id = request.room_id,
                limit = request.limit,
                page = request.page,
                "GetRoomMessages received"
            );
            let room_id = wire::resolve_room_id(request.room_id).map_err(unresolved)?;
            let history = self
                .messages
                .get_room_messages(room_id, i64::from(request.limit), i64::from(request.page))
                .await
                .map_err(failed)?;
            Ok(PaginatedMessagesResponse::from(&history))
        }
        .instrument(rpc_span(ctx, "GetRoomMessages"))
        .await
    }

    /// Marks a message as read; repeated calls keep the first read time.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for a missing message and `Internal` otherwise.
    pub async fn mark_message_read(
        &self,
        ctx: &RequestContext,
        request: MarkMessageReadRequest,
    ) -> Result<MarkMessageReadResponse, Status> {
        async {
            info!(message_id = request.message_id, "MarkMessageRead received");
            let message_id = wire::resolve_message_id(request.message_id).map_err(unresolved)?;
            let message = self
                .messages
                .mark_message_read(message_id)
                .await
                .map_err(failed)?;
            Ok(MarkMessageReadResponse::from(&message))
        }
        .instrument(rpc_span(ctx, "MarkMessageRead"))
        .await
    }
}

fn rpc_span(ctx: &RequestContext, rpc: &'static str) -> Span {
    info_span!(
        "rpc",
        rpc,
        request_id = %ctx.request_id(),
        caller = %ctx.caller()
    )
}

fn unresolved(status: Status) -> Status {
    warn!(error = %status, "request refused before reaching the services");
    status
}

fn failed(err: ChatServiceError) -> Status {
    warn!(error = %err, kind = ?err.kind(), "request failed");
    Status::from(err)
}
