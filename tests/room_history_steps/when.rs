//! When steps for room history BDD scenarios.

use super::world::{RoomHistoryWorld, run_async};
use chatroom::handler::wire::{AddRoomParticipantRequest, GetMessagesRequest};
use rstest_bdd_macros::when;

#[when("page {page:i32} of the history is requested with a limit of {limit:i32}")]
fn history_requested(
    world: &mut RoomHistoryWorld,
    page: i32,
    limit: i32,
) -> Result<(), eyre::Report> {
    let request = GetMessagesRequest {
        room_id: world.room_id()?,
        limit,
        page,
    };
    world.last_history = Some(run_async(
        world.handler.get_room_messages(&world.ctx, request),
    ));
    Ok(())
}

#[when("page {page:i32} of the history of room {room_id:u64} is requested with a limit of {limit:i32}")]
fn history_of_room_requested(world: &mut RoomHistoryWorld, page: i32, room_id: u64, limit: i32) {
    let request = GetMessagesRequest {
        room_id,
        limit,
        page,
    };
    world.last_history = Some(run_async(
        world.handler.get_room_messages(&world.ctx, request),
    ));
}

#[when(r#""{user}" is added to the room again"#)]
fn member_added_again(world: &mut RoomHistoryWorld, user: String) -> Result<(), eyre::Report> {
    let request = AddRoomParticipantRequest {
        room_id: world.room_id()?,
        user_email: user,
    };
    world.last_membership = Some(run_async(
        world.handler.add_room_participant(&world.ctx, request),
    ));
    Ok(())
}
