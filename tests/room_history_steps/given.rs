//! Given steps for room history BDD scenarios.

use super::world::{RoomHistoryWorld, run_async};
use chatroom::handler::wire::{CreateRoomRequest, SaveMessageRequest};
use eyre::WrapErr;
use rstest_bdd_macros::given;

#[given(r#"a room named "{name}" with members "{first}" and "{second}""#)]
fn a_room_with_members(
    world: &mut RoomHistoryWorld,
    name: String,
    first: String,
    second: String,
) -> Result<(), eyre::Report> {
    let members = vec![first, second];
    let request = CreateRoomRequest {
        room_name: name,
        user_emails: members.clone(),
    };
    let created = run_async(world.handler.create_room(&world.ctx, request))
        .wrap_err("create room for scenario")?;
    world.room_id = Some(created.room_id);
    world.members = members;
    Ok(())
}

#[given(r#""{sender}" posts {count:usize} messages"#)]
fn sender_posts_messages(
    world: &mut RoomHistoryWorld,
    sender: String,
    count: usize,
) -> Result<(), eyre::Report> {
    let room_id = world.room_id()?;
    for n in 1..=count {
        let request = SaveMessageRequest {
            room_id,
            sender_email: sender.clone(),
            content: format!("message {n}"),
            ..SaveMessageRequest::default()
        };
        let saved = run_async(world.handler.save_message(&world.ctx, request))
            .wrap_err("save scenario message")?;
        world.saved_ids.push(saved.message_id);
    }
    Ok(())
}

#[given("no room has been created")]
fn no_room_created(world: &mut RoomHistoryWorld) {
    world.room_id = None;
}
