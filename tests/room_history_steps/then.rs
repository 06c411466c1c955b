//! Then steps for room history BDD scenarios.

use super::world::{RoomHistoryWorld, run_async};
use chatroom::handler::{
    StatusCode,
    wire::{GetRoomRequest, PaginatedMessagesResponse},
};
use rstest_bdd_macros::then;

fn history(world: &RoomHistoryWorld) -> Result<&PaginatedMessagesResponse, eyre::Report> {
    match world.last_history.as_ref() {
        Some(Ok(response)) => Ok(response),
        Some(Err(status)) => Err(eyre::eyre!("history request failed: {status}")),
        None => Err(eyre::eyre!("no history request in scenario world")),
    }
}

fn last_failure(world: &RoomHistoryWorld) -> Result<StatusCode, eyre::Report> {
    let history = world.last_history.as_ref().map(|r| r.as_ref().map(|_| ()));
    let membership = world.last_membership.as_ref().map(|r| r.as_ref().map(|_| ()));
    match history.or(membership) {
        Some(Err(status)) => Ok(status.code()),
        Some(Ok(())) => Err(eyre::eyre!("expected the last request to fail")),
        None => Err(eyre::eyre!("no request recorded in scenario world")),
    }
}

#[then("both members are listed as participants")]
fn members_listed(world: &RoomHistoryWorld) -> Result<(), eyre::Report> {
    let request = GetRoomRequest {
        room_id: world.room_id()?,
    };
    let roster = run_async(world.handler.get_room_participants(&world.ctx, request))
        .map_err(|status| eyre::eyre!("participants request failed: {status}"))?;
    let usernames: Vec<&str> = roster.users.iter().map(|u| u.username.as_str()).collect();
    if usernames != world.members {
        return Err(eyre::eyre!(
            "expected members {:?}, found {usernames:?}",
            world.members
        ));
    }
    Ok(())
}

#[then("{count:usize} messages are returned")]
fn messages_returned(world: &RoomHistoryWorld, count: usize) -> Result<(), eyre::Report> {
    let found = history(world)?.messages.len();
    if found != count {
        return Err(eyre::eyre!("expected {count} messages, found {found}"));
    }
    Ok(())
}

#[then("the returned messages are the oldest ones")]
fn oldest_returned(world: &RoomHistoryWorld) -> Result<(), eyre::Report> {
    let response = history(world)?;
    let returned: Vec<u64> = response.messages.iter().map(|m| m.message_id).collect();
    let oldest: Vec<u64> = world
        .saved_ids
        .iter()
        .copied()
        .take(returned.len())
        .collect();
    if returned != oldest {
        return Err(eyre::eyre!("expected {oldest:?}, found {returned:?}"));
    }
    Ok(())
}

#[then("the history reports {pages:u64} pages and {items:u64} messages")]
fn history_totals(world: &RoomHistoryWorld, pages: u64, items: u64) -> Result<(), eyre::Report> {
    let pagination = history(world)?.pagination;
    if pagination.total_pages != pages || pagination.total_items != items {
        return Err(eyre::eyre!(
            "expected {pages} pages and {items} items, found {} and {}",
            pagination.total_pages,
            pagination.total_items
        ));
    }
    Ok(())
}

#[then("the request fails with a not found status")]
fn fails_not_found(world: &RoomHistoryWorld) -> Result<(), eyre::Report> {
    let code = last_failure(world)?;
    if code != StatusCode::NotFound {
        return Err(eyre::eyre!("expected NotFound, got {code}"));
    }
    Ok(())
}

#[then("the request fails with an already exists status")]
fn fails_already_exists(world: &RoomHistoryWorld) -> Result<(), eyre::Report> {
    let code = last_failure(world)?;
    if code != StatusCode::AlreadyExists {
        return Err(eyre::eyre!("expected AlreadyExists, got {code}"));
    }
    Ok(())
}
