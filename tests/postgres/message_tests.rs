//! Message persistence and history paging against `PostgreSQL`.

use crate::postgres::helpers::{
    BoxError, FixedClock, PgContext, PostgresCluster, context, postgres_cluster, setup_context,
};
use chatroom::{
    chat::{
        domain::{MessageContent, MessageId, NewMessage, PageRequest, RoomId, UserIdentity},
        ports::{MessageRepository, RepositoryError},
        services::SaveMessageRequest,
    },
    config::ReplyPolicy,
};
use chrono::{TimeZone, Utc};
use mockable::{Clock, DefaultClock};
use rstest::rstest;

fn message(room_id: RoomId, body: &str, clock: &impl Clock) -> Result<NewMessage, BoxError> {
    Ok(NewMessage::new(
        room_id,
        UserIdentity::new("a@x.com")?,
        MessageContent::new(body),
        clock,
    ))
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn message_for_missing_room_is_room_not_found(
    #[future] context: Result<Option<PgContext>, BoxError>,
) -> Result<(), BoxError> {
    let Some(ctx) = context.await? else {
        return Ok(());
    };
    let missing = RoomId::new(4_040)?;

    let result = ctx
        .store
        .insert_message(&message(missing, "hello", &DefaultClock)?)
        .await;

    assert!(matches!(result, Err(RepositoryError::RoomNotFound(id)) if id == missing));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn equal_timestamps_page_in_id_order(
    #[future] context: Result<Option<PgContext>, BoxError>,
) -> Result<(), BoxError> {
    let Some(ctx) = context.await? else {
        return Ok(());
    };
    let room = ctx.room("General").await?;
    let other = ctx.room("Other").await?;
    let pinned = FixedClock(
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0)
            .single()
            .ok_or("ambiguous timestamp")?,
    );

    let mut stored = Vec::new();
    for body in ["one", "two", "three"] {
        stored.push(ctx.store.insert_message(&message(room.id(), body, &pinned)?).await?.id());
    }
    ctx.store
        .insert_message(&message(other.id(), "elsewhere", &pinned)?)
        .await?;

    let first = ctx
        .store
        .page_messages(room.id(), PageRequest::new(1, 2, 100)?)
        .await?;
    let second = ctx
        .store
        .page_messages(room.id(), PageRequest::new(2, 2, 100)?)
        .await?;
    let beyond = ctx
        .store
        .page_messages(room.id(), PageRequest::new(5, 2, 100)?)
        .await?;

    let read: Vec<MessageId> = first
        .messages
        .iter()
        .chain(second.messages.iter())
        .map(|m| m.id())
        .collect();
    assert_eq!(read, stored);
    assert_eq!(first.total_items, 3);
    assert!(beyond.messages.is_empty());
    assert_eq!(beyond.total_items, 3);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn history_through_service_reports_ceiling_totals(
    #[future] context: Result<Option<PgContext>, BoxError>,
) -> Result<(), BoxError> {
    let Some(ctx) = context.await? else {
        return Ok(());
    };
    let room = ctx.room("General").await?;
    for body in ["one", "two", "three"] {
        ctx.messages
            .save_message(SaveMessageRequest::new(room.id(), "a@x.com", body))
            .await?;
    }

    let history = ctx.messages.get_room_messages(room.id(), 2, 1).await?;

    let bodies: Vec<&str> = history
        .page
        .messages()
        .iter()
        .map(|m| m.content().as_str())
        .collect();
    assert_eq!(bodies, vec!["one", "two"]);
    assert_eq!(history.page.total_pages(), 2);
    assert_eq!(history.page.total_items(), 3);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn mark_read_keeps_the_first_timestamp(
    #[future] context: Result<Option<PgContext>, BoxError>,
) -> Result<(), BoxError> {
    let Some(ctx) = context.await? else {
        return Ok(());
    };
    let room = ctx.room("General").await?;
    let saved = ctx
        .store
        .insert_message(&message(room.id(), "hello", &DefaultClock)?)
        .await?;
    let earlier = Utc
        .with_ymd_and_hms(2026, 3, 1, 12, 0, 0)
        .single()
        .ok_or("ambiguous timestamp")?;
    let later = Utc
        .with_ymd_and_hms(2026, 3, 2, 12, 0, 0)
        .single()
        .ok_or("ambiguous timestamp")?;

    let first = ctx.store.mark_read(saved.id(), earlier).await?;
    let second = ctx.store.mark_read(saved.id(), later).await?;
    let fetched = ctx.store.find_message(saved.id()).await?;

    assert_eq!(first.read_at(), Some(earlier));
    assert_eq!(second.read_at(), Some(earlier));
    assert_eq!(fetched.and_then(|m| m.read_at()), Some(earlier));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn mark_read_on_missing_message_fails(
    #[future] context: Result<Option<PgContext>, BoxError>,
) -> Result<(), BoxError> {
    let Some(ctx) = context.await? else {
        return Ok(());
    };
    let missing = MessageId::new(77)?;

    let result = ctx.store.mark_read(missing, Utc::now()).await;

    assert!(matches!(result, Err(RepositoryError::MessageNotFound(id)) if id == missing));
    assert!(ctx.store.find_message(missing).await?.is_none());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unchecked_policy_stores_dangling_reply(
    postgres_cluster: Result<Option<PostgresCluster>, BoxError>,
) -> Result<(), BoxError> {
    let Some(cluster) = postgres_cluster? else {
        return Ok(());
    };
    let ctx = setup_context(cluster, ReplyPolicy::Unchecked).await?;
    let room = ctx.room("General").await?;
    let ghost = MessageId::new(404)?;

    let saved = ctx
        .messages
        .save_message(SaveMessageRequest::new(room.id(), "a@x.com", "re").with_reply_to(ghost))
        .await?;
    let fetched = ctx.store.find_message(saved.id()).await?;

    assert_eq!(fetched.and_then(|m| m.reply_to()), Some(ghost));
    Ok(())
}
