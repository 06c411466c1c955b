//! `PostgreSQL` repository implementation for chat persistence.

use super::{
    models::{MessageRow, NewMessageRow, NewParticipantRow, NewRoomRow, ParticipantRow, RoomRow},
    schema::{messages, room_participants, rooms},
};
use crate::chat::{
    domain::{
        AttachmentUrl, Message, MessageContent, MessageId, NewMessage, NewParticipant, NewRoom,
        PageRequest, ParticipantId, PersistedMessageData, Room, RoomId, RoomName,
        RoomParticipant, UserIdentity,
    },
    ports::{MessagePage, MessageRepository, RepositoryError, RepositoryResult, RoomRepository},
};
use crate::config::ChatConfig;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by the chat adapter.
pub type ChatPgPool = Pool<ConnectionManager<PgConnection>>;

/// Foreign key tying messages to their room.
const MESSAGES_ROOM_FK: &str = "messages_room_id_fkey";

/// Unique index over `(room_id, user_identity)`.
const PARTICIPANTS_UNIQUE_INDEX: &str = "idx_room_participants_room_user";

/// `PostgreSQL`-backed chat store implementing both repository ports.
///
/// Blocking Diesel calls run on the blocking thread pool. Membership inserts
/// lock the room row for the duration of the duplicate check and insert, and
/// the unique index catches anything that slips past.
///
/// # Example
///
/// ```ignore
/// use chatroom::chat::adapters::postgres::PostgresChatStore;
/// use chatroom::config::ChatConfig;
///
/// let store = PostgresChatStore::from_config(&ChatConfig::from_env()?)?;
/// ```
#[derive(Debug, Clone)]
pub struct PostgresChatStore {
    pool: ChatPgPool,
}

impl PostgresChatStore {
    /// Creates a store from an existing connection pool.
    #[must_use]
    pub const fn new(pool: ChatPgPool) -> Self {
        Self { pool }
    }

    /// Builds a connection pool for `database_url` and wraps it in a store.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Persistence`] when the pool cannot be
    /// established.
    pub fn connect(database_url: &str, max_connections: u32) -> RepositoryResult<Self> {
        let manager = ConnectionManager::<PgConnection>::new(database_url);
        let pool = Pool::builder()
            .max_size(max_connections)
            .build(manager)
            .map_err(RepositoryError::persistence)?;
        Ok(Self::new(pool))
    }

    /// Connects using the URL and pool size from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Persistence`] when no database URL is
    /// configured or the pool cannot be established.
    pub fn from_config(config: &ChatConfig) -> RepositoryResult<Self> {
        let database_url = config
            .require_database_url()
            .map_err(RepositoryError::persistence)?;
        Self::connect(database_url, config.database_pool_size())
    }

    /// Returns a reference to the connection pool.
    #[must_use]
    pub const fn pool(&self) -> &ChatPgPool {
        &self.pool
    }

    async fn run_blocking<F, T>(&self, f: F) -> RepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> RepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(RepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(RepositoryError::persistence)?
    }
}

#[async_trait]
impl RoomRepository for PostgresChatStore {
    async fn insert_room(&self, room: &NewRoom) -> RepositoryResult<Room> {
        let new_row = NewRoomRow {
            name: room.name().as_str().to_owned(),
            created_at: room.created_at(),
        };

        self.run_blocking(move |connection| {
            let row = diesel::insert_into(rooms::table)
                .values(&new_row)
                .returning(RoomRow::as_returning())
                .get_result::<RoomRow>(connection)
                .map_err(RepositoryError::persistence)?;
            row_to_room(row)
        })
        .await
    }

    async fn find_room(&self, id: RoomId) -> RepositoryResult<Option<Room>> {
        self.run_blocking(move |connection| {
            let row = rooms::table
                .filter(rooms::id.eq(id.value()))
                .select(RoomRow::as_select())
                .first::<RoomRow>(connection)
                .optional()
                .map_err(RepositoryError::persistence)?;
            row.map(row_to_room).transpose()
        })
        .await
    }

    async fn insert_participant(
        &self,
        participant: &NewParticipant,
    ) -> RepositoryResult<RoomParticipant> {
        let room_id = participant.room_id();
        let user = participant.user().clone();
        let new_row = NewParticipantRow {
            room_id: room_id.value(),
            user_identity: user.as_str().to_owned(),
            joined_at: participant.joined_at(),
        };

        self.run_blocking(move |connection| {
            connection.transaction::<_, RepositoryError, _>(|tx| {
                let locked = rooms::table
                    .filter(rooms::id.eq(room_id.value()))
                    .select(rooms::id)
                    .for_update()
                    .load::<i64>(tx)?;
                if locked.is_empty() {
                    return Err(RepositoryError::RoomNotFound(room_id));
                }

                let existing = room_participants::table
                    .filter(room_participants::room_id.eq(room_id.value()))
                    .filter(room_participants::user_identity.eq(user.as_str()))
                    .count()
                    .get_result::<i64>(tx)?;
                if existing > 0 {
                    return Err(RepositoryError::DuplicateParticipant {
                        room_id,
                        user: user.clone(),
                    });
                }

                let row = diesel::insert_into(room_participants::table)
                    .values(&new_row)
                    .returning(ParticipantRow::as_returning())
                    .get_result::<ParticipantRow>(tx)
                    .map_err(|err| map_participant_insert_error(err, room_id, &user))?;
                row_to_participant(row)
            })
        })
        .await
    }

    async fn list_participants(&self, room_id: RoomId) -> RepositoryResult<Vec<RoomParticipant>> {
        self.run_blocking(move |connection| {
            let rows = room_participants::table
                .filter(room_participants::room_id.eq(room_id.value()))
                .order(room_participants::id.asc())
                .select(ParticipantRow::as_select())
                .load::<ParticipantRow>(connection)
                .map_err(RepositoryError::persistence)?;
            rows.into_iter().map(row_to_participant).collect()
        })
        .await
    }
}

#[async_trait]
impl MessageRepository for PostgresChatStore {
    async fn insert_message(&self, message: &NewMessage) -> RepositoryResult<Message> {
        let room_id = message.room_id();
        let new_row = NewMessageRow {
            room_id: room_id.value(),
            sender_identity: message.sender().as_str().to_owned(),
            content: message.content().as_str().to_owned(),
            attachment_url: message.attachment().map(|url| url.as_str().to_owned()),
            reply_to: message.reply_to().map(MessageId::value),
            created_at: message.created_at(),
        };

        self.run_blocking(move |connection| {
            let row = diesel::insert_into(messages::table)
                .values(&new_row)
                .returning(MessageRow::as_returning())
                .get_result::<MessageRow>(connection)
                .map_err(|err| map_message_insert_error(err, room_id))?;
            row_to_message(row)
        })
        .await
    }

    async fn find_message(&self, id: MessageId) -> RepositoryResult<Option<Message>> {
        self.run_blocking(move |connection| {
            let row = messages::table
                .filter(messages::id.eq(id.value()))
                .select(MessageRow::as_select())
                .first::<MessageRow>(connection)
                .optional()
                .map_err(RepositoryError::persistence)?;
            row.map(row_to_message).transpose()
        })
        .await
    }

    async fn page_messages(
        &self,
        room_id: RoomId,
        request: PageRequest,
    ) -> RepositoryResult<MessagePage> {
        let limit = i64::from(request.limit());
        let offset = i64::try_from(request.offset()).map_err(RepositoryError::persistence)?;

        self.run_blocking(move |connection| {
            connection
                .build_transaction()
                .read_only()
                .repeatable_read()
                .run::<_, RepositoryError, _>(|tx| {
                    let total = messages::table
                        .filter(messages::room_id.eq(room_id.value()))
                        .count()
                        .get_result::<i64>(tx)?;

                    let rows = messages::table
                        .filter(messages::room_id.eq(room_id.value()))
                        .order((messages::created_at.asc(), messages::id.asc()))
                        .limit(limit)
                        .offset(offset)
                        .select(MessageRow::as_select())
                        .load::<MessageRow>(tx)?;

                    let messages = rows
                        .into_iter()
                        .map(row_to_message)
                        .collect::<RepositoryResult<Vec<_>>>()?;
                    let total_items =
                        u64::try_from(total).map_err(RepositoryError::invalid_persisted_data)?;

                    Ok(MessagePage {
                        messages,
                        total_items,
                    })
                })
        })
        .await
    }

    async fn mark_read(&self, id: MessageId, read_at: DateTime<Utc>) -> RepositoryResult<Message> {
        self.run_blocking(move |connection| {
            connection.transaction::<_, RepositoryError, _>(|tx| {
                diesel::update(
                    messages::table
                        .filter(messages::id.eq(id.value()))
                        .filter(messages::read_at.is_null()),
                )
                .set(messages::read_at.eq(Some(read_at)))
                .execute(tx)?;

                let row = messages::table
                    .filter(messages::id.eq(id.value()))
                    .select(MessageRow::as_select())
                    .first::<MessageRow>(tx)
                    .optional()?;
                row.map(row_to_message)
                    .transpose()?
                    .ok_or(RepositoryError::MessageNotFound(id))
            })
        })
        .await
    }
}

fn row_to_room(row: RoomRow) -> RepositoryResult<Room> {
    let RoomRow {
        id,
        name,
        created_at,
    } = row;

    let parsed_id = RoomId::new(id).map_err(RepositoryError::invalid_persisted_data)?;
    let parsed_name = RoomName::new(name).map_err(RepositoryError::invalid_persisted_data)?;
    Ok(Room::from_persisted(parsed_id, parsed_name, created_at))
}

fn row_to_participant(row: ParticipantRow) -> RepositoryResult<RoomParticipant> {
    let ParticipantRow {
        id,
        room_id,
        user_identity,
        joined_at,
    } = row;

    let parsed_id = ParticipantId::new(id).map_err(RepositoryError::invalid_persisted_data)?;
    let parsed_room = RoomId::new(room_id).map_err(RepositoryError::invalid_persisted_data)?;
    let parsed_user =
        UserIdentity::new(user_identity).map_err(RepositoryError::invalid_persisted_data)?;
    Ok(RoomParticipant::from_persisted(
        parsed_id,
        parsed_room,
        parsed_user,
        joined_at,
    ))
}

fn row_to_message(row: MessageRow) -> RepositoryResult<Message> {
    let MessageRow {
        id,
        room_id,
        sender_identity,
        content,
        attachment_url,
        reply_to,
        created_at,
        read_at,
    } = row;

    let data = PersistedMessageData {
        id: MessageId::new(id).map_err(RepositoryError::invalid_persisted_data)?,
        room_id: RoomId::new(room_id).map_err(RepositoryError::invalid_persisted_data)?,
        sender: UserIdentity::new(sender_identity)
            .map_err(RepositoryError::invalid_persisted_data)?,
        content: MessageContent::new(content),
        attachment: attachment_url
            .map(AttachmentUrl::new)
            .transpose()
            .map_err(RepositoryError::invalid_persisted_data)?,
        reply_to: reply_to
            .map(MessageId::new)
            .transpose()
            .map_err(RepositoryError::invalid_persisted_data)?,
        created_at,
        read_at,
    };
    Ok(Message::from_persisted(data))
}

fn map_participant_insert_error(
    err: DieselError,
    room_id: RoomId,
    user: &UserIdentity,
) -> RepositoryError {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
            if info.constraint_name() == Some(PARTICIPANTS_UNIQUE_INDEX) =>
        {
            RepositoryError::DuplicateParticipant {
                room_id,
                user: user.clone(),
            }
        }
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
            RepositoryError::RoomNotFound(room_id)
        }
        _ => RepositoryError::persistence(err),
    }
}

fn map_message_insert_error(err: DieselError, room_id: RoomId) -> RepositoryError {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, ref info)
            if info.constraint_name() == Some(MESSAGES_ROOM_FK) =>
        {
            RepositoryError::RoomNotFound(room_id)
        }
        _ => RepositoryError::persistence(err),
    }
}
