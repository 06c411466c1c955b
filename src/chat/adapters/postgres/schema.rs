//! Diesel schema for chat persistence.

diesel::table! {
    /// Chat rooms.
    rooms (id) {
        /// Store-assigned room identifier.
        id -> Int8,
        /// Display name.
        #[max_length = 255]
        name -> Varchar,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Room memberships, unique per `(room_id, user_identity)`.
    room_participants (id) {
        /// Store-assigned participant identifier.
        id -> Int8,
        /// Owning room.
        room_id -> Int8,
        /// Member identity.
        #[max_length = 255]
        user_identity -> Varchar,
        /// Join timestamp.
        joined_at -> Timestamptz,
    }
}

diesel::table! {
    /// Chat messages.
    messages (id) {
        /// Store-assigned message identifier.
        id -> Int8,
        /// Owning room.
        room_id -> Int8,
        /// Sender identity.
        #[max_length = 255]
        sender_identity -> Varchar,
        /// Message body.
        content -> Text,
        /// Optional attachment reference.
        attachment_url -> Nullable<Text>,
        /// Optional reply target (weak reference without a foreign key).
        reply_to -> Nullable<Int8>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Read timestamp, set once.
        read_at -> Nullable<Timestamptz>,
    }
}

diesel::joinable!(room_participants -> rooms (room_id));
diesel::joinable!(messages -> rooms (room_id));
diesel::allow_tables_to_appear_in_same_query!(rooms, room_participants, messages);
