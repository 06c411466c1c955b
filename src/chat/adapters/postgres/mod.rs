//! `PostgreSQL` adapter for chat persistence.
//!
//! Enabled by the `postgres` feature. The schema lives in
//! `migrations/2026-10-01-000000_create_chat_tables`.

mod models;
mod repository;
mod schema;

pub use repository::{ChatPgPool, PostgresChatStore};
