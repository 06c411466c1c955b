//! Request handler facade over the chat services.
//!
//! [`ChatHandler`] is the transport-agnostic RPC surface. A gRPC or HTTP
//! server deserializes into the shapes in [`wire`], builds a
//! [`RequestContext`] for the authenticated caller, and forwards the call.
//! Failures come back as [`Status`] values.

mod chat;
mod context;
mod status;
pub mod wire;

pub use chat::ChatHandler;
pub use context::RequestContext;
pub use status::{Status, StatusCode};
