//! Adapter implementations for chat persistence ports.

pub mod memory;

#[cfg(feature = "postgres")]
pub mod postgres;
