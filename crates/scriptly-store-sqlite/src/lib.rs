//! SQLite backend for the Scriptly content store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! pool without blocking the async runtime. Each store operation is a single
//! `conn.call` round-trip; nothing spans two round-trips except the post-like
//! toggle, whose read-then-write window is part of the store contract.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
