//! In-memory entity store for Switchboard
//!
//! Keyed tables for customers, conversations, per-conversation messages,
//! resolutions, and issued tokens. Nothing persists: lifetime equals
//! process lifetime.
//!
//! One `RwLock` guards all tables. A mutating operation takes the write
//! guard once and performs every read and write under it, so a multi-entity
//! update (escalate: flip state, create resolution, append message) is
//! atomic with respect to other requests. A persistent backend would
//! replace this crate behind the same method surface without touching the
//! lifecycle logic.

pub mod tables;

pub use tables::{EntityTable, MessageLog, Store, Tables, TokenTable};
