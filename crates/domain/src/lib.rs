//! Domain entities, state machines, and the actor contract for Switchboard

pub mod auth;
pub mod entities;
pub mod state;

pub use auth::{AuthUser, StaticUserDirectory, UserDirectory};
pub use entities::*;
pub use state::{ConversationEvent, ConversationState, ConversationStateMachine, StateError};
