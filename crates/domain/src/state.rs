//! State machine for the conversation lifecycle
//!
//! States: open, awaiting_customer, awaiting_agent, escalated, resolved.
//! `resolved` is terminal — there is no reopen event, and message traffic on
//! a resolved conversation is bookkeeping only.

pub use switchboard_common::StateError;

use crate::entities::{Direction, SenderType};

/// Conversation lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConversationState {
    Open,
    AwaitingCustomer,
    AwaitingAgent,
    Escalated,
    Resolved,
}

impl ConversationState {
    /// Check if this is a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Resolved)
    }

    /// Get all valid next states from current state
    pub fn valid_transitions(&self) -> &'static [ConversationState] {
        match self {
            Self::Open | Self::AwaitingCustomer | Self::AwaitingAgent | Self::Escalated => &[
                Self::AwaitingCustomer,
                Self::AwaitingAgent,
                Self::Escalated,
                Self::Resolved,
            ],
            Self::Resolved => &[],
        }
    }
}

impl std::fmt::Display for ConversationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::AwaitingCustomer => write!(f, "awaiting_customer"),
            Self::AwaitingAgent => write!(f, "awaiting_agent"),
            Self::Escalated => write!(f, "escalated"),
            Self::Resolved => write!(f, "resolved"),
        }
    }
}

/// Events that trigger conversation state transitions
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConversationEvent {
    /// An agent is assigned to the conversation
    Assign,
    /// The conversation is escalated
    Escalate,
    /// The conversation is resolved
    Resolve,
}

impl std::fmt::Display for ConversationEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Assign => write!(f, "assign"),
            Self::Escalate => write!(f, "escalate"),
            Self::Resolve => write!(f, "resolve"),
        }
    }
}

/// Conversation state machine
pub struct ConversationStateMachine;

impl ConversationStateMachine {
    /// Attempt a state transition
    ///
    /// Returns the new state if the transition is valid, or an error
    /// otherwise.
    pub fn transition(
        current: ConversationState,
        event: ConversationEvent,
    ) -> Result<ConversationState, StateError> {
        if current.is_terminal() {
            return Err(StateError::TerminalState(current.to_string()));
        }

        let next = match event {
            ConversationEvent::Assign => ConversationState::AwaitingAgent,
            ConversationEvent::Escalate => ConversationState::Escalated,
            ConversationEvent::Resolve => ConversationState::Resolved,
        };

        Ok(next)
    }

    /// State after a message is posted. Message traffic never fails: an
    /// agent reply hands the conversation to the customer, a customer reply
    /// hands it back to an agent, and every other direction/sender
    /// combination (internal notes, system records) leaves the state alone.
    /// A resolved conversation stays resolved.
    pub fn after_message(
        current: ConversationState,
        direction: Direction,
        sender_type: SenderType,
    ) -> ConversationState {
        if current.is_terminal() {
            return current;
        }

        match (direction, sender_type) {
            (Direction::Outbound, SenderType::Agent) => ConversationState::AwaitingCustomer,
            (Direction::Inbound, SenderType::Customer) => ConversationState::AwaitingAgent,
            _ => current,
        }
    }
}
