//! Keyed in-memory tables and the shared store handle

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

use switchboard_domain::{Conversation, Customer, Message, Resolution, Token};

/// Generic keyed table preserving insertion order for listings
#[derive(Debug)]
pub struct EntityTable<T> {
    rows: HashMap<Uuid, T>,
    order: Vec<Uuid>,
}

impl<T> Default for EntityTable<T> {
    fn default() -> Self {
        Self {
            rows: HashMap::new(),
            order: Vec::new(),
        }
    }
}

impl<T> EntityTable<T> {
    pub fn insert(&mut self, id: Uuid, row: T) {
        if self.rows.insert(id, row).is_none() {
            self.order.push(id);
        }
    }

    pub fn get(&self, id: &Uuid) -> Option<&T> {
        self.rows.get(id)
    }

    pub fn get_mut(&mut self, id: &Uuid) -> Option<&mut T> {
        self.rows.get_mut(id)
    }

    pub fn contains(&self, id: &Uuid) -> bool {
        self.rows.contains_key(id)
    }

    /// All rows in insertion order
    pub fn list(&self) -> Vec<&T> {
        self.order.iter().filter_map(|id| self.rows.get(id)).collect()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Append-only per-conversation message sequences. Insertion order is
/// chronological order.
#[derive(Debug, Default)]
pub struct MessageLog {
    by_conversation: HashMap<Uuid, Vec<Message>>,
}

impl MessageLog {
    pub fn append(&mut self, message: Message) {
        self.by_conversation
            .entry(message.conversation_id)
            .or_default()
            .push(message);
    }

    pub fn list(&self, conversation_id: &Uuid) -> &[Message] {
        self.by_conversation
            .get(conversation_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn count(&self, conversation_id: &Uuid) -> usize {
        self.list(conversation_id).len()
    }
}

/// Issued bearer tokens, keyed by the opaque token string
#[derive(Debug, Default)]
pub struct TokenTable {
    by_token: HashMap<String, Token>,
}

impl TokenTable {
    pub fn insert(&mut self, token: Token) {
        self.by_token.insert(token.token.clone(), token);
    }

    pub fn get(&self, token: &str) -> Option<&Token> {
        self.by_token.get(token)
    }
}

/// All entity tables, mutated together under one lock
#[derive(Debug, Default)]
pub struct Tables {
    pub customers: EntityTable<Customer>,
    pub conversations: EntityTable<Conversation>,
    pub messages: MessageLog,
    pub resolutions: EntityTable<Resolution>,
    pub tokens: TokenTable,
}

/// Cloneable handle to the shared store
#[derive(Debug, Clone, Default)]
pub struct Store {
    inner: Arc<RwLock<Tables>>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared read access for lookups and listings
    pub async fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.inner.read().await
    }

    /// Exclusive access for the duration of one mutating operation
    pub async fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.inner.write().await
    }
}
