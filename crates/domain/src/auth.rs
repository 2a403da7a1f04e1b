//! Actor lookup and the injected user directory
//!
//! The lifecycle engine never owns credential storage. It consumes a
//! `UserDirectory` — normally backed by a real identity provider — through
//! this narrow trait, and only records the identifiers the directory hands
//! back.

use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use switchboard_common::{hash_secret, verify_secret};

/// An authenticated user, as reported by the directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: String,
}

/// User directory trait for different identity backends
#[async_trait::async_trait]
pub trait UserDirectory: Send + Sync {
    /// Verify credentials, returning the matching user on success.
    ///
    /// Implementations must behave identically for an unknown email and a
    /// wrong password so the login endpoint cannot be used to probe for
    /// accounts.
    async fn authenticate(&self, email: &str, password: &str) -> Option<AuthUser>;
}

struct DirectoryEntry {
    user: AuthUser,
    password_hash: String,
}

/// In-memory user directory seeded at startup
#[derive(Default)]
pub struct StaticUserDirectory {
    entries: Vec<DirectoryEntry>,
}

impl StaticUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a user with the given plaintext password; the password is stored
    /// only as a salted hash.
    pub fn with_user(mut self, email: &str, password: &str, name: &str, role: &str) -> Self {
        let salt: [u8; 32] = rand::thread_rng().gen();
        self.entries.push(DirectoryEntry {
            user: AuthUser {
                id: Uuid::new_v4(),
                email: email.to_string(),
                name: name.to_string(),
                role: role.to_string(),
            },
            password_hash: hash_secret(password, &salt),
        });
        self
    }
}

#[async_trait::async_trait]
impl UserDirectory for StaticUserDirectory {
    async fn authenticate(&self, email: &str, password: &str) -> Option<AuthUser> {
        let entry = self.entries.iter().find(|e| e.user.email == email)?;

        if verify_secret(password, &entry.password_hash) {
            Some(entry.user.clone())
        } else {
            None
        }
    }
}
