//! Refresh session registry
//!
//! Holds the single live refresh-token identifier of every user. A refresh
//! token is only honoured while its identifier matches the record here, which
//! makes the registry the sole revocation authority for refresh tokens.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::Result;

/// Storage for one refresh-token identifier per user
#[async_trait]
pub trait SessionRegistry: Send + Sync {
    /// Store `token_id` as the user's live identifier, replacing any previous one
    async fn insert(&self, user_id: Uuid, token_id: &str) -> Result<()>;

    /// True iff a record exists for the user and matches `token_id`
    async fn validate(&self, user_id: Uuid, token_id: &str) -> Result<bool>;

    /// Delete the user's record. Deleting a missing record is not an error.
    async fn invalidate(&self, user_id: Uuid) -> Result<()>;

    /// Atomically delete the user's record iff it matches `token_id`.
    ///
    /// Returns true when the record was removed. A mismatch leaves the
    /// current record untouched. Two concurrent calls with the same
    /// identifier never both return true.
    async fn consume(&self, user_id: Uuid, token_id: &str) -> Result<bool>;
}

/// Registry key for a user
pub fn session_key(user_id: Uuid) -> String {
    format!("user-{}", user_id)
}

/// Session record information
#[derive(Debug, Clone)]
pub struct SessionRecord {
    /// Live refresh-token identifier
    pub token_id: String,
    /// When the record was written
    pub created_at: chrono::DateTime<chrono::Utc>,
    /// When the record lapses on its own
    pub expires_at: chrono::DateTime<chrono::Utc>,
}

impl SessionRecord {
    fn new(token_id: &str, ttl: chrono::Duration) -> Self {
        let now = chrono::Utc::now();
        Self {
            token_id: token_id.to_string(),
            created_at: now,
            expires_at: now
                .checked_add_signed(ttl)
                .unwrap_or(chrono::DateTime::<chrono::Utc>::MAX_UTC),
        }
    }

    /// Check if the record has outlived the refresh TTL
    pub fn is_expired(&self) -> bool {
        chrono::Utc::now() > self.expires_at
    }

    fn matches(&self, token_id: &str) -> bool {
        !self.is_expired() && self.token_id == token_id
    }
}

/// In-process registry for single-node deployments and tests
pub struct InMemorySessionRegistry {
    sessions: Arc<RwLock<HashMap<Uuid, SessionRecord>>>,
    ttl: chrono::Duration,
}

impl InMemorySessionRegistry {
    /// Create a registry whose records lapse after `ttl_secs`
    pub fn new(ttl_secs: u64) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl: i64::try_from(ttl_secs)
                .ok()
                .and_then(chrono::Duration::try_seconds)
                .unwrap_or(chrono::Duration::MAX),
        }
    }

    /// Cleanup expired records
    pub async fn cleanup_expired(&self) {
        let mut sessions = self.sessions.write().await;
        sessions.retain(|_, record| !record.is_expired());
    }

    /// Get session count
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Get a copy of the user's current record
    pub async fn get(&self, user_id: Uuid) -> Option<SessionRecord> {
        self.sessions.read().await.get(&user_id).cloned()
    }
}

impl Clone for InMemorySessionRegistry {
    fn clone(&self) -> Self {
        Self {
            sessions: Arc::clone(&self.sessions),
            ttl: self.ttl,
        }
    }
}

#[async_trait]
impl SessionRegistry for InMemorySessionRegistry {
    async fn insert(&self, user_id: Uuid, token_id: &str) -> Result<()> {
        self.sessions
            .write()
            .await
            .insert(user_id, SessionRecord::new(token_id, self.ttl));
        Ok(())
    }

    async fn validate(&self, user_id: Uuid, token_id: &str) -> Result<bool> {
        Ok(self
            .sessions
            .read()
            .await
            .get(&user_id)
            .is_some_and(|record| record.matches(token_id)))
    }

    async fn invalidate(&self, user_id: Uuid) -> Result<()> {
        self.sessions.write().await.remove(&user_id);
        Ok(())
    }

    async fn consume(&self, user_id: Uuid, token_id: &str) -> Result<bool> {
        let mut sessions = self.sessions.write().await;
        match sessions.get(&user_id) {
            Some(record) if record.matches(token_id) => {
                sessions.remove(&user_id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
