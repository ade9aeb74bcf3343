//! In-memory identity store

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::IdentityStore;
use crate::auth::models::{User, UserRole};
use crate::error::{Error, Result};

#[derive(Default)]
struct Users {
    by_id: HashMap<Uuid, User>,
    /// Lower-cased email -> user ID
    by_email: HashMap<String, Uuid>,
}

/// Identity store kept in process memory
#[derive(Clone, Default)]
pub struct InMemoryIdentityStore {
    users: Arc<RwLock<Users>>,
}

impl InMemoryIdentityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get user count
    pub async fn user_count(&self) -> usize {
        self.users.read().await.by_id.len()
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[async_trait]
impl IdentityStore for InMemoryIdentityStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users
            .by_email
            .get(&normalize_email(email))
            .and_then(|id| users.by_id.get(id))
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self.users.read().await.by_id.get(&id).cloned())
    }

    async fn create(
        &self,
        email: &str,
        name: &str,
        password_hash: &str,
        role: UserRole,
    ) -> Result<User> {
        let key = normalize_email(email);
        let mut users = self.users.write().await;
        if users.by_email.contains_key(&key) {
            return Err(Error::DuplicateAccount);
        }

        let user = User::new(
            email.trim().to_string(),
            name.to_string(),
            password_hash.to_string(),
            role,
        );
        users.by_email.insert(key, user.id);
        users.by_id.insert(user.id, user.clone());
        Ok(user)
    }
}
