//! Identity store
//!
//! The authentication service only needs three operations from the user
//! store. Lookups report a missing user as `Ok(None)` so that "not found" is
//! never confused with a store fault.

mod memory;

pub use memory::InMemoryIdentityStore;

use async_trait::async_trait;
use uuid::Uuid;

use crate::auth::models::{User, UserRole};
use crate::error::Result;

#[async_trait]
pub trait IdentityStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>>;

    /// Create a user. Fails with `Error::DuplicateAccount` if the email is taken.
    async fn create(
        &self,
        email: &str,
        name: &str,
        password_hash: &str,
        role: UserRole,
    ) -> Result<User>;
}
