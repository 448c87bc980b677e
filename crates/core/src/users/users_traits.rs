//! User repository and service traits.

use async_trait::async_trait;

use super::users_model::{NewUser, User};
use crate::errors::Result;

/// Persistence contract for user profiles.
#[async_trait]
pub trait UserRepositoryTrait: Send + Sync {
    /// Inserts a validated profile and returns it with its generated id.
    async fn create(&self, new_user: NewUser) -> Result<User>;

    fn get_by_id(&self, user_id: &str) -> Result<Option<User>>;
}

#[async_trait]
pub trait UserServiceTrait: Send + Sync {
    async fn register_user(&self, new_user: NewUser) -> Result<User>;

    /// Fails with `Error::NotFound` when no profile exists.
    fn get_user(&self, user_id: &str) -> Result<User>;
}
