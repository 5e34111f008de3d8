use async_trait::async_trait;

use crate::contract::{
    error::UsersError,
    model::{NewUser, Patch, UserView},
};

/// Public API trait for the users module that other modules can use
#[async_trait]
pub trait UsersApi: Send + Sync {
    /// List every stored user (order unspecified)
    async fn list_users(&self) -> Result<Vec<UserView>, UsersError>;

    /// Get a user by ID
    async fn get_user(&self, id: &str) -> Result<UserView, UsersError>;

    /// Create a new user
    async fn create_user(&self, new_user: NewUser) -> Result<UserView, UsersError>;

    /// Apply patch operations in order and persist the result
    async fn patch_user(&self, id: &str, patches: Vec<Patch>) -> Result<UserView, UsersError>;

    /// Delete a user by ID; deleting a missing user succeeds
    async fn delete_user(&self, id: &str) -> Result<(), UsersError>;
}
