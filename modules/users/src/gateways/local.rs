use async_trait::async_trait;
use std::sync::Arc;

use crate::contract::{
    client::UsersApi,
    error::UsersError,
    model::{NewUser, Patch, UserView},
};
use crate::domain::service::Service;

/// Local implementation of the UsersApi trait that delegates to the domain service
pub struct UsersLocalClient {
    service: Arc<Service>,
}

impl UsersLocalClient {
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl UsersApi for UsersLocalClient {
    async fn list_users(&self) -> Result<Vec<UserView>, UsersError> {
        let users = self.service.list_users().await?;
        Ok(users.into_iter().map(UserView::from).collect())
    }

    async fn get_user(&self, id: &str) -> Result<UserView, UsersError> {
        Ok(self.service.get_user(id).await?.into())
    }

    async fn create_user(&self, new_user: NewUser) -> Result<UserView, UsersError> {
        Ok(self.service.create_user(new_user).await?.into())
    }

    async fn patch_user(&self, id: &str, patches: Vec<Patch>) -> Result<UserView, UsersError> {
        Ok(self.service.patch_user(id, patches).await?.into())
    }

    async fn delete_user(&self, id: &str) -> Result<(), UsersError> {
        self.service.delete_user(id).await.map_err(Into::into)
    }
}
