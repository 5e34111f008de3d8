//! In-memory repository backed by sharded concurrent maps.
//!
//! Every mutation of one id happens under that id's shard lock, so the
//! version check and the replace in `update` form a single atomic step and
//! no `.await` ever runs while a lock is held. Email uniqueness is kept in a
//! second map (`email → id`); when both maps are locked together the users
//! map is always locked first.

use std::sync::Arc;

use anyhow::anyhow;
use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use futures::stream::{self, BoxStream, StreamExt};
use tracing::debug;

use crate::contract::model::User;
use crate::domain::ports::IdGenerator;
use crate::domain::repo::{LockConflict, RepoError, UsersRepository};

const EMAIL_FIELD: &str = "email";

/// Clones share the same store.
#[derive(Clone)]
pub struct InMemoryUsersRepository {
    users: Arc<DashMap<String, User>>,
    emails: Arc<DashMap<String, String>>,
    ids: Arc<dyn IdGenerator>,
}

impl InMemoryUsersRepository {
    pub fn new(ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            users: Arc::new(DashMap::new()),
            emails: Arc::new(DashMap::new()),
            ids,
        }
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Reserve `email` for `owner`. Re-claiming an address the owner already
    /// holds succeeds.
    fn claim_email(&self, email: &str, owner: &str) -> Result<(), RepoError> {
        match self.emails.entry(email.to_string()) {
            Entry::Occupied(slot) if slot.get() != owner => Err(RepoError::DuplicateKey {
                field: EMAIL_FIELD.to_string(),
                value: email.to_string(),
            }),
            Entry::Occupied(_) => Ok(()),
            Entry::Vacant(slot) => {
                slot.insert(owner.to_string());
                Ok(())
            }
        }
    }

    fn release_email(&self, email: &str, owner: &str) {
        self.emails.remove_if(email, |_, holder| holder == owner);
    }
}

#[async_trait]
impl UsersRepository for InMemoryUsersRepository {
    fn find_all(&self) -> BoxStream<'static, Result<User, RepoError>> {
        let users = Arc::clone(&self.users);
        // The snapshot is taken on first poll, not when the stream is built.
        stream::once(async move {
            users
                .iter()
                .map(|entry| entry.value().clone())
                .collect::<Vec<_>>()
        })
        .flat_map(|snapshot| stream::iter(snapshot.into_iter().map(Ok)))
        .boxed()
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>, RepoError> {
        Ok(self.users.get(id).map(|entry| entry.value().clone()))
    }

    async fn insert(&self, user: User) -> Result<User, RepoError> {
        if user.id.is_some() || user.version.is_some() {
            return Err(RepoError::InvalidArgument(
                "id and version must be unset on insert".to_string(),
            ));
        }

        let id = self.ids.generate();
        self.claim_email(&user.email, &id)?;

        let stored = User {
            id: Some(id.clone()),
            version: Some(self.ids.generate()),
            ..user
        };

        match self.users.entry(id.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(stored.clone());
            }
            Entry::Occupied(_) => {
                self.release_email(&stored.email, &id);
                return Err(RepoError::Backend(anyhow!("generated id {id} already in use")));
            }
        }

        debug!(user_id = %id, "Inserted user");
        Ok(stored)
    }

    async fn update(&self, user: User) -> Result<User, RepoError> {
        let (Some(id), Some(version)) = (user.id.clone(), user.version.clone()) else {
            return Err(RepoError::InvalidArgument(
                "id and version must be set on update".to_string(),
            ));
        };

        let mut slot = match self.users.entry(id.clone()) {
            Entry::Occupied(slot) => slot,
            Entry::Vacant(_) => {
                return Err(RepoError::OptimisticLock {
                    id,
                    reason: LockConflict::NoSuchId,
                })
            }
        };

        let current = slot.get();
        if current.version.as_deref() != Some(version.as_str()) {
            return Err(RepoError::OptimisticLock {
                reason: LockConflict::VersionMismatch {
                    expected: current.version.clone().unwrap_or_default(),
                    actual: version,
                },
                id,
            });
        }

        let previous_email = current.email.clone();
        if previous_email != user.email {
            self.claim_email(&user.email, &id)?;
            self.release_email(&previous_email, &id);
        }

        let stored = User {
            version: Some(self.ids.generate()),
            ..user
        };
        slot.insert(stored.clone());

        debug!(user_id = %id, "Updated user");
        Ok(stored)
    }

    async fn delete_by_id(&self, id: &str) -> Result<(), RepoError> {
        if let Some((_, removed)) = self.users.remove(id) {
            self.release_email(&removed.email, id);
            debug!(user_id = %id, "Deleted user");
        }
        Ok(())
    }
}
