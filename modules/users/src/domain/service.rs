use std::sync::Arc;

use futures::stream::{BoxStream, StreamExt, TryStreamExt};
use tracing::{debug, info, instrument, warn};

use crate::contract::model::{NewUser, Patch, Permission, User};
use crate::domain::error::DomainError;
use crate::domain::patch::{apply_all, PatchHandler};
use crate::domain::ports::{Clock, PasswordEncoder};
use crate::domain::repo::UsersRepository;
use crate::domain::validation::{
    validate_birthdate, validate_email, validate_patch, validate_strict_string,
};

/// Domain service with business rules for user management.
/// Depends only on ports, not on infra types.
#[derive(Clone)]
pub struct Service {
    repo: Arc<dyn UsersRepository>,
    patch_handler: Arc<dyn PatchHandler<User>>,
    passwords: Arc<dyn PasswordEncoder>,
    clock: Arc<dyn Clock>,
    config: ServiceConfig,
}

/// Configuration for the domain service
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub max_name_length: usize,
    pub max_permission_type_length: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            max_name_length: 100,
            max_permission_type_length: 100,
        }
    }
}

impl Service {
    /// Create a service with dependencies.
    pub fn new(
        repo: Arc<dyn UsersRepository>,
        patch_handler: Arc<dyn PatchHandler<User>>,
        passwords: Arc<dyn PasswordEncoder>,
        clock: Arc<dyn Clock>,
        config: ServiceConfig,
    ) -> Self {
        Self {
            repo,
            patch_handler,
            passwords,
            clock,
            config,
        }
    }

    /// Lazily stream every stored user.
    pub fn stream_users(&self) -> BoxStream<'static, Result<User, DomainError>> {
        self.repo.find_all().map_err(DomainError::from).boxed()
    }

    #[instrument(name = "users.service.list_users", skip(self))]
    pub async fn list_users(&self) -> Result<Vec<User>, DomainError> {
        debug!("Listing users");
        let users: Vec<User> = self.stream_users().try_collect().await?;
        debug!("Successfully listed {} users", users.len());
        Ok(users)
    }

    #[instrument(name = "users.service.get_user", skip(self), fields(user_id = %id))]
    pub async fn get_user(&self, id: &str) -> Result<User, DomainError> {
        debug!("Getting user by id");
        let user = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::user_not_found(id))?;
        debug!("Successfully retrieved user");
        Ok(user)
    }

    #[instrument(
        name = "users.service.create_user",
        skip(self, new_user),
        fields(email = %new_user.email)
    )]
    pub async fn create_user(&self, new_user: NewUser) -> Result<User, DomainError> {
        info!("Creating new user");

        self.validate_new_user(&new_user)?;

        let passwords = Arc::clone(&self.passwords);
        let raw_password = new_user.password;
        // bcrypt hashing blocks; run it on the blocking pool.
        let password = tokio::task::spawn_blocking(move || passwords.encode(&raw_password))
            .await
            .map_err(|e| DomainError::internal(format!("password encoding task failed: {e}")))??;

        let granted_date = self.clock.now();
        let mut permissions: Vec<Permission> = Vec::with_capacity(new_user.permissions.len());
        for kind in new_user.permissions {
            if !permissions.iter().any(|p| p.kind == kind) {
                permissions.push(Permission::new(kind, granted_date));
            }
        }

        let user = User {
            id: None,
            version: None,
            family_name: new_user.family_name,
            given_name: new_user.given_name,
            birthdate: new_user.birthdate,
            email: new_user.email,
            password,
            permissions,
        };

        let created = self.repo.insert(user).await.map_err(|e| {
            let e = DomainError::from(e);
            warn!(error = %e, "User insert rejected");
            e
        })?;

        info!(
            "Successfully created user with id={}",
            created.id.as_deref().unwrap_or_default()
        );
        Ok(created)
    }

    /// Apply `patches` in order to the stored user and persist the result
    /// with one version-checked update. Nothing is written if any patch is
    /// malformed, declined, or rejected.
    #[instrument(
        name = "users.service.patch_user",
        skip(self, patches),
        fields(user_id = %id, patches = patches.len())
    )]
    pub async fn patch_user(&self, id: &str, patches: Vec<Patch>) -> Result<User, DomainError> {
        info!("Patching user");

        for patch in &patches {
            validate_patch(patch)?;
        }

        let current = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::user_not_found(id))?;

        let patched = apply_all(self.patch_handler.as_ref(), current, &patches).map_err(|e| {
            warn!(error = %e, "Patch rejected");
            e
        })?;

        let updated = self.repo.update(patched).await.map_err(|e| {
            let e = DomainError::from(e);
            warn!(error = %e, "Patched user was not persisted");
            e
        })?;

        info!("Successfully patched user");
        Ok(updated)
    }

    /// Deleting a user that does not exist succeeds.
    #[instrument(name = "users.service.delete_user", skip(self), fields(user_id = %id))]
    pub async fn delete_user(&self, id: &str) -> Result<(), DomainError> {
        info!("Deleting user");
        self.repo.delete_by_id(id).await?;
        info!("Successfully deleted user");
        Ok(())
    }

    // --- validation helpers ---

    fn validate_new_user(&self, new_user: &NewUser) -> Result<(), DomainError> {
        validate_strict_string(
            "family_name",
            &new_user.family_name,
            self.config.max_name_length,
        )?;
        validate_strict_string(
            "given_name",
            &new_user.given_name,
            self.config.max_name_length,
        )?;
        validate_email(&new_user.email)?;
        validate_birthdate(new_user.birthdate, self.clock.now().date_naive())?;
        if new_user.password.is_empty() {
            return Err(DomainError::validation("password", "must not be empty"));
        }
        for kind in &new_user.permissions {
            validate_strict_string("type", kind, self.config.max_permission_type_length)?;
        }
        Ok(())
    }
}
