use std::sync::Arc;

use runtime::AppConfig;
use tracing::{debug, info};

use crate::config::UsersConfig;
use crate::contract::client::UsersApi;
use crate::contract::model::User;
use crate::domain::patch::{CompositePatchHandler, PatchHandler};
use crate::domain::permission_patch::UserPermissionPatchHandler;
use crate::domain::ports::Clock;
use crate::domain::service::Service;
use crate::gateways::local::UsersLocalClient;
use crate::infra::clock::SystemClock;
use crate::infra::ids::UuidGenerator;
use crate::infra::password::BcryptPasswordEncoder;
use crate::infra::storage::InMemoryUsersRepository;

/// Key of this module's entry under `modules` in the application config.
pub const MODULE_NAME: &str = "users";

/// Users module: wires the in-memory repository, the patch chain and the
/// password encoder into a [`Service`].
#[derive(Default)]
pub struct UsersModule {
    // Keep the domain service behind ArcSwap for cheap read-mostly access.
    service: arc_swap::ArcSwapOption<Service>,
}

impl Clone for UsersModule {
    fn clone(&self) -> Self {
        Self {
            service: arc_swap::ArcSwapOption::new(self.service.load_full()),
        }
    }
}

impl UsersModule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the service from the `users` module config. Calling it again
    /// replaces the service, and with it the stored users.
    pub fn init(&self, app: &AppConfig) -> anyhow::Result<()> {
        info!("Initializing users module");

        let cfg: UsersConfig = app.module_config(MODULE_NAME)?;
        debug!(
            "Loaded users config: max_name_length={}, max_permission_type_length={}, password_hash_cost={}",
            cfg.max_name_length, cfg.max_permission_type_length, cfg.password_hash_cost
        );

        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let repo = InMemoryUsersRepository::new(Arc::new(UuidGenerator));
        let permissions: Arc<dyn PatchHandler<User>> = Arc::new(UserPermissionPatchHandler::new(
            clock.clone(),
            cfg.max_permission_type_length,
        ));
        let patch_handler: Arc<dyn PatchHandler<User>> =
            Arc::new(CompositePatchHandler::new(vec![permissions]));
        let service = Service::new(
            Arc::new(repo),
            patch_handler,
            Arc::new(BcryptPasswordEncoder::new(cfg.password_hash_cost)),
            clock,
            cfg.service_config(),
        );

        self.service.store(Some(Arc::new(service)));
        info!("Users module initialized");
        Ok(())
    }

    pub fn service(&self) -> anyhow::Result<Arc<Service>> {
        self.service
            .load_full()
            .ok_or_else(|| anyhow::anyhow!("Service not initialized"))
    }

    /// In-process client over the initialized service.
    pub fn client(&self) -> anyhow::Result<Arc<dyn UsersApi>> {
        let api: Arc<dyn UsersApi> = Arc::new(UsersLocalClient::new(self.service()?));
        Ok(api)
    }
}
