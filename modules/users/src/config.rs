use serde::{Deserialize, Serialize};

use crate::domain::service::ServiceConfig;

/// Configuration for the users module
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UsersConfig {
    #[serde(default = "default_max_length")]
    pub max_name_length: usize,
    #[serde(default = "default_max_length")]
    pub max_permission_type_length: usize,
    #[serde(default = "default_password_hash_cost")]
    pub password_hash_cost: u32,
}

impl Default for UsersConfig {
    fn default() -> Self {
        Self {
            max_name_length: default_max_length(),
            max_permission_type_length: default_max_length(),
            password_hash_cost: default_password_hash_cost(),
        }
    }
}

impl UsersConfig {
    pub fn service_config(&self) -> ServiceConfig {
        ServiceConfig {
            max_name_length: self.max_name_length,
            max_permission_type_length: self.max_permission_type_length,
        }
    }
}

fn default_max_length() -> usize {
    100
}

fn default_password_hash_cost() -> u32 {
    bcrypt::DEFAULT_COST
}
