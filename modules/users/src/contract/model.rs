use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A permission granted to a user. `kind` is unique within one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Permission {
    pub kind: String,
    pub granted_date: DateTime<Utc>,
}

impl Permission {
    pub fn new(kind: impl Into<String>, granted_date: DateTime<Utc>) -> Self {
        Self {
            kind: kind.into(),
            granted_date,
        }
    }
}

/// User aggregate as stored by the repository.
///
/// `id` and `version` are `None` until the first insert. `password` always
/// holds the encoded form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Option<String>,
    pub version: Option<String>,
    pub family_name: String,
    pub given_name: String,
    pub birthdate: NaiveDate,
    pub email: String,
    pub password: String,
    pub permissions: Vec<Permission>,
}

impl User {
    pub fn has_permission(&self, kind: &str) -> bool {
        self.permissions.iter().any(|p| p.kind == kind)
    }
}

/// Read model handed to other modules. Never carries the password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserView {
    pub id: String,
    pub version: String,
    pub family_name: String,
    pub given_name: String,
    pub birthdate: NaiveDate,
    pub email: String,
    pub permissions: Vec<Permission>,
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        Self {
            id: user.id.unwrap_or_default(),
            version: user.version.unwrap_or_default(),
            family_name: user.family_name,
            given_name: user.given_name,
            birthdate: user.birthdate,
            email: user.email,
            permissions: user.permissions,
        }
    }
}

impl UserView {
    pub fn has_permission(&self, kind: &str) -> bool {
        self.permissions.iter().any(|p| p.kind == kind)
    }
}

/// Data for creating a new user. `password` is the plaintext form and
/// `permissions` lists the permission types to grant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub family_name: String,
    pub given_name: String,
    pub birthdate: NaiveDate,
    pub email: String,
    pub password: String,
    pub permissions: Vec<String>,
}

/// Closed set of JSON-Patch operation kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatchOperation {
    Add,
    Remove,
    Replace,
    Move,
    Copy,
    Test,
}

impl PatchOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Remove => "remove",
            Self::Replace => "replace",
            Self::Move => "move",
            Self::Copy => "copy",
            Self::Test => "test",
        }
    }
}

impl std::fmt::Display for PatchOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One requested mutation: `{"op": "add", "path": "permissions", "value": {...}}`.
///
/// `path` is a plain field name, not a JSON Pointer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patch {
    #[serde(rename = "op")]
    pub operation: PatchOperation,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
}

impl Patch {
    pub fn new(
        operation: PatchOperation,
        path: impl Into<String>,
        value: Option<serde_json::Value>,
    ) -> Self {
        Self {
            operation,
            path: path.into(),
            value,
        }
    }
}
