use std::sync::Arc;

use serde::Deserialize;
use tracing::debug;

use crate::contract::model::{Patch, PatchOperation, Permission, User};
use crate::domain::error::DomainError;
use crate::domain::patch::{PatchHandler, PatchOutcome};
use crate::domain::ports::Clock;
use crate::domain::validation::validate_strict_string;

/// Field name of the user's permission collection in patch paths.
pub const PERMISSIONS_PATH: &str = "permissions";

/// Payload of a permission patch: `{"type": "..."}`.
#[derive(Debug, Clone, Deserialize)]
struct PermissionValue {
    #[serde(rename = "type")]
    kind: String,
}

/// Adds and removes permissions on a user.
///
/// Adding a permission the user already has, or removing one they don't
/// have, returns the user unchanged rather than failing. Grant dates come
/// from the injected clock.
pub struct UserPermissionPatchHandler {
    clock: Arc<dyn Clock>,
    max_type_length: usize,
}

impl UserPermissionPatchHandler {
    pub fn new(clock: Arc<dyn Clock>, max_type_length: usize) -> Self {
        Self {
            clock,
            max_type_length,
        }
    }

    fn decode(&self, patch: &Patch) -> Result<PermissionValue, DomainError> {
        let raw = patch
            .value
            .clone()
            .ok_or_else(|| DomainError::validation(PERMISSIONS_PATH, "value is required"))?;
        let value: PermissionValue = serde_json::from_value(raw).map_err(|e| {
            DomainError::validation(PERMISSIONS_PATH, format!("malformed permission: {e}"))
        })?;
        validate_strict_string("type", &value.kind, self.max_type_length)?;
        Ok(value)
    }

    fn add(&self, user: &User, kind: String) -> User {
        if user.has_permission(&kind) {
            debug!(permission = %kind, "Permission already granted");
            return user.clone();
        }
        let mut updated = user.clone();
        updated
            .permissions
            .push(Permission::new(kind, self.clock.now()));
        updated
    }

    fn remove(&self, user: &User, kind: &str) -> User {
        let permissions: Vec<Permission> = user
            .permissions
            .iter()
            .filter(|p| p.kind != kind)
            .cloned()
            .collect();
        if permissions.len() == user.permissions.len() {
            debug!(permission = %kind, "Permission not present");
            return user.clone();
        }
        User {
            permissions,
            ..user.clone()
        }
    }
}

impl PatchHandler<User> for UserPermissionPatchHandler {
    fn try_apply(&self, patch: &Patch, target: &User) -> Result<PatchOutcome<User>, DomainError> {
        if patch.path != PERMISSIONS_PATH {
            return Ok(PatchOutcome::Declined);
        }
        let updated = match patch.operation {
            PatchOperation::Add => {
                let value = self.decode(patch)?;
                self.add(target, value.kind)
            }
            PatchOperation::Remove => {
                let value = self.decode(patch)?;
                self.remove(target, &value.kind)
            }
            _ => return Ok(PatchOutcome::Declined),
        };
        Ok(PatchOutcome::Applied(updated))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::clock::FixedClock;
    use chrono::{DateTime, NaiveDate, TimeZone, Utc};
    use serde_json::json;

    fn epoch() -> DateTime<Utc> {
        Utc.timestamp_opt(0, 0).unwrap()
    }

    fn handler() -> UserPermissionPatchHandler {
        UserPermissionPatchHandler::new(Arc::new(FixedClock::new(epoch())), 100)
    }

    fn patch(operation: PatchOperation, kind: &str) -> Patch {
        Patch::new(operation, PERMISSIONS_PATH, Some(json!({ "type": kind })))
    }

    fn user(kinds: &[&str]) -> User {
        User {
            id: Some("user_id".to_string()),
            version: Some("1234".to_string()),
            family_name: "family".to_string(),
            given_name: "given".to_string(),
            birthdate: NaiveDate::from_ymd_opt(1970, 1, 1).unwrap(),
            email: "123@ab.cd".to_string(),
            password: "shhh...".to_string(),
            permissions: kinds.iter().map(|k| Permission::new(*k, epoch())).collect(),
        }
    }

    fn kinds(user: &User) -> Vec<&str> {
        user.permissions.iter().map(|p| p.kind.as_str()).collect()
    }

    #[test]
    fn unsupported_combinations_decline() {
        let h = handler();
        let target = user(&["role_name_1"]);

        for op in [
            PatchOperation::Copy,
            PatchOperation::Replace,
            PatchOperation::Move,
            PatchOperation::Test,
        ] {
            let outcome = h.try_apply(&patch(op, "role_name_2"), &target).unwrap();
            assert!(outcome.is_declined(), "{op} should decline");
        }

        let mut other_path = patch(PatchOperation::Add, "role_name_2");
        other_path.path = "different_path".to_string();
        assert!(h.try_apply(&other_path, &target).unwrap().is_declined());

        other_path.operation = PatchOperation::Remove;
        assert!(h.try_apply(&other_path, &target).unwrap().is_declined());
    }

    #[test]
    fn declined_patch_ignores_missing_value() {
        let h = handler();
        let p = Patch::new(PatchOperation::Replace, PERMISSIONS_PATH, None);
        assert!(h.try_apply(&p, &user(&[])).unwrap().is_declined());
    }

    #[test]
    fn missing_or_invalid_value_fails() {
        let h = handler();
        let target = user(&["role_name_1"]);

        let mut p = patch(PatchOperation::Add, "x");
        p.value = None;
        assert!(matches!(
            h.try_apply(&p, &target),
            Err(DomainError::Validation { .. })
        ));

        for bad in [
            json!("role_name_2"),
            json!({ "kind": "role_name_2" }),
            json!({ "type": 7 }),
            json!({ "type": "" }),
            json!({ "type": " padded" }),
            json!({ "type": "a\tb" }),
            json!({ "type": "r".repeat(101) }),
        ] {
            let p = Patch::new(PatchOperation::Remove, PERMISSIONS_PATH, Some(bad.clone()));
            let err = h.try_apply(&p, &target).unwrap_err();
            assert!(err.is_bad_request(), "{bad} should fail validation");
        }
    }

    #[test]
    fn add_appends_with_clock_date() {
        let granted = Utc.with_ymd_and_hms(2024, 2, 3, 4, 5, 6).unwrap();
        let h = UserPermissionPatchHandler::new(Arc::new(FixedClock::new(granted)), 100);
        let target = user(&["role_name_1"]);

        let actual = h
            .try_apply(&patch(PatchOperation::Add, "role_name_2"), &target)
            .unwrap()
            .applied()
            .unwrap();

        assert_eq!(kinds(&actual), vec!["role_name_1", "role_name_2"]);
        assert_eq!(actual.permissions[1].granted_date, granted);
        assert_eq!(actual.permissions[0], target.permissions[0]);
        // The input is untouched.
        assert_eq!(kinds(&target), vec!["role_name_1"]);
    }

    #[test]
    fn add_is_idempotent() {
        let h = handler();
        let add = patch(PatchOperation::Add, "role_name_2");

        let once = h.try_apply(&add, &user(&["role_name_1"])).unwrap().applied().unwrap();
        let twice = h.try_apply(&add, &once).unwrap().applied().unwrap();
        assert_eq!(once, twice);

        let existing = user(&["role_name_2"]);
        let again = h.try_apply(&add, &existing).unwrap().applied().unwrap();
        assert_eq!(again, existing);
    }

    #[test]
    fn remove_missing_is_noop() {
        let h = handler();
        let target = user(&["role_name_1"]);
        let actual = h
            .try_apply(&patch(PatchOperation::Remove, "role_name_2"), &target)
            .unwrap()
            .applied()
            .unwrap();
        assert_eq!(actual, target);
    }

    #[test]
    fn remove_preserves_order() {
        let h = handler();
        let actual = h
            .try_apply(&patch(PatchOperation::Remove, "t1"), &user(&["t1", "t2", "t3"]))
            .unwrap()
            .applied()
            .unwrap();
        assert_eq!(kinds(&actual), vec!["t2", "t3"]);

        let actual = h
            .try_apply(&patch(PatchOperation::Remove, "t2"), &user(&["t1", "t2", "t3"]))
            .unwrap()
            .applied()
            .unwrap();
        assert_eq!(kinds(&actual), vec!["t1", "t3"]);
    }

    #[test]
    fn remove_after_add_restores_permissions() {
        let h = handler();
        let original = user(&["a", "b"]);

        let added = h
            .try_apply(&patch(PatchOperation::Add, "c"), &original)
            .unwrap()
            .applied()
            .unwrap();
        let removed = h
            .try_apply(&patch(PatchOperation::Remove, "c"), &added)
            .unwrap()
            .applied()
            .unwrap();
        assert_eq!(removed.permissions, original.permissions);
    }
}
