//! Module wiring from application config.

use chrono::NaiveDate;
use runtime::AppConfig;
use users::contract::error::UsersError;
use users::contract::model::{NewUser, Patch, PatchOperation, UserView};
use users::UsersModule;

fn app_config(yaml: &str) -> AppConfig {
    serde_yaml::from_str(yaml).unwrap()
}

fn new_user(given_name: &str) -> NewUser {
    NewUser {
        family_name: "Roe".to_string(),
        given_name: given_name.to_string(),
        birthdate: NaiveDate::from_ymd_opt(2000, 2, 29).unwrap(),
        email: "roe@example.com".to_string(),
        password: "hunter2".to_string(),
        permissions: vec!["read".to_string()],
    }
}

const LOW_COST: &str = r#"
modules:
  users:
    max_name_length: 8
    password_hash_cost: 4
"#;

#[test]
fn service_requires_init() {
    let module = UsersModule::new();
    assert!(module.service().is_err());
    assert!(module.client().is_err());
}

#[test]
fn init_rejects_bad_module_config() {
    let module = UsersModule::new();
    let cfg = app_config(
        r#"
modules:
  users:
    max_name_length: "long"
"#,
    );
    assert!(module.init(&cfg).is_err());
    assert!(module.service().is_err());
}

#[tokio::test]
async fn client_round_trip() {
    let module = UsersModule::new();
    module.init(&app_config(LOW_COST)).unwrap();
    let client = module.client().unwrap();

    let created = client.create_user(new_user("Ann")).await.unwrap();
    let id = created.id.clone();
    assert!(!id.is_empty());
    assert!(!created.version.is_empty());

    let patched = client
        .patch_user(
            &id,
            vec![Patch::new(
                PatchOperation::Add,
                "permissions",
                Some(serde_json::json!({ "type": "write" })),
            )],
        )
        .await
        .unwrap();
    assert!(patched.has_permission("read"));
    assert!(patched.has_permission("write"));

    assert_eq!(client.list_users().await.unwrap().len(), 1);

    client.delete_user(&id).await.unwrap();
    assert_eq!(
        client.get_user(&id).await.unwrap_err(),
        UsersError::not_found(id)
    );
}

#[tokio::test]
async fn client_results_never_carry_the_password() {
    let module = UsersModule::new();
    module.init(&app_config(LOW_COST)).unwrap();
    let client = module.client().unwrap();

    let created = client.create_user(new_user("Ann")).await.unwrap();
    let fetched = client.get_user(&created.id).await.unwrap();
    let listed = client.list_users().await.unwrap();

    for shown in [
        format!("{created:?}"),
        format!("{fetched:?}"),
        format!("{listed:?}"),
    ] {
        assert!(!shown.contains("hunter2"), "{shown}");
        assert!(!shown.contains("{bcrypt}"), "{shown}");
    }

    // The stored user still holds the encoded form.
    let stored = module.service().unwrap().get_user(&created.id).await.unwrap();
    assert!(stored.password.starts_with("{bcrypt}"));
    assert_eq!(UserView::from(stored), fetched);
}

#[tokio::test]
async fn configured_limits_apply() {
    let module = UsersModule::new();
    module.init(&app_config(LOW_COST)).unwrap();
    let client = module.client().unwrap();

    let err = client
        .create_user(new_user("Maximilian"))
        .await
        .unwrap_err();
    assert!(matches!(err, UsersError::Validation { .. }));
    assert_eq!(err.status(), http::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn clones_share_the_service() {
    let module = UsersModule::new();
    module.init(&app_config(LOW_COST)).unwrap();
    let copy = module.clone();

    module
        .client()
        .unwrap()
        .create_user(new_user("Ann"))
        .await
        .unwrap();
    assert_eq!(copy.client().unwrap().list_users().await.unwrap().len(), 1);
}

#[tokio::test]
async fn missing_module_entry_uses_defaults() {
    let module = UsersModule::new();
    module.init(&AppConfig::default()).unwrap();
    let users = module.client().unwrap().list_users().await.unwrap();
    assert!(users.is_empty());
}
