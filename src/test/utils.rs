// Test utilities shared across unit tests
// Only compiled when running tests

use std::sync::Arc;

use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};

use crate::app_data::AppData;
use crate::config::{EnvironmentProvider, MapEnvironment, SecretManager};
use crate::stores::CredentialStore;
use crate::types::db::admin;

pub const TEST_JWT_SECRET: &str = "test-secret-key-minimum-32-characters-long";
pub const TEST_PASSWORD_PEPPER: &str = "test-pepper-for-unit-tests";

/// Fresh in-memory database with all migrations applied
pub async fn setup_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

/// Creates a test database and a credential store over it
///
/// Callers can discard what they don't need:
/// ```rust
/// let (_db, credential_store) = setup_test_store().await;
/// ```
pub async fn setup_test_store() -> (DatabaseConnection, Arc<CredentialStore>) {
    let db = setup_test_db().await;
    let credential_store = Arc::new(CredentialStore::new(db.clone()));
    (db, credential_store)
}

/// Environment carrying the test secrets
pub fn test_env() -> MapEnvironment {
    MapEnvironment::empty()
        .with_var("JWT_SECRET", TEST_JWT_SECRET)
        .with_var("PASSWORD_PEPPER", TEST_PASSWORD_PEPPER)
}

pub fn test_secret_manager() -> Arc<SecretManager> {
    Arc::new(SecretManager::init_with_provider(&test_env()).expect("Failed to init test secrets"))
}

/// Full application data over a fresh in-memory database
pub async fn setup_test_app_data() -> Arc<AppData> {
    let db = setup_test_db().await;
    let env: Arc<dyn EnvironmentProvider + Send + Sync> = Arc::new(test_env());

    Arc::new(AppData::init(db, env).await.expect("Failed to init AppData"))
}

/// Insert a live administrator with the given password
pub async fn create_test_admin(app_data: &AppData, name: &str, password: &str) -> admin::Model {
    let password_hash = app_data
        .crypto_provider
        .hash_password(password)
        .expect("Failed to hash password");

    app_data
        .credential_store
        .insert_admin(name, password_hash)
        .await
        .expect("Failed to insert admin")
}
