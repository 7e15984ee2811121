// Common test utilities for integration tests
#![allow(dead_code)]

use std::sync::Arc;

use gatehouse_backend::api::build_app;
use gatehouse_backend::app_data::AppData;
use gatehouse_backend::config::{EnvironmentProvider, MapEnvironment};
use gatehouse_backend::types::db::admin;
use migration::{Migrator, MigratorTrait};
use poem::Endpoint;
use poem::test::TestClient;
use sea_orm::{Database, DatabaseConnection};

/// Creates an in-memory database with migrations applied
pub async fn setup_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

/// Environment with valid secrets
pub fn test_env() -> MapEnvironment {
    MapEnvironment::empty()
        .with_var("JWT_SECRET", "integration-secret-key-minimum-32-characters")
        .with_var("PASSWORD_PEPPER", "integration-test-pepper")
}

pub async fn setup_app_data() -> Arc<AppData> {
    let env: Arc<dyn EnvironmentProvider + Send + Sync> = Arc::new(test_env());
    Arc::new(
        AppData::init(setup_test_db().await, env)
            .await
            .expect("Failed to init AppData"),
    )
}

/// Test client over the full HTTP application
pub fn test_client(app_data: Arc<AppData>) -> TestClient<impl Endpoint> {
    TestClient::new(build_app(app_data, "http://localhost:3000/api"))
}

/// Insert a live administrator with the given password
pub async fn create_admin(app_data: &AppData, name: &str, password: &str) -> admin::Model {
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
