use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::{EnvironmentProvider, SecretManager};
use crate::errors::InternalError;
use crate::providers::{
    AdminProvider, AuthenticationProvider, CryptoProvider, IdentityProvider, InputValidator, SessionProvider,
    TokenProvider,
};
use crate::stores::CredentialStore;

/// Centralized application data following the main-owned stores pattern
///
/// All dependencies are created once in main.rs and shared across coordinators,
/// the HTTP layer and CLI commands.
///
/// # Architecture
///
/// ```text
/// main.rs
///   ↓
/// AppData::init(db, env_provider)
///   ↓ creates once
///   ├─ secret_manager (Arc<SecretManager>)
///   ├─ credential_store (Arc<CredentialStore>)
///   ├─ crypto_provider, token_provider
///   ├─ session_provider ← store, crypto, token
///   ├─ authentication_provider ← store, crypto, session, validator
///   ├─ identity_provider ← store, session
///   └─ admin_provider ← store, crypto, validator
///   ↓ wrapped in Arc<AppData>
///   ├─ SessionCoordinator::new(app_data)
///   └─ cli::execute_command(cli, &app_data)
/// ```
pub struct AppData {
    pub db: DatabaseConnection,
    pub env_provider: Arc<dyn EnvironmentProvider + Send + Sync>,
    pub secret_manager: Arc<SecretManager>,
    pub credential_store: Arc<CredentialStore>,
    pub crypto_provider: Arc<CryptoProvider>,
    pub token_provider: Arc<TokenProvider>,
    pub session_provider: Arc<SessionProvider>,
    pub authentication_provider: Arc<AuthenticationProvider>,
    pub identity_provider: Arc<IdentityProvider>,
    pub admin_provider: Arc<AdminProvider>,
}

impl AppData {
    /// Initialize all application data
    ///
    /// The database should be connected and migrated before calling this.
    ///
    /// # Errors
    ///
    /// Returns `InternalError` when secret manager initialization fails
    pub async fn init(
        db: DatabaseConnection,
        env_provider: Arc<dyn EnvironmentProvider + Send + Sync>,
    ) -> Result<Self, InternalError> {
        tracing::info!("Initializing AppData...");

        tracing::debug!("Initializing secret manager...");
        let secret_manager = Arc::new(
            SecretManager::init_with_provider(env_provider.as_ref())
                .map_err(|e| InternalError::parse("secret_manager", format!("Secret manager init failed: {}", e)))?,
        );
        tracing::debug!("Secret manager initialized");

        let credential_store = Arc::new(CredentialStore::new(db.clone()));

        tracing::debug!("Creating providers...");
        let crypto_provider = Arc::new(CryptoProvider::new(secret_manager.clone()));
        let token_provider = Arc::new(TokenProvider::new(secret_manager.clone()));
        let session_provider = Arc::new(SessionProvider::new(
            credential_store.clone(),
            crypto_provider.clone(),
            token_provider.clone(),
        ));
        let authentication_provider = Arc::new(AuthenticationProvider::new(
            credential_store.clone(),
            crypto_provider.clone(),
            session_provider.clone(),
            InputValidator::standard(),
        ));
        let identity_provider = Arc::new(IdentityProvider::new(
            credential_store.clone(),
            session_provider.clone(),
        ));
        let admin_provider = Arc::new(AdminProvider::new(
            credential_store.clone(),
            crypto_provider.clone(),
            InputValidator::standard(),
        ));
        tracing::debug!("Providers created");

        tracing::info!("AppData initialization complete");

        Ok(Self {
            db,
            env_provider,
            secret_manager,
            credential_store,
            crypto_provider,
            token_provider,
            session_provider,
            authentication_provider,
            identity_provider,
            admin_provider,
        })
    }
}
