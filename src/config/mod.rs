mod bootstrap_settings;
mod config_spec;
mod env_provider;
mod errors;
mod logging;
mod secret_config;
mod secret_manager;
pub mod database;

pub use bootstrap_settings::{BootstrapSettings, DEFAULT_DATABASE_URL};
pub use config_spec::{ConfigSpec, ConfigValue, ConfigValueSource};
pub use env_provider::{EnvironmentProvider, MapEnvironment, SystemEnvironment};
pub use errors::ApplicationError;
pub use logging::{init_logging, LoggingConfig, LoggingError};
pub use secret_config::{SecretConfig, SecretType};
pub use secret_manager::{SecretError, SecretManager};
