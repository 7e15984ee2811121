// Providers layer - Work performers and business logic
//
// Providers contain business logic and provide composable operations that
// coordinators can orchestrate. They perform actual work like hashing,
// token handling, validation, and session bookkeeping against the stores.

pub mod admin_provider;
pub mod authentication_provider;
pub mod crypto_provider;
pub mod identity_provider;
pub mod input_validator_provider;
pub mod session_provider;
pub mod token_provider;

// Re-export providers for clean imports
pub use admin_provider::{AdminProvider, BootstrapOutcome};
pub use authentication_provider::AuthenticationProvider;
pub use crypto_provider::CryptoProvider;
pub use identity_provider::IdentityProvider;
pub use input_validator_provider::{FieldInput, InputValidator};
pub use session_provider::{SessionProvider, MAX_SESSIONS_PER_ADMIN};
pub use token_provider::TokenProvider;
