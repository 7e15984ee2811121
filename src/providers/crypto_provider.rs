use std::sync::Arc;

use argon2::{Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version, password_hash::SaltString};
use rand::Rng;
use rand::distr::Alphanumeric;

use crate::config::SecretManager;
use crate::errors::InternalError;

const GENERATED_PASSWORD_LENGTH: usize = 16;
const SESSION_ID_BYTES: usize = 16;

/// Cryptographic operations provider
///
/// Argon2id password hashing with the configured pepper as secret parameter,
/// plus CSPRNG-backed generation of passwords and session identifiers.
pub struct CryptoProvider {
    secret_manager: Arc<SecretManager>,
}

impl CryptoProvider {
    pub fn new(secret_manager: Arc<SecretManager>) -> Self {
        Self { secret_manager }
    }

    fn argon2(&self) -> Result<Argon2<'_>, InternalError> {
        Argon2::new_with_secret(
            self.secret_manager.password_pepper().as_bytes(),
            Algorithm::Argon2id,
            Version::V0x13,
            Params::default(),
        )
        .map_err(|e| InternalError::crypto("argon2_init", e.to_string()))
    }

    /// Hash a plaintext password into a PHC string
    pub fn hash_password(&self, password: &str) -> Result<String, InternalError> {
        let salt = SaltString::generate(&mut rand_core::OsRng);
        let hash = self
            .argon2()?
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| InternalError::crypto("password_hashing", e.to_string()))?;

        Ok(hash.to_string())
    }

    /// Check a plaintext password against a stored PHC string
    ///
    /// A stored value that is not a valid PHC string never matches.
    pub fn verify_password(&self, password: &str, password_hash: &str) -> Result<bool, InternalError> {
        let parsed_hash = match PasswordHash::new(password_hash) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Stored password hash is malformed: {}", e);
                return Ok(false);
            }
        };

        Ok(self
            .argon2()?
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Generate a random 16-character alphanumeric password
    pub fn generate_password(&self) -> String {
        rand::rng()
            .sample_iter(&Alphanumeric)
            .take(GENERATED_PASSWORD_LENGTH)
            .map(char::from)
            .collect()
    }

    /// Generate an unguessable 128-bit session identifier as lowercase hex
    pub fn generate_session_id(&self) -> String {
        let bytes: [u8; SESSION_ID_BYTES] = rand::rng().random();
        bytes.iter().map(|b| format!("{:02x}", b)).collect()
    }
}

impl std::fmt::Debug for CryptoProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CryptoProvider")
            .field("password_pepper", &"<redacted>")
            .finish()
    }
}
