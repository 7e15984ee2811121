use std::sync::Arc;

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::config::SecretManager;
use crate::errors::InternalError;
use crate::types::db::SessionToken;
use crate::types::internal::auth::SessionClaims;

/// Encodes and decodes session tokens
///
/// Tokens are HS256 JWTs binding an administrator id to a session id. They
/// carry no expiry; a token stays usable for as long as its session row exists.
pub struct TokenProvider {
    secret_manager: Arc<SecretManager>,
}

impl TokenProvider {
    pub fn new(secret_manager: Arc<SecretManager>) -> Self {
        Self { secret_manager }
    }

    pub fn encode(&self, admin_id: i32, session_id: &str) -> Result<SessionToken, InternalError> {
        let claims = SessionClaims {
            admin_id,
            session_id: session_id.to_string(),
            iat: Utc::now().timestamp(),
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret_manager.jwt_secret().as_bytes()),
        )
        .map_err(|e| InternalError::crypto("jwt_generation", format!("Failed to generate JWT: {}", e)))?;

        Ok(SessionToken::from(token))
    }

    /// Parse a token, returning `None` for anything malformed or badly signed
    pub fn decode(&self, token: &str) -> Option<SessionClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        match decode::<SessionClaims>(
            token,
            &DecodingKey::from_secret(self.secret_manager.jwt_secret().as_bytes()),
            &validation,
        ) {
            Ok(data) if !data.claims.session_id.is_empty() => Some(data.claims),
            Ok(_) => None,
            Err(e) => {
                tracing::debug!("Rejected session token: {:?}", e.kind());
                None
            }
        }
    }
}
