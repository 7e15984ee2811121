use std::sync::Arc;

use crate::errors::InternalError;
use crate::errors::internal::CredentialError;
use crate::providers::{CryptoProvider, FieldInput, InputValidator, SessionProvider};
use crate::stores::CredentialStore;
use crate::types::db::SessionToken;
use crate::types::internal::context::RequestContext;

/// Administrator names are 1 to 30 characters
pub const NAME_RULES: &[(&str, &str)] = &[("gt", "0"), ("lte", "30")];
const PASSWORD_RULES: &[(&str, &str)] = &[("gte", "6"), ("lte", "72")];

/// Credentials submitted on sign-in
pub struct SignInRequest<'a> {
    pub name: &'a str,
    pub password: &'a str,
}

/// Verifies administrator credentials and opens a session
pub struct AuthenticationProvider {
    store: Arc<CredentialStore>,
    crypto_provider: Arc<CryptoProvider>,
    session_provider: Arc<SessionProvider>,
    validator: InputValidator,
}

impl AuthenticationProvider {
    pub fn new(
        store: Arc<CredentialStore>,
        crypto_provider: Arc<CryptoProvider>,
        session_provider: Arc<SessionProvider>,
        validator: InputValidator,
    ) -> Self {
        Self {
            store,
            crypto_provider,
            session_provider,
            validator,
        }
    }

    /// Check name and password against the sign-in field rules
    pub fn validate_input(&self, creds: &SignInRequest<'_>) -> Result<(), InternalError> {
        self.validator.validate(&[
            FieldInput::new("Name", creds.name, NAME_RULES),
            FieldInput::new("Password", creds.password, PASSWORD_RULES),
        ])
    }

    /// Sign an administrator in
    ///
    /// The password is checked before the soft-delete marker, so a caller
    /// without the right password cannot tell a deleted account from a
    /// missing one. Unknown names and wrong passwords both yield
    /// `WrongCredentials`.
    pub async fn sign_in(&self, ctx: &RequestContext, creds: SignInRequest<'_>) -> Result<SessionToken, InternalError> {
        self.validate_input(&creds)?;

        let Some(admin) = self
            .store
            .find_admin_by_name_case_insensitive(creds.name)
            .await?
        else {
            tracing::debug!(request_id = %ctx.request_id, "Sign-in for unknown name");
            return Err(CredentialError::WrongCredentials.into());
        };

        if !self.crypto_provider.verify_password(creds.password, &admin.password_hash)? {
            tracing::debug!(admin_id = admin.id, request_id = %ctx.request_id, "Sign-in with wrong password");
            return Err(CredentialError::WrongCredentials.into());
        }

        if admin.is_deleted() {
            tracing::debug!(admin_id = admin.id, "Sign-in to deleted account");
            return Err(CredentialError::AccountDeleted.into());
        }

        let token = self.session_provider.issue(ctx, admin.id).await?;
        tracing::info!(admin_id = admin.id, ip = %ctx.ip_string(), "Administrator signed in");

        Ok(token)
    }
}
