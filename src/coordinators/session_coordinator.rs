use std::sync::Arc;

use poem::Request;

use crate::app_data::AppData;
use crate::errors::{AuthError, InternalError};
use crate::providers::authentication_provider::SignInRequest;
use crate::providers::{AuthenticationProvider, IdentityProvider, SessionProvider};
use crate::types::dto::session::{AdminSimple, TokenResponse};
use crate::types::internal::context::RequestContext;

/// Session coordinator that orchestrates sign-in, identity lookup and sign-out
///
/// Handles pure workflow orchestration by composing provider operations
/// for the session endpoints. Contains no business logic.
pub struct SessionCoordinator {
    authentication_provider: Arc<AuthenticationProvider>,
    identity_provider: Arc<IdentityProvider>,
    session_provider: Arc<SessionProvider>,
}

impl SessionCoordinator {
    /// Create SessionCoordinator from AppData
    ///
    /// Follows the AppData pattern: takes Arc<AppData> as single parameter
    /// and keeps the providers it needs.
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            authentication_provider: Arc::clone(&app_data.authentication_provider),
            identity_provider: Arc::clone(&app_data.identity_provider),
            session_provider: Arc::clone(&app_data.session_provider),
        }
    }

    /// Verify credentials and open a session
    pub async fn sign_in(
        &self,
        ctx: &RequestContext,
        name: &str,
        password: &str,
    ) -> Result<TokenResponse, InternalError> {
        let token = self
            .authentication_provider
            .sign_in(ctx, SignInRequest { name, password })
            .await?;

        Ok(TokenResponse {
            token: token.into_inner(),
        })
    }

    /// Response for a sign-in body that could not be parsed
    ///
    /// An unreadable body counts as empty credentials, so the caller gets
    /// the same field errors as for a body with both fields missing.
    pub fn reject_unparsable_sign_in(&self) -> AuthError {
        let empty = SignInRequest { name: "", password: "" };
        match self.authentication_provider.validate_input(&empty) {
            Err(e) => AuthError::from_internal_error(e),
            Ok(()) => AuthError::from_internal_error(InternalError::parse("sign_in_body", "unparsable request body")),
        }
    }

    /// The signed-in administrator, if any
    pub async fn me(&self, req: &Request) -> Option<AdminSimple> {
        self.identity_provider
            .resolve(req)
            .await
            .map(|identity| AdminSimple::from(&identity.admin))
    }

    /// Revoke the caller's session
    ///
    /// 1. Require a resolved identity
    /// 2. Delete the session the bearer token points at
    pub async fn sign_out(&self, req: &Request) -> Result<(), InternalError> {
        let identity = match self.identity_provider.authenticate(req).await {
            Ok(identity) => identity,
            Err(e) => {
                tracing::warn!("Sign-out without a valid session");
                return Err(e);
            }
        };

        let ctx = RequestContext::from_request(req);
        if let Some(token) = ctx.bearer.as_deref() {
            self.session_provider.revoke(token).await?;
        }

        tracing::info!(admin_id = identity.admin.id, "Administrator signed out");
        Ok(())
    }
}
