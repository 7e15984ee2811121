use poem::Request;
use poem_openapi::{payload::Json, OpenApi, Tags};
use std::sync::Arc;

use crate::coordinators::SessionCoordinator;
use crate::errors::AuthError;
use crate::types::dto::session::{AdminSimple, SignInRequest, SignOutApiResponse, TokenResponse};
use crate::types::internal::context::RequestContext;

/// Administrator session endpoints
pub struct SessionApi {
    session_coordinator: Arc<SessionCoordinator>,
}

impl SessionApi {
    /// Create a new SessionApi with the given SessionCoordinator
    pub fn new(session_coordinator: Arc<SessionCoordinator>) -> Self {
        Self { session_coordinator }
    }
}

/// API tags for session endpoints
#[derive(Tags)]
enum SessionTags {
    /// Sign-in, sign-out and current administrator
    Session,
}

#[OpenApi]
impl SessionApi {
    /// Sign in with name and password to receive a bearer token
    #[oai(path = "/sign-in", method = "post", tag = "SessionTags::Session")]
    async fn sign_in(&self, req: &Request, body: Json<SignInRequest>) -> Result<Json<TokenResponse>, AuthError> {
        let ctx = RequestContext::from_request(req);

        let response = self
            .session_coordinator
            .sign_in(&ctx, &body.name, &body.password)
            .await
            .map_err(AuthError::from_internal_error)?;

        Ok(Json(response))
    }

    /// Current administrator, or `null` when not signed in
    #[oai(path = "/me", method = "get", tag = "SessionTags::Session")]
    async fn me(&self, req: &Request) -> Json<Option<AdminSimple>> {
        Json(self.session_coordinator.me(req).await)
    }

    /// Revoke the session of the presented token
    #[oai(path = "/sign-out", method = "post", tag = "SessionTags::Session")]
    async fn sign_out(&self, req: &Request) -> Result<SignOutApiResponse, AuthError> {
        self.session_coordinator
            .sign_out(req)
            .await
            .map_err(AuthError::from_internal_error)?;

        Ok(SignOutApiResponse::NoContent)
    }
}
