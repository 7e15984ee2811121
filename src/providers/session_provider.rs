use std::sync::Arc;

use crate::errors::InternalError;
use crate::providers::{CryptoProvider, TokenProvider};
use crate::stores::CredentialStore;
use crate::types::db::{admin_session, SessionToken};
use crate::types::internal::context::RequestContext;

/// Sessions retained per administrator after each issuance
pub const MAX_SESSIONS_PER_ADMIN: u64 = 10;

/// Issues, validates, refreshes and revokes administrator sessions
pub struct SessionProvider {
    store: Arc<CredentialStore>,
    crypto_provider: Arc<CryptoProvider>,
    token_provider: Arc<TokenProvider>,
}

impl SessionProvider {
    pub fn new(
        store: Arc<CredentialStore>,
        crypto_provider: Arc<CryptoProvider>,
        token_provider: Arc<TokenProvider>,
    ) -> Self {
        Self {
            store,
            crypto_provider,
            token_provider,
        }
    }

    /// Create a session for the administrator and return its token
    ///
    /// Older sessions beyond [`MAX_SESSIONS_PER_ADMIN`] are pruned after the
    /// insert. The prune is a separate statement, so concurrent issuance can
    /// briefly leave more rows than the cap until the next issuance.
    pub async fn issue(&self, ctx: &RequestContext, admin_id: i32) -> Result<SessionToken, InternalError> {
        let session_id = self.crypto_provider.generate_session_id();

        self.store
            .insert_session(admin_id, session_id.clone(), ctx.ip_string(), ctx.user_agent.clone())
            .await?;

        let pruned = self
            .store
            .prune_sessions_keeping_latest(admin_id, MAX_SESSIONS_PER_ADMIN)
            .await?;
        if pruned > 0 {
            tracing::debug!(admin_id, pruned, "Pruned old sessions");
        }

        tracing::debug!(admin_id, request_id = %ctx.request_id, "Issued session");

        self.token_provider.encode(admin_id, &session_id)
    }

    /// Decode a token into `(admin_id, session_id)`
    ///
    /// Only checks the token itself; whether the session still exists is up
    /// to the caller.
    pub fn validate(&self, token: &str) -> Option<(i32, String)> {
        self.token_provider
            .decode(token)
            .map(|claims| (claims.admin_id, claims.session_id))
    }

    /// Delete the session a token refers to
    ///
    /// Unparsable tokens and already-deleted sessions are no-ops.
    pub async fn revoke(&self, token: &str) -> Result<(), InternalError> {
        let Some((admin_id, session_id)) = self.validate(token) else {
            return Ok(());
        };

        let deleted = self.store.delete_session(admin_id, &session_id).await?;
        tracing::debug!(admin_id, deleted, "Revoked session");

        Ok(())
    }

    /// Record the caller's current address and user agent on the session
    ///
    /// Writes only the changed columns (plus updated_at), and nothing at all
    /// when both match. Returns the current row and whether a write happened.
    pub async fn refresh_if_changed(
        &self,
        session: &admin_session::Model,
        ctx: &RequestContext,
    ) -> Result<(admin_session::Model, bool), InternalError> {
        let ip_address = ctx.ip_string();
        let ip_changed = (session.ip_address != ip_address).then_some(ip_address);
        let user_agent_changed = (session.user_agent != ctx.user_agent).then(|| ctx.user_agent.clone());

        if ip_changed.is_none() && user_agent_changed.is_none() {
            return Ok((session.clone(), false));
        }

        let updated = self
            .store
            .update_session_fields(session, ip_changed, user_agent_changed)
            .await?;

        Ok((updated, true))
    }
}
