use std::sync::Arc;

use poem::Request;

use crate::errors::InternalError;
use crate::errors::internal::CredentialError;
use crate::providers::SessionProvider;
use crate::stores::CredentialStore;
use crate::types::internal::context::RequestContext;
use crate::types::internal::{Identity, IdentitySlot};

/// Resolves the administrator behind a request
///
/// Resolution never fails: bad tokens, deleted administrators, missing
/// sessions and store errors all make the request anonymous. A resolved
/// identity is cached in the request's [`IdentitySlot`], so repeated calls
/// within one request hit the store once.
pub struct IdentityProvider {
    store: Arc<CredentialStore>,
    session_provider: Arc<SessionProvider>,
}

impl IdentityProvider {
    pub fn new(store: Arc<CredentialStore>, session_provider: Arc<SessionProvider>) -> Self {
        Self { store, session_provider }
    }

    pub async fn resolve(&self, req: &Request) -> Option<Identity> {
        let slot = req.extensions().get::<IdentitySlot>().cloned();
        if let Some(identity) = slot.as_ref().and_then(IdentitySlot::get) {
            return Some(identity.clone());
        }

        let ctx = RequestContext::from_request(req);
        let identity = self.resolve_context(&ctx).await?;

        Some(match slot {
            Some(slot) => slot.fill(identity).clone(),
            None => identity,
        })
    }

    /// Uncached resolution from an already extracted context
    pub async fn resolve_context(&self, ctx: &RequestContext) -> Option<Identity> {
        let token = ctx.bearer.as_deref()?;
        let (admin_id, session_id) = self.session_provider.validate(token)?;

        let admin = match self.store.find_admin_by_id(admin_id).await {
            Ok(Some(admin)) => admin,
            Ok(None) => {
                tracing::debug!(admin_id, "Token for missing or deleted admin");
                return None;
            }
            Err(e) => {
                tracing::error!("Failed to load admin {}: {}", admin_id, e);
                return None;
            }
        };

        let session = match self.store.find_session(admin_id, &session_id).await {
            Ok(Some(session)) => session,
            Ok(None) => {
                tracing::debug!(admin_id, "Token for revoked or pruned session");
                return None;
            }
            Err(e) => {
                tracing::error!("Failed to load session for admin {}: {}", admin_id, e);
                return None;
            }
        };

        let session = match self.session_provider.refresh_if_changed(&session, ctx).await {
            Ok((session, _)) => session,
            Err(e) => {
                tracing::error!("Failed to refresh session for admin {}: {}", admin_id, e);
                return None;
            }
        };

        Some(Identity { admin, session })
    }

    /// Identity for a guarded route, `Unauthenticated` when there is none
    pub async fn authenticate(&self, req: &Request) -> Result<Identity, InternalError> {
        self.resolve(req)
            .await
            .ok_or_else(|| CredentialError::Unauthenticated.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_data::AppData;
    use crate::test::utils::{create_test_admin, setup_test_app_data};
    use sea_orm::ConnectionTrait;

    async fn signed_in(app_data: &AppData) -> (i32, String) {
        let admin = create_test_admin(app_data, "admin", "secret1").await;
        let ctx = RequestContext::for_cli("test").with_user_agent("agent");
        let token = app_data.session_provider.issue(&ctx, admin.id).await.unwrap();
        (admin.id, token.into_inner())
    }

    fn request(token: &str, user_agent: &str) -> Request {
        let mut req = Request::builder()
            .header("Authorization", format!("Bearer {}", token))
            .header("User-Agent", user_agent)
            .finish();
        req.extensions_mut().insert(IdentitySlot::default());
        req
    }

    #[tokio::test]
    async fn test_resolves_signed_in_admin() {
        let app_data = setup_test_app_data().await;
        let (admin_id, token) = signed_in(&app_data).await;

        let identity = app_data.identity_provider.resolve(&request(&token, "agent")).await.unwrap();
        assert_eq!(identity.admin.id, admin_id);
        assert_eq!(identity.admin.name, "admin");
    }

    #[tokio::test]
    async fn test_bare_token_is_accepted() {
        let app_data = setup_test_app_data().await;
        let (_, token) = signed_in(&app_data).await;

        let req = Request::builder()
            .header("Authorization", token.as_str())
            .header("User-Agent", "agent")
            .finish();
        assert!(app_data.identity_provider.resolve(&req).await.is_some());
    }

    #[tokio::test]
    async fn test_missing_or_garbage_token_is_anonymous() {
        let app_data = setup_test_app_data().await;
        signed_in(&app_data).await;

        assert!(app_data.identity_provider.resolve(&Request::builder().finish()).await.is_none());
        assert!(app_data.identity_provider.resolve(&request("garbage", "agent")).await.is_none());
    }

    #[tokio::test]
    async fn test_identity_is_cached_per_request() {
        let app_data = setup_test_app_data().await;
        let (admin_id, token) = signed_in(&app_data).await;
        let req = request(&token, "agent");

        assert!(app_data.identity_provider.resolve(&req).await.is_some());

        // Revoking behind the cache does not affect the same request
        app_data.session_provider.revoke(&token).await.unwrap();
        let cached = app_data.identity_provider.resolve(&req).await.unwrap();
        assert_eq!(cached.admin.id, admin_id);

        // A new request sees the revocation
        assert!(app_data.identity_provider.resolve(&request(&token, "agent")).await.is_none());
    }

    #[tokio::test]
    async fn test_deleted_admin_is_anonymous() {
        let app_data = setup_test_app_data().await;
        let (admin_id, token) = signed_in(&app_data).await;
        app_data.credential_store.soft_delete_admin(admin_id).await.unwrap();

        assert!(app_data.identity_provider.resolve(&request(&token, "agent")).await.is_none());
    }

    #[tokio::test]
    async fn test_refresh_updates_user_agent() {
        let app_data = setup_test_app_data().await;
        let (admin_id, token) = signed_in(&app_data).await;

        let identity = app_data.identity_provider.resolve(&request(&token, "other-agent")).await.unwrap();
        assert_eq!(identity.session.user_agent, "other-agent");

        let stored = app_data
            .credential_store
            .find_session(admin_id, &identity.session.session_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.user_agent, "other-agent");
    }

    #[tokio::test]
    async fn test_failed_refresh_is_anonymous() {
        let app_data = setup_test_app_data().await;
        let (_, token) = signed_in(&app_data).await;

        app_data
            .credential_store
            .connection()
            .execute_unprepared(
                "CREATE TRIGGER reject_session_updates BEFORE UPDATE ON admin_sessions \
                 BEGIN SELECT RAISE(ABORT, 'session updates disabled'); END;",
            )
            .await
            .unwrap();

        // Unchanged request needs no write and still resolves
        assert!(app_data.identity_provider.resolve(&request(&token, "agent")).await.is_some());
        // A changed user agent forces a write, which now fails
        assert!(app_data.identity_provider.resolve(&request(&token, "other-agent")).await.is_none());
    }

    #[tokio::test]
    async fn test_authenticate_without_identity_is_unauthenticated() {
        let app_data = setup_test_app_data().await;

        let result = app_data.identity_provider.authenticate(&Request::builder().finish()).await;
        assert!(matches!(result, Err(InternalError::Credential(CredentialError::Unauthenticated))));
    }
}
