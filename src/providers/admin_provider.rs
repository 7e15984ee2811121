use std::sync::Arc;

use crate::errors::InternalError;
use crate::providers::authentication_provider::NAME_RULES;
use crate::providers::{CryptoProvider, FieldInput, InputValidator};
use crate::stores::CredentialStore;

/// Result of an administrator bootstrap
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapOutcome {
    /// Name of the administrator that was created, reset or probed
    pub name: String,
    /// Plaintext password now in effect, empty in probe mode
    pub password: String,
    /// True when an existing administrator's password was replaced
    pub was_updated: bool,
}

/// Creates the first administrator or resets an existing one
pub struct AdminProvider {
    store: Arc<CredentialStore>,
    crypto_provider: Arc<CryptoProvider>,
    validator: InputValidator,
}

impl AdminProvider {
    pub fn new(store: Arc<CredentialStore>, crypto_provider: Arc<CryptoProvider>, validator: InputValidator) -> Self {
        Self {
            store,
            crypto_provider,
            validator,
        }
    }

    /// Create or reset the administrator account
    ///
    /// With an empty `name` this only reports the first administrator's name
    /// (empty when there is none) and writes nothing. Any other name must pass
    /// the sign-in name rules. An empty `password` is replaced by a generated
    /// one.
    ///
    /// On an empty store the row is written with a single upsert keyed on the
    /// case-insensitive name, so concurrent callers converge on one live row.
    /// Otherwise the first existing administrator gets the new password and is
    /// restored if soft-deleted.
    pub async fn create_or_reset(&self, name: &str, password: &str) -> Result<BootstrapOutcome, InternalError> {
        let existing = self.store.find_first_admin_ordered_by_id().await?;

        if name.is_empty() {
            return Ok(BootstrapOutcome {
                name: existing.map(|admin| admin.name).unwrap_or_default(),
                password: String::new(),
                was_updated: false,
            });
        }

        self.validator.validate(&[FieldInput::new("Name", name, NAME_RULES)])?;

        let password = if password.is_empty() {
            self.crypto_provider.generate_password()
        } else {
            password.to_string()
        };
        let password_hash = self.crypto_provider.hash_password(&password)?;

        match existing {
            None => {
                let (admin, was_updated) = self.store.upsert_admin_by_name(name, password_hash).await?;
                tracing::info!(admin_id = admin.id, was_updated, "Bootstrapped administrator {}", admin.name);

                Ok(BootstrapOutcome {
                    name: admin.name,
                    password,
                    was_updated,
                })
            }
            Some(admin) => {
                self.store.reset_admin_password_by_name(&admin.name, password_hash).await?;
                tracing::info!(admin_id = admin.id, "Reset password of administrator {}", admin.name);

                Ok(BootstrapOutcome {
                    name: admin.name,
                    password,
                    was_updated: true,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::authentication_provider::SignInRequest;
    use crate::test::utils::{create_test_admin, setup_test_app_data};
    use crate::types::internal::context::RequestContext;

    #[tokio::test]
    async fn test_probe_on_empty_store() {
        let app_data = setup_test_app_data().await;

        let outcome = app_data.admin_provider.create_or_reset("", "").await.unwrap();
        assert_eq!(outcome, BootstrapOutcome {
            name: String::new(),
            password: String::new(),
            was_updated: false,
        });
        assert_eq!(app_data.credential_store.count_admins().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_probe_reports_first_admin_including_deleted() {
        let app_data = setup_test_app_data().await;
        let first = create_test_admin(&app_data, "first", "secret1").await;
        create_test_admin(&app_data, "second", "secret1").await;
        app_data.credential_store.soft_delete_admin(first.id).await.unwrap();

        let outcome = app_data.admin_provider.create_or_reset("", "ignored").await.unwrap();
        assert_eq!(outcome.name, "first");
        assert_eq!(outcome.password, "");
        assert!(!outcome.was_updated);
    }

    #[tokio::test]
    async fn test_rejects_name_longer_than_thirty_chars() {
        let app_data = setup_test_app_data().await;

        let result = app_data.admin_provider.create_or_reset(&"a".repeat(31), "secret1").await;

        assert!(matches!(result, Err(InternalError::Validation(_))));
        assert_eq!(app_data.credential_store.count_admins().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_creates_admin_on_empty_store() {
        let app_data = setup_test_app_data().await;

        let outcome = app_data.admin_provider.create_or_reset("admin", "secret1").await.unwrap();
        assert_eq!(outcome.name, "admin");
        assert_eq!(outcome.password, "secret1");
        assert!(!outcome.was_updated);

        let token = app_data
            .authentication_provider
            .sign_in(&RequestContext::for_cli("test"), SignInRequest { name: "admin", password: "secret1" })
            .await;
        assert!(token.is_ok());
    }

    #[tokio::test]
    async fn test_generates_password_when_empty() {
        let app_data = setup_test_app_data().await;

        let outcome = app_data.admin_provider.create_or_reset("admin", "").await.unwrap();
        assert_eq!(outcome.password.len(), 16);
        assert!(outcome.password.chars().all(|c| c.is_ascii_alphanumeric()));

        let admin = app_data
            .credential_store
            .find_admin_by_name_case_insensitive("admin")
            .await
            .unwrap()
            .unwrap();
        assert!(app_data.crypto_provider.verify_password(&outcome.password, &admin.password_hash).unwrap());
    }

    #[tokio::test]
    async fn test_resets_existing_admin_and_restores_it() {
        let app_data = setup_test_app_data().await;
        let admin = create_test_admin(&app_data, "root", "secret1").await;
        app_data.credential_store.soft_delete_admin(admin.id).await.unwrap();

        let outcome = app_data.admin_provider.create_or_reset("admin", "newpass1").await.unwrap();
        assert_eq!(outcome.name, "root");
        assert_eq!(outcome.password, "newpass1");
        assert!(outcome.was_updated);

        let restored = app_data.credential_store.find_admin_by_id(admin.id).await.unwrap().unwrap();
        assert!(!restored.is_deleted());
        assert!(app_data.crypto_provider.verify_password("newpass1", &restored.password_hash).unwrap());
        assert_eq!(app_data.credential_store.count_admins().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_bootstrap_converges_on_one_row() {
        let app_data = setup_test_app_data().await;

        let (first, second) = tokio::join!(
            app_data.admin_provider.create_or_reset("admin", "secret1"),
            app_data.admin_provider.create_or_reset("Admin", "secret2"),
        );

        let first = first.unwrap();
        let second = second.unwrap();
        assert!(first.name.eq_ignore_ascii_case("admin"));
        assert!(second.name.eq_ignore_ascii_case("admin"));
        assert_eq!(app_data.credential_store.count_admins().await.unwrap(), 1);

        let admin = app_data
            .credential_store
            .find_admin_by_name_case_insensitive("admin")
            .await
            .unwrap()
            .unwrap();
        assert!(!admin.is_deleted());
    }
}
