use chrono::Utc;
use sea_orm::sea_query::{Expr, OnConflict, Order, Query};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, NotSet, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};

use crate::errors::InternalError;
use crate::types::db::admin::{self, Entity as Admin};
use crate::types::db::admin_session::{self, Entity as AdminSession};

/// CredentialStore persists administrators and their sessions
///
/// Password hashing happens in `CryptoProvider`; this store only ever sees
/// PHC hash strings. Name lookups and the uniqueness constraint both go
/// through [`admin::name_key`], so they fold case the same way for every
/// script. Soft-deleted administrators still reserve their name.
pub struct CredentialStore {
    db: DatabaseConnection,
}

impl CredentialStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    // ============================================================
    // Administrators
    // ============================================================

    /// Insert a new administrator
    ///
    /// Fails with a database error when the name is already taken in any case.
    pub async fn insert_admin(&self, name: &str, password_hash: String) -> Result<admin::Model, InternalError> {
        let now = Utc::now();
        let new_admin = admin::ActiveModel {
            id: NotSet,
            name: Set(name.to_string()),
            name_key: Set(admin::name_key(name)),
            password_hash: Set(password_hash),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
        };

        let model = new_admin
            .insert(&self.db)
            .await
            .map_err(|e| InternalError::database("insert_admin", e))?;

        tracing::debug!("Inserted admin {} ({})", model.id, model.name);
        Ok(model)
    }

    /// Insert the administrator or, when the name already exists, replace its
    /// password hash and clear the soft-delete marker
    ///
    /// Single atomic statement keyed on the unique name. The returned flag is
    /// true when an existing row was updated.
    pub async fn upsert_admin_by_name(&self, name: &str, password_hash: String) -> Result<(admin::Model, bool), InternalError> {
        let now = Utc::now();
        let candidate = admin::ActiveModel {
            id: NotSet,
            name: Set(name.to_string()),
            name_key: Set(admin::name_key(name)),
            password_hash: Set(password_hash),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
        };

        Admin::insert(candidate)
            .on_conflict(
                OnConflict::column(admin::Column::NameKey)
                    .update_columns([admin::Column::PasswordHash, admin::Column::UpdatedAt])
                    .value(admin::Column::DeletedAt, Expr::value(Option::<chrono::DateTime<Utc>>::None))
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(|e| InternalError::database("upsert_admin_by_name", e))?;

        let model = self
            .find_admin_by_name_case_insensitive(name)
            .await?
            .ok_or_else(|| InternalError::not_found(format!("admin {}", name)))?;

        // An updated row keeps the created_at of its original insert
        let was_updated = model.created_at != now;
        tracing::debug!("Upserted admin {} (updated: {})", model.id, was_updated);

        Ok((model, was_updated))
    }

    /// Replace the password hash of the named administrator and restore it if
    /// it was soft-deleted
    pub async fn reset_admin_password_by_name(&self, name: &str, password_hash: String) -> Result<(), InternalError> {
        let result = Admin::update_many()
            .col_expr(admin::Column::PasswordHash, Expr::value(password_hash))
            .col_expr(admin::Column::DeletedAt, Expr::value(Option::<chrono::DateTime<Utc>>::None))
            .col_expr(admin::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(admin::Column::NameKey.eq(admin::name_key(name)))
            .exec(&self.db)
            .await
            .map_err(|e| InternalError::database("reset_admin_password_by_name", e))?;

        if result.rows_affected == 0 {
            return Err(InternalError::not_found(format!("admin {}", name)));
        }

        Ok(())
    }

    /// Live (not soft-deleted) administrator by id
    pub async fn find_admin_by_id(&self, id: i32) -> Result<Option<admin::Model>, InternalError> {
        Admin::find_by_id(id)
            .filter(admin::Column::DeletedAt.is_null())
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_admin_by_id", e))
    }

    /// Administrator with the given name, compared case-insensitively,
    /// regardless of deletion state
    pub async fn find_admin_by_name_case_insensitive(&self, name: &str) -> Result<Option<admin::Model>, InternalError> {
        Admin::find()
            .filter(admin::Column::NameKey.eq(admin::name_key(name)))
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_admin_by_name", e))
    }

    /// Number of administrators, soft-deleted ones included
    pub async fn count_admins(&self) -> Result<u64, InternalError> {
        Admin::find()
            .count(&self.db)
            .await
            .map_err(|e| InternalError::database("count_admins", e))
    }

    /// Administrator with the lowest id, soft-deleted ones included
    pub async fn find_first_admin_ordered_by_id(&self) -> Result<Option<admin::Model>, InternalError> {
        Admin::find()
            .order_by_asc(admin::Column::Id)
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_first_admin", e))
    }

    /// Soft-delete an administrator and drop all of its sessions
    ///
    /// Returns false when no live administrator has this id.
    pub async fn soft_delete_admin(&self, id: i32) -> Result<bool, InternalError> {
        let result = Admin::update_many()
            .col_expr(admin::Column::DeletedAt, Expr::value(Some(Utc::now())))
            .filter(admin::Column::Id.eq(id))
            .filter(admin::Column::DeletedAt.is_null())
            .exec(&self.db)
            .await
            .map_err(|e| InternalError::database("soft_delete_admin", e))?;

        if result.rows_affected == 0 {
            return Ok(false);
        }

        AdminSession::delete_many()
            .filter(admin_session::Column::AdminId.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| InternalError::database("delete_admin_sessions", e))?;

        Ok(true)
    }

    // ============================================================
    // Sessions
    // ============================================================

    pub async fn insert_session(
        &self,
        admin_id: i32,
        session_id: String,
        ip_address: String,
        user_agent: String,
    ) -> Result<admin_session::Model, InternalError> {
        let now = Utc::now();
        let new_session = admin_session::ActiveModel {
            id: NotSet,
            admin_id: Set(admin_id),
            session_id: Set(session_id),
            ip_address: Set(ip_address),
            user_agent: Set(user_agent),
            created_at: Set(now),
            updated_at: Set(now),
        };

        new_session
            .insert(&self.db)
            .await
            .map_err(|e| InternalError::database("insert_session", e))
    }

    pub async fn find_session(&self, admin_id: i32, session_id: &str) -> Result<Option<admin_session::Model>, InternalError> {
        AdminSession::find()
            .filter(admin_session::Column::AdminId.eq(admin_id))
            .filter(admin_session::Column::SessionId.eq(session_id))
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_session", e))
    }

    /// Write the given fields plus updated_at; `None` leaves a column untouched
    pub async fn update_session_fields(
        &self,
        session: &admin_session::Model,
        ip_address: Option<String>,
        user_agent: Option<String>,
    ) -> Result<admin_session::Model, InternalError> {
        let mut active: admin_session::ActiveModel = session.clone().into();
        if let Some(ip_address) = ip_address {
            active.ip_address = Set(ip_address);
        }
        if let Some(user_agent) = user_agent {
            active.user_agent = Set(user_agent);
        }
        active.updated_at = Set(Utc::now());

        active
            .update(&self.db)
            .await
            .map_err(|e| InternalError::database("update_session_fields", e))
    }

    /// Returns the number of deleted rows (0 or 1)
    pub async fn delete_session(&self, admin_id: i32, session_id: &str) -> Result<u64, InternalError> {
        let result = AdminSession::delete_many()
            .filter(admin_session::Column::AdminId.eq(admin_id))
            .filter(admin_session::Column::SessionId.eq(session_id))
            .exec(&self.db)
            .await
            .map_err(|e| InternalError::database("delete_session", e))?;

        Ok(result.rows_affected)
    }

    /// Delete every session of the administrator except the `keep` most
    /// recently updated ones; newer ids win ties
    pub async fn prune_sessions_keeping_latest(&self, admin_id: i32, keep: u64) -> Result<u64, InternalError> {
        let latest = Query::select()
            .column(admin_session::Column::Id)
            .from(AdminSession)
            .and_where(admin_session::Column::AdminId.eq(admin_id))
            .order_by(admin_session::Column::UpdatedAt, Order::Desc)
            .order_by(admin_session::Column::Id, Order::Desc)
            .limit(keep)
            .to_owned();

        let result = AdminSession::delete_many()
            .filter(admin_session::Column::AdminId.eq(admin_id))
            .filter(admin_session::Column::Id.not_in_subquery(latest))
            .exec(&self.db)
            .await
            .map_err(|e| InternalError::database("prune_sessions", e))?;

        if result.rows_affected > 0 {
            tracing::debug!("Pruned {} sessions of admin {}", result.rows_affected, admin_id);
        }

        Ok(result.rows_affected)
    }

    pub async fn count_sessions(&self, admin_id: i32) -> Result<u64, InternalError> {
        AdminSession::find()
            .filter(admin_session::Column::AdminId.eq(admin_id))
            .count(&self.db)
            .await
            .map_err(|e| InternalError::database("count_sessions", e))
    }

    /// Sessions of the administrator, most recently updated first
    pub async fn list_sessions(&self, admin_id: i32) -> Result<Vec<admin_session::Model>, InternalError> {
        AdminSession::find()
            .filter(admin_session::Column::AdminId.eq(admin_id))
            .order_by_desc(admin_session::Column::UpdatedAt)
            .order_by_desc(admin_session::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("list_sessions", e))
    }
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialStore")
            .field("db", &"<connection>")
            .finish()
    }
}

impl std::fmt::Display for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CredentialStore {{ db: <connection> }}")
    }
}
