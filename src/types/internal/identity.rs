use std::sync::{Arc, OnceLock};

use crate::types::db::{admin, admin_session};

/// Administrator resolved for the current request together with its session
#[derive(Debug, Clone, PartialEq)]
pub struct Identity {
    pub admin: admin::Model,
    pub session: admin_session::Model,
}

/// Request-scoped identity cache
///
/// Installed once per request as a request extension. Written at most once;
/// an anonymous result is never stored so later calls resolve again.
#[derive(Debug, Clone, Default)]
pub struct IdentitySlot(Arc<OnceLock<Identity>>);

impl IdentitySlot {
    pub fn get(&self) -> Option<&Identity> {
        self.0.get()
    }

    /// Store the identity, keeping the first one if the slot is already filled
    pub fn fill(&self, identity: Identity) -> &Identity {
        self.0.get_or_init(|| identity)
    }
}
