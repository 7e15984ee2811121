use serde::{Deserialize, Serialize};

/// Claims carried by a session token
///
/// The token has no expiry claim; validity is decided by the session row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionClaims {
    #[serde(rename = "AdminId")]
    pub admin_id: i32,

    #[serde(rename = "SessionId")]
    pub session_id: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,
}
