use crate::errors::internal::{CredentialError, InternalError};
use crate::types::dto::common::MessageResponse;
use crate::types::dto::session::InputErrorsResponse;
use poem_openapi::{ApiResponse, payload::Json};
use std::fmt;

pub const UNAUTHENTICATED_MESSAGE: &str = "Please Log In";
pub const NOT_FOUND_MESSAGE: &str = "Not Found";
pub const SERVER_ERROR_MESSAGE: &str = "Server Error";

/// Authentication error types
#[derive(ApiResponse, Debug)]
pub enum AuthError {
    /// Input failed validation, or the credentials were rejected
    #[oai(status = 400)]
    InvalidInput(Json<InputErrorsResponse>),

    /// No signed-in administrator
    #[oai(status = 401)]
    Unauthenticated(Json<MessageResponse>),

    /// Requested record does not exist
    #[oai(status = 404)]
    NotFound(Json<MessageResponse>),

    /// Internal server error
    #[oai(status = 500)]
    InternalError(Json<MessageResponse>),
}

impl AuthError {
    /// Create an Unauthenticated error
    pub fn unauthenticated() -> Self {
        AuthError::Unauthenticated(Json(MessageResponse::new(UNAUTHENTICATED_MESSAGE)))
    }

    /// Create a NotFound error
    pub fn not_found() -> Self {
        AuthError::NotFound(Json(MessageResponse::new(NOT_FOUND_MESSAGE)))
    }

    /// Convert InternalError to AuthError
    ///
    /// This is the explicit conversion point from internal errors to API errors.
    /// Internal error details are logged but not exposed to clients.
    pub fn from_internal_error(err: InternalError) -> Self {
        match err {
            // Infrastructure errors - always log and return generic error
            InternalError::Database(ref db_err) => {
                tracing::error!("Database error in {}: {}", db_err.operation(), err);
                Self::internal_server_error()
            }
            InternalError::Parse { ref value_type, .. } => {
                tracing::error!("Parse error for {}: {}", value_type, err);
                Self::internal_server_error()
            }
            InternalError::Crypto { ref operation, .. } => {
                tracing::error!("Crypto error in {}: {}", operation, err);
                Self::internal_server_error()
            }

            // Domain errors - convert to specific API errors
            InternalError::NotFound { entity } => {
                tracing::debug!("Not found: {}", entity);
                Self::not_found()
            }
            InternalError::Validation(errors) => {
                tracing::debug!("Input validation failed: {}", errors);
                AuthError::InvalidInput(Json(errors.into()))
            }
            InternalError::Credential(credential_err) => match credential_err.as_input_errors() {
                Some(errors) => {
                    tracing::debug!("Sign-in rejected: {}", credential_err);
                    AuthError::InvalidInput(Json(errors.into()))
                }
                None => Self::unauthenticated(),
            },
        }
    }

    /// Create a generic internal server error
    ///
    /// Always returns a generic message without exposing internal details.
    fn internal_server_error() -> Self {
        AuthError::InternalError(Json(MessageResponse::new(SERVER_ERROR_MESSAGE)))
    }

    /// Get the error message from the error variant
    pub fn message(&self) -> String {
        match self {
            AuthError::InvalidInput(json) => json
                .0
                .errors
                .iter()
                .map(|e| format!("{}: {} {}", e.full_name, e.rule, e.param).trim_end().to_string())
                .collect::<Vec<_>>()
                .join(", "),
            AuthError::Unauthenticated(json) => json.0.message.clone(),
            AuthError::NotFound(json) => json.0.message.clone(),
            AuthError::InternalError(json) => json.0.message.clone(),
        }
    }
}

impl From<InternalError> for AuthError {
    fn from(err: InternalError) -> Self {
        Self::from_internal_error(err)
    }
}

impl From<CredentialError> for AuthError {
    fn from(err: CredentialError) -> Self {
        Self::from_internal_error(err.into())
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}
