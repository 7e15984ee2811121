use thiserror::Error;

use super::validation::{InputError, InputErrors};

#[derive(Error, Debug)]
pub enum CredentialError {
    /// Unknown name or password mismatch
    #[error("Wrong name or password")]
    WrongCredentials,

    /// Password matched a soft-deleted administrator
    #[error("Administrator account is deleted")]
    AccountDeleted,

    #[error("Not signed in")]
    Unauthenticated,
}

impl CredentialError {
    /// Field-level representation used in sign-in responses
    ///
    /// Returns `None` for errors that are not reported against an input field.
    pub fn as_input_errors(&self) -> Option<InputErrors> {
        match self {
            CredentialError::WrongCredentials => Some(InputErrors::single(InputError::new("Password", "wrong", ""))),
            CredentialError::AccountDeleted => Some(InputErrors::single(InputError::new("Name", "deleted", ""))),
            CredentialError::Unauthenticated => None,
        }
    }
}
