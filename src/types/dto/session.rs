use poem_openapi::{ApiResponse, Object};
use serde::{Deserialize, Serialize};

use crate::errors::internal::{InputError, InputErrors};
use crate::types::db::admin;

/// Request model for administrator sign-in
///
/// Missing fields default to empty strings so that they are reported
/// by input validation instead of failing body parsing.
#[derive(Object, Debug, Default, Serialize, Deserialize)]
#[oai(rename_all = "PascalCase")]
#[serde(rename_all = "PascalCase")]
pub struct SignInRequest {
    #[oai(default)]
    #[serde(default)]
    pub name: String,

    #[oai(default)]
    #[serde(default)]
    pub password: String,
}

/// Response model carrying the bearer token of a new session
#[derive(Object, Debug, Serialize, Deserialize)]
#[oai(rename_all = "PascalCase")]
#[serde(rename_all = "PascalCase")]
pub struct TokenResponse {
    pub token: String,
}

/// Public view of an administrator
#[derive(Object, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[oai(rename_all = "PascalCase")]
#[serde(rename_all = "PascalCase")]
pub struct AdminSimple {
    pub id: i32,
    pub name: String,
}

impl From<&admin::Model> for AdminSimple {
    fn from(model: &admin::Model) -> Self {
        Self {
            id: model.id,
            name: model.name.clone(),
        }
    }
}

/// One failed input rule as reported to clients
#[derive(Object, Debug, Clone, PartialEq)]
#[oai(rename_all = "PascalCase")]
pub struct InputErrorResponse {
    pub full_name: String,
    pub name: String,
    pub kind: String,
    #[oai(rename = "Type")]
    pub rule: String,
    pub param: String,
}

impl From<InputError> for InputErrorResponse {
    fn from(error: InputError) -> Self {
        Self {
            full_name: error.full_name,
            name: error.name,
            kind: error.kind,
            rule: error.rule,
            param: error.param,
        }
    }
}

/// Body of every 400 response
#[derive(Object, Debug, Clone, PartialEq)]
#[oai(rename_all = "PascalCase")]
pub struct InputErrorsResponse {
    pub errors: Vec<InputErrorResponse>,
}

impl From<InputErrors> for InputErrorsResponse {
    fn from(errors: InputErrors) -> Self {
        Self {
            errors: errors.into_errors().into_iter().map(InputErrorResponse::from).collect(),
        }
    }
}

#[derive(ApiResponse, Debug)]
pub enum SignOutApiResponse {
    /// Session revoked
    #[oai(status = 204)]
    NoContent,
}
