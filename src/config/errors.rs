use thiserror::Error;

/// Failure while loading infrastructure settings
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("Database connection error: {0}")]
    DatabaseConnection(String),

    #[error("Required setting '{setting_name}' is missing")]
    MissingSetting { setting_name: String },

    #[error("Invalid setting '{setting_name}': {reason}")]
    InvalidSetting { setting_name: String, reason: String },

    #[error("Failed to parse setting '{setting_name}': {error}")]
    ParseError { setting_name: String, error: String },
}

impl ApplicationError {
    pub fn invalid(setting_name: &str, reason: impl Into<String>) -> Self {
        Self::InvalidSetting {
            setting_name: setting_name.to_string(),
            reason: reason.into(),
        }
    }
}
