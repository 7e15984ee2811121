#[cfg(test)]
mod tests {
    use crate::errors::internal::{CredentialError, InputError, InputErrors, InternalError};
    use sea_orm::DbErr;

    #[test]
    fn test_database_error_includes_operation() {
        let db_err = DbErr::RecordNotFound("test record".to_string());
        let error = InternalError::database("insert_session", db_err);

        let error_string = error.to_string();
        assert!(error_string.contains("insert_session"));
        assert!(error_string.contains("Database error"));
    }

    #[test]
    fn test_parse_error_includes_value_type() {
        let error = InternalError::parse("rule_param", "invalid digit");

        let error_string = error.to_string();
        assert!(error_string.contains("rule_param"));
        assert!(error_string.contains("invalid digit"));
        assert!(error_string.contains("Parse error"));
    }

    #[test]
    fn test_crypto_error_includes_operation() {
        let error = InternalError::crypto("argon2_init", "invalid secret length");

        let error_string = error.to_string();
        assert!(error_string.contains("argon2_init"));
        assert!(error_string.contains("invalid secret length"));
        assert!(error_string.contains("Crypto error"));
    }

    #[test]
    fn test_not_found_includes_entity() {
        let error = InternalError::not_found("admin root");
        assert_eq!(error.to_string(), "Not found: admin root");
    }

    #[test]
    fn test_credential_error_messages() {
        assert_eq!(CredentialError::WrongCredentials.to_string(), "Wrong name or password");
        assert_eq!(CredentialError::AccountDeleted.to_string(), "Administrator account is deleted");
        assert_eq!(CredentialError::Unauthenticated.to_string(), "Not signed in");
    }

    #[test]
    fn test_credential_error_field_mapping() {
        assert_eq!(
            CredentialError::WrongCredentials.as_input_errors(),
            Some(InputErrors::single(InputError::new("Password", "wrong", "")))
        );
        assert_eq!(
            CredentialError::AccountDeleted.as_input_errors(),
            Some(InputErrors::single(InputError::new("Name", "deleted", "")))
        );
        assert_eq!(CredentialError::Unauthenticated.as_input_errors(), None);
    }

    #[test]
    fn test_credential_error_is_transparent() {
        let error: InternalError = CredentialError::WrongCredentials.into();
        assert_eq!(error.to_string(), "Wrong name or password");
    }

    #[test]
    fn test_validation_error_display() {
        let mut errors = InputErrors::new();
        errors.push(InputError::new("Name", "gt", "0"));
        errors.push(InputError::new("Password", "wrong", ""));
        let error: InternalError = errors.into();

        assert_eq!(error.to_string(), "Input validation failed: Name=gt(0) Password=wrong");
    }

    #[test]
    fn test_input_error_defaults_to_string_kind() {
        let error = InputError::new("Name", "lte", "30");
        assert_eq!(error.full_name, "Name");
        assert_eq!(error.name, "Name");
        assert_eq!(error.kind, "string");
    }
}
