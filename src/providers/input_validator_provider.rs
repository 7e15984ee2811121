use std::collections::HashMap;
use std::sync::Arc;

use crate::errors::InternalError;
use crate::errors::internal::{InputError, InputErrors};

/// Rule check: `(value, param) -> passes`
pub type RuleFn = Arc<dyn Fn(&str, &str) -> Result<bool, InternalError> + Send + Sync>;

/// One field to validate with its ordered `(rule, param)` list
pub struct FieldInput<'a> {
    pub field: &'static str,
    pub value: &'a str,
    pub rules: &'a [(&'static str, &'static str)],
}

impl<'a> FieldInput<'a> {
    pub fn new(field: &'static str, value: &'a str, rules: &'a [(&'static str, &'static str)]) -> Self {
        Self { field, value, rules }
    }
}

/// Validates request fields against named rules
///
/// Rules are registered on the instance with [`InputValidator::with_rule`]
/// rather than in a process-wide registry. The running service only uses the
/// length rules from [`InputValidator::standard`]. Each field reports at most
/// one violation: the first rule it fails.
#[derive(Clone)]
pub struct InputValidator {
    rules: HashMap<&'static str, RuleFn>,
}

impl InputValidator {
    /// Validator without any rules
    pub fn empty() -> Self {
        Self { rules: HashMap::new() }
    }

    /// Validator with the length rules `gt`, `gte` and `lte`
    ///
    /// Lengths are counted in characters.
    pub fn standard() -> Self {
        Self::empty()
            .with_rule("gt", |value, param| Ok(char_len(value) > parse_param(param)?))
            .with_rule("gte", |value, param| Ok(char_len(value) >= parse_param(param)?))
            .with_rule("lte", |value, param| Ok(char_len(value) <= parse_param(param)?))
    }

    /// Register (or replace) a named rule
    pub fn with_rule<F>(mut self, name: &'static str, check: F) -> Self
    where
        F: Fn(&str, &str) -> Result<bool, InternalError> + Send + Sync + 'static,
    {
        self.rules.insert(name, Arc::new(check));
        self
    }

    /// Check every field, collecting one error per failing field
    ///
    /// Returns `InternalError::Validation` when any field fails. Referencing a
    /// rule that was never registered is a programming error and surfaces as a
    /// parse error.
    pub fn validate(&self, fields: &[FieldInput<'_>]) -> Result<(), InternalError> {
        let mut errors = InputErrors::new();

        for input in fields {
            for &(rule, param) in input.rules {
                let check = self
                    .rules
                    .get(rule)
                    .ok_or_else(|| InternalError::parse("validation_rule", format!("unknown rule '{}'", rule)))?;

                if !check(input.value, param)? {
                    errors.push(InputError::new(input.field, rule, param));
                    break;
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(InternalError::Validation(errors))
        }
    }
}

impl Default for InputValidator {
    fn default() -> Self {
        Self::standard()
    }
}

fn char_len(value: &str) -> usize {
    value.chars().count()
}

fn parse_param(param: &str) -> Result<usize, InternalError> {
    param
        .parse::<usize>()
        .map_err(|e| InternalError::parse("rule_param", format!("'{}': {}", param, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const NAME_RULES: &[(&str, &str)] = &[("gt", "0"), ("lte", "30")];
    const PASSWORD_RULES: &[(&str, &str)] = &[("gte", "6"), ("lte", "72")];

    fn validation_errors(result: Result<(), InternalError>) -> Vec<InputError> {
        match result {
            Err(InternalError::Validation(errors)) => errors.into_errors(),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_valid_input_passes() {
        let validator = InputValidator::standard();
        let result = validator.validate(&[
            FieldInput::new("Name", "admin", NAME_RULES),
            FieldInput::new("Password", "secret1", PASSWORD_RULES),
        ]);
        assert!(result.is_ok());
    }

    #[test]
    fn test_empty_input_reports_every_field() {
        let validator = InputValidator::standard();
        let errors = validation_errors(validator.validate(&[
            FieldInput::new("Name", "", NAME_RULES),
            FieldInput::new("Password", "", PASSWORD_RULES),
        ]));

        assert_eq!(errors, vec![
            InputError::new("Name", "gt", "0"),
            InputError::new("Password", "gte", "6"),
        ]);
    }

    #[test]
    fn test_only_first_failing_rule_is_reported() {
        let validator = InputValidator::standard()
            .with_rule("never", |_, _| Ok(false));
        let rules: &[(&str, &str)] = &[("never", ""), ("gt", "100")];

        let errors = validation_errors(validator.validate(&[FieldInput::new("Name", "x", rules)]));
        assert_eq!(errors, vec![InputError::new("Name", "never", "")]);
    }

    #[test]
    fn test_length_boundaries() {
        let validator = InputValidator::standard();
        let thirty = "a".repeat(30);
        let thirty_one = "a".repeat(31);
        let seventy_two = "p".repeat(72);
        let seventy_three = "p".repeat(73);

        assert!(validator.validate(&[FieldInput::new("Name", &thirty, NAME_RULES)]).is_ok());
        assert!(validator.validate(&[FieldInput::new("Password", "123456", PASSWORD_RULES)]).is_ok());
        assert!(validator.validate(&[FieldInput::new("Password", &seventy_two, PASSWORD_RULES)]).is_ok());

        assert_eq!(
            validation_errors(validator.validate(&[FieldInput::new("Name", &thirty_one, NAME_RULES)])),
            vec![InputError::new("Name", "lte", "30")]
        );
        assert_eq!(
            validation_errors(validator.validate(&[FieldInput::new("Password", "12345", PASSWORD_RULES)])),
            vec![InputError::new("Password", "gte", "6")]
        );
        assert_eq!(
            validation_errors(validator.validate(&[FieldInput::new("Password", &seventy_three, PASSWORD_RULES)])),
            vec![InputError::new("Password", "lte", "72")]
        );
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        let validator = InputValidator::standard();
        let name = "é".repeat(30);
        assert!(validator.validate(&[FieldInput::new("Name", &name, NAME_RULES)]).is_ok());
    }

    #[test]
    fn test_injected_rule_sees_value_and_param() {
        let taken = vec!["admin".to_string()];
        let validator = InputValidator::standard()
            .with_rule("unique", move |value, _| Ok(!taken.iter().any(|t| t.eq_ignore_ascii_case(value))));
        let rules: &[(&str, &str)] = &[("gt", "0"), ("unique", "")];

        assert!(validator.validate(&[FieldInput::new("Name", "other", rules)]).is_ok());
        assert_eq!(
            validation_errors(validator.validate(&[FieldInput::new("Name", "ADMIN", rules)])),
            vec![InputError::new("Name", "unique", "")]
        );
    }

    #[test]
    fn test_unknown_rule_is_parse_error() {
        let validator = InputValidator::empty();
        let rules: &[(&str, &str)] = &[("gt", "0")];
        let result = validator.validate(&[FieldInput::new("Name", "admin", rules)]);
        assert!(matches!(result, Err(InternalError::Parse { .. })));
    }

    #[test]
    fn test_bad_param_is_parse_error() {
        let validator = InputValidator::standard();
        let rules: &[(&str, &str)] = &[("gt", "zero")];
        let result = validator.validate(&[FieldInput::new("Name", "admin", rules)]);
        assert!(matches!(result, Err(InternalError::Parse { .. })));
    }
}
