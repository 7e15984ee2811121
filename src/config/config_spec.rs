use std::net::IpAddr;
use std::sync::Arc;

use crate::config::EnvironmentProvider;
use crate::config::errors::ApplicationError;

/// Where a loaded value came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigValueSource {
    EnvironmentVariable { name: String },
    Default,
}

#[derive(Debug, Clone)]
pub struct ConfigValue {
    pub value: String,
    pub source: ConfigValueSource,
}

/// Configuration specification with environment override → default priority
pub struct ConfigSpec {
    env_provider: Arc<dyn EnvironmentProvider + Send + Sync>,
    env_override: Option<String>,
    default_value: Option<String>,
    min_length: Option<usize>,
    validator: Option<fn(&str) -> Result<(), String>>,
}

impl ConfigSpec {
    pub fn new(env_provider: Arc<dyn EnvironmentProvider + Send + Sync>) -> Self {
        Self {
            env_provider,
            env_override: None,
            default_value: None,
            min_length: None,
            validator: None,
        }
    }

    pub fn env_override(mut self, name: &str) -> Self {
        self.env_override = Some(name.to_string());
        self
    }

    pub fn default_value(mut self, value: &str) -> Self {
        self.default_value = Some(value.to_string());
        self
    }

    pub fn min_length(mut self, length: usize) -> Self {
        self.min_length = Some(length);
        self
    }

    pub fn validator(mut self, f: fn(&str) -> Result<(), String>) -> Self {
        self.validator = Some(f);
        self
    }

    /// Load the value, recording whether it came from the environment or the default
    pub fn load_setting_with_source(&self) -> Result<ConfigValue, ApplicationError> {
        let setting_name = self.setting_name();

        if let Some(env_var) = &self.env_override {
            if let Some(value) = self.env_provider.get_var(env_var) {
                self.validate_value(&value, &setting_name)?;
                return Ok(ConfigValue {
                    value,
                    source: ConfigValueSource::EnvironmentVariable { name: env_var.clone() },
                });
            }
        }

        match &self.default_value {
            Some(value) => {
                self.validate_value(value, &setting_name)?;
                Ok(ConfigValue {
                    value: value.clone(),
                    source: ConfigValueSource::Default,
                })
            }
            None => Err(ApplicationError::MissingSetting { setting_name }),
        }
    }

    fn setting_name(&self) -> String {
        self.env_override.clone().unwrap_or_else(|| "<unnamed>".to_string())
    }

    fn validate_value(&self, value: &str, setting_name: &str) -> Result<(), ApplicationError> {
        if let Some(min) = self.min_length {
            if value.len() < min {
                return Err(ApplicationError::invalid(
                    setting_name,
                    format!("must be at least {} characters long", min),
                ));
            }
        }

        if let Some(validator) = self.validator {
            validator(value).map_err(|reason| ApplicationError::invalid(setting_name, reason))?;
        }

        Ok(())
    }

    /// Accepts IP addresses and `localhost`
    pub fn validate_host_address(value: &str) -> Result<(), String> {
        if value.is_empty() {
            return Err("host address cannot be empty".to_string());
        }
        if value == "localhost" || value.parse::<IpAddr>().is_ok() {
            Ok(())
        } else {
            Err(format!("'{}' is not a valid IP address", value))
        }
    }

    pub fn validate_port_range(value: &str, min: u16, max: u16) -> Result<(), String> {
        let port: u32 = value
            .parse()
            .map_err(|_| format!("'{}' is not a valid port number", value))?;
        if port < min as u32 || port > max as u32 {
            return Err(format!("port must be between {} and {}", min, max));
        }
        Ok(())
    }

    pub fn parse_port(value: &str, setting_name: &str) -> Result<u16, ApplicationError> {
        value.parse::<u16>().map_err(|e| ApplicationError::ParseError {
            setting_name: setting_name.to_string(),
            error: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MapEnvironment;

    fn env(vars: &[(&str, &str)]) -> Arc<MapEnvironment> {
        Arc::new(MapEnvironment::empty().with_vars(vars))
    }

    #[test]
    fn test_environment_overrides_default() {
        let value = ConfigSpec::new(env(&[("HOST", "127.0.0.1")]))
            .env_override("HOST")
            .default_value("0.0.0.0")
            .load_setting_with_source()
            .unwrap();

        assert_eq!(value.value, "127.0.0.1");
        assert_eq!(value.source, ConfigValueSource::EnvironmentVariable { name: "HOST".to_string() });
    }

    #[test]
    fn test_default_used_when_unset() {
        let value = ConfigSpec::new(env(&[]))
            .env_override("HOST")
            .default_value("0.0.0.0")
            .load_setting_with_source()
            .unwrap();

        assert_eq!(value.value, "0.0.0.0");
        assert_eq!(value.source, ConfigValueSource::Default);
    }

    #[test]
    fn test_missing_without_default_fails() {
        let result = ConfigSpec::new(env(&[]))
            .env_override("DATABASE_URL")
            .load_setting_with_source();

        match result {
            Err(ApplicationError::MissingSetting { setting_name }) => assert_eq!(setting_name, "DATABASE_URL"),
            other => panic!("Expected MissingSetting, got: {:?}", other),
        }
    }

    #[test]
    fn test_validator_rejects_value() {
        let result = ConfigSpec::new(env(&[("HOST", "not-a-host")]))
            .env_override("HOST")
            .validator(ConfigSpec::validate_host_address)
            .load_setting_with_source();

        assert!(matches!(result, Err(ApplicationError::InvalidSetting { .. })));
    }

    #[test]
    fn test_port_range_validation() {
        assert!(ConfigSpec::validate_port_range("3000", 1, 65535).is_ok());
        assert!(ConfigSpec::validate_port_range("0", 1, 65535).is_err());
        assert!(ConfigSpec::validate_port_range("70000", 1, 65535).is_err());
        assert!(ConfigSpec::validate_port_range("abc", 1, 65535).is_err());
    }
}
