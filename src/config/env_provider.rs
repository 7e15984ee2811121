use std::collections::HashMap;

/// Trait for providing environment variable access
///
/// This abstraction allows for dependency injection of environment variable
/// sources, enabling clean testing without race conditions from parallel
/// test execution modifying shared global environment state.
pub trait EnvironmentProvider {
    fn get_var(&self, key: &str) -> Option<String>;

    /// True when the variable is set to `1`
    fn is_enabled(&self, key: &str) -> bool {
        self.get_var(key).as_deref() == Some("1")
    }
}

/// Production environment provider that reads from system environment
pub struct SystemEnvironment;

impl EnvironmentProvider for SystemEnvironment {
    fn get_var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// Fixed set of variables, used by tests and embedders that configure the
/// service programmatically
#[derive(Debug, Clone, Default)]
pub struct MapEnvironment {
    vars: HashMap<String, String>,
}

impl MapEnvironment {
    pub fn new(vars: HashMap<String, String>) -> Self {
        Self { vars }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_var(mut self, key: &str, value: &str) -> Self {
        self.vars.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_vars(mut self, vars: &[(&str, &str)]) -> Self {
        for (key, value) in vars {
            self.vars.insert(key.to_string(), value.to_string());
        }
        self
    }
}

impl EnvironmentProvider for MapEnvironment {
    fn get_var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_environment_provider() {
        let provider = SystemEnvironment;

        unsafe {
            std::env::set_var("GATEHOUSE_TEST_VAR_12345", "test_value");
        }

        assert_eq!(provider.get_var("GATEHOUSE_TEST_VAR_12345"), Some("test_value".to_string()));
        assert_eq!(provider.get_var("NON_EXISTENT_VAR_98765"), None);

        unsafe {
            std::env::remove_var("GATEHOUSE_TEST_VAR_12345");
        }
    }

    #[test]
    fn test_map_environment_with_vars() {
        let provider = MapEnvironment::empty()
            .with_vars(&[
                ("DATABASE_URL", "sqlite::memory:"),
                ("PORT", "8080"),
            ]);

        assert_eq!(provider.get_var("DATABASE_URL"), Some("sqlite::memory:".to_string()));
        assert_eq!(provider.get_var("PORT"), Some("8080".to_string()));
        assert_eq!(provider.get_var("HOST"), None);
    }

    #[test]
    fn test_is_enabled_only_accepts_one() {
        let provider = MapEnvironment::empty()
            .with_var("ON", "1")
            .with_var("OFF", "0")
            .with_var("WORD", "true");

        assert!(provider.is_enabled("ON"));
        assert!(!provider.is_enabled("OFF"));
        assert!(!provider.is_enabled("WORD"));
        assert!(!provider.is_enabled("MISSING"));
    }
}
