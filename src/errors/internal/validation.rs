use std::fmt;

/// One failed input rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputError {
    pub full_name: String,
    pub name: String,
    pub kind: String,
    pub rule: String,
    pub param: String,
}

impl InputError {
    /// Error against a top-level string field
    pub fn new(field: &str, rule: &str, param: &str) -> Self {
        Self {
            full_name: field.to_string(),
            name: field.to_string(),
            kind: "string".to_string(),
            rule: rule.to_string(),
            param: param.to_string(),
        }
    }
}

/// Every failed rule of one input, in field order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputErrors(Vec<InputError>);

impl InputErrors {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn single(error: InputError) -> Self {
        Self(vec![error])
    }

    pub fn push(&mut self, error: InputError) {
        self.0.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn errors(&self) -> &[InputError] {
        &self.0
    }

    pub fn into_errors(self) -> Vec<InputError> {
        self.0
    }
}

impl fmt::Display for InputErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Input validation failed:")?;
        for error in &self.0 {
            write!(f, " {}={}", error.full_name, error.rule)?;
            if !error.param.is_empty() {
                write!(f, "({})", error.param)?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for InputErrors {}
