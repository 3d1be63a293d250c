//! Error types for descriptor validation, loading and composition.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// `entry` or `output` was absent from the environment descriptor
    #[error("missing required field: {field}")]
    MissingRequiredField { field: &'static str },

    // Descriptor parsing/loading errors
    #[error("descriptor not found")]
    NotFound,

    #[error("unsupported descriptor format: {0}")]
    UnsupportedFormat(String),

    #[error("invalid value for {field}{}", format_hint(.hint))]
    InvalidValue { field: String, hint: Option<String> },

    #[error("invalid profile override: {message}")]
    InvalidProfileOverride { message: String },

    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn format_hint(hint: &Option<String>) -> String {
    hint.as_ref().map(|h| format!(": {h}")).unwrap_or_default()
}

impl ConfigError {
    /// Name of the missing field, if this is a missing-field error.
    pub fn missing_field(&self) -> Option<&'static str> {
        match self {
            ConfigError::MissingRequiredField { field } => Some(*field),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_value_renders_hint() {
        let err = ConfigError::InvalidValue {
            field: "toml".to_string(),
            hint: Some("bad syntax".to_string()),
        };
        assert_eq!(err.to_string(), "invalid value for toml: bad syntax");

        let err = ConfigError::InvalidValue {
            field: "descriptor".to_string(),
            hint: None,
        };
        assert_eq!(err.to_string(), "invalid value for descriptor");
    }

    #[test]
    fn missing_field_accessor() {
        let err = ConfigError::MissingRequiredField { field: "output" };
        assert_eq!(err.missing_field(), Some("output"));
        assert_eq!(err.to_string(), "missing required field: output");
        assert_eq!(ConfigError::NotFound.missing_field(), None);
    }
}
