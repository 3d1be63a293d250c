//! Pluggable descriptor validation.
//!
//! Only presence is checked. `optimization` and `plugins` are caller-opaque and are
//! left for the bundler to reject.

use serde_json::Value;

use crate::env::EnvironmentDescriptor;
use crate::error::{ConfigError, Result};

/// Trait for pluggable descriptor validation strategies
pub trait DescriptorValidator {
    fn validate(&self, env: &EnvironmentDescriptor) -> Result<()>;
}

/// Requires `entry` and `output`, in that order
///
/// # Example
///
/// ```
/// use fob_webpack::{DescriptorValidator, EnvironmentDescriptor, Mode, RequiredFieldsValidator};
///
/// let env = EnvironmentDescriptor::new(Mode::Production).with_entry("./a.js");
/// let err = RequiredFieldsValidator.validate(&env).unwrap_err();
/// assert_eq!(err.missing_field(), Some("output"));
/// ```
pub struct RequiredFieldsValidator;

impl DescriptorValidator for RequiredFieldsValidator {
    fn validate(&self, env: &EnvironmentDescriptor) -> Result<()> {
        required("entry", env.entry.as_ref())?;
        required("output", env.output.as_ref())?;
        Ok(())
    }
}

/// The value of a required field; `null` counts as absent.
pub(crate) fn required<'a>(field: &'static str, value: Option<&'a Value>) -> Result<&'a Value> {
    match value {
        Some(v) if !v.is_null() => Ok(v),
        _ => {
            tracing::warn!(field, "environment descriptor is missing a required field");
            Err(ConfigError::MissingRequiredField { field })
        }
    }
}

/// Convenience function for required-field validation
pub fn validate_required(env: &EnvironmentDescriptor) -> Result<()> {
    RequiredFieldsValidator.validate(env)
}
