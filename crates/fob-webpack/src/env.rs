//! The caller-supplied environment descriptor.
//!
//! Everything that varies between builds arrives through [`EnvironmentDescriptor`].
//! `entry`, `output` and `plugins` are opaque to this crate: they are presence-checked
//! and passed through, never inspected.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{ConfigError, Result};

/// Build mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// In-memory style injection, no extraction
    Development,
    /// Styles extracted to files (default)
    #[default]
    Production,
    /// Bundler defaults disabled; treated like production by the style chain
    None,
}

impl Mode {
    pub fn is_development(self) -> bool {
        matches!(self, Mode::Development)
    }
}

impl std::str::FromStr for Mode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "development" => Ok(Mode::Development),
            "production" => Ok(Mode::Production),
            "none" => Ok(Mode::None),
            other => Err(ConfigError::InvalidValue {
                field: "mode".to_string(),
                hint: Some(format!(
                    "unknown mode '{other}', expected development, production or none"
                )),
            }),
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Mode::Development => "development",
            Mode::Production => "production",
            Mode::None => "none",
        };
        f.write_str(name)
    }
}

/// Environment parameters for one configuration synthesis
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentDescriptor {
    /// Build mode; passed through to the output and omitted when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<Mode>,

    /// Bundler entry specification (required, opaque)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry: Option<Value>,

    /// Bundler output specification (required, opaque)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<Value>,

    /// Optimization record; `minimize` is the only key read here
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optimization: Option<Map<String, Value>>,

    /// Caller-owned plugin instances, appended after the fixed plugin
    #[serde(default)]
    pub plugins: Vec<Value>,
}

impl EnvironmentDescriptor {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode: Some(mode),
            ..Self::default()
        }
    }

    /// Create from serde_json::Value
    ///
    /// # Example
    ///
    /// ```
    /// use fob_webpack::{EnvironmentDescriptor, Mode};
    /// use serde_json::json;
    ///
    /// let env = EnvironmentDescriptor::from_value(json!({
    ///     "mode": "development",
    ///     "entry": "./a.js",
    ///     "output": { "path": "/out" }
    /// }))
    /// .unwrap();
    ///
    /// assert_eq!(env.mode, Some(Mode::Development));
    /// assert!(!env.minimize());
    /// ```
    pub fn from_value(value: Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| ConfigError::InvalidValue {
            field: "descriptor".to_string(),
            hint: Some(e.to_string()),
        })
    }

    /// Convert to serde_json::Value
    pub fn to_value(&self) -> Result<Value> {
        serde_json::to_value(self).map_err(|e| ConfigError::InvalidValue {
            field: "descriptor".to_string(),
            hint: Some(e.to_string()),
        })
    }

    pub fn with_entry(mut self, entry: impl Into<Value>) -> Self {
        self.entry = Some(entry.into());
        self
    }

    pub fn with_output(mut self, output: impl Into<Value>) -> Self {
        self.output = Some(output.into());
        self
    }

    pub fn with_optimization(mut self, optimization: Map<String, Value>) -> Self {
        self.optimization = Some(optimization);
        self
    }

    pub fn with_plugin(mut self, plugin: impl Into<Value>) -> Self {
        self.plugins.push(plugin.into());
        self
    }

    /// Whether the build runs in development mode.
    pub fn is_development(&self) -> bool {
        self.mode.is_some_and(Mode::is_development)
    }

    /// The effective minification intent.
    ///
    /// Follows JavaScript truthiness of `optimization.minimize`; an absent record or key
    /// means `false`.
    pub fn minimize(&self) -> bool {
        self.optimization
            .as_ref()
            .and_then(|opt| opt.get("minimize"))
            .is_some_and(is_truthy)
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
