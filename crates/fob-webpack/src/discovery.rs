//! File-based descriptor discovery
//!
//! Finds a descriptor file in a project directory, applies a named profile and hands
//! back something ready to compose. Library callers that already hold the values
//! should build an `EnvironmentDescriptor` directly.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use path_clean::PathClean;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::compose::{Composer, Configuration, LintPolicy};
use crate::env::EnvironmentDescriptor;
use crate::error::{ConfigError, Result};
use crate::layout::ProjectLayout;

const TOML_FILE: &str = "fob-webpack.toml";
const JSON_FILE: &str = "fob-webpack.json";
const PACKAGE_JSON: &str = "package.json";
const PACKAGE_FIELD: &str = "fobWebpack";

/// Contents of a descriptor file
///
/// ```toml
/// mode = "development"
/// entry = "./src/main.js"
///
/// [output]
/// path = "/srv/app/dist"
///
/// [layout]
/// root = "/srv/app"
///
/// [profiles.production]
/// mode = "production"
/// lint = "error"
///
/// [profiles.production.optimization]
/// minimize = true
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DescriptorFile {
    #[serde(flatten)]
    pub env: EnvironmentDescriptor,

    #[serde(default)]
    pub layout: ProjectLayout,

    #[serde(default)]
    pub lint: LintPolicy,

    /// Named overrides, deep-merged over the base when selected
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub profiles: HashMap<String, Value>,
}

impl DescriptorFile {
    pub fn from_value(value: Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| ConfigError::InvalidValue {
            field: "descriptor".to_string(),
            hint: Some(e.to_string()),
        })
    }

    /// Apply the named profile's overrides. Unknown profiles leave the file unchanged.
    pub fn materialize_profile(mut self, profile: Option<&str>) -> Result<Self> {
        let Some(name) = profile else {
            return Ok(self);
        };
        let Some(overrides) = self.profiles.get(name).cloned() else {
            tracing::debug!(profile = name, "profile not defined, using base descriptor");
            return Ok(self);
        };
        if overrides.is_null() {
            return Ok(self);
        }

        let profiles = std::mem::take(&mut self.profiles);
        let mut base =
            serde_json::to_value(&self).map_err(|err| ConfigError::InvalidProfileOverride {
                message: err.to_string(),
            })?;
        merge_values(&mut base, &overrides);

        let mut merged: DescriptorFile =
            serde_json::from_value(base).map_err(|err| ConfigError::InvalidProfileOverride {
                message: err.to_string(),
            })?;
        merged.profiles = profiles;
        tracing::debug!(profile = name, "applied descriptor profile");
        Ok(merged)
    }

    pub fn composer(&self) -> Composer {
        Composer::new(self.layout.clone()).with_lint_policy(self.lint)
    }

    pub fn compose(&self) -> Result<Configuration> {
        self.composer().compose(&self.env)
    }
}

fn merge_values(target: &mut Value, update: &Value) {
    match (target, update) {
        (Value::Object(target_map), Value::Object(update_map)) => {
            for (key, value) in update_map {
                merge_values(target_map.entry(key.clone()).or_insert(Value::Null), value);
            }
        }
        (target_slot, _) => {
            *target_slot = update.clone();
        }
    }
}

/// File-based descriptor discovery
///
/// # Example
///
/// ```no_run
/// use fob_webpack::DescriptorDiscovery;
///
/// let file = DescriptorDiscovery::new(".").load_with_profile("production").unwrap();
/// let config = file.compose().unwrap();
/// ```
pub struct DescriptorDiscovery {
    root: PathBuf,
}

impl DescriptorDiscovery {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Find a descriptor file in the root directory
    ///
    /// Searches in this order:
    /// 1. fob-webpack.toml
    /// 2. fob-webpack.json
    /// 3. package.json (fobWebpack field)
    pub fn find(&self) -> Option<PathBuf> {
        for name in [TOML_FILE, JSON_FILE] {
            let path = self.root.join(name);
            if path.exists() {
                return Some(path);
            }
        }

        let pkg_path = self.root.join(PACKAGE_JSON);
        if pkg_path.exists() {
            if let Ok(content) = fs::read_to_string(&pkg_path) {
                if let Ok(parsed) = serde_json::from_str::<Value>(&content) {
                    if parsed.get(PACKAGE_FIELD).is_some_and(|v| !v.is_null()) {
                        return Some(pkg_path);
                    }
                }
            }
        }

        None
    }

    /// Load the discovered descriptor file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` if no descriptor file is found.
    pub fn load(&self) -> Result<DescriptorFile> {
        let path = self.find().ok_or(ConfigError::NotFound)?;
        tracing::debug!(path = %path.display(), "found descriptor file");
        load_file(&path)
    }

    /// Load the discovered descriptor file with a profile applied
    pub fn load_with_profile(&self, profile: &str) -> Result<DescriptorFile> {
        self.load()?.materialize_profile(Some(profile))
    }
}

/// Load a descriptor file by extension (`.toml`, `.json`, or a `package.json`)
///
/// A relative `layout.root` is resolved against the file's directory.
pub fn load_file(path: &Path) -> Result<DescriptorFile> {
    let mut file = read_descriptor(path)?;
    if !file.layout.is_absolute() {
        if let Some(dir) = path.parent() {
            file.layout.root = dir.join(&file.layout.root).clean();
        }
    }
    Ok(file)
}

fn read_descriptor(path: &Path) -> Result<DescriptorFile> {
    if path.file_name() == Some(std::ffi::OsStr::new(PACKAGE_JSON)) {
        return load_from_package_json(path);
    }

    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default();

    let value = match extension {
        "toml" => {
            let content = fs::read_to_string(path)?;
            let toml_val: toml::Value =
                toml::from_str(&content).map_err(|e| ConfigError::InvalidValue {
                    field: "toml".to_string(),
                    hint: Some(format!("Invalid TOML syntax: {}", e)),
                })?;
            serde_json::to_value(toml_val).map_err(|e| ConfigError::InvalidValue {
                field: "toml".to_string(),
                hint: Some(format!("TOML to JSON conversion failed: {}", e)),
            })?
        }
        "json" => {
            let content = fs::read_to_string(path)?;
            serde_json::from_str(&content).map_err(|e| ConfigError::InvalidValue {
                field: "json".to_string(),
                hint: Some(format!("Invalid JSON: {}", e)),
            })?
        }
        other => return Err(ConfigError::UnsupportedFormat(other.to_string())),
    };

    DescriptorFile::from_value(value)
}

fn load_from_package_json(path: &Path) -> Result<DescriptorFile> {
    let content = fs::read_to_string(path)?;

    let parsed: Value = serde_json::from_str(&content).map_err(|e| ConfigError::InvalidValue {
        field: PACKAGE_JSON.to_string(),
        hint: Some(format!("Invalid JSON: {}", e)),
    })?;

    let value = parsed
        .get(PACKAGE_FIELD)
        .filter(|v| !v.is_null())
        .ok_or_else(|| ConfigError::InvalidValue {
            field: PACKAGE_FIELD.to_string(),
            hint: Some("Add a 'fobWebpack' field to your package.json".to_string()),
        })?;

    DescriptorFile::from_value(value.clone())
}

/// Discover and load a descriptor under `root` (convenience function)
pub fn discover(root: impl AsRef<Path>) -> Result<DescriptorFile> {
    DescriptorDiscovery::new(root).load()
}

/// Discover and load a descriptor under `root` with a profile (convenience function)
pub fn discover_with_profile(root: impl AsRef<Path>, profile: &str) -> Result<DescriptorFile> {
    DescriptorDiscovery::new(root).load_with_profile(profile)
}
