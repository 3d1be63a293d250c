//! The configuration's plugin list.
//!
//! The template-compiler plugin always comes first; caller plugins follow verbatim.

use serde::{Serialize, Serializer};
use serde_json::Value;

/// Identifier of the template-compiler enablement plugin
pub const VUE_LOADER_PLUGIN: &str = "vue-loader/lib/plugin";

/// An entry in the configuration's plugin list
#[derive(Debug, Clone, PartialEq)]
pub enum Plugin {
    /// Enables the single-file-component rules; always first
    VueLoader,
    /// Caller-owned plugin instance, passed through verbatim
    External(Value),
}

impl Plugin {
    pub fn is_builtin(&self) -> bool {
        matches!(self, Plugin::VueLoader)
    }

    pub fn to_value(&self) -> Value {
        match self {
            Plugin::VueLoader => Value::String(VUE_LOADER_PLUGIN.to_string()),
            Plugin::External(value) => value.clone(),
        }
    }
}

impl Serialize for Plugin {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Plugin::VueLoader => serializer.serialize_str(VUE_LOADER_PLUGIN),
            Plugin::External(value) => value.serialize(serializer),
        }
    }
}

/// The fixed infrastructure plugin followed by the caller's plugins, order preserved.
pub fn plugin_list(external: &[Value]) -> Vec<Plugin> {
    std::iter::once(Plugin::VueLoader)
        .chain(external.iter().cloned().map(Plugin::External))
        .collect()
}
