//! Loader steps and the identifiers of the transformers this crate schedules.
//!
//! A chain is a `Vec<LoaderStep>` written in the bundler's declaration order: the
//! bundler runs the last step first and hands its output to the step before it.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Well-known loader identifiers
pub mod names {
    pub const VUE_STYLE_LOADER: &str = "vue-style-loader";
    pub const CSS_EXTRACT_LOADER: &str = "mini-css-extract-plugin/dist/loader";
    pub const CSS_LOADER: &str = "css-loader";
    pub const POSTCSS_LOADER: &str = "postcss-loader";
    pub const STYLUS_LOADER: &str = "stylus-loader";
    pub const SASS_LOADER: &str = "sass-loader";
    pub const ESLINT_LOADER: &str = "eslint-loader";
    pub const BABEL_LOADER: &str = "babel-loader";
    pub const VUE_LOADER: &str = "vue-loader";
    pub const PUG_LOADER: &str = "pug-plain-loader";
    pub const URL_LOADER: &str = "url-loader";

    pub const LINT_FORMATTER: &str = "eslint-friendly-formatter";
}

/// One transformer in a chain: a bare identifier or an identifier with options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LoaderStep {
    Named(String),
    Configured { loader: String, options: Value },
}

impl LoaderStep {
    pub fn named(loader: impl Into<String>) -> Self {
        LoaderStep::Named(loader.into())
    }

    pub fn configured(loader: impl Into<String>, options: Value) -> Self {
        LoaderStep::Configured {
            loader: loader.into(),
            options,
        }
    }

    /// `url-loader` with an inlining threshold in bytes.
    ///
    /// Assets at or under `limit` become data URIs, larger ones are emitted as files.
    pub fn url(limit: u64) -> Self {
        Self::configured(names::URL_LOADER, json!({ "limit": limit }))
    }

    pub fn loader(&self) -> &str {
        match self {
            LoaderStep::Named(loader) => loader,
            LoaderStep::Configured { loader, .. } => loader,
        }
    }

    pub fn options(&self) -> Option<&Value> {
        match self {
            LoaderStep::Named(_) => None,
            LoaderStep::Configured { options, .. } => Some(options),
        }
    }
}

impl From<&str> for LoaderStep {
    fn from(loader: &str) -> Self {
        LoaderStep::named(loader)
    }
}

/// A plugin handed to `postcss-loader`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostCssPlugin {
    pub name: String,

    /// Positional arguments for the plugin factory
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<Value>,
}

impl PostCssPlugin {
    pub const DISCARD_FONT_FACE: &'static str = "postcss-discard-font-face";
    pub const AUTOPREFIXER: &'static str = "autoprefixer";
    pub const CSSNANO: &'static str = "cssnano";

    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
        }
    }

    pub fn with_arg(mut self, arg: Value) -> Self {
        self.args.push(arg);
        self
    }

    /// Drops `@font-face` rules whose sources are not in `keep` (e.g. `["woff"]`).
    pub fn discard_font_face(keep: &[&str]) -> Self {
        Self::new(Self::DISCARD_FONT_FACE).with_arg(json!(keep))
    }

    pub fn autoprefixer() -> Self {
        Self::new(Self::AUTOPREFIXER)
    }

    pub fn cssnano() -> Self {
        Self::new(Self::CSSNANO)
    }
}

/// `postcss-loader` configured with the given plugin list, in order.
pub fn postcss(plugins: &[PostCssPlugin]) -> LoaderStep {
    LoaderStep::configured(names::POSTCSS_LOADER, json!({ "plugins": plugins }))
}

/// Names of the plugins configured on a `postcss-loader` step, in order.
pub fn postcss_plugin_names(step: &LoaderStep) -> Vec<&str> {
    step.options()
        .and_then(|o| o.get("plugins"))
        .and_then(Value::as_array)
        .map(|plugins| {
            plugins
                .iter()
                .filter_map(|p| p.get("name").and_then(Value::as_str))
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_step_serializes_as_string() {
        let step = LoaderStep::named("css-loader");
        assert_eq!(serde_json::to_value(&step).unwrap(), json!("css-loader"));
    }

    #[test]
    fn configured_step_serializes_as_record() {
        let step = LoaderStep::url(10_000);
        assert_eq!(
            serde_json::to_value(&step).unwrap(),
            json!({ "loader": "url-loader", "options": { "limit": 10000 } })
        );
    }

    #[test]
    fn steps_deserialize_from_either_shape() {
        let steps: Vec<LoaderStep> =
            serde_json::from_value(json!(["babel-loader", { "loader": "x", "options": {} }]))
                .unwrap();
        assert_eq!(steps[0], LoaderStep::named("babel-loader"));
        assert_eq!(steps[1].loader(), "x");
        assert_eq!(steps[1].options(), Some(&json!({})));
    }

    #[test]
    fn postcss_keeps_plugin_order() {
        let step = postcss(&[
            PostCssPlugin::discard_font_face(&["woff"]),
            PostCssPlugin::autoprefixer(),
        ]);

        assert_eq!(step.loader(), names::POSTCSS_LOADER);
        assert_eq!(
            postcss_plugin_names(&step),
            vec!["postcss-discard-font-face", "autoprefixer"]
        );
        assert_eq!(
            step.options().unwrap()["plugins"][0],
            json!({ "name": "postcss-discard-font-face", "args": [["woff"]] })
        );
        assert_eq!(
            step.options().unwrap()["plugins"][1],
            json!({ "name": "autoprefixer" })
        );
    }

    #[test]
    fn plugin_names_of_plain_step_are_empty() {
        assert!(postcss_plugin_names(&LoaderStep::named("css-loader")).is_empty());
    }
}
