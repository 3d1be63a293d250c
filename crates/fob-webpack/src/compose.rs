//! Configuration composer.
//!
//! Turns an [`EnvironmentDescriptor`] into a complete bundler [`Configuration`]. The
//! rule list always has the same ten rules in the same order; only chain contents
//! vary with the descriptor.
//!
//! Rule order:
//!
//! ```text
//!  1. lint (pre)          .js, excluding node_modules, warnings only
//!  2. script              .js
//!  3. component           .vue
//!  4. component directory index.js under <src>/view/components
//!  5. template            .pug
//!  6. stylesheet          .css   style chain
//!  7. stylus              .styl  style chain + stylus-loader
//!  8. sass                .scss  style chain + sass-loader
//!  9. image               .png   inlined up to 10 000 bytes
//! 10. font                .woff  inlined up to 75 KiB
//! ```
//!
//! Rules are not exclusive. An `index.js` inside the components directory matches
//! rules 1, 2 and 4 and receives all three chains; rule 4 is declared after the
//! generic script rules so its chain is spliced after theirs.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::path::{Path, PathBuf};

use crate::env::{EnvironmentDescriptor, Mode};
use crate::error::{ConfigError, Result};
use crate::layout::{ProjectLayout, path_identifier};
use crate::loader::{LoaderStep, names};
use crate::plugin::{Plugin, plugin_list};
use crate::rule::{AssetFamily, Enforce, Rule};
use crate::style::{StyleChain, build_style_chain_in};
use crate::validation::required;

/// Source-map strategy
pub const DEVTOOL: &str = "#source-map";

/// Images at or under this size are inlined as data URIs
pub const IMAGE_INLINE_LIMIT: u64 = 10_000;

/// Fonts at or under this size are inlined as data URIs
pub const FONT_INLINE_LIMIT: u64 = 75 * 1024;

/// Entrypoint and asset size ceiling
pub const MAX_BUNDLE_SIZE: u64 = 10 * 1024 * 1024;

const RESOLVE_EXTENSIONS: &[&str] = &[".js"];

const SCRIPT_TEST: &str = r"\.js$";
const COMPONENT_TEST: &str = r"\.vue$";
const COMPONENT_INDEX_TEST: &str = r"index\.js$";
const TEMPLATE_TEST: &str = r"\.pug$";
const CSS_TEST: &str = r"\.css$";
const STYLUS_TEST: &str = r"\.styl$";
const SASS_TEST: &str = r"\.scss$";
const IMAGE_TEST: &str = r"\.png$";
const FONT_TEST: &str = r"\.woff$";

/// How lint findings are reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LintPolicy {
    /// Findings are warnings; the build continues (default)
    #[default]
    Warn,
    /// Findings fail the build
    Error,
}

/// Module resolution settings
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolveSettings {
    pub extensions: Vec<String>,
    pub modules: Vec<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModuleSettings {
    pub rules: Vec<Rule>,
}

/// Bundle size budget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceBudget {
    pub max_entrypoint_size: u64,
    pub max_asset_size: u64,
}

impl Default for PerformanceBudget {
    fn default() -> Self {
        Self {
            max_entrypoint_size: MAX_BUNDLE_SIZE,
            max_asset_size: MAX_BUNDLE_SIZE,
        }
    }
}

/// A finished bundler configuration
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Configuration {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<Mode>,
    pub entry: Value,
    pub resolve: ResolveSettings,
    pub output: Value,
    pub module: ModuleSettings,
    pub plugins: Vec<Plugin>,
    pub devtool: String,
    pub optimization: Map<String, Value>,
    pub performance: PerformanceBudget,
}

impl Configuration {
    pub fn rules(&self) -> &[Rule] {
        &self.module.rules
    }

    pub fn rule(&self, family: AssetFamily) -> Option<&Rule> {
        self.module.rules.iter().find(|rule| rule.family == family)
    }

    /// Every rule the bundler would apply to `path`, in declaration order.
    pub fn rules_for(&self, path: impl AsRef<Path>) -> Vec<&Rule> {
        let path = path.as_ref();
        self.module
            .rules
            .iter()
            .filter(|rule| rule.applies_to(path))
            .collect()
    }

    /// Render the engine-facing JSON.
    pub fn to_value(&self) -> Result<Value> {
        serde_json::to_value(self).map_err(|e| ConfigError::InvalidValue {
            field: "configuration".to_string(),
            hint: Some(e.to_string()),
        })
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::InvalidValue {
            field: "configuration".to_string(),
            hint: Some(e.to_string()),
        })
    }
}

/// Builds configurations for one project layout
#[derive(Debug, Clone, Default)]
pub struct Composer {
    layout: ProjectLayout,
    lint: LintPolicy,
}

impl Composer {
    pub fn new(layout: ProjectLayout) -> Self {
        Self {
            layout,
            lint: LintPolicy::default(),
        }
    }

    /// Escalate lint findings; the default only warns.
    pub fn with_lint_policy(mut self, lint: LintPolicy) -> Self {
        self.lint = lint;
        self
    }

    pub fn layout(&self) -> &ProjectLayout {
        &self.layout
    }

    pub fn lint_policy(&self) -> LintPolicy {
        self.lint
    }

    /// Compose a configuration from `env`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingRequiredField` if `entry` or `output` is absent.
    /// Nothing is built in that case.
    ///
    /// # Example
    ///
    /// ```
    /// use fob_webpack::{Composer, EnvironmentDescriptor, Mode, ProjectLayout};
    /// use serde_json::json;
    ///
    /// let env = EnvironmentDescriptor::new(Mode::Development)
    ///     .with_entry("./a.js")
    ///     .with_output(json!({ "path": "/out" }));
    ///
    /// let config = Composer::new(ProjectLayout::new("/app")).compose(&env).unwrap();
    /// assert_eq!(config.rules().len(), 10);
    /// assert_eq!(config.optimization["noEmitOnErrors"], json!(true));
    /// ```
    pub fn compose(&self, env: &EnvironmentDescriptor) -> Result<Configuration> {
        let entry = required("entry", env.entry.as_ref())?.clone();
        let output = required("output", env.output.as_ref())?.clone();

        let mode = env.mode.unwrap_or_default();
        let minimize = env.minimize();
        tracing::debug!(
            %mode,
            minimize,
            plugins = env.plugins.len(),
            "composing bundler configuration"
        );

        let layout = self.layout.absolutize()?;
        let style = build_style_chain_in(&layout, mode, minimize);
        let rules = self.rules(&layout, &style)?;
        tracing::debug!(rules = rules.len(), "configuration composed");

        Ok(Configuration {
            mode: env.mode,
            entry,
            resolve: ResolveSettings {
                extensions: RESOLVE_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
                modules: layout.resolve_modules(),
            },
            output,
            module: ModuleSettings { rules },
            plugins: plugin_list(&env.plugins),
            devtool: DEVTOOL.to_string(),
            optimization: merge_optimization(env.optimization.as_ref()),
            performance: PerformanceBudget::default(),
        })
    }

    fn rules(&self, layout: &ProjectLayout, style: &StyleChain) -> Result<Vec<Rule>> {
        Ok(vec![
            Rule::new(AssetFamily::Lint, SCRIPT_TEST)?
                .enforce(Enforce::Pre)
                .exclude(layout.node_modules())
                .step(self.lint_step()),
            Rule::new(AssetFamily::Script, SCRIPT_TEST)?.step(names::BABEL_LOADER),
            Rule::new(AssetFamily::Component, COMPONENT_TEST)?.step(names::VUE_LOADER),
            Rule::new(AssetFamily::ComponentDirectory, COMPONENT_INDEX_TEST)?
                .include(layout.components())
                .step(names::VUE_LOADER)
                .step(LoaderStep::named(path_identifier(&layout.vuize_loader())))
                .step(names::BABEL_LOADER),
            Rule::new(AssetFamily::Template, TEMPLATE_TEST)?.step(names::PUG_LOADER),
            Rule::new(AssetFamily::Stylesheet, CSS_TEST)?.chain(style.to_vec()),
            Rule::new(AssetFamily::Stylus, STYLUS_TEST)?
                .chain(style.with_trailing(names::STYLUS_LOADER)),
            Rule::new(AssetFamily::Sass, SASS_TEST)?.chain(style.with_trailing(names::SASS_LOADER)),
            Rule::new(AssetFamily::Image, IMAGE_TEST)?.step(LoaderStep::url(IMAGE_INLINE_LIMIT)),
            Rule::new(AssetFamily::Font, FONT_TEST)?.step(LoaderStep::url(FONT_INLINE_LIMIT)),
        ])
    }

    fn lint_step(&self) -> LoaderStep {
        let options = match self.lint {
            LintPolicy::Warn => json!({
                "formatter": names::LINT_FORMATTER,
                "emitWarning": true,
            }),
            LintPolicy::Error => json!({
                "formatter": names::LINT_FORMATTER,
                "emitError": true,
            }),
        };
        LoaderStep::configured(names::ESLINT_LOADER, options)
    }
}

/// Compose with the default layout, rooted at the current directory, and lint policy.
///
/// # Example
///
/// ```
/// use fob_webpack::{EnvironmentDescriptor, Mode, compose};
/// use serde_json::json;
///
/// let env = EnvironmentDescriptor::new(Mode::Production)
///     .with_entry("./a.js")
///     .with_output(json!({ "path": "/out" }))
///     .with_plugin("P");
///
/// let config = compose(&env).unwrap();
/// assert_eq!(config.plugins.len(), 2);
/// ```
pub fn compose(env: &EnvironmentDescriptor) -> Result<Configuration> {
    Composer::default().compose(env)
}

/// `{ noEmitOnErrors: true }` shallowly overridden by the caller's record.
fn merge_optimization(overrides: Option<&Map<String, Value>>) -> Map<String, Value> {
    let mut merged = Map::new();
    merged.insert("noEmitOnErrors".to_string(), Value::Bool(true));
    if let Some(overrides) = overrides {
        for (key, value) in overrides {
            merged.insert(key.clone(), value.clone());
        }
    }
    merged
}
