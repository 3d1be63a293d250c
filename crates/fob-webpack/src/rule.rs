//! Module rules: which files get which loader chain.
//!
//! The consuming bundler applies *every* rule whose matcher accepts a file, in
//! declaration order. Ordering therefore decides how chains are spliced together,
//! never which single rule wins.

use regex::Regex;
use serde::{Serialize, Serializer};
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, Result};
use crate::loader::LoaderStep;

/// Asset families, in rule precedence order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetFamily {
    /// Pre-processing lint pass over scripts
    Lint,
    Script,
    /// Single-file components
    Component,
    /// `index` scripts inside the components directory
    ComponentDirectory,
    /// Markup templates
    Template,
    Stylesheet,
    Stylus,
    Sass,
    Image,
    Font,
}

impl AssetFamily {
    /// Every family, in the order their rules are declared.
    pub const ALL: [AssetFamily; 10] = [
        AssetFamily::Lint,
        AssetFamily::Script,
        AssetFamily::Component,
        AssetFamily::ComponentDirectory,
        AssetFamily::Template,
        AssetFamily::Stylesheet,
        AssetFamily::Stylus,
        AssetFamily::Sass,
        AssetFamily::Image,
        AssetFamily::Font,
    ];

    pub fn is_style(self) -> bool {
        matches!(
            self,
            AssetFamily::Stylesheet | AssetFamily::Stylus | AssetFamily::Sass
        )
    }
}

impl std::fmt::Display for AssetFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            AssetFamily::Lint => "lint",
            AssetFamily::Script => "script",
            AssetFamily::Component => "component",
            AssetFamily::ComponentDirectory => "component-directory",
            AssetFamily::Template => "template",
            AssetFamily::Stylesheet => "stylesheet",
            AssetFamily::Stylus => "stylus",
            AssetFamily::Sass => "sass",
            AssetFamily::Image => "image",
            AssetFamily::Font => "font",
        };
        f.write_str(name)
    }
}

/// Marks a rule as running before (`pre`) or after (`post`) normal rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Enforce {
    Pre,
    Post,
}

/// File-name matcher; serialized as its regex source
#[derive(Debug, Clone)]
pub struct Pattern(Regex);

impl Pattern {
    pub fn new(source: &str) -> Result<Self> {
        Regex::new(source)
            .map(Pattern)
            .map_err(|e| ConfigError::InvalidValue {
                field: "test".to_string(),
                hint: Some(e.to_string()),
            })
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn is_match(&self, path: &Path) -> bool {
        self.0.is_match(&path.to_string_lossy())
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Serialize for Pattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A (matcher, chain, filters) tuple
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rule {
    #[serde(skip)]
    pub family: AssetFamily,

    pub test: Pattern,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub enforce: Option<Enforce>,

    /// Path prefixes the rule is limited to (empty = everywhere)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub include: Vec<PathBuf>,

    /// Path prefixes the rule never applies to
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub exclude: Vec<PathBuf>,

    /// Loader chain in declaration order
    #[serde(rename = "use")]
    pub chain: Vec<LoaderStep>,
}

impl Rule {
    pub fn new(family: AssetFamily, test: &str) -> Result<Self> {
        Ok(Self {
            family,
            test: Pattern::new(test)?,
            enforce: None,
            include: Vec::new(),
            exclude: Vec::new(),
            chain: Vec::new(),
        })
    }

    pub fn enforce(mut self, enforce: Enforce) -> Self {
        self.enforce = Some(enforce);
        self
    }

    pub fn include(mut self, path: impl Into<PathBuf>) -> Self {
        self.include.push(path.into());
        self
    }

    pub fn exclude(mut self, path: impl Into<PathBuf>) -> Self {
        self.exclude.push(path.into());
        self
    }

    pub fn step(mut self, step: impl Into<LoaderStep>) -> Self {
        self.chain.push(step.into());
        self
    }

    pub fn chain(mut self, steps: Vec<LoaderStep>) -> Self {
        self.chain = steps;
        self
    }

    /// Whether the bundler would apply this rule to `path`.
    ///
    /// Like the bundler, include and exclude conditions are plain string prefixes, so
    /// `/app/src` also covers `/app/src-legacy`.
    pub fn applies_to(&self, path: &Path) -> bool {
        if !self.test.is_match(path) {
            return false;
        }
        let path = path.to_string_lossy();
        let covers = |prefix: &PathBuf| path.starts_with(&*prefix.to_string_lossy());
        if !self.include.is_empty() && !self.include.iter().any(covers) {
            return false;
        }
        !self.exclude.iter().any(covers)
    }

    pub fn loaders(&self) -> impl Iterator<Item = &str> {
        self.chain.iter().map(LoaderStep::loader)
    }
}
