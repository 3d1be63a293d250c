//! Style-chain builder.
//!
//! Every style-like asset family (`.css`, `.styl`, `.scss`) shares one loader chain:
//!
//! ```text
//! [inject | extract] → css-loader → postcss-loader(font-face, autoprefixer[, cssnano]) → master-class
//! ```
//!
//! Families extend the chain with their own preprocessor via [`StyleChain::with_trailing`],
//! which copies the shared prefix rather than mutating it.

use serde::Serialize;

use crate::env::Mode;
use crate::layout::{ProjectLayout, path_identifier};
use crate::loader::{LoaderStep, PostCssPlugin, names, postcss};

/// Font formats whose `@font-face` rules survive post-processing
const KEPT_FONT_FORMATS: &[&str] = &["woff"];

/// The shared loader chain for style assets
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct StyleChain {
    steps: Vec<LoaderStep>,
}

impl StyleChain {
    pub fn steps(&self) -> &[LoaderStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// The chain as-is, for families without a preprocessor.
    pub fn to_vec(&self) -> Vec<LoaderStep> {
        self.steps.clone()
    }

    /// The chain followed by a family-specific preprocessor.
    ///
    /// The preprocessor sits last, so the bundler runs it first.
    pub fn with_trailing(&self, step: impl Into<LoaderStep>) -> Vec<LoaderStep> {
        let mut steps = Vec::with_capacity(self.steps.len() + 1);
        steps.extend_from_slice(&self.steps);
        steps.push(step.into());
        steps
    }

    /// The `postcss-loader` step.
    pub fn postcss_step(&self) -> Option<&LoaderStep> {
        self.steps
            .iter()
            .find(|step| step.loader() == names::POSTCSS_LOADER)
    }
}

/// Build the style chain for the default layout rooted at the current directory.
///
/// # Example
///
/// ```
/// use fob_webpack::{Mode, build_style_chain, loader::names};
///
/// let chain = build_style_chain(Mode::Development, false);
/// assert_eq!(chain.len(), 4);
/// assert_eq!(chain.steps()[0].loader(), names::VUE_STYLE_LOADER);
/// ```
pub fn build_style_chain(mode: Mode, minimize: bool) -> StyleChain {
    let layout = ProjectLayout::default();
    let layout = layout.absolutize().unwrap_or_else(|err| {
        tracing::warn!(%err, "cannot anchor project loaders, using relative paths");
        layout
    });
    build_style_chain_in(&layout, mode, minimize)
}

/// Build the style chain with project loaders resolved against `layout`.
pub fn build_style_chain_in(layout: &ProjectLayout, mode: Mode, minimize: bool) -> StyleChain {
    let first = if mode.is_development() {
        names::VUE_STYLE_LOADER
    } else {
        names::CSS_EXTRACT_LOADER
    };

    let mut plugins = vec![
        PostCssPlugin::discard_font_face(KEPT_FONT_FORMATS),
        PostCssPlugin::autoprefixer(),
    ];
    if minimize {
        plugins.push(PostCssPlugin::cssnano());
    }

    let steps = vec![
        LoaderStep::named(first),
        LoaderStep::named(names::CSS_LOADER),
        postcss(&plugins),
        LoaderStep::named(path_identifier(&layout.css_master_class_loader())),
    ];

    tracing::trace!(?mode, minimize, ?steps, "built style chain");

    StyleChain { steps }
}
