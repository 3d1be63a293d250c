//! Webpack configuration synthesis.
//!
//! Given an [`EnvironmentDescriptor`] (mode, entry, output, optimization, plugins),
//! [`compose`] decides which loaders run, in what order, for which files, and returns
//! a complete [`Configuration`]. Nothing is built, watched or cached here.

pub mod compose;
pub mod discovery;
pub mod env;
pub mod error;
pub mod layout;
pub mod loader;
pub mod plugin;
pub mod rule;
pub mod style;
pub mod validation;

#[cfg(feature = "logging")]
pub mod logging;

// Re-export main types
pub use compose::*;
pub use env::*;
pub use error::*;
pub use layout::ProjectLayout;
pub use loader::{LoaderStep, PostCssPlugin};
pub use plugin::Plugin;
pub use rule::{AssetFamily, Enforce, Pattern, Rule};
pub use style::{StyleChain, build_style_chain, build_style_chain_in};

// Re-export discovery and validation
pub use discovery::{DescriptorDiscovery, DescriptorFile, discover, discover_with_profile};
pub use validation::{DescriptorValidator, RequiredFieldsValidator, validate_required};
