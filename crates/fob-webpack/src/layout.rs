//! Project directory layout.
//!
//! All paths are computed from strings and normalized with `path-clean`; nothing here
//! touches the filesystem. The bundler needs absolute paths for rule conditions and
//! project loaders, so composition anchors the layout with [`ProjectLayout::absolutize`].

use path_clean::PathClean;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Result;

const CSS_MASTER_CLASS_LOADER: &str = "css-master-class-loader";
const VUIZE_LOADER: &str = "vuize-loader.js";

/// Where the project keeps its sources, dependencies and project-local loaders
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectLayout {
    /// Project root; every other path is relative to it
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Directory holding the bundler configuration
    #[serde(default = "default_config_dir")]
    pub config_dir: PathBuf,

    /// Project loaders, relative to `config_dir`
    #[serde(default = "default_loaders_dir")]
    pub loaders_dir: PathBuf,

    #[serde(default = "default_src_dir")]
    pub src_dir: PathBuf,

    /// Component directory, relative to `src_dir`
    #[serde(default = "default_components_dir")]
    pub components_dir: PathBuf,

    #[serde(default = "default_node_modules_dir")]
    pub node_modules_dir: PathBuf,

    /// Module resolution roots (default: sources, then dependencies)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolve_modules: Option<Vec<PathBuf>>,
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_config_dir() -> PathBuf {
    PathBuf::from("config")
}

fn default_loaders_dir() -> PathBuf {
    PathBuf::from("loaders")
}

fn default_src_dir() -> PathBuf {
    PathBuf::from("src")
}

fn default_components_dir() -> PathBuf {
    PathBuf::from("view/components")
}

fn default_node_modules_dir() -> PathBuf {
    PathBuf::from("node_modules")
}

impl Default for ProjectLayout {
    fn default() -> Self {
        Self {
            root: default_root(),
            config_dir: default_config_dir(),
            loaders_dir: default_loaders_dir(),
            src_dir: default_src_dir(),
            components_dir: default_components_dir(),
            node_modules_dir: default_node_modules_dir(),
            resolve_modules: None,
        }
    }
}

impl ProjectLayout {
    /// Layout with default directory names under `root`.
    ///
    /// # Example
    ///
    /// ```
    /// use fob_webpack::ProjectLayout;
    /// use std::path::PathBuf;
    ///
    /// let layout = ProjectLayout::new("/app");
    /// assert_eq!(layout.components(), PathBuf::from("/app/src/view/components"));
    /// ```
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    /// The same layout with `root` made absolute against the current directory.
    ///
    /// No filesystem access happens: symlinks are not followed and the directories
    /// need not exist.
    ///
    /// # Example
    ///
    /// ```
    /// use fob_webpack::ProjectLayout;
    ///
    /// let layout = ProjectLayout::default().absolutize().unwrap();
    /// assert!(layout.css_master_class_loader().is_absolute());
    /// ```
    pub fn absolutize(&self) -> Result<Self> {
        let root = if self.root.is_absolute() {
            self.root.clean()
        } else {
            std::path::absolute(&self.root)?.clean()
        };
        Ok(Self {
            root,
            ..self.clone()
        })
    }

    pub fn is_absolute(&self) -> bool {
        self.root.is_absolute()
    }

    fn under_root(&self, path: impl AsRef<Path>) -> PathBuf {
        self.root.join(path).clean()
    }

    pub fn loaders(&self) -> PathBuf {
        self.under_root(self.config_dir.join(&self.loaders_dir))
    }

    pub fn src(&self) -> PathBuf {
        self.under_root(&self.src_dir)
    }

    pub fn components(&self) -> PathBuf {
        self.src().join(&self.components_dir).clean()
    }

    pub fn node_modules(&self) -> PathBuf {
        self.under_root(&self.node_modules_dir)
    }

    /// Project loader appended to every style chain.
    pub fn css_master_class_loader(&self) -> PathBuf {
        self.loaders().join(CSS_MASTER_CLASS_LOADER)
    }

    /// Project loader that scopes component-directory scripts.
    pub fn vuize_loader(&self) -> PathBuf {
        self.loaders().join(VUIZE_LOADER)
    }

    pub fn resolve_modules(&self) -> Vec<PathBuf> {
        match &self.resolve_modules {
            Some(modules) => modules.iter().map(|m| self.under_root(m)).collect(),
            None => vec![self.src(), self.node_modules()],
        }
    }
}

/// Render a computed path as a loader identifier.
pub(crate) fn path_identifier(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layout_is_relative_to_current_dir() {
        let layout = ProjectLayout::default();
        assert_eq!(layout.src(), PathBuf::from("src"));
        assert_eq!(layout.loaders(), PathBuf::from("config/loaders"));
        assert_eq!(
            layout.css_master_class_loader(),
            PathBuf::from("config/loaders/css-master-class-loader")
        );
    }

    #[test]
    fn paths_are_normalized() {
        let mut layout = ProjectLayout::new("/app/config/..");
        layout.src_dir = PathBuf::from("./src/");
        assert_eq!(layout.src(), PathBuf::from("/app/src"));
        assert_eq!(layout.node_modules(), PathBuf::from("/app/node_modules"));
        assert_eq!(
            layout.vuize_loader(),
            PathBuf::from("/app/config/loaders/vuize-loader.js")
        );
    }

    #[test]
    fn resolve_modules_default_and_override() {
        let mut layout = ProjectLayout::new("/app");
        assert_eq!(
            layout.resolve_modules(),
            vec![PathBuf::from("/app/src"), PathBuf::from("/app/node_modules")]
        );

        layout.resolve_modules = Some(vec![PathBuf::from("lib"), PathBuf::from("/abs")]);
        assert_eq!(
            layout.resolve_modules(),
            vec![PathBuf::from("/app/lib"), PathBuf::from("/abs")]
        );
    }

    #[test]
    fn absolutize_anchors_relative_root_at_current_dir() {
        let cwd = std::env::current_dir().unwrap();
        let layout = ProjectLayout::default().absolutize().unwrap();

        assert!(layout.is_absolute());
        assert_eq!(layout.src(), cwd.join("src").clean());
        assert_eq!(
            layout.css_master_class_loader(),
            cwd.join("config/loaders/css-master-class-loader").clean()
        );
        for module in layout.resolve_modules() {
            assert!(module.is_absolute(), "{}", module.display());
        }
    }

    #[test]
    fn absolutize_keeps_absolute_root() {
        let layout = ProjectLayout::new("/app/config/..").absolutize().unwrap();
        assert_eq!(layout.root, PathBuf::from("/app"));
        assert_eq!(layout.components(), PathBuf::from("/app/src/view/components"));
    }

    #[test]
    fn deserializes_partial_layout() {
        let layout: ProjectLayout = serde_json::from_value(serde_json::json!({
            "root": "/srv/site",
            "components_dir": "components"
        }))
        .unwrap();

        assert_eq!(layout.config_dir, PathBuf::from("config"));
        assert_eq!(layout.components(), PathBuf::from("/srv/site/src/components"));
    }
}
