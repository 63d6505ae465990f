//! Boot manifest: framework configuration from a YAML file.
//!
//! A manifest configures the default framework module, declares the
//! duplicated modules of sub-applications, and lists the view and layout
//! classes to define:
//!
//! ```yaml
//! default:
//!   namespace: Web::Views
//!   root: templates
//!   layout: application
//!   load_paths: [shared]
//! modules:
//!   - module: Admin
//!     root: admin/templates
//!     layout: admin
//! layouts: [ApplicationLayout, Admin::Views::AdminLayout]
//! views: [Web::Views::Home::Index, Admin::Views::Dashboard]
//! ```
//!
//! Relative paths are resolved against the manifest's directory.
//!
//! ## Discovery
//! - `VIEW_CONFIG_PATH` - Explicit manifest file (overrides all)
//! - `./views.yaml` - Project manifest
//! - `<user config dir>/view-config/views.yaml` - User manifest

use crate::configuration::Configuration;
use crate::entity::{DeclaredLayout, DeclaredView};
use crate::error::{ViewError, ViewResult};
use crate::framework::FrameworkTable;
use crate::types::ClassName;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing::{debug, info};

/// Environment variable naming an explicit manifest file.
pub const MANIFEST_ENV: &str = "VIEW_CONFIG_PATH";

/// Manifest file name looked up in the project and user directories.
pub const MANIFEST_FILE: &str = "views.yaml";

/// Settings applied to one framework module.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModuleSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<String>,

    /// Appended to the module's load paths.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub load_paths: Vec<PathBuf>,
}

impl ModuleSettings {
    fn apply(&self, config: &mut Configuration, base_dir: &Path) -> ViewResult<()> {
        if let Some(ref namespace) = self.namespace {
            config.set_namespace(namespace.as_str());
        }
        if let Some(ref root) = self.root {
            config.set_root(base_dir.join(root))?;
        }
        if self.layout.is_some() {
            config.set_layout(self.layout.clone());
        }
        for path in &self.load_paths {
            config.load_paths_mut().push(base_dir.join(path));
        }
        Ok(())
    }
}

/// A duplicated framework module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModuleManifest {
    /// Enclosing module, e.g. `Admin` for `Admin::View`.
    pub module: String,

    /// Views namespace segment (default `Views`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub views: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub load_paths: Vec<PathBuf>,
}

impl ModuleManifest {
    /// Overrides applied on top of the duplicated default settings. The
    /// namespace is derived from `module` and `views`.
    pub fn settings(&self) -> ModuleSettings {
        ModuleSettings {
            namespace: None,
            root: self.root.clone(),
            layout: self.layout.clone(),
            load_paths: self.load_paths.clone(),
        }
    }
}

/// Parsed manifest file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    #[serde(default)]
    pub default: ModuleSettings,

    #[serde(default)]
    pub modules: Vec<ModuleManifest>,

    #[serde(default)]
    pub layouts: Vec<ClassName>,

    #[serde(default)]
    pub views: Vec<ClassName>,
}

impl Manifest {
    /// Load a manifest from file.
    pub fn load<P: AsRef<Path>>(path: P) -> ViewResult<Self> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|err| ViewError::manifest(path, err))?;
        serde_yaml::from_str(&content).map_err(|err| ViewError::manifest(path, err))
    }

    /// Parse manifest YAML.
    pub fn parse(content: &str) -> ViewResult<Self> {
        serde_yaml::from_str(content).map_err(|err| ViewError::manifest("<inline>", err))
    }

    /// Build a framework table from this manifest.
    ///
    /// The default module is configured first so that duplicated modules
    /// inherit its settings, then each module applies its own overrides.
    /// Layouts and views are defined last and routed to their owning modules.
    pub fn apply(&self, base_dir: &Path) -> ViewResult<FrameworkTable> {
        let mut table = FrameworkTable::new()?;
        self.default
            .apply(table.default_framework_mut().configuration_mut(), base_dir)?;

        for module in &self.modules {
            let framework = table.duplicate(&module.module, module.views.as_deref())?;
            module
                .settings()
                .apply(framework.configuration_mut(), base_dir)?;
            debug!(module = %framework.name(), "module configured from manifest");
        }

        for layout in &self.layouts {
            table.define_layout(Rc::new(DeclaredLayout::new(layout.clone())));
        }
        for view in &self.views {
            table.define_view(Rc::new(DeclaredView::new(view.clone())));
        }

        info!(
            modules = self.modules.len() + 1,
            layouts = self.layouts.len(),
            views = self.views.len(),
            "manifest applied"
        );
        Ok(table)
    }
}

/// Candidate manifest locations, highest priority first.
#[derive(Debug, Clone)]
pub struct ManifestPaths {
    /// Explicit manifest from the environment
    pub explicit: Option<PathBuf>,
    /// Project-level manifest
    pub project: Option<PathBuf>,
    /// User-level manifest
    pub user: Option<PathBuf>,
}

impl ManifestPaths {
    /// Discover manifest paths from environment and defaults.
    pub fn discover() -> Self {
        let explicit = std::env::var(MANIFEST_ENV).ok().map(PathBuf::from);
        let project = Some(PathBuf::from(MANIFEST_FILE));
        let user = dirs::config_dir().map(|dir| dir.join("view-config").join(MANIFEST_FILE));
        Self {
            explicit,
            project,
            user,
        }
    }

    /// The first manifest that exists. An explicit path is returned even if
    /// it does not exist, so that loading it reports the error.
    pub fn effective(&self) -> Option<&Path> {
        if let Some(ref explicit) = self.explicit {
            return Some(explicit.as_path());
        }
        [&self.project, &self.user]
            .into_iter()
            .flatten()
            .find(|path| path.is_file())
            .map(PathBuf::as_path)
    }
}

impl Default for ManifestPaths {
    fn default() -> Self {
        Self::discover()
    }
}

/// Load the manifest at `path` and build its framework table, resolving
/// relative paths against the manifest's directory.
pub fn load_table(path: &Path) -> ViewResult<FrameworkTable> {
    info!("Loading manifest: {}", path.display());
    let manifest = Manifest::load(path)?;
    let base_dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => std::env::current_dir()?,
    };
    manifest.apply(&base_dir)
}
