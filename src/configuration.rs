//! Per-framework view configuration.
//!
//! Each framework module owns one [`Configuration`]. It is mutated while the
//! application boots, optionally duplicated to seed another framework module,
//! then loaded once. Raw fields are private; the setters below are the whole
//! configuration surface.

use crate::entity::{IdentitySet, Layout, View};
use crate::error::{ViewError, ViewResult};
use crate::layout::{ClassRegistry, LayoutCell, LayoutFinder};
use crate::load_paths::LoadPaths;
use crate::types::Namespace;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing::{debug, info};

/// Settings for one framework module.
#[derive(Debug)]
pub struct Configuration {
    /// Scope used when resolving layout names.
    namespace: Namespace,
    /// Canonical, existing template root.
    root: PathBuf,
    /// Root captured at creation; restored by reset.
    default_root: PathBuf,
    /// Unresolved layout name and its finder.
    layout: LayoutCell,
    views: IdentitySet<dyn View>,
    layouts: IdentitySet<dyn Layout>,
    load_paths: LoadPaths,
}

impl Configuration {
    /// Create a configuration rooted at the current directory, resolving
    /// layouts against `classes`.
    pub fn new(classes: Rc<ClassRegistry>) -> ViewResult<Self> {
        let root = current_root()?;
        Ok(Self {
            namespace: Namespace::root(),
            load_paths: LoadPaths::from_root(&root),
            default_root: root.clone(),
            root,
            layout: LayoutCell::new(LayoutFinder::new(classes)),
            views: IdentitySet::new(),
            layouts: IdentitySet::new(),
        })
    }

    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    pub fn set_namespace(&mut self, namespace: impl Into<Namespace>) {
        self.namespace = namespace.into();
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The root this configuration was created with.
    pub fn default_root(&self) -> &Path {
        &self.default_root
    }

    /// Set the template root.
    ///
    /// Relative paths are taken from the current directory. The path is
    /// canonicalized (symlinks resolved) and must be an existing directory.
    pub fn set_root(&mut self, root: impl AsRef<Path>) -> ViewResult<()> {
        let root = root.as_ref();
        let canonical = root
            .canonicalize()
            .map_err(|err| ViewError::path_not_found(root, err))?;
        if !canonical.is_dir() {
            return Err(ViewError::path_not_found(
                root,
                std::io::Error::new(std::io::ErrorKind::NotADirectory, "not a directory"),
            ));
        }
        debug!(root = %canonical.display(), "template root set");
        self.root = canonical;
        Ok(())
    }

    /// Resolve the configured layout in the current namespace.
    ///
    /// Evaluated on every call. With no layout name this is the null layout.
    pub fn layout(&self) -> ViewResult<Rc<dyn Layout>> {
        self.layout.resolve(&self.namespace)
    }

    /// The layout name exactly as it was set.
    pub fn layout_name(&self) -> Option<&str> {
        self.layout.name()
    }

    /// Store a layout name without resolving it. `None` disables the layout.
    pub fn set_layout<S: Into<String>>(&mut self, name: Option<S>) {
        self.layout.set(name.map(Into::into));
    }

    pub fn classes(&self) -> &Rc<ClassRegistry> {
        self.layout.finder().classes()
    }

    pub fn add_view(&mut self, view: Rc<dyn View>) {
        self.views.insert(view);
    }

    pub fn add_layout(&mut self, layout: Rc<dyn Layout>) {
        self.layouts.insert(layout);
    }

    pub fn views(&self) -> &IdentitySet<dyn View> {
        &self.views
    }

    pub fn layouts(&self) -> &IdentitySet<dyn Layout> {
        &self.layouts
    }

    pub fn load_paths(&self) -> &LoadPaths {
        &self.load_paths
    }

    pub fn load_paths_mut(&mut self) -> &mut LoadPaths {
        &mut self.load_paths
    }

    /// Locate a template: the root first, then each load path.
    pub fn find_template(&self, relative: impl AsRef<Path>) -> Option<PathBuf> {
        let relative = relative.as_ref();
        let candidate = self.root.join(relative);
        if candidate.is_file() {
            return Some(candidate);
        }
        self.load_paths.find(relative)
    }

    /// Copy this configuration for a new framework module.
    ///
    /// Namespace, root and the unresolved layout name are copied and the
    /// load paths are cloned. Views and layouts are not: registries belong
    /// to the framework module that owns them.
    pub fn duplicate(&self) -> Self {
        Self {
            namespace: self.namespace.clone(),
            root: self.root.clone(),
            default_root: self.default_root.clone(),
            layout: self.layout.clone(),
            views: IdentitySet::new(),
            layouts: IdentitySet::new(),
            load_paths: self.load_paths.clone(),
        }
    }

    /// Load every registered view, then every registered layout.
    ///
    /// Stops at the first failure.
    pub fn load(&self) -> ViewResult<()> {
        for view in self.views.iter() {
            view.load()
                .map_err(|err| ViewError::load_failure(view.class_name(), err))?;
        }
        for layout in self.layouts.iter() {
            layout
                .load()
                .map_err(|err| ViewError::load_failure(layout.class_name(), err))?;
        }
        info!(
            namespace = %self.namespace,
            views = self.views.len(),
            layouts = self.layouts.len(),
            "configuration loaded"
        );
        Ok(())
    }

    /// Restore defaults: the root captured at creation, empty registries,
    /// load paths seeded from that root, no layout. The namespace is kept.
    pub fn reset(&mut self) -> ViewResult<()> {
        self.root = self.default_root.clone();
        self.views.clear();
        self.layouts.clear();
        self.load_paths = LoadPaths::from_root(&self.root);
        self.layout.clear();
        debug!(namespace = %self.namespace, "configuration reset");
        Ok(())
    }

    /// Alias for [`reset`](Self::reset).
    pub fn unload(&mut self) -> ViewResult<()> {
        self.reset()
    }
}

fn current_root() -> ViewResult<PathBuf> {
    let cwd = std::env::current_dir()?;
    Ok(cwd.canonicalize()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{DeclaredLayout, DeclaredView, Loadable};
    use crate::error::ErrorCode;
    use crate::types::ClassName;
    use std::cell::Cell;
    use tempfile::TempDir;

    fn config() -> Configuration {
        Configuration::new(ClassRegistry::new()).unwrap()
    }

    fn view(name: &str) -> Rc<dyn View> {
        Rc::new(DeclaredView::new(ClassName::parse(name).unwrap()))
    }

    #[derive(Debug)]
    struct FailingView {
        class: ClassName,
    }

    impl Loadable for FailingView {
        fn class_name(&self) -> &ClassName {
            &self.class
        }

        fn load(&self) -> anyhow::Result<()> {
            anyhow::bail!("template missing")
        }
    }

    impl View for FailingView {}

    #[derive(Debug)]
    struct CountingLayout {
        class: ClassName,
        loads: Cell<u32>,
    }

    impl Loadable for CountingLayout {
        fn class_name(&self) -> &ClassName {
            &self.class
        }

        fn load(&self) -> anyhow::Result<()> {
            self.loads.set(self.loads.get() + 1);
            Ok(())
        }
    }

    impl Layout for CountingLayout {
        fn render(&self, content: &str) -> String {
            content.to_string()
        }
    }

    #[test]
    fn test_defaults() {
        let config = config();
        assert!(config.namespace().is_root());
        assert!(config.root().is_absolute());
        assert_eq!(config.layout_name(), None);
        assert!(config.views().is_empty());
        assert!(config.layouts().is_empty());
        assert_eq!(config.load_paths().base(), Some(config.root()));
    }

    #[test]
    fn test_set_root_canonicalizes() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("templates")).unwrap();

        let mut config = config();
        config
            .set_root(dir.path().join("templates").join("..").join("templates"))
            .unwrap();
        assert_eq!(
            config.root(),
            dir.path().join("templates").canonicalize().unwrap()
        );
    }

    #[test]
    fn test_set_root_missing_path_fails() {
        let dir = TempDir::new().unwrap();
        let mut config = config();
        let before = config.root().to_path_buf();

        let err = config.set_root(dir.path().join("missing")).unwrap_err();
        assert_eq!(err.code(), ErrorCode::PathNotFound);
        assert_eq!(config.root(), before);
    }

    #[test]
    fn test_set_root_rejects_regular_file() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("index.html");
        std::fs::write(&file, "hello").unwrap();
        let mut config = config();
        let before = config.root().to_path_buf();

        let err = config.set_root(&file).unwrap_err();
        assert_eq!(err.code(), ErrorCode::PathNotFound);
        assert_eq!(config.root(), before);
    }

    #[test]
    fn test_layout_name_stored_verbatim() {
        let mut config = config();
        config.set_layout(Some("application"));
        assert_eq!(config.layout_name(), Some("application"));
        assert_eq!(config.layout().unwrap_err().code(), ErrorCode::LayoutNotFound);

        config.set_layout(None::<String>);
        assert_eq!(
            config.layout().unwrap().class_name().as_str(),
            crate::entity::NullLayout::CLASS_NAME
        );
    }

    #[test]
    fn test_layout_follows_namespace_changes() {
        let mut config = config();
        let admin: Rc<dyn Layout> = Rc::new(DeclaredLayout::new(
            ClassName::parse("Admin::Views::ApplicationLayout").unwrap(),
        ));
        config.classes().define_layout(admin.clone());
        config.set_layout(Some("application"));

        assert!(config.layout().is_err());
        config.set_namespace("Admin::Views");
        assert!(Rc::ptr_eq(&config.layout().unwrap(), &admin));
    }

    #[test]
    fn test_add_view_is_idempotent() {
        let mut config = config();
        let v1 = view("Web::Views::Index");
        config.add_view(v1.clone());
        config.add_view(v1);
        assert_eq!(config.views().len(), 1);
    }

    #[test]
    fn test_duplicate_copies_settings_not_registries() {
        let dir = TempDir::new().unwrap();
        let mut config = config();
        config.set_namespace("Web::Views");
        config.set_root(dir.path()).unwrap();
        config.set_layout(Some("application"));
        config.add_view(view("Web::Views::Index"));

        let copy = config.duplicate();
        assert_eq!(copy.namespace(), config.namespace());
        assert_eq!(copy.root(), config.root());
        assert_eq!(copy.default_root(), config.default_root());
        assert_eq!(copy.layout_name(), Some("application"));
        assert_eq!(copy.load_paths(), config.load_paths());
        assert!(copy.views().is_empty());
        assert!(copy.layouts().is_empty());
        assert!(Rc::ptr_eq(copy.classes(), config.classes()));
    }

    #[test]
    fn test_duplicate_is_independent() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        let mut config = config();
        config.set_root(first.path()).unwrap();

        let mut copy = config.duplicate();
        copy.set_root(second.path()).unwrap();
        copy.load_paths_mut().push(second.path());
        copy.set_layout(Some("admin"));

        assert_eq!(config.root(), first.path().canonicalize().unwrap());
        assert_eq!(config.load_paths().len(), 1);
        assert_eq!(config.layout_name(), None);

        config.set_root(second.path()).unwrap();
        config.set_namespace("Web::Views");
        assert!(copy.namespace().is_root());
    }

    #[test]
    fn test_load_visits_views_then_layouts() {
        let mut config = config();
        let layout = Rc::new(CountingLayout {
            class: ClassName::parse("ApplicationLayout").unwrap(),
            loads: Cell::new(0),
        });
        let declared = Rc::new(DeclaredView::new(ClassName::parse("Web::Views::Index").unwrap()));
        config.add_view(declared.clone());
        config.add_layout(layout.clone());

        config.load().unwrap();
        assert!(declared.is_loaded());
        assert_eq!(layout.loads.get(), 1);
    }

    #[test]
    fn test_load_failure_aborts_batch() {
        let mut config = config();
        let layout = Rc::new(CountingLayout {
            class: ClassName::parse("ApplicationLayout").unwrap(),
            loads: Cell::new(0),
        });
        config.add_view(Rc::new(FailingView {
            class: ClassName::parse("Web::Views::Broken").unwrap(),
        }));
        config.add_layout(layout.clone());

        let err = config.load().unwrap_err();
        assert_eq!(err.code(), ErrorCode::LoadFailure);
        assert!(err.to_string().contains("Web::Views::Broken"));
        assert_eq!(layout.loads.get(), 0);
    }

    #[test]
    fn test_reset_restores_defaults_but_keeps_namespace() {
        let dir = TempDir::new().unwrap();
        let mut config = config();
        let default_root = config.root().to_path_buf();

        config.set_namespace("Web::Views");
        config.set_root(dir.path()).unwrap();
        config.set_layout(Some("application"));
        config.add_view(view("Web::Views::Index"));
        config.add_layout(Rc::new(DeclaredLayout::new(
            ClassName::parse("ApplicationLayout").unwrap(),
        )));
        config.load_paths_mut().push(dir.path());

        config.unload().unwrap();
        assert_eq!(config.root(), default_root);
        assert!(config.views().is_empty());
        assert!(config.layouts().is_empty());
        assert_eq!(config.layout_name(), None);
        assert_eq!(config.load_paths(), &LoadPaths::from_root(&default_root));
        assert_eq!(config.namespace().as_str(), "Web::Views");
    }

    #[test]
    fn test_find_template_prefers_root() {
        let root = TempDir::new().unwrap();
        let shared = TempDir::new().unwrap();
        std::fs::write(shared.path().join("index.html"), "shared").unwrap();

        let mut config = config();
        config.set_root(root.path()).unwrap();
        config.load_paths_mut().push(shared.path());
        assert_eq!(
            config.find_template("index.html"),
            Some(shared.path().join("index.html"))
        );

        std::fs::write(root.path().join("index.html"), "root").unwrap();
        assert_eq!(
            config.find_template("index.html"),
            Some(config.root().join("index.html"))
        );
    }
}
