//! View and layout entities.
//!
//! Views and layouts are defined by the host application; this crate only
//! needs to identify them, register them, and ask them to load. Both are
//! handled through `Rc` handles, and registries compare them by identity.

use crate::types::ClassName;
use anyhow::{Context, Result};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing::debug;

/// Placeholder replaced by rendered content in a layout template.
pub const CONTENT_PLACEHOLDER: &str = "{{ content }}";

/// Something registered with a configuration and loaded at boot.
pub trait Loadable: fmt::Debug {
    fn class_name(&self) -> &ClassName;

    /// Resolve deferred references (templates, layouts). Called once per boot.
    fn load(&self) -> Result<()>;
}

/// A view class.
pub trait View: Loadable {}

/// A layout class wrapping rendered view content.
pub trait Layout: Loadable {
    fn render(&self, content: &str) -> String;
}

/// The layout used when none is configured. Renders content unwrapped.
#[derive(Debug)]
pub struct NullLayout {
    class: ClassName,
}

impl NullLayout {
    pub const CLASS_NAME: &'static str = "NullLayout";

    pub fn new() -> Self {
        Self {
            class: ClassName::new_unchecked(Self::CLASS_NAME),
        }
    }

    /// Shared handle to a null layout.
    pub fn shared() -> Rc<dyn Layout> {
        Rc::new(Self::new())
    }
}

impl Default for NullLayout {
    fn default() -> Self {
        Self::new()
    }
}

impl Loadable for NullLayout {
    fn class_name(&self) -> &ClassName {
        &self.class
    }

    fn load(&self) -> Result<()> {
        Ok(())
    }
}

impl Layout for NullLayout {
    fn render(&self, content: &str) -> String {
        content.to_string()
    }
}

/// A view declared by name, typically from a manifest.
#[derive(Debug)]
pub struct DeclaredView {
    class: ClassName,
    template: Option<PathBuf>,
    loaded: Cell<bool>,
}

impl DeclaredView {
    pub fn new(class: ClassName) -> Self {
        Self {
            class,
            template: None,
            loaded: Cell::new(false),
        }
    }

    /// Require a template file to exist when the view loads.
    pub fn with_template(mut self, template: impl Into<PathBuf>) -> Self {
        self.template = Some(template.into());
        self
    }

    pub fn template(&self) -> Option<&Path> {
        self.template.as_deref()
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.get()
    }
}

impl Loadable for DeclaredView {
    fn class_name(&self) -> &ClassName {
        &self.class
    }

    fn load(&self) -> Result<()> {
        if let Some(ref template) = self.template
            && !template.is_file()
        {
            anyhow::bail!("template {} does not exist", template.display());
        }
        debug!(view = %self.class, "view loaded");
        self.loaded.set(true);
        Ok(())
    }
}

impl View for DeclaredView {}

/// A layout declared by name, optionally backed by a template file.
#[derive(Debug)]
pub struct DeclaredLayout {
    class: ClassName,
    template: Option<PathBuf>,
    source: RefCell<Option<String>>,
}

impl DeclaredLayout {
    pub fn new(class: ClassName) -> Self {
        Self {
            class,
            template: None,
            source: RefCell::new(None),
        }
    }

    pub fn with_template(mut self, template: impl Into<PathBuf>) -> Self {
        self.template = Some(template.into());
        self
    }

    pub fn is_loaded(&self) -> bool {
        self.source.borrow().is_some()
    }
}

impl Loadable for DeclaredLayout {
    fn class_name(&self) -> &ClassName {
        &self.class
    }

    fn load(&self) -> Result<()> {
        let source = match self.template {
            Some(ref template) => std::fs::read_to_string(template)
                .with_context(|| format!("reading layout template {}", template.display()))?,
            None => CONTENT_PLACEHOLDER.to_string(),
        };
        self.source.replace(Some(source));
        debug!(layout = %self.class, "layout loaded");
        Ok(())
    }
}

impl Layout for DeclaredLayout {
    /// Substitute `content` into the template read by the latest `load`.
    /// Before `load`, or without a template, content passes through unchanged.
    fn render(&self, content: &str) -> String {
        match self.source.borrow().as_deref() {
            Some(source) => source.replace(CONTENT_PLACEHOLDER, content),
            None => content.to_string(),
        }
    }
}

/// A set of `Rc` handles deduplicated by pointer identity.
pub struct IdentitySet<T: ?Sized> {
    entries: HashMap<usize, Rc<T>>,
}

fn identity<T: ?Sized>(item: &Rc<T>) -> usize {
    Rc::as_ptr(item) as *const () as usize
}

impl<T: ?Sized> IdentitySet<T> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Insert `item`. Returns `false` if the same handle was already present.
    pub fn insert(&mut self, item: Rc<T>) -> bool {
        self.entries.insert(identity(&item), item).is_none()
    }

    pub fn contains(&self, item: &Rc<T>) -> bool {
        self.entries.contains_key(&identity(item))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rc<T>> {
        self.entries.values()
    }
}

impl<T: ?Sized> Default for IdentitySet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized + fmt::Debug> fmt::Debug for IdentitySet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.entries.values()).finish()
    }
}
