//! Deferred, namespace-aware layout resolution.
//!
//! A configuration stores the layout *name* it was given (`application`) and
//! resolves it to a layout class only when read. Layout classes are commonly
//! defined after the configuration names them, so resolution always consults
//! the current contents of the shared [`ClassRegistry`].
//!
//! ## Naming
//! A layout name maps to the upper-camel-cased `<name>_layout` class name:
//! `application` becomes `ApplicationLayout`. Names that already end in
//! `layout` are not suffixed again, and qualified names are converted per
//! segment (`admin::main` becomes `Admin::MainLayout`).
//!
//! ## Lookup order
//! 1. `<namespace>::<Candidate>`
//! 2. `<Candidate>` in the global namespace

use crate::entity::{Layout, NullLayout};
use crate::error::{ViewError, ViewResult};
use crate::types::{Namespace, SEPARATOR};
use heck::{ToSnakeCase, ToUpperCamelCase};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;
use tracing::debug;

/// Defined layout classes, keyed by qualified name.
///
/// Shared between every configuration in a process. Single-threaded: the
/// registry is only mutated while classes are being defined at boot.
#[derive(Default)]
pub struct ClassRegistry {
    layouts: RefCell<BTreeMap<String, Rc<dyn Layout>>>,
}

impl ClassRegistry {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Define (or redefine) a layout class under its qualified name.
    pub fn define_layout(&self, layout: Rc<dyn Layout>) -> Option<Rc<dyn Layout>> {
        let name = layout.class_name().to_string();
        debug!(layout = %name, "layout class defined");
        self.layouts.borrow_mut().insert(name, layout)
    }

    pub fn layout(&self, name: &str) -> Option<Rc<dyn Layout>> {
        self.layouts.borrow().get(name).cloned()
    }

    pub fn layout_names(&self) -> Vec<String> {
        self.layouts.borrow().keys().cloned().collect()
    }
}

impl fmt::Debug for ClassRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassRegistry")
            .field("layouts", &self.layout_names())
            .finish()
    }
}

/// Resolves symbolic layout names against a [`ClassRegistry`].
#[derive(Debug, Clone)]
pub struct LayoutFinder {
    classes: Rc<ClassRegistry>,
}

impl LayoutFinder {
    pub fn new(classes: Rc<ClassRegistry>) -> Self {
        Self { classes }
    }

    pub fn classes(&self) -> &Rc<ClassRegistry> {
        &self.classes
    }

    /// Resolve `name` within `namespace`.
    ///
    /// An absent name yields the null layout and never fails. A present name
    /// that matches no class is a `LayoutNotFound` error.
    pub fn find(&self, name: Option<&str>, namespace: &Namespace) -> ViewResult<Rc<dyn Layout>> {
        let Some(name) = name else {
            return Ok(NullLayout::shared());
        };

        let candidates = Self::candidates(name, namespace);
        for candidate in &candidates {
            if let Some(layout) = self.classes.layout(candidate) {
                debug!(layout_name = name, layout = %candidate, "layout resolved");
                return Ok(layout);
            }
        }

        Err(ViewError::layout_not_found(
            name,
            namespace.as_str(),
            candidates,
        ))
    }

    /// Qualified class names tried for `name`, in lookup order.
    pub fn candidates(name: &str, namespace: &Namespace) -> Vec<String> {
        let class = layout_class_name(name);
        let mut candidates = Vec::with_capacity(2);
        if !namespace.is_root() {
            candidates.push(namespace.qualify(&class));
        }
        candidates.push(class);
        candidates
    }
}

/// Convert a layout name to its class name (`application` → `ApplicationLayout`).
pub fn layout_class_name(name: &str) -> String {
    let mut segments: Vec<String> = name
        .split(SEPARATOR)
        .filter(|segment| !segment.is_empty())
        .map(|segment| segment.to_upper_camel_case())
        .collect();

    if let Some(last) = segments.last_mut() {
        let snake = last.to_snake_case();
        if snake != "layout" && !snake.ends_with("_layout") {
            last.push_str("Layout");
        }
    }

    segments.join(SEPARATOR)
}

/// A layout name paired with the finder that resolves it.
///
/// The name is stored verbatim and resolved on every read; nothing is cached.
#[derive(Debug, Clone)]
pub struct LayoutCell {
    name: Option<String>,
    finder: LayoutFinder,
}

impl LayoutCell {
    pub fn new(finder: LayoutFinder) -> Self {
        Self { name: None, finder }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set(&mut self, name: Option<String>) {
        self.name = name;
    }

    pub fn clear(&mut self) {
        self.name = None;
    }

    pub fn finder(&self) -> &LayoutFinder {
        &self.finder
    }

    pub fn resolve(&self, namespace: &Namespace) -> ViewResult<Rc<dyn Layout>> {
        self.finder.find(self.name(), namespace)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::DeclaredLayout;
    use crate::error::ErrorCode;
    use crate::types::ClassName;

    fn define(classes: &ClassRegistry, name: &str) -> Rc<dyn Layout> {
        let layout: Rc<dyn Layout> = Rc::new(DeclaredLayout::new(ClassName::parse(name).unwrap()));
        classes.define_layout(layout.clone());
        layout
    }

    #[test]
    fn test_layout_class_name() {
        assert_eq!(layout_class_name("application"), "ApplicationLayout");
        assert_eq!(layout_class_name("admin_panel"), "AdminPanelLayout");
        assert_eq!(layout_class_name("application_layout"), "ApplicationLayout");
        assert_eq!(layout_class_name("ApplicationLayout"), "ApplicationLayout");
        assert_eq!(layout_class_name("admin::main"), "Admin::MainLayout");
    }

    #[test]
    fn test_absent_name_is_null_layout() {
        let finder = LayoutFinder::new(ClassRegistry::new());
        let layout = finder.find(None, &Namespace::new("Web::Views")).unwrap();
        assert_eq!(layout.class_name().as_str(), NullLayout::CLASS_NAME);
    }

    #[test]
    fn test_namespace_checked_before_global() {
        let classes = ClassRegistry::new();
        let global = define(&classes, "ApplicationLayout");
        let scoped = define(&classes, "Admin::Views::ApplicationLayout");
        let finder = LayoutFinder::new(classes);

        let found = finder
            .find(Some("application"), &Namespace::new("Admin::Views"))
            .unwrap();
        assert!(Rc::ptr_eq(&found, &scoped));

        let found = finder
            .find(Some("application"), &Namespace::new("Web::Views"))
            .unwrap();
        assert!(Rc::ptr_eq(&found, &global));
    }

    #[test]
    fn test_missing_name_is_error() {
        let finder = LayoutFinder::new(ClassRegistry::new());
        let err = finder
            .find(Some("aplication"), &Namespace::new("Web::Views"))
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::LayoutNotFound);
        match err {
            ViewError::LayoutNotFound { candidates, .. } => assert_eq!(
                candidates,
                vec!["Web::Views::AplicationLayout", "AplicationLayout"]
            ),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_cell_sees_layouts_defined_later() {
        let classes = ClassRegistry::new();
        let mut cell = LayoutCell::new(LayoutFinder::new(classes.clone()));
        cell.set(Some("application".to_string()));
        assert!(cell.resolve(&Namespace::root()).is_err());

        let layout = define(&classes, "ApplicationLayout");
        let found = cell.resolve(&Namespace::root()).unwrap();
        assert!(Rc::ptr_eq(&found, &layout));
        assert_eq!(cell.name(), Some("application"));
    }
}
