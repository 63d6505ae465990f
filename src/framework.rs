//! Framework modules and configuration ownership.
//!
//! A process may host several independent instances of the view framework,
//! for example one per sub-application. Each instance is a [`Framework`]
//! registered in a [`FrameworkTable`] under a module name such as
//! `Admin::View`. The table always contains the global default module,
//! named `View`.
//!
//! ## Resolution
//! A class finds its owning configuration through its qualified name:
//! 1. Take the namespace of the class (its name without the last segment).
//! 2. Walk that namespace outward, trying `<namespace>::View` at each level.
//! 3. Fall back to the default `View` module.
//!
//! So `Admin::Views::Users::Index` tries `Admin::Views::Users::View`,
//! `Admin::Views::View`, `Admin::View`, then uses `View`. Nothing is cached;
//! every call reflects the table as it is now.

use crate::configuration::Configuration;
use crate::entity::{Layout, View};
use crate::error::{ViewError, ViewResult};
use crate::layout::ClassRegistry;
use crate::types::{ClassName, Namespace};
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::rc::Rc;
use tracing::{debug, info};

/// Last segment of every framework module name.
pub const MODULE_SEGMENT: &str = "View";

/// Default namespace segment for views of a duplicated module.
pub const DEFAULT_VIEWS_SEGMENT: &str = "Views";

/// One independently configurable instance of the view framework.
#[derive(Debug)]
pub struct Framework {
    name: ClassName,
    configuration: Configuration,
}

impl Framework {
    pub fn new(name: ClassName, configuration: Configuration) -> Self {
        Self {
            name,
            configuration,
        }
    }

    pub fn name(&self) -> &ClassName {
        &self.name
    }

    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    pub fn configuration_mut(&mut self) -> &mut Configuration {
        &mut self.configuration
    }

    /// Run a configuration block against this module's settings.
    pub fn configure<F>(&mut self, block: F) -> ViewResult<&mut Self>
    where
        F: FnOnce(&mut Configuration) -> ViewResult<()>,
    {
        block(&mut self.configuration)?;
        Ok(self)
    }
}

/// Registration table mapping module names to framework modules.
#[derive(Debug)]
pub struct FrameworkTable {
    classes: Rc<ClassRegistry>,
    default: Framework,
    modules: BTreeMap<String, Framework>,
}

impl FrameworkTable {
    /// Create a table with a fresh class registry and a default module.
    pub fn new() -> ViewResult<Self> {
        Self::with_classes(ClassRegistry::new())
    }

    pub fn with_classes(classes: Rc<ClassRegistry>) -> ViewResult<Self> {
        let configuration = Configuration::new(classes.clone())?;
        let default = Framework::new(
            ClassName::new_unchecked(MODULE_SEGMENT),
            configuration,
        );
        Ok(Self {
            classes,
            default,
            modules: BTreeMap::new(),
        })
    }

    pub fn classes(&self) -> &Rc<ClassRegistry> {
        &self.classes
    }

    pub fn default_framework(&self) -> &Framework {
        &self.default
    }

    pub fn default_framework_mut(&mut self) -> &mut Framework {
        &mut self.default
    }

    /// Register a framework module under its name, replacing any module of
    /// the same name. Returns the replaced module. A module named `View`
    /// replaces the default module.
    pub fn register(&mut self, framework: Framework) -> Option<Framework> {
        let name = framework.name().to_string();
        info!(module = %name, "framework module registered");
        if name == MODULE_SEGMENT {
            return Some(std::mem::replace(&mut self.default, framework));
        }
        self.modules.insert(name, framework)
    }

    /// Create `<module>::View` with a duplicate of the default configuration,
    /// scoped to `<module>::<views>`, and register it.
    pub fn duplicate(&mut self, module: &str, views: Option<&str>) -> ViewResult<&mut Framework> {
        let module_ns = Namespace::new(module);
        if module_ns.is_root() {
            return Err(ViewError::invalid_class_name(
                module,
                "module name is empty",
            ));
        }
        let name = ClassName::parse(&module_ns.qualify(MODULE_SEGMENT))?;
        let views = views.unwrap_or(DEFAULT_VIEWS_SEGMENT);

        let mut configuration = self.default.configuration().duplicate();
        configuration.set_namespace(module_ns.qualify(views));

        info!(module = %name, namespace = %configuration.namespace(), "framework module duplicated");
        let framework = Framework::new(name, configuration);
        Ok(match self.modules.entry(framework.name().to_string()) {
            Entry::Occupied(mut entry) => {
                entry.insert(framework);
                entry.into_mut()
            }
            Entry::Vacant(entry) => entry.insert(framework),
        })
    }

    /// Look up a module by name. `View` names the default module.
    pub fn get(&self, name: &str) -> Option<&Framework> {
        if name == MODULE_SEGMENT {
            return Some(&self.default);
        }
        self.modules.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Framework> {
        if name == MODULE_SEGMENT {
            return Some(&mut self.default);
        }
        self.modules.get_mut(name)
    }

    /// The default module followed by every registered module, by name.
    pub fn modules(&self) -> impl Iterator<Item = &Framework> {
        std::iter::once(&self.default).chain(self.modules.values())
    }

    /// The framework module that owns `class`.
    pub fn resolve(&self, class: &ClassName) -> &Framework {
        match self.lookup(class) {
            Some(key) => &self.modules[&key],
            None => &self.default,
        }
    }

    pub fn resolve_mut(&mut self, class: &ClassName) -> &mut Framework {
        match self.lookup(class) {
            Some(key) => self
                .modules
                .get_mut(&key)
                .unwrap_or(&mut self.default),
            None => &mut self.default,
        }
    }

    /// The configuration owning `class`.
    pub fn configuration_for(&self, class: &ClassName) -> &Configuration {
        self.resolve(class).configuration()
    }

    fn lookup(&self, class: &ClassName) -> Option<String> {
        class
            .namespace()
            .ancestors()
            .filter(|ns| !ns.is_root())
            .map(|ns| ns.qualify(MODULE_SEGMENT))
            .find(|key| self.modules.contains_key(key))
    }

    /// Register a view with the configuration that owns it.
    pub fn define_view(&mut self, view: Rc<dyn View>) -> &Framework {
        let framework = self.resolve_mut(view.class_name());
        debug!(view = %view.class_name(), module = %framework.name(), "view defined");
        framework.configuration_mut().add_view(view);
        framework
    }

    /// Define a layout class and register it with the configuration that
    /// owns it.
    pub fn define_layout(&mut self, layout: Rc<dyn Layout>) -> &Framework {
        self.classes.define_layout(layout.clone());
        let framework = self.resolve_mut(layout.class_name());
        debug!(layout = %layout.class_name(), module = %framework.name(), "layout defined");
        framework.configuration_mut().add_layout(layout);
        framework
    }

    /// Load the default module, then every registered module.
    pub fn load(&self) -> ViewResult<()> {
        for framework in self.modules() {
            framework.configuration().load()?;
        }
        Ok(())
    }

    /// Reset every module's configuration.
    pub fn reset(&mut self) -> ViewResult<()> {
        self.default.configuration_mut().reset()?;
        for framework in self.modules.values_mut() {
            framework.configuration_mut().reset()?;
        }
        Ok(())
    }
}
