//! The plugin registry: the only boundary through which plugin and service
//! code is loaded.
//!
//! Modules are registered as factories under their resolved package names and
//! looked up by name. There is no dynamic code loading; what is not
//! registered here does not exist as far as the orchestrator is concerned.

use indexmap::IndexMap;

use crate::error::{Error, Result};
use crate::plugin::{PluginModule, ServiceModule};

pub type PluginFactory = Box<dyn Fn() -> PluginModule>;
pub type ServiceFactory = Box<dyn Fn() -> ServiceModule>;

#[derive(Default)]
pub struct PluginRegistry {
    plugins: IndexMap<String, PluginFactory>,
    services: IndexMap<String, ServiceFactory>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry pre-populated with the built-in service and plugins.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        crate::builtins::register(&mut registry);
        registry
    }

    pub fn register_plugin<F>(&mut self, name: &str, factory: F)
    where
        F: Fn() -> PluginModule + 'static,
    {
        self.plugins.insert(name.to_string(), Box::new(factory));
    }

    pub fn register_service<F>(&mut self, name: &str, factory: F)
    where
        F: Fn() -> ServiceModule + 'static,
    {
        self.services.insert(name.to_string(), Box::new(factory));
    }

    pub fn contains_plugin(&self, name: &str) -> bool {
        self.plugins.contains_key(name)
    }

    /// Instantiates the plugin registered under `name`.
    pub fn resolve_plugin(&self, name: &str) -> Result<PluginModule> {
        self.plugins
            .get(name)
            .map(|factory| factory())
            .ok_or_else(|| Error::ResolutionError { name: name.to_string() })
    }

    /// Instantiates the service registered under `name`.
    pub fn resolve_service(&self, name: &str) -> Result<ServiceModule> {
        self.services
            .get(name)
            .map(|factory| factory())
            .ok_or_else(|| Error::ResolutionError { name: name.to_string() })
    }
}
