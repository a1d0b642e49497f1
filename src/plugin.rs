//! Plugin and service module contracts.
//!
//! A module is a plain value with optional capability hooks; absence of a
//! hook is a legal no-op, not an error. The orchestrator resolves
//! capabilities by presence checks and invokes hooks through small context
//! types that expose exactly what each phase may do. Hooks contribute
//! configuration as fragments recorded on the context; the orchestrator folds
//! the fragments afterwards instead of handing out shared mutable state.

use indexmap::IndexMap;
use serde_json::Value;
use std::path::Path;

use crate::app_config::AppConfig;
use crate::error::Result;
use crate::inquiry::{InquiryResult, Question};
use crate::merge::deep_merge;
use crate::renderer::TemplateEngine;

pub type ConstructionHook = Box<dyn Fn(&mut ConstructionContext<'_>) -> Result<()>>;
pub type RuntimeHook = Box<dyn Fn(&mut RuntimeContext<'_>) -> Result<()>>;
pub type ScriptHook = Box<dyn Fn(&ScriptContext<'_>) -> Result<()>>;
pub type PluginInquiryHook = Box<dyn Fn(&AppConfig) -> Vec<Question>>;
pub type ServiceInquiryHook = Box<dyn Fn(&CreateOptions) -> Vec<Question>>;
pub type ServiceHook = Box<dyn Fn(&mut ServiceContext<'_>) -> Result<()>>;

/// Options for a `create` invocation, shared with every registered plugin.
#[derive(Debug, Clone, Default)]
pub struct CreateOptions {
    /// Project directory name as given on the command line
    pub project_name: String,
    /// Initialize a git repository and make the first commit
    pub git: bool,
    /// Run dependency installation after generation
    pub install: bool,
    /// Skip every inquiry prompt
    pub non_interactive: bool,
    pub commit_message: Option<String>,
}

/// A unit of optional hooks contributed by a plugin author.
pub struct PluginModule {
    /// Declared module name; normalized by the plugin manager on registration
    pub name: String,
    /// Writes template files and contributes manifest/config fragments at
    /// creation or add time
    pub construction: Option<ConstructionHook>,
    /// Contributes bundler-config fragments when the dev server starts
    pub runtime: Option<RuntimeHook>,
    /// Declares the questions to ask before construction
    pub inquiry: Option<PluginInquiryHook>,
    /// Named CLI script handlers keyed by command string
    pub scripts: IndexMap<String, ScriptHook>,
}

impl PluginModule {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            construction: None,
            runtime: None,
            inquiry: None,
            scripts: IndexMap::new(),
        }
    }

    pub fn with_construction<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut ConstructionContext<'_>) -> Result<()> + 'static,
    {
        self.construction = Some(Box::new(hook));
        self
    }

    pub fn with_runtime<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut RuntimeContext<'_>) -> Result<()> + 'static,
    {
        self.runtime = Some(Box::new(hook));
        self
    }

    pub fn with_inquiry<F>(mut self, hook: F) -> Self
    where
        F: Fn(&AppConfig) -> Vec<Question> + 'static,
    {
        self.inquiry = Some(Box::new(hook));
        self
    }

    pub fn with_script<F>(mut self, command: &str, hook: F) -> Self
    where
        F: Fn(&ScriptContext<'_>) -> Result<()> + 'static,
    {
        self.scripts.insert(command.to_string(), Box::new(hook));
        self
    }

    /// Returns the handler for `command`, if this module declares one.
    pub fn script(&self, command: &str) -> Option<&ScriptHook> {
        self.scripts.get(command)
    }
}

/// The top-level module defining what a freshly created project contains.
pub struct ServiceModule {
    pub name: String,
    /// Seeds the package manifest and registers the project's initial plugins
    pub service: ServiceHook,
    /// Declares the questions to ask before the create work tasks run
    pub inquiry: Option<ServiceInquiryHook>,
}

impl ServiceModule {
    pub fn new<F>(name: &str, service: F) -> Self
    where
        F: Fn(&mut ServiceContext<'_>) -> Result<()> + 'static,
    {
        Self { name: name.to_string(), service: Box::new(service), inquiry: None }
    }

    pub fn with_inquiry<F>(mut self, hook: F) -> Self
    where
        F: Fn(&CreateOptions) -> Vec<Question> + 'static,
    {
        self.inquiry = Some(Box::new(hook));
        self
    }
}

/// What a construction hook is allowed to do: render templates into the
/// project and contribute manifest/app-config fragments.
pub struct ConstructionContext<'a> {
    engine: &'a TemplateEngine,
    base_path: &'a Path,
    inquiry_result: Option<&'a InquiryResult>,
    package_fragment: Value,
    app_config_fragment: Value,
}

impl<'a> ConstructionContext<'a> {
    pub fn new(
        engine: &'a TemplateEngine,
        base_path: &'a Path,
        inquiry_result: Option<&'a InquiryResult>,
    ) -> Self {
        Self {
            engine,
            base_path,
            inquiry_result,
            package_fragment: Value::Null,
            app_config_fragment: Value::Null,
        }
    }

    pub fn base_path(&self) -> &Path {
        self.base_path
    }

    /// Answers from this plugin's inquiry phase, if any were recorded.
    pub fn inquiry_result(&self) -> Option<&InquiryResult> {
        self.inquiry_result
    }

    /// Render context shared by all template calls: the recorded answers.
    fn render_context(&self, extra: &Value) -> Value {
        let answers = match self.inquiry_result {
            Some(result) => Value::Object(result.clone()),
            None => Value::Object(serde_json::Map::new()),
        };
        deep_merge(answers, extra.clone())
    }

    /// Renders a template source directory into the project root.
    pub fn render(&self, template_dir: &Path, extra: &Value) -> Result<()> {
        self.engine.render_directory(template_dir, self.base_path, &self.render_context(extra))
    }

    /// Renders a single embedded template to `relative_path` in the project.
    pub fn render_file(&self, relative_path: &str, template: &str, extra: &Value) -> Result<()> {
        let target = self.base_path.join(relative_path);
        self.engine.render_file(template, &self.render_context(extra), &target)
    }

    /// Contributes a package-manifest fragment, e.g. new dependency entries.
    pub fn merge_package_config(&mut self, fragment: Value) {
        self.package_fragment = deep_merge(std::mem::take(&mut self.package_fragment), fragment);
    }

    /// Contributes an app-config fragment, folded after all plugins ran.
    pub fn merge_app_config(&mut self, fragment: Value) {
        self.app_config_fragment =
            deep_merge(std::mem::take(&mut self.app_config_fragment), fragment);
    }

    pub fn into_outcome(self) -> ConstructionOutcome {
        ConstructionOutcome {
            package_fragment: self.package_fragment,
            app_config_fragment: self.app_config_fragment,
        }
    }
}

/// Fragments recorded by one construction pass.
#[derive(Debug, Default, Clone)]
pub struct ConstructionOutcome {
    pub package_fragment: Value,
    pub app_config_fragment: Value,
}

/// What a runtime hook is allowed to do: contribute bundler-config fragments.
pub struct RuntimeContext<'a> {
    pub app_config: &'a AppConfig,
    webpack_fragment: Value,
}

impl<'a> RuntimeContext<'a> {
    pub fn new(app_config: &'a AppConfig) -> Self {
        Self { app_config, webpack_fragment: Value::Null }
    }

    /// Deep-merges a bundler-config fragment into this plugin's contribution.
    pub fn merge_webpack_config(&mut self, fragment: Value) {
        self.webpack_fragment = deep_merge(std::mem::take(&mut self.webpack_fragment), fragment);
    }

    pub fn into_fragment(self) -> Value {
        self.webpack_fragment
    }
}

/// Context handed to named script handlers.
pub struct ScriptContext<'a> {
    pub base_path: &'a Path,
    pub app_config: &'a AppConfig,
    pub command: &'a str,
}

/// What a service hook is allowed to do: seed the manifest and declare which
/// plugins a new project starts with.
pub struct ServiceContext<'a> {
    pub inquiry_result: Option<&'a InquiryResult>,
    pub create_options: &'a CreateOptions,
    package_config: Option<Value>,
    registrations: Vec<(String, PluginModule)>,
}

impl<'a> ServiceContext<'a> {
    pub fn new(
        inquiry_result: Option<&'a InquiryResult>,
        create_options: &'a CreateOptions,
    ) -> Self {
        Self { inquiry_result, create_options, package_config: None, registrations: Vec::new() }
    }

    /// Sets the initial package manifest for the project being created.
    pub fn set_package_config(&mut self, config: Value) {
        self.package_config = Some(config);
    }

    /// Registers a plugin the new project starts with. The name is normalized
    /// by the service manager; registration order is execution order.
    pub fn register_plugin(&mut self, name: &str, module: PluginModule) {
        self.registrations.push((name.to_string(), module));
    }

    pub fn into_parts(self) -> (Option<Value>, Vec<(String, PluginModule)>) {
        (self.package_config, self.registrations)
    }
}
