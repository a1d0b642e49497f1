//! Top-level orchestration of the create-project flow.
//!
//! Drives the service module's inquiry and create work tasks, runs every
//! registered plugin's construction in registration order, folds the
//! contributed config fragments, persists the manifest and app config and
//! finishes with git initialization and dependency installation.

use serde_json::Value;
use std::path::{Path, PathBuf};

use crate::app_config::AppConfig;
use crate::constants::DEFAULT_COMMIT_MESSAGE;
use crate::error::Result;
use crate::inquiry::{prompt_all, InquiryResult};
use crate::ioutils::run_command;
use crate::merge::fold_fragments;
use crate::package_manager::PackageManager;
use crate::plugin::{CreateOptions, ServiceContext, ServiceModule};
use crate::plugin_manager::PluginManager;
use crate::renderer::TemplateEngine;

pub struct ServiceManager {
    base_path: PathBuf,
    create_options: CreateOptions,
    service_module: ServiceModule,
    engine: TemplateEngine,

    inquiry_result: Option<InquiryResult>,
    plugin_managers: Vec<PluginManager>,
    /// One app-config fragment per plugin manager, in registration order
    app_config_fragments: Vec<Value>,
    package_manager: PackageManager,
    app_config: AppConfig,
}

impl ServiceManager {
    pub fn new<P: AsRef<Path>>(
        base_path: P,
        create_options: CreateOptions,
        service_module: ServiceModule,
    ) -> Self {
        let base_path = base_path.as_ref().to_path_buf();
        let package_manager = PackageManager::new(&base_path);
        Self {
            base_path,
            create_options,
            service_module,
            engine: TemplateEngine::new(),
            inquiry_result: None,
            plugin_managers: Vec::new(),
            app_config_fragments: Vec::new(),
            package_manager,
            app_config: AppConfig::default(),
        }
    }

    pub fn plugin_managers(&self) -> &[PluginManager] {
        &self.plugin_managers
    }

    /// The whole creation flow, start to finish.
    pub fn create(mut self) -> Result<()> {
        self.run_service_inquirer()?;
        self.run_create_work_tasks()?;
        self.run_plugins_template()?;
        self.write_package_config()?;
        self.set_app_config()?;

        if self.create_options.git {
            self.init_service_git();
            let message = self
                .create_options
                .commit_message
                .clone()
                .unwrap_or_else(|| DEFAULT_COMMIT_MESSAGE.to_string());
            self.init_first_commit(&message);
        }

        if self.create_options.install {
            self.install()?;
        }

        log::info!("Project created successfully in {}.", self.base_path.display());
        Ok(())
    }

    /// Runs the service module's inquiry, seeded with the creation options.
    pub fn run_service_inquirer(&mut self) -> Result<()> {
        if let Some(inquiry) = &self.service_module.inquiry {
            let questions = inquiry(&self.create_options);
            self.inquiry_result =
                prompt_all(&questions, self.create_options.non_interactive)?;
        }
        Ok(())
    }

    /// Invokes the service capability: it seeds the package manifest and
    /// declares which plugins the new project starts with.
    pub fn run_create_work_tasks(&mut self) -> Result<()> {
        let mut ctx =
            ServiceContext::new(self.inquiry_result.as_ref(), &self.create_options);
        (self.service_module.service)(&mut ctx)?;

        let (package_config, registrations) = ctx.into_parts();
        if let Some(config) = package_config {
            self.package_manager.set_package_config(config);
        }
        for (name, module) in registrations {
            self.register_plugin(&name, module);
        }
        Ok(())
    }

    /// Appends a plugin manager sharing this manager's base path and inquiry
    /// result. Execution order is registration order.
    pub fn register_plugin(&mut self, name: &str, module: crate::plugin::PluginModule) {
        let manager = PluginManager::new(
            &self.base_path,
            name,
            Some(module),
            self.inquiry_result.clone(),
            self.create_options.non_interactive,
        );
        self.plugin_managers.push(manager);
    }

    /// Runs every plugin's construction in registration order, applying
    /// manifest fragments immediately and keeping app-config fragments for
    /// the later fold. File-path collisions between plugins are last writer
    /// wins; the renderer logs a warning when it overwrites.
    pub fn run_plugins_template(&mut self) -> Result<()> {
        for manager in &mut self.plugin_managers {
            let outcome = manager.run_construction(&self.engine)?;
            self.package_manager.merge_into_current(outcome.package_fragment);
            self.app_config_fragments.push(outcome.app_config_fragment);
        }
        Ok(())
    }

    /// Left fold of every plugin's app-config fragment over the initial
    /// config, in registration order; later fragments win on conflicts.
    pub fn collect_app_config(&self) -> Value {
        fold_fragments(
            self.app_config.to_value(),
            self.app_config_fragments.iter().cloned(),
        )
    }

    /// Collects the folded config, appends the ordered plugin list and
    /// persists the result.
    pub fn set_app_config(&mut self) -> Result<()> {
        let mut names: Vec<String> = Vec::new();
        for manager in &self.plugin_managers {
            if !names.contains(&manager.name) {
                names.push(manager.name.clone());
            }
        }

        let collected = self.collect_app_config();
        // The plugin list is authoritative; it replaces whatever the fold
        // produced rather than appending to it.
        let mut config: AppConfig = serde_json::from_value(collected)?;
        config.plugins = names;
        self.app_config = config;
        Self::write_app_config(&self.base_path, &self.app_config)
    }

    /// Serializes `config` into the project's declarative config file.
    pub fn write_app_config(target: &Path, config: &AppConfig) -> Result<()> {
        config.write(target)
    }

    pub fn write_package_config(&self) -> Result<()> {
        self.package_manager.write_package_config()
    }

    /// Best-effort git initialization; a failure is logged, not fatal.
    pub fn init_service_git(&self) {
        log::info!("Initializing git repository...");
        if let Err(err) = run_command("git", &["init"], &self.base_path) {
            log::warn!("git init failed: {err}");
        }
    }

    /// Best-effort first commit over everything written so far.
    pub fn init_first_commit(&self, message: &str) {
        let commit = run_command("git", &["add", "-A"], &self.base_path).and_then(|_| {
            run_command(
                "git",
                &["commit", "-m", message, "--no-verify"],
                &self.base_path,
            )
        });
        if let Err(err) = commit {
            log::warn!("git commit failed: {err}");
        }
    }

    /// Full dependency installation through the external package manager.
    pub fn install(&self) -> Result<()> {
        self.package_manager.install_dependencies()
    }

    pub fn app_config(&self) -> &AppConfig {
        &self.app_config
    }

    pub fn package_manifest(&self) -> &Value {
        self.package_manager.manifest()
    }
}
