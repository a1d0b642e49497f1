//! Per-plugin lifecycle management.
//!
//! One manager exists per registered plugin and walks the one-directional
//! lifecycle `Registered → Installed → Inquired → Constructed`. A state is
//! skipped only when the module lacks the matching capability.

use std::path::{Path, PathBuf};

use crate::app_config::AppConfig;
use crate::constants::{ORG_SCOPE, PLUGIN_PREFIX};
use crate::error::Result;
use crate::inquiry::{prompt_all, InquiryResult};
use crate::package_manager::PackageManager;
use crate::plugin::{ConstructionContext, ConstructionOutcome, PluginModule};
use crate::registry::PluginRegistry;
use crate::renderer::TemplateEngine;

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub enum PluginPhase {
    Registered,
    Installed,
    Inquired,
    Constructed,
}

pub struct PluginManager {
    /// Normalized plugin package name
    pub name: String,
    module: Option<PluginModule>,
    base_path: PathBuf,
    /// Answers from the inquiry phase; set at most once
    pub inquiry_result: Option<InquiryResult>,
    phase: PluginPhase,
    non_interactive: bool,
}

impl PluginManager {
    /// Creates a manager for a module registered during project creation.
    /// The shared service inquiry result seeds this manager's answers.
    pub fn new<P: AsRef<Path>>(
        base_path: P,
        name: &str,
        module: Option<PluginModule>,
        inquiry_result: Option<InquiryResult>,
        non_interactive: bool,
    ) -> Self {
        let phase =
            if module.is_some() { PluginPhase::Installed } else { PluginPhase::Registered };
        Self {
            name: normalize_plugin_name(name),
            module,
            base_path: base_path.as_ref().to_path_buf(),
            inquiry_result,
            phase,
            non_interactive,
        }
    }

    /// Manager for the add-plugin flow: the module is resolved later by
    /// [`PluginManager::install`], and the project's config must exist.
    pub fn create_by_add_command<P: AsRef<Path>>(
        base_path: P,
        name: &str,
        non_interactive: bool,
    ) -> Result<(Self, AppConfig, PackageManager)> {
        let base_path = base_path.as_ref();
        let app_config = AppConfig::load(base_path).inspect_err(|_| {
            log::warn!(
                "No armature config found in '{}'; check that the directory is correct",
                base_path.display()
            );
        })?;
        let package_manager = PackageManager::create_with_resolve(base_path)?;
        Ok((Self::new(base_path, name, None, None, non_interactive), app_config, package_manager))
    }

    pub fn phase(&self) -> PluginPhase {
        self.phase
    }

    /// Full add-time lifecycle: resolve and install the module, register it
    /// in the app config, inquire, construct, persist the manifest and run a
    /// full dependency install. Resolution failure aborts the whole
    /// operation; there is no rollback of earlier steps.
    pub fn install(
        &mut self,
        registry: &PluginRegistry,
        package_manager: &mut PackageManager,
        app_config: &mut AppConfig,
        engine: &TemplateEngine,
    ) -> Result<()> {
        log::info!("Installing plugin {}...", self.name);

        self.module = Some(package_manager.add_and_install_module(&self.name, registry)?);
        self.phase = PluginPhase::Installed;

        app_config.register_plugin(&self.name);

        self.run_plugin_inquirer(app_config)?;

        let outcome = self.run_construction(engine)?;
        package_manager.merge_into_current(outcome.package_fragment);
        *app_config = app_config.merged_with(outcome.app_config_fragment)?;

        package_manager.write_package_config()?;
        package_manager.install_dependencies()
    }

    /// Runs the module's inquiry capability once, against a snapshot of the
    /// current app config. In non-interactive mode the result stays empty no
    /// matter what the module would ask.
    pub fn run_plugin_inquirer(&mut self, app_config: &AppConfig) -> Result<()> {
        if self.phase >= PluginPhase::Inquired {
            return Ok(());
        }
        if let Some(module) = &self.module {
            if let Some(inquiry) = &module.inquiry {
                let questions = inquiry(app_config);
                self.inquiry_result = prompt_all(&questions, self.non_interactive)?;
            }
        }
        self.phase = PluginPhase::Inquired;
        Ok(())
    }

    /// Runs the module's construction capability and returns the fragments it
    /// contributed. A module without the capability is a logged no-op.
    pub fn run_construction(&mut self, engine: &TemplateEngine) -> Result<ConstructionOutcome> {
        let outcome = match self.module.as_ref().and_then(|module| module.construction.as_ref()) {
            Some(construction) => {
                let mut ctx = ConstructionContext::new(
                    engine,
                    &self.base_path,
                    self.inquiry_result.as_ref(),
                );
                construction(&mut ctx)?;
                ctx.into_outcome()
            }
            None => {
                log::info!(
                    "Plugin {} has no construction hook; skipping template step",
                    self.name
                );
                ConstructionOutcome::default()
            }
        };
        self.phase = PluginPhase::Constructed;
        Ok(outcome)
    }

    pub fn module(&self) -> Option<&PluginModule> {
        self.module.as_ref()
    }
}

/// Returns `name` unchanged when it already carries the conventional plugin
/// prefix or the organization scope; otherwise prepends the prefix. Purely
/// string-level, no collision detection.
pub fn normalize_plugin_name(name: &str) -> String {
    if name.starts_with(PLUGIN_PREFIX) || name.starts_with(ORG_SCOPE) {
        name.to_string()
    } else {
        format!("{PLUGIN_PREFIX}{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bare_names_get_the_plugin_prefix() {
        assert_eq!(normalize_plugin_name("react"), "armature-plugin-react");
    }

    #[test]
    fn prefixed_and_scoped_names_are_unchanged() {
        assert_eq!(
            normalize_plugin_name("armature-plugin-react"),
            "armature-plugin-react"
        );
        assert_eq!(
            normalize_plugin_name("@armature/custom-plugin"),
            "@armature/custom-plugin"
        );
    }

    #[test]
    fn inquiry_runs_once_and_skips_without_capability() {
        let module = PluginModule::new("armature-plugin-plain");
        let mut manager = PluginManager::new("/tmp/p", "plain", Some(module), None, true);
        manager.run_plugin_inquirer(&AppConfig::default()).unwrap();
        assert!(manager.inquiry_result.is_none());
        assert_eq!(manager.phase(), PluginPhase::Inquired);

        // A second pass is a no-op; the result stays immutable.
        manager.run_plugin_inquirer(&AppConfig::default()).unwrap();
        assert!(manager.inquiry_result.is_none());
    }

    #[test]
    fn non_interactive_inquiry_leaves_result_empty() {
        let module = PluginModule::new("armature-plugin-asking").with_inquiry(|_config| {
            vec![crate::inquiry::Question::text("language", "Which language?")]
        });
        let mut manager = PluginManager::new("/tmp/p", "asking", Some(module), None, true);
        manager.run_plugin_inquirer(&AppConfig::default()).unwrap();
        assert!(manager.inquiry_result.is_none());
    }

    #[test]
    fn construction_without_capability_is_a_no_op() {
        let engine = TemplateEngine::new();
        let module = PluginModule::new("armature-plugin-plain");
        let mut manager = PluginManager::new("/tmp/p", "plain", Some(module), None, true);
        let outcome = manager.run_construction(&engine).unwrap();
        assert_eq!(outcome.package_fragment, serde_json::Value::Null);
        assert_eq!(manager.phase(), PluginPhase::Constructed);
    }

    #[test]
    fn construction_collects_fragments() {
        let engine = TemplateEngine::new();
        let module =
            PluginModule::new("armature-plugin-frag").with_construction(|ctx| {
                ctx.merge_package_config(json!({ "dependencies": { "react": "^18" } }));
                ctx.merge_app_config(json!({ "webpackConfig": { "port": 3000 } }));
                Ok(())
            });
        let mut manager = PluginManager::new("/tmp/p", "frag", Some(module), None, true);
        let outcome = manager.run_construction(&engine).unwrap();
        assert_eq!(
            outcome.package_fragment,
            json!({ "dependencies": { "react": "^18" } })
        );
        assert_eq!(
            outcome.app_config_fragment,
            json!({ "webpackConfig": { "port": 3000 } })
        );
    }

    #[test]
    fn install_flow_registers_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let engine = TemplateEngine::new();
        let mut registry = PluginRegistry::new();
        registry.register_plugin("armature-plugin-react", || {
            PluginModule::new("armature-plugin-react").with_construction(|ctx| {
                ctx.merge_package_config(json!({ "dependencies": { "react": "^18" } }));
                Ok(())
            })
        });

        AppConfig::default().write(dir.path()).unwrap();
        let (mut manager, mut app_config, mut package_manager) =
            PluginManager::create_by_add_command(dir.path(), "react", true).unwrap();

        // Skip the external install; everything before it is the contract
        // under test.
        manager.module =
            Some(package_manager.add_and_install_module(&manager.name, &registry).unwrap());
        manager.phase = PluginPhase::Installed;
        app_config.register_plugin(&manager.name);
        manager.run_plugin_inquirer(&app_config).unwrap();
        let outcome = manager.run_construction(&engine).unwrap();
        package_manager.merge_into_current(outcome.package_fragment);
        package_manager.write_package_config().unwrap();

        assert_eq!(app_config.plugins, vec!["armature-plugin-react"]);
        let manifest: serde_json::Value = serde_json::from_str(
            &std::fs::read_to_string(dir.path().join("package.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(manifest["dependencies"]["react"], json!("^18"));
    }

    #[test]
    fn add_command_requires_existing_config() {
        let dir = tempfile::tempdir().unwrap();
        let result = PluginManager::create_by_add_command(dir.path(), "react", true);
        assert!(result.is_err());
    }
}
