//! Runtime config composition for an already-generated project.
//!
//! At `start` time the persisted app config is loaded, every listed plugin
//! contributes a bundler-config fragment through its runtime hook, the user's
//! own `webpackConfig` fragment is merged last with the highest precedence,
//! and the dev server is launched over the composed configuration. Named
//! script dispatch lives here too, as the other runtime entry point into
//! plugin code.

use serde_json::{json, Value};
use std::path::{Path, PathBuf};

use crate::app_config::AppConfig;
use crate::constants::{
    DEV_SERVER_COMMAND, DEV_SERVER_HOST, DEV_SERVER_PORT, WEBPACK_CONFIG_FILE,
};
use crate::error::{Error, Result};
use crate::ioutils::{run_command, write_file};
use crate::merge::deep_merge;
use crate::plugin::{RuntimeContext, ScriptContext};
use crate::registry::PluginRegistry;

/// Starting bundler configuration before any plugin contributes.
fn base_webpack_config() -> Value {
    json!({
        "mode": "development",
        "entry": "./src/index.js",
        "output": {
            "path": "dist",
            "filename": "bundle.js"
        }
    })
}

/// Starting dev-server configuration.
fn base_dev_server_config() -> Value {
    json!({
        "compress": true,
        "hot": true
    })
}

pub struct DevService<'r> {
    base_path: PathBuf,
    registry: &'r PluginRegistry,
    app_config: AppConfig,
    webpack_config: Value,
    dev_server_config: Value,
}

impl<'r> DevService<'r> {
    pub fn new<P: AsRef<Path>>(
        base_path: P,
        registry: &'r PluginRegistry,
        app_config: AppConfig,
    ) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
            registry,
            app_config,
            webpack_config: base_webpack_config(),
            dev_server_config: base_dev_server_config(),
        }
    }

    /// Loads the persisted app config; an absent file means an empty config,
    /// not an error.
    pub fn load<P: AsRef<Path>>(base_path: P, registry: &'r PluginRegistry) -> Result<Self> {
        let app_config = AppConfig::load_or_default(&base_path)?;
        Ok(Self::new(base_path, registry, app_config))
    }

    /// Runs every listed plugin's runtime hook in order, folding each
    /// contributed fragment into the working bundler config.
    fn run_runtime_plugins(&mut self) -> Result<()> {
        for name in &self.app_config.plugins {
            let module = self.registry.resolve_plugin(name)?;
            match &module.runtime {
                Some(runtime) => {
                    let mut ctx = RuntimeContext::new(&self.app_config);
                    runtime(&mut ctx)?;
                    self.webpack_config =
                        deep_merge(std::mem::take(&mut self.webpack_config), ctx.into_fragment());
                }
                None => {
                    log::info!("Plugin {name} has no runtime hook; skipping");
                }
            }
        }
        Ok(())
    }

    /// Composes the final bundler and dev-server configuration. User-file
    /// overrides always win over plugin contributions; `open: true` is merged
    /// into the dev-server config unconditionally.
    pub fn compose(&mut self) -> Result<()> {
        self.run_runtime_plugins()?;

        if !self.app_config.webpack_config.is_null() {
            self.webpack_config = deep_merge(
                std::mem::take(&mut self.webpack_config),
                self.app_config.webpack_config.clone(),
            );
        }
        if !self.app_config.dev_server_config.is_null() {
            self.dev_server_config = deep_merge(
                std::mem::take(&mut self.dev_server_config),
                self.app_config.dev_server_config.clone(),
            );
        }
        self.dev_server_config =
            deep_merge(std::mem::take(&mut self.dev_server_config), json!({ "open": true }));
        Ok(())
    }

    pub fn webpack_config(&self) -> &Value {
        &self.webpack_config
    }

    pub fn dev_server_config(&self) -> &Value {
        &self.dev_server_config
    }

    /// Composes and launches the dev server on the fixed host and port.
    pub fn start(mut self) -> Result<()> {
        self.compose()?;

        let composed = json!({
            "webpack": self.webpack_config,
            "devServer": self.dev_server_config,
        });
        write_file(
            &serde_json::to_string_pretty(&composed)?,
            self.base_path.join(WEBPACK_CONFIG_FILE),
        )?;

        log::info!("Starting dev server at http://{DEV_SERVER_HOST}:{DEV_SERVER_PORT}...");
        run_command(
            DEV_SERVER_COMMAND,
            &[
                "serve",
                "--config",
                WEBPACK_CONFIG_FILE,
                "--host",
                DEV_SERVER_HOST,
                "--port",
                &DEV_SERVER_PORT.to_string(),
            ],
            &self.base_path,
        )
    }
}

/// Dispatches `command` to the first registered plugin declaring a matching
/// named script handler. No match is a user-facing unknown-command error.
pub fn run_named_script<P: AsRef<Path>>(
    base_path: P,
    registry: &PluginRegistry,
    command: &str,
) -> Result<()> {
    let base_path = base_path.as_ref();
    let app_config = AppConfig::load(base_path)?;

    for name in &app_config.plugins {
        let module = registry.resolve_plugin(name)?;
        if let Some(script) = module.script(command) {
            log::debug!("Dispatching '{command}' to {name}");
            let ctx = ScriptContext { base_path, app_config: &app_config, command };
            return script(&ctx);
        }
    }
    Err(Error::UnknownScriptError { command: command.to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugin::PluginModule;

    fn registry_with_port_plugins() -> PluginRegistry {
        let mut registry = PluginRegistry::new();
        registry.register_plugin("armature-plugin-a", || {
            PluginModule::new("armature-plugin-a").with_runtime(|ctx| {
                ctx.merge_webpack_config(json!({ "port": 3000, "a": true }));
                Ok(())
            })
        });
        registry.register_plugin("armature-plugin-b", || {
            PluginModule::new("armature-plugin-b").with_runtime(|ctx| {
                ctx.merge_webpack_config(json!({ "port": 4000 }));
                Ok(())
            })
        });
        registry
    }

    #[test]
    fn later_plugin_wins_on_runtime_conflicts() {
        let registry = registry_with_port_plugins();
        let app_config = AppConfig {
            plugins: vec!["armature-plugin-a".into(), "armature-plugin-b".into()],
            ..AppConfig::default()
        };
        let mut service = DevService::new("/tmp/project", &registry, app_config);
        service.compose().unwrap();
        assert_eq!(service.webpack_config()["port"], json!(4000));
        assert_eq!(service.webpack_config()["a"], json!(true));
    }

    #[test]
    fn user_webpack_config_has_highest_precedence() {
        let registry = registry_with_port_plugins();
        let app_config = AppConfig {
            plugins: vec!["armature-plugin-a".into(), "armature-plugin-b".into()],
            webpack_config: json!({ "port": 5000 }),
            ..AppConfig::default()
        };
        let mut service = DevService::new("/tmp/project", &registry, app_config);
        service.compose().unwrap();
        assert_eq!(service.webpack_config()["port"], json!(5000));
    }

    #[test]
    fn open_is_always_merged_into_dev_server_config() {
        let registry = PluginRegistry::new();
        let mut service = DevService::new("/tmp/project", &registry, AppConfig::default());
        service.compose().unwrap();
        assert_eq!(service.dev_server_config()["open"], json!(true));
        assert_eq!(service.dev_server_config()["hot"], json!(true));
    }

    #[test]
    fn missing_config_composes_from_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let registry = PluginRegistry::new();
        let mut service = DevService::load(dir.path(), &registry).unwrap();
        service.compose().unwrap();
        assert_eq!(service.webpack_config()["mode"], json!("development"));
    }

    #[test]
    fn plugin_without_runtime_hook_is_skipped() {
        let mut registry = PluginRegistry::new();
        registry.register_plugin("armature-plugin-plain", || {
            PluginModule::new("armature-plugin-plain")
        });
        let app_config = AppConfig {
            plugins: vec!["armature-plugin-plain".into()],
            ..AppConfig::default()
        };
        let mut service = DevService::new("/tmp/project", &registry, app_config);
        service.compose().unwrap();
        assert_eq!(service.webpack_config()["mode"], json!("development"));
    }

    #[test]
    fn named_script_dispatches_to_first_match() {
        let dir = tempfile::tempdir().unwrap();
        let mut registry = PluginRegistry::new();
        registry.register_plugin("armature-plugin-scripted", || {
            PluginModule::new("armature-plugin-scripted").with_script("greet", |ctx| {
                assert_eq!(ctx.command, "greet");
                Ok(())
            })
        });
        let mut config = AppConfig::default();
        config.register_plugin("armature-plugin-scripted");
        config.write(dir.path()).unwrap();

        run_named_script(dir.path(), &registry, "greet").unwrap();
    }

    #[test]
    fn unknown_script_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let registry = PluginRegistry::new();
        AppConfig::default().write(dir.path()).unwrap();
        let err = run_named_script(dir.path(), &registry, "nope").unwrap_err();
        assert!(matches!(err, Error::UnknownScriptError { .. }));
    }
}
