//! Package manifest mutation and dependency installation.
//!
//! Owns the working `package.json` for a project: fragments are deep-merged
//! in as plugins are added, the manifest is written once per flow as
//! pretty-printed JSON, and installation is delegated to the external package
//! manager as a single full pass.

use serde_json::{json, Value};
use std::path::{Path, PathBuf};

use crate::constants::{DEFAULT_DEPENDENCY_VERSION, PACKAGE_CONFIG_FILE, PACKAGE_MANAGER};
use crate::error::Result;
use crate::ioutils::{run_command, write_file};
use crate::merge::deep_merge;
use crate::plugin::PluginModule;
use crate::registry::PluginRegistry;

pub struct PackageManager {
    base_path: PathBuf,
    manifest: Value,
}

impl PackageManager {
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self { base_path: base_path.as_ref().to_path_buf(), manifest: json!({}) }
    }

    /// Creates a manager seeded from the existing `package.json`. Used by the
    /// add-plugin flow, where the manifest already exists on disk.
    pub fn create_with_resolve<P: AsRef<Path>>(base_path: P) -> Result<Self> {
        let base_path = base_path.as_ref();
        let manifest_path = base_path.join(PACKAGE_CONFIG_FILE);
        let manifest = if manifest_path.exists() {
            serde_json::from_str(&std::fs::read_to_string(manifest_path)?)?
        } else {
            json!({})
        };
        Ok(Self { base_path: base_path.to_path_buf(), manifest })
    }

    /// Replaces the whole manifest. The service module seeds it this way.
    pub fn set_package_config(&mut self, config: Value) {
        self.manifest = config;
    }

    /// Deep-merges a partial manifest fragment; the later value wins on
    /// scalar conflicts.
    pub fn merge_into_current(&mut self, fragment: Value) {
        self.manifest = deep_merge(std::mem::take(&mut self.manifest), fragment);
    }

    pub fn manifest(&self) -> &Value {
        &self.manifest
    }

    /// Resolves `name` through the registry, records it as a dependency and
    /// returns the loaded module. Resolution failure is fatal for the caller.
    pub fn add_and_install_module(
        &mut self,
        name: &str,
        registry: &PluginRegistry,
    ) -> Result<PluginModule> {
        let module = registry.resolve_plugin(name)?;
        self.merge_into_current(json!({
            "dependencies": { name: DEFAULT_DEPENDENCY_VERSION }
        }));
        Ok(module)
    }

    /// Serializes the manifest to `package.json` with 2-space indentation.
    /// Overwrites unconditionally; repeated calls with unchanged state write
    /// byte-identical output.
    pub fn write_package_config(&self) -> Result<()> {
        let content = serde_json::to_string_pretty(&self.manifest)?;
        write_file(&content, self.base_path.join(PACKAGE_CONFIG_FILE))
    }

    /// Runs the package manager's install command over the whole manifest.
    pub fn install_dependencies(&self) -> Result<()> {
        log::info!("Installing dependencies with {}...", PACKAGE_MANAGER);
        run_command(PACKAGE_MANAGER, &["install"], &self.base_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_into_current_prefers_later_fragments() {
        let mut manager = PackageManager::new("/tmp/project");
        manager.set_package_config(json!({ "name": "demo", "version": "0.1.0" }));
        manager.merge_into_current(json!({ "version": "0.2.0", "private": true }));
        assert_eq!(
            manager.manifest(),
            &json!({ "name": "demo", "version": "0.2.0", "private": true })
        );
    }

    #[test]
    fn write_package_config_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let mut manager = PackageManager::new(dir.path());
        manager.set_package_config(json!({
            "name": "demo",
            "dependencies": { "react": "^18" }
        }));

        manager.write_package_config().unwrap();
        let first = std::fs::read(dir.path().join(PACKAGE_CONFIG_FILE)).unwrap();
        manager.write_package_config().unwrap();
        let second = std::fs::read(dir.path().join(PACKAGE_CONFIG_FILE)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn manifest_is_written_with_two_space_indent() {
        let dir = tempfile::tempdir().unwrap();
        let mut manager = PackageManager::new(dir.path());
        manager.set_package_config(json!({ "name": "demo" }));
        manager.write_package_config().unwrap();
        let content =
            std::fs::read_to_string(dir.path().join(PACKAGE_CONFIG_FILE)).unwrap();
        assert_eq!(content, "{\n  \"name\": \"demo\"\n}");
    }

    #[test]
    fn add_and_install_module_records_dependency() {
        let mut registry = PluginRegistry::new();
        registry.register_plugin("armature-plugin-react", || {
            PluginModule::new("armature-plugin-react")
        });

        let mut manager = PackageManager::new("/tmp/project");
        let module =
            manager.add_and_install_module("armature-plugin-react", &registry).unwrap();
        assert_eq!(module.name, "armature-plugin-react");
        assert_eq!(
            manager.manifest(),
            &json!({ "dependencies": { "armature-plugin-react": "latest" } })
        );
    }

    #[test]
    fn unresolvable_module_fails() {
        let registry = PluginRegistry::new();
        let mut manager = PackageManager::new("/tmp/project");
        assert!(manager.add_and_install_module("armature-plugin-nope", &registry).is_err());
    }

    #[test]
    fn create_with_resolve_reads_existing_manifest() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(PACKAGE_CONFIG_FILE),
            r#"{ "name": "existing" }"#,
        )
        .unwrap();
        let manager = PackageManager::create_with_resolve(dir.path()).unwrap();
        assert_eq!(manager.manifest(), &json!({ "name": "existing" }));
    }
}
