//! The persisted, user-editable project configuration.
//!
//! `armature.json` aggregates every plugin's contribution at creation time and
//! is read back by the runtime composer, the add-plugin flow and named script
//! dispatch. It is declarative data; loading it never executes anything.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

use crate::constants::APP_CONFIG_FILE;
use crate::error::{Error, Result};
use crate::ioutils::write_file;
use crate::merge::deep_merge;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    /// Resolved plugin names, in registration order, each exactly once.
    #[serde(default)]
    pub plugins: Vec<String>,

    /// User-level bundler overrides. Highest precedence at compose time.
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub webpack_config: Value,

    /// User-level dev server overrides.
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub dev_server_config: Value,

    /// Free-form fields contributed by plugins.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl AppConfig {
    /// Loads the config from `base_path`. A missing file is an error; flows
    /// that tolerate absence use [`AppConfig::load_or_default`].
    pub fn load<P: AsRef<Path>>(base_path: P) -> Result<Self> {
        let base_path = base_path.as_ref();
        let config_path = base_path.join(APP_CONFIG_FILE);
        if !config_path.exists() {
            return Err(Error::AppConfigMissingError {
                base_path: base_path.display().to_string(),
                config_file: APP_CONFIG_FILE.to_string(),
            });
        }
        let content = std::fs::read_to_string(config_path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Loads the config, falling back to the default when the file is absent.
    pub fn load_or_default<P: AsRef<Path>>(base_path: P) -> Result<Self> {
        match Self::load(base_path) {
            Ok(config) => Ok(config),
            Err(Error::AppConfigMissingError { .. }) => Ok(Self::default()),
            Err(err) => Err(err),
        }
    }

    /// Serializes the config to `armature.json` under `base_path`.
    pub fn write<P: AsRef<Path>>(&self, base_path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        write_file(&content, base_path.as_ref().join(APP_CONFIG_FILE))
    }

    /// Appends a plugin name unless it is already registered.
    pub fn register_plugin(&mut self, name: &str) {
        if !self.plugins.iter().any(|existing| existing == name) {
            self.plugins.push(name.to_string());
        }
    }

    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).expect("AppConfig serializes to JSON")
    }

    /// Returns a new config with `fragment` deep-merged in; the later value
    /// wins on conflicts. Fold-friendly.
    pub fn merged_with(&self, fragment: Value) -> Result<Self> {
        let merged = deep_merge(self.to_value(), fragment);
        Ok(serde_json::from_value(merged)?)
    }
}
