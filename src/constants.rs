//! Constants used throughout the armature application

/// Conventional namespace prefix for plugin package names
pub const PLUGIN_PREFIX: &str = "armature-plugin-";

/// Organization scope accepted as an already-namespaced plugin name
pub const ORG_SCOPE: &str = "@armature";

/// Persisted app configuration file at the project root
pub const APP_CONFIG_FILE: &str = "armature.json";

/// Package manifest file at the project root
pub const PACKAGE_CONFIG_FILE: &str = "package.json";

/// Composed bundler configuration written before the dev server starts
pub const WEBPACK_CONFIG_FILE: &str = "webpack.config.json";

/// External package manager invoked for dependency installation
pub const PACKAGE_MANAGER: &str = "yarn";

/// Command used to launch the bundler dev server
pub const DEV_SERVER_COMMAND: &str = "webpack";

/// Dev server bind address. Not configurable; a known limitation carried
/// over from the current behavior.
pub const DEV_SERVER_HOST: &str = "127.0.0.1";

/// Dev server port. Same limitation as [`DEV_SERVER_HOST`].
pub const DEV_SERVER_PORT: u16 = 8080;

/// Version recorded for a dependency when the plugin does not declare one
pub const DEFAULT_DEPENDENCY_VERSION: &str = "latest";

/// Commit message used when none is given on the command line
pub const DEFAULT_COMMIT_MESSAGE: &str = "initial commit";

/// Exit codes
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const FAILURE: i32 = 1;
}

/// Verbosity levels
pub mod verbosity {
    pub const OFF: u8 = 0;
    pub const INFO: u8 = 1;
    pub const DEBUG: u8 = 2;
    pub const TRACE: u8 = 3;
}
