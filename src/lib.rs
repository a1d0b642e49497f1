/// Handles argument parsing and command dispatch.
pub mod cli;

/// Defines custom error types.
pub mod error;

/// Shared constants: naming conventions, file names, exit codes.
pub mod constants;

/// Deep merge over JSON configuration fragments.
pub mod merge;

/// User input and interaction handling.
pub mod inquiry;

/// Plugin and service module capability contracts.
pub mod plugin;

/// The loader boundary resolving plugin and service names to modules.
pub mod registry;

/// Package manifest mutation and dependency installation.
pub mod package_manager;

/// Per-plugin lifecycle management.
pub mod plugin_manager;

/// Top-level orchestration of project creation.
pub mod service_manager;

/// The persisted project-level configuration.
pub mod app_config;

/// Template parsing and rendering functionality.
pub mod renderer;

/// Runtime config composition and named script dispatch.
pub mod runtime;

/// Built-in react service and plugin.
pub mod builtins;

/// A set of helpers for working with the file system and external commands.
pub mod ioutils;
