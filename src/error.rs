use std::process::ExitStatus;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}.")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}.")]
    JsonError(#[from] serde_json::Error),

    #[error("Failed to render. Original error: {0}")]
    MinijinjaError(#[from] minijinja::Error),

    #[error("Prompt failed. Original error: {0}")]
    PromptError(#[from] dialoguer::Error),

    #[error("Failed to walk template directory. Original error: {0}")]
    WalkdirError(#[from] walkdir::Error),

    /// A plugin or service name could not be resolved through the registry.
    #[error("Cannot resolve '{name}'. Check that the name is correct.")]
    ResolutionError { name: String },

    #[error("No app config '{config_file}' found in '{base_path}'. Check that the directory is an armature project.")]
    AppConfigMissingError { base_path: String, config_file: String },

    #[error("Cannot proceed: output directory '{output_dir}' already exists. Use --force to overwrite it.")]
    OutputDirectoryExistsError { output_dir: String },

    /// An external command (git, package manager, dev server) exited nonzero.
    #[error("Command '{command}' failed with status: {status}")]
    CommandError { command: String, status: ExitStatus },

    #[error("No registered plugin handles the '{command}' command.")]
    UnknownScriptError { command: String },
}

/// Convenience type alias for Results with armature's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Default error handler that prints the error and exits the program.
///
/// All fatal conditions bubble up to this single handler in `main`; nothing
/// deeper in the call stack terminates the process.
pub fn default_error_handler(err: Error) {
    eprintln!("{}", err);
    std::process::exit(crate::constants::exit_codes::FAILURE);
}
