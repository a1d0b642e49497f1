use crate::constants::{exit_codes, verbosity};
use clap::{error::ErrorKind, CommandFactory, Parser, Subcommand};
use log::LevelFilter;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = r#"{about-section}
{usage-heading} {usage}

{all-args}
{after-help}
"#;

/// CLI arguments for armature.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new project from a service module.
    Create(CreateArgs),
    /// Add a plugin to an existing project.
    Add(AddArgs),
    /// Start the dev server for the current project.
    Start(StartArgs),
    /// Run a named script declared by one of the project's plugins.
    Run(RunArgs),
}

#[derive(clap::Args, Debug, Clone)]
pub struct CreateArgs {
    /// Directory to create the project in.
    #[arg(value_name = "NAME")]
    pub name: String,

    /// Service module driving the creation (defaults to the react service).
    #[arg(short, long, default_value = crate::builtins::REACT_SERVICE)]
    pub service: String,

    /// Force overwrite of an existing output directory.
    #[arg(short, long)]
    pub force: bool,

    /// Skip git initialization and the first commit.
    #[arg(long = "no-git")]
    pub no_git: bool,

    /// Skip dependency installation after generation.
    #[arg(long = "no-install")]
    pub no_install: bool,

    /// Commit message for the first commit.
    #[arg(long = "commit-message")]
    pub commit_message: Option<String>,

    /// Disable interactive prompts; every inquiry phase is skipped.
    #[arg(long = "non-interactive")]
    pub non_interactive: bool,

    /// Increase logging verbosity (`-v`, `-vv`, `-vvv`).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(clap::Args, Debug, Clone)]
pub struct AddArgs {
    /// Plugin name; the `armature-plugin-` prefix is added when absent.
    #[arg(value_name = "PLUGIN")]
    pub name: String,

    /// Project directory (defaults to the current directory).
    #[arg(short, long, default_value = ".")]
    pub dir: PathBuf,

    /// Disable interactive prompts.
    #[arg(long = "non-interactive")]
    pub non_interactive: bool,

    /// Increase logging verbosity (`-v`, `-vv`, `-vvv`).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(clap::Args, Debug, Clone)]
pub struct StartArgs {
    /// Project directory (defaults to the current directory).
    #[arg(short, long, default_value = ".")]
    pub dir: PathBuf,

    /// Increase logging verbosity (`-v`, `-vv`, `-vvv`).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(clap::Args, Debug, Clone)]
pub struct RunArgs {
    /// Script command to dispatch to the project's plugins.
    #[arg(value_name = "COMMAND")]
    pub command: String,

    /// Project directory (defaults to the current directory).
    #[arg(short, long, default_value = ".")]
    pub dir: PathBuf,

    /// Increase logging verbosity (`-v`, `-vv`, `-vvv`).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Commands {
    /// Verbosity count of the selected subcommand.
    pub fn verbose(&self) -> u8 {
        match self {
            Commands::Create(args) => args.verbose,
            Commands::Add(args) => args.verbose,
            Commands::Start(args) => args.verbose,
            Commands::Run(args) => args.verbose,
        }
    }
}

/// Parse command line arguments with custom handling for missing required inputs.
pub fn parse_cli() -> Cli {
    Cli::try_parse().unwrap_or_else(|e| {
        if e.kind() == ErrorKind::MissingRequiredArgument {
            let mut command = Cli::command().help_template(HELP_TEMPLATE);
            if let Err(print_err) = command.print_help() {
                eprintln!("Failed to display help information: {print_err}");
            } else {
                println!();
            }
            std::process::exit(exit_codes::FAILURE);
        } else {
            e.exit();
        }
    })
}

/// Map `-v` counts to the appropriate log level.
pub fn get_log_level_from_verbose(verbose_count: u8) -> LevelFilter {
    match verbose_count {
        verbosity::OFF => LevelFilter::Error,
        verbosity::INFO => LevelFilter::Info,
        verbosity::DEBUG => LevelFilter::Debug,
        verbosity::TRACE.. => LevelFilter::Trace,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_verbose_flags_to_log_filters() {
        use crate::constants::verbosity;
        assert_eq!(get_log_level_from_verbose(verbosity::OFF), LevelFilter::Error);
        assert_eq!(get_log_level_from_verbose(verbosity::INFO), LevelFilter::Info);
        assert_eq!(get_log_level_from_verbose(verbosity::DEBUG), LevelFilter::Debug);
        assert_eq!(get_log_level_from_verbose(verbosity::TRACE), LevelFilter::Trace);
        assert_eq!(get_log_level_from_verbose(verbosity::TRACE + 1), LevelFilter::Trace);
    }

    #[test]
    fn parses_create_with_defaults() {
        let cli = Cli::parse_from(["armature", "create", "my-app"]);
        let Commands::Create(args) = cli.command else {
            panic!("expected create subcommand");
        };
        assert_eq!(args.name, "my-app");
        assert_eq!(args.service, crate::builtins::REACT_SERVICE);
        assert!(!args.no_git);
        assert!(!args.non_interactive);
    }

    #[test]
    fn parses_create_with_flags() {
        let cli = Cli::parse_from([
            "armature",
            "create",
            "my-app",
            "--no-git",
            "--no-install",
            "--non-interactive",
            "--commit-message",
            "bootstrap",
            "-vv",
        ]);
        let Commands::Create(args) = cli.command else {
            panic!("expected create subcommand");
        };
        assert!(args.no_git);
        assert!(args.no_install);
        assert!(args.non_interactive);
        assert_eq!(args.commit_message.as_deref(), Some("bootstrap"));
        assert_eq!(args.verbose, 2);
    }

    #[test]
    fn parses_add_and_run() {
        let cli = Cli::parse_from(["armature", "add", "react", "--dir", "proj"]);
        let Commands::Add(args) = cli.command else {
            panic!("expected add subcommand");
        };
        assert_eq!(args.name, "react");
        assert_eq!(args.dir, PathBuf::from("proj"));

        let cli = Cli::parse_from(["armature", "run", "lint"]);
        let Commands::Run(args) = cli.command else {
            panic!("expected run subcommand");
        };
        assert_eq!(args.command, "lint");
        assert_eq!(args.dir, PathBuf::from("."));
    }
}
