pub mod args;
pub mod runner;

pub use args::{
    get_log_level_from_verbose, parse_cli, AddArgs, Cli, Commands, CreateArgs, RunArgs,
    StartArgs,
};
pub use runner::run;
