//! Dispatches parsed CLI commands into the orchestrator flows.

use crate::{
    cli::{AddArgs, Commands, CreateArgs, RunArgs, StartArgs},
    error::Result,
    ioutils::{create_dir_all, get_output_dir},
    plugin::CreateOptions,
    plugin_manager::PluginManager,
    registry::PluginRegistry,
    renderer::TemplateEngine,
    runtime::{run_named_script, DevService},
    service_manager::ServiceManager,
};

/// Main entry point for CLI execution.
pub fn run(command: Commands) -> Result<()> {
    let registry = PluginRegistry::with_builtins();
    match command {
        Commands::Create(args) => run_create(args, &registry),
        Commands::Add(args) => run_add(args, &registry),
        Commands::Start(args) => run_start(args, &registry),
        Commands::Run(args) => run_script(args, &registry),
    }
}

fn run_create(args: CreateArgs, registry: &PluginRegistry) -> Result<()> {
    let output_dir = get_output_dir(&args.name, args.force)?;
    create_dir_all(&output_dir)?;

    let service_module = registry.resolve_service(&args.service)?;
    let create_options = CreateOptions {
        project_name: args.name.clone(),
        git: !args.no_git,
        install: !args.no_install,
        non_interactive: args.non_interactive,
        commit_message: args.commit_message,
    };

    ServiceManager::new(&output_dir, create_options, service_module).create()
}

fn run_add(args: AddArgs, registry: &PluginRegistry) -> Result<()> {
    let engine = TemplateEngine::new();
    let (mut manager, mut app_config, mut package_manager) =
        PluginManager::create_by_add_command(&args.dir, &args.name, args.non_interactive)?;

    manager.install(registry, &mut package_manager, &mut app_config, &engine)?;
    app_config.write(&args.dir)?;

    log::info!("Plugin {} added successfully.", manager.name);
    Ok(())
}

fn run_start(args: StartArgs, registry: &PluginRegistry) -> Result<()> {
    DevService::load(&args.dir, registry)?.start()
}

fn run_script(args: RunArgs, registry: &PluginRegistry) -> Result<()> {
    run_named_script(&args.dir, registry, &args.command)
}
