//! Feature Launcher CLI
//!
//! Loads an application feature descriptor, resolves it against local
//! artifact repositories, and prints the resulting installation plan.

mod cli;
mod error;

use std::path::PathBuf;

use clap::Parser;
use colored::Colorize;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use cli::Cli;
use error::{CliError, Result};
use launcher_core::{
    Error as CoreError, InstallationPlan, LauncherConfig, calculate_artifacts, create_application,
    prepare_launcher,
};
use launcher_io::LocalRepositoryResolver;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Setup tracing if verbose
    if cli.verbose {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_target(true)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
            .expect("Failed to set tracing subscriber");
        tracing::debug!("Verbose mode enabled");
    }

    let home = cli.home.clone().unwrap_or_else(default_home);
    let mut config = LauncherConfig::new(home).with_startup_mode(cli.mode);
    if let Some(location) = &cli.feature {
        config = config.with_application_file(location);
    }
    for (key, value) in cli.parse_defines().map_err(CliError::user)? {
        config = config.with_variable(key, value);
    }

    let resolver = LocalRepositoryResolver::new(cli.repositories.clone());

    let app = match create_application(&config, &resolver) {
        Ok(app) => app,
        Err(e @ CoreError::Persistence { .. }) => {
            // A failed descriptor-cache write is fatal for the process
            tracing::error!("Error while writing application file: {}", e);
            eprintln!("{}: {}", "error".red().bold(), e);
            std::process::exit(1);
        }
        Err(e) => return Err(e.into()),
    };

    if cli.cache_only {
        return print_artifact_map(&resolver, &app);
    }

    let mut plan = InstallationPlan::new();
    prepare_launcher(&mut plan, &config, &resolver, &app)?;
    print_plan(&app, &plan);
    Ok(())
}

fn default_home() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(".feature-launcher"))
        .unwrap_or_else(|| PathBuf::from("launcher"))
}

fn print_artifact_map(
    resolver: &LocalRepositoryResolver,
    app: &launcher_model::Feature,
) -> Result<()> {
    let map = calculate_artifacts(resolver, app)?;
    let mut entries: Vec<_> = map.iter().collect();
    entries.sort_by_key(|(id, _)| id.to_string());

    println!("{} {} artifacts", "resolved".green().bold(), entries.len());
    for (id, file) in entries {
        println!("  {} -> {}", id, file.display());
    }
    Ok(())
}

fn print_plan(app: &launcher_model::Feature, plan: &InstallationPlan) {
    println!(
        "{} installation plan for {}",
        "prepared".green().bold(),
        app.id
    );

    println!("bundles ({}):", plan.bundle_count());
    for (start_order, files) in plan.bundle_map() {
        println!("  start order {}:", start_order);
        for file in files {
            println!("    {}", file.display());
        }
    }

    if !plan.installable_artifacts().is_empty() {
        println!("installable artifacts ({}):", plan.installable_artifacts().len());
        for file in plan.installable_artifacts() {
            println!("  {}", file.display());
        }
    }

    if !plan.configurations().is_empty() {
        println!("configurations ({}):", plan.configurations().len());
        for configuration in plan.configurations() {
            match &configuration.factory_pid {
                Some(factory_pid) => println!("  {}~{}", factory_pid, configuration.name),
                None => println!("  {}", configuration.name),
            }
        }
    }

    println!(
        "framework properties: {}",
        plan.framework_properties().len()
    );
}
