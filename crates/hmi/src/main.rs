mod cli; // Report formatting

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use hmi_core::base::Result;
use hmi_core::plugin_system::{DefaultPluginManager, PluginManager, PluginManifest, PluginSystemError};
use log::{LevelFilter, info};

// --- Core Plugins for Static Registration ---
use core_logging::{LoggingPlugin, PLUGIN_NAME as LOGGING_PLUGIN};

/// HMI plugin host: resolves a plugin manifest into an initialization order
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct CliArgs {
    /// Simple ping command for testing
    #[arg(long)]
    ping: bool,

    /// Log resolution steps at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve and initialize every plugin in a manifest, then unload them
    Resolve {
        /// Plugin manifest (.json, .toml, .yaml)
        manifest: PathBuf,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Check a manifest and print the initialization order without initializing
    Check {
        manifest: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// List the plugins a manifest registers
    List {
        manifest: PathBuf,
        #[arg(long)]
        json: bool,
    },
}

/// Register the static core plugins followed by every manifest entry.
///
/// Manifest entries are backed by declared plugins. `core-logging` is always
/// the built-in logging plugin: a manifest entry of that name only fixes its
/// position, and may not declare dependencies the plugin doesn't have.
async fn build_manager(manifest_path: &Path, level: LevelFilter) -> Result<DefaultPluginManager> {
    let manifest = PluginManifest::from_path(manifest_path)?;

    let logging_entry = manifest.plugins.iter().find(|entry| entry.name == LOGGING_PLUGIN);
    if let Some(entry) = logging_entry {
        if !entry.dependencies.is_empty() {
            return Err(PluginSystemError::ManifestError {
                path: manifest_path.to_path_buf(),
                message: format!("'{}' is built in and cannot declare dependencies", LOGGING_PLUGIN),
                source: None,
            }
            .into());
        }
    }

    let mut loader = manifest.declared_loader();
    LoggingPlugin::register(&mut loader, level);
    let manager = DefaultPluginManager::new(Arc::new(loader));

    if logging_entry.is_none() {
        manager.register(LoggingPlugin::descriptor()).await?;
    }
    for descriptor in manifest.descriptors() {
        let descriptor = if descriptor.name() == LOGGING_PLUGIN {
            LoggingPlugin::descriptor()
        } else {
            descriptor
        };
        manager.register(descriptor).await?;
    }
    Ok(manager)
}

async fn run_resolve(manifest: &Path, level: LevelFilter, json: bool) -> Result<()> {
    let manager = build_manager(manifest, level).await?;
    manager.resolve().await?;
    let order = manager.load_order().await;
    if json {
        cli::print_load_order_json(&order);
    } else {
        cli::print_load_order("Load order:", &order);
    }
    let finalized = manager.unload().await;
    info!("Unloaded {} plugins", finalized.len());
    Ok(())
}

async fn run_check(manifest: &Path, level: LevelFilter, json: bool) -> Result<()> {
    let manager = build_manager(manifest, level).await?;
    let order = manager.plan().await?;
    if json {
        cli::print_load_order_json(&order);
    } else {
        cli::print_load_order("Manifest OK. Initialization order:", &order);
    }
    Ok(())
}

async fn run_list(manifest: &Path, level: LevelFilter, json: bool) -> Result<()> {
    let manager = build_manager(manifest, level).await?;
    let registry = manager.registry().lock().await;
    let plugins = registry.plugins();
    if json {
        cli::print_plugins_json(&plugins);
    } else {
        cli::print_plugins(&plugins);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();

    if args.ping {
        println!("pong");
        return ExitCode::SUCCESS;
    }

    let level = if args.verbose { LevelFilter::Debug } else { LevelFilter::Warn };

    let (result, json) = match &args.command {
        Some(Commands::Resolve { manifest, json }) => (run_resolve(manifest, level, *json).await, *json),
        Some(Commands::Check { manifest, json }) => (run_check(manifest, level, *json).await, *json),
        Some(Commands::List { manifest, json }) => (run_list(manifest, level, *json).await, *json),
        None => {
            println!("No command specified. Run with --help for usage.");
            return ExitCode::SUCCESS;
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if json {
                cli::print_error_json(&e);
            } else {
                cli::print_error(&e);
            }
            ExitCode::FAILURE
        }
    }
}
