//! `acreg` - CLI for the aircraft registry
//!
//! This binary runs the web server and inspects stored records.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::Parser;

use aircraft_registry::cli::output::{format_list, format_record};
use aircraft_registry::cli::{Cli, Command, ConfigCommand, ListCommand, ShowCommand};
use aircraft_registry::{init_logging, server, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    let load = || Config::load_from(cli.config.clone()).context("failed to load configuration");

    match cli.command {
        Command::Serve(serve_cmd) => {
            let config = Config::load_with_listen(cli.config.clone(), serve_cmd.listen.as_deref())
                .context("failed to load configuration")?;
            server::run(&config).await?;
            Ok(())
        }
        Command::List(list_cmd) => handle_list(&load()?, &list_cmd).await,
        Command::Show(show_cmd) => handle_show(&load()?, &show_cmd).await,
        // Validation reports a broken file instead of failing to load it
        Command::Config(ConfigCommand::Validate { file }) => {
            handle_validate(file.or_else(|| cli.config.clone()))
        }
        Command::Config(config_cmd) => handle_config(&load()?, cli.config.as_deref(), config_cmd),
    }
}

async fn handle_list(config: &Config, cmd: &ListCommand) -> anyhow::Result<()> {
    let service = server::build_service(config);
    let records = service.list().await?;
    let output = format_list(&records, cmd.format)?;
    if !output.is_empty() {
        println!("{output}");
    }
    Ok(())
}

async fn handle_show(config: &Config, cmd: &ShowCommand) -> anyhow::Result<()> {
    let service = server::build_service(config);
    let Some(record) = service.get(&cmd.id).await? else {
        bail!("aircraft '{}' not found", cmd.id);
    };
    println!("{}", format_record(&record, cmd.json)?);
    Ok(())
}

fn handle_config(
    config: &Config,
    config_path: Option<&Path>,
    cmd: ConfigCommand,
) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Server]");
                println!("  Listen:             {}", config.server.listen);
                println!("  Max body (bytes):   {}", config.server.max_body_bytes);
                println!();
                println!("[Storage]");
                println!("  Database path:      {}", config.database_path().display());
                println!("  Collection:         {}", config.storage.collection);
                println!();
                println!("[Uploads]");
                println!("  Directory:          {}", config.uploads_dir().display());
                println!("  URL prefix:         {}", config.uploads.url_prefix);
            }
        }
        ConfigCommand::Path => {
            let path = config_path.map_or_else(Config::default_config_path, Path::to_path_buf);
            println!("{}", path.display());
        }
        ConfigCommand::Validate { file } => {
            return handle_validate(file.or_else(|| config_path.map(Path::to_path_buf)));
        }
    }
    Ok(())
}

fn handle_validate(file: Option<PathBuf>) -> anyhow::Result<()> {
    let path = file.clone().unwrap_or_else(Config::default_config_path);
    match Config::load_from(file) {
        Ok(_) => {
            println!("Configuration is valid: {}", path.display());
            Ok(())
        }
        Err(e) => bail!("invalid configuration in {}: {e}", path.display()),
    }
}
