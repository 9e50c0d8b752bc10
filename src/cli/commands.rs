//! Command dispatch
//!
//! Each command loads its services from the [`ServiceContainer`] and prints
//! data to stdout, status to stderr.

use std::io::{self, Write};
use std::path::Path;

use clap::CommandFactory;
use tracing::{debug, instrument};

use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, Settings};
use crate::domain::{export_json, render_zone, TreeDisplay};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;

/// Execute the parsed command line.
pub fn execute(cli: Cli) -> CliResult<()> {
    if let Commands::Completion { shell } = cli.command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        clap_complete::generate(shell, &mut cmd, name, &mut io::stdout());
        return Ok(());
    }

    let settings = Settings::load(cli.config.as_deref())?;
    let container = ServiceContainer::new(settings);

    match cli.command {
        Commands::Create {
            base,
            did,
            output,
            ttl,
        } => cmd_create(&container, &base, &did, output.as_deref(), ttl),
        Commands::Resolve {
            did,
            output,
            zone,
            tree,
        } => cmd_resolve(&container, &did, output.as_deref(), zone.as_deref(), tree),
        Commands::Config { command } => cmd_config(&container, command, cli.config.as_deref()),
        Commands::Completion { .. } => Ok(()),
    }
}

#[instrument(skip(container))]
fn cmd_create(
    container: &ServiceContainer,
    base: &str,
    did: &Path,
    output: Option<&Path>,
    ttl: Option<u32>,
) -> CliResult<()> {
    let ttl = ttl.unwrap_or(container.settings.ttl);
    let service = container.document_service();
    let records = service.create_records(did, base, ttl)?;

    match output {
        Some(path) => {
            service.write_zone(&records, path)?;
            output::action("Created", &format!("{} records in {}", records.len(), path.display()));
        }
        None => write_stdout(render_zone(&records).as_bytes())?,
    }
    Ok(())
}

#[instrument(skip(container))]
fn cmd_resolve(
    container: &ServiceContainer,
    did: &str,
    output: Option<&Path>,
    zone: Option<&Path>,
    tree: bool,
) -> CliResult<()> {
    let resolver = container.resolver(zone)?;
    let document = resolver.resolve(did)?;
    debug!("resolved {} nodes", document.len());

    if tree {
        output::status(&document.to_tree_string());
    }

    match output {
        Some(path) => {
            container.document_service().write_json(&document, path)?;
            output::action("Resolved", &format!("{did} into {}", path.display()));
        }
        None => {
            let mut json = export_json(&document)?;
            json.push(b'\n');
            write_stdout(&json)?;
        }
    }
    Ok(())
}

fn cmd_config(
    container: &ServiceContainer,
    command: ConfigCommands,
    explicit: Option<&Path>,
) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let toml = container.settings.to_toml()?;
            output::info(&toml);
        }
        ConfigCommands::Path => {
            match global_config_path() {
                Some(path) if path.exists() => output::detail(&format!("global: {}", path.display())),
                Some(path) => output::detail(&format!("global: {} (not found)", path.display())),
                None => output::warning("no config directory for this platform"),
            }
            if let Some(path) = explicit {
                output::detail(&format!("explicit: {}", path.display()));
            }
        }
        ConfigCommands::Template => output::info(&Settings::template()),
    }
    Ok(())
}

fn write_stdout(bytes: &[u8]) -> CliResult<()> {
    let mut stdout = io::stdout().lock();
    stdout
        .write_all(bytes)
        .and_then(|_| stdout.flush())
        .map_err(|e| CliError::Infra(InfraError::io("write to stdout", e)))
}
