//! view-config
//!
//! Command-line inspection of view framework configuration: which module
//! owns a class, which layout a module resolves to, and where templates
//! are found.

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use serde_json::json;
use std::path::PathBuf;
use tracing::{debug, info};
use view_config::cli::{Cli, Command};
use view_config::format::{OutputFormat, format_table_markdown, table_report};
use view_config::framework::FrameworkTable;
use view_config::logging::{self, LogTarget};
use view_config::manifest::{self, ManifestPaths};
use view_config::types::ClassName;

/// Build the framework table from the manifest selected on the command line
/// or discovered from the environment. Without a manifest, the table holds
/// only the default module.
fn load_table(explicit: Option<PathBuf>) -> Result<FrameworkTable> {
    let paths = ManifestPaths::discover();
    let path = explicit.or_else(|| paths.effective().map(PathBuf::from));
    match path {
        Some(path) => manifest::load_table(&path)
            .with_context(|| format!("loading manifest {}", path.display())),
        None => {
            info!("No manifest found, using defaults");
            Ok(FrameworkTable::new()?)
        }
    }
}

fn print_json(value: &impl serde::Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(&LogTarget::parse(&cli.log), cli.verbose)?;

    let format: OutputFormat = cli.format.into();
    let table = load_table(cli.config)?;
    debug!(modules = table.modules().count(), "framework table ready");

    match cli.command {
        Command::Check => {
            table.load()?;
            let reports = table_report(&table);
            match format {
                OutputFormat::Json => print_json(&reports)?,
                OutputFormat::Markdown => print!("{}", format_table_markdown(&reports)),
            }
        }
        Command::Resolve { class } => {
            let class = ClassName::parse(&class)?;
            let framework = table.resolve(&class);
            match format {
                OutputFormat::Json => print_json(&json!({
                    "class": class,
                    "module": framework.name(),
                    "namespace": framework.configuration().namespace(),
                    "root": framework.configuration().root(),
                }))?,
                OutputFormat::Markdown => {
                    println!("`{}` → `{}`", class, framework.name());
                    println!("- **root**: `{}`", framework.configuration().root().display());
                }
            }
        }
        Command::Layout { module } => {
            let framework = table
                .get(&module)
                .ok_or_else(|| anyhow!("Unknown framework module: {}", module))?;
            let layout = framework.configuration().layout()?;
            match format {
                OutputFormat::Json => print_json(&json!({
                    "module": framework.name(),
                    "layout_name": framework.configuration().layout_name(),
                    "layout": layout.class_name(),
                }))?,
                OutputFormat::Markdown => println!("{}", layout.class_name()),
            }
        }
        Command::Template { class, file } => {
            let class = ClassName::parse(&class)?;
            let framework = table.resolve(&class);
            let found = framework.configuration().find_template(&file).ok_or_else(|| {
                anyhow!(
                    "Template {} not found for {} (module {})",
                    file.display(),
                    class,
                    framework.name()
                )
            })?;
            match format {
                OutputFormat::Json => print_json(&json!({
                    "class": class,
                    "module": framework.name(),
                    "template": found,
                }))?,
                OutputFormat::Markdown => println!("{}", found.display()),
            }
        }
    }

    Ok(())
}
