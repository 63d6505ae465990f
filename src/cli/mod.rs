//! CLI command definitions for view-config
//!
//! This module defines the CLI structure using clap's derive macros.
//! The main entry point is the `Cli` struct which contains subcommands.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::format::OutputFormat;

/// Output format flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum FormatArg {
    /// Markdown (default)
    #[default]
    Markdown,
    /// JSON
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Markdown => OutputFormat::Markdown,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

/// Inspect and validate view framework configuration
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to manifest file (default: $VIEW_CONFIG_PATH, ./views.yaml, user config dir)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Logging output: 0/off, 1/stdout, 2/stderr (default), or filename
    #[arg(short, long, default_value = "2", global = true)]
    pub log: String,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = FormatArg::Markdown, global = true)]
    pub format: FormatArg,

    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build every framework module, load it, and report its settings
    Check,

    /// Show which framework module owns a class
    Resolve {
        /// Qualified class name, e.g. Admin::Views::Dashboard
        #[arg(value_name = "CLASS")]
        class: String,
    },

    /// Resolve the layout configured for a framework module
    Layout {
        /// Module name, e.g. Admin::View (default: View)
        #[arg(value_name = "MODULE", default_value = "View")]
        module: String,
    },

    /// Find a template through the load paths of the class's owning module
    Template {
        /// Qualified class name used to pick the owning module
        #[arg(value_name = "CLASS")]
        class: String,

        /// Template path relative to the module's root or load paths
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_resolve() {
        let cli = Cli::parse_from(["view-config", "resolve", "Admin::Views::Index", "-f", "json"]);
        assert_eq!(cli.format, FormatArg::Json);
        match cli.command {
            Command::Resolve { class } => assert_eq!(class, "Admin::Views::Index"),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_layout_defaults_to_default_module() {
        let cli = Cli::parse_from(["view-config", "layout"]);
        match cli.command {
            Command::Layout { module } => assert_eq!(module, "View"),
            other => panic!("unexpected command: {other:?}"),
        }
        assert_eq!(cli.log, "2");
    }
}
