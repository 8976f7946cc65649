//! # PPC CLI Module
//!
//! This module implements the CLI interface for PPC.
//!
//! Every command loads the working set from the data file, acts on it, and
//! writes it back when it changed.
//!
//! ## Available Commands
//!
//! - `init` - Write an empty working set
//! - `add` - Validate and insert a component draft
//! - `remove` - Remove a component by id
//! - `list` - List the components
//! - `summary` - Conformity dashboard
//! - `validate` - Curriculum report
//! - `matrix` - Period matrix
//! - `by-nucleus` - Semester by nucleus summary
//! - `export` - SIGAA CSV sheet
//! - `backup` / `restore` - Backup interchange
//! - `rules` - Print the regulatory rubric
//! - `serve` - Start the HTTP server

mod commands;

use crate::config::AppConfig;
use clap::{Parser, Subcommand};
use ppc_core::PpcError;
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// PPC - curricular component registry and conformity checker
///
/// Registers the components of a teacher-education curriculum and checks it
/// against Res. CNE/CP nº 4/2024.
#[derive(Parser, Debug)]
#[command(name = "ppc")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Working-set backup file (default: curriculo.json)
    #[arg(short, long, global = true)]
    pub data: Option<PathBuf>,

    /// TOML configuration file (default: ppc.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write an empty working set
    Init {
        /// Overwrite an existing data file
        #[arg(short, long)]
        force: bool,
    },

    /// Validate and insert a component draft
    Add {
        /// JSON file holding one component draft
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Remove a component by id
    Remove {
        /// Component id
        #[arg(short, long)]
        id: u64,
    },

    /// List the components
    List,

    /// Show the conformity dashboard
    Summary,

    /// Validate the whole curriculum
    Validate,

    /// Show the period matrix
    Matrix,

    /// Show hours per semester and nucleus
    ByNucleus,

    /// Export the SIGAA CSV sheet
    Export {
        /// Output file path
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Write a backup of the working set
    Backup {
        /// Output file path
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Replace the working set with a backup
    Restore {
        /// Input file path
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Print the regulatory rubric
    Rules,

    /// Start HTTP server
    Serve {
        /// Host to bind to
        #[arg(short = 'H', long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(short, long)]
        port: Option<u16>,
    },
}

/// How a successful command ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Done,
    /// `validate` found the curriculum non-conformant.
    NonConformant,
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Resolve configuration, with `--data` taking precedence over file and env.
pub fn resolve_config(cli: &Cli) -> Result<AppConfig, PpcError> {
    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(data) = &cli.data {
        config.data_file = data.clone();
    }
    Ok(config)
}

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<Outcome, PpcError> {
    let mut config = resolve_config(&cli)?;
    let json_mode = cli.json_mode;
    let data = config.data_file.clone();

    if cli.verbose {
        tracing::info!(data_file = %data.display(), "Using working set");
    }

    match cli.command {
        Some(Commands::Init { force }) => cmd_init(&data, force).map(done),
        Some(Commands::Add { file }) => cmd_add(&data, json_mode, &file).map(done),
        Some(Commands::Remove { id }) => cmd_remove(&data, json_mode, id).map(done),
        Some(Commands::List) => cmd_list(&data, json_mode).map(done),
        Some(Commands::Summary) | None => cmd_summary(&data, json_mode).map(done),
        Some(Commands::Validate) => cmd_validate(&data, json_mode),
        Some(Commands::Matrix) => cmd_matrix(&data, json_mode).map(done),
        Some(Commands::ByNucleus) => cmd_by_nucleus(&data, json_mode).map(done),
        Some(Commands::Export { output }) => cmd_export(&data, &output).map(done),
        Some(Commands::Backup { output }) => cmd_backup(&data, &output).map(done),
        Some(Commands::Restore { input }) => cmd_restore(&data, json_mode, &input).map(done),
        Some(Commands::Rules) => cmd_rules(json_mode).map(done),
        Some(Commands::Serve { host, port }) => {
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                config.port = port;
            }
            cmd_serve(&config).await.map(done)
        }
    }
}

fn done(_: ()) -> Outcome {
    Outcome::Done
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["ppc", "list", "--data", "x.json", "--json-mode"])
            .expect("parse");
        assert!(cli.json_mode);
        assert_eq!(cli.data, Some(PathBuf::from("x.json")));
        assert!(matches!(cli.command, Some(Commands::List)));
    }

    #[test]
    fn parses_kebab_case_command() {
        let cli = Cli::try_parse_from(["ppc", "by-nucleus"]).expect("parse");
        assert!(matches!(cli.command, Some(Commands::ByNucleus)));
    }

    #[test]
    fn serve_overrides_are_optional() {
        let cli = Cli::try_parse_from(["ppc", "serve", "-p", "9000"]).expect("parse");
        assert!(matches!(
            cli.command,
            Some(Commands::Serve {
                host: None,
                port: Some(9000)
            })
        ));
    }

    #[test]
    fn data_flag_wins_over_config_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config_path = dir.path().join("ppc.toml");
        std::fs::write(&config_path, "[data]\nfile = \"arquivo.json\"\n").expect("write");

        let cli = Cli::try_parse_from([
            "ppc",
            "--config",
            config_path.to_str().expect("utf8"),
            "--data",
            "outro.json",
            "list",
        ])
        .expect("parse");
        let config = resolve_config(&cli).expect("config");
        assert_eq!(config.data_file, PathBuf::from("outro.json"));
    }
}
