//! # Chipgraph CLI Module
//!
//! This module implements the CLI interface for Chipgraph.
//!
//! ## Available Commands
//!
//! - `run` - Execute a circuit script and print every evaluation (default)
//! - `check` - Parse and wire a script without evaluating it
//! - `report` - Execute a script and print only the connection report

mod commands;

use crate::config::Config;
use chipgraph_core::ChipError;
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Chipgraph - typed chip circuits evaluated on demand.
///
/// Scripts list the chips, then the commands: `A <src> <dst>` connects,
/// `I <input> <value>` sets an input, `O <chip>` evaluates.
#[derive(Parser, Debug)]
#[command(name = "chipgraph")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Maximum evaluation depth, 1 to 512 (overrides the configuration file)
    #[arg(long, global = true)]
    pub max_depth: Option<usize>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Execute a circuit script
    Run {
        /// Script file (reads stdin when omitted)
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Skip the connection report at the end
        #[arg(long)]
        no_report: bool,
    },

    /// Parse and wire a script without evaluating it
    Check {
        /// Script file (reads stdin when omitted)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Execute a script and print only the connection report
    Report {
        /// Script file (reads stdin when omitted)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

impl Cli {
    /// Default tracing filter for the selected verbosity.
    #[must_use]
    pub fn log_filter(&self) -> &'static str {
        if self.verbose {
            "chipgraph=debug,chipgraph_core=debug"
        } else if self.quiet {
            "chipgraph=error"
        } else {
            "chipgraph=info"
        }
    }
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments, writing results to `out`.
pub fn execute<W: Write>(cli: Cli, out: &mut W) -> Result<(), ChipError> {
    let config = Config::load(cli.config.as_deref())?;
    let settings = RunSettings::resolve(&config, cli.json_mode, cli.max_depth)?;

    match cli.command {
        Some(Commands::Run { file, no_report }) => {
            let settings = RunSettings {
                report: settings.report && !no_report,
                ..settings
            };
            cmd_run(file.as_deref(), &settings, out)
        }
        Some(Commands::Check { file }) => cmd_check(file.as_deref(), &settings, out),
        Some(Commands::Report { file }) => cmd_report(file.as_deref(), &settings, out),
        None => {
            // No subcommand - run a script from stdin
            cmd_run(None, &settings, out)
        }
    }
}
