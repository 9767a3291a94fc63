//! # proptrack CLI Module
//!
//! This module implements the CLI interface for proptrack.
//!
//! ## Available Commands
//!
//! - `shapes` - List configured shapes and their fields
//! - `check` - Load a JSON object into a shape and report completeness
//! - `map` - Run a configured field mapping behind the completeness boundary
//! - `demo` - Round-trip the sample user through the static user mapper

mod commands;

use crate::config::AppConfig;
use crate::error::AppError;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// proptrack - completeness tracking for mapped records
///
/// Every declared field must be assigned before a mapped object leaves
/// its transformation.
#[derive(Parser, Debug)]
#[command(name = "proptrack")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to the TOML config (default: ./proptrack.toml, else built-in)
    #[arg(short, long, global = true)]
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
    /// List configured shapes and mappings
    Shapes,

    /// Report the completeness of a JSON object as a given shape
    Check {
        /// Shape name from the config
        #[arg(short, long)]
        shape: String,

        /// Path to a JSON file holding one object
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Map a JSON object with a configured mapping
    Map {
        /// Mapping name from the config
        #[arg(short, long)]
        mapping: String,

        /// Path to a JSON file holding one source object
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Run the user entity/persistence mapper round trip
    Demo {
        /// Also map onto the mentor shape, which leaves a field unset
        #[arg(long)]
        incomplete: bool,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub fn execute(cli: Cli, config: &AppConfig) -> Result<(), AppError> {
    let json_mode = cli.json_mode;

    match cli.command {
        Some(Commands::Shapes) | None => cmd_shapes(config, json_mode),
        Some(Commands::Check { shape, input }) => cmd_check(config, json_mode, &shape, &input),
        Some(Commands::Map { mapping, input }) => cmd_map(config, json_mode, &mapping, &input),
        Some(Commands::Demo { incomplete }) => cmd_demo(json_mode, incomplete),
    }
}
