//! # Graflat CLI Module
//!
//! This module implements the CLI interface for graflat.
//!
//! ## Available Commands
//!
//! - `dump` - Flatten a snapshot document into a row export
//! - `inspect` - Parse a snapshot and report its shape without dumping

mod commands;

use clap::{Parser, Subcommand};
use graflat_core::GraflatError;
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Graflat - object-graph flattener
///
/// Walks a cyclic, aliased object graph exactly once and emits a flat
/// vertex/edge row export a consumer can replay.
#[derive(Parser, Debug)]
#[command(name = "graflat")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Flatten a snapshot into a row export
    Dump {
        /// Path to the snapshot document (JSON)
        #[arg(short, long)]
        file: PathBuf,

        /// Output file path (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Cell dialect (plain, quoted)
        #[arg(short = 't', long, default_value = "plain")]
        dialect: String,

        /// Cell delimiter
        #[arg(short, long, default_value = ",")]
        delimiter: char,

        /// Emit the fixed-column header row
        #[arg(long)]
        header: bool,
    },

    /// Parse a snapshot and report object counts and roots
    Inspect {
        /// Path to the snapshot document (JSON)
        #[arg(short, long)]
        file: PathBuf,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub fn execute(cli: Cli) -> Result<(), GraflatError> {
    match cli.command {
        Commands::Dump {
            file,
            output,
            dialect,
            delimiter,
            header,
        } => cmd_dump(&file, output.as_deref(), &dialect, delimiter, header),
        Commands::Inspect { file } => cmd_inspect(&file, cli.verbose),
    }
}
