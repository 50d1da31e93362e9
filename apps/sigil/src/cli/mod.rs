//! # Sigil CLI Module
//!
//! ## Available Commands
//!
//! - `check` - Build a manifest and report every class
//! - `lineage` - Show a class's lineage
//! - `is-of-type` - Run a membership test between two classes
//! - `labels` - List the registry
//! - `symbol` - Print the symbol of a label
//! - `validate-label` - Check a label against a pattern

mod commands;

use crate::AppError;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Sigil - nominal identity inspector
///
/// Builds class hierarchies from TOML manifests and reports labels,
/// lineages and membership results.
#[derive(Parser, Debug)]
#[command(name = "sigil")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print results only
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Declare every class of a manifest and construct the identified ones
    Check {
        /// Path to the manifest
        manifest: PathBuf,
    },

    /// Show the lineage of a class, most ancestral first
    Lineage {
        /// Path to the manifest
        manifest: PathBuf,

        /// Class name
        class: String,
    },

    /// Test whether an instance of VALUE is of type TYPE
    IsOfType {
        /// Path to the manifest
        manifest: PathBuf,

        /// Class used as the type
        #[arg(value_name = "TYPE")]
        type_class: String,

        /// Class whose instance is tested
        #[arg(value_name = "VALUE")]
        value_class: String,

        /// Require an exact lineage prefix
        #[arg(short, long)]
        strict: bool,
    },

    /// List registered labels
    Labels {
        /// Path to the manifest
        manifest: PathBuf,
    },

    /// Print the symbol of a label
    Symbol {
        /// Label to resolve
        label: String,
    },

    /// Check a label against the recommended or a custom pattern
    ValidateLabel {
        /// Label to check
        label: String,

        /// Regular expression to use instead of the recommended format
        #[arg(short, long)]
        pattern: Option<String>,
    },
}

/// Output switches shared by every command.
#[derive(Debug, Clone, Copy, Default)]
pub struct Output {
    pub json: bool,
    pub quiet: bool,
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
///
/// Returns `false` when a check ran but its answer was negative.
pub fn execute(cli: Cli) -> Result<bool, AppError> {
    let out = Output {
        json: cli.json,
        quiet: cli.quiet,
    };

    match cli.command {
        Commands::Check { manifest } => cmd_check(&manifest, out),
        Commands::Lineage { manifest, class } => cmd_lineage(&manifest, &class, out),
        Commands::IsOfType {
            manifest,
            type_class,
            value_class,
            strict,
        } => cmd_is_of_type(&manifest, &type_class, &value_class, strict, out),
        Commands::Labels { manifest } => cmd_labels(&manifest, out),
        Commands::Symbol { label } => cmd_symbol(&label, out),
        Commands::ValidateLabel { label, pattern } => {
            cmd_validate_label(&label, pattern.as_deref(), out)
        }
    }
}
