//! CLI argument parsing types.
//!
//! This module provides the command-line interface structure for the rally-report binary.

use clap::{Parser, Subcommand};

/// Rally report command-line interface.
#[derive(Parser, Debug)]
#[command(name = "rally-report", about = "Rally object reports", version)]
pub struct Cli {
    /// Output results as JSON instead of a table.
    #[arg(long, global = true, default_value = "false")]
    pub json: bool,

    /// Workspace reference to scope queries to.
    #[arg(long, global = true, env = "RALLY_WORKSPACE")]
    pub workspace: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List objects of a type, flattened.
    List {
        /// Object type, e.g. iteration or release.
        object_type: String,

        /// Rally query expression (only applied together with --workspace).
        #[arg(long)]
        query: Option<String>,

        /// Fetch a single window starting at this 1-based index.
        #[arg(long)]
        start: Option<u64>,

        /// Page size for a single window.
        #[arg(long)]
        pagesize: Option<u32>,
    },

    /// Count objects of a type.
    Count {
        /// Object type, e.g. iteration or release.
        object_type: String,

        /// Rally query expression (only applied together with --workspace).
        #[arg(long)]
        query: Option<String>,
    },
}
