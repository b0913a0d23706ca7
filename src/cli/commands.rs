//! CLI command definitions using clap.
//!
//! Defines the main CLI structure and subcommands:
//! - add/edit/delete: manage counters
//! - list/show: inspect counters and progress
//! - count/undo/reset/reset-all: drive the counters themselves

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::domain::Period;

/// Tasbeeh - a local-first prayer counter manager
#[derive(Parser, Debug)]
#[command(name = "tasbeeh")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute; defaults to listing all counters
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// Main subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new tasbeeh
    Add {
        /// User-facing name
        name: String,

        /// Completion target (must be positive)
        #[arg(short, long)]
        target: u32,

        /// Recurrence period (daily, weekly, monthly)
        #[arg(short, long, default_value = "daily")]
        period: Period,

        /// Arabic text of the dhikr
        #[arg(long)]
        arabic: Option<String>,

        /// Translation of the dhikr
        #[arg(long)]
        translation: Option<String>,
    },

    /// List counters with their progress
    List {
        /// Only counters with this period
        #[arg(short, long)]
        period: Option<Period>,

        /// Only counters that reached their target
        #[arg(long, conflicts_with = "incomplete")]
        completed: bool,

        /// Only counters still short of their target
        #[arg(long)]
        incomplete: bool,

        /// Case-insensitive name filter
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Show a single counter in detail
    Show {
        /// Counter ID
        id: String,
    },

    /// Increment a counter
    Count {
        /// Counter ID
        id: String,

        /// Amount to add
        #[arg(long, default_value_t = 1)]
        by: u32,
    },

    /// Decrement a counter (never below zero)
    Undo {
        /// Counter ID
        id: String,

        /// Amount to subtract
        #[arg(long, default_value_t = 1)]
        by: u32,
    },

    /// Reset one counter to zero
    Reset {
        /// Counter ID
        id: String,
    },

    /// Reset every counter to zero
    ResetAll,

    /// Edit fields of an existing counter
    Edit {
        /// Counter ID
        id: String,

        /// New name
        #[arg(long)]
        name: Option<String>,

        /// New completion target (must be positive)
        #[arg(short, long)]
        target: Option<u32>,

        /// New recurrence period
        #[arg(short, long)]
        period: Option<Period>,

        /// New Arabic text
        #[arg(long)]
        arabic: Option<String>,

        /// New translation
        #[arg(long)]
        translation: Option<String>,
    },

    /// Delete one or more counters
    Delete {
        /// Counter IDs
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Remove the entire collection
    Clear,
}
