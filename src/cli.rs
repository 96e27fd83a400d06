//! Command-line argument parsing for the switchboard tool
//!
//! Supports:
//! - Listing effective shortcut bindings
//! - Validating a shortcuts file
//! - Printing the generated menu bar and toolbar
//! - Palette search over the built-in catalog

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Inspect command, shortcut and toolbar configuration
#[derive(Parser, Debug)]
#[command(
    name = "switchboard",
    version,
    about = "Inspect command, shortcut and toolbar configuration"
)]
pub struct CliArgs {
    /// Print debug logs to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum CliCommand {
    /// List effective bindings (defaults plus the user shortcuts file)
    Shortcuts {
        /// Shortcuts file to merge instead of the user config location
        #[arg(long, value_name = "PATH")]
        file: Option<PathBuf>,
    },
    /// Validate a shortcuts file and report skipped entries
    CheckShortcuts {
        #[arg(value_name = "PATH")]
        path: PathBuf,
    },
    /// Print the menu bar built from the command catalog
    Menus,
    /// Print the toolbars (saved layout or default grouping)
    Toolbar {
        /// Toolbar layout file instead of the user config location
        #[arg(long, value_name = "PATH")]
        layout: Option<PathBuf>,
    },
    /// Fuzzy-search the command catalog
    Search {
        #[arg(value_name = "QUERY")]
        query: String,
    },
}
