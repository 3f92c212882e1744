//! CLI argument parsing using clap derive macros.
//!
//! This module defines the command-line interface for the rf CLI.

use clap::{Parser, Subcommand, ValueEnum};

/// rf - Filter delimited text with nested predicates
#[derive(Parser, Debug)]
#[command(name = "rf")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbose output (show debug information)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Force JSON output
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable colors in output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Filter the rows of a delimited file
    #[command(alias = "f")]
    Filter {
        /// Input file, or "-" for stdin
        input: String,

        /// Predicate rows must satisfy (e.g., '((0 = "a") or (2 <= 100))')
        #[arg(short = 'w', long = "where", value_name = "PREDICATE")]
        predicate: Option<String>,

        /// Field delimiter (default: from config, else ',')
        #[arg(short, long)]
        delimiter: Option<char>,

        /// Rows per page before pausing (default: from config, else 50)
        #[arg(short = 'n', long)]
        page_size: Option<usize>,

        /// Print every row without pausing between pages
        #[arg(long)]
        no_pause: bool,

        /// Evaluate rows on all cores
        #[arg(long)]
        parallel: bool,

        /// Print a summary of scanned and matched rows
        #[arg(long)]
        stats: bool,

        /// Stop after this many matching rows
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Parse a predicate and print its canonical form
    Check {
        /// Predicate to check
        predicate: String,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective configuration
    Show,

    /// Set a config value
    Set {
        /// Config key (e.g., output.page_size)
        key: String,

        /// Value to set
        value: String,
    },

    /// Show config file path
    Path,

    /// Write a default config file
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

/// Supported shells for completions
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    Powershell,
}
