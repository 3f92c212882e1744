//! Command implementations for the rf CLI.
//!
//! This module contains the actual command handlers that are invoked by the CLI.

pub mod check;
pub mod completions;
pub mod config;
pub mod filter;

use std::path::PathBuf;

use crate::cli::Cli;

/// Error type for command execution.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// Predicate tokenizing or parsing error.
    #[error("filter error: {0}")]
    Filter(#[from] rowfilter_rs::FilterError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// The dataset could not be read.
    #[error("cannot read {}: {source}", path.display())]
    Input {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CommandError {
    /// Returns the error code string for JSON output.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Filter(_) => "FILTER_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Input { .. } | Self::Io(_) => "IO_ERROR",
            Self::Json(_) => "JSON_ERROR",
        }
    }

    /// Returns the process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Filter(_) | Self::Json(_) => 1,
            Self::Input { .. } | Self::Io(_) => 3,
            Self::Config(_) => 5,
        }
    }
}

/// Result type for command execution.
pub type Result<T> = std::result::Result<T, CommandError>;

/// Context for command execution, containing common dependencies.
pub struct CommandContext {
    /// Whether to output JSON.
    pub json_output: bool,
    /// Whether to use colors.
    pub use_colors: bool,
    /// Whether to be quiet (errors only).
    pub quiet: bool,
    /// Whether to be verbose.
    pub verbose: bool,
}

impl CommandContext {
    /// Creates a new command context from CLI arguments.
    ///
    /// Colors are also disabled when `NO_COLOR` is set.
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            json_output: cli.json,
            use_colors: !cli.no_color && std::env::var_os("NO_COLOR").is_none(),
            quiet: cli.quiet,
            verbose: cli.verbose,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rowfilter_rs::filter::FilterParser;

    #[test]
    fn test_error_codes() {
        let filter_err = CommandError::from(FilterParser::parse("((0 = a)").unwrap_err());
        assert_eq!(filter_err.code(), "FILTER_ERROR");
        assert_eq!(filter_err.exit_code(), 1);

        let config_err = CommandError::Config("bad".to_string());
        assert_eq!(config_err.code(), "CONFIG_ERROR");
        assert_eq!(config_err.exit_code(), 5);

        let io_err = CommandError::from(std::io::Error::other("boom"));
        assert_eq!(io_err.code(), "IO_ERROR");
        assert_eq!(io_err.exit_code(), 3);
    }

    #[test]
    fn test_input_error_names_path() {
        let err = CommandError::Input {
            path: PathBuf::from("missing.csv"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        assert_eq!(err.to_string(), "cannot read missing.csv: not found");
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn test_filter_error_message() {
        let err = CommandError::from(FilterParser::parse("").unwrap_err());
        assert!(err.to_string().starts_with("filter error: "));
    }
}
