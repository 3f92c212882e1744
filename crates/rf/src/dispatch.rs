//! Command dispatch module for routing CLI commands to their handlers.

use crate::cli::{Cli, Commands, ConfigCommands, Shell};
use crate::commands::{self, CommandContext, CommandError, Result};
use crate::output::print_line;

/// A parsed command, borrowed from the CLI arguments.
pub enum Dispatch<'a> {
    Filter(commands::filter::FilterOptions),
    Check(&'a str),
    Config(&'a Option<ConfigCommands>),
    Completions(Shell),
    Help,
}

impl<'a> Dispatch<'a> {
    pub fn from_cli(cli: &'a Cli) -> Self {
        match &cli.command {
            Some(Commands::Filter {
                input,
                predicate,
                delimiter,
                page_size,
                no_pause,
                parallel,
                stats,
                limit,
            }) => Self::Filter(commands::filter::FilterOptions {
                input: input.clone(),
                predicate: predicate.clone(),
                delimiter: *delimiter,
                page_size: *page_size,
                no_pause: *no_pause,
                parallel: *parallel,
                stats: *stats,
                limit: *limit,
            }),
            Some(Commands::Check { predicate }) => Self::Check(predicate),
            Some(Commands::Config { command }) => Self::Config(command),
            Some(Commands::Completions { shell }) => Self::Completions(*shell),
            None => Self::Help,
        }
    }

    pub fn execute(&self, ctx: &CommandContext) -> Result<()> {
        match self {
            Self::Filter(opts) => commands::filter::execute(ctx, opts),
            Self::Check(predicate) => commands::check::execute(ctx, predicate),
            Self::Config(command) => dispatch_config(ctx, command),
            Self::Completions(shell) => {
                commands::completions::execute(*shell).map_err(CommandError::Io)
            }
            Self::Help => {
                if !ctx.quiet {
                    print_line(
                        "rf - filter delimited text with nested predicates\n\
                         Use --help for usage information",
                    )?;
                }
                Ok(())
            }
        }
    }
}

/// Dispatch config subcommands.
fn dispatch_config(ctx: &CommandContext, command: &Option<ConfigCommands>) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::execute_show(ctx),
        Some(ConfigCommands::Set { key, value }) => {
            let opts = commands::config::ConfigSetOptions {
                key: key.clone(),
                value: value.clone(),
            };
            commands::config::execute_set(ctx, &opts)
        }
        Some(ConfigCommands::Path) => commands::config::execute_path(ctx),
        Some(ConfigCommands::Init { force }) => commands::config::execute_init(ctx, *force),
    }
}
