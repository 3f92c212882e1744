use clap::Parser;
use std::process::ExitCode;

mod cli;
mod commands;
mod dispatch;
mod logging;
mod output;
mod source;

use cli::Cli;
use commands::{CommandContext, CommandError};
use dispatch::Dispatch;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let ctx = CommandContext::from_cli(&cli);
    logging::init_logging(ctx.verbose, ctx.quiet, ctx.use_colors);

    match Dispatch::from_cli(&cli).execute(&ctx) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report_error(&e, cli.json);
            ExitCode::from(e.exit_code())
        }
    }
}

/// Prints an error to stderr, as a JSON object when `--json` is set.
fn report_error(e: &CommandError, json: bool) {
    if json {
        let error_json = serde_json::json!({
            "error": {
                "code": e.code(),
                "message": e.to_string(),
            }
        });
        match serde_json::to_string_pretty(&error_json) {
            Ok(text) => eprintln!("{text}"),
            Err(_) => eprintln!("{error_json}"),
        }
    } else {
        eprintln!("Error: {e}");
    }
}
