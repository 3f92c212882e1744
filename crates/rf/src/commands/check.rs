//! Check command implementation.
//!
//! Parses a predicate without reading any data, so a malformed predicate can
//! be caught before a long filtering run.

use rowfilter_rs::filter::FilterParser;

use super::{CommandContext, Result};
use crate::output::{format_predicates_json, format_predicates_text, print_line};

/// Executes the check command.
pub fn execute(ctx: &CommandContext, predicate: &str) -> Result<()> {
    let set = FilterParser::parse(predicate)?;
    tracing::debug!(predicates = set.len(), "predicate is well formed");

    if ctx.json_output {
        print_line(&format_predicates_json(&set)?)?;
    } else if !ctx.quiet {
        print_line(&format_predicates_text(&set))?;
    }

    Ok(())
}
