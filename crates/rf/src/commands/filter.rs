//! Filter command implementation.
//!
//! Reads a dataset, keeps the rows matching the predicate and prints them.

use std::io::{self, IsTerminal};

use rowfilter_rs::filter::{FilterEvaluator, FilterParser, FilterStats};
use rowfilter_rs::{PredicateSet, Row};

use super::config::{load_config, Settings};
use super::{CommandContext, CommandError, Result};
use crate::output::{format_rows_json, format_stats, ignore_broken_pipe, print_line, Pager};
use crate::source::{self, STDIN_PATH};

/// Options for the filter command.
#[derive(Debug, Default)]
pub struct FilterOptions {
    /// Input file, or `-` for stdin.
    pub input: String,
    /// Predicate text. Every row passes when absent.
    pub predicate: Option<String>,
    pub delimiter: Option<char>,
    pub page_size: Option<usize>,
    pub no_pause: bool,
    pub parallel: bool,
    pub stats: bool,
    pub limit: Option<usize>,
}

/// Settings for one run after combining flags, config and defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RunSettings {
    delimiter: char,
    page_size: usize,
    pause: bool,
    parallel: bool,
    use_colors: bool,
}

/// Flags win over the config file, which wins over defaults.
fn resolve(ctx: &CommandContext, opts: &FilterOptions, config: &Settings) -> Result<RunSettings> {
    let page_size = opts.page_size.unwrap_or(config.page_size);
    if page_size == 0 {
        return Err(CommandError::Config(
            "page size must be a positive integer".to_string(),
        ));
    }

    Ok(RunSettings {
        delimiter: opts.delimiter.unwrap_or(config.delimiter),
        page_size,
        // Acknowledgements are read from stdin, so it cannot also carry the data
        pause: !opts.no_pause && config.pause && opts.input != STDIN_PATH,
        parallel: opts.parallel || config.parallel,
        use_colors: ctx.use_colors && config.color,
    })
}

/// Runs the filtering pass, or passes every row through without a predicate.
fn apply<'a>(
    set: Option<&PredicateSet>,
    rows: &'a [Row],
    parallel: bool,
) -> (Vec<&'a Row>, FilterStats) {
    match set {
        Some(set) => {
            let evaluator = FilterEvaluator::new(set);
            if parallel {
                evaluator.par_filter_rows_with_stats(rows)
            } else {
                evaluator.filter_rows_with_stats(rows)
            }
        }
        None => (
            rows.iter().collect(),
            FilterStats {
                scanned: rows.len(),
                matched: rows.len(),
                evaluation_errors: 0,
            },
        ),
    }
}

/// Executes the filter command.
pub fn execute(ctx: &CommandContext, opts: &FilterOptions) -> Result<()> {
    let config = load_config()?.settings();
    let settings = resolve(ctx, opts, &config)?;

    // Parse before reading so a malformed predicate never touches the data
    let set = opts
        .predicate
        .as_deref()
        .map(FilterParser::parse)
        .transpose()?;

    let rows = source::load_rows(&opts.input, settings.delimiter)?;
    let (mut matches, stats) = apply(set.as_ref(), &rows, settings.parallel);

    if stats.evaluation_errors > 0 {
        tracing::warn!(
            rows = stats.evaluation_errors,
            "rows with non-numeric operands in ordering comparisons were skipped"
        );
    }

    if let Some(limit) = opts.limit {
        matches.truncate(limit);
    }

    if ctx.json_output {
        print_line(&format_rows_json(&matches, opts.stats.then_some(stats))?)?;
        return Ok(());
    }

    let pause = settings.pause && io::stdin().is_terminal() && io::stdout().is_terminal();
    let pager = Pager::new(settings.page_size, pause, settings.use_colors);
    let presented = pager.present(&matches, &mut io::stdout().lock(), &mut io::stdin().lock());
    let outcome = match presented {
        Ok(outcome) => outcome,
        Err(e) => {
            ignore_broken_pipe(Err(e))?;
            return Ok(());
        }
    };
    if outcome.stopped {
        tracing::debug!(printed = outcome.printed, "output stopped by reader");
    }

    if opts.stats && !ctx.quiet {
        eprintln!("{}", format_stats(&stats, settings.use_colors));
    }

    Ok(())
}
