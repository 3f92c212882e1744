//! Output formatting utilities for the rf CLI.
//!
//! - [`pager`] - Paged plain-text printing of rows
//! - [`rows`] - JSON and text formatting of results and predicates

use std::io::{self, Write};

pub mod pager;
mod rows;

pub use pager::Pager;
pub use rows::{format_predicates_json, format_predicates_text, format_rows_json, format_stats};

/// Treats a reader closing the pipe as the end of output.
pub fn ignore_broken_pipe(result: io::Result<()>) -> io::Result<()> {
    match result {
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        other => other,
    }
}

/// Writes to a locked stdout and flushes it. A closed pipe ends output
/// quietly instead of failing.
pub fn with_stdout(write: impl FnOnce(&mut dyn Write) -> io::Result<()>) -> io::Result<()> {
    let mut out = io::stdout().lock();
    ignore_broken_pipe(write(&mut out).and_then(|()| out.flush()))
}

/// Prints one line to stdout.
pub fn print_line(text: &str) -> io::Result<()> {
    with_stdout(|out| writeln!(out, "{text}"))
}
