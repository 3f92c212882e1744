//! Paged printing of matching rows.

use std::io::{self, BufRead, Write};

use owo_colors::OwoColorize;
use rowfilter_rs::Row;

/// Prompt written between pages.
pub const PAUSE_PROMPT: &str = "Press Enter to continue...";

/// Prints rows tab-joined, pausing after every `page_size` rows.
///
/// The pause reads one line of input. A line of `q` stops output, and end of
/// input turns pausing off for the remaining rows.
#[derive(Debug, Clone, Copy)]
pub struct Pager {
    pub page_size: usize,
    pub pause: bool,
    pub use_colors: bool,
}

/// How a paging run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageOutcome {
    /// Rows written.
    pub printed: usize,
    /// Whether the reader asked to stop before the last row.
    pub stopped: bool,
}

impl Pager {
    pub fn new(page_size: usize, pause: bool, use_colors: bool) -> Self {
        Self {
            page_size,
            pause,
            use_colors,
        }
    }

    /// Writes `rows` to `out`, reading pause acknowledgements from `input`.
    pub fn present<W, R>(&self, rows: &[&Row], out: &mut W, input: &mut R) -> io::Result<PageOutcome>
    where
        W: Write,
        R: BufRead,
    {
        let mut pause = self.pause && self.page_size > 0;
        let mut printed = 0;

        for (index, row) in rows.iter().enumerate() {
            if pause && index > 0 && index % self.page_size == 0 {
                match self.wait(out, input)? {
                    Ack::Continue => {}
                    Ack::Quit => {
                        return Ok(PageOutcome {
                            printed,
                            stopped: true,
                        })
                    }
                    Ack::Eof => pause = false,
                }
            }
            writeln!(out, "{}", row.to_tab_joined())?;
            printed += 1;
        }

        out.flush()?;
        Ok(PageOutcome {
            printed,
            stopped: false,
        })
    }

    fn wait<W: Write, R: BufRead>(&self, out: &mut W, input: &mut R) -> io::Result<Ack> {
        if self.use_colors {
            write!(out, "{}", PAUSE_PROMPT.dimmed())?;
        } else {
            write!(out, "{}", PAUSE_PROMPT)?;
        }
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            writeln!(out)?;
            return Ok(Ack::Eof);
        }

        if line.trim().eq_ignore_ascii_case("q") {
            Ok(Ack::Quit)
        } else {
            Ok(Ack::Continue)
        }
    }
}

enum Ack {
    Continue,
    Quit,
    Eof,
}
