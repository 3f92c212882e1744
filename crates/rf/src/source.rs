//! Reading datasets into rows.
//!
//! Each line is one row and fields are separated by a single ASCII delimiter.
//! There is no quoting or escaping: a delimiter inside a field always splits
//! it. Blank lines are skipped, and a single delimiter at the end of a line
//! does not start another field.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use rowfilter_rs::Row;

use crate::commands::{CommandError, Result};

/// Path that selects standard input.
pub const STDIN_PATH: &str = "-";

/// Converts a delimiter to the byte the reader splits on.
pub fn delimiter_byte(delimiter: char) -> Result<u8> {
    if delimiter.is_ascii() {
        Ok(delimiter as u8)
    } else {
        Err(CommandError::Config(format!(
            "delimiter must be a single ASCII character, got '{delimiter}'"
        )))
    }
}

/// Reads every record of `reader` as a row.
pub fn read_rows(reader: impl Read, delimiter: u8) -> io::Result<Vec<Row>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .delimiter(delimiter)
        .from_reader(reader);

    let mut rows = Vec::new();
    for record in reader.records() {
        rows.push(record_to_row(&record?));
    }
    Ok(rows)
}

/// `a,b,` has two fields, `a,b,,` has three and `,` has one empty field.
fn record_to_row(record: &StringRecord) -> Row {
    let mut fields: Vec<String> = record.iter().map(str::to_string).collect();
    if fields.len() > 1 && fields.last().is_some_and(String::is_empty) {
        fields.pop();
    }
    Row::new(fields)
}

/// Loads a dataset from a file, or from stdin when `path` is `-`.
pub fn load_rows(path: &str, delimiter: char) -> Result<Vec<Row>> {
    let delimiter = delimiter_byte(delimiter)?;
    let rows = if path == STDIN_PATH {
        read_rows(io::stdin().lock(), delimiter)
    } else {
        File::open(path).and_then(|file| read_rows(file, delimiter))
    };

    let rows = rows.map_err(|source| CommandError::Input {
        path: Path::new(path).to_path_buf(),
        source,
    })?;

    tracing::debug!(path, rows = rows.len(), "loaded dataset");
    Ok(rows)
}
