//! Filtering of tabular rows by nested boolean predicates.
//!
//! This crate parses predicates such as
//! `(((0 = "practo") and (1 != "dogreat")) or (2 <= 100))` and applies them
//! to rows of string fields. Reading rows and presenting the matches are
//! left to the caller.

pub mod filter;
mod row;

pub use filter::{FilterError, FilterResult, PredicateSet};
pub use row::Row;

use filter::{FilterEvaluator, FilterParser};

/// Parses `predicate` and returns the rows that match it, in their original order.
///
/// # Errors
///
/// Returns a [`FilterError`] if the predicate is malformed. No row is
/// evaluated in that case.
///
/// # Example
///
/// ```
/// use rowfilter_rs::{filter_rows, Row};
///
/// let rows = vec![Row::from(vec!["a", "b"]), Row::from(vec!["a", "c"])];
/// let matches = filter_rows(&rows, r#"(0 = "a") (1 = "b")"#).unwrap();
/// assert_eq!(matches, vec![&rows[0]]);
/// ```
pub fn filter_rows<'a>(rows: &'a [Row], predicate: &str) -> FilterResult<Vec<&'a Row>> {
    let set = FilterParser::parse(predicate)?;
    Ok(FilterEvaluator::new(&set).filter_rows(rows))
}

/// Parallel version of [`filter_rows`], evaluating rows on the rayon thread pool.
///
/// # Errors
///
/// Returns a [`FilterError`] if the predicate is malformed.
pub fn par_filter_rows<'a>(rows: &'a [Row], predicate: &str) -> FilterResult<Vec<&'a Row>> {
    let set = FilterParser::parse(predicate)?;
    Ok(FilterEvaluator::new(&set).par_filter_rows(rows))
}
