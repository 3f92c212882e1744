//! Predicate evaluation against rows.
//!
//! This module provides the [`FilterEvaluator`] for evaluating a parsed
//! [`PredicateSet`] against [`Row`]s.
//!
//! # Example
//!
//! ```
//! use rowfilter_rs::filter::{FilterEvaluator, FilterParser};
//! use rowfilter_rs::Row;
//!
//! let set = FilterParser::parse(r#"((0 = "practo") or (2 <= 100))"#).unwrap();
//! let rows = vec![
//!     Row::from(vec!["practo", "x", "500"]),
//!     Row::from(vec!["other", "y", "10"]),
//!     Row::from(vec!["other", "z", "200"]),
//! ];
//!
//! let evaluator = FilterEvaluator::new(&set);
//! let matches = evaluator.filter_rows(&rows);
//! assert_eq!(matches.len(), 2);
//! ```

use std::cmp::Ordering;

use rayon::prelude::*;
use serde::Serialize;

use super::ast::{Clause, Connective, Predicate, PredicateSet};
use super::error::{EvalResult, EvaluationError};
use crate::row::Row;

/// Counts gathered during one filtering pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FilterStats {
    /// Rows the predicate set was evaluated against.
    pub scanned: usize,
    /// Rows that matched.
    pub matched: usize,
    /// Rows treated as non-matching because evaluation failed.
    pub evaluation_errors: usize,
}

/// Evaluates a parsed predicate set against rows.
///
/// The evaluator only borrows the set, and evaluation never mutates the
/// set or the row, so one evaluator can be shared across threads.
#[derive(Debug, Clone, Copy)]
pub struct FilterEvaluator<'a> {
    set: &'a PredicateSet,
}

impl<'a> FilterEvaluator<'a> {
    /// Creates a new evaluator for `set`.
    pub fn new(set: &'a PredicateSet) -> Self {
        Self { set }
    }

    /// Evaluates every predicate in the set, short-circuiting on the first false one.
    ///
    /// # Errors
    ///
    /// Returns `EvaluationError::NonNumericOperand` if an ordering clause
    /// that had to be evaluated compares a non-integer.
    pub fn try_matches(&self, row: &Row) -> EvalResult<bool> {
        for predicate in self.set {
            if !evaluate(predicate, row)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Returns true if the row matches every predicate in the set.
    ///
    /// A row whose evaluation fails does not match.
    pub fn matches(&self, row: &Row) -> bool {
        self.try_matches(row).unwrap_or_else(|err| {
            tracing::debug!(error = %err, "row treated as non-matching");
            false
        })
    }

    /// Filters a slice of rows, returning the matches in their original order.
    pub fn filter_rows<'b>(&self, rows: &'b [Row]) -> Vec<&'b Row> {
        let matches: Vec<&Row> = rows.iter().filter(|row| self.matches(row)).collect();
        tracing::debug!(scanned = rows.len(), matched = matches.len(), "filtered rows");
        matches
    }

    /// Filters a slice of rows on the rayon thread pool.
    ///
    /// Produces the same rows in the same order as [`filter_rows`](Self::filter_rows).
    pub fn par_filter_rows<'b>(&self, rows: &'b [Row]) -> Vec<&'b Row> {
        let matches: Vec<&Row> = rows.par_iter().filter(|row| self.matches(row)).collect();
        tracing::debug!(
            scanned = rows.len(),
            matched = matches.len(),
            "filtered rows in parallel"
        );
        matches
    }

    /// Filters rows sequentially and reports how many rows failed evaluation.
    pub fn filter_rows_with_stats<'b>(&self, rows: &'b [Row]) -> (Vec<&'b Row>, FilterStats) {
        let outcomes = rows.iter().map(|row| (row, self.try_matches(row)));
        tally(rows.len(), outcomes)
    }

    /// Parallel version of [`filter_rows_with_stats`](Self::filter_rows_with_stats).
    pub fn par_filter_rows_with_stats<'b>(
        &self,
        rows: &'b [Row],
    ) -> (Vec<&'b Row>, FilterStats) {
        let outcomes: Vec<_> = rows
            .par_iter()
            .map(|row| (row, self.try_matches(row)))
            .collect();
        tally(rows.len(), outcomes)
    }
}

fn tally<'b>(
    scanned: usize,
    outcomes: impl IntoIterator<Item = (&'b Row, EvalResult<bool>)>,
) -> (Vec<&'b Row>, FilterStats) {
    let mut stats = FilterStats {
        scanned,
        ..FilterStats::default()
    };
    let mut matches = Vec::new();

    for (row, outcome) in outcomes {
        match outcome {
            Ok(true) => matches.push(row),
            Ok(false) => {}
            Err(err) => {
                tracing::debug!(error = %err, "row treated as non-matching");
                stats.evaluation_errors += 1;
            }
        }
    }
    stats.matched = matches.len();

    tracing::debug!(
        scanned = stats.scanned,
        matched = stats.matched,
        evaluation_errors = stats.evaluation_errors,
        "filtered rows"
    );
    (matches, stats)
}

/// Evaluates one predicate tree against a row.
///
/// AND skips its right side when the left side is false; OR skips it when
/// the left side is true. A skipped side can never raise an error.
///
/// # Errors
///
/// Returns `EvaluationError::NonNumericOperand` if an evaluated ordering
/// clause has an operand that is not an integer.
pub fn evaluate(predicate: &Predicate, row: &Row) -> EvalResult<bool> {
    match predicate {
        Predicate::Clause(clause) => evaluate_clause(clause, row),
        Predicate::Combinator {
            connective: Connective::And,
            left,
            right,
        } => Ok(evaluate(left, row)? && evaluate(right, row)?),
        Predicate::Combinator {
            connective: Connective::Or,
            left,
            right,
        } => Ok(evaluate(left, row)? || evaluate(right, row)?),
    }
}

/// Compares the referenced field with the clause literal.
///
/// A column past the end of the row is false, not an error.
fn evaluate_clause(clause: &Clause, row: &Row) -> EvalResult<bool> {
    let Some(value) = row.get(clause.column) else {
        return Ok(false);
    };

    let literal = clause.literal.as_str();
    let ordering = if clause.comparator.is_ordering() {
        compare_integers(clause.column, value, literal)?
    } else {
        value.cmp(literal)
    };
    Ok(clause.comparator.accepts(ordering))
}

/// Orders a field against a literal as integers.
fn compare_integers(column: usize, value: &str, literal: &str) -> EvalResult<Ordering> {
    let lhs = parse_integer(column, value)?;
    let rhs = parse_integer(column, literal)?;
    Ok(lhs.cmp(&rhs))
}

/// Parses an operand of an ordering comparison, ignoring surrounding whitespace.
fn parse_integer(column: usize, value: &str) -> EvalResult<i64> {
    value
        .trim()
        .parse::<i64>()
        .map_err(|_| EvaluationError::non_numeric(column, value))
}

#[cfg(test)]
#[path = "evaluator_tests.rs"]
mod tests;
