//! Predicate parser and evaluator for row filtering.
//!
//! This module turns a predicate string into a [`PredicateSet`] and
//! evaluates it against [`Row`](crate::Row)s.
//!
//! # Supported Syntax
//!
//! ## Clauses
//! - `column comparator literal` - compare the field at a zero-based index
//! - `=`, `!=` - string equality, no coercion
//! - `<`, `<=`, `>`, `>=` - integer ordering; a non-integer operand makes
//!   the row non-matching
//! - Literals may be quoted with `"` or `'` to include whitespace or parentheses
//!
//! ## Connectives
//! - `and`, `or` (any case) - join exactly two operands inside one group
//! - `()` - grouping; every connective needs its own group
//!
//! ## Predicate Sets
//! - Several top-level expressions are implicitly AND-ed
//!
//! A clause naming a column past the end of a row is false for that row.
//!
//! # Example
//!
//! ```
//! use rowfilter_rs::filter::{FilterEvaluator, FilterParser};
//! use rowfilter_rs::Row;
//!
//! // Parse a predicate
//! let set = FilterParser::parse(r#"(((0 = "practo") and (1 != "dogreat")) or (2 <= 100))"#)
//!     .unwrap();
//!
//! // Create an evaluator
//! let evaluator = FilterEvaluator::new(&set);
//!
//! assert!(evaluator.matches(&Row::from(vec!["practo", "x", "50"])));
//! assert!(!evaluator.matches(&Row::from(vec!["z", "y", "200"])));
//! ```

mod ast;
mod error;
mod evaluator;
mod lexer;
mod parser;

pub use ast::{Clause, Comparator, Connective, Predicate, PredicateSet};
pub use error::{EvalResult, EvaluationError, FilterError, FilterResult, ParseError, TokenizeError};
pub use evaluator::{evaluate, FilterEvaluator, FilterStats};
pub use lexer::{FilterToken, Lexer, PositionedToken};
pub use parser::{FilterParser, MAX_NESTING_DEPTH};
