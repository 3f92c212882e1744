//! Error types for the predicate tokenizer, parser and evaluator.

use thiserror::Error;

/// A specialized Result type for predicate parsing operations.
pub type FilterResult<T> = Result<T, FilterError>;

/// A specialized Result type for evaluating a predicate against one row.
pub type EvalResult<T> = Result<T, EvaluationError>;

/// Errors that reject a whole predicate string before any row is evaluated.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FilterError {
    /// The predicate could not be split into tokens.
    #[error(transparent)]
    Tokenize(#[from] TokenizeError),

    /// The tokens do not form a well-grouped expression.
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Errors that can occur while tokenizing a predicate string.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenizeError {
    /// A quoted literal was opened but never closed.
    #[error("unterminated quoted literal starting at position {position}")]
    UnterminatedQuote {
        /// Byte offset of the opening quote.
        position: usize,
    },

    /// A clause did not have all of column, comparator and literal.
    #[error("incomplete clause at position {position}: expected `column comparator literal`")]
    IncompleteClause {
        /// Byte offset where the clause starts.
        position: usize,
    },

    /// The comparator symbol is not one of `=`, `!=`, `<`, `<=`, `>`, `>=`.
    #[error("unknown comparator '{symbol}' at position {position}{}", did_you_mean(.suggestion))]
    UnknownComparator {
        /// The symbol as written.
        symbol: String,
        /// Byte offset of the symbol.
        position: usize,
        /// The closest known comparator, if any is close enough.
        suggestion: Option<String>,
    },
}

/// Errors that can occur while building the predicate tree from tokens.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    /// The predicate string is empty or whitespace only.
    #[error("predicate expression is empty")]
    EmptyExpression,

    /// A `(` was never closed.
    #[error("unclosed parenthesis opened at position {position}")]
    UnclosedGroup {
        /// Byte offset of the unmatched `(`.
        position: usize,
    },

    /// A `)` appeared with no matching `(`.
    #[error("unexpected ')' at position {position}")]
    UnexpectedCloseGroup {
        /// Byte offset of the unmatched `)`.
        position: usize,
    },

    /// A group contains nothing, as in `()`.
    #[error("empty group at position {position}")]
    EmptyGroup {
        /// Byte offset of the group's `(`.
        position: usize,
    },

    /// A connective is not placed between exactly two operands of one group.
    #[error("misplaced '{connective}' at position {position}")]
    MisplacedConnective {
        /// The connective word, lowercased.
        connective: String,
        /// Byte offset of the connective.
        position: usize,
    },

    /// A group holds more than `expr` or `expr connective expr`.
    #[error(
        "ambiguous group at position {position}: group each pair of operands explicitly"
    )]
    AmbiguousGroup {
        /// Byte offset of the group's `(`.
        position: usize,
    },

    /// Groups are nested deeper than the parser allows.
    #[error("groups nested deeper than {limit} levels at position {position}")]
    TooDeep {
        /// Byte offset of the `(` that exceeds the limit.
        position: usize,
        /// The maximum nesting depth.
        limit: usize,
    },

    /// A column reference is not a non-negative integer.
    #[error("invalid column reference '{column}' at position {position}")]
    InvalidColumn {
        /// The column reference as written.
        column: String,
        /// Byte offset of the clause.
        position: usize,
    },
}

/// A failure local to evaluating one clause against one row.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EvaluationError {
    /// An ordering comparison had an operand that is not an integer.
    #[error("non-numeric operand '{value}' in ordering comparison on column {column}")]
    NonNumericOperand {
        /// The column of the clause being evaluated.
        column: usize,
        /// The offending operand, from the row or the literal.
        value: String,
    },
}

fn did_you_mean(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(s) => format!(" (did you mean '{s}'?)"),
        None => String::new(),
    }
}

impl TokenizeError {
    /// Creates an unknown comparator error.
    pub fn unknown_comparator(
        symbol: impl Into<String>,
        position: usize,
        suggestion: Option<&str>,
    ) -> Self {
        TokenizeError::UnknownComparator {
            symbol: symbol.into(),
            position,
            suggestion: suggestion.map(str::to_string),
        }
    }
}

impl ParseError {
    /// Creates a misplaced connective error.
    pub fn misplaced_connective(connective: impl ToString, position: usize) -> Self {
        ParseError::MisplacedConnective {
            connective: connective.to_string(),
            position,
        }
    }

    /// Creates an invalid column error.
    pub fn invalid_column(column: impl Into<String>, position: usize) -> Self {
        ParseError::InvalidColumn {
            column: column.into(),
            position,
        }
    }
}

impl EvaluationError {
    /// Creates a non-numeric operand error.
    pub fn non_numeric(column: usize, value: impl Into<String>) -> Self {
        EvaluationError::NonNumericOperand {
            column,
            value: value.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_comparator_message_with_suggestion() {
        let err = TokenizeError::unknown_comparator("=<", 3, Some("<="));
        assert_eq!(
            err.to_string(),
            "unknown comparator '=<' at position 3 (did you mean '<='?)"
        );
    }

    #[test]
    fn test_unknown_comparator_message_without_suggestion() {
        let err = TokenizeError::unknown_comparator("~~~", 0, None);
        assert_eq!(err.to_string(), "unknown comparator '~~~' at position 0");
    }

    #[test]
    fn test_filter_error_is_transparent() {
        let err: FilterError = ParseError::EmptyExpression.into();
        assert_eq!(err.to_string(), "predicate expression is empty");
    }
}
