//! Abstract Syntax Tree (AST) for predicate expressions.

use std::cmp::Ordering;
use std::fmt;

use serde::Serialize;

/// A comparison operator between a row field and a literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparator {
    /// `=` - string equality.
    Equal,
    /// `!=` - string inequality.
    NotEqual,
    /// `<=` - integer ordering.
    LessOrEqual,
    /// `<` - integer ordering.
    LessThan,
    /// `>` - integer ordering.
    GreaterThan,
    /// `>=` - integer ordering.
    GreaterOrEqual,
}

impl Comparator {
    /// Every comparator, in the order their symbols are documented.
    pub const ALL: [Comparator; 6] = [
        Comparator::Equal,
        Comparator::NotEqual,
        Comparator::LessOrEqual,
        Comparator::LessThan,
        Comparator::GreaterThan,
        Comparator::GreaterOrEqual,
    ];

    /// Looks up a comparator by its symbol.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "=" => Some(Comparator::Equal),
            "!=" => Some(Comparator::NotEqual),
            "<=" => Some(Comparator::LessOrEqual),
            "<" => Some(Comparator::LessThan),
            ">" => Some(Comparator::GreaterThan),
            ">=" => Some(Comparator::GreaterOrEqual),
            _ => None,
        }
    }

    /// Returns the symbol as written in a predicate.
    pub fn symbol(self) -> &'static str {
        match self {
            Comparator::Equal => "=",
            Comparator::NotEqual => "!=",
            Comparator::LessOrEqual => "<=",
            Comparator::LessThan => "<",
            Comparator::GreaterThan => ">",
            Comparator::GreaterOrEqual => ">=",
        }
    }

    /// Returns true if both operands must be integers.
    pub fn is_ordering(self) -> bool {
        !matches!(self, Comparator::Equal | Comparator::NotEqual)
    }

    /// Returns true if `field <op> literal` holds given how the field
    /// orders against the literal.
    pub fn accepts(self, ordering: Ordering) -> bool {
        match self {
            Comparator::Equal => ordering.is_eq(),
            Comparator::NotEqual => ordering.is_ne(),
            Comparator::LessOrEqual => ordering.is_le(),
            Comparator::LessThan => ordering.is_lt(),
            Comparator::GreaterThan => ordering.is_gt(),
            Comparator::GreaterOrEqual => ordering.is_ge(),
        }
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A logical connective joining two predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Connective {
    /// Both sides must hold.
    And,
    /// Either side must hold.
    Or,
}

impl Connective {
    /// Matches a connective word, ignoring case.
    pub fn from_word(word: &str) -> Option<Self> {
        if word.eq_ignore_ascii_case("and") {
            Some(Connective::And)
        } else if word.eq_ignore_ascii_case("or") {
            Some(Connective::Or)
        } else {
            None
        }
    }

    /// Returns the canonical lowercase word.
    pub fn word(self) -> &'static str {
        match self {
            Connective::And => "and",
            Connective::Or => "or",
        }
    }
}

impl fmt::Display for Connective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.word())
    }
}

/// A single comparison between the field at `column` and `literal`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Clause {
    /// Zero-based field index.
    pub column: usize,
    /// How the field is compared.
    pub comparator: Comparator,
    /// The literal the field is compared against, with quotes stripped.
    pub literal: String,
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let quote = if self.literal.contains('"') { '\'' } else { '"' };
        write!(
            f,
            "{} {} {quote}{}{quote}",
            self.column, self.comparator, self.literal
        )
    }
}

/// Represents a parsed predicate expression.
///
/// Each combinator exclusively owns its two children, so a `Predicate` is
/// always a finite tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Predicate {
    /// A leaf comparison.
    Clause(Clause),

    /// A binary AND/OR of two predicates.
    Combinator {
        /// How the children are joined.
        connective: Connective,
        /// The first operand in source order.
        left: Box<Predicate>,
        /// The second operand in source order.
        right: Box<Predicate>,
    },
}

impl Predicate {
    /// Creates a clause predicate.
    ///
    /// # Example
    ///
    /// ```
    /// use rowfilter_rs::filter::{Comparator, Predicate};
    ///
    /// let p = Predicate::clause(0, Comparator::Equal, "practo");
    /// assert_eq!(p.to_string(), r#"(0 = "practo")"#);
    /// ```
    pub fn clause(column: usize, comparator: Comparator, literal: impl Into<String>) -> Self {
        Predicate::Clause(Clause {
            column,
            comparator,
            literal: literal.into(),
        })
    }

    /// Creates a combinator joining `left` and `right`.
    pub fn combine(connective: Connective, left: Predicate, right: Predicate) -> Self {
        Predicate::Combinator {
            connective,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Creates an AND predicate from two predicates.
    pub fn and(left: Predicate, right: Predicate) -> Self {
        Self::combine(Connective::And, left, right)
    }

    /// Creates an OR predicate from two predicates.
    pub fn or(left: Predicate, right: Predicate) -> Self {
        Self::combine(Connective::Or, left, right)
    }

    /// Number of clauses in the tree.
    pub fn clause_count(&self) -> usize {
        match self {
            Predicate::Clause(_) => 1,
            Predicate::Combinator { left, right, .. } => left.clause_count() + right.clause_count(),
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Clause(clause) => write!(f, "({clause})"),
            Predicate::Combinator {
                connective,
                left,
                right,
            } => write!(f, "({left} {connective} {right})"),
        }
    }
}

/// The implicitly AND-ed top-level predicates parsed from one string.
///
/// Built once by [`FilterParser::parse`](super::FilterParser::parse) and
/// never mutated afterwards, so it can be shared across threads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PredicateSet {
    predicates: Vec<Predicate>,
}

impl PredicateSet {
    pub(crate) fn new(predicates: Vec<Predicate>) -> Self {
        Self { predicates }
    }

    /// The top-level predicates in source order.
    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    /// Iterates over the top-level predicates.
    pub fn iter(&self) -> std::slice::Iter<'_, Predicate> {
        self.predicates.iter()
    }

    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }
}

impl<'a> IntoIterator for &'a PredicateSet {
    type Item = &'a Predicate;
    type IntoIter = std::slice::Iter<'a, Predicate>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for PredicateSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, predicate) in self.predicates.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{predicate}")?;
        }
        Ok(())
    }
}
