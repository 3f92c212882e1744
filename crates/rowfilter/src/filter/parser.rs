//! Explicit-grouping parser for predicate expressions.

use super::ast::{Connective, Predicate, PredicateSet};
use super::error::{FilterResult, ParseError};
use super::lexer::{FilterToken, Lexer, PositionedToken};

/// Maximum number of simultaneously open groups.
///
/// Every combinator needs its own group, so this also bounds the depth of
/// each predicate tree and of the recursion that evaluates, renders and
/// drops it.
pub const MAX_NESTING_DEPTH: usize = 256;

/// Parser for predicate expressions.
///
/// There is no operator precedence. Every connective must sit inside its
/// own group between exactly two operands, so a tree has a single reading.
///
/// # Grammar
///
/// ```text
/// predicate_set ::= expr+
/// expr          ::= "(" expr ")" | "(" expr connective expr ")" | clause
/// clause        ::= column comparator literal
/// connective    ::= "and" | "or"            (case-insensitive)
/// comparator    ::= "=" | "!=" | "<=" | "<" | ">=" | ">"
/// column        ::= [0-9]+
/// literal       ::= bare word | '"' ... '"' | "'" ... "'"
/// ```
///
/// Top-level expressions that are not enclosed in one outer group are
/// implicitly AND-ed.
///
/// # Example
///
/// ```
/// use rowfilter_rs::filter::{FilterParser, Predicate};
///
/// let set = FilterParser::parse(r#"((0 = "a") or (1 != "b"))"#).unwrap();
/// assert_eq!(set.len(), 1);
/// assert!(matches!(set.predicates()[0], Predicate::Combinator { .. }));
///
/// // Two top-level groups form a set of two predicates
/// let set = FilterParser::parse(r#"(0 = "a") (1 = "b")"#).unwrap();
/// assert_eq!(set.len(), 2);
/// ```
pub struct FilterParser {
    /// Fully reduced expressions outside any group, in source order.
    top_level: Vec<Predicate>,
    /// Groups that are still open, innermost last.
    open_groups: Vec<Group>,
}

/// Operands and connectives collected since a `(`.
struct Group {
    /// Byte offset of the `(`.
    open_position: usize,
    entries: Vec<GroupEntry>,
}

enum GroupEntry {
    Subtree(Predicate),
    Connective {
        connective: Connective,
        position: usize,
    },
}

impl Group {
    fn opened_at(open_position: usize) -> Self {
        Self {
            open_position,
            entries: Vec::new(),
        }
    }

    /// Reduces a closed group to its single subtree.
    ///
    /// Only `expr` and `expr connective expr` are accepted.
    fn reduce(self) -> FilterResult<Predicate> {
        let open_position = self.open_position;
        let mut entries = self.entries.into_iter();
        match (entries.next(), entries.next(), entries.next(), entries.next()) {
            (None, ..) => Err(ParseError::EmptyGroup {
                position: open_position,
            }
            .into()),
            (Some(GroupEntry::Subtree(subtree)), None, ..) => Ok(subtree),
            (
                Some(GroupEntry::Subtree(left)),
                Some(GroupEntry::Connective { connective, .. }),
                Some(GroupEntry::Subtree(right)),
                None,
            ) => Ok(Predicate::combine(connective, left, right)),
            (_, Some(GroupEntry::Connective { connective, position }), None, _) => {
                Err(ParseError::misplaced_connective(connective, position).into())
            }
            _ => Err(ParseError::AmbiguousGroup {
                position: open_position,
            }
            .into()),
        }
    }
}

impl FilterParser {
    /// Parses a predicate string into a [`PredicateSet`].
    ///
    /// # Errors
    ///
    /// Returns `FilterError::Tokenize` for a malformed clause or literal.
    ///
    /// Returns `FilterError::Parse` for empty input, unbalanced or ambiguous
    /// groups, groups nested deeper than [`MAX_NESTING_DEPTH`], misplaced
    /// connectives, and column references that are not non-negative integers.
    pub fn parse(input: &str) -> FilterResult<PredicateSet> {
        if input.trim().is_empty() {
            return Err(ParseError::EmptyExpression.into());
        }

        let tokens = Lexer::new(input).tokenize_with_positions()?;

        let mut parser = Self {
            top_level: Vec::new(),
            open_groups: Vec::new(),
        };
        for token in tokens {
            parser.push_token(token)?;
        }
        let set = parser.finish()?;

        tracing::trace!(predicates = set.len(), "parsed predicate set");
        Ok(set)
    }

    fn push_token(&mut self, positioned: PositionedToken) -> FilterResult<()> {
        let PositionedToken { token, position } = positioned;
        match token {
            FilterToken::OpenParen => {
                if self.open_groups.len() >= MAX_NESTING_DEPTH {
                    return Err(ParseError::TooDeep {
                        position,
                        limit: MAX_NESTING_DEPTH,
                    }
                    .into());
                }
                self.open_groups.push(Group::opened_at(position));
                Ok(())
            }
            FilterToken::Clause {
                column,
                comparator,
                literal,
            } => {
                let column = parse_column(&column, position)?;
                self.push_subtree(Predicate::clause(column, comparator, literal))
            }
            FilterToken::Connective(connective) => self.push_connective(connective, position),
            FilterToken::CloseParen => self.close_group(position),
        }
    }

    /// Records an operand in the innermost group, or at the top level.
    ///
    /// Inside a group an operand may only start the group or follow a connective.
    fn push_subtree(&mut self, subtree: Predicate) -> FilterResult<()> {
        let Some(group) = self.open_groups.last_mut() else {
            self.top_level.push(subtree);
            return Ok(());
        };

        let accepts_operand = matches!(
            group.entries.last(),
            None | Some(GroupEntry::Connective { .. })
        );
        if !accepts_operand {
            return Err(ParseError::AmbiguousGroup {
                position: group.open_position,
            }
            .into());
        }
        group.entries.push(GroupEntry::Subtree(subtree));
        Ok(())
    }

    /// Records a connective, which must directly follow the group's only operand.
    fn push_connective(&mut self, connective: Connective, position: usize) -> FilterResult<()> {
        let Some(group) = self.open_groups.last_mut() else {
            return Err(ParseError::misplaced_connective(connective, position).into());
        };

        match group.entries.len() {
            1 => {}
            // `a and b` already fills the group
            3 => {
                return Err(ParseError::AmbiguousGroup {
                    position: group.open_position,
                }
                .into())
            }
            _ => return Err(ParseError::misplaced_connective(connective, position).into()),
        }

        group.entries.push(GroupEntry::Connective {
            connective,
            position,
        });
        Ok(())
    }

    /// Closes the innermost group and hands its subtree to the enclosing one.
    fn close_group(&mut self, position: usize) -> FilterResult<()> {
        let Some(group) = self.open_groups.pop() else {
            return Err(ParseError::UnexpectedCloseGroup { position }.into());
        };
        let subtree = group.reduce()?;
        self.push_subtree(subtree)
    }

    /// Checks that every group was closed and collects the top-level predicates.
    fn finish(self) -> FilterResult<PredicateSet> {
        if let Some(group) = self.open_groups.last() {
            return Err(ParseError::UnclosedGroup {
                position: group.open_position,
            }
            .into());
        }
        if self.top_level.is_empty() {
            return Err(ParseError::EmptyExpression.into());
        }
        Ok(PredicateSet::new(self.top_level))
    }
}

/// Validates a column reference as a non-negative integer.
fn parse_column(column: &str, position: usize) -> FilterResult<usize> {
    if column.is_empty() || !column.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseError::invalid_column(column, position).into());
    }
    column
        .parse::<usize>()
        .map_err(|_| ParseError::invalid_column(column, position).into())
}
