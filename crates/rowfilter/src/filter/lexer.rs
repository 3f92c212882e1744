//! Lexer (tokenizer) for predicate expressions.

use std::iter::Peekable;
use std::str::CharIndices;

use strsim::levenshtein;

use super::ast::{Comparator, Connective};
use super::error::TokenizeError;

/// Maximum edit distance for suggesting a comparator in error messages.
const MAX_SUGGESTION_DISTANCE: usize = 1;

/// A token with its position in the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionedToken {
    /// The token.
    pub token: FilterToken,
    /// The byte position where the token starts (0-indexed).
    pub position: usize,
}

/// A token in a predicate expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterToken {
    /// Opening parenthesis `(`.
    OpenParen,

    /// Closing parenthesis `)`.
    CloseParen,

    /// The word `and` or `or`, in any case.
    Connective(Connective),

    /// A `column comparator literal` triple.
    ///
    /// The column is kept as written; the parser checks that it is an index.
    Clause {
        column: String,
        comparator: Comparator,
        literal: String,
    },
}

/// Lexer for tokenizing predicate expressions.
pub struct Lexer<'a> {
    input: &'a str,
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input string.
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.char_indices().peekable(),
        }
    }

    /// Peeks at the next character without consuming it.
    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, c)| c)
    }

    /// Consumes and returns the next character.
    fn next_char(&mut self) -> Option<char> {
        self.chars.next().map(|(_, c)| c)
    }

    /// Returns the byte offset of the next unconsumed character.
    fn current_position(&mut self) -> usize {
        self.chars.peek().map_or(self.input.len(), |&(i, _)| i)
    }

    /// Skips whitespace characters.
    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.next_char();
        }
    }

    fn is_word_boundary(c: char) -> bool {
        c.is_whitespace() || c == '(' || c == ')'
    }

    /// Reads a bare word up to whitespace, a parenthesis, or end of input.
    fn read_word(&mut self) -> &'a str {
        let start = self.current_position();
        while self.peek().is_some_and(|c| !Self::is_word_boundary(c)) {
            self.next_char();
        }
        let end = self.current_position();
        let input = self.input;
        &input[start..end]
    }

    /// Reads a quoted string (single or double quotes), keeping the content verbatim.
    fn read_quoted_string(&mut self, quote_char: char) -> Result<String, TokenizeError> {
        let start = self.current_position();
        // Consume the opening quote
        self.next_char();

        let mut result = String::new();
        while let Some(c) = self.next_char() {
            if c == quote_char {
                return Ok(result);
            }
            result.push(c);
        }
        Err(TokenizeError::UnterminatedQuote { position: start })
    }

    /// Reads a clause operand: a quoted string, a bare word, or nothing.
    fn read_operand(&mut self) -> Result<Option<String>, TokenizeError> {
        match self.peek() {
            Some(c @ ('"' | '\'')) => self.read_quoted_string(c).map(Some),
            Some(c) if !Self::is_word_boundary(c) => Ok(Some(self.read_word().to_string())),
            _ => Ok(None),
        }
    }

    /// Reads the comparator and literal following a column reference.
    fn read_clause(&mut self, column: String, position: usize) -> Result<FilterToken, TokenizeError> {
        self.skip_whitespace();
        let symbol_position = self.current_position();
        let symbol = self.read_word();

        self.skip_whitespace();
        let literal = self.read_operand()?;

        let Some(literal) = literal.filter(|_| !symbol.is_empty()) else {
            return Err(TokenizeError::IncompleteClause { position });
        };

        let comparator = Comparator::from_symbol(symbol).ok_or_else(|| {
            TokenizeError::unknown_comparator(symbol, symbol_position, suggest_comparator(symbol))
        })?;

        Ok(FilterToken::Clause {
            column,
            comparator,
            literal,
        })
    }

    /// Returns the next token with its position, or None at end of input.
    pub fn next_token(&mut self) -> Result<Option<PositionedToken>, TokenizeError> {
        self.skip_whitespace();

        let Some(c) = self.peek() else {
            return Ok(None);
        };
        let position = self.current_position();

        let token = match c {
            '(' => {
                self.next_char();
                FilterToken::OpenParen
            }
            ')' => {
                self.next_char();
                FilterToken::CloseParen
            }
            // A quoted word is never a connective
            '"' | '\'' => {
                let column = self.read_quoted_string(c)?;
                self.read_clause(column, position)?
            }
            _ => {
                let word = self.read_word();
                match Connective::from_word(word) {
                    Some(connective) => FilterToken::Connective(connective),
                    None => self.read_clause(word.to_string(), position)?,
                }
            }
        };

        Ok(Some(PositionedToken { token, position }))
    }

    /// Collects all tokens into a vector (without positions).
    #[cfg(test)]
    pub fn tokenize(self) -> Result<Vec<FilterToken>, TokenizeError> {
        Ok(self
            .tokenize_with_positions()?
            .into_iter()
            .map(|pt| pt.token)
            .collect())
    }

    /// Collects all tokens, failing on the first malformed one.
    pub fn tokenize_with_positions(mut self) -> Result<Vec<PositionedToken>, TokenizeError> {
        let mut tokens = Vec::new();
        while let Some(positioned_token) = self.next_token()? {
            tokens.push(positioned_token);
        }
        Ok(tokens)
    }
}

/// Finds the comparator the user most likely meant.
///
/// A reversed symbol such as `=<` maps to `<=`; otherwise the first
/// comparator within [`MAX_SUGGESTION_DISTANCE`] edits is returned.
fn suggest_comparator(symbol: &str) -> Option<&'static str> {
    let reversed: String = symbol.chars().rev().collect();
    if let Some(comparator) = Comparator::from_symbol(&reversed) {
        return Some(comparator.symbol());
    }

    Comparator::ALL
        .iter()
        .map(|c| (c.symbol(), levenshtein(symbol, c.symbol())))
        .filter(|&(_, distance)| distance <= MAX_SUGGESTION_DISTANCE)
        .min_by_key(|&(_, distance)| distance)
        .map(|(s, _)| s)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clause(column: &str, comparator: Comparator, literal: &str) -> FilterToken {
        FilterToken::Clause {
            column: column.to_string(),
            comparator,
            literal: literal.to_string(),
        }
    }

    #[test]
    fn test_tokenize_parentheses() {
        let tokens = Lexer::new("( )").tokenize().unwrap();
        assert_eq!(tokens, vec![FilterToken::OpenParen, FilterToken::CloseParen]);

        let tokens = Lexer::new("(())").tokenize().unwrap();
        assert_eq!(
            tokens,
            vec![
                FilterToken::OpenParen,
                FilterToken::OpenParen,
                FilterToken::CloseParen,
                FilterToken::CloseParen,
            ]
        );
    }

    #[test]
    fn test_tokenize_bare_clause() {
        let tokens = Lexer::new("2 <= 100").tokenize().unwrap();
        assert_eq!(tokens, vec![clause("2", Comparator::LessOrEqual, "100")]);
    }

    #[test]
    fn test_tokenize_clause_in_group_without_padding() {
        let tokens = Lexer::new("(2 <= 100)").tokenize().unwrap();
        assert_eq!(
            tokens,
            vec![
                FilterToken::OpenParen,
                clause("2", Comparator::LessOrEqual, "100"),
                FilterToken::CloseParen,
            ]
        );
    }

    #[test]
    fn test_tokenize_all_comparators() {
        for comparator in Comparator::ALL {
            let input = format!("0 {} 5", comparator.symbol());
            let tokens = Lexer::new(&input).tokenize().unwrap();
            assert_eq!(tokens, vec![clause("0", comparator, "5")], "input: {input}");
        }
    }

    #[test]
    fn test_tokenize_double_quoted_literal() {
        let tokens = Lexer::new(r#"0 = "practo""#).tokenize().unwrap();
        assert_eq!(tokens, vec![clause("0", Comparator::Equal, "practo")]);
    }

    #[test]
    fn test_tokenize_quoted_literal_keeps_whitespace_and_parens() {
        let tokens = Lexer::new(r#"(1 != "do (not) great")"#).tokenize().unwrap();
        assert_eq!(
            tokens,
            vec![
                FilterToken::OpenParen,
                clause("1", Comparator::NotEqual, "do (not) great"),
                FilterToken::CloseParen,
            ]
        );
    }

    #[test]
    fn test_tokenize_single_quoted_literal() {
        let tokens = Lexer::new(r#"0 = 'say "hi"'"#).tokenize().unwrap();
        assert_eq!(tokens, vec![clause("0", Comparator::Equal, r#"say "hi""#)]);
    }

    #[test]
    fn test_tokenize_backslash_is_verbatim() {
        let tokens = Lexer::new(r#"0 = "a\b""#).tokenize().unwrap();
        assert_eq!(tokens, vec![clause("0", Comparator::Equal, r"a\b")]);
    }

    #[test]
    fn test_tokenize_empty_quoted_literal() {
        let tokens = Lexer::new(r#"0 = """#).tokenize().unwrap();
        assert_eq!(tokens, vec![clause("0", Comparator::Equal, "")]);
    }

    #[test]
    fn test_tokenize_connectives_case_insensitive() {
        for word in ["and", "AND", "And", "aNd"] {
            let tokens = Lexer::new(word).tokenize().unwrap();
            assert_eq!(tokens, vec![FilterToken::Connective(Connective::And)]);
        }
        for word in ["or", "OR", "Or"] {
            let tokens = Lexer::new(word).tokenize().unwrap();
            assert_eq!(tokens, vec![FilterToken::Connective(Connective::Or)]);
        }
    }

    #[test]
    fn test_tokenize_connective_between_groups() {
        let tokens = Lexer::new("(0 = a)and(1 = b)").tokenize().unwrap();
        assert_eq!(
            tokens,
            vec![
                FilterToken::OpenParen,
                clause("0", Comparator::Equal, "a"),
                FilterToken::CloseParen,
                FilterToken::Connective(Connective::And),
                FilterToken::OpenParen,
                clause("1", Comparator::Equal, "b"),
                FilterToken::CloseParen,
            ]
        );
    }

    #[test]
    fn test_connective_word_inside_clause_is_literal() {
        let tokens = Lexer::new("0 = and").tokenize().unwrap();
        assert_eq!(tokens, vec![clause("0", Comparator::Equal, "and")]);
    }

    #[test]
    fn test_connective_requires_whole_word() {
        // "orange" starts with "or" but is a column reference, not a connective
        let tokens = Lexer::new("orange = 1").tokenize().unwrap();
        assert_eq!(tokens, vec![clause("orange", Comparator::Equal, "1")]);
    }

    #[test]
    fn test_quoted_connective_is_not_connective() {
        let tokens = Lexer::new(r#""and" = 1"#).tokenize().unwrap();
        assert_eq!(tokens, vec![clause("and", Comparator::Equal, "1")]);
    }

    #[test]
    fn test_tokenize_positions() {
        let tokens = Lexer::new("(0 = a) or (1 = b)")
            .tokenize_with_positions()
            .unwrap();
        let positions: Vec<usize> = tokens.iter().map(|t| t.position).collect();
        assert_eq!(positions, vec![0, 1, 6, 8, 11, 12, 17]);
    }

    #[test]
    fn test_tokenize_unicode_literal() {
        let tokens = Lexer::new("(0 = café) and (1 = \"naïve x\")")
            .tokenize()
            .unwrap();
        assert_eq!(tokens[1], clause("0", Comparator::Equal, "café"));
        assert_eq!(tokens[5], clause("1", Comparator::Equal, "naïve x"));
    }

    #[test]
    fn test_unterminated_quote() {
        let err = Lexer::new(r#"(0 = "practo)"#).tokenize().unwrap_err();
        assert_eq!(err, TokenizeError::UnterminatedQuote { position: 5 });
    }

    #[test]
    fn test_incomplete_clause_missing_literal() {
        let err = Lexer::new("(0 =)").tokenize().unwrap_err();
        assert_eq!(err, TokenizeError::IncompleteClause { position: 1 });
    }

    #[test]
    fn test_incomplete_clause_only_column() {
        let err = Lexer::new("(0)").tokenize().unwrap_err();
        assert_eq!(err, TokenizeError::IncompleteClause { position: 1 });

        let err = Lexer::new("0").tokenize().unwrap_err();
        assert_eq!(err, TokenizeError::IncompleteClause { position: 0 });
    }

    #[test]
    fn test_two_parts_is_incomplete_not_unknown_comparator() {
        let err = Lexer::new("(0 practo)").tokenize().unwrap_err();
        assert_eq!(err, TokenizeError::IncompleteClause { position: 1 });
    }

    #[test]
    fn test_unknown_comparator() {
        let err = Lexer::new("0 ~ 5").tokenize().unwrap_err();
        assert_eq!(err, TokenizeError::unknown_comparator("~", 2, Some("=")));

        let err = Lexer::new("0 like 5").tokenize().unwrap_err();
        assert_eq!(err, TokenizeError::unknown_comparator("like", 2, None));
    }

    #[test]
    fn test_double_equals_is_rejected() {
        let err = Lexer::new("0 == 5").tokenize().unwrap_err();
        assert_eq!(err, TokenizeError::unknown_comparator("==", 2, Some("=")));
    }

    #[test]
    fn test_suggest_reversed_comparators() {
        assert_eq!(suggest_comparator("=<"), Some("<="));
        assert_eq!(suggest_comparator("=>"), Some(">="));
        assert_eq!(suggest_comparator("=!"), Some("!="));
    }

    #[test]
    fn test_suggest_nothing_for_distant_symbol() {
        assert_eq!(suggest_comparator("contains"), None);
    }

    #[test]
    fn test_tokenize_empty_input() {
        assert_eq!(Lexer::new("").tokenize().unwrap(), vec![]);
        assert_eq!(Lexer::new("   \t\n").tokenize().unwrap(), vec![]);
    }
}
