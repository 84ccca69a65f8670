//! Scanner that turns a mask string into tokens with one token of lookahead.

use once_cell::sync::Lazy;
use regex::Regex;

use super::token::{Token, TokenKind};

/// Lexical patterns in priority order. The first match wins.
static PATTERNS: Lazy<Vec<(TokenKind, Regex)>> = Lazy::new(|| {
    [
        (TokenKind::PropertySetStart, r"^\["),
        (TokenKind::PropertySetSeparator, r"^,"),
        (TokenKind::PropertySetEnd, r"^\]"),
        (TokenKind::PropertyTypeStart, r"^\("),
        (TokenKind::PropertyTypeEnd, r"^\)"),
        (TokenKind::PropertyChildSeparator, r"^\."),
        (TokenKind::Identifier, r"^[A-Za-z][A-Za-z0-9_]*"),
    ]
    .into_iter()
    .map(|(kind, pattern)| (kind, Regex::new(pattern).expect("token pattern")))
    .collect()
});

/// Tokenizer over a borrowed mask string.
#[derive(Debug, Clone)]
pub struct Tokenizer<'a> {
    input: &'a str,
    /// Byte offset of the first unscanned character.
    position: usize,
    current: Option<Token>,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            position: 0,
            current: None,
        }
    }

    /// Peek at the current token, scanning the first one on demand.
    pub fn current_token(&mut self) -> &Token {
        if self.current.is_none() {
            self.current = Some(self.scan());
        }
        self.current.get_or_insert_with(Token::end_of_input)
    }

    /// Advance and return the new current token.
    pub fn next_token(&mut self) -> &Token {
        let token = self.scan();
        self.current.insert(token)
    }

    /// Byte offset of the unscanned remainder.
    pub fn position(&self) -> usize {
        self.position
    }

    fn scan(&mut self) -> Token {
        let rest = &self.input[self.position..];
        let trimmed = rest.trim_start();
        self.position += rest.len() - trimmed.len();

        if trimmed.is_empty() {
            return Token::end_of_input();
        }

        for (kind, pattern) in PATTERNS.iter() {
            if let Some(found) = pattern.find(trimmed) {
                self.position += found.end();
                return Token::new(*kind, found.as_str());
            }
        }

        // Nothing matched; the rest of the input is unusable
        log::trace!("invalid mask text at offset {}: '{}'", self.position, trimmed);
        self.position = self.input.len();
        Token::new(TokenKind::Invalid, trimmed)
    }
}

impl Iterator for Tokenizer<'_> {
    type Item = Token;

    /// Yields the current token and advances, stopping at end of input.
    fn next(&mut self) -> Option<Token> {
        let token = self.current_token().clone();
        if token.is_end_of_input() {
            return None;
        }
        self.next_token();
        Some(token)
    }
}
