//! Lexical units of the object mask grammar.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

static PROPERTY_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9]*$").expect("property name pattern"));

static TYPE_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9]*(_[A-Za-z][A-Za-z0-9]*)*$").expect("type name pattern")
});

/// Token categories produced by the tokenizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// No input left. Sticky once reached.
    EndOfInput,
    /// `[A-Za-z][A-Za-z0-9_]*`
    Identifier,
    /// `[`
    PropertySetStart,
    /// `,`
    PropertySetSeparator,
    /// `]`
    PropertySetEnd,
    /// `(`
    PropertyTypeStart,
    /// `)`
    PropertyTypeEnd,
    /// `.`
    PropertyChildSeparator,
    /// Unrecognized input; the token text holds everything that was left.
    Invalid,
}

impl TokenKind {
    /// Human readable label used in syntax errors.
    pub fn label(self) -> &'static str {
        match self {
            TokenKind::EndOfInput => "end of input",
            TokenKind::Identifier => "identifier",
            TokenKind::PropertySetStart => "property set start",
            TokenKind::PropertySetSeparator => "property set separator",
            TokenKind::PropertySetEnd => "property set end",
            TokenKind::PropertyTypeStart => "property type start",
            TokenKind::PropertyTypeEnd => "property type end",
            TokenKind::PropertyChildSeparator => "property child separator",
            TokenKind::Invalid => "invalid token",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single token scanned from a mask string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Raw lexeme. Empty for end of input.
    pub text: String,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    pub fn end_of_input() -> Self {
        Self::new(TokenKind::EndOfInput, "")
    }

    pub fn is_end_of_input(&self) -> bool {
        self.kind == TokenKind::EndOfInput
    }

    pub fn is_identifier(&self) -> bool {
        self.kind == TokenKind::Identifier
    }

    pub fn is_invalid(&self) -> bool {
        self.kind == TokenKind::Invalid
    }

    /// Identifier usable as a property name (no underscores).
    pub fn is_valid_property_name(&self) -> bool {
        self.is_identifier() && PROPERTY_NAME.is_match(&self.text)
    }

    /// Identifier usable as a type name (`Segment_Segment_...`).
    pub fn is_valid_type_name(&self) -> bool {
        self.is_identifier() && TYPE_NAME.is_match(&self.text)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::EndOfInput => f.write_str("end of input"),
            TokenKind::Invalid => write!(f, "unrecognized text '{}'", self.text),
            kind => write!(f, "{} '{}'", kind, self.text),
        }
    }
}
