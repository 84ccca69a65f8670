//! Syntax errors raised while parsing object masks.

use std::fmt;

use super::token::Token;

/// Categories of mask syntax errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaskSyntaxErrorKind {
    /// A token did not match what the grammar required at that point.
    UnexpectedToken,
    /// An identifier was found but is not a legal property name.
    InvalidPropertyName,
    /// An identifier was found but is not a legal type name.
    InvalidTypeName,
    /// A complete mask was followed by more input.
    ExtraneousText,
    /// The top level was not a `mask`/`filterMask` root property.
    MissingRootProperty,
    /// Properties were nested past the parser's depth limit.
    NestingTooDeep,
}

/// Structured syntax error with the expected construct and the token found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskSyntaxError {
    pub kind: MaskSyntaxErrorKind,
    /// What the parser was looking for.
    pub expected: String,
    /// Offending token, when the failure is tied to one.
    pub found: Option<Token>,
}

impl MaskSyntaxError {
    pub fn new(kind: MaskSyntaxErrorKind, expected: impl Into<String>, found: Option<Token>) -> Self {
        Self {
            kind,
            expected: expected.into(),
            found,
        }
    }

    pub fn unexpected_token(expected: impl Into<String>, found: &Token) -> Self {
        Self::new(MaskSyntaxErrorKind::UnexpectedToken, expected, Some(found.clone()))
    }

    pub fn extraneous_text(found: &Token) -> Self {
        Self::new(MaskSyntaxErrorKind::ExtraneousText, "end of input after object mask", Some(found.clone()))
    }

    pub fn nesting_too_deep(found: &Token) -> Self {
        Self::new(
            MaskSyntaxErrorKind::NestingTooDeep,
            format!("at most {} nested properties", super::parser::MAX_NESTING_DEPTH),
            Some(found.clone()),
        )
    }

    pub fn missing_root_property() -> Self {
        Self::new(
            MaskSyntaxErrorKind::MissingRootProperty,
            "a 'mask' or 'filterMask' root property",
            None,
        )
    }
}

impl fmt::Display for MaskSyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            MaskSyntaxErrorKind::MissingRootProperty => {
                write!(f, "object mask must begin with {}", self.expected)?
            }
            MaskSyntaxErrorKind::ExtraneousText => f.write_str("extraneous text after object mask")?,
            MaskSyntaxErrorKind::NestingTooDeep => write!(f, "object mask nests too deeply, expected {}", self.expected)?,
            MaskSyntaxErrorKind::InvalidPropertyName => f.write_str("invalid property name")?,
            MaskSyntaxErrorKind::InvalidTypeName => f.write_str("invalid property type name")?,
            MaskSyntaxErrorKind::UnexpectedToken => write!(f, "expected {}", self.expected)?,
        }
        if let Some(token) = &self.found {
            write!(f, ", found {}", token)?;
        }
        Ok(())
    }
}

impl std::error::Error for MaskSyntaxError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mask::TokenKind;

    #[test]
    fn test_display_unexpected_token() {
        let err = MaskSyntaxError::unexpected_token("']'", &Token::new(TokenKind::Identifier, "bob"));
        assert_eq!(err.to_string(), "expected ']', found identifier 'bob'");
    }

    #[test]
    fn test_display_extraneous_text() {
        let err = MaskSyntaxError::extraneous_text(&Token::new(TokenKind::PropertySetSeparator, ","));
        assert_eq!(err.to_string(), "extraneous text after object mask, found property set separator ','");
    }

    #[test]
    fn test_display_nesting_too_deep() {
        let err = MaskSyntaxError::nesting_too_deep(&Token::new(TokenKind::Identifier, "a"));
        assert_eq!(
            err.to_string(),
            "object mask nests too deeply, expected at most 128 nested properties, found identifier 'a'"
        );
    }

    #[test]
    fn test_display_missing_root() {
        assert_eq!(
            MaskSyntaxError::missing_root_property().to_string(),
            "object mask must begin with a 'mask' or 'filterMask' root property"
        );
    }
}
