//! Recursive-descent parser for object masks.
//!
//! ```text
//! mask             := property | propertySet
//! propertySet      := '[' propertySequence ']'
//! propertySequence := property (',' property)*
//! property         := identifier propertyType? propertyChild?
//! propertyType     := '(' typeIdentifier ')'
//! propertyChild    := '.' property | propertySet
//! ```

use std::fmt;

use super::error::{MaskSyntaxError, MaskSyntaxErrorKind};
use super::property::{write_property_list, MaskProperty};
use super::token::{Token, TokenKind};
use super::tokenizer::Tokenizer;

/// Deepest property nesting a mask may use.
pub const MAX_NESTING_DEPTH: usize = 128;

/// Result of parsing a mask: one property, or a bracketed set of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedMask {
    Property(MaskProperty),
    PropertySet(Vec<MaskProperty>),
}

impl ParsedMask {
    /// The top-level properties, one or many.
    pub fn roots(&self) -> &[MaskProperty] {
        match self {
            ParsedMask::Property(property) => std::slice::from_ref(property),
            ParsedMask::PropertySet(set) => set,
        }
    }

    pub fn into_roots(self) -> Vec<MaskProperty> {
        match self {
            ParsedMask::Property(property) => vec![property],
            ParsedMask::PropertySet(set) => set,
        }
    }
}

impl fmt::Display for ParsedMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParsedMask::Property(property) => write!(f, "{}", property),
            ParsedMask::PropertySet(set) if set.len() == 1 => write!(f, "[{}]", set[0]),
            ParsedMask::PropertySet(set) => write_property_list(f, set),
        }
    }
}

/// Parse a complete object mask.
///
/// The whole input must be consumed and every top-level property must be
/// a `mask` or `filterMask` root.
pub fn parse(input: &str) -> Result<ParsedMask, MaskSyntaxError> {
    MaskParser::new(input).parse_mask().map_err(|e| {
        log::debug!("rejected object mask '{}': {}", input, e);
        e
    })
}

/// Parser state for a single mask string.
#[derive(Debug, Clone)]
pub struct MaskParser<'a> {
    tokenizer: Tokenizer<'a>,
    /// Properties currently open on the call stack.
    depth: usize,
}

impl<'a> MaskParser<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            tokenizer: Tokenizer::new(input),
            depth: 0,
        }
    }

    /// Parse a full mask, enforcing the root property rule.
    pub fn parse_mask(&mut self) -> Result<ParsedMask, MaskSyntaxError> {
        let parsed = self.parse_fragment()?;
        if parsed.roots().iter().all(MaskProperty::is_root) {
            Ok(parsed)
        } else {
            Err(MaskSyntaxError::missing_root_property())
        }
    }

    /// Parse a property or property set that may start anywhere in a
    /// mask tree. The input must still be fully consumed.
    pub fn parse_fragment(&mut self) -> Result<ParsedMask, MaskSyntaxError> {
        let token = self.tokenizer.current_token().clone();
        let parsed = match token.kind {
            TokenKind::Identifier => ParsedMask::Property(self.parse_property()?),
            TokenKind::PropertySetStart => ParsedMask::PropertySet(self.parse_property_set()?),
            _ => {
                return Err(MaskSyntaxError::unexpected_token(
                    "a 'mask' or 'filterMask' root property, or a property set of root properties",
                    &token,
                ))
            }
        };

        let trailing = self.tokenizer.current_token();
        if !trailing.is_end_of_input() {
            return Err(MaskSyntaxError::extraneous_text(trailing));
        }
        Ok(parsed)
    }

    /// `'[' propertySequence ']'`
    pub fn parse_property_set(&mut self) -> Result<Vec<MaskProperty>, MaskSyntaxError> {
        self.recognize(TokenKind::PropertySetStart, "'['")?;
        let sequence = self.parse_property_sequence()?;
        self.recognize(TokenKind::PropertySetEnd, "']'")?;
        Ok(sequence)
    }

    /// `property (',' property)*`
    pub fn parse_property_sequence(&mut self) -> Result<Vec<MaskProperty>, MaskSyntaxError> {
        let mut sequence = vec![self.parse_property()?];
        while self.tokenizer.current_token().kind == TokenKind::PropertySetSeparator {
            self.tokenizer.next_token();
            sequence.push(self.parse_property()?);
        }
        Ok(sequence)
    }

    /// `identifier propertyType? propertyChild?`
    ///
    /// Fails once nesting passes [`MAX_NESTING_DEPTH`].
    pub fn parse_property(&mut self) -> Result<MaskProperty, MaskSyntaxError> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(MaskSyntaxError::nesting_too_deep(self.tokenizer.current_token()));
        }
        self.depth += 1;
        let property = self.parse_nested_property();
        self.depth -= 1;
        property
    }

    fn parse_nested_property(&mut self) -> Result<MaskProperty, MaskSyntaxError> {
        let name = self.parse_property_name()?;

        let mut property = if self.tokenizer.current_token().kind == TokenKind::PropertyTypeStart {
            MaskProperty::with_type(name, self.parse_property_type()?)
        } else {
            MaskProperty::new(name)
        };

        if let Some(children) = self.parse_property_children()? {
            property.add_children(children);
        }
        Ok(property)
    }

    /// `'.' property | propertySet`, or nothing.
    pub fn parse_property_children(&mut self) -> Result<Option<Vec<MaskProperty>>, MaskSyntaxError> {
        match self.tokenizer.current_token().kind {
            TokenKind::PropertyChildSeparator => {
                self.tokenizer.next_token();
                Ok(Some(vec![self.parse_property()?]))
            }
            TokenKind::PropertySetStart => Ok(Some(self.parse_property_set()?)),
            _ => Ok(None),
        }
    }

    /// An identifier that is also a legal property name.
    pub fn parse_property_name(&mut self) -> Result<String, MaskSyntaxError> {
        let token = self.recognize(TokenKind::Identifier, "a property name")?;
        if !token.is_valid_property_name() {
            return Err(MaskSyntaxError::new(
                MaskSyntaxErrorKind::InvalidPropertyName,
                "a property name matching [A-Za-z][A-Za-z0-9]*",
                Some(token),
            ));
        }
        Ok(token.text)
    }

    /// `'(' typeIdentifier ')'`, returning the type name.
    pub fn parse_property_type(&mut self) -> Result<String, MaskSyntaxError> {
        self.recognize(TokenKind::PropertyTypeStart, "'('")?;
        let token = self.recognize(TokenKind::Identifier, "a property type name")?;
        if !token.is_valid_type_name() {
            return Err(MaskSyntaxError::new(
                MaskSyntaxErrorKind::InvalidTypeName,
                "a type name such as SoftLayer_Hardware_Server",
                Some(token),
            ));
        }
        self.recognize(TokenKind::PropertyTypeEnd, "')'")?;
        Ok(token.text)
    }

    /// Consume the current token if it has the wanted kind.
    fn recognize(&mut self, kind: TokenKind, expected: &str) -> Result<Token, MaskSyntaxError> {
        let token = self.tokenizer.current_token().clone();
        if token.kind != kind {
            return Err(MaskSyntaxError::unexpected_token(expected, &token));
        }
        self.tokenizer.next_token();
        Ok(token)
    }
}
