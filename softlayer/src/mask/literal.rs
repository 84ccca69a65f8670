//! Masks expressed as nested strings, sequences and mappings.
//!
//! A literal is flattened into dotted path fragments and the fragments are
//! folded back together through the parser, so
//! `{"top": ["a", {"b": "c"}]}` becomes `top[a,b.c]`.

use serde_json::Value;

use super::parser::MaskParser;
use super::property::{insert_merged, MaskProperty};
use super::MaskSyntaxError;
use crate::{Error, Result};

/// A mask given as a nested structure rather than a mask string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MaskLiteral {
    Text(String),
    Sequence(Vec<MaskLiteral>),
    /// Ordered key/value pairs.
    Mapping(Vec<(String, MaskLiteral)>),
}

impl MaskLiteral {
    /// Build a mapping from ordered pairs.
    pub fn mapping<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<MaskLiteral>,
    {
        MaskLiteral::Mapping(pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }

    /// True when the literal would flatten to nothing.
    pub fn is_empty(&self) -> bool {
        match self {
            MaskLiteral::Text(text) => text.is_empty(),
            MaskLiteral::Sequence(items) => items.iter().all(MaskLiteral::is_empty),
            MaskLiteral::Mapping(pairs) => pairs.is_empty(),
        }
    }

    /// Flatten into dotted fragments resolved against `base`.
    ///
    /// Empty literals resolve to `base` alone (or nothing when `base` is
    /// empty). Mapping keys become the base of their values, and the
    /// results are then resolved against the outer `base`.
    pub fn fragments(&self, base: &str) -> Vec<String> {
        match self {
            MaskLiteral::Text(text) => {
                match (base.is_empty(), text.is_empty()) {
                    (true, true) => Vec::new(),
                    (false, true) => vec![base.to_string()],
                    (true, false) => vec![text.to_string()],
                    (false, false) => vec![format!("{}.{}", base, text)],
                }
            }
            MaskLiteral::Sequence(items) if items.is_empty() => base_only(base),
            MaskLiteral::Sequence(items) => items.iter().flat_map(|item| item.fragments(base)).collect(),
            MaskLiteral::Mapping(pairs) if pairs.is_empty() => base_only(base),
            MaskLiteral::Mapping(pairs) => pairs
                .iter()
                .flat_map(|(key, value)| value.fragments(key))
                .flat_map(|fragment| MaskLiteral::Text(fragment).fragments(base))
                .collect(),
        }
    }

    /// Reassemble the flattened fragments into canonical mask syntax.
    ///
    /// Fragments sharing a prefix are merged, so the result uses the dot
    /// form for single children and brackets for several. Several distinct
    /// top-level properties render as a property set.
    pub fn to_mask_string(&self) -> std::result::Result<String, MaskSyntaxError> {
        let mut roots: Vec<MaskProperty> = Vec::new();
        for fragment in self.fragments("") {
            let parsed = MaskParser::new(&fragment).parse_fragment()?;
            for property in parsed.into_roots() {
                insert_merged(&mut roots, property);
            }
        }
        Ok(render_roots(&roots))
    }
}

fn base_only(base: &str) -> Vec<String> {
    if base.is_empty() {
        Vec::new()
    } else {
        vec![base.to_string()]
    }
}

/// One root renders bare, several as a bracketed property set.
pub(crate) fn render_roots(roots: &[MaskProperty]) -> String {
    match roots {
        [] => String::new(),
        [only] => only.to_string(),
        many => {
            let rendered: Vec<String> = many.iter().map(ToString::to_string).collect();
            format!("[{}]", rendered.join(","))
        }
    }
}

impl From<&str> for MaskLiteral {
    fn from(text: &str) -> Self {
        MaskLiteral::Text(text.to_string())
    }
}

impl From<String> for MaskLiteral {
    fn from(text: String) -> Self {
        MaskLiteral::Text(text)
    }
}

impl From<&String> for MaskLiteral {
    fn from(text: &String) -> Self {
        MaskLiteral::Text(text.clone())
    }
}

impl<T: Into<MaskLiteral>> From<Vec<T>> for MaskLiteral {
    fn from(items: Vec<T>) -> Self {
        MaskLiteral::Sequence(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<MaskLiteral>, const N: usize> From<[T; N]> for MaskLiteral {
    fn from(items: [T; N]) -> Self {
        MaskLiteral::Sequence(items.into_iter().map(Into::into).collect())
    }
}

impl TryFrom<Value> for MaskLiteral {
    type Error = Error;

    /// Strings, arrays and objects map onto the three literal forms.
    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::String(text) => Ok(MaskLiteral::Text(text)),
            Value::Array(items) => items
                .into_iter()
                .map(MaskLiteral::try_from)
                .collect::<Result<Vec<_>>>()
                .map(MaskLiteral::Sequence),
            Value::Object(map) => map
                .into_iter()
                .map(|(key, value)| Ok((key, MaskLiteral::try_from(value)?)))
                .collect::<Result<Vec<_>>>()
                .map(MaskLiteral::Mapping),
            other => Err(Error::InvalidArgument(format!(
                "object mask literals must be strings, arrays or objects, got {}",
                other
            ))),
        }
    }
}
