//! Object mask grammar: tokenizer, parser, syntax tree and merging.
//!
//! An object mask selects the fields and relations a remote call returns:
//!
//! - `mask.id`: one child
//! - `mask[id,hostname]`: several children
//! - `mask(SoftLayer_Hardware_Server).datacenter.name`: type-qualified
//! - `[mask.id,filterMask.name]`: a set of root properties
//!
//! Every complete mask starts from a `mask` or `filterMask` root.

mod error;
mod literal;
mod parser;
mod property;
mod token;
mod tokenizer;

pub use error::{MaskSyntaxError, MaskSyntaxErrorKind};
pub use literal::MaskLiteral;
pub use parser::{parse, MaskParser, ParsedMask, MAX_NESTING_DEPTH};
pub use property::{MaskProperty, ROOT_PROPERTY_NAMES};
pub use token::{Token, TokenKind};
pub use tokenizer::Tokenizer;

use literal::render_roots;
use property::insert_merged;

/// Merge several complete masks into one.
///
/// Roots that share name and type are folded together, so `mask.a` and
/// `mask.b` become `mask[a,b]`. Distinct roots render as a property set.
/// Returns an empty string when no masks are given.
pub fn merge_masks<I, S>(masks: I) -> Result<String, MaskSyntaxError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut roots: Vec<MaskProperty> = Vec::new();
    for mask in masks {
        for root in parse(mask.as_ref())?.into_roots() {
            insert_merged(&mut roots, root);
        }
    }
    let merged = render_roots(&roots);
    log::debug!("merged object mask: {}", merged);
    Ok(merged)
}
