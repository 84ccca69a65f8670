//! Chainable per-call request options.
//!
//! A [`ParameterFilter`] collects the object id, object mask, result window
//! and object filter for one remote call, then hands itself to its target
//! through [`ParameterFilter::invoke`]. Every `with_*` method returns a new
//! filter and leaves the receiver alone, so a stored chain can be branched:
//!
//! ```ignore
//! let server = account.object_with_id(1234)?;
//! let summary = server.with_object_mask(["mask[id,hostname]"])?.invoke("getObject", vec![]);
//! let full = server.with_object_mask(["mask.datacenter.name"])?.invoke("getObject", vec![]);
//! ```

use std::fmt;

use serde_json::Value;

use crate::mask::{self, MaskLiteral};
use crate::object_filter::ObjectFilter;
use crate::{Error, Result};

/// Receiver of a finished filter chain, typically a remote service.
pub trait FilterTarget {
    type Output;

    /// Perform `method` with the options collected in `filter`.
    fn call_with_filter(&self, method: &str, filter: &ParameterFilter<'_, Self>, args: Vec<Value>) -> Self::Output;
}

/// Options accumulated by a filter chain. Unset entries are `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterParameters {
    pub object_id: Option<Value>,
    /// Mask fragments in the order they were added.
    pub object_mask: Option<Vec<MaskLiteral>>,
    pub result_offset: Option<i64>,
    pub result_limit: Option<i64>,
    pub object_filter: Option<ObjectFilter>,
}

/// Immutable builder of request options bound to a target.
pub struct ParameterFilter<'t, T: ?Sized> {
    target: &'t T,
    parameters: FilterParameters,
}

impl<T: ?Sized> Clone for ParameterFilter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            target: self.target,
            parameters: self.parameters.clone(),
        }
    }
}

impl<T: ?Sized> fmt::Debug for ParameterFilter<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParameterFilter")
            .field("parameters", &self.parameters)
            .finish_non_exhaustive()
    }
}

impl<'t, T: FilterTarget + ?Sized> ParameterFilter<'t, T> {
    /// Start an empty chain for `target`.
    pub fn new(target: &'t T) -> Self {
        Self {
            target,
            parameters: FilterParameters::default(),
        }
    }

    pub fn target(&self) -> &'t T {
        self.target
    }

    pub fn parameters(&self) -> &FilterParameters {
        &self.parameters
    }

    /// Copy of this filter with one more entry applied.
    fn extended(&self, apply: impl FnOnce(&mut FilterParameters)) -> Self {
        let mut parameters = self.parameters.clone();
        apply(&mut parameters);
        Self {
            target: self.target,
            parameters,
        }
    }

    /// Scope the call to one remote object.
    pub fn with_object_id(&self, id: impl Into<Value>) -> Result<Self> {
        let id = id.into();
        if id.is_null() {
            return Err(Error::InvalidArgument("object id must not be null".to_string()));
        }
        Ok(self.extended(|p| p.object_id = Some(id)))
    }

    /// Add object mask fragments.
    ///
    /// Fragments are appended to any added earlier in the chain and are
    /// checked right away: each must flatten to a mask starting at a
    /// `mask` or `filterMask` root.
    pub fn with_object_mask<I, M>(&self, fragments: I) -> Result<Self>
    where
        I: IntoIterator<Item = M>,
        M: Into<MaskLiteral>,
    {
        let fragments: Vec<MaskLiteral> = fragments.into_iter().map(Into::into).collect();
        if fragments.iter().all(MaskLiteral::is_empty) {
            return Err(Error::InvalidArgument(
                "object mask expects well-formatted root object mask strings".to_string(),
            ));
        }

        let fragments: Vec<MaskLiteral> = fragments.into_iter().filter(|f| !f.is_empty()).collect();
        for fragment in &fragments {
            let rendered = fragment.to_mask_string()?;
            if rendered.is_empty() {
                return Err(Error::InvalidArgument(format!(
                    "object mask fragment {:?} names no properties",
                    fragment
                )));
            }
            mask::parse(&rendered)?;
        }

        Ok(self.extended(|p| p.object_mask.get_or_insert_with(Vec::new).extend(fragments)))
    }

    /// Page the results. Values are passed through unchecked.
    pub fn with_result_window(&self, offset: i64, limit: i64) -> Self {
        self.extended(|p| {
            p.result_offset = Some(offset);
            p.result_limit = Some(limit);
        })
    }

    pub fn with_object_filter(&self, filter: ObjectFilter) -> Self {
        self.extended(|p| p.object_filter = Some(filter))
    }

    pub fn object_id(&self) -> Option<&Value> {
        self.parameters.object_id.as_ref()
    }

    pub fn object_mask(&self) -> Option<&[MaskLiteral]> {
        self.parameters.object_mask.as_deref()
    }

    pub fn result_offset(&self) -> Option<i64> {
        self.parameters.result_offset
    }

    pub fn result_limit(&self) -> Option<i64> {
        self.parameters.result_limit
    }

    pub fn object_filter(&self) -> Option<&ObjectFilter> {
        self.parameters.object_filter.as_ref()
    }

    /// The single mask string to send: all fragments flattened, parsed and
    /// merged, duplicated paths collapsed.
    pub fn server_object_mask(&self) -> Result<Option<String>> {
        let Some(fragments) = self.object_mask() else {
            return Ok(None);
        };
        let rendered = fragments
            .iter()
            .map(MaskLiteral::to_mask_string)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        let merged = mask::merge_masks(&rendered)?;
        Ok((!merged.is_empty()).then_some(merged))
    }

    /// The object filter to send, skipping empty ones.
    pub fn server_object_filter(&self) -> Option<&ObjectFilter> {
        self.object_filter().filter(|f| !f.is_empty())
    }

    /// End the chain: forward `method` and `args` to the target.
    pub fn invoke(&self, method: &str, args: Vec<Value>) -> T::Output {
        log::debug!("invoking {} with {:?}", method, self.parameters);
        self.target.call_with_filter(method, self, args)
    }
}
