//! SoftLayer API client.
//!
//! Object masks, chainable per-call parameter filters and the service
//! layer that turns them into request headers for a transport.

pub mod client;
pub mod config;
pub mod error;
pub mod filter;
pub mod mask;
pub mod object_filter;
pub mod service;

pub use client::Client;
pub use config::Config;
pub use error::{Error, Result};
pub use filter::{FilterParameters, FilterTarget, ParameterFilter};
pub use mask::{merge_masks, parse as parse_mask, MaskLiteral, MaskProperty, MaskSyntaxError, ParsedMask};
pub use object_filter::ObjectFilter;
pub use service::{CallRequest, Service, Transport};
