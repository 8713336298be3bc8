//! Upstream access and rate extraction

pub mod extract;
pub mod http;
pub mod provider;

pub use extract::{extract, ParseError};
pub use http::{HttpSource, HttpSourceConfig};
pub use provider::{FetchError, RateSource, RawDocument, SourceFormat};
