//! Client Module
//!
//! HTTP access to the Ledgr backend and the cached read paths built on it.
//!
//! # Layers
//! - `ApiClient`: authenticated GET returning JSON or a named blob
//! - `LedgrClient`: invoice/template/PDF reads memoized in the TTL caches

mod api;
mod ledgr;

pub use api::{filename_from_content_disposition, ApiClient};
pub use ledgr::{CacheTtls, LedgrClient, PdfDisposition};
