//! Ledgr - client core of the Ledgr invoicing app
//!
//! Provides a TTL response cache (durable JSON store plus in-memory blob
//! store) and a rasterize-and-paginate document export pipeline.

pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod export;
pub mod models;

pub use client::{ApiClient, LedgrClient};
pub use config::Config;
pub use export::Exporter;
