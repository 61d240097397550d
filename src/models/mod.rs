//! API models for the Ledgr backend
//!
//! Defines the DTOs the cached read paths deserialize from JSON responses.

pub mod invoice;
pub mod template;

// Re-export commonly used types
pub use invoice::{Invoice, InvoiceList, InvoiceStatus};
pub use template::{InvoiceTemplate, TemplateItem, TemplateList};
