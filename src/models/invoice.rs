//! Invoice DTOs
//!
//! Shape of `GET /api/invoices`.

use serde::{Deserialize, Serialize};

/// Payment state of an invoice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Pending,
    Paid,
}

/// An invoice as listed by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: String,
    pub user_id: String,
    /// Amount in cents
    pub amount: i64,
    pub currency: String,
    pub customer: String,
    pub status: InvoiceStatus,
    pub created_at: String,
}

/// Envelope of the invoice list endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvoiceList {
    #[serde(default)]
    pub invoices: Vec<Invoice>,
}
