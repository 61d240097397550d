//! Invoice template DTOs
//!
//! Shape of `GET /api/templates`.

use serde::{Deserialize, Serialize};

/// A line item stored on a template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateItem {
    pub description: String,
    pub quantity: f64,
    pub rate: f64,
}

/// A reusable invoice template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceTemplate {
    pub id: String,
    pub user_id: String,
    pub name: String,
    #[serde(default)]
    pub items: Vec<TemplateItem>,
    pub tax_rate: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: String,
}

/// Envelope of the template list endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TemplateList {
    #[serde(default)]
    pub templates: Vec<InvoiceTemplate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_deserialize_without_notes() {
        let json = r#"{"id":"t1","user_id":"u1","name":"Consulting",
            "items":[{"description":"Hours","quantity":10,"rate":95.5}],
            "tax_rate":7.5,"created_at":"2024-05-01T10:00:00Z"}"#;
        let template: InvoiceTemplate = serde_json::from_str(json).unwrap();

        assert_eq!(template.items.len(), 1);
        assert_eq!(template.items[0].rate, 95.5);
        assert!(template.notes.is_none());
    }
}
