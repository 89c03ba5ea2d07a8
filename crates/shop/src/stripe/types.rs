//! Wire types for the subset of the Stripe API this service consumes.
//!
//! Sessions are read-only to us: Stripe owns them and they are never
//! mutated or stored locally. Unknown response fields are ignored.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A Stripe Checkout session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutSession {
    /// Session identifier (`cs_...`).
    pub id: String,
    /// Session lifecycle status (`open`, `complete`, `expired`).
    #[serde(default)]
    pub status: Option<String>,
    /// Payment status (`paid`, `unpaid`, `no_payment_required`).
    #[serde(default)]
    pub payment_status: Option<String>,
    /// Total in minor units.
    #[serde(default)]
    pub amount_total: Option<i64>,
    /// Creation time, Unix seconds.
    #[serde(default)]
    pub created: i64,
    /// Buyer contact block collected during checkout.
    #[serde(default)]
    pub customer_details: Option<CustomerDetails>,
    /// Flat string metadata attached at creation.
    #[serde(default)]
    pub metadata: Option<BTreeMap<String, String>>,
    /// Line items; present only when expanded.
    #[serde(default)]
    pub line_items: Option<List<LineItem>>,
}

/// Buyer contact block as collected by Stripe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerDetails {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<Address>,
}

/// Structured billing address sub-object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub line1: Option<String>,
    #[serde(default)]
    pub line2: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

/// A session line item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItem {
    pub id: String,
    /// Display name the session was created with.
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub quantity: Option<i64>,
    #[serde(default)]
    pub amount_total: Option<i64>,
}

/// Stripe list envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct List<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub has_more: bool,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_expanded_session() {
        let json = r#"{
            "id": "cs_test_a1b2c3",
            "object": "checkout.session",
            "status": "complete",
            "payment_status": "paid",
            "amount_total": 1999,
            "created": 1714000000,
            "customer_details": {
                "name": "Jo Buyer",
                "email": "jo@example.com",
                "phone": null,
                "address": {
                    "line1": "1 Main St",
                    "line2": null,
                    "city": "Springfield",
                    "state": "IL",
                    "postal_code": "62701",
                    "country": "US"
                }
            },
            "metadata": {
                "productId": "3fa85f64-5717-4562-b3fc-2c963f66afa6",
                "color": "Indigo"
            },
            "line_items": {
                "object": "list",
                "data": [{
                    "id": "li_1",
                    "description": "Linen Shirt (Indigo - M)",
                    "quantity": 1,
                    "amount_total": 1999
                }],
                "has_more": false
            }
        }"#;

        let session: CheckoutSession = serde_json::from_str(json).unwrap();
        assert_eq!(session.id, "cs_test_a1b2c3");
        assert_eq!(session.amount_total, Some(1999));
        assert_eq!(
            session.metadata.as_ref().unwrap().get("color").unwrap(),
            "Indigo"
        );

        let items = session.line_items.unwrap();
        assert_eq!(items.data.len(), 1);
        assert_eq!(
            items.data[0].description.as_deref(),
            Some("Linen Shirt (Indigo - M)")
        );

        let details = session.customer_details.unwrap();
        assert_eq!(details.email.as_deref(), Some("jo@example.com"));
        assert_eq!(
            details.address.unwrap().city.as_deref(),
            Some("Springfield")
        );
    }

    #[test]
    fn test_deserialize_minimal_session() {
        // Unexpanded sessions carry neither line items nor customer details.
        let json = r#"{"id": "cs_test_min", "created": 1714000001, "metadata": null}"#;
        let session: CheckoutSession = serde_json::from_str(json).unwrap();
        assert!(session.line_items.is_none());
        assert!(session.customer_details.is_none());
        assert!(session.metadata.is_none());
    }
}
