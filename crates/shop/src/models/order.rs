//! Ephemeral order views.
//!
//! Neither type here is ever written to storage. [`OrderDetail`] and
//! [`OrderSummary`] are projections: reconstructed from the payment
//! processor's session plus a live catalog lookup on every read, and thrown
//! away with the response. Caching them would change the staleness contract.

use serde::Serialize;

use loomline_core::Price;

/// Placeholder rendered when a joined field cannot be resolved. Distinct from
/// an absent field: the admin table always has something to show.
pub const UNRESOLVED: &str = "N/A";

/// Full order view for the post-checkout success page.
///
/// Money facts (`amount_total`, line items) come from the session; content
/// facts (`product`) come from the catalog as it is *now*. The session total
/// and the catalog price may legitimately diverge and both are exposed.
#[derive(Debug, Clone, Serialize)]
pub struct OrderDetail {
    /// Payment session identifier.
    pub id: String,
    /// Buyer contact block as reported by the processor.
    pub customer_details: Option<BuyerContact>,
    /// Catalog snapshot at projection time plus the buyer's selection.
    pub product: ProductSnapshot,
    /// Line items as the processor recorded them.
    pub line_items: Vec<LineItemView>,
    /// Total charged, in minor units. Source of truth for money.
    pub amount_total: Option<i64>,
}

/// Catalog-sourced fields of an [`OrderDetail`], joined with the selection
/// the buyer recorded at initiation.
#[derive(Debug, Clone, Serialize)]
pub struct ProductSnapshot {
    pub name: String,
    pub description: String,
    pub category: String,
    pub selected_color: Option<String>,
    pub selected_size: Option<String>,
    /// Catalog price at projection time, not at purchase time.
    pub price: Price,
}

/// Buyer contact block.
#[derive(Debug, Clone, Serialize)]
pub struct BuyerContact {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<PostalAddress>,
}

/// Structured postal address.
#[derive(Debug, Clone, Serialize)]
pub struct PostalAddress {
    pub line1: Option<String>,
    pub line2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
}

/// A single processor-reported line item.
#[derive(Debug, Clone, Serialize)]
pub struct LineItemView {
    pub description: Option<String>,
    pub quantity: Option<i64>,
    pub amount_total: Option<i64>,
}

/// Flattened single-row order view for the admin table.
///
/// Every display field degrades to [`UNRESOLVED`] rather than being omitted;
/// the row is emitted even when the referenced product no longer exists.
#[derive(Debug, Clone, Serialize)]
pub struct OrderSummary {
    pub id: String,
    pub customer: CustomerSummary,
    pub product: ProductLine,
    pub selected_color: String,
    pub selected_size: String,
    /// Total charged, in minor units.
    pub amount_total: Option<i64>,
    /// Session creation time (Unix seconds); rows keep the processor's
    /// reverse-chronological order.
    pub created: i64,
}

/// Buyer columns of an [`OrderSummary`].
#[derive(Debug, Clone, Serialize)]
pub struct CustomerSummary {
    pub name: String,
    pub email: String,
    pub address: String,
    pub phone: String,
}

/// Product columns of an [`OrderSummary`].
#[derive(Debug, Clone, Serialize)]
pub struct ProductLine {
    pub name: String,
    pub category: String,
}
