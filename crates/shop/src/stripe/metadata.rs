//! Selection metadata boundary.
//!
//! The buyer's selection (product, color, size, contact details) is recorded
//! nowhere except inside the payment session's metadata map, which stores
//! flat strings only. This module is the one place that knows the wire keys
//! and the flattening rules; values must survive the round trip
//! byte-identical.

use std::collections::BTreeMap;

/// Wire keys inside the session metadata map.
mod keys {
    pub const PRODUCT_ID: &str = "productId";
    pub const COLOR: &str = "color";
    pub const SIZE: &str = "size";
    /// The buyer's display name travels under this historical key.
    pub const BUYER_LABEL: &str = "userId";
    pub const PHONE: &str = "phone";
    pub const ADDRESS: &str = "address";
}

/// The selection a buyer made at checkout initiation.
///
/// `product_id` is always present when a session is created; by the time the
/// session is read back it may be absent or reference a product that no
/// longer exists (catalog drift), so reads treat it as optional.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SelectionMetadata {
    pub product_id: Option<String>,
    pub color: Option<String>,
    pub size: Option<String>,
    pub buyer_label: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl SelectionMetadata {
    /// Flatten into metadata entries. Absent fields are omitted entirely,
    /// never written as empty strings.
    #[must_use]
    pub fn to_entries(&self) -> Vec<(String, String)> {
        let fields = [
            (keys::PRODUCT_ID, &self.product_id),
            (keys::COLOR, &self.color),
            (keys::SIZE, &self.size),
            (keys::BUYER_LABEL, &self.buyer_label),
            (keys::PHONE, &self.phone),
            (keys::ADDRESS, &self.address),
        ];

        fields
            .into_iter()
            .filter_map(|(key, value)| value.as_ref().map(|v| (key.to_owned(), v.clone())))
            .collect()
    }

    /// The subset that rides on the line item's product data: the product
    /// reference and the variant choice. Contact details stay session-level
    /// only.
    #[must_use]
    pub fn to_product_entries(&self) -> Vec<(String, String)> {
        let fields = [
            (keys::PRODUCT_ID, &self.product_id),
            (keys::COLOR, &self.color),
            (keys::SIZE, &self.size),
        ];

        fields
            .into_iter()
            .filter_map(|(key, value)| value.as_ref().map(|v| (key.to_owned(), v.clone())))
            .collect()
    }

    /// Read a selection back out of a session's metadata map. Keys that are
    /// missing come back as `None`; values are taken verbatim.
    #[must_use]
    pub fn from_map(map: &BTreeMap<String, String>) -> Self {
        let get = |key: &str| map.get(key).cloned();

        Self {
            product_id: get(keys::PRODUCT_ID),
            color: get(keys::COLOR),
            size: get(keys::SIZE),
            buyer_label: get(keys::BUYER_LABEL),
            phone: get(keys::PHONE),
            address: get(keys::ADDRESS),
        }
    }
}
