//! Admin order feed.
//!
//! There is no local order table. The feed is rebuilt on every request from
//! the processor's recent sessions, each joined best-effort against the live
//! catalog. A vanished product degrades its row to placeholders; it never
//! hides the row or aborts the feed, because the money facts still exist.

use futures::future::join_all;

use loomline_core::ProductId;

use crate::db::ProductRepository;
use crate::error::Result;
use crate::models::{CustomerSummary, OrderSummary, Product, ProductLine, UNRESOLVED};
use crate::state::AppState;
use crate::stripe::{Address, CheckoutSession, SelectionMetadata};

/// How many recent sessions the feed covers. Older sessions fall off; the
/// feed is a recency window, not an archive.
const FEED_LIMIT: u8 = 100;

/// List recent orders for the admin table, newest first.
///
/// Sessions keep the processor's order. Catalog lookups run concurrently,
/// one per row; a failed or empty lookup degrades that row only.
///
/// # Errors
///
/// `Gateway` when the session list itself cannot be fetched. Per-row catalog
/// failures do not error.
pub async fn list_orders(state: &AppState) -> Result<Vec<OrderSummary>> {
    let sessions = state.stripe().list_checkout_sessions(FEED_LIMIT).await?;

    let repo = ProductRepository::new(state.pool());
    let lookups = sessions.iter().map(|session| {
        let repo = &repo;
        async move {
            let id = session
                .metadata
                .as_ref()
                .map(SelectionMetadata::from_map)
                .and_then(|s| s.product_id)
                .and_then(|raw| ProductId::parse(&raw).ok());

            match id {
                Some(id) => match repo.get(id).await {
                    Ok(product) => product,
                    Err(err) => {
                        tracing::warn!(product_id = %id, error = %err, "order feed lookup failed");
                        None
                    }
                },
                None => None,
            }
        }
    });
    // join_all preserves input order, so rows stay aligned with sessions.
    let products = join_all(lookups).await;

    Ok(sessions
        .into_iter()
        .zip(products)
        .map(|(session, product)| summarize(&session, product.as_ref()))
        .collect())
}

/// Flatten one session and its (possibly absent) product into a table row.
///
/// Name and phone come from metadata (what the buyer typed) before the
/// processor-collected values; the address column always comes from the
/// processor's structured billing block. The product name is the line
/// item's description, the display name the session was created with, so
/// it survives catalog drift; only `category` needs the catalog.
/// Everything else falls through to [`UNRESOLVED`].
fn summarize(session: &CheckoutSession, product: Option<&Product>) -> OrderSummary {
    let selection = session
        .metadata
        .as_ref()
        .map_or_else(SelectionMetadata::default, SelectionMetadata::from_map);
    let details = session.customer_details.as_ref();
    let line_item_name = session
        .line_items
        .as_ref()
        .and_then(|list| list.data.first())
        .and_then(|item| item.description.clone());

    let or_unresolved = |value: Option<String>| value.unwrap_or_else(|| UNRESOLVED.to_string());

    OrderSummary {
        id: session.id.clone(),
        customer: CustomerSummary {
            name: or_unresolved(
                selection
                    .buyer_label
                    .clone()
                    .or_else(|| details.and_then(|d| d.name.clone())),
            ),
            email: or_unresolved(details.and_then(|d| d.email.clone())),
            address: or_unresolved(compose_address(details.and_then(|d| d.address.as_ref()))),
            phone: or_unresolved(
                selection
                    .phone
                    .clone()
                    .or_else(|| details.and_then(|d| d.phone.clone())),
            ),
        },
        product: ProductLine {
            name: or_unresolved(line_item_name),
            category: or_unresolved(product.map(|p| p.category.clone())),
        },
        selected_color: or_unresolved(selection.color),
        selected_size: or_unresolved(selection.size),
        amount_total: session.amount_total,
        created: session.created,
    }
}

/// Render a structured address as a single display line. `None` when no
/// component is present.
fn compose_address(address: Option<&Address>) -> Option<String> {
    let address = address?;
    let parts: Vec<&str> = [
        address.line1.as_deref(),
        address.line2.as_deref(),
        address.city.as_deref(),
        address.state.as_deref(),
        address.postal_code.as_deref(),
        address.country.as_deref(),
    ]
    .into_iter()
    .flatten()
    .filter(|part| !part.is_empty())
    .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(", "))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::Utc;
    use rust_decimal::Decimal;

    use loomline_core::Price;

    use super::*;
    use crate::stripe::{CustomerDetails, LineItem, List};

    fn session(id: &str, product_id: Option<&str>, created: i64) -> CheckoutSession {
        let mut metadata = BTreeMap::new();
        if let Some(pid) = product_id {
            metadata.insert("productId".to_string(), pid.to_string());
        }
        metadata.insert("userId".to_string(), "Jo Buyer".to_string());
        metadata.insert("color".to_string(), "Indigo".to_string());

        CheckoutSession {
            id: id.to_string(),
            status: Some("complete".to_string()),
            payment_status: Some("paid".to_string()),
            amount_total: Some(1999),
            created,
            customer_details: Some(CustomerDetails {
                name: Some("J. Buyer".to_string()),
                email: Some("jo@example.com".to_string()),
                phone: Some("+1 555 0100".to_string()),
                address: Some(Address {
                    line1: Some("1 Main St".to_string()),
                    line2: None,
                    city: Some("Springfield".to_string()),
                    state: Some("IL".to_string()),
                    postal_code: Some("62701".to_string()),
                    country: Some("US".to_string()),
                }),
            }),
            metadata: Some(metadata),
            line_items: Some(List {
                data: vec![LineItem {
                    id: "li_1".to_string(),
                    description: Some("Linen Shirt (Indigo - M)".to_string()),
                    quantity: Some(1),
                    amount_total: Some(1999),
                }],
                has_more: false,
            }),
        }
    }

    fn product(name: &str) -> Product {
        Product {
            id: "3fa85f64-5717-4562-b3fc-2c963f66afa6".parse().unwrap(),
            name: name.to_string(),
            price: Price::new(Decimal::new(1999, 2)).unwrap(),
            description: String::new(),
            images: vec![],
            category: "shirts".to_string(),
            available_colors: vec![],
            available_sizes: vec![],
            published: true,
            upload_time: Utc::now(),
        }
    }

    #[test]
    fn test_summarize_with_product() {
        let row = summarize(&session("cs_1", Some("p-1"), 1), Some(&product("Linen Shirt")));

        // Name is the purchased display name, not the catalog's.
        assert_eq!(row.product.name, "Linen Shirt (Indigo - M)");
        assert_eq!(row.product.category, "shirts");
        // Metadata name wins over the processor-collected one.
        assert_eq!(row.customer.name, "Jo Buyer");
        assert_eq!(row.customer.email, "jo@example.com");
        assert_eq!(row.selected_color, "Indigo");
        assert_eq!(row.selected_size, UNRESOLVED);
        assert_eq!(row.amount_total, Some(1999));
    }

    #[test]
    fn test_summarize_degrades_missing_product() {
        let row = summarize(&session("cs_1", Some("p-gone"), 1), None);

        // The purchased display name survives a deleted product; only the
        // catalog-sourced category degrades.
        assert_eq!(row.product.name, "Linen Shirt (Indigo - M)");
        assert_eq!(row.product.category, UNRESOLVED);
        // Session-sourced columns survive the missing join.
        assert_eq!(row.customer.email, "jo@example.com");
        assert_eq!(row.amount_total, Some(1999));
    }

    #[test]
    fn test_summarize_without_line_items() {
        let mut s = session("cs_1", Some("p-1"), 1);
        s.line_items = None;

        let row = summarize(&s, Some(&product("Linen Shirt")));
        assert_eq!(row.product.name, UNRESOLVED);
        assert_eq!(row.product.category, "shirts");
    }

    #[test]
    fn test_summarize_empty_session() {
        let bare = CheckoutSession {
            id: "cs_bare".to_string(),
            status: None,
            payment_status: None,
            amount_total: None,
            created: 0,
            customer_details: None,
            metadata: None,
            line_items: None,
        };

        let row = summarize(&bare, None);
        assert_eq!(row.customer.name, UNRESOLVED);
        assert_eq!(row.customer.email, UNRESOLVED);
        assert_eq!(row.customer.address, UNRESOLVED);
        assert_eq!(row.customer.phone, UNRESOLVED);
        assert_eq!(row.product.name, UNRESOLVED);
        assert_eq!(row.selected_color, UNRESOLVED);
        assert_eq!(row.amount_total, None);
    }

    #[test]
    fn test_address_comes_from_processor_block() {
        let mut s = session("cs_1", None, 1);
        let row = summarize(&s, None);
        assert_eq!(
            row.customer.address,
            "1 Main St, Springfield, IL, 62701, US"
        );

        // A buyer-typed metadata address never overrides the billing block
        // the processor collected.
        s.metadata
            .as_mut()
            .unwrap()
            .insert("address".to_string(), "typed address".to_string());
        let row = summarize(&s, None);
        assert_eq!(
            row.customer.address,
            "1 Main St, Springfield, IL, 62701, US"
        );

        // Without the billing block the column degrades to the sentinel.
        s.customer_details = None;
        let row = summarize(&s, None);
        assert_eq!(row.customer.address, UNRESOLVED);
    }

    #[test]
    fn test_compose_address() {
        assert_eq!(compose_address(None), None);

        let empty = Address {
            line1: None,
            line2: None,
            city: None,
            state: None,
            postal_code: None,
            country: None,
        };
        assert_eq!(compose_address(Some(&empty)), None);

        let partial = Address {
            line1: Some("1 Main St".to_string()),
            country: Some("US".to_string()),
            ..empty
        };
        assert_eq!(
            compose_address(Some(&partial)),
            Some("1 Main St, US".to_string())
        );
    }

    #[test]
    fn test_rows_keep_session_order_when_a_join_fails() {
        let sessions = vec![
            session("cs_1", Some("p-1"), 300),
            session("cs_2", Some("p-deleted"), 200),
            session("cs_3", Some("p-3"), 100),
        ];
        let products = vec![Some(product("First")), None, Some(product("Third"))];

        let rows: Vec<OrderSummary> = sessions
            .iter()
            .zip(products.iter())
            .map(|(s, p)| summarize(s, p.as_ref()))
            .collect();

        assert_eq!(rows.len(), 3);
        assert_eq!(
            rows.iter().map(|r| r.id.as_str()).collect::<Vec<_>>(),
            ["cs_1", "cs_2", "cs_3"]
        );
        assert_eq!(rows[0].product.category, "shirts");
        assert_eq!(rows[1].product.category, UNRESOLVED);
        assert_eq!(rows[2].product.category, "shirts");
        // The failed join keeps the purchased display name.
        assert_eq!(rows[1].product.name, "Linen Shirt (Indigo - M)");
    }
}
