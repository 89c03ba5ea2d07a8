//! Checkout session initiation and single-order projection.
//!
//! Initiation is the only moment the buyer's selection exists outside the
//! payment session: it is flattened into session metadata and never written
//! locally. Projection reverses the trip on demand, joining the session
//! against the catalog as it is *now*.

use loomline_core::{Email, ProductId};

use crate::db::ProductRepository;
use crate::error::{AppError, Result};
use crate::models::{
    BuyerContact, LineItemView, OrderDetail, PostalAddress, Product, ProductSnapshot,
};
use crate::state::AppState;
use crate::stripe::{
    Address, CheckoutSession, CreateSessionParams, CustomerDetails, SelectionMetadata,
    StripeError,
};

/// Buyer-supplied fields for initiating a checkout session.
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionInput {
    pub product_id: String,
    pub email: String,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
    /// Buyer display name shown in the admin order table.
    #[serde(default, rename = "userId")]
    pub buyer_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

/// Create a hosted checkout session for a single product.
///
/// The unit amount is derived from the catalog price at this moment; the
/// selection travels in session metadata and nowhere else. Returns the
/// session id the UI redirects to.
///
/// # Errors
///
/// `Validation` for a malformed product id or email, `NotFound` when the
/// product does not exist, `Gateway` when the processor rejects the session.
pub async fn create_session(state: &AppState, input: CreateSessionInput) -> Result<String> {
    let product_id =
        ProductId::parse(&input.product_id).map_err(|e| AppError::Validation(e.to_string()))?;
    let email = Email::parse(&input.email).map_err(|e| AppError::Validation(e.to_string()))?;

    let product = ProductRepository::new(state.pool())
        .get(product_id)
        .await?
        .ok_or_else(|| AppError::NotFound("product".to_string()))?;

    let selection = SelectionMetadata {
        product_id: Some(product_id.to_string()),
        color: normalize(input.color),
        size: normalize(input.size),
        buyer_label: normalize(input.buyer_name),
        phone: normalize(input.phone),
        address: normalize(input.address),
    };
    let base_url = &state.config().base_url;
    let params = CreateSessionParams {
        display_name: display_name(&product.name, selection.color.as_deref(), selection.size.as_deref()),
        unit_amount: product.price.minor_units(),
        customer_email: email.into_inner(),
        success_url: format!("{base_url}/success?session_id={{CHECKOUT_SESSION_ID}}"),
        cancel_url: format!("{base_url}/product/{product_id}"),
        // Product data carries only the product reference and variant
        // choice; contact details stay session-level.
        product_metadata: selection.to_product_entries(),
        metadata: selection.to_entries(),
    };

    let session = state.stripe().create_checkout_session(&params).await?;

    tracing::info!(session_id = %session.id, product_id = %product_id, "checkout session created");
    Ok(session.id)
}

/// Project a full order view from a payment session.
///
/// The session is fetched fresh and joined against the live catalog. Unlike
/// the admin feed, this projection has a single subject: if the session or
/// its product cannot be resolved, the whole operation fails rather than
/// degrading.
///
/// # Errors
///
/// `Validation` for an empty session id, `NotFound` for an unknown session
/// or an unresolvable product reference, `Gateway` on processor failure.
pub async fn order_detail(state: &AppState, session_id: &str) -> Result<OrderDetail> {
    if session_id.is_empty() {
        return Err(AppError::Validation("session_id is required".to_string()));
    }

    let session = state
        .stripe()
        .retrieve_checkout_session(session_id)
        .await
        .map_err(|err| match err {
            StripeError::Api { status: 404, .. } => {
                AppError::NotFound("payment session".to_string())
            }
            other => AppError::Gateway(other),
        })?;

    let selection = session
        .metadata
        .as_ref()
        .map_or_else(SelectionMetadata::default, SelectionMetadata::from_map);

    // The caller only named the session; a missing or malformed product
    // reference inside it is catalog drift, not caller input.
    let product = match selection
        .product_id
        .as_deref()
        .and_then(|raw| ProductId::parse(raw).ok())
    {
        Some(id) => ProductRepository::new(state.pool()).get(id).await?,
        None => None,
    };
    let product = product.ok_or_else(|| AppError::NotFound("order product".to_string()))?;

    Ok(build_detail(session, &product, &selection))
}

/// Assemble the order view from its three sources: session (money facts),
/// catalog (content facts), metadata (the buyer's selection).
fn build_detail(
    session: CheckoutSession,
    product: &Product,
    selection: &SelectionMetadata,
) -> OrderDetail {
    let line_items = session
        .line_items
        .map(|list| {
            list.data
                .into_iter()
                .map(|item| LineItemView {
                    description: item.description,
                    quantity: item.quantity,
                    amount_total: item.amount_total,
                })
                .collect()
        })
        .unwrap_or_default();

    OrderDetail {
        id: session.id,
        customer_details: session.customer_details.map(buyer_contact),
        product: ProductSnapshot {
            name: product.name.clone(),
            description: product.description.clone(),
            category: product.category.clone(),
            selected_color: selection.color.clone(),
            selected_size: selection.size.clone(),
            price: product.price,
        },
        line_items,
        amount_total: session.amount_total,
    }
}

fn buyer_contact(details: CustomerDetails) -> BuyerContact {
    BuyerContact {
        name: details.name,
        email: details.email,
        phone: details.phone,
        address: details.address.map(postal_address),
    }
}

fn postal_address(address: Address) -> PostalAddress {
    PostalAddress {
        line1: address.line1,
        line2: address.line2,
        city: address.city,
        state: address.state,
        postal_code: address.postal_code,
        country: address.country,
    }
}

/// Compose the line item display name from the product name and selection.
fn display_name(name: &str, color: Option<&str>, size: Option<&str>) -> String {
    match (color, size) {
        (Some(color), Some(size)) => format!("{name} ({color} - {size})"),
        (Some(color), None) => format!("{name} ({color})"),
        (None, Some(size)) => format!("{name} ({size})"),
        (None, None) => name.to_string(),
    }
}

/// Treat empty strings from the UI as absent.
fn normalize(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
