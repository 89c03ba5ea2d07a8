//! HTTP route handlers for the shop API.
//!
//! # Route Structure
//!
//! ```text
//! # Checkout
//! POST /api/create-checkout-session - Create a hosted payment session
//! GET  /api/order-details           - Project one order from its session
//!
//! # Orders (admin)
//! GET  /api/orders                  - Recent orders feed
//!
//! # Products
//! GET   /api/products                 - Catalog listing
//! GET   /api/products/{id}            - Product detail
//! POST  /api/products                 - Create product (admin)
//! PUT   /api/products/{id}            - Partial update (admin)
//! PATCH /api/products/{id}/published  - Toggle visibility (admin)
//! ```
//!
//! All responses are JSON; errors come back as `{"error": "..."}`.

pub mod checkout;
pub mod orders;
pub mod products;

use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index).post(products::create))
        .route("/{id}", get(products::show).put(products::update))
        .route("/{id}/published", patch(products::set_published))
}

/// Create all API routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/create-checkout-session",
            post(checkout::create_checkout_session),
        )
        .route("/api/order-details", get(checkout::order_details))
        .route("/api/orders", get(orders::index))
        .nest("/api/products", product_routes())
}
