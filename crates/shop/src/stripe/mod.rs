//! Stripe Checkout REST API client.
//!
//! # Architecture
//!
//! - Stripe is the source of truth for payment state - NO local order table,
//!   direct API calls on every read
//! - Form-encoded requests, JSON responses, bearer authentication
//! - [`metadata`] is the single boundary where order-selection data is
//!   flattened into Stripe's string-only metadata storage
//!
//! # Operations
//!
//! - Create a checkout session (single line item + embedded selection metadata)
//! - Retrieve a session by id (line items + customer details expanded)
//! - List recent sessions (paginated, expanded)

mod client;
pub mod metadata;
pub mod types;

pub use client::{CreateSessionParams, StripeClient};
pub use metadata::SelectionMetadata;
pub use types::*;

use thiserror::Error;

/// Errors that can occur when interacting with the Stripe API.
#[derive(Debug, Error)]
pub enum StripeError {
    /// HTTP request failed before a response was received.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Stripe returned an error response.
    #[error("Stripe API error ({status}): {message}")]
    Api {
        /// Upstream HTTP status code.
        status: u16,
        /// Human-readable message from Stripe.
        message: String,
        /// Machine-readable Stripe error code, when provided.
        code: Option<String>,
    },

    /// Response body could not be parsed.
    #[error("parse error: {0}")]
    Parse(String),
}

impl StripeError {
    /// The upstream HTTP status, when the processor produced one.
    #[must_use]
    pub const fn upstream_status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Http(_) | Self::Parse(_) => None,
        }
    }
}
