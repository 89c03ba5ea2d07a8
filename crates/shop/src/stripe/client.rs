//! Stripe Checkout sessions client.

use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::instrument;

use super::{CheckoutSession, List, StripeError};
use crate::config::StripeConfig;

/// Parameters for creating a single-line-item checkout session.
#[derive(Debug, Clone)]
pub struct CreateSessionParams {
    /// Line item display name shown on the hosted checkout page.
    pub display_name: String,
    /// Unit price in minor units.
    pub unit_amount: i64,
    /// Buyer email, pre-filled on the hosted page.
    pub customer_email: String,
    /// Redirect target after a completed payment.
    pub success_url: String,
    /// Redirect target when the buyer abandons checkout.
    pub cancel_url: String,
    /// Session-level metadata entries (flat strings).
    pub metadata: Vec<(String, String)>,
    /// Metadata entries attached to the line item's product data.
    pub product_metadata: Vec<(String, String)>,
}

/// Stripe API client for checkout session operations.
#[derive(Clone)]
pub struct StripeClient {
    client: reqwest::Client,
    api_base: String,
}

impl StripeClient {
    /// Create a new Stripe API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: &StripeConfig) -> Result<Self, StripeError> {
        let mut headers = HeaderMap::new();

        let auth_value = format!("Bearer {}", config.secret_key.expose_secret());
        headers.insert(
            "Authorization",
            HeaderValue::from_str(&auth_value)
                .map_err(|e| StripeError::Parse(format!("Invalid API key format: {e}")))?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            api_base: config.api_base.clone(),
        })
    }

    /// Create a checkout session.
    ///
    /// The session is the only record of the buyer's selection; nothing is
    /// written locally.
    ///
    /// # Errors
    ///
    /// Returns `StripeError::Api` with the upstream status on rejection, or
    /// `StripeError::Http` on transport failure.
    #[instrument(skip(self, params), fields(display_name = %params.display_name))]
    pub async fn create_checkout_session(
        &self,
        params: &CreateSessionParams,
    ) -> Result<CheckoutSession, StripeError> {
        let url = format!("{}/checkout/sessions", self.api_base);
        let form = session_form(params);

        let response = self.client.post(&url).form(&form).send().await?;

        handle_response(response).await
    }

    /// Retrieve a checkout session with line items and customer details
    /// expanded.
    ///
    /// # Errors
    ///
    /// Returns `StripeError::Api` (status 404 for an unknown session id) or
    /// `StripeError::Http` on transport failure.
    #[instrument(skip(self), fields(session_id = %id))]
    pub async fn retrieve_checkout_session(&self, id: &str) -> Result<CheckoutSession, StripeError> {
        let url = format!("{}/checkout/sessions/{id}", self.api_base);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("expand[]", "line_items"),
                ("expand[]", "customer_details"),
            ])
            .send()
            .await?;

        handle_response(response).await
    }

    /// List the most recent checkout sessions (newest first), each expanded
    /// with line items and the customer object.
    ///
    /// # Errors
    ///
    /// Returns `StripeError::Api` or `StripeError::Http` on failure.
    #[instrument(skip(self))]
    pub async fn list_checkout_sessions(
        &self,
        limit: u8,
    ) -> Result<Vec<CheckoutSession>, StripeError> {
        let url = format!("{}/checkout/sessions", self.api_base);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("limit", limit.to_string().as_str()),
                ("expand[]", "data.line_items"),
                ("expand[]", "data.customer"),
            ])
            .send()
            .await?;

        let list: List<CheckoutSession> = handle_response(response).await?;
        Ok(list.data)
    }
}

/// Flatten session parameters into Stripe's bracketed form encoding.
fn session_form(params: &CreateSessionParams) -> Vec<(String, String)> {
    let mut form = vec![
        ("mode".to_owned(), "payment".to_owned()),
        ("payment_method_types[0]".to_owned(), "card".to_owned()),
        ("success_url".to_owned(), params.success_url.clone()),
        ("cancel_url".to_owned(), params.cancel_url.clone()),
        ("customer_email".to_owned(), params.customer_email.clone()),
        (
            "billing_address_collection".to_owned(),
            "required".to_owned(),
        ),
        (
            "shipping_address_collection[allowed_countries][0]".to_owned(),
            "US".to_owned(),
        ),
        ("line_items[0][quantity]".to_owned(), "1".to_owned()),
        (
            "line_items[0][price_data][currency]".to_owned(),
            "usd".to_owned(),
        ),
        (
            "line_items[0][price_data][unit_amount]".to_owned(),
            params.unit_amount.to_string(),
        ),
        (
            "line_items[0][price_data][product_data][name]".to_owned(),
            params.display_name.clone(),
        ),
    ];

    for (key, value) in &params.product_metadata {
        form.push((
            format!("line_items[0][price_data][product_data][metadata][{key}]"),
            value.clone(),
        ));
    }

    for (key, value) in &params.metadata {
        form.push((format!("metadata[{key}]"), value.clone()));
    }

    form
}

/// Decode a Stripe response, mapping error envelopes to `StripeError::Api`.
async fn handle_response<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, StripeError> {
    let status = response.status();

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let (message, code) = match serde_json::from_str::<ErrorEnvelope>(&body) {
            Ok(envelope) => (
                envelope.error.message.unwrap_or_else(|| body.clone()),
                envelope.error.code,
            ),
            Err(_) => (body, None),
        };
        return Err(StripeError::Api {
            status: status.as_u16(),
            message,
            code,
        });
    }

    response
        .json()
        .await
        .map_err(|e| StripeError::Parse(e.to_string()))
}

/// Stripe error response envelope.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    code: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn params() -> CreateSessionParams {
        CreateSessionParams {
            display_name: "Linen Shirt (Indigo - M)".to_string(),
            unit_amount: 1999,
            customer_email: "jo@example.com".to_string(),
            success_url: "https://shop.test/success?session_id={CHECKOUT_SESSION_ID}".to_string(),
            cancel_url: "https://shop.test/product/p-1".to_string(),
            metadata: vec![
                ("productId".to_string(), "p-1".to_string()),
                ("color".to_string(), "Indigo".to_string()),
            ],
            product_metadata: vec![("productId".to_string(), "p-1".to_string())],
        }
    }

    fn lookup<'a>(form: &'a [(String, String)], key: &str) -> Option<&'a str> {
        form.iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_session_form_line_item() {
        let form = session_form(&params());

        assert_eq!(lookup(&form, "mode"), Some("payment"));
        assert_eq!(lookup(&form, "line_items[0][quantity]"), Some("1"));
        assert_eq!(
            lookup(&form, "line_items[0][price_data][unit_amount]"),
            Some("1999")
        );
        assert_eq!(
            lookup(&form, "line_items[0][price_data][product_data][name]"),
            Some("Linen Shirt (Indigo - M)")
        );
    }

    #[test]
    fn test_session_form_metadata_channels() {
        let form = session_form(&params());

        assert_eq!(lookup(&form, "metadata[productId]"), Some("p-1"));
        assert_eq!(lookup(&form, "metadata[color]"), Some("Indigo"));
        assert_eq!(
            lookup(
                &form,
                "line_items[0][price_data][product_data][metadata][productId]"
            ),
            Some("p-1")
        );
    }

    #[test]
    fn test_session_form_collection_flags() {
        let form = session_form(&params());

        assert_eq!(lookup(&form, "billing_address_collection"), Some("required"));
        assert_eq!(
            lookup(&form, "shipping_address_collection[allowed_countries][0]"),
            Some("US")
        );
        assert_eq!(lookup(&form, "customer_email"), Some("jo@example.com"));
    }

    #[test]
    fn test_error_envelope_parsing() {
        let body = r#"{"error": {"message": "No such checkout.session", "code": "resource_missing", "type": "invalid_request_error"}}"#;
        let envelope: ErrorEnvelope = serde_json::from_str(body).unwrap();
        assert_eq!(
            envelope.error.message.as_deref(),
            Some("No such checkout.session")
        );
        assert_eq!(envelope.error.code.as_deref(), Some("resource_missing"));
    }
}
