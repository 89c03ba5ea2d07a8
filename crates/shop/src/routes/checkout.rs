//! Checkout API routes.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::OrderDetail;
use crate::services::checkout::{self, CreateSessionInput};
use crate::state::AppState;

/// Response from creating a checkout session. The UI redirects to the
/// hosted page identified by `id`.
#[derive(Debug, Serialize)]
pub struct CreateSessionResponse {
    pub id: String,
}

/// Create a hosted checkout session.
///
/// POST /api/create-checkout-session
///
/// # Errors
///
/// 400 for malformed input, 404 for an unknown product, upstream status or
/// 502 for processor failures.
pub async fn create_checkout_session(
    State(state): State<AppState>,
    Json(input): Json<CreateSessionInput>,
) -> Result<Json<CreateSessionResponse>> {
    let id = checkout::create_session(&state, input).await?;
    Ok(Json(CreateSessionResponse { id }))
}

#[derive(Debug, Deserialize)]
pub struct OrderDetailsQuery {
    #[serde(default)]
    pub session_id: Option<String>,
}

/// Project a full order view from a payment session id.
///
/// GET /api/order-details?session_id=cs_...
///
/// # Errors
///
/// 400 when `session_id` is missing, 404 for an unknown session or an
/// unresolvable product reference.
pub async fn order_details(
    State(state): State<AppState>,
    Query(query): Query<OrderDetailsQuery>,
) -> Result<Json<OrderDetail>> {
    let session_id = query.session_id.unwrap_or_default();
    let detail = checkout::order_detail(&state, &session_id).await?;
    Ok(Json(detail))
}
