//! Admin order feed route.

use axum::{Json, extract::State};

use crate::error::Result;
use crate::middleware::{AccessGate, CurrentActor};
use crate::models::OrderSummary;
use crate::services::orders;
use crate::state::AppState;

/// List recent orders, newest first.
///
/// GET /api/orders
///
/// Admin only; the feed is rebuilt from the payment processor on every
/// request.
///
/// # Errors
///
/// 403 for non-admin actors, upstream status or 502 when the processor is
/// unreachable.
pub async fn index(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
) -> Result<Json<Vec<OrderSummary>>> {
    AccessGate::new(state.pool()).require_admin(&actor).await?;

    let rows = orders::list_orders(&state).await?;
    Ok(Json(rows))
}
